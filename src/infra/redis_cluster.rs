//! Redis Cluster store backend.
//!
//! Uses one multiplexed async cluster connection, opened lazily on first use
//! and shared by every mutex built on the same store. Each operation borrows a
//! handle to it; the cluster connection routes commands and scripts by key
//! slot, so `SET`, `EVALSHA` and `EVAL` for a lock name always reach the
//! primary owning that slot.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::cluster::{ClusterClient, ClusterClientBuilder};
use redis::cluster_async::ClusterConnection;
use redis::{ErrorKind, RedisError, Script};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::ClusterConfig;
use crate::core::store::ttl_millis;
use crate::core::{
    AtomicScript, ScriptKind, StoreClient, StoreConnection, StoreError, RELEASE_SCRIPT,
    RENEW_SCRIPT,
};

static RELEASE: LazyLock<Script> = LazyLock::new(|| Script::new(RELEASE_SCRIPT.source));
static RENEW: LazyLock<Script> = LazyLock::new(|| Script::new(RENEW_SCRIPT.source));

fn prepared(script: &AtomicScript) -> &'static Script {
    match script.kind {
        ScriptKind::CompareAndDelete => &RELEASE,
        ScriptKind::CompareAndExpire => &RENEW,
    }
}

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error()
            || e.is_timeout()
            || e.is_connection_dropped()
            || e.is_connection_refusal()
        {
            return Self::Unreachable(e.to_string());
        }
        match e.kind() {
            ErrorKind::Moved
            | ErrorKind::Ask
            | ErrorKind::TryAgain
            | ErrorKind::ClusterDown
            | ErrorKind::CrossSlot
            | ErrorKind::MasterDown => Self::Routing(e.to_string()),
            ErrorKind::TypeError | ErrorKind::ResponseError => Self::Protocol(e.to_string()),
            _ => Self::Backend(e.to_string()),
        }
    }
}

/// Store client for a Redis Cluster.
pub struct RedisClusterStore {
    client: ClusterClient,
    conn: OnceCell<ClusterConnection>,
}

impl RedisClusterStore {
    /// Build a client for the configured startup nodes. No connection is made
    /// until the first operation.
    ///
    /// # Errors
    ///
    /// Invalid configuration or node URLs.
    pub fn new(cfg: &ClusterConfig) -> Result<Self, StoreError> {
        cfg.validate().map_err(StoreError::Backend)?;
        let client = ClusterClientBuilder::new(cfg.nodes.clone())
            .connection_timeout(cfg.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    async fn shared(&self) -> Result<&ClusterConnection, StoreError> {
        self.conn
            .get_or_try_init(|| async {
                let conn = self.client.get_async_connection().await?;
                info!("connected to redis cluster");
                Ok::<_, StoreError>(conn)
            })
            .await
    }
}

#[async_trait]
impl StoreClient for RedisClusterStore {
    type Connection = RedisClusterConnection;

    async fn connection(&self, key: &str) -> Result<Self::Connection, StoreError> {
        let conn = self.shared().await?.clone();
        debug!(key, "borrowed cluster connection");
        Ok(RedisClusterConnection { conn })
    }
}

/// Handle on the shared cluster connection for one operation.
pub struct RedisClusterConnection {
    conn: ClusterConnection,
}

#[async_trait]
impl StoreConnection for RedisClusterConnection {
    async fn set_if_absent(
        &mut self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut self.conn)
            .await?;
        Ok(reply.as_deref() == Some("OK"))
    }

    async fn eval(
        &mut self,
        script: &AtomicScript,
        key: &str,
        args: &[String],
    ) -> Result<i64, StoreError> {
        let mut invocation = prepared(script).prepare_invoke();
        invocation.key(key);
        for arg in args {
            invocation.arg(arg.as_str());
        }
        let status: i64 = invocation.invoke_async(&mut self.conn).await?;
        Ok(status)
    }
}
