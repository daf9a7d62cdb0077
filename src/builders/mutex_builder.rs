//! Factory and builder for named mutexes.

use std::sync::Arc;
use std::time::Duration;

use crate::config::MutexConfig;
use crate::core::store::check_ttl;
use crate::core::{
    ConstantDelay, DelayStrategy, LockError, RandomToken, StoreClient, TokenGenerator,
};
use crate::Mutex;

/// Entry point bound to one store client. Creates named mutexes.
pub struct Redcsync<C: StoreClient> {
    client: Arc<C>,
    defaults: MutexConfig,
}

impl<C: StoreClient> Clone for Redcsync<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            defaults: self.defaults.clone(),
        }
    }
}

impl<C: StoreClient> Redcsync<C> {
    /// Bind a factory to `client` with default mutex settings.
    pub fn new(client: C) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Bind a factory to an already shared client.
    pub fn from_arc(client: Arc<C>) -> Self {
        Self {
            client,
            defaults: MutexConfig::default(),
        }
    }

    /// Use `defaults` as the starting point for every new mutex.
    #[must_use]
    pub fn with_defaults(mut self, defaults: MutexConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Shared store client.
    pub const fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Start building a mutex for `name`.
    pub fn new_mutex(&self, name: impl Into<String>) -> MutexBuilder<C> {
        MutexBuilder::new(name, Arc::clone(&self.client), &self.defaults)
    }
}

/// Configures one [`Mutex`]. Obtained from [`Redcsync::new_mutex`].
pub struct MutexBuilder<C: StoreClient> {
    name: String,
    expiry: Duration,
    tries: u32,
    delay: Arc<dyn DelayStrategy>,
    tokens: Arc<dyn TokenGenerator>,
    factor: Option<f64>,
    quorum: Option<u32>,
    client: Arc<C>,
}

impl<C: StoreClient> MutexBuilder<C> {
    fn new(name: impl Into<String>, client: Arc<C>, cfg: &MutexConfig) -> Self {
        Self {
            name: name.into(),
            expiry: cfg.expiry(),
            tries: cfg.tries,
            delay: Arc::new(ConstantDelay(cfg.retry_delay())),
            tokens: Arc::new(RandomToken),
            factor: cfg.factor,
            quorum: cfg.quorum,
            client,
        }
    }

    /// Take expiry, tries, delay and reserved fields from `cfg`.
    #[must_use]
    pub fn with_config(mut self, cfg: &MutexConfig) -> Self {
        self.expiry = cfg.expiry();
        self.tries = cfg.tries;
        self.delay = Arc::new(ConstantDelay(cfg.retry_delay()));
        self.factor = cfg.factor;
        self.quorum = cfg.quorum;
        self
    }

    /// Lease TTL.
    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Maximum acquisition attempts per `lock` call.
    #[must_use]
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Backoff policy between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: impl DelayStrategy + 'static) -> Self {
        self.delay = Arc::new(delay);
        self
    }

    /// Token source for each `lock` call.
    #[must_use]
    pub fn with_token_generator(mut self, tokens: impl TokenGenerator + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    /// Name being configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate and build the mutex.
    ///
    /// # Errors
    ///
    /// [`LockError::InvalidConfig`] for an empty name, an expiry outside
    /// [`MIN_TTL`](crate::core::MIN_TTL)..=[`MAX_TTL`](crate::core::MAX_TTL) or zero tries.
    pub fn build(self) -> Result<Mutex<C>, LockError> {
        if self.name.is_empty() {
            return Err(LockError::InvalidConfig("mutex name must not be empty".into()));
        }
        check_ttl(self.expiry).map_err(LockError::InvalidConfig)?;
        if self.tries == 0 {
            return Err(LockError::InvalidConfig("tries must be at least 1".into()));
        }
        Ok(Mutex {
            name: self.name,
            expiry: self.expiry,
            tries: self.tries,
            delay: self.delay,
            tokens: self.tokens,
            factor: self.factor,
            quorum: self.quorum,
            client: self.client,
        })
    }
}
