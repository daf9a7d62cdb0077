//! Ownership token generation.
//!
//! A token is the credential that proves a lease belongs to its holder. It is
//! compared by the store, never parsed, so any non-empty string works. The
//! default generator draws 128 bits from the operating system and encodes them
//! as standard base-64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::core::LockError;

/// Number of random bytes in a default token.
pub const TOKEN_BYTES: usize = 16;

/// Source of lease ownership tokens.
///
/// Any `Fn() -> Result<String, LockError>` closure is a generator.
pub trait TokenGenerator: Send + Sync {
    /// Produce a fresh token for one `lock` call.
    fn generate(&self) -> Result<String, LockError>;
}

impl<F> TokenGenerator for F
where
    F: Fn() -> Result<String, LockError> + Send + Sync,
{
    fn generate(&self) -> Result<String, LockError> {
        self()
    }
}

/// Cryptographically random 128-bit token, base-64 encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomToken;

impl TokenGenerator for RandomToken {
    fn generate(&self) -> Result<String, LockError> {
        random_token()
    }
}

/// Draw [`TOKEN_BYTES`] from the OS entropy source and base-64 encode them.
pub fn random_token() -> Result<String, LockError> {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| LockError::TokenGeneration(e.to_string()))?;
    Ok(STANDARD.encode(buf))
}

/// Run a generator and reject empty tokens, which the store could not tell
/// apart from a missing value.
pub(crate) fn fresh_token(generator: &dyn TokenGenerator) -> Result<String, LockError> {
    let token = generator.generate()?;
    if token.is_empty() {
        return Err(LockError::TokenGeneration("generator returned an empty token".into()));
    }
    Ok(token)
}
