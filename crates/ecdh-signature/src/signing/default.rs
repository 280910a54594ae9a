use std::env::{self, VarError};
use std::sync::OnceLock;

use tracing::warn;

use super::context::SignatureContext;
use crate::error::Result;

pub const DEFAULT_SCHEME: &str = "secp256k1";
/// Environment variable whose value, when set, is the default context's passphrase.
pub const DEFAULT_PASSPHRASE_ENV: &str = "KEY";

static DEFAULT_CONTEXT: OnceLock<SignatureContext> = OnceLock::new();

/// Process-wide context on secp256k1, created on first use.
///
/// If two threads race to create it, one context wins and the other is dropped.
pub fn default_context() -> Result<&'static SignatureContext> {
    if let Some(context) = DEFAULT_CONTEXT.get() {
        return Ok(context);
    }

    let passphrase = passphrase_from_env(env::var(DEFAULT_PASSPHRASE_ENV));
    let context = SignatureContext::create(DEFAULT_SCHEME, passphrase.as_deref())?;
    Ok(DEFAULT_CONTEXT.get_or_init(|| context))
}

fn passphrase_from_env(value: std::result::Result<String, VarError>) -> Option<String> {
    match value {
        Ok(passphrase) => Some(passphrase),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            warn!(
                var = DEFAULT_PASSPHRASE_ENV,
                "passphrase is not valid unicode, using a random one"
            );
            None
        }
    }
}

/// Signs with the [default context](default_context).
pub fn sign(data: &str) -> Result<String> {
    default_context()?.sign(data)
}

/// Verifies with the [default context](default_context).
pub fn verify(data: &str, signature: &str) -> Result<bool> {
    default_context()?.verify(data, signature)
}
