use std::fmt;

use zeroize::Zeroizing;

use super::curve::HashAlgorithm;
use super::provider::PrimitivesProvider;
use crate::error::ProviderError;

/// Length of the random passphrase generated when the caller supplies none.
pub const GENERATED_PASSPHRASE_LEN: usize = 16;
pub const SALT_LEN: usize = 16;
pub const ITERATIONS: u32 = 10_000;
pub const KEY_LEN: usize = 64;
pub const KEY_HASH: HashAlgorithm = HashAlgorithm::Sha512;

/// Hex-encoded secret that encrypts a context's private key at rest.
///
/// Derived with PBKDF2-HMAC-SHA512 over a fresh 16-byte salt. The salt is
/// discarded, so the key cannot be re-derived from the same passphrase later;
/// it only lives as long as the context holding it.
pub(crate) struct ProtectionKey(Zeroizing<String>);

impl ProtectionKey {
    pub(crate) fn derive<P>(provider: &P, passphrase: Option<&str>) -> Result<Self, ProviderError>
    where
        P: PrimitivesProvider + ?Sized,
    {
        let generated;
        let password: &[u8] = match passphrase {
            Some(passphrase) => passphrase.as_bytes(),
            None => {
                generated = provider.secure_random_bytes(GENERATED_PASSPHRASE_LEN)?;
                &generated
            }
        };

        let salt = provider.secure_random_bytes(SALT_LEN)?;
        let derived = provider.derive_key(password, &salt, ITERATIONS, KEY_LEN, KEY_HASH)?;
        Ok(Self(Zeroizing::new(hex::encode(derived.as_slice()))))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProtectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProtectionKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::RustCryptoProvider;

    #[test]
    fn derived_key_is_128_hex_chars() {
        let key = ProtectionKey::derive(&RustCryptoProvider, None).unwrap();
        assert_eq!(key.expose().len(), KEY_LEN * 2);
        assert!(key.expose().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_passphrase_derives_different_keys() {
        let a = ProtectionKey::derive(&RustCryptoProvider, Some("hunter2")).unwrap();
        let b = ProtectionKey::derive(&RustCryptoProvider, Some("hunter2")).unwrap();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn debug_is_redacted() {
        let key = ProtectionKey::derive(&RustCryptoProvider, Some("hunter2")).unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "ProtectionKey([REDACTED])");
        assert!(!debug.contains(key.expose()));
    }
}
