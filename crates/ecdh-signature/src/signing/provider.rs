use zeroize::Zeroizing;

use super::curve::{Cipher, Curve, HashAlgorithm};
use crate::error::ProviderError;

/// A freshly generated key pair in interchange encodings.
#[derive(Clone)]
pub struct KeyPair {
    /// SPKI public key, PEM encoded.
    pub public_key_pem: String,
    /// PKCS#8 encrypted private key, PEM encoded, cipher parameters embedded.
    pub private_key_pem: String,
}

/// Cryptographic primitives a [`SignatureContext`](super::SignatureContext) is built on.
///
/// Implementations are sync and must be safe to call from several threads at once.
pub trait PrimitivesProvider: Send + Sync {
    /// Cryptographically secure random bytes.
    fn secure_random_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>, ProviderError>;

    /// PBKDF2 over the given HMAC hash. Deterministic for identical inputs.
    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        output_len: usize,
        hash: HashAlgorithm,
    ) -> Result<Zeroizing<Vec<u8>>, ProviderError>;

    /// Generates a key pair on `curve`, exporting the private half encrypted
    /// with `cipher` under `passphrase`.
    fn generate_ec_key_pair(
        &self,
        curve: Curve,
        cipher: Cipher,
        passphrase: &str,
    ) -> Result<KeyPair, ProviderError>;

    /// Decrypts the private key and signs `hash(message)`. Returns a DER signature.
    fn sign_digest(
        &self,
        private_key_pem: &str,
        passphrase: &str,
        hash: HashAlgorithm,
        message: &[u8],
    ) -> Result<Vec<u8>, ProviderError>;

    /// Checks a DER signature over `hash(message)`.
    ///
    /// Malformed or mismatched signatures yield `Ok(false)`.
    fn verify_digest(
        &self,
        public_key_pem: &str,
        curve: Curve,
        hash: HashAlgorithm,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError>;

    fn supported_curves(&self) -> &[Curve];
}
