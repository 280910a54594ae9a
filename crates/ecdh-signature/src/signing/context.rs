use std::fmt;

use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use super::curve::{Cipher, Curve, HashAlgorithm};
use super::protection::ProtectionKey;
use super::provider::PrimitivesProvider;
use super::rust_crypto::RustCryptoProvider;
use crate::encoding::{decode_signature, encode_signature};
use crate::error::{Error, Result};
use crate::input;

/// Digest signed and verified by every context.
pub const SIGNATURE_HASH: HashAlgorithm = HashAlgorithm::Sha256;

/// An elliptic-curve key pair with a private key encrypted at rest.
///
/// The public and private halves come from a single key-generation call and
/// never change. The private key is only ever decrypted inside the provider's
/// `sign_digest`, so `&self` is all `sign` and `verify` need.
pub struct SignatureContext<P = RustCryptoProvider> {
    curve: Curve,
    protection_key: ProtectionKey,
    public_key_pem: String,
    private_key_pem: String,
    provider: P,
}

impl SignatureContext {
    /// Creates a context on the named curve.
    ///
    /// Without a passphrase, 16 random bytes are used as the derivation input.
    pub fn create(scheme: &str, passphrase: Option<&str>) -> Result<Self> {
        let mut builder = Self::builder(scheme);
        if let Some(passphrase) = passphrase {
            builder = builder.passphrase(passphrase);
        }
        builder.build()
    }

    pub fn builder(scheme: impl Into<String>) -> ContextBuilder {
        ContextBuilder {
            scheme: scheme.into(),
            passphrase: None,
            cipher: Cipher::default(),
            provider: RustCryptoProvider,
        }
    }
}

impl<P: PrimitivesProvider> SignatureContext<P> {
    /// Signs the UTF-8 bytes of `data` with ECDSA over SHA-256.
    ///
    /// Returns the DER signature in standard base64 with the padding stripped.
    /// Signing is randomized, so repeated calls may return different strings.
    pub fn sign(&self, data: &str) -> Result<String> {
        let data = input::require_data(data)?;
        let signature = self.provider.sign_digest(
            &self.private_key_pem,
            self.protection_key.expose(),
            SIGNATURE_HASH,
            data.as_bytes(),
        )?;
        Ok(encode_signature(&signature))
    }

    /// Checks `signature` against `data` using this context's own public key.
    ///
    /// A malformed or mismatched signature is `Ok(false)`. Only invalid `data`
    /// or a provider failure is an error.
    pub fn verify(&self, data: &str, signature: &str) -> Result<bool> {
        verify_with_provider(
            &self.provider,
            self.curve,
            &self.public_key_pem,
            data,
            signature,
        )
    }

    /// [`sign`](Self::sign) for loosely typed input.
    pub fn sign_value(&self, data: &Value) -> Result<String> {
        self.sign(input::data_from_value(data)?)
    }

    /// [`verify`](Self::verify) for loosely typed input.
    pub fn verify_value(&self, data: &Value, signature: &Value) -> Result<bool> {
        let data = input::data_from_value(data)?;
        let signature = input::signature_from_value(signature)?;
        self.verify(data, signature)
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn scheme(&self) -> &'static str {
        self.curve.name()
    }

    /// SPKI public key, PEM encoded. Safe to share.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }
}

impl<P> fmt::Debug for SignatureContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureContext")
            .field("curve", &self.curve)
            .field("public_key_pem", &self.public_key_pem)
            .finish_non_exhaustive()
    }
}

/// Configures and builds a [`SignatureContext`].
pub struct ContextBuilder<P = RustCryptoProvider> {
    scheme: String,
    passphrase: Option<Zeroizing<String>>,
    cipher: Cipher,
    provider: P,
}

impl<P> ContextBuilder<P> {
    /// Derive the protection key from this passphrase instead of random bytes.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    pub fn cipher(mut self, cipher: Cipher) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn provider<Q: PrimitivesProvider>(self, provider: Q) -> ContextBuilder<Q> {
        ContextBuilder {
            scheme: self.scheme,
            passphrase: self.passphrase,
            cipher: self.cipher,
            provider,
        }
    }
}

impl<P: PrimitivesProvider> ContextBuilder<P> {
    pub fn build(self) -> Result<SignatureContext<P>> {
        let supported = self.provider.supported_curves();
        let curve = Curve::from_name(&self.scheme)
            .filter(|curve| supported.contains(curve))
            .ok_or_else(|| Error::InvalidScheme {
                scheme: self.scheme.clone(),
                supported: supported.iter().map(|curve| curve.name()).collect(),
            })?;

        let protection_key =
            ProtectionKey::derive(&self.provider, self.passphrase.as_deref().map(String::as_str))?;
        let key_pair =
            self.provider
                .generate_ec_key_pair(curve, self.cipher, protection_key.expose())?;

        debug!(
            %curve,
            cipher = %self.cipher,
            passphrase_supplied = self.passphrase.is_some(),
            "created signature context"
        );

        Ok(SignatureContext {
            curve,
            protection_key,
            public_key_pem: key_pair.public_key_pem,
            private_key_pem: key_pair.private_key_pem,
            provider: self.provider,
        })
    }
}

/// Verifies a signature produced by any context, given only its public key.
///
/// Uses [`RustCryptoProvider`]; see [`verify_with_provider`] for other providers.
pub fn verify_with_public_key(
    curve: Curve,
    public_key_pem: &str,
    data: &str,
    signature: &str,
) -> Result<bool> {
    verify_with_provider(&RustCryptoProvider, curve, public_key_pem, data, signature)
}

/// Verifies a base64 signature over `data` against a PEM public key through `provider`.
///
/// Fails with [`Error::InvalidScheme`] when `provider` does not support `curve`.
pub fn verify_with_provider<P>(
    provider: &P,
    curve: Curve,
    public_key_pem: &str,
    data: &str,
    signature: &str,
) -> Result<bool>
where
    P: PrimitivesProvider + ?Sized,
{
    let data = input::require_data(data)?;
    let supported = provider.supported_curves();
    if !supported.contains(&curve) {
        return Err(Error::InvalidScheme {
            scheme: curve.name().to_string(),
            supported: supported.iter().map(|curve| curve.name()).collect(),
        });
    }
    let Some(signature) = decode_signature(signature) else {
        debug!(%curve, "signature is not base64, treating as invalid");
        return Ok(false);
    };
    let verified = provider.verify_digest(
        public_key_pem,
        curve,
        SIGNATURE_HASH,
        data.as_bytes(),
        &signature,
    )?;
    Ok(verified)
}
