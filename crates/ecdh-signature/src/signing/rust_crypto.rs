use pbkdf2::pbkdf2_hmac;
use pkcs8::der::SecretDocument;
use pkcs8::pkcs5::pbes2;
use pkcs8::{AssociatedOid, EncryptedPrivateKeyInfo, LineEnding, ObjectIdentifier, PrivateKeyInfo};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Sha256, Sha384, Sha512};
use tracing::trace;
use zeroize::Zeroizing;

use super::curve::{Cipher, Curve, HashAlgorithm};
use super::provider::{KeyPair, PrimitivesProvider};
use crate::error::ProviderError;

/// PBES2 iterations used when encrypting an exported private key.
const PBES2_ITERATIONS: u32 = 10_000;
const PBES2_SALT_LEN: usize = 16;
const AES_IV_LEN: usize = 16;
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
/// Random scalars outside `[1, n)` are redrawn.
const KEY_GENERATION_ATTEMPTS: usize = 8;

macro_rules! ecdsa_backend {
    ($backend:ident, $krate:ident) => {
        mod $backend {
            use $krate::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
            use $krate::ecdsa::{Signature, SigningKey, VerifyingKey};
            use $krate::{PublicKey, SecretKey};
            use pkcs8::der::SecretDocument;
            use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};

            use crate::error::ProviderError;

            /// Returns `None` when `scalar` is not a valid private scalar on this curve.
            pub(super) fn key_pair_from_scalar(
                scalar: &[u8],
            ) -> Result<Option<(String, SecretDocument)>, ProviderError> {
                let Ok(secret_key) = SecretKey::from_slice(scalar) else {
                    return Ok(None);
                };
                let public_key_pem = secret_key
                    .public_key()
                    .to_public_key_pem(LineEnding::LF)
                    .map_err(|e| ProviderError::KeyGeneration(format!("encoding public key: {e}")))?;
                let private_key_der = secret_key
                    .to_pkcs8_der()
                    .map_err(|e| ProviderError::KeyGeneration(format!("encoding private key: {e}")))?;
                Ok(Some((public_key_pem, private_key_der)))
            }

            pub(super) fn sign_prehash(
                private_key_der: &[u8],
                prehash: &[u8],
            ) -> Result<Vec<u8>, ProviderError> {
                let secret_key = SecretKey::from_pkcs8_der(private_key_der)
                    .map_err(|e| ProviderError::PrivateKey(e.to_string()))?;
                let signing_key = SigningKey::from(secret_key);
                let signature: Signature = signing_key
                    .sign_prehash(prehash)
                    .map_err(|e| ProviderError::Signing(format!("sign_prehash failed: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }

            pub(super) fn verify_prehash(
                public_key_pem: &str,
                prehash: &[u8],
                signature: &[u8],
            ) -> Result<bool, ProviderError> {
                let public_key = PublicKey::from_public_key_pem(public_key_pem)
                    .map_err(|e| ProviderError::PublicKey(e.to_string()))?;
                let Ok(signature) = Signature::from_der(signature) else {
                    return Ok(false);
                };
                // (r, n - s) is as valid as (r, s); k256 only accepts the low-S form.
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(VerifyingKey::from(&public_key)
                    .verify_prehash(prehash, &signature)
                    .is_ok())
            }
        }
    };
}

ecdsa_backend!(secp256k1, k256);
ecdsa_backend!(prime256v1, p256);
ecdsa_backend!(secp384r1, p384);

fn curve_oid(curve: Curve) -> ObjectIdentifier {
    match curve {
        Curve::Secp256k1 => k256::Secp256k1::OID,
        Curve::Prime256v1 => p256::NistP256::OID,
        Curve::Secp384r1 => p384::NistP384::OID,
    }
}

/// [`PrimitivesProvider`] backed by the RustCrypto elliptic-curve, PBKDF2 and PKCS#8 crates.
///
/// Private keys are exported as PKCS#8 `EncryptedPrivateKeyInfo` using PBES2
/// (PBKDF2-HMAC-SHA256 with a fresh salt and IV) and AES-CBC.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    fn fill_random(&self, buf: &mut [u8]) -> Result<(), ProviderError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| ProviderError::Entropy(e.to_string()))
    }

    fn encrypt_private_key(
        &self,
        private_key_der: &SecretDocument,
        cipher: Cipher,
        passphrase: &str,
    ) -> Result<String, ProviderError> {
        let mut salt = [0u8; PBES2_SALT_LEN];
        let mut iv = [0u8; AES_IV_LEN];
        self.fill_random(&mut salt)?;
        self.fill_random(&mut iv)?;

        let params = match cipher {
            Cipher::Aes128Cbc => pbes2::Parameters::pbkdf2_sha256_aes128cbc(PBES2_ITERATIONS, &salt, &iv),
            Cipher::Aes256Cbc => pbes2::Parameters::pbkdf2_sha256_aes256cbc(PBES2_ITERATIONS, &salt, &iv),
        }
        .map_err(|e| ProviderError::KeyGeneration(format!("building {cipher} parameters: {e}")))?;

        let info = PrivateKeyInfo::try_from(private_key_der.as_bytes())
            .map_err(|e| ProviderError::KeyGeneration(e.to_string()))?;
        let encrypted = info
            .encrypt_with_params(params, passphrase)
            .map_err(|e| ProviderError::KeyGeneration(format!("encrypting private key: {e}")))?;
        let pem = encrypted
            .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
            .map_err(|e| ProviderError::KeyGeneration(e.to_string()))?;
        Ok(pem.as_str().to_owned())
    }

    /// Decrypts an encrypted PEM private key, returning its curve and plaintext PKCS#8 DER.
    fn decrypt_private_key(
        &self,
        private_key_pem: &str,
        passphrase: &str,
    ) -> Result<(Curve, SecretDocument), ProviderError> {
        let (label, document) = SecretDocument::from_pem(private_key_pem)
            .map_err(|e| ProviderError::PrivateKey(e.to_string()))?;
        if label != ENCRYPTED_PRIVATE_KEY_LABEL {
            return Err(ProviderError::PrivateKey(format!(
                "unexpected PEM label \"{label}\""
            )));
        }

        let encrypted = EncryptedPrivateKeyInfo::try_from(document.as_bytes())
            .map_err(|e| ProviderError::PrivateKey(e.to_string()))?;
        let plaintext = encrypted
            .decrypt(passphrase)
            .map_err(|e| ProviderError::PrivateKey(format!("decrypting private key: {e}")))?;

        let oid = PrivateKeyInfo::try_from(plaintext.as_bytes())
            .map_err(|e| ProviderError::PrivateKey(e.to_string()))?
            .algorithm
            .parameters_oid()
            .map_err(|e| ProviderError::PrivateKey(format!("missing curve parameters: {e}")))?;
        let curve = Curve::ALL
            .into_iter()
            .find(|curve| curve_oid(*curve) == oid)
            .ok_or_else(|| ProviderError::PrivateKey(format!("unsupported curve OID {oid}")))?;

        Ok((curve, plaintext))
    }
}

impl PrimitivesProvider for RustCryptoProvider {
    fn secure_random_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        self.fill_random(&mut bytes)?;
        Ok(bytes)
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        output_len: usize,
        hash: HashAlgorithm,
    ) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
        if iterations == 0 {
            return Err(ProviderError::KeyDerivation(
                "iteration count must be non-zero".into(),
            ));
        }
        if output_len == 0 {
            return Err(ProviderError::KeyDerivation(
                "output length must be non-zero".into(),
            ));
        }

        let mut output = Zeroizing::new(vec![0u8; output_len]);
        match hash {
            HashAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output),
            HashAlgorithm::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, iterations, &mut output),
            HashAlgorithm::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut output),
        }
        Ok(output)
    }

    fn generate_ec_key_pair(
        &self,
        curve: Curve,
        cipher: Cipher,
        passphrase: &str,
    ) -> Result<KeyPair, ProviderError> {
        if !self.supported_curves().contains(&curve) {
            return Err(ProviderError::UnsupportedCurve(curve));
        }

        for _ in 0..KEY_GENERATION_ATTEMPTS {
            let scalar = self.secure_random_bytes(curve.scalar_len())?;
            let generated = match curve {
                Curve::Secp256k1 => secp256k1::key_pair_from_scalar(&scalar)?,
                Curve::Prime256v1 => prime256v1::key_pair_from_scalar(&scalar)?,
                Curve::Secp384r1 => secp384r1::key_pair_from_scalar(&scalar)?,
            };

            if let Some((public_key_pem, private_key_der)) = generated {
                let private_key_pem = self.encrypt_private_key(&private_key_der, cipher, passphrase)?;
                trace!(%curve, %cipher, "generated key pair");
                return Ok(KeyPair {
                    public_key_pem,
                    private_key_pem,
                });
            }
        }

        Err(ProviderError::KeyGeneration(format!(
            "no valid {curve} scalar after {KEY_GENERATION_ATTEMPTS} attempts"
        )))
    }

    fn sign_digest(
        &self,
        private_key_pem: &str,
        passphrase: &str,
        hash: HashAlgorithm,
        message: &[u8],
    ) -> Result<Vec<u8>, ProviderError> {
        let (curve, private_key_der) = self.decrypt_private_key(private_key_pem, passphrase)?;
        let prehash = hash.digest(message);
        trace!(%curve, hash = hash.name(), "signing digest");

        match curve {
            Curve::Secp256k1 => secp256k1::sign_prehash(private_key_der.as_bytes(), &prehash),
            Curve::Prime256v1 => prime256v1::sign_prehash(private_key_der.as_bytes(), &prehash),
            Curve::Secp384r1 => secp384r1::sign_prehash(private_key_der.as_bytes(), &prehash),
        }
    }

    fn verify_digest(
        &self,
        public_key_pem: &str,
        curve: Curve,
        hash: HashAlgorithm,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, ProviderError> {
        let prehash = hash.digest(message);
        trace!(%curve, hash = hash.name(), "verifying digest");

        match curve {
            Curve::Secp256k1 => secp256k1::verify_prehash(public_key_pem, &prehash, signature),
            Curve::Prime256v1 => prime256v1::verify_prehash(public_key_pem, &prehash, signature),
            Curve::Secp384r1 => secp384r1::verify_prehash(public_key_pem, &prehash, signature),
        }
    }

    fn supported_curves(&self) -> &[Curve] {
        &Curve::ALL
    }
}
