use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Named elliptic curves a key pair can be generated on.
///
/// Canonical names follow the OpenSSL short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    Secp256k1,
    Prime256v1,
    Secp384r1,
}

impl Curve {
    pub const ALL: [Curve; 3] = [Curve::Secp256k1, Curve::Prime256v1, Curve::Secp384r1];

    pub fn name(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::Prime256v1 => "prime256v1",
            Curve::Secp384r1 => "secp384r1",
        }
    }

    /// Looks up a curve by canonical name or a common alias (`secp256r1`, `P-256`, `P-384`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "secp256k1" => Some(Curve::Secp256k1),
            "prime256v1" | "secp256r1" | "P-256" => Some(Curve::Prime256v1),
            "secp384r1" | "P-384" => Some(Curve::Secp384r1),
            _ => None,
        }
    }

    /// Length in bytes of a private scalar on this curve.
    pub fn scalar_len(self) -> usize {
        match self {
            Curve::Secp256k1 | Curve::Prime256v1 => 32,
            Curve::Secp384r1 => 48,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown curve: {0}")]
pub struct UnknownCurve(pub String);

impl FromStr for Curve {
    type Err = UnknownCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Curve::from_name(s).ok_or_else(|| UnknownCurve(s.to_string()))
    }
}

/// Hash functions used for key derivation and digest signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Symmetric cipher protecting the exported private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cipher {
    Aes128Cbc,
    #[default]
    Aes256Cbc,
}

impl Cipher {
    pub fn name(self) -> &'static str {
        match self {
            Cipher::Aes128Cbc => "aes-128-cbc",
            Cipher::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for curve in Curve::ALL {
            assert_eq!(Curve::from_name(curve.name()), Some(curve));
            assert_eq!(curve.to_string(), curve.name());
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(Curve::from_name("secp256r1"), Some(Curve::Prime256v1));
        assert_eq!(Curve::from_name("P-256"), Some(Curve::Prime256v1));
        assert_eq!(Curve::from_name("P-384"), Some(Curve::Secp384r1));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Curve::from_name(""), None);
        assert_eq!(Curve::from_name("SECP256K1"), None);
        let err = "curve25519".parse::<Curve>().unwrap_err();
        assert_eq!(err.to_string(), "unknown curve: curve25519");
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(HashAlgorithm::Sha256.digest(b"foo").len(), 32);
        assert_eq!(HashAlgorithm::Sha384.digest(b"foo").len(), 48);
        assert_eq!(HashAlgorithm::Sha512.digest(b"foo").len(), 64);
    }

    #[test]
    fn sha256_known_digest() {
        assert_eq!(
            hex::encode(HashAlgorithm::Sha256.digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn default_cipher_is_aes_256_cbc() {
        assert_eq!(Cipher::default(), Cipher::Aes256Cbc);
        assert_eq!(Cipher::default().to_string(), "aes-256-cbc");
    }
}
