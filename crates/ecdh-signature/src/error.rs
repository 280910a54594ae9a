use crate::signing::Curve;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported scheme \"{scheme}\" (supported: {})", .supported.join(", "))]
    InvalidScheme {
        scheme: String,
        supported: Vec<&'static str>,
    },
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A caller-supplied argument failed validation before reaching the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("The \"{name}\" argument is required.")]
    Required { name: &'static str },
    #[error("The \"{name}\" argument must be a string.")]
    NotAString { name: &'static str },
}

/// Failures surfaced by a [`PrimitivesProvider`](crate::signing::PrimitivesProvider).
///
/// A signature that does not verify is not an error; providers report it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("secure random generation failed: {0}")]
    Entropy(String),
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("invalid private key: {0}")]
    PrivateKey(String),
    #[error("invalid public key: {0}")]
    PublicKey(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("curve {0} is not supported by this provider")]
    UnsupportedCurve(Curve),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scheme_lists_supported_curves() {
        let error = Error::InvalidScheme {
            scheme: "not-a-real-curve".into(),
            supported: vec!["secp256k1", "prime256v1"],
        };
        assert_eq!(
            error.to_string(),
            "unsupported scheme \"not-a-real-curve\" (supported: secp256k1, prime256v1)"
        );
    }

    #[test]
    fn required_and_type_messages_are_distinct() {
        let required = InvalidArgument::Required { name: "data" };
        let not_a_string = InvalidArgument::NotAString { name: "data" };
        assert_eq!(required.to_string(), "The \"data\" argument is required.");
        assert_eq!(not_a_string.to_string(), "The \"data\" argument must be a string.");
    }

    #[test]
    fn invalid_argument_is_transparent() {
        let error: Error = InvalidArgument::Required { name: "signature" }.into();
        assert_eq!(error.to_string(), "The \"signature\" argument is required.");
    }

    #[test]
    fn provider_error_converts_unchanged() {
        let error: Error = ProviderError::Entropy("os rng unavailable".into()).into();
        assert!(matches!(error, Error::Provider(ProviderError::Entropy(_))));
        assert_eq!(error.to_string(), "secure random generation failed: os rng unavailable");
    }
}
