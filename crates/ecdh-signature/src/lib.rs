pub mod encoding;
pub mod error;
pub mod input;
pub mod signing;

pub use error::{Error, InvalidArgument, ProviderError, Result};
pub use signing::{
    Cipher, ContextBuilder, Curve, HashAlgorithm, KeyPair, PrimitivesProvider, RustCryptoProvider,
    SignatureContext, default_context, verify_with_provider, verify_with_public_key,
};
