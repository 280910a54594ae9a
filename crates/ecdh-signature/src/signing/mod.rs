mod context;
mod curve;
mod default;
mod protection;
mod provider;
mod rust_crypto;

pub use context::{
    ContextBuilder, SIGNATURE_HASH, SignatureContext, verify_with_provider, verify_with_public_key,
};
pub use curve::{Cipher, Curve, HashAlgorithm, UnknownCurve};
pub use default::{DEFAULT_PASSPHRASE_ENV, DEFAULT_SCHEME, default_context, sign, verify};
pub use protection::{GENERATED_PASSPHRASE_LEN, ITERATIONS, KEY_HASH, KEY_LEN, SALT_LEN};
pub use provider::{KeyPair, PrimitivesProvider};
pub use rust_crypto::RustCryptoProvider;
