mod signature;

pub use signature::{decode_signature, encode_signature};
