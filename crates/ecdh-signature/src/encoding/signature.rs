use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Standard alphabet, no padding on encode, padding optional on decode.
const SIGNATURE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes raw signature bytes as standard base64 with trailing `=` stripped.
pub fn encode_signature(signature: &[u8]) -> String {
    SIGNATURE_ENGINE.encode(signature)
}

/// Decodes a padded or unpadded standard base64 signature.
///
/// Returns `None` for input that is not base64 at all.
pub fn decode_signature(encoded: &str) -> Option<Vec<u8>> {
    SIGNATURE_ENGINE.decode(encoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn encoding_strips_padding() {
        assert_eq!(encode_signature(b"f"), "Zg");
        assert_eq!(encode_signature(b"fo"), "Zm8");
        assert_eq!(encode_signature(b"foo"), "Zm9v");
    }

    #[test]
    fn matches_standard_encoding_without_trailing_equals() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let padded = STANDARD.encode(&bytes);
        assert_eq!(encode_signature(&bytes), padded.trim_end_matches('='));
    }

    #[test]
    fn decodes_padded_and_unpadded() {
        assert_eq!(decode_signature("Zm8").unwrap(), b"fo");
        assert_eq!(decode_signature("Zm8=").unwrap(), b"fo");
        assert_eq!(decode_signature("Zg==").unwrap(), b"f");
    }

    #[test]
    fn rejects_non_base64() {
        assert_eq!(decode_signature("not-a-signature"), None);
        assert_eq!(decode_signature("%%%"), None);
    }
}
