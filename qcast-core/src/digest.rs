//! Content digests and the binary-safe text encoding.
//!
//! Two independent primitives, both pure and stateless:
//!
//! - Blake3 digests, rendered as lowercase hex. The full digest of the
//!   original text is the single end-to-end integrity check; a truncated
//!   digest over one chunk gives a cheap per-frame screen.
//! - Base64 (standard alphabet) as the reversible mapping between
//!   arbitrary UTF-8 text and a printable-ASCII payload that fits a
//!   visual symbol.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::QcastError;

/// Hex length of a full content digest (Blake3, 32 bytes).
pub const CONTENT_DIGEST_LEN: usize = 64;

/// Hex length of a truncated per-chunk digest.
pub const CHUNK_DIGEST_LEN: usize = 16;

/// Full Blake3 digest of `text`, as a lowercase hex string.
///
/// Computed over the raw text, before any transport encoding.
pub fn content_digest(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Truncated Blake3 digest of a single chunk payload.
pub fn chunk_digest(chunk: &str) -> String {
    let hex = blake3::hash(chunk.as_bytes()).to_hex();
    hex[..CHUNK_DIGEST_LEN].to_string()
}

/// Whether `text` hashes to `expected`.
pub fn verify_digest(text: &str, expected: &str) -> bool {
    content_digest(text) == expected
}

/// Encode arbitrary UTF-8 text as a printable-ASCII base64 string.
pub fn encode_text(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Reverse [`encode_text`], recovering the original text.
pub fn decode_text(encoded: &str) -> Result<String, QcastError> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_digest_is_full_hex() {
        let d = content_digest("hello");
        assert_eq!(d.len(), CONTENT_DIGEST_LEN);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_stable_and_discriminating() {
        assert_eq!(content_digest("abc"), content_digest("abc"));
        assert_ne!(content_digest("abc"), content_digest("abd"));
        assert_ne!(content_digest(""), content_digest(" "));
    }

    #[test]
    fn chunk_digest_is_truncated_content_digest() {
        let full = content_digest("payload");
        assert_eq!(chunk_digest("payload"), full[..CHUNK_DIGEST_LEN]);
    }

    #[test]
    fn verify_digest_matches() {
        let d = content_digest("körte");
        assert!(verify_digest("körte", &d));
        assert!(!verify_digest("korte", &d));
    }

    #[test]
    fn encode_known_vector() {
        assert_eq!(encode_text("Hello"), "SGVsbG8=");
        assert_eq!(encode_text(""), "");
    }

    #[test]
    fn roundtrip_ascii_and_unicode() {
        for text in ["", "plain ascii", "árvíztűrő tükörfúrógép", "日本語 📝"] {
            let encoded = encode_text(text);
            assert!(encoded.is_ascii());
            assert_eq!(decode_text(&encoded).unwrap(), text);
        }
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_text("not base64!!"),
            Err(QcastError::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        // 0xFF is valid base64 content but not valid UTF-8.
        assert!(matches!(
            decode_text("/w=="),
            Err(QcastError::InvalidUtf8(_))
        ));
    }
}
