//! Transfer codec — splitting text into frames and assembling it back.
//!
//! # Encode
//!
//! ```text
//! text ──digest──► content hash (hex)
//!      ──base64──► printable payload ──chunk──► ["...", "...", ...]
//!                                         │
//!                                         ▼
//!                              Frame { d, i, t, H, c } per chunk
//! ```
//!
//! # Assemble
//!
//! The reverse path over a complete index→payload map: learn `(t, H)`
//! from any member, demand exactly `t` entries, concatenate the chunks
//! in index order, reverse the base64, and require the reassembled text
//! to hash back to `H`. Any corruption, truncation, or reordering that
//! slipped past per-frame checks fails here — there is no silent path to
//! a wrong result.

use std::collections::BTreeMap;

use crate::config;
use crate::digest;
use crate::error::QcastError;
use crate::frame::Frame;

// ── Transfer (encode side) ───────────────────────────────────────

/// An encoded transfer: the ordered frames plus the shared hash/total.
///
/// A value, not a managed object — computed once from the source text
/// and handed to the renderer, never mutated afterward.
#[derive(Debug, Clone)]
pub struct Transfer {
    /// One frame per chunk, in index order.
    pub frames: Vec<Frame>,

    /// Digest of the original text, shared by every frame.
    pub hash: String,

    /// Total frame count.
    pub total: u32,
}

impl Transfer {
    /// Serialize every frame once, in index order, for the renderer.
    pub fn payloads(&self) -> Result<Vec<String>, QcastError> {
        self.frames.iter().map(Frame::to_payload).collect()
    }
}

/// A verified assembly result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The reconstructed original text.
    pub text: String,

    /// Its content digest, equal to the transfer's shared hash.
    pub hash: String,
}

// ── Encode ───────────────────────────────────────────────────────

/// Encode `text` into frames using the default chunk size.
pub fn encode(text: &str) -> Result<Transfer, QcastError> {
    encode_with(text, config::CHUNK_SIZE)
}

/// Encode `text` into frames of at most `chunk_size` base64 characters.
///
/// Empty text still yields exactly one frame with an empty chunk, so an
/// empty transfer stays representable and distinguishable from "no
/// frames received".
pub fn encode_with(text: &str, chunk_size: usize) -> Result<Transfer, QcastError> {
    if chunk_size == 0 {
        return Err(QcastError::InvalidConfig("chunk size must be non-zero"));
    }

    let hash = digest::content_digest(text);
    let encoded = digest::encode_text(text);
    let chunks = chunkify(&encoded, chunk_size);
    let total = chunks.len() as u32;

    let frames = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| Frame::new(chunk, index as u32, total, hash.clone()))
        .collect();

    Ok(Transfer {
        frames,
        hash,
        total,
    })
}

/// Split a base64 payload into contiguous, order-preserving chunks.
fn chunkify(encoded: &str, chunk_size: usize) -> Vec<String> {
    if encoded.is_empty() {
        return vec![String::new()];
    }
    // Base64 output is pure ASCII, so byte offsets are char boundaries.
    (0..encoded.len())
        .step_by(chunk_size)
        .map(|start| {
            let end = (start + chunk_size).min(encoded.len());
            encoded[start..end].to_string()
        })
        .collect()
}

// ── Assemble ─────────────────────────────────────────────────────

/// Reconstruct and verify the original text from a complete frame set.
///
/// The map is keyed by chunk index and holds the raw scanned payloads;
/// insertion order is irrelevant.
pub fn assemble(frames: &BTreeMap<u32, String>) -> Result<Decoded, QcastError> {
    let first = match frames.values().next() {
        Some(payload) => Frame::parse(payload)?,
        None => return Err(QcastError::EmptyStream),
    };
    let total = first.total;
    let expected_hash = first.content_hash;

    if frames.len() as u32 != total {
        return Err(QcastError::Incomplete {
            received: frames.len() as u32,
            total,
        });
    }

    let mut encoded = String::new();
    for index in 0..total {
        let payload = frames
            .get(&index)
            .ok_or(QcastError::MissingFrame { index })?;
        let frame = Frame::parse(payload)?;
        if frame.index != index || frame.total != total {
            return Err(QcastError::IndexMismatch { index });
        }
        encoded.push_str(&frame.data);
    }

    let text = digest::decode_text(&encoded)?;
    let actual = digest::content_digest(&text);
    if actual != expected_hash {
        return Err(QcastError::HashMismatch {
            expected: expected_hash,
            actual,
        });
    }

    Ok(Decoded { text, hash: actual })
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Map every frame of a transfer by its index, as scanned payloads.
    fn payload_map(transfer: &Transfer) -> BTreeMap<u32, String> {
        transfer
            .frames
            .iter()
            .map(|f| (f.index, f.to_payload().unwrap()))
            .collect()
    }

    #[test]
    fn single_frame_roundtrip() {
        let text = "WriterDesk loves air-gapped workflows.";
        let transfer = encode(text).unwrap();
        assert_eq!(transfer.total, 1);
        assert_eq!(transfer.frames.len(), 1);

        let decoded = assemble(&payload_map(&transfer)).unwrap();
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.hash, transfer.hash);
    }

    #[test]
    fn empty_text_is_one_empty_frame() {
        let transfer = encode("").unwrap();
        assert_eq!(transfer.total, 1);
        assert_eq!(transfer.frames[0].data, "");

        let decoded = assemble(&payload_map(&transfer)).unwrap();
        assert_eq!(decoded.text, "");
    }

    #[test]
    fn thousand_chars_make_six_frames() {
        let text: String = "abcdefghij".repeat(100);
        let transfer = encode(&text).unwrap();

        // 1000 bytes → 1336 base64 chars → ceil(1336 / 250) frames.
        let encoded_len = digest::encode_text(&text).len();
        assert_eq!(transfer.total, encoded_len.div_ceil(250) as u32);
        assert_eq!(transfer.total, 6);

        let decoded = assemble(&payload_map(&transfer)).unwrap();
        assert_eq!(decoded.text, text);
    }

    #[test]
    fn chunk_boundaries_exact_multiple() {
        // "aaa" encodes to exactly 4 chars; chunk size 2 → 2 full chunks.
        let transfer = encode_with("aaa", 2).unwrap();
        assert_eq!(transfer.total, 2);
        assert_eq!(transfer.frames[0].data.len(), 2);
        assert_eq!(transfer.frames[1].data.len(), 2);
        assert_eq!(assemble(&payload_map(&transfer)).unwrap().text, "aaa");
    }

    #[test]
    fn multibyte_text_across_many_small_chunks() {
        let text = "árvíztűrő tükörfúrógép — 日本語のテキスト 📝";
        let transfer = encode_with(text, 7).unwrap();
        assert!(transfer.total > 5);
        assert_eq!(assemble(&payload_map(&transfer)).unwrap().text, text);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(matches!(
            encode_with("x", 0),
            Err(QcastError::InvalidConfig(_))
        ));
    }

    #[test]
    fn payloads_match_total() {
        let transfer = encode_with("some longer body of text", 4).unwrap();
        assert_eq!(transfer.payloads().unwrap().len(), transfer.total as usize);
    }

    #[test]
    fn empty_map_is_empty_stream() {
        assert!(matches!(
            assemble(&BTreeMap::new()),
            Err(QcastError::EmptyStream)
        ));
    }

    #[test]
    fn short_map_is_incomplete() {
        let transfer = encode_with("0123456789", 4).unwrap();
        let mut map = payload_map(&transfer);
        map.remove(&1);
        assert!(matches!(
            assemble(&map),
            Err(QcastError::Incomplete { received, total })
                if received == transfer.total - 1 && total == transfer.total
        ));
    }

    #[test]
    fn gap_with_matching_count_is_missing_frame() {
        let transfer = encode_with("0123456789", 8).unwrap();
        assert_eq!(transfer.total, 2);

        // Same entry count as the total, but index 1 is keyed wrong.
        let mut map = payload_map(&transfer);
        let stray = map.remove(&1).unwrap();
        map.insert(7, stray);
        assert!(matches!(
            assemble(&map),
            Err(QcastError::MissingFrame { index: 1 })
        ));
    }

    #[test]
    fn cross_talk_is_index_mismatch() {
        let ours = encode_with("first document body", 8).unwrap();
        let theirs = encode_with("a different, longer document body", 8).unwrap();
        assert_ne!(ours.total, theirs.total);

        let mut map = payload_map(&ours);
        map.insert(1, theirs.frames[1].to_payload().unwrap());
        assert!(matches!(
            assemble(&map),
            Err(QcastError::IndexMismatch { index: 1 })
        ));
    }

    #[test]
    fn tampered_chunk_is_hash_mismatch() {
        let transfer = encode_with("integrity matters", 8).unwrap();
        let mut map = payload_map(&transfer);

        // Rebuild frame 1 with altered data and a self-consistent
        // advisory digest: only the end-to-end hash can catch it.
        let victim = &transfer.frames[1];
        let tampered = Frame::new("QUFBQUFB", victim.index, victim.total, transfer.hash.clone());
        map.insert(1, tampered.to_payload().unwrap());

        assert!(matches!(
            assemble(&map),
            Err(QcastError::HashMismatch { .. })
        ));
    }

    #[test]
    fn same_shape_different_transfer_is_hash_mismatch() {
        // Equal totals and indices, different content: the per-frame
        // guards all pass and the final digest is the only tripwire.
        let ours = encode_with("aaaa", 4).unwrap();
        let theirs = encode_with("bbbb", 4).unwrap();
        assert_eq!(ours.total, theirs.total);

        let mut map = payload_map(&ours);
        map.insert(1, theirs.frames[1].to_payload().unwrap());
        assert!(matches!(
            assemble(&map),
            Err(QcastError::HashMismatch { .. })
        ));
    }
}
