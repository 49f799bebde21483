//! Newline-delimited payload framing for harness transports.
//!
//! The real channel is visual; this codec lets the sender and receiver
//! harnesses carry the same serialized payloads over stdio or any byte
//! stream, one frame per line.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config;
use crate::error::QcastError;

pub struct PayloadLineCodec {
    max_length: usize,
}

impl PayloadLineCodec {
    pub fn new() -> Self {
        Self {
            max_length: config::SYMBOL_CAPACITY,
        }
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for PayloadLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for PayloadLineCodec {
    type Item = String;
    type Error = QcastError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, QcastError> {
        match src.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                if pos > self.max_length {
                    return Err(QcastError::FrameTooLarge {
                        size: pos,
                        max: self.max_length,
                    });
                }
                let line = src.split_to(pos + 1);
                let mut end = pos;
                if end > 0 && line[end - 1] == b'\r' {
                    end -= 1;
                }
                Ok(Some(String::from_utf8(line[..end].to_vec())?))
            }
            None if src.len() > self.max_length => Err(QcastError::FrameTooLarge {
                size: src.len(),
                max: self.max_length,
            }),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, QcastError> {
        match self.decode(src)? {
            Some(payload) => Ok(Some(payload)),
            None if src.is_empty() => Ok(None),
            // Final line without a trailing newline.
            None => {
                let line = src.split_to(src.len());
                Ok(Some(String::from_utf8(line.to_vec())?))
            }
        }
    }
}

impl Encoder<String> for PayloadLineCodec {
    type Error = QcastError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), QcastError> {
        if item.len() > self.max_length {
            return Err(QcastError::FrameTooLarge {
                size: item.len(),
                max: self.max_length,
            });
        }
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lines_one_at_a_time() {
        let mut codec = PayloadLineCodec::new();
        let mut buf = BytesMut::from(&b"first\nsecond\npart"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("first"));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("second"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.put_slice(b"ial\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("partial"));
    }

    #[test]
    fn strips_carriage_return() {
        let mut codec = PayloadLineCodec::new();
        let mut buf = BytesMut::from(&b"line\r\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("line"));
    }

    #[test]
    fn eof_flushes_unterminated_line() {
        let mut codec = PayloadLineCodec::new();
        let mut buf = BytesMut::from(&b"tail"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().as_deref(), Some("tail"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn oversized_line_is_rejected() {
        let mut codec = PayloadLineCodec::with_max_length(8);
        let mut buf = BytesMut::from(&b"0123456789ab\n"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(QcastError::FrameTooLarge { size: 12, max: 8 })
        ));
    }

    #[test]
    fn oversized_buffer_without_newline_is_rejected() {
        let mut codec = PayloadLineCodec::with_max_length(4);
        let mut buf = BytesMut::from(&b"0123456789"[..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(QcastError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn encode_then_decode_roundtrips() {
        let mut codec = PayloadLineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("{\"d\":\"YWJj\"}".to_string(), &mut buf).unwrap();
        assert_eq!(
            codec.decode(&mut buf).unwrap().as_deref(),
            Some("{\"d\":\"YWJj\"}")
        );
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let mut codec = PayloadLineCodec::with_max_length(4);
        let mut buf = BytesMut::new();
        assert!(matches!(
            codec.encode("too long".to_string(), &mut buf),
            Err(QcastError::FrameTooLarge { .. })
        ));
    }
}
