use crate::protocol::{PayloadItem, SinkError};
use crate::utils::ensure;
use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::warn;

/// Pass-through encoder for content-length framed payloads.
///
/// Counts down the announced length; writing past it is a framing violation
/// and fails the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    remaining: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length }
    }

    pub fn is_finish(&self) -> bool {
        self.remaining == 0
    }
}

impl Encoder<PayloadItem> for LengthEncoder {
    type Error = SinkError;

    fn encode(&mut self, item: PayloadItem, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            PayloadItem::Chunk(bytes) => {
                if bytes.is_empty() {
                    return Ok(());
                }
                ensure!(
                    bytes.len() as u64 <= self.remaining,
                    SinkError::send(format!(
                        "payload exceeds announced content-length by {} bytes",
                        bytes.len() as u64 - self.remaining
                    ))
                );
                dst.extend_from_slice(&bytes);
                self.remaining -= bytes.len() as u64;
                Ok(())
            }
            PayloadItem::Eof => {
                if self.remaining > 0 {
                    warn!(remaining = self.remaining, "eof before announced content-length was reached");
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn passes_bytes_through_up_to_the_length() {
        let mut encoder = LengthEncoder::new(5);
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"he")), &mut dst).unwrap();
        encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"llo")), &mut dst).unwrap();
        assert!(encoder.is_finish());

        encoder.encode(PayloadItem::Eof, &mut dst).unwrap();
        assert_eq!(dst.as_ref(), b"hello");
    }

    #[test]
    fn rejects_overrun() {
        let mut encoder = LengthEncoder::new(3);
        let mut dst = BytesMut::new();

        let err = encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"hello")), &mut dst).unwrap_err();
        assert!(matches!(err, SinkError::Send { .. }));
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let mut encoder = LengthEncoder::new(2);
        let mut dst = BytesMut::new();

        encoder.encode(PayloadItem::Chunk(Bytes::new()), &mut dst).unwrap();
        assert!(dst.is_empty());
        assert!(!encoder.is_finish());
    }
}
