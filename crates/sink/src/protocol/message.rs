use bytes::Bytes;

/// A response message flowing towards the transport: either the head of the
/// response or a piece of its payload.
///
/// The generic parameter `T` is the head type; the exchange driver uses
/// `(ResponseHead, PayloadSize)` so the transport learns the framing decision
/// together with the status line and headers.
pub enum Message<T> {
    /// The response head, sent exactly once per exchange
    Head(T),
    /// A chunk of payload data or the EOF marker
    Payload(PayloadItem),
}

/// An item in the response payload stream: a data chunk or the end-of-stream
/// marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    /// A chunk of payload data
    Chunk(Bytes),
    /// Marks the end of the payload stream
    Eof,
}

/// The framing decision for one response payload.
///
/// Decided before the first byte is sent:
/// - [`Length`](PayloadSize::Length): exact byte count, content-length framing
/// - [`Chunked`](PayloadSize::Chunked): unknown length, chunked transfer encoding
/// - [`Empty`](PayloadSize::Empty): no body at all
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Payload using chunked transfer encoding
    Chunked,
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    /// Returns true if the payload uses chunked transfer encoding
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, PayloadSize::Chunked)
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty)
    }

    /// Framing for an in-memory buffer of `len` bytes.
    pub fn of_buffer(len: usize) -> Self {
        if len == 0 { PayloadSize::Empty } else { PayloadSize::Length(len as u64) }
    }
}

impl<T> Message<T> {
    /// Returns true if this message contains payload data
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Message::Payload(_))
    }

    /// Returns true if this message contains the response head
    #[inline]
    pub fn is_head(&self) -> bool {
        matches!(self, Message::Head(_))
    }
}

impl PayloadItem {
    /// Returns true if this item represents the end of the payload stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }

    /// Returns true if this item contains chunk data
    #[inline]
    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }

    /// Returns a reference to the contained bytes if this is a `Chunk`.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }

    /// Consumes the item and returns the contained bytes if this is a `Chunk`.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }
}

impl From<Bytes> for PayloadItem {
    fn from(bytes: Bytes) -> Self {
        PayloadItem::Chunk(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_framing() {
        assert_eq!(PayloadSize::of_buffer(0), PayloadSize::Empty);
        assert_eq!(PayloadSize::of_buffer(42), PayloadSize::Length(42));
        assert!(PayloadSize::of_buffer(0).is_empty());
        assert!(!PayloadSize::of_buffer(1).is_chunked());
    }

    #[test]
    fn payload_item_accessors() {
        let chunk = PayloadItem::from(Bytes::from_static(b"abc"));
        assert!(chunk.is_chunk());
        assert_eq!(chunk.as_bytes().unwrap().as_ref(), b"abc");
        assert_eq!(chunk.into_bytes().unwrap().as_ref(), b"abc");

        assert!(PayloadItem::Eof.is_eof());
        assert!(PayloadItem::Eof.as_bytes().is_none());
        assert!(PayloadItem::Eof.into_bytes().is_none());
    }
}
