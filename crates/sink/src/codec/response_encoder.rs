use crate::codec::HeadEncoder;
use crate::codec::body::PayloadEncoder;
use crate::protocol::{Message, PayloadSize, SinkError};
use crate::transport::ResponseHead;
use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::error;

/// Stateful encoder for one response: the head first, then payload items
/// under the framing the head announced.
pub struct ResponseEncoder {
    head_encoder: HeadEncoder,
    payload_encoder: Option<PayloadEncoder>,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { head_encoder: HeadEncoder, payload_encoder: None }
    }
}

impl Encoder<Message<(ResponseHead, PayloadSize)>> for ResponseEncoder {
    type Error = SinkError;

    fn encode(&mut self, item: Message<(ResponseHead, PayloadSize)>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Head((head, payload_size)) => {
                if self.payload_encoder.is_some() {
                    error!("expect payload item but receive response head");
                    return Err(SinkError::send("response head while payload is in flight"));
                }

                // an empty payload needs no encoder state
                if !payload_size.is_empty() {
                    self.payload_encoder = Some(PayloadEncoder::from(payload_size));
                }
                self.head_encoder.encode((head, payload_size), dst)
            }

            Message::Payload(payload_item) => {
                let payload_encoder = if let Some(encoder) = &mut self.payload_encoder {
                    encoder
                } else {
                    error!("expect response head but receive payload item");
                    return Err(SinkError::send("payload item without response head"));
                };

                let result = payload_encoder.encode(payload_item, dst);

                if payload_encoder.is_finish() {
                    self.payload_encoder.take();
                }

                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PayloadItem;
    use bytes::Bytes;
    use http::{Response, StatusCode};

    fn head() -> ResponseHead {
        Response::builder().status(StatusCode::OK).body(()).unwrap()
    }

    #[test]
    fn encodes_head_then_payload() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(Message::Head((head(), PayloadSize::Length(5))), &mut dst).unwrap();
        encoder.encode(Message::Payload(PayloadItem::Chunk(Bytes::from_static(b"hello"))), &mut dst).unwrap();
        encoder.encode(Message::Payload(PayloadItem::Eof), &mut dst).unwrap();

        assert_eq!(dst.as_ref(), b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nhello");
    }

    #[test]
    fn rejects_payload_before_head() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        let err = encoder.encode(Message::Payload(PayloadItem::Eof), &mut dst).unwrap_err();
        assert!(matches!(err, SinkError::Send { .. }));
    }

    #[test]
    fn rejects_head_while_payload_in_flight() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(Message::Head((head(), PayloadSize::Chunked)), &mut dst).unwrap();
        let err = encoder.encode(Message::Head((head(), PayloadSize::Chunked)), &mut dst).unwrap_err();
        assert!(matches!(err, SinkError::Send { .. }));
    }

    #[test]
    fn finished_payload_resets_the_encoder() {
        let mut encoder = ResponseEncoder::new();
        let mut dst = BytesMut::new();

        encoder.encode(Message::Head((head(), PayloadSize::Chunked)), &mut dst).unwrap();
        encoder.encode(Message::Payload(PayloadItem::Eof), &mut dst).unwrap();

        // a new exchange on the same connection can announce its head
        dst.clear();
        encoder.encode(Message::Head((head(), PayloadSize::Empty)), &mut dst).unwrap();
        assert_eq!(dst.as_ref(), b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n");
    }
}
