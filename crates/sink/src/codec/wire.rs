use crate::codec::ResponseEncoder;
use crate::protocol::{Message, PayloadItem, PayloadSize, SinkError};
use crate::transport::{ResponseHead, Transport};
use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

/// Initial capacity of the write buffer
const INIT_BUFFER_SIZE: usize = 8 * 1024;

/// Reference [`Transport`] implementation: serializes heads and payload
/// items into a buffer with [`ResponseEncoder`] and flushes them to any
/// [`AsyncWrite`].
///
/// Protocol engines with their own wire handling implement [`Transport`]
/// directly instead.
pub struct WireTransport<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> WireTransport<W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, INIT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new() }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> Transport for WireTransport<W>
where
    W: AsyncWrite + Send + Unpin,
{
    async fn send_head(&mut self, head: ResponseHead, framing: PayloadSize) -> Result<(), SinkError> {
        self.encoder.encode(Message::Head((head, framing)), &mut self.buffer)
    }

    async fn send_payload(&mut self, item: PayloadItem) -> Result<(), SinkError> {
        self.encoder.encode(Message::Payload(item), &mut self.buffer)
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }
}
