//! The boundary between the sink layer and the protocol engine.
//!
//! The sink never touches a socket. Once a terminal operation has decided
//! status, headers and framing, it calls back into the engine through
//! [`Transport`]: announce the head together with the framing decision, write
//! payload items, flush. The crate ships one reference implementation,
//! [`WireTransport`](crate::codec::WireTransport), serializing HTTP/1.1 over
//! any [`tokio::io::AsyncWrite`]; engines may substitute their own.

use crate::protocol::{PayloadItem, PayloadSize, SinkError};
use async_trait::async_trait;
use http::Response;

/// Type alias for the response head handed to the transport.
///
/// Uses the standard `http::Response` type with an empty body placeholder;
/// the payload follows as separate [`PayloadItem`]s.
pub type ResponseHead = Response<()>;

/// Engine-side callback surface for one exchange.
///
/// Call order per exchange: `send_head` once, then zero or more
/// `send_payload` calls ending with [`PayloadItem::Eof`] (unless the framing
/// is [`PayloadSize::Empty`]), then `flush`.
#[async_trait]
pub trait Transport: Send {
    /// Announces status, headers and the framing decision.
    async fn send_head(&mut self, head: ResponseHead, framing: PayloadSize) -> Result<(), SinkError>;

    /// Writes one payload item under the announced framing.
    async fn send_payload(&mut self, item: PayloadItem) -> Result<(), SinkError>;

    /// Flushes buffered bytes to the underlying I/O.
    async fn flush(&mut self) -> Result<(), SinkError>;
}
