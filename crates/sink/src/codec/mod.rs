//! Reference wire framing for the transport boundary.
//!
//! The sink layer only decides framing; these encoders turn the decision
//! into HTTP/1.1 bytes:
//!
//! - [`HeadEncoder`]: status line and headers, inserting the framing header
//!   (`content-length` or `transfer-encoding: chunked`)
//! - Payload encoding via the [`body`] module, coordinated by
//!   [`ResponseEncoder`], which enforces head-then-payload ordering
//! - [`WireTransport`]: a buffered [`Transport`](crate::transport::Transport)
//!   over any [`tokio::io::AsyncWrite`], composing the encoders
//!
//! Engines that do their own serialization ignore this module and implement
//! [`Transport`](crate::transport::Transport) directly.

pub(crate) mod body;
mod head_encoder;
mod response_encoder;
mod wire;

pub use body::PayloadEncoder;
pub use head_encoder::HeadEncoder;
pub use response_encoder::ResponseEncoder;
pub use wire::WireTransport;
