//! Response payload framing encoders.
//!
//! Two transfer strategies, selected by the [`PayloadSize`] announced with
//! the response head:
//!
//! - [`LengthEncoder`](length_encoder::LengthEncoder): content-length framing,
//!   a counted pass-through
//! - [`ChunkedEncoder`](chunked_encoder::ChunkedEncoder): chunked transfer
//!   encoding (RFC 7230)
//!
//! [`PayloadEncoder`] coordinates the two and the no-body case.
//!
//! [`PayloadSize`]: crate::protocol::PayloadSize

mod chunked_encoder;
mod length_encoder;
mod payload_encoder;

pub use payload_encoder::PayloadEncoder;
