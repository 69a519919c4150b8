//! The producer-facing capability traits for emitting one response.
//!
//! A sink is a short-lived handle bound 1:1 to one in-flight exchange. The
//! protocol engine constructs it; a content producer calls exactly one
//! terminal operation on it (content, error, redirect, listing or
//! not-modified) to finalize the exchange. A second terminal call fails
//! loudly with [`SinkError::AlreadyCommitted`] and sends nothing.
//!
//! [`Sink`] carries the object-safe primitives. The generic convenience
//! forms (accepting `impl Into<Bytes>`, `impl Into<BoxError>`, copying
//! transient slices) live on [`SinkExt`], blanket-implemented for every
//! sink, so producers can hold a `&mut dyn ServerSink` and still call the
//! ergonomic surface.
//!
//! [`ServerSink`] adds streaming delivery from a [`DataSource`], directory
//! listing emission and abort observation; [`ClientSink`] adds the
//! conditional-request short-circuit [`not_modified`](ClientSink::not_modified).

use crate::abort::AbortCallback;
use crate::protocol::{BoxError, ContentMetadata, ListingEntry, SinkError};
use crate::source::DataSource;
use async_trait::async_trait;
use bytes::Bytes;

mod exchange;
pub use exchange::ClientExchange;
pub use exchange::ServerExchange;

/// Base capability: content, error and redirect delivery.
///
/// Exactly one terminal operation may complete per exchange.
#[async_trait]
pub trait Sink: Send {
    /// Emits `data` as the complete response body, tagged with `stat`.
    ///
    /// `Bytes` is refcounted, so passing an owned or shared buffer is the
    /// zero-copy path; use [`SinkExt::content_copied`] for transient
    /// borrowed buffers.
    async fn send_content(&mut self, data: Bytes, stat: ContentMetadata) -> Result<(), SinkError>;

    /// Routes a type-erased error value through the error channel.
    ///
    /// Recognized kinds map to their status semantics (not-modified,
    /// request-aborted); anything else maps to a generic failure status.
    async fn send_error(&mut self, error: BoxError) -> Result<(), SinkError>;

    /// Tells the client to look somewhere else. A successful redirect
    /// instruction, never routed through the error mapping.
    async fn send_redirect(&mut self, location: &str) -> Result<(), SinkError>;
}

/// Server-side sink: adds streaming delivery, listing emission and abort
/// observation.
#[async_trait]
pub trait ServerSink: Sink {
    /// Streams the source as the response body.
    ///
    /// The delivery takes ownership of the source, decides framing before
    /// the first byte (exact length only when the source declares a trusted
    /// size), polls for abort between reads and calls
    /// [`close`](DataSource::close) exactly once on every exit path.
    async fn send_source(&mut self, source: Box<dyn DataSource>) -> Result<(), SinkError>;

    /// Emits a directory-style rendering of `entries`, normalized to the
    /// listing total order. Caller data is not mutated.
    async fn send_listing(&mut self, entries: &[ListingEntry]) -> Result<(), SinkError>;

    /// Polls for client disconnection; fails with
    /// [`SinkError::RequestAborted`] once the transport has flagged it.
    fn check_aborted(&self) -> Result<(), SinkError>;

    /// Registers a callback invoked at the moment the transport detects an
    /// abort. At most one callback is active; re-registration replaces the
    /// previous one. The callback may run on the transport's context and
    /// must not block.
    fn set_aborter(&mut self, callback: AbortCallback);
}

/// Client-side sink: adds the conditional-request short-circuit.
#[async_trait]
pub trait ClientSink: Sink {
    /// Signals that the content has not been modified.
    ///
    /// The default routes [`SinkError::NotModified`] through the error
    /// channel; implementations may override with a true protocol-level
    /// cache-validation response, preserving the same observable outcome.
    async fn not_modified(&mut self) -> Result<(), SinkError> {
        self.send_error(SinkError::NotModified.into()).await
    }
}

/// Generic convenience forms over the object-safe [`Sink`] primitives.
#[async_trait]
pub trait SinkExt: Sink {
    /// Emits any buffer convertible to `Bytes` (strings, vectors, static
    /// slices) without copying.
    async fn content<D>(&mut self, data: D, stat: ContentMetadata) -> Result<(), SinkError>
    where
        D: Into<Bytes> + Send,
    {
        self.send_content(data.into(), stat).await
    }

    /// Emits a transient borrowed buffer, copying it now.
    async fn content_copied(&mut self, data: &[u8], stat: ContentMetadata) -> Result<(), SinkError> {
        self.send_content(Bytes::copy_from_slice(data), stat).await
    }

    /// Routes the error value in flight at the call site through the error
    /// channel.
    async fn error<E>(&mut self, error: E) -> Result<(), SinkError>
    where
        E: Into<BoxError> + Send,
    {
        self.send_error(error.into()).await
    }
}

impl<S: Sink + ?Sized> SinkExt for S {}
