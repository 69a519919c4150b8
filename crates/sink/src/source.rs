//! Polymorphic byte-producing sources for streaming content delivery.
//!
//! A [`DataSource`] is what a producer hands to
//! [`ServerSink::send_source`](crate::sink::ServerSink::send_source) when the
//! response body is not an in-memory buffer: a file handle, a generated
//! stream, a proxied upstream body. The sink drives repeated [`read`] calls
//! against it, interleaved with abort checks, until exhausted or cancelled,
//! and calls [`close`] exactly once on every exit path.
//!
//! [`read`]: DataSource::read
//! [`close`]: DataSource::close

use crate::protocol::{BoxError, ContentMetadata};
use async_trait::async_trait;
use bytes::{Buf, Bytes};
use http_body::Body;
use http_body_util::BodyExt;
use std::cmp;
use std::io;

/// The declared size of a source: an exact byte count or unknown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceSize {
    /// Exact length in bytes
    Exact(u64),
    /// Length not known up front; the delivery streams until end-of-data
    Unknown,
}

impl SourceSize {
    /// Returns the exact byte count, if declared.
    pub fn exact(self) -> Option<u64> {
        match self {
            SourceSize::Exact(n) => Some(n),
            SourceSize::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, SourceSize::Unknown)
    }
}

/// A readable byte-producing entity with a declared size and content
/// metadata.
///
/// # Contract
///
/// - [`stat`](Self::stat) is called exactly once per delivery, before any
///   byte is sent.
/// - [`read`](Self::read) is called with monotonically non-decreasing
///   offsets across one delivery; it must never write more than `buf.len()`
///   bytes, and a return of `0` means true end-of-data, never a spurious
///   short read.
/// - [`close`](Self::close) is invoked by the sink exactly once, on success,
///   error and abort paths alike; it is the sole resource-release guarantee
///   the sink provides, and must be idempotent.
/// - [`has_content_length`](Self::has_content_length) is a fixed,
///   producer-declared hint: only when it is true will the sink trust
///   [`size`](Self::size) and announce an exact length; otherwise the
///   delivery falls back to chunked framing even if `size` reports an exact
///   count. The two signals are independent.
#[async_trait]
pub trait DataSource: Send {
    /// Content metadata for the response head.
    fn stat(&self) -> ContentMetadata;

    /// Reads up to `buf.len()` bytes at `offset`, returning the number of
    /// bytes produced; `0` signals end-of-data.
    async fn read(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Declared size of the response body.
    fn size(&self) -> SourceSize;

    /// Diagnostic name, used in logs only.
    fn name(&self) -> &str {
        "unknown"
    }

    /// Releases underlying resources. Idempotent.
    fn close(&mut self) {}

    /// Whether the declared size may be trusted for exact-length framing.
    fn has_content_length(&self) -> bool {
        true
    }
}

/// An in-memory source with an exact size.
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    data: Bytes,
    stat: ContentMetadata,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>, stat: ContentMetadata) -> Self {
        Self { name: name.into(), data: data.into(), stat }
    }
}

#[async_trait]
impl DataSource for BytesSource {
    fn stat(&self) -> ContentMetadata {
        self.stat.clone()
    }

    async fn read(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        if offset >= self.data.len() as u64 {
            return Ok(0);
        }
        let start = offset as usize;
        let n = cmp::min(buf.len(), self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> SourceSize {
        SourceSize::Exact(self.data.len() as u64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Adapts any [`http_body::Body`] into a [`DataSource`].
///
/// The size is captured from the body's size hint at construction, so the
/// framing decision is stable even as the body drains. Reads are sequential;
/// the tail of a frame larger than the caller's buffer is buffered for the
/// next call.
pub struct BodySource<B> {
    body: B,
    stat: ContentMetadata,
    size: SourceSize,
    rest: Bytes,
}

impl<B> BodySource<B>
where
    B: Body<Data = Bytes> + Send + Unpin,
    B::Error: Into<BoxError>,
{
    pub fn new(body: B, stat: ContentMetadata) -> Self {
        let size = match body.size_hint().exact() {
            Some(n) => SourceSize::Exact(n),
            None => SourceSize::Unknown,
        };
        Self { body, stat, size, rest: Bytes::new() }
    }
}

#[async_trait]
impl<B> DataSource for BodySource<B>
where
    B: Body<Data = Bytes> + Send + Unpin,
    B::Error: Into<BoxError>,
{
    fn stat(&self) -> ContentMetadata {
        self.stat.clone()
    }

    async fn read(&mut self, buf: &mut [u8], _offset: u64) -> io::Result<usize> {
        loop {
            if !self.rest.is_empty() {
                let n = cmp::min(buf.len(), self.rest.len());
                buf[..n].copy_from_slice(&self.rest[..n]);
                self.rest.advance(n);
                return Ok(n);
            }

            match self.body.frame().await {
                Some(Ok(frame)) => {
                    // non-data frames (trailers) carry no body bytes
                    if let Ok(data) = frame.into_data() {
                        self.rest = data;
                    }
                }
                Some(Err(e)) => return Err(io::Error::other(e.into())),
                None => return Ok(0),
            }
        }
    }

    fn size(&self) -> SourceSize {
        self.size
    }

    fn has_content_length(&self) -> bool {
        matches!(self.size, SourceSize::Exact(_))
    }
}
