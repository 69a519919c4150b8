//! Concrete sinks bound to one exchange over a [`Transport`].
//!
//! [`ServerExchange`] and [`ClientExchange`] carry the machinery the
//! capability traits imply: terminal-operation-exactly-once enforcement,
//! header population from [`ContentMetadata`], the streaming read loop with
//! its framing decision and per-chunk abort polling, error-to-status
//! mapping, and the close-exactly-once discipline for data sources.

use crate::abort::{AbortCallback, AbortSignal};
use crate::protocol::{BoxError, ContentMetadata, Expiry, ListingEntry, PayloadItem, PayloadSize, SinkError, render_index};
use crate::sink::{ClientSink, ServerSink, Sink};
use crate::source::{DataSource, SourceSize};
use crate::transport::{ResponseHead, Transport};
use crate::utils::ensure;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode, header};
use httpdate::fmt_http_date;
use std::cmp;
use tracing::{error, trace, warn};

/// Read granularity of the streaming delivery loop.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Shared terminal-operation machinery of both exchange flavors.
struct ExchangeCore<T> {
    transport: T,
    committed: bool,
}

impl<T: Transport> ExchangeCore<T> {
    fn new(transport: T) -> Self {
        Self { transport, committed: false }
    }

    /// Marks the exchange committed; a second claim fails loudly.
    fn claim(&mut self) -> Result<(), SinkError> {
        ensure!(!self.committed, SinkError::AlreadyCommitted);
        self.committed = true;
        Ok(())
    }

    async fn send_buffer(&mut self, status: StatusCode, data: Bytes, stat: &ContentMetadata) -> Result<(), SinkError> {
        self.claim()?;

        let framing = PayloadSize::of_buffer(data.len());
        self.transport.send_head(build_head(status, stat), framing).await?;
        if !framing.is_empty() {
            self.transport.send_payload(PayloadItem::Chunk(data)).await?;
            self.transport.send_payload(PayloadItem::Eof).await?;
        }
        self.transport.flush().await
    }

    async fn send_error(&mut self, error: BoxError) -> Result<(), SinkError> {
        self.claim()?;

        match error.downcast_ref::<SinkError>() {
            Some(SinkError::NotModified) => {
                trace!("conditional request short-circuit, sending not-modified");
                self.send_bare_head(StatusCode::NOT_MODIFIED).await
            }
            Some(SinkError::RequestAborted) => {
                // connection already severed, nothing to send
                warn!("request aborted, suppressing response");
                Ok(())
            }
            _ => {
                error!(cause = %error, "producer error, sending generic failure status");
                self.send_bare_head(StatusCode::INTERNAL_SERVER_ERROR).await
            }
        }
    }

    async fn send_redirect(&mut self, location: &str) -> Result<(), SinkError> {
        let location = HeaderValue::from_str(location)
            .map_err(|_| SinkError::send(format!("invalid redirect location: {location:?}")))?;

        self.claim()?;

        let mut builder = Response::builder();
        let headers = builder.headers_mut().unwrap();
        headers.insert(header::LOCATION, location);
        let head = builder.status(StatusCode::SEE_OTHER).body(()).unwrap();

        self.transport.send_head(head, PayloadSize::Empty).await?;
        self.transport.flush().await
    }

    async fn send_bare_head(&mut self, status: StatusCode) -> Result<(), SinkError> {
        let head = Response::builder().status(status).body(()).unwrap();
        self.transport.send_head(head, PayloadSize::Empty).await?;
        self.transport.flush().await
    }
}

/// Builds the response head for a content delivery: content type plus the
/// cache-relevant timestamps, with sentinel substitution (`Now` resolves to
/// the current time, `Never` omits the expiry header).
fn build_head(status: StatusCode, stat: &ContentMetadata) -> ResponseHead {
    let mut builder = Response::builder();
    let headers = builder.headers_mut().unwrap();
    headers.insert(header::CONTENT_TYPE, stat.content_type().as_ref().parse().unwrap());

    let last_modified = fmt_http_date(stat.last_modified().or_now());
    headers.insert(header::LAST_MODIFIED, HeaderValue::from_str(&last_modified).unwrap());

    if let Expiry::At(time) = stat.expires() {
        headers.insert(header::EXPIRES, HeaderValue::from_str(&fmt_http_date(time)).unwrap());
    }

    builder.status(status).body(()).unwrap()
}

/// Framing decision for a streaming delivery: exact length only when the
/// source both declares an exact size and marks it trustworthy.
fn framing_of(source: &dyn DataSource) -> PayloadSize {
    match source.size() {
        SourceSize::Exact(0) if source.has_content_length() => PayloadSize::Empty,
        SourceSize::Exact(n) if source.has_content_length() => PayloadSize::Length(n),
        _ => PayloadSize::Chunked,
    }
}

/// Server-side sink bound to one exchange.
///
/// Constructed by the protocol engine with the transport half of the wire
/// and the signal half of an [`abort pair`](crate::abort::abort_pair);
/// handed to the content producer as `&mut dyn ServerSink`.
pub struct ServerExchange<T> {
    core: ExchangeCore<T>,
    signal: AbortSignal,
}

impl<T: Transport> ServerExchange<T> {
    pub fn new(transport: T, signal: AbortSignal) -> Self {
        Self { core: ExchangeCore::new(transport), signal }
    }

    /// Consumes the finished exchange, handing the transport back to the
    /// engine (e.g. for connection reuse).
    pub fn into_transport(self) -> T {
        self.core.transport
    }

    /// Drives the source to exhaustion (or cancellation). The caller owns
    /// the close obligation.
    async fn stream(&mut self, source: &mut dyn DataSource) -> Result<(), SinkError> {
        self.signal.check()?;

        let stat = source.stat();
        let framing = framing_of(source);
        self.core.transport.send_head(build_head(StatusCode::OK, &stat), framing).await?;

        if !framing.is_empty() {
            let mut remaining = match framing {
                PayloadSize::Length(n) => Some(n),
                _ => None,
            };
            let mut buf = vec![0u8; READ_BUFFER_SIZE];
            let mut offset = 0u64;

            loop {
                self.signal.check()?;

                let want = match remaining {
                    Some(0) => break,
                    Some(r) => cmp::min(r, buf.len() as u64) as usize,
                    None => buf.len(),
                };

                let n = source.read(&mut buf[..want], offset).await?;
                if n == 0 {
                    if let Some(r) = remaining {
                        return Err(SinkError::send(format!(
                            "source '{}' ended {r} bytes short of its declared length",
                            source.name()
                        )));
                    }
                    break;
                }

                offset += n as u64;
                if let Some(r) = remaining.as_mut() {
                    *r -= n as u64;
                }
                self.core.transport.send_payload(PayloadItem::Chunk(Bytes::copy_from_slice(&buf[..n]))).await?;
            }

            self.core.transport.send_payload(PayloadItem::Eof).await?;
        }

        self.core.transport.flush().await
    }
}

#[async_trait]
impl<T: Transport> Sink for ServerExchange<T> {
    async fn send_content(&mut self, data: Bytes, stat: ContentMetadata) -> Result<(), SinkError> {
        self.core.send_buffer(StatusCode::OK, data, &stat).await
    }

    async fn send_error(&mut self, error: BoxError) -> Result<(), SinkError> {
        self.core.send_error(error).await
    }

    async fn send_redirect(&mut self, location: &str) -> Result<(), SinkError> {
        self.core.send_redirect(location).await
    }
}

#[async_trait]
impl<T: Transport> ServerSink for ServerExchange<T> {
    async fn send_source(&mut self, mut source: Box<dyn DataSource>) -> Result<(), SinkError> {
        let result = match self.core.claim() {
            Ok(()) => self.stream(source.as_mut()).await,
            Err(e) => Err(e),
        };

        // the sole resource-release guarantee: exactly once, on every path
        source.close();

        match &result {
            Ok(()) => trace!(source = source.name(), "source delivery complete"),
            Err(e) if e.is_aborted() => warn!(source = source.name(), "client aborted during source delivery"),
            Err(e) => error!(source = source.name(), cause = %e, "source delivery failed"),
        }
        result
    }

    async fn send_listing(&mut self, entries: &[ListingEntry]) -> Result<(), SinkError> {
        let index = render_index(entries);
        let stat = ContentMetadata::new(mime::TEXT_HTML_UTF_8);
        self.core.send_buffer(StatusCode::OK, Bytes::from(index), &stat).await
    }

    fn check_aborted(&self) -> Result<(), SinkError> {
        self.signal.check()
    }

    fn set_aborter(&mut self, callback: AbortCallback) {
        self.signal.set_aborter(callback);
    }
}

/// Client-side sink bound to one exchange.
pub struct ClientExchange<T> {
    core: ExchangeCore<T>,
}

impl<T: Transport> ClientExchange<T> {
    pub fn new(transport: T) -> Self {
        Self { core: ExchangeCore::new(transport) }
    }

    /// Consumes the finished exchange, handing the transport back to the
    /// engine.
    pub fn into_transport(self) -> T {
        self.core.transport
    }
}

#[async_trait]
impl<T: Transport> Sink for ClientExchange<T> {
    async fn send_content(&mut self, data: Bytes, stat: ContentMetadata) -> Result<(), SinkError> {
        self.core.send_buffer(StatusCode::OK, data, &stat).await
    }

    async fn send_error(&mut self, error: BoxError) -> Result<(), SinkError> {
        self.core.send_error(error).await
    }

    async fn send_redirect(&mut self, location: &str) -> Result<(), SinkError> {
        self.core.send_redirect(location).await
    }
}

#[async_trait]
impl<T: Transport> ClientSink for ClientExchange<T> {}
