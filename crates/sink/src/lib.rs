//! An asynchronous content-emission layer for HTTP-like servers
//!
//! This crate provides the seam between a protocol engine and the producers
//! of response bodies: static files, generated listings, streamed
//! computations, error pages. A producer finalizes one exchange through a
//! polymorphic sink capability without the engine knowing whether the payload
//! is an in-memory buffer or a live, possibly unbounded stream.
//!
//! # Features
//!
//! - Uniform content delivery: buffers, typed byte sources, directory listings
//! - Automatic transfer framing: content-length when the source declares a
//!   trusted size, chunked transfer encoding otherwise
//! - Error-to-response translation through a single type-erased error channel
//! - Cooperative cancellation: abort polling and push callbacks propagated
//!   from the transport into mid-read producer loops
//! - Guaranteed resource release: sources are closed exactly once on every
//!   exit path
//!
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use micro_sink::abort::abort_pair;
//! use micro_sink::codec::WireTransport;
//! use micro_sink::protocol::ContentMetadata;
//! use micro_sink::sink::{ServerExchange, ServerSink};
//! use micro_sink::source::BytesSource;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         tokio::spawn(async move {
//!             // a real engine parses the request and routes to a producer here
//!             let (_reader, writer) = tcp_stream.into_split();
//!             let (_abort_handle, abort_signal) = abort_pair();
//!             let mut sink = ServerExchange::new(WireTransport::new(writer), abort_signal);
//!
//!             let source = BytesSource::new(
//!                 "greeting",
//!                 Bytes::from_static(b"Hello World!\r\n"),
//!                 ContentMetadata::new(mime::TEXT_PLAIN_UTF_8),
//!             );
//!             if let Err(e) = sink.send_source(Box::new(source)).await {
//!                 error!(cause = %e, "exchange failed");
//!             }
//!         });
//!     }
//! }
//! ```
//!
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`sink`]: The producer-facing capability traits and their concrete
//!   exchange-bound implementations
//! - [`source`]: The [`DataSource`](source::DataSource) abstraction over
//!   readable byte producers, with ready-made sources
//! - [`protocol`]: Value types: content metadata, listings, framing
//!   vocabulary, error taxonomy
//! - [`abort`]: The cancellation token shared between transport and producer
//! - [`transport`]: The engine-side boundary trait
//! - [`codec`]: Reference HTTP/1.1 serialization of heads and payload framing
//!
//!
//! # Core Components
//!
//! ## Sinks
//!
//! A [`sink::ServerSink`] (or [`sink::ClientSink`]) is a short-lived handle
//! bound 1:1 to one in-flight exchange. Exactly one terminal operation
//! (content, streamed source, listing, error, redirect, not-modified)
//! completes the exchange; a second one is rejected loudly.
//!
//! ## Streaming and cancellation
//!
//! When the body is a [`source::DataSource`], the sink drives repeated reads
//! interleaved with abort polls until the source is exhausted or the client
//! disconnects, and closes the source exactly once on every exit path.
//! Framing is decided before the first byte: exact content-length only when
//! the source both declares an exact size and marks it trustworthy.
//!
//! ## Error handling
//!
//! Producers propagate failures into the sink's error channel as type-erased
//! values; the sink is the single authority mapping recognized kinds
//! (not-modified, request-aborted) and everything else to response semantics.
//! See [`protocol::SinkError`].
//!
//! # Limitations
//!
//! - The reference codec serializes HTTP/1.1 only
//! - No request parsing, routing or connection management; those belong to
//!   the protocol engine driving this crate

pub mod abort;
pub mod codec;
pub mod protocol;
pub mod sink;
pub mod source;
pub mod transport;

mod utils;
