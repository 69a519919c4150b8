//! Core protocol value types and abstractions shared across the sink crate.
//!
//! This module provides the vocabulary the content-emission layer is written in:
//!
//! - **Content description** ([`metadata`]): [`ContentMetadata`] with its
//!   [`Timestamp`] / [`Expiry`] sentinels, attached to every content delivery
//! - **Directory enumeration** ([`listing`]): [`ListingEntry`] and [`EntryKind`]
//!   with their total order, plus the index rendering used by listing delivery
//! - **Framing** ([`message`]): [`Message`], [`PayloadItem`] and [`PayloadSize`],
//!   the shapes exchanged with the transport boundary
//! - **Error handling** ([`error`]): [`SinkError`] and the type-erased
//!   [`BoxError`] channel producers report failures through
//!
//! These are plain value types with no I/O of their own; the traits in
//! [`crate::sink`] and the driver in [`crate::codec`] move them around.

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod metadata;
pub use metadata::ContentMetadata;
pub use metadata::Expiry;
pub use metadata::Timestamp;

mod listing;
pub use listing::EntryKind;
pub use listing::ListingEntry;
pub(crate) use listing::render_index;

mod error;
pub use error::BoxError;
pub use error::SinkError;
