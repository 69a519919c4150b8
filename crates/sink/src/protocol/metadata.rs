//! Content metadata attached to every content delivery.
//!
//! [`ContentMetadata`] describes what a producer knows about the bytes it is
//! about to emit: the content type and the cache-relevant timestamps. The
//! [`Timestamp::Now`] and [`Expiry::Never`] sentinels let producers skip
//! computing timestamps that are not meaningful for them; the sink substitutes
//! the real current time (or omits the header) when it sees a sentinel.

use mime::Mime;
use std::time::SystemTime;

/// A last-modification timestamp, or the "now" sentinel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Resolved to the current time when the response head is built
    Now,
    /// An explicit modification time
    At(SystemTime),
}

impl Timestamp {
    /// Resolves the sentinel against the current time.
    pub fn or_now(self) -> SystemTime {
        match self {
            Timestamp::Now => SystemTime::now(),
            Timestamp::At(time) => time,
        }
    }
}

/// An expiration timestamp, or the "never" sentinel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Expiry {
    /// The content does not expire; no expiry header is emitted
    Never,
    /// An explicit expiration time
    At(SystemTime),
}

/// Describes the content of one delivery: content type plus cache-relevant
/// timestamps.
///
/// Immutable value, copied freely, constructed once per content delivery
/// call. The defaults are a generic octet stream modified "now" that never
/// expires.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentMetadata {
    content_type: Mime,
    last_modified: Timestamp,
    expires: Expiry,
}

impl ContentMetadata {
    /// Creates metadata for the given content type with default timestamps.
    pub fn new(content_type: Mime) -> Self {
        Self { content_type, last_modified: Timestamp::Now, expires: Expiry::Never }
    }

    /// Sets an explicit last-modification time.
    pub fn with_last_modified(mut self, time: SystemTime) -> Self {
        self.last_modified = Timestamp::At(time);
        self
    }

    /// Sets an explicit expiration time.
    pub fn with_expires(mut self, time: SystemTime) -> Self {
        self.expires = Expiry::At(time);
        self
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub fn last_modified(&self) -> Timestamp {
        self.last_modified
    }

    pub fn expires(&self) -> Expiry {
        self.expires
    }
}

impl Default for ContentMetadata {
    fn default() -> Self {
        Self::new(mime::APPLICATION_OCTET_STREAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn default_is_octet_stream_now_never() {
        let stat = ContentMetadata::default();
        assert_eq!(stat.content_type(), &mime::APPLICATION_OCTET_STREAM);
        assert_eq!(stat.last_modified(), Timestamp::Now);
        assert_eq!(stat.expires(), Expiry::Never);
    }

    #[test]
    fn explicit_timestamps() {
        let modified = UNIX_EPOCH + Duration::from_secs(1_000_000);
        let expires = UNIX_EPOCH + Duration::from_secs(2_000_000);

        let stat = ContentMetadata::new(mime::TEXT_PLAIN_UTF_8)
            .with_last_modified(modified)
            .with_expires(expires);

        assert_eq!(stat.content_type(), &mime::TEXT_PLAIN_UTF_8);
        assert_eq!(stat.last_modified(), Timestamp::At(modified));
        assert_eq!(stat.last_modified().or_now(), modified);
        assert_eq!(stat.expires(), Expiry::At(expires));
    }

    #[test]
    fn now_sentinel_resolves_to_current_time() {
        let resolved = Timestamp::Now.or_now();
        let distance = match SystemTime::now().duration_since(resolved) {
            Ok(elapsed) => elapsed,
            Err(e) => e.duration(),
        };
        assert!(distance < Duration::from_secs(60));
    }
}
