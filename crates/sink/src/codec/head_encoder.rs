//! Serialization of the response head.
//!
//! Writes the HTTP/1.1 status line and headers, inserting the framing header
//! implied by the announced [`PayloadSize`]: `content-length` for exact and
//! empty payloads, `transfer-encoding: chunked` otherwise.

use crate::protocol::{PayloadSize, SinkError};
use crate::transport::ResponseHead;

use bytes::{BufMut, BytesMut};
use http::{HeaderValue, Version, header};
use std::io;
use std::io::{ErrorKind, Write};
use tokio_util::codec::Encoder;
use tracing::error;

/// Initial buffer size reserved for head serialization
const INIT_HEAD_SIZE: usize = 4 * 1024;

/// Encoder for the response head implementing the [`Encoder`] trait over
/// `(ResponseHead, PayloadSize)`.
pub struct HeadEncoder;

impl Encoder<(ResponseHead, PayloadSize)> for HeadEncoder {
    type Error = SinkError;

    fn encode(&mut self, item: (ResponseHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut head, payload_size) = item;

        dst.reserve(INIT_HEAD_SIZE);
        match head.version() {
            Version::HTTP_11 => {
                write!(
                    FastWrite(dst),
                    "HTTP/1.1 {} {}\r\n",
                    head.status().as_str(),
                    head.status().canonical_reason().unwrap_or("Unknown")
                )?;
            }
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(SinkError::io(io::Error::from(ErrorKind::Unsupported)));
            }
        }

        // framing header implied by the payload size decision
        match payload_size {
            PayloadSize::Length(n) => {
                head.headers_mut().insert(header::CONTENT_LENGTH, n.into());
            }
            PayloadSize::Chunked => {
                head.headers_mut().insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
            }
            PayloadSize::Empty => {
                const ZERO_VALUE: HeaderValue = HeaderValue::from_static("0");
                head.headers_mut().insert(header::CONTENT_LENGTH, ZERO_VALUE);
            }
        }

        for (header_name, header_value) in head.headers().iter() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Avoids unnecessary bounds checking when writing to the bytes buffer,
/// since enough space was already reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Response, StatusCode};

    fn encode(head: ResponseHead, payload_size: PayloadSize) -> String {
        let mut dst = BytesMut::new();
        HeadEncoder.encode((head, payload_size), &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn exact_framing_announces_content_length() {
        let head = Response::builder().status(StatusCode::OK).body(()).unwrap();
        let out = encode(head, PayloadSize::Length(5));
        assert_eq!(out, "HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\n");
    }

    #[test]
    fn chunked_framing_announces_transfer_encoding() {
        let head = Response::builder().status(StatusCode::OK).body(()).unwrap();
        let out = encode(head, PayloadSize::Chunked);
        assert_eq!(out, "HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n");
    }

    #[test]
    fn empty_framing_announces_zero_length() {
        let head = Response::builder().status(StatusCode::NOT_MODIFIED).body(()).unwrap();
        let out = encode(head, PayloadSize::Empty);
        assert_eq!(out, "HTTP/1.1 304 Not Modified\r\ncontent-length: 0\r\n\r\n");
    }

    #[test]
    fn carries_caller_headers() {
        let head = Response::builder()
            .status(StatusCode::SEE_OTHER)
            .header(header::LOCATION, "/elsewhere")
            .body(())
            .unwrap();
        let out = encode(head, PayloadSize::Empty);
        assert!(out.starts_with("HTTP/1.1 303 See Other\r\n"));
        assert!(out.contains("location: /elsewhere\r\n"));
        assert!(out.contains("content-length: 0\r\n"));
        assert!(out.ends_with("\r\n\r\n"));
    }

    #[test]
    fn rejects_unsupported_versions() {
        let head = Response::builder().status(StatusCode::OK).version(Version::HTTP_2).body(()).unwrap();
        let mut dst = BytesMut::new();
        let err = HeadEncoder.encode((head, PayloadSize::Empty), &mut dst).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
