//! HTTP request decoder module
//!
//! Decodes one request head (request line plus headers) from the wire and
//! drains any `Content-Length` body bytes before yielding the parsed
//! [`HttpRequest`]. Body content is discarded: handlers in this server work
//! on the request line alone, but the connection still has to consume what
//! the peer sent before a response goes out.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum size of the header section: 8KB

use bytes::{Buf, BytesMut};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{HttpRequest, Method, ParseError};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the whole header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// A decoder for HTTP requests implementing the [`Decoder`] trait
///
/// The decoder operates in two phases:
/// 1. Head parsing: request line and headers via `httparse`
/// 2. Body draining: if the head announced a `Content-Length`, those bytes
///    are consumed and dropped before the request is yielded
///
/// The `pending` field carries a parsed head across `decode` calls while
/// its body bytes are still arriving.
pub struct RequestDecoder {
    pending: Option<(HttpRequest, u64)>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    fn drain_body(
        &mut self,
        request: HttpRequest,
        remaining: u64,
        src: &mut BytesMut,
    ) -> Result<Option<HttpRequest>, ParseError> {
        let available = src.len() as u64;
        if available < remaining {
            src.clear();
            self.pending = Some((request, remaining - available));
            return Ok(None);
        }

        src.advance(remaining as usize);
        Ok(Some(request))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = HttpRequest;
    type Error = ParseError;

    /// Attempts to decode a complete request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: head parsed and body fully drained
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // finish draining the body of a previously parsed head
        if let Some((request, remaining)) = self.pending.take() {
            return self.drain_body(request, remaining, src);
        }

        // the smallest complete head is "GET / HTTP/1.1\r\n\r\n"
        if src.len() < 14 {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut parsed = httparse::Request::new(&mut headers);

        let parsed_result = parsed.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        let (request, head_size, body_size) = match parsed_result? {
            Status::Complete(head_size) => {
                trace!(head_size, "parsed request head");
                ensure!(head_size <= MAX_HEADER_BYTES, ParseError::too_large_header(head_size, MAX_HEADER_BYTES));

                match parsed.version {
                    Some(0 | 1) => {}
                    version => return Err(ParseError::InvalidVersion(version)),
                }

                let method: Method = parsed.method.ok_or(ParseError::InvalidRequestLine)?.parse()?;
                let target = parsed.path.ok_or(ParseError::InvalidRequestLine)?;
                let request = HttpRequest::new(method, target)?;

                let body_size = content_length(parsed.headers)?;
                (request, head_size, body_size)
            }

            // incomplete head, the buffer still has to respect the limit
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        src.advance(head_size);
        self.drain_body(request, body_size, src)
    }
}

/// Reads the announced body size from a parsed header list.
///
/// A missing `Content-Length` means no body. Transfer encodings are not
/// supported by this decoder.
fn content_length(headers: &[httparse::Header<'_>]) -> Result<u64, ParseError> {
    for header in headers {
        if header.name.eq_ignore_ascii_case("content-length") {
            let value = std::str::from_utf8(header.value)
                .map_err(|_| ParseError::invalid_content_length("value is not utf-8"))?;
            return value
                .trim()
                .parse::<u64>()
                .map_err(|_| ParseError::invalid_content_length(format!("value {value} is not u64")));
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let mut buf = BytesMut::from(str);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/index.html");
        assert!(!request.query().has_parameters());
        assert!(buf.is_empty());
    }

    #[test]
    fn query_suffix_is_parsed() {
        let str = indoc! {r##"
        GET /index.html?a=1&b=2 HTTP/1.1
        Host: 127.0.0.1:8080

        "##};

        let mut buf = BytesMut::from(str);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.query().get("a"), Some("1"));
        assert_eq!(request.query().get("b"), Some("2"));
    }

    #[test]
    fn partial_head_needs_more_data() {
        let mut buf = BytesMut::from("GET /index.html HTTP/1.1\r\nHost: 127.");
        let mut decoder = RequestDecoder::new();

        assert!(decoder.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut raw = b"GET / HTTP/1.1\r\nX-Padding: ".to_vec();
        raw.extend(vec![b'a'; MAX_HEADER_BYTES]);
        raw.extend_from_slice(b"\r\n\r\n");

        let mut buf = BytesMut::from(&raw[..]);
        let mut decoder = RequestDecoder::new();

        let err = decoder.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { .. }));
    }

    #[test]
    fn content_length_body_is_drained() {
        let str = indoc! {r##"
        POST /login HTTP/1.1
        Host: 127.0.0.1:8080
        Content-Length: 11

        name=foobar"##};

        let mut buf = BytesMut::from(str);
        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/login");
        assert!(buf.is_empty());
    }

    #[test]
    fn body_split_across_reads_is_drained() {
        let head = indoc! {r##"
        POST /login HTTP/1.1
        Host: 127.0.0.1:8080
        Content-Length: 11

        name="##};

        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(head);

        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"foobar");
        let request = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.path(), "/login");
        assert!(buf.is_empty());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut buf = BytesMut::from("BREW /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let err = RequestDecoder::new().decode(&mut buf).unwrap_err();

        assert!(matches!(err, ParseError::Protocol { .. }));
    }

    #[test]
    fn duplicate_query_key_is_rejected() {
        let mut buf = BytesMut::from("GET /a?x=1&x=2 HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert!(RequestDecoder::new().decode(&mut buf).is_err());
    }

    #[test]
    fn bad_content_length_is_rejected() {
        let str = indoc! {r##"
        POST /login HTTP/1.1
        Content-Length: abc

        "##};

        let mut buf = BytesMut::from(str);
        let err = RequestDecoder::new().decode(&mut buf).unwrap_err();

        assert!(matches!(err, ParseError::InvalidContentLength { .. }));
    }
}
