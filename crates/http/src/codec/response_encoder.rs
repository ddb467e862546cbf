//! HTTP response encoder module
//!
//! Serializes a [`ResponseEntity`] into an HTTP/1.1 response. The encoder
//! always announces a `Content-Length`: connections are not reused, but a
//! well-formed response keeps clients from waiting on EOF to frame the
//! body. Forward targets are resolved to their content through a pluggable
//! [`ForwardResolver`]; an unresolvable target degrades to an empty 404.

use std::io;
use std::io::Write;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::protocol::{ResponseBody, ResponseEntity, SendError, StatusCode};

/// Initial buffer size reserved for a response
const INIT_RESPONSE_SIZE: usize = 1024;

/// Resolves a forward target to the content that should be served for it.
pub type ForwardResolver = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// An encoder for HTTP responses implementing the [`Encoder`] trait
#[derive(Clone, Default)]
pub struct ResponseEncoder {
    resolver: Option<ForwardResolver>,
}

impl ResponseEncoder {
    /// Creates an encoder without a forward resolver; every forward target
    /// degrades to 404.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates an encoder resolving forward targets through `resolver`.
    pub fn with_resolver(resolver: ForwardResolver) -> Self {
        Self { resolver: Some(resolver) }
    }

    fn resolve(&self, path: &str) -> Option<String> {
        self.resolver.as_ref().and_then(|resolver| resolver(path))
    }
}

impl Encoder<ResponseEntity> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponseEntity, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (status, body) = item.into_parts();

        // resolve the body descriptor before any byte goes out, a missed
        // forward target rewrites the status line as well
        let (status, payload, location) = match body {
            ResponseBody::Empty => (status, None, None),
            ResponseBody::Text(text) => (status, Some(text), None),
            ResponseBody::Redirect(target) => (status, None, Some(target)),
            ResponseBody::Forward(path) => match self.resolve(&path) {
                Some(content) => (status, Some(content), None),
                None => {
                    warn!(path = %path, "no content for forward target");
                    (StatusCode::NotFound, None, None)
                }
            },
        };

        dst.reserve(INIT_RESPONSE_SIZE);
        write!(FastWrite(dst), "HTTP/1.1 {status}\r\n")?;

        if let Some(location) = &location {
            write!(FastWrite(dst), "Location: {location}\r\n")?;
        }

        match &payload {
            Some(content) => {
                dst.put_slice(b"Content-Type: text/html;charset=utf-8\r\n");
                write!(FastWrite(dst), "Content-Length: {}\r\n", content.len())?;
            }
            None => dst.put_slice(b"Content-Length: 0\r\n"),
        }
        dst.put_slice(b"\r\n");

        if let Some(content) = payload {
            dst.put_slice(content.as_bytes());
        }

        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Writing through `io::Write` lets the status line and headers use the
/// `write!` formatting machinery without an intermediate allocation.
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
