//! Response descriptions produced by handlers.
//!
//! A handler answers with a [`ResponseEntity`], an abstract description of
//! the response: a [`StatusCode`] plus a body descriptor. Putting the
//! description on the wire is the response encoder's concern, including the
//! resolution of forward targets to actual content.

use crate::protocol::StatusCode;

/// What a response carries besides its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body at all.
    Empty,
    /// An inline text body, served as html.
    Text(String),
    /// A resource path to render, resolved by the response encoder.
    Forward(String),
    /// A `Location` target for a redirect response.
    Redirect(String),
}

/// Abstract response description: status plus body descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEntity {
    status: StatusCode,
    body: ResponseBody,
}

impl ResponseEntity {
    /// A bodyless response with the given status.
    pub fn of(status: StatusCode) -> Self {
        Self { status, body: ResponseBody::Empty }
    }

    /// A response carrying an inline text body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: ResponseBody::Text(body.into()) }
    }

    /// A response whose body is rendered from `path` by the encoder.
    pub fn forward(status: StatusCode, path: impl Into<String>) -> Self {
        Self { status, body: ResponseBody::Forward(path.into()) }
    }

    /// A `302 Found` redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self { status: StatusCode::Found, body: ResponseBody::Redirect(location.into()) }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn into_parts(self) -> (StatusCode, ResponseBody) {
        (self.status, self.body)
    }
}
