use std::io;
use thiserror::Error;

use crate::protocol::Method;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Violations of the protocol value types' contracts.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("no status code matching [{code}]")]
    UnknownStatusCode { code: u16 },

    #[error("unknown http method [{token}]")]
    UnknownMethod { token: String },

    #[error("duplicate query parameter key [{key}]")]
    DuplicateQueryKey { key: String },
}

impl ProtocolError {
    pub fn unknown_method<S: ToString>(token: S) -> Self {
        Self::UnknownMethod { token: token.to_string() }
    }

    pub fn duplicate_query_key<S: ToString>(key: S) -> Self {
        Self::DuplicateQueryKey { key: key.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid request line")]
    InvalidRequestLine,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("protocol violation: {source}")]
    Protocol {
        #[from]
        source: ProtocolError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_response<S: ToString>(str: S) -> Self {
        Self::InvalidResponse { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Failures crossing the dispatch seam between an exchange and the routing
/// layer above it.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("method [{method}] not supported by the matched handler")]
    UnsupportedMethod { method: Method },

    #[error("handler failed: {reason}")]
    HandlerFailed { reason: String },
}

impl DispatchError {
    pub fn unsupported_method(method: Method) -> Self {
        Self::UnsupportedMethod { method }
    }

    pub fn handler_failed<S: ToString>(reason: S) -> Self {
        Self::HandlerFailed { reason: reason.to_string() }
    }
}
