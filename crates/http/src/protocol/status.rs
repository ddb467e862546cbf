//! Status codes as a closed set.
//!
//! This server only ever produces a fixed handful of status codes, so they
//! are modeled as an enum rather than a general numeric type: the code and
//! reason phrase pairs are statically known, and reverse lookup is total
//! over the set or fails loudly.

use std::fmt;

use crate::protocol::ProtocolError;

/// The status codes this server can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 401 Unauthorized
    Unauthorized,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    const ALL: [StatusCode; 5] = [
        StatusCode::Ok,
        StatusCode::Found,
        StatusCode::Unauthorized,
        StatusCode::NotFound,
        StatusCode::InternalServerError,
    ];

    /// Looks up the variant matching a numeric `code`.
    ///
    /// A code outside the declared set indicates a programming defect and
    /// fails with [`ProtocolError::UnknownStatusCode`].
    pub fn of(code: u16) -> Result<StatusCode, ProtocolError> {
        Self::ALL.into_iter().find(|status| status.code() == code).ok_or(ProtocolError::UnknownStatusCode { code })
    }

    /// The numeric code, e.g. `200`.
    pub const fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// The fixed reason phrase, e.g. `"OK"`.
    pub const fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    /// Renders in status line form, e.g. `200 OK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
