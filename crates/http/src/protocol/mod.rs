//! Core protocol types shared by the codecs, the dispatch seam and the
//! routing layer above.
//!
//! The protocol surface of this server is deliberately closed:
//!
//! - **Status Codes** ([`StatusCode`]): the five statuses the server can
//!   produce, with total reverse lookup over the set
//! - **Methods** ([`Method`]): the request methods the server understands
//! - **Queries** ([`QueryParams`]): raw key/value parameters of a request
//!   target, duplicate keys rejected
//! - **Requests** ([`HttpRequest`]): the request contract handlers consume,
//!   the target split once into path and query
//! - **Responses** ([`ResponseEntity`] / [`ResponseBody`]): the abstract
//!   response description handlers produce, serialized by the encoder
//!
//! Errors are split by concern: [`ProtocolError`] for value type violations,
//! [`ParseError`] for request decoding, [`SendError`] for response encoding,
//! [`DispatchError`] for the dispatch seam, and [`HttpError`] composing the
//! per-connection failure cases.

mod status;
pub use status::StatusCode;

mod method;
pub use method::Method;

mod query;
pub use query::QueryParams;

mod request;
pub use request::HttpRequest;

mod response;
pub use response::ResponseBody;
pub use response::ResponseEntity;

mod error;
pub use error::DispatchError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::ProtocolError;
pub use error::SendError;
