//! Wire codecs for the exchange layer.
//!
//! [`RequestDecoder`] and [`ResponseEncoder`] are the shipped
//! implementations of the two collaborator seams an exchange is generic
//! over: anything implementing `Decoder<Item = HttpRequest, Error =
//! ParseError>` can feed requests in, anything implementing
//! `Encoder<ResponseEntity, Error = SendError>` can put responses on the
//! wire.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::{Decoder, Encoder};
//! use turnstile_http::codec::{RequestDecoder, ResponseEncoder};
//! use turnstile_http::protocol::{ResponseEntity, StatusCode};
//!
//! let mut decoder = RequestDecoder::new();
//! let mut read_buffer = BytesMut::from("GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
//! let request = decoder.decode(&mut read_buffer).unwrap().unwrap();
//! assert_eq!(request.path(), "/");
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut write_buffer = BytesMut::new();
//! encoder.encode(ResponseEntity::of(StatusCode::Ok), &mut write_buffer).unwrap();
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ForwardResolver;
pub use response_encoder::ResponseEncoder;
