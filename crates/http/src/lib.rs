//! A tiny asynchronous HTTP server library serving one request per connection
//!
//! This crate provides the protocol plumbing for a deliberately small HTTP server
//! built on top of tokio: parse one request, dispatch it, write one response, close.
//! It is the lower half of the `turnstile` server; the accept loop, worker pool and
//! router live in the `turnstile-web` crate and plug in through the seams defined here.
//!
//! # Features
//!
//! - HTTP/1.0 and HTTP/1.1 request parsing via `httparse`
//! - Asynchronous I/O using tokio
//! - One exchange per connection, no keep-alive, no pipelining
//! - `Content-Length` bodies drained and discarded before responding
//! - Closed protocol surface: five status codes, six methods
//! - Pluggable parser and writer seams through the `tokio_util` codec traits
//! - Clean error handling
//!
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use turnstile_http::connection::HttpExchange;
//! use turnstile_http::handler::make_dispatcher;
//! use turnstile_http::protocol::{DispatchError, HttpRequest, ResponseEntity, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let dispatcher = Arc::new(make_dispatcher(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let dispatcher = Arc::clone(&dispatcher);
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let exchange = HttpExchange::new(reader, writer);
//!             match exchange.process(dispatcher).await {
//!                 Ok(()) => {
//!                     info!("finished exchange, connection shutdown");
//!                 }
//!                 Err(e) => {
//!                     error!("exchange has error, cause {}, connection shutdown", e);
//!                 }
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: HttpRequest) -> Result<ResponseEntity, DispatchError> {
//!     info!("request path {}", request.path());
//!     Ok(ResponseEntity::text(StatusCode::Ok, "Hello World!\r\n"))
//! }
//! ```
//!
//!
//! # Architecture
//!
//! The crate is organized into several key modules, bottom up:
//!
//! - [`protocol`]: Protocol value types and errors shared by every layer
//! - [`codec`]: The shipped request decoder and response encoder
//! - [`connection`]: [`connection::HttpExchange`], driving one request
//!   through the parse, dispatch, respond cycle
//! - [`handler`]: The [`handler::Dispatcher`] seam the layer above implements
//!
//! ## Error Handling
//!
//! An exchange contains its failures. A request that cannot be parsed or
//! dispatched answers `500 Internal Server Error` on the same connection;
//! parse failures additionally surface as [`protocol::HttpError`] to the
//! caller for logging. Nothing panics on malformed input.
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors
//! - [`protocol::SendError`]: Response sending errors
//! - [`protocol::DispatchError`]: Failures crossing the dispatch seam
//!
//! # Limitations
//!
//! - HTTP/1.1 and HTTP/1.0 only
//! - No TLS support (use a reverse proxy for HTTPS)
//! - One request per connection, the server closes after responding
//! - Request bodies are drained, not delivered to handlers
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64


pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
