//! A bounded-concurrency HTTP server built on `turnstile-http`.
//!
//! The building blocks, bottom up:
//!
//! - [`WorkerPool`]: counting-semaphore worker capacity, reserved before
//!   accept and released on task completion
//! - [`Connector`]: the listening socket and its accept loop, with
//!   backpressure and graceful stop
//! - [`Handler`] / [`Router`]: ordered first-match request routing
//! - [`Server`]: composes the above and runs until a shutdown trigger
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use turnstile_http::protocol::{DispatchError, HttpRequest, Method, ResponseEntity, StatusCode};
//! use turnstile_web::{Handler, Server};
//!
//! struct HomeHandler;
//!
//! #[async_trait]
//! impl Handler for HomeHandler {
//!     fn can_handle(&self, request: &HttpRequest) -> bool {
//!         request.path() == "/"
//!     }
//!
//!     async fn handle(&self, request: &HttpRequest) -> Result<ResponseEntity, DispatchError> {
//!         if request.method() != Method::Get {
//!             return Err(DispatchError::unsupported_method(request.method()));
//!         }
//!         Ok(ResponseEntity::text(StatusCode::Ok, "hello\r\n"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     Server::builder()
//!         .port(8080)
//!         .handler(HomeHandler)
//!         .build()
//!         .run()
//!         .await
//!         .expect("server failed");
//! }
//! ```

mod connector;
mod pool;
mod router;
mod server;

pub use connector::Connector;
pub use connector::ConnectorConfig;
pub use connector::{DEFAULT_BACKLOG, DEFAULT_MAX_WORKERS, DEFAULT_PORT};
pub use pool::WorkerPool;
pub use pool::WorkerSlot;
pub use router::Handler;
pub use router::Router;
pub use router::RouterBuilder;
pub use router::RouterDispatcher;
pub use server::ServeError;
pub use server::Server;
pub use server::ServerBuilder;
