//! Per-connection exchange handling
//!
//! [`HttpExchange`] owns the framed halves of one accepted connection and
//! drives the decode, dispatch, respond cycle for a single request.
//! Failures are contained here: nothing that happens inside an exchange
//! reaches the acceptor or other connections.

mod exchange;

pub use exchange::HttpExchange;
