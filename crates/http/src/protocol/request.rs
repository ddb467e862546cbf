//! The request contract consumed by routing and handlers.

use crate::protocol::{Method, ProtocolError, QueryParams};

/// A parsed HTTP request as handlers see it.
///
/// Produced by the request decoder, or by any other parser feeding an
/// exchange. The raw request target is split exactly once here: `path`
/// carries the part before the first `?`, `query` the parsed parameters
/// after it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query: QueryParams,
}

impl HttpRequest {
    /// Builds a request from a method and the raw request target.
    ///
    /// Fails when the target's query violates [`QueryParams::parse`].
    pub fn new(method: Method, target: &str) -> Result<Self, ProtocolError> {
        let query = QueryParams::parse(target)?;
        let path = match target.split_once('?') {
            Some((path, _)) => path,
            None => target,
        };

        Ok(Self { method, path: path.to_owned(), query })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The request path without any query suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_target_into_path_and_query() {
        let request = HttpRequest::new(Method::Get, "/index.html?a=1&b=2").unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.query().get("a"), Some("1"));
        assert_eq!(request.query().get("b"), Some("2"));
    }

    #[test]
    fn target_without_query_keeps_full_path() {
        let request = HttpRequest::new(Method::Get, "/").unwrap();

        assert_eq!(request.path(), "/");
        assert!(!request.query().has_parameters());
    }

    #[test]
    fn bare_question_mark_strips_to_path() {
        let request = HttpRequest::new(Method::Get, "/a?").unwrap();

        assert_eq!(request.path(), "/a");
        assert!(request.query().is_empty());
    }

    #[test]
    fn duplicate_query_key_fails_construction() {
        assert!(HttpRequest::new(Method::Get, "/a?x=1&x=2").is_err());
    }
}
