//! Query parameter parsing.
//!
//! Parameters live in the request target after the first `?`, as `key=value`
//! pairs joined by `&`. Parsing is deliberately plain: no percent decoding,
//! no nested structures, no repeated keys. A duplicate key is rejected
//! rather than silently resolved one way or the other.

use std::collections::HashMap;

use crate::protocol::ProtocolError;

/// Parsed query parameters of a request target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// An empty parameter mapping.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the query portion of `target`.
    ///
    /// Everything before the first `?` is ignored. A target without `?`, or
    /// with nothing after it, yields an empty mapping. Pairs split at the
    /// first `=`; a pair without `=` maps the key to the empty string, and
    /// empty pairs (from `&&` or a trailing `&`) are skipped.
    ///
    /// Duplicate keys fail with [`ProtocolError::DuplicateQueryKey`].
    pub fn parse(target: &str) -> Result<Self, ProtocolError> {
        let raw = match target.split_once('?') {
            Some((_, raw)) => raw,
            None => return Ok(Self::empty()),
        };

        let mut params = HashMap::new();
        for pair in raw.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };

            if params.insert(key.to_owned(), value.to_owned()).is_some() {
                return Err(ProtocolError::duplicate_query_key(key));
            }
        }

        Ok(Self { params })
    }

    /// True iff the mapping holds at least one parameter.
    pub fn has_parameters(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
