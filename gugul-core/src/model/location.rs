//! Address of the search screen: `/` plus an optional `query` parameter.

use std::fmt;

use compact_str::CompactString;
use url::{Url, form_urlencoded};

use crate::error::AppError;

const BASE: &str = "gugul://localhost/";
const QUERY_PARAM: &str = "query";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    query: Option<CompactString>,
}

impl Location {
    /// Location for the given text; an empty query clears the parameter.
    pub fn for_query(query: &str) -> Self {
        Self {
            query: (!query.is_empty()).then(|| CompactString::from(query)),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Parse `/?query=...`, `?query=...` or an absolute `gugul://` address.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let base = Url::parse(BASE).map_err(|e| AppError::location(BASE, e.to_string()))?;
        let url = base
            .join(input.trim())
            .map_err(|e| AppError::location(input, e.to_string()))?;

        let query = url
            .query_pairs()
            .find(|(key, _)| key == QUERY_PARAM)
            .map(|(_, value)| CompactString::from(value.as_ref()));

        Ok(Self {
            query: query.filter(|q| !q.is_empty()),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            None => f.write_str("/"),
            Some(query) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair(QUERY_PARAM, query)
                    .finish();
                write!(f, "/?{encoded}")
            }
        }
    }
}

/// Receives the location every time the query text changes.
pub trait LocationSync: Send {
    fn push(&mut self, location: &Location);
}
