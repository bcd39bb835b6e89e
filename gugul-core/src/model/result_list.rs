//! Search hits and their projection into display rows.

use std::{ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder rows shown while a search is in flight.
pub const DEFAULT_PLACEHOLDER_ROWS: usize = 10;

/// One search hit as returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub title: String,

    /// Navigable target, `None` for hits that cannot be opened
    #[serde(default, alias = "url", alias = "link")]
    pub href: Option<String>,

    #[serde(default, alias = "snippet")]
    pub description: Option<String>,
}

impl ResultRecord {
    pub fn new(title: impl Into<String>, href: Option<&str>) -> Self {
        Self {
            title: title.into(),
            href: href.map(str::to_owned),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Target to navigate to, ignoring blank hrefs.
    pub fn target(&self) -> Option<&str> {
        self.href.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    #[inline]
    pub fn is_navigable(&self) -> bool {
        self.target().is_some()
    }

    /// Compact `host/path` form of the target for the row's second line.
    pub fn display_url(&self) -> Option<String> {
        let target = self.target()?;
        match Url::parse(target) {
            Ok(url) => {
                let host = url.host_str().unwrap_or_default();
                let path = url.path().trim_end_matches('/');
                Some(format!("{host}{path}"))
            }
            Err(_) => Some(target.to_owned()),
        }
    }
}

/// Immutable, cheaply clonable result list. Replaced wholesale per search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultList(Arc<[ResultRecord]>);

impl ResultList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both lists are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ResultList {
    type Target = [ResultRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ResultRecord>> for ResultList {
    fn from(records: Vec<ResultRecord>) -> Self {
        Self(Arc::from(records.into_boxed_slice()))
    }
}

impl FromIterator<ResultRecord> for ResultList {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One visual row of the result area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRow<'a> {
    Hit {
        /// Index into the full `ResultList`
        index: usize,
        record: &'a ResultRecord,
        selected: bool,
    },
    Placeholder,
}

impl ResultRow<'_> {
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Hit { selected: true, .. })
    }
}

/// Project the list into rows: placeholders while loading, otherwise one row
/// per navigable record with at most one flagged as selected.
pub fn project_rows<'a>(
    results: &'a [ResultRecord],
    selected: usize,
    loading: bool,
    placeholder_rows: usize,
) -> Vec<ResultRow<'a>> {
    if loading {
        return vec![ResultRow::Placeholder; placeholder_rows];
    }

    results
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_navigable())
        .map(|(index, record)| ResultRow::Hit {
            index,
            record,
            selected: index == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(hrefs: &[Option<&str>]) -> ResultList {
        hrefs
            .iter()
            .enumerate()
            .map(|(i, href)| ResultRecord::new(format!("hit {i}"), *href))
            .collect()
    }

    #[test]
    fn test_records_without_target_are_dropped() {
        let results = hits(&[None, Some("/a")]);
        let rows = project_rows(&results, 0, false, DEFAULT_PLACEHOLDER_ROWS);

        assert_eq!(rows.len(), 1);
        match rows[0] {
            ResultRow::Hit { index, selected, .. } => {
                assert_eq!(index, 1);
                // selection points at the dropped record
                assert!(!selected);
            }
            ResultRow::Placeholder => panic!("expected a hit row"),
        }
    }

    #[test]
    fn test_blank_href_is_not_navigable() {
        let results = hits(&[Some("   "), Some("https://a.example/"), Some("")]);
        let rows = project_rows(&results, 1, false, DEFAULT_PLACEHOLDER_ROWS);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_selected());
    }

    #[test]
    fn test_exactly_one_row_selected() {
        let results = hits(&[Some("/a"), Some("/b"), Some("/c")]);
        let rows = project_rows(&results, 2, false, DEFAULT_PLACEHOLDER_ROWS);

        assert_eq!(rows.iter().filter(|r| r.is_selected()).count(), 1);
        assert!(rows[2].is_selected());
    }

    #[test]
    fn test_out_of_range_selection_flags_nothing() {
        let results = hits(&[Some("/a")]);
        let rows = project_rows(&results, 7, false, DEFAULT_PLACEHOLDER_ROWS);
        assert!(rows.iter().all(|r| !r.is_selected()));
    }

    #[test]
    fn test_loading_substitutes_placeholders() {
        let results = hits(&[Some("/a"), Some("/b")]);
        let rows = project_rows(&results, 0, true, DEFAULT_PLACEHOLDER_ROWS);

        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| *r == ResultRow::Placeholder));
    }

    #[test]
    fn test_display_url_strips_scheme() {
        let record = ResultRecord::new("Rust", Some("https://www.rust-lang.org/learn/"));
        assert_eq!(record.display_url().as_deref(), Some("www.rust-lang.org/learn"));

        let relative = ResultRecord::new("A", Some("/a"));
        assert_eq!(relative.display_url().as_deref(), Some("/a"));
    }

    #[test]
    fn test_record_accepts_url_alias() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"title":"T","url":"https://t.example","snippet":"s"}"#)
                .unwrap();
        assert_eq!(record.target(), Some("https://t.example"));
        assert_eq!(record.description.as_deref(), Some("s"));
    }
}
