//! In-process backend over a JSON file of records.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs as TokioFs, sync::OnceCell};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    error::SearchError,
    model::result_list::{ResultList, ResultRecord},
    tasks::{command_search::parse_records, search_task::SearchBackend},
};

pub struct IndexBackend {
    path: Option<PathBuf>,
    records: OnceCell<ResultList>,
}

impl IndexBackend {
    /// Backend reading `path` lazily on the first search.
    pub fn open(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            records: OnceCell::new(),
        }
    }

    pub fn from_records(records: Vec<ResultRecord>) -> Self {
        Self {
            path: None,
            records: OnceCell::new_with(Some(records.into())),
        }
    }

    async fn records(&self) -> Result<&ResultList, SearchError> {
        self.records
            .get_or_try_init(|| async {
                let Some(path) = &self.path else {
                    return Ok(ResultList::empty());
                };

                match TokioFs::read_to_string(path).await {
                    Ok(text) => {
                        let records = parse_records(&text).map_err(|e| SearchError::Index {
                            path: path.clone(),
                            reason: e.to_string(),
                        })?;
                        info!("Loaded {} records from {}", records.len(), path.display());
                        Ok(records)
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        warn!("Search index {} not found, answering empty", path.display());
                        Ok(ResultList::empty())
                    }
                    Err(e) => Err(SearchError::Index {
                        path: path.clone(),
                        reason: e.to_string(),
                    }),
                }
            })
            .await
    }
}

/// Every whitespace-separated term must appear in the title, description or
/// target, case-insensitively.
fn matches_terms(record: &ResultRecord, terms: &[String]) -> bool {
    let haystack = format!(
        "{} {} {}",
        record.title,
        record.description.as_deref().unwrap_or_default(),
        record.href.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    terms.iter().all(|term| haystack.contains(term.as_str()))
}

#[async_trait]
impl SearchBackend for IndexBackend {
    fn name(&self) -> &'static str {
        "index"
    }

    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<ResultList, SearchError> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Ok(ResultList::empty());
        }

        let records = self.records().await?;
        if cancel.is_cancelled() {
            return Ok(ResultList::empty());
        }

        Ok(records
            .iter()
            .filter(|record| matches_terms(record, &terms))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<ResultRecord> {
        vec![
            ResultRecord::new("Rust Programming Language", Some("https://www.rust-lang.org/"))
                .with_description("A language empowering everyone"),
            ResultRecord::new("Cats of the internet", Some("https://cats.example/"))
                .with_description("Pictures of cats"),
            ResultRecord::new("Rusty cats", None),
        ]
    }

    #[tokio::test]
    async fn test_all_terms_must_match() {
        let backend = IndexBackend::from_records(sample());
        let token = CancellationToken::new();

        let hits = backend.search("CATS rusty", token.clone()).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rusty cats");

        let hits = backend.search("cats", token).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_query_is_empty() {
        let backend = IndexBackend::from_records(sample());
        let hits = backend.search("   ", CancellationToken::new()).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_index() {
        let dir = TempDir::new().unwrap();
        let backend = IndexBackend::open(dir.path().join("index.json"));

        let hits = backend.search("rust", CancellationToken::new()).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_loads_records_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"[{"title":"Tokio","href":"https://tokio.rs","description":"async runtime"}]"#,
        )
        .unwrap();

        let backend = IndexBackend::open(path);
        let hits = backend.search("runtime", CancellationToken::new()).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target(), Some("https://tokio.rs"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_index_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = IndexBackend::open(path.clone());
        match backend.search("x", CancellationToken::new()).await {
            Err(SearchError::Index { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected index error, got {other:?}"),
        }
    }
}
