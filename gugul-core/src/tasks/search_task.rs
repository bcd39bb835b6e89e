//! ``src/tasks/search_task.rs``
//! ============================================================================
//! # Search Task: one outstanding backend call
//!
//! A `SearchTask` pairs a query with a `CancellationToken`. The controller
//! keeps at most one live task; starting another cancels the previous token.
//! The backend receives the token and may stop early, and whoever consumes
//! the outcome checks the token again before touching state.

use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span};

use crate::{
    config::{BackendConfig, Config},
    controller::event_loop::TaskResult,
    error::{AppError, SearchError},
    model::result_list::ResultList,
    tasks::{command_search::CommandBackend, index_search::IndexBackend},
};

/// External search provider.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Run `query`. Implementations should return promptly once `cancel`
    /// fires; whatever they return afterwards is discarded.
    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<ResultList, SearchError>;
}

/// Build the backend selected in `config`.
pub fn backend_from_config(config: &Config) -> Result<Arc<dyn SearchBackend>, AppError> {
    let backend: Arc<dyn SearchBackend> = match &config.backend {
        BackendConfig::Index { .. } => Arc::new(IndexBackend::open(config.index_path()?)),
        BackendConfig::Command {
            program,
            args,
            rate_limit_exit_code,
            timeout,
        } => Arc::new(CommandBackend::new(
            program.as_str(),
            args.clone(),
            *rate_limit_exit_code,
            *timeout,
        )),
    };
    Ok(backend)
}

/// Handle to one dispatched search.
#[derive(Debug, Clone)]
pub struct SearchTask {
    id: u64,
    query: CompactString,
    token: CancellationToken,
}

impl SearchTask {
    pub fn new(id: u64, query: impl Into<CompactString>) -> Self {
        Self {
            id,
            query: query.into(),
            token: CancellationToken::new(),
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Mark the task stale. Its outcome will be ignored.
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run the backend call in the background and report through `task_tx`.
    pub fn spawn(
        &self,
        backend: Arc<dyn SearchBackend>,
        task_tx: UnboundedSender<TaskResult>,
    ) -> JoinHandle<()> {
        let task = self.clone();
        let span = info_span!(
            "search_task",
            task_id = task.id,
            backend = backend.name(),
            query = %task.query,
        );

        tokio::spawn(
            async move {
                debug!("search dispatched");
                let outcome = backend.search(&task.query, task.token.clone()).await;

                if task.is_aborted() {
                    debug!("search aborted before completion was reported");
                    return;
                }

                match &outcome {
                    Ok(results) => debug!(count = results.len(), "search resolved"),
                    Err(err) => debug!(error = %err, "search rejected"),
                }

                let _ = task_tx.send(TaskResult::Search { task, outcome });
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result_list::ResultRecord;
    use tokio::sync::mpsc;

    struct Fixed;

    #[async_trait]
    impl SearchBackend for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(
            &self,
            query: &str,
            _cancel: CancellationToken,
        ) -> Result<ResultList, SearchError> {
            Ok(vec![ResultRecord::new(query, Some("/q"))].into())
        }
    }

    struct Pending;

    #[async_trait]
    impl SearchBackend for Pending {
        fn name(&self) -> &'static str {
            "pending"
        }

        async fn search(
            &self,
            _query: &str,
            cancel: CancellationToken,
        ) -> Result<ResultList, SearchError> {
            cancel.cancelled().await;
            Ok(ResultList::empty())
        }
    }

    #[tokio::test]
    async fn test_spawn_reports_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = SearchTask::new(1, "cats");

        task.spawn(Arc::new(Fixed), tx).await.unwrap();

        match rx.recv().await {
            Some(TaskResult::Search { task, outcome }) => {
                assert_eq!(task.id(), 1);
                assert_eq!(outcome.unwrap()[0].title, "cats");
            }
            None => panic!("no task result"),
        }
    }

    #[tokio::test]
    async fn test_aborted_task_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = SearchTask::new(2, "dogs");

        let handle = task.spawn(Arc::new(Pending), tx);
        task.abort();
        handle.await.unwrap();

        assert!(task.is_aborted());
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_backend_from_config() {
        let config = Config::parse(
            r#"
            [backend]
            kind = "command"
            program = "gugul-search"
            "#,
        )
        .unwrap();
        assert_eq!(backend_from_config(&config).unwrap().name(), "command");

        let config = Config::parse(
            r#"
            [backend]
            kind = "index"
            path = "/tmp/index.json"
            "#,
        )
        .unwrap();
        assert_eq!(backend_from_config(&config).unwrap().name(), "index");
    }

    #[test]
    fn test_clones_share_the_token() {
        let task = SearchTask::new(3, "q");
        let clone = task.clone();
        task.abort();
        assert!(clone.is_aborted());
    }
}
