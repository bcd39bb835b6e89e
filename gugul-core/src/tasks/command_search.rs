//! ``src/tasks/command_search.rs``
//! ============================================================================
//! # Command backend: delegate the query to an external program
//!
//! The program gets the query as its last argument and prints either a JSON
//! array of records or one JSON record per line on stdout. A dedicated exit
//! code reports rate limiting.

use std::{
    process::{Output, Stdio},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{process::Command, time::timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    error::{RATE_LIMIT_STATUS, SearchError},
    model::result_list::{ResultList, ResultRecord},
    tasks::search_task::SearchBackend,
};

#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    rate_limit_exit_code: i32,
    timeout: Duration,
}

impl CommandBackend {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        rate_limit_exit_code: i32,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            rate_limit_exit_code,
            timeout,
        }
    }

    fn command(&self, query: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn check_status(&self, output: &Output) -> Result<(), SearchError> {
        if output.status.success() {
            return Ok(());
        }

        match output.status.code() {
            Some(code) if code == self.rate_limit_exit_code => {
                warn!("'{}' reported rate limiting", self.program);
                Err(SearchError::Status {
                    code: RATE_LIMIT_STATUS,
                })
            }
            code => Err(SearchError::Command {
                program: self.program.clone(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            }),
        }
    }
}

/// Parse backend output: a JSON array, or JSON lines. Blank output is an
/// empty list.
pub fn parse_records(text: &str) -> Result<ResultList, SearchError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(ResultList::empty());
    }

    if trimmed.starts_with('[') {
        let records: Vec<ResultRecord> = serde_json::from_str(trimmed)?;
        return Ok(records.into());
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<ResultRecord>(line).map_err(SearchError::from))
        .collect::<Result<Vec<_>, _>>()
        .map(ResultList::from)
}

#[async_trait]
impl SearchBackend for CommandBackend {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<ResultList, SearchError> {
        let child = self.command(query).spawn().map_err(|e| SearchError::Spawn {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;

        // dropping the wait future drops the child, which kills it
        let output = tokio::select! {
            waited = timeout(self.timeout, child.wait_with_output()) => {
                waited
                    .map_err(|_| SearchError::Timeout(self.timeout))?
                    .map_err(|e| SearchError::Spawn {
                        program: self.program.clone(),
                        reason: e.to_string(),
                    })?
            }
            () = cancel.cancelled() => {
                debug!("'{}' cancelled, child killed", self.program);
                return Ok(ResultList::empty());
            }
        };

        self.check_status(&output)?;
        parse_records(&String::from_utf8_lossy(&output.stdout))
    }
}
