use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::analysis::AnalysisClient;
use crate::db::run_query;
use crate::error::{AnalysisError, QueryError};
use crate::session::QueryKey;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Query,
    Analysis,
}

impl JobKind {
    pub fn status(self) -> &'static str {
        match self {
            JobKind::Query => "Running query...",
            JobKind::Analysis => "Running analysis...",
        }
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    Query {
        key: QueryKey,
        result: Result<Table, QueryError>,
    },
    Analysis(Result<String, AnalysisError>),
}

struct Running {
    id: u64,
    kind: JobKind,
    handle: JoinHandle<()>,
}

/// At most one background job at a time; results come back over a channel
/// drained by the UI loop. Every outcome carries the id of the job that
/// produced it, and only the current job's outcome is delivered.
pub struct JobRunner {
    tx: mpsc::UnboundedSender<(u64, JobOutcome)>,
    rx: mpsc::UnboundedReceiver<(u64, JobOutcome)>,
    next_id: u64,
    running: Option<Running>,
}

impl JobRunner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, next_id: 0, running: None }
    }

    pub fn current(&self) -> Option<JobKind> {
        self.running.as_ref().map(|r| r.kind)
    }

    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    pub fn spawn_query(&mut self, key: QueryKey, timeout: Duration) {
        self.spawn(JobKind::Query, async move {
            let result = run_query(&key, timeout).await;
            JobOutcome::Query { key, result }
        });
    }

    pub fn spawn_analysis(&mut self, client: AnalysisClient, prompt: String) {
        self.spawn(JobKind::Analysis, async move {
            JobOutcome::Analysis(client.generate(&prompt).await)
        });
    }

    /// Aborts the running job. Its result, if any, is never delivered.
    pub fn cancel(&mut self) -> Option<JobKind> {
        let running = self.running.take()?;
        running.handle.abort();
        info!(kind = ?running.kind, id = running.id, "job cancelled");
        Some(running.kind)
    }

    pub fn try_recv(&mut self) -> Option<JobOutcome> {
        loop {
            let (id, outcome) = self.rx.try_recv().ok()?;
            match &self.running {
                Some(running) if running.id == id => {
                    self.running = None;
                    return Some(outcome);
                }
                _ => debug!(id, "dropping outcome of a cancelled job"),
            }
        }
    }

    fn spawn<F>(&mut self, kind: JobKind, job: F)
    where
        F: Future<Output = JobOutcome> + Send + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = job.await;
            let _ = tx.send((id, outcome));
        });
        if let Some(old) = self.running.replace(Running { id, kind, handle }) {
            old.handle.abort();
        }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
