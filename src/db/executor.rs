use std::time::Duration;

use tracing::{info, warn};

use super::{fetch_table, redact};
use crate::error::QueryError;
use crate::session::{QueryKey, Session};
use crate::table::Table;

/// What a query submission should do, decided before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Nothing typed; nothing to do.
    Skip,
    MissingConnection,
    /// Same connection and text as the table already on screen.
    Cached,
    Run(QueryKey),
}

/// Records the submitted text and decides whether the database needs to be
/// asked. `force` bypasses the memo.
pub fn plan_query(session: &mut Session, query: &str, force: bool) -> QueryPlan {
    if query.trim().is_empty() {
        return QueryPlan::Skip;
    }
    session.query_text = Some(query.to_string());

    let Some(connection_string) = session.connection_string.clone() else {
        return QueryPlan::MissingConnection;
    };

    let key = QueryKey {
        connection_string,
        query: query.to_string(),
    };
    if !force && session.is_loaded(&key) {
        return QueryPlan::Cached;
    }
    QueryPlan::Run(key)
}

/// Runs the statement behind `key`, bounded by `timeout`. Dropping the
/// returned future (cancellation) drops the connection with it.
pub async fn run_query(key: &QueryKey, timeout: Duration) -> Result<Table, QueryError> {
    info!(database = %redact(&key.connection_string), "executing query");
    match tokio::time::timeout(timeout, fetch_table(&key.connection_string, &key.query)).await {
        Ok(result) => {
            if let Err(e) = &result {
                warn!(error = %e, connection_failure = e.is_connection(), "query failed");
            }
            result
        }
        Err(_) => {
            warn!(?timeout, "query timed out");
            Err(QueryError::Timeout(timeout))
        }
    }
}

/// Folds a finished query into the session. On failure the previous table is
/// kept untouched.
pub fn apply_query_result(
    session: &mut Session,
    key: QueryKey,
    result: Result<Table, QueryError>,
) -> Result<(), QueryError> {
    let table = result?;
    session.store_table(key, table);
    Ok(())
}
