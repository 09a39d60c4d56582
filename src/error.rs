use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("MySQL connection string is missing! Please set it in MySQL Setup.")]
    MissingConnection,
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Execution(String),
    #[error("query did not finish within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl QueryError {
    /// Failure while establishing the connection.
    pub fn connect(err: sqlx::Error) -> Self {
        Self::Connection(err.to_string())
    }

    /// Failure after the connection was up. Transport-level errors still
    /// count as connection failures.
    pub fn execute(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(err.to_string()),
            other => Self::Execution(other.to_string()),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    /// Headline shown in the error alert; the detail goes in the warning.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::MissingConnection => "Connection string missing",
            Self::Connection(_) | Self::Timeout(_) => "Database Connection Failed",
            Self::Execution(_) => "Query Failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Execution(msg) => format!("SQL Error: {msg}"),
            other => format!("Error: {other}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("Pie chart only supports one Y variable.")]
    PieNeedsSingleY,
    #[error("cannot plot `{value}` from column `{column}` as a number")]
    NonNumeric { column: String, value: String },
    #[error("column `{0}` is not in the table")]
    UnknownColumn(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DateError {
    #[error("Error processing dates: cannot read `{value}` in column `{column}` as a date")]
    Unparseable { column: String, value: String },
    #[error("Error processing dates: column `{0}` is not in the table")]
    UnknownColumn(String),
    #[error("Error processing dates: choose an X-axis column first")]
    NoColumn,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no table to analyze, run a query first")]
    NoTable,
    #[error("could not encode the table as JSON: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("model server request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model server answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model server response did not contain any text")]
    Malformed,
    #[error("model server did not answer within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl AnalysisError {
    /// Worth one more attempt: the server was unreachable, slow or failing.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            Self::Status { status, .. } => *status >= 500,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_during_execution_count_as_connection_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = QueryError::execute(sqlx::Error::Io(io));
        assert!(err.is_connection());
        assert_eq!(err.headline(), "Database Connection Failed");
    }

    #[test]
    fn other_execution_errors_are_sql_errors() {
        let err = QueryError::execute(sqlx::Error::ColumnNotFound("revenue".into()));
        assert!(!err.is_connection());
        assert!(err.detail().starts_with("SQL Error:"));
    }

    #[test]
    fn server_errors_are_transient_but_client_errors_are_not() {
        let busy = AnalysisError::Status { status: 503, body: String::new() };
        let bad = AnalysisError::Status { status: 404, body: String::new() };
        assert!(busy.is_transient());
        assert!(!bad.is_transient());
        assert!(!AnalysisError::NoTable.is_transient());
    }
}
