use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::table::{Table, Value};

/// One short-lived connection, opened for a single statement.
pub enum DatabaseConnection {
    MySql(sqlx::MySqlConnection),
    Sqlite(sqlx::SqliteConnection),
}

impl DatabaseConnection {
    pub async fn connect(connection_string: &str) -> Result<Self, QueryError> {
        if connection_string.starts_with("mysql://") {
            let conn = sqlx::MySqlConnection::connect(connection_string)
                .await
                .map_err(QueryError::connect)?;
            Ok(Self::MySql(conn))
        } else if connection_string.starts_with("sqlite:") {
            let conn = sqlx::SqliteConnection::connect(connection_string)
                .await
                .map_err(QueryError::connect)?;
            Ok(Self::Sqlite(conn))
        } else {
            Err(QueryError::Connection(format!(
                "unsupported database type in `{}`",
                super::redact(connection_string)
            )))
        }
    }

    pub async fn execute_query(&mut self, query: &str) -> Result<Table, QueryError> {
        match self {
            Self::MySql(conn) => {
                let rows = sqlx::query(query)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(QueryError::execute)?;
                if rows.is_empty() {
                    let stmt = (&mut *conn).prepare(query).await.map_err(QueryError::execute)?;
                    let columns = stmt.columns().iter().map(|c| c.name().to_string()).collect();
                    return Ok(Table::new(columns, vec![]));
                }

                let columns = column_names(&rows[0]);
                let data = rows
                    .iter()
                    .map(|row| (0..columns.len()).map(|idx| extract_mysql_value(row, idx)).collect())
                    .collect();
                Ok(Table::new(columns, data))
            }
            Self::Sqlite(conn) => {
                let rows = sqlx::query(query)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(QueryError::execute)?;
                if rows.is_empty() {
                    let stmt = (&mut *conn).prepare(query).await.map_err(QueryError::execute)?;
                    let columns = stmt.columns().iter().map(|c| c.name().to_string()).collect();
                    return Ok(Table::new(columns, vec![]));
                }

                let columns = column_names(&rows[0]);
                let data = rows
                    .iter()
                    .map(|row| (0..columns.len()).map(|idx| extract_sqlite_value(row, idx)).collect())
                    .collect();
                Ok(Table::new(columns, data))
            }
        }
    }

    pub async fn close(self) -> Result<(), sqlx::Error> {
        match self {
            Self::MySql(conn) => conn.close().await,
            Self::Sqlite(conn) => conn.close().await,
        }
    }
}

/// Connect, run one statement, close. The connection is released on both the
/// success and the failure path.
pub async fn fetch_table(connection_string: &str, query: &str) -> Result<Table, QueryError> {
    let mut conn = DatabaseConnection::connect(connection_string).await?;
    let result = conn.execute_query(query).await;
    if let Err(e) = conn.close().await {
        warn!(error = %e, "closing database connection failed");
    }
    if let Ok(table) = &result {
        debug!(rows = table.row_count(), columns = table.column_count(), "query fetched");
    }
    result
}

fn column_names<R: Row>(row: &R) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

fn extract_mysql_value(row: &sqlx::mysql::MySqlRow, idx: usize) -> Value {
    let value_ref = row.try_get_raw(idx).ok();

    if let Some(vr) = value_ref {
        if vr.is_null() {
            return Value::Null;
        }

        let type_info = vr.type_info().clone();
        let type_name = type_info.name();

        match type_name {
            "BOOLEAN" => {
                if let Ok(v) = row.try_get::<bool, _>(idx) {
                    return Value::Bool(v);
                }
            }
            "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" | "YEAR" => {
                if let Ok(v) = row.try_get::<i64, _>(idx) {
                    return Value::Int(v);
                }
                if let Ok(v) = row.try_get::<i32, _>(idx) {
                    return Value::Int(v.into());
                }
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "INT UNSIGNED" | "MEDIUMINT UNSIGNED"
            | "BIGINT UNSIGNED" => {
                if let Ok(v) = row.try_get::<u64, _>(idx) {
                    return i64::try_from(v).map(Value::Int).unwrap_or(Value::Float(v as f64));
                }
            }
            "FLOAT" => {
                if let Ok(v) = row.try_get::<f32, _>(idx) {
                    return Value::Float(v.into());
                }
            }
            "DOUBLE" => {
                if let Ok(v) = row.try_get::<f64, _>(idx) {
                    return Value::Float(v);
                }
            }
            "DECIMAL" => {
                if let Ok(v) = row.try_get::<sqlx::types::BigDecimal, _>(idx) {
                    let text = v.to_string();
                    return text.parse::<f64>().map(Value::Float).unwrap_or(Value::Text(text));
                }
            }
            "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
                if let Ok(v) = row.try_get::<String, _>(idx) {
                    return Value::Text(v);
                }
            }
            "DATE" => {
                if let Ok(v) = row.try_get::<sqlx::types::chrono::NaiveDate, _>(idx) {
                    return Value::Date(v);
                }
            }
            "TIME" => {
                if let Ok(v) = row.try_get::<sqlx::types::chrono::NaiveTime, _>(idx) {
                    return Value::Text(v.to_string());
                }
            }
            "DATETIME" | "TIMESTAMP" => {
                if let Ok(v) = row.try_get::<sqlx::types::chrono::NaiveDateTime, _>(idx) {
                    return Value::DateTime(v);
                }
            }
            "JSON" => {
                if let Ok(v) = row.try_get::<sqlx::types::JsonValue, _>(idx) {
                    return Value::Text(v.to_string());
                }
            }
            "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
                if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                    return Value::Text(format!("0x{}", hex::encode(v)));
                }
            }
            _ => {}
        }
    }

    row.try_get::<String, _>(idx)
        .map(Value::Text)
        .or_else(|_| row.try_get::<i64, _>(idx).map(Value::Int))
        .or_else(|_| row.try_get::<f64, _>(idx).map(Value::Float))
        .or_else(|_| row.try_get::<bool, _>(idx).map(Value::Bool))
        .unwrap_or(Value::Null)
}

fn extract_sqlite_value(row: &sqlx::sqlite::SqliteRow, idx: usize) -> Value {
    let value_ref = row.try_get_raw(idx).ok();

    if let Some(vr) = value_ref {
        if vr.is_null() {
            return Value::Null;
        }

        let type_info = vr.type_info().clone();
        let type_name = type_info.name();

        match type_name {
            "INTEGER" => {
                if let Ok(v) = row.try_get::<i64, _>(idx) {
                    return Value::Int(v);
                }
            }
            "REAL" | "NUMERIC" => {
                if let Ok(v) = row.try_get::<f64, _>(idx) {
                    return Value::Float(v);
                }
            }
            "TEXT" => {
                if let Ok(v) = row.try_get::<String, _>(idx) {
                    return Value::Text(v);
                }
            }
            "BLOB" => {
                if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                    return Value::Text(format!("X'{}'", hex::encode(v)));
                }
            }
            "BOOLEAN" => {
                if let Ok(v) = row.try_get::<bool, _>(idx) {
                    return Value::Bool(v);
                }
            }
            "DATE" => {
                if let Ok(v) = row.try_get::<sqlx::types::chrono::NaiveDate, _>(idx) {
                    return Value::Date(v);
                }
            }
            "DATETIME" => {
                if let Ok(v) = row.try_get::<sqlx::types::chrono::NaiveDateTime, _>(idx) {
                    return Value::DateTime(v);
                }
            }
            _ => {}
        }
    }

    row.try_get::<String, _>(idx)
        .map(Value::Text)
        .or_else(|_| row.try_get::<i64, _>(idx).map(Value::Int))
        .or_else(|_| row.try_get::<f64, _>(idx).map(Value::Float))
        .or_else(|_| row.try_get::<bool, _>(idx).map(Value::Bool))
        .unwrap_or(Value::Null)
}
