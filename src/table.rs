use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonValue};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A single typed cell of a result table.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Lenient numeric view used by chart builders.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if v.is_finite() => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Calendar date for this cell, if it has one. Text is parsed with the
    /// common ISO, slash and dotted layouts, plus RFC 3339 timestamps.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::Text(s) => parse_date_text(s.trim()),
            _ => None,
        }
    }

    /// Interprets text typed into the grid editor.
    pub fn parse_input(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return Value::Null;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return Value::Int(v);
        }
        if let Some(v) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
            return Value::Float(v);
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Value::Date(d);
        }
        if let Some(dt) = parse_datetime_text(trimmed) {
            return Value::DateTime(dt);
        }
        match trimmed {
            "true" | "TRUE" => Value::Bool(true),
            "false" | "FALSE" => Value::Bool(false),
            _ => Value::Text(text.to_string()),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Int(v) => JsonValue::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }

    /// Total order used for sorting: nulls last, numbers numerically,
    /// temporal values chronologically, text lexicographically.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Date(a), Value::DateTime(b)) => a.and_time(NaiveTime::MIN).cmp(b),
            (Value::DateTime(a), Value::Date(b)) => a.cmp(&b.and_time(NaiveTime::MIN)),
            (a, b) => match (a.numeric(), b.numeric()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => 0,
            Value::Date(_) | Value::DateTime(_) => 1,
            Value::Text(_) => 2,
            Value::Null => 3,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| parse_datetime_text(s).map(|dt| dt.date()))
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

/// Materialized result set: ordered column names plus rows of typed cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: Value) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the table with rows stably sorted by one column.
    pub fn sorted_by(&self, col: usize) -> Table {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| match (a.get(col), b.get(col)) {
            (Some(x), Some(y)) => x.sort_cmp(y),
            _ => Ordering::Equal,
        });
        Table::new(self.columns.clone(), rows)
    }

    /// Array-of-records JSON with column order preserved and 4-space indent.
    pub fn to_records_json(&self) -> serde_json::Result<String> {
        let records: Vec<JsonValue> = self
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (name, value) in self.columns.iter().zip(row) {
                    record.insert(name.clone(), value.to_json());
                }
                JsonValue::Object(record)
            })
            .collect();

        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        records.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_input_infers_cell_types() {
        assert_eq!(Value::parse_input(""), Value::Null);
        assert_eq!(Value::parse_input("42"), Value::Int(42));
        assert_eq!(Value::parse_input("4.5"), Value::Float(4.5));
        assert_eq!(Value::parse_input("2024-03-01"), Value::Date(d(2024, 3, 1)));
        assert_eq!(Value::parse_input("Paris"), Value::Text("Paris".into()));
    }

    #[test]
    fn non_finite_input_stays_text() {
        assert_eq!(Value::parse_input("NaN"), Value::Text("NaN".into()));
        assert_eq!(Value::parse_input("inf"), Value::Text("inf".into()));
        assert_eq!(Value::parse_input("-infinity"), Value::Text("-infinity".into()));
        assert_eq!(Value::parse_input("1e3"), Value::Float(1000.0));
    }

    #[test]
    fn nan_cells_sort_after_every_number() {
        let table = Table::new(
            vec!["n".into()],
            vec![
                vec![Value::Float(f64::NAN)],
                vec![Value::Int(3)],
                vec![Value::Float(f64::NAN)],
                vec![Value::Int(1)],
                vec![Value::Float(2.0)],
            ],
        );
        let sorted = table.sorted_by(0);
        let order: Vec<String> = sorted.rows.iter().map(|r| r[0].to_string()).collect();
        assert_eq!(order, vec!["1", "2", "3", "NaN", "NaN"]);
    }

    #[test]
    fn text_dates_in_several_layouts_are_recognised() {
        assert_eq!(Value::Text("2024/03/01".into()).as_date(), Some(d(2024, 3, 1)));
        assert_eq!(Value::Text("01.03.2024".into()).as_date(), Some(d(2024, 3, 1)));
        assert_eq!(
            Value::Text("2024-03-01 10:15:00".into()).as_date(),
            Some(d(2024, 3, 1))
        );
        assert_eq!(Value::Text("soon".into()).as_date(), None);
        assert_eq!(Value::Int(20240301).as_date(), None);
    }

    #[test]
    fn sorting_puts_nulls_last_and_compares_numbers_across_types() {
        let table = Table::new(
            vec!["n".into()],
            vec![
                vec![Value::Float(2.5)],
                vec![Value::Null],
                vec![Value::Int(1)],
                vec![Value::Int(3)],
            ],
        );
        let sorted = table.sorted_by(0);
        let order: Vec<String> = sorted.rows.iter().map(|r| r[0].to_string()).collect();
        assert_eq!(order, vec!["1", "2.5", "3", "NULL"]);
    }

    #[test]
    fn records_json_keeps_column_order_and_indents_four_spaces() {
        let table = Table::new(
            vec!["zeta".into(), "alpha".into()],
            vec![vec![Value::Text("x".into()), Value::Date(d(2024, 1, 2))]],
        );
        let json = table.to_records_json().unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
        assert!(json.contains("\n        \"zeta\": \"x\""));
        assert!(json.contains("\"alpha\": \"2024-01-02\""));
    }

    #[test]
    fn set_cell_rejects_out_of_range_positions() {
        let mut table = Table::new(vec!["a".into()], vec![vec![Value::Int(1)]]);
        assert!(table.set_cell(0, 0, Value::Int(7)));
        assert!(!table.set_cell(1, 0, Value::Int(8)));
        assert_eq!(table.cell(0, 0), Some(&Value::Int(7)));
    }
}
