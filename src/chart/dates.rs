use chrono::NaiveDate;

use crate::error::DateError;
use crate::table::{Table, Value};

/// Inclusive bounds picked on the date slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Working table whose x column has been coerced to dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAxis {
    pub table: Table,
    pub column: usize,
    /// Sorted distinct dates: the options offered by the range slider.
    pub dates: Vec<NaiveDate>,
}

impl DateAxis {
    pub fn full_range(&self) -> Option<DateRange> {
        Some(DateRange {
            start: *self.dates.first()?,
            end: *self.dates.last()?,
        })
    }

    /// Clamps a stale selection into the available dates; falls back to the
    /// full range when nothing of it survives.
    pub fn clamp(&self, range: Option<DateRange>) -> Option<DateRange> {
        let full = self.full_range()?;
        let Some(range) = range else {
            return Some(full);
        };
        let start = range.start.max(full.start);
        let end = range.end.min(full.end);
        if start > end {
            Some(full)
        } else {
            Some(DateRange { start, end })
        }
    }

    /// Rows whose date lies inside `range`.
    pub fn filter(&self, range: DateRange) -> Table {
        let rows = self
            .table
            .rows
            .iter()
            .filter(|row| match row.get(self.column) {
                Some(Value::Date(d)) => range.contains(*d),
                _ => false,
            })
            .cloned()
            .collect();
        Table::new(self.table.columns.clone(), rows)
    }
}

/// Drops rows with a null x and converts every remaining x cell to a date.
/// Fails on the first cell that cannot be read as one.
pub fn coerce_date_column(table: &Table, column: &str) -> Result<DateAxis, DateError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| DateError::UnknownColumn(column.to_string()))?;

    let mut rows = Vec::with_capacity(table.row_count());
    let mut dates = Vec::new();
    for row in &table.rows {
        let cell = &row[idx];
        if cell.is_null() {
            continue;
        }
        let date = cell.as_date().ok_or_else(|| DateError::Unparseable {
            column: column.to_string(),
            value: cell.to_string(),
        })?;
        let mut row = row.clone();
        row[idx] = Value::Date(date);
        rows.push(row);
        dates.push(date);
    }

    dates.sort_unstable();
    dates.dedup();

    Ok(DateAxis {
        table: Table::new(table.columns.clone(), rows),
        column: idx,
        dates,
    })
}
