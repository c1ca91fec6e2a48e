//! Sortable table state.
//!
//! Tracks which column a table is sorted by and sorts JSON rows to match.
//! Clicking the sorted column flips the direction; clicking another column
//! sorts by it ascending.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current sort of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    column: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// Unsorted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted by `column` ascending.
    pub fn by(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: SortDirection::Ascending,
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Direction shown on a column header, if the table is sorted by it.
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(column)).then_some(self.direction)
    }

    /// Handle a click on a column header.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    /// Sort object rows by the current column. Stable; rows missing the
    /// column (or holding null) go last in either direction.
    pub fn sort_rows(&self, rows: &mut [Value]) {
        let Some(column) = self.column.as_deref() else {
            return;
        };

        rows.sort_by(|a, b| {
            let left = a.get(column).filter(|v| !v.is_null());
            let right = b.get(column).filter(|v| !v.is_null());
            match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ordering = compare_values(l, r);
                    match self.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                }
            }
        });
    }
}

/// Numbers before strings before booleans before anything else.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            let l = l.as_f64().unwrap_or(f64::NAN);
            let r = r.as_f64().unwrap_or(f64::NAN);
            l.partial_cmp(&r).unwrap_or(Ordering::Equal)
        }
        (Value::String(l), Value::String(r)) => l
            .to_lowercase()
            .cmp(&r.to_lowercase())
            .then_with(|| l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}
