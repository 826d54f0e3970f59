//! Tabular results returned by the data store.

use crate::types::{ChatError, Result};
use std::fmt;

/// Single cell value.
///
/// Rows are fetched over the text protocol, so every non-NULL value arrives
/// as text except binary columns that are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Text content, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Ordered column names plus ordered rows.
///
/// Column names may repeat (e.g. `SELECT a.id, b.id`). Every row has exactly
/// one value per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Build a result set, checking row arity.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InternalError` if a row's length differs from the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(ChatError::InternalError(format!(
                "row {} has {} values but there are {} columns",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_checked() {
        let ok = ResultSet::new(
            vec!["id".into(), "id".into()],
            vec![vec!["1".into(), "2".into()]],
        );
        assert!(ok.is_ok());

        let bad = ResultSet::new(vec!["id".into()], vec![vec!["1".into(), Value::Null]]);
        assert!(matches!(bad, Err(ChatError::InternalError(_))));
    }

    #[test]
    fn test_cell_access() {
        let rs = ResultSet::new(
            vec!["Variable_name".into(), "Value".into()],
            vec![vec!["Questions".into(), "42".into()]],
        )
        .unwrap();
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.cell(0, 1).and_then(Value::as_str), Some("42"));
        assert_eq!(rs.cell(1, 0), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bytes(vec![0xff, 0x00]).to_string(), "<2 bytes>");
        assert_eq!(Value::from("Alice").to_string(), "Alice");
    }
}
