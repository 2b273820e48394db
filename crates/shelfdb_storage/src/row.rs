//! Rows, cells and equality predicates.

use std::collections::BTreeMap;
use std::fmt;

/// Key generated by a table on insert.
pub type RowKey = u64;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    /// SQL-style null.
    Null,
    /// Integer value (also used for auto-increment keys).
    Integer(i64),
    /// Text value.
    Text(String),
    /// Opaque bytes.
    Blob(Vec<u8>),
}

impl Cell {
    /// Returns the integer, if this is an integer cell.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a blob cell.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Cell::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Returns true for [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s:?}"),
            Cell::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Cell {
    fn from(b: Vec<u8>) -> Self {
        Cell::Blob(b)
    }
}

/// A row: column name to cell.
///
/// Columns not present in the map are treated as null on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.set(column, cell);
        self
    }

    /// Sets a column.
    pub fn set(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        self.cells.insert(column.into(), cell.into());
    }

    /// Reads a column.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Iterates over `(column, cell)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of populated columns.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no column is populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// A conjunction of column equalities.
///
/// An empty predicate matches every row. A clause on a column the row does
/// not populate compares against [`Cell::Null`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<(String, Cell)>,
}

impl Predicate {
    /// A predicate matching every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A single `column = cell` clause.
    #[must_use]
    pub fn eq(column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        Self::all().and(column, cell)
    }

    /// Adds a `column = cell` clause.
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.clauses.push((column.into(), cell.into()));
        self
    }

    /// The clauses in insertion order.
    pub fn clauses(&self) -> &[(String, Cell)] {
        &self.clauses
    }

    /// Returns true if this predicate has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the value a clause binds `column` to, if any.
    pub fn bound(&self, column: &str) -> Option<&Cell> {
        self.clauses
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, cell)| cell)
    }

    /// Evaluates the predicate against a row.
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses
            .iter()
            .all(|(column, cell)| row.get(column).unwrap_or(&Cell::Null) == cell)
    }
}
