//! Table Construction
//!
//! A `Table` is an ordered sequence of rows of cells. Row 0 is the header
//! row. All rows of a fully built table have equal length; ragged
//! intermediate states are never exposed.

use brun_core::{Record, Value};
use std::cmp::Ordering;

/// One table cell: absent, a single scalar, or a merged list of scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No contributing value.
    #[default]
    Empty,
    /// Exactly one contributing value.
    Scalar(Value),
    /// Two or more contributing values, in contribution order.
    List(Vec<Value>),
}

impl Cell {
    /// Merge one more contributing value into this cell. The first value
    /// stays scalar; a second converts the cell into a list; further values
    /// extend it.
    pub fn merge(self, value: Value) -> Cell {
        match self {
            Cell::Empty => Cell::Scalar(value),
            Cell::Scalar(first) => Cell::List(vec![first, value]),
            Cell::List(mut values) => {
                values.push(value);
                Cell::List(values)
            }
        }
    }

    /// Whether this cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Display form used by the ASCII renderer; absent cells render empty.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Scalar(value) => value.to_string(),
            Cell::List(values) => {
                let parts: Vec<String> = values.iter().map(Value::to_string).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell::Scalar(value)
    }
}

/// A rectangular table of cells; row 0 is the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// The rows of this table, header first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Straight columnar dump of `records`. When `columns` is absent the
    /// column set is the sorted union of all keys present across records;
    /// a record missing a key gets an empty cell.
    pub fn from_records(records: &[Record], columns: Option<&[String]>) -> Table {
        let derived;
        let columns = match columns {
            Some(columns) => columns,
            None => {
                derived = column_names(records);
                &derived
            }
        };

        let mut table = Table::new();
        table.add_row(
            columns
                .iter()
                .map(|name| Cell::Scalar(Value::from(name.as_str())))
                .collect(),
        );
        for record in records {
            table.add_row(
                columns
                    .iter()
                    .map(|name| match record.get(name) {
                        Some(value) => Cell::Scalar(value.clone()),
                        None => Cell::Empty,
                    })
                    .collect(),
            );
        }
        table
    }

    /// Two-dimensional pivot of `records`: one row per distinct value of
    /// `row_field`, one column per distinct value of `col_field`, cell
    /// values merged from `value_field` of every matching record. Both axes
    /// sort ascending in natural order.
    pub fn pivot(records: &[Record], row_field: &str, col_field: &str, value_field: &str) -> Table {
        let col_values = distinct_values(records, col_field);
        let row_values = distinct_values(records, row_field);

        let mut table = Table::new();
        let mut header = vec![Cell::Scalar(Value::from(row_field))];
        header.extend(col_values.iter().cloned().map(Cell::Scalar));
        table.add_row(header);

        for row_value in &row_values {
            let mut row = vec![Cell::Scalar(row_value.clone())];
            for col_value in &col_values {
                let mut cell = Cell::Empty;
                for record in records {
                    if record.get(row_field) == Some(row_value)
                        && record.get(col_field) == Some(col_value)
                    {
                        if let Some(value) = record.get(value_field) {
                            cell = cell.merge(value.clone());
                        }
                    }
                }
                row.push(cell);
            }
            table.add_row(row);
        }
        table
    }

    /// Swap rows and columns: row `i` of the result is column `i` of the
    /// input. Defined only for rectangular tables; an empty table has no
    /// transpose.
    pub fn transpose(&self) -> Option<Table> {
        let first = self.rows.first()?;
        let mut table = Table::new();
        for i in 0..first.len() {
            table.add_row(self.rows.iter().map(|row| row[i].clone()).collect());
        }
        Some(table)
    }
}

/// Sorted union of all keys present across `records`.
pub fn column_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .flat_map(|record| record.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Distinct non-absent values of `key` across `records`, sorted ascending
/// in natural order.
fn distinct_values(records: &[Record], key: &str) -> Vec<Value> {
    let mut values: Vec<Value> = Vec::new();
    for record in records {
        if let Some(value) = record.get(key) {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
    }
    sort_values(&mut values);
    values
}

/// Natural ordering: numeric when every value parses as a number,
/// lexicographic otherwise.
fn sort_values(values: &mut [Value]) {
    let numeric: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
    match numeric {
        Some(numbers) => {
            let mut keyed: Vec<(f64, Value)> = numbers
                .into_iter()
                .zip(values.iter().cloned())
                .collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            for (slot, (_, value)) in values.iter_mut().zip(keyed) {
                *slot = value;
            }
        }
        None => values.sort_by_key(|v| v.to_string()),
    }
}
