#![warn(missing_docs)]
//! brun Table - Result Tabulation
//!
//! Transforms a flat sequence of result records into rectangular tables:
//! either a straight columnar dump or a two-dimensional pivot keyed by two
//! chosen fields with a third field as the cell value. Cells merge multiple
//! contributing values into lists, mirroring multi-sample aggregation when
//! benchmarks are repeated.

mod ascii;
mod table;

pub use table::{column_names, Cell, Table};
