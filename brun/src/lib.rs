#![warn(missing_docs)]
//! # brun
//!
//! Benchmark runner for external commands: declare a set of command/parameter
//! combinations, run them under bounded wall-clock time with a bounded worker
//! pool, and pivot the flat result records into comparison tables.
//!
//! - **Declaration**: single benchmarks or combinatorial sets expanded from
//!   parameter lists into command templates
//! - **Execution**: per-run timeouts with guaranteed child termination,
//!   skip semantics, order-preserving concurrent runs
//! - **Tabulation**: straight columnar dumps or two-dimensional pivot tables
//!   with multi-value cell merging, ASCII-rendered
//! - **Persistence**: every result record written to a results file for
//!   downstream reuse
//!
//! ## Quick Start
//!
//! ```no_run
//! use brun::prelude::*;
//! use std::collections::BTreeMap;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut set = BenchmarkSet::new();
//!
//!     let mut params = BTreeMap::new();
//!     params.insert("n".to_string(), vec![Value::from(10), Value::from(100)]);
//!     params.insert("threads".to_string(), vec![Value::from(1), Value::from(4)]);
//!     set.add_set("solver -n {n} -t {threads}", &Record::new(), &params)?;
//!
//!     brun::run(&set)
//! }
//! ```

// Re-export core types
pub use brun_core::{
    Benchmark, BenchmarkSet, Command, Engine, PostFn, Record, RunConfig, RunContext, RunStatus,
    TemplateError, Value,
};

// Re-export tabulation
pub use brun_table::{column_names, Cell, Table};

// Re-export the CLI surface
pub use brun_cli::{run, run_with_cli, BrunConfig, Cli, Filter, FilterOp};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Benchmark, BenchmarkSet, Cell, Engine, Record, RunConfig, RunStatus, Table, Value,
    };
}
