#![warn(missing_docs)]
//! brun Core - Benchmark Model and Execution Engine
//!
//! This crate provides the building blocks of the brun benchmark runner:
//! - `Benchmark` describes one external command with free-form metadata
//! - `BenchmarkSet` is an explicit registry with combinatorial declaration
//! - `Engine` runs benchmarks concurrently with per-run timeouts and
//!   produces one flat result record per run slot

mod benchmark;
mod engine;
mod registry;
mod value;

pub use benchmark::{Benchmark, Command, PostFn, Record, KEY_COMMAND, KEY_STATUS, KEY_TIME};
pub use engine::{Engine, RunConfig, RunContext, RunStatus};
pub use registry::{BenchmarkSet, TemplateError};
pub use value::Value;
