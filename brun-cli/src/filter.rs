//! Filter Expressions
//!
//! Benchmark selection predicates of the form `key=value` (exact match) or
//! `key~substring` (containment). Values are compared after stringification;
//! a record missing the key never matches. Multiple filters conjoin.

use brun_core::{Benchmark, Record};
use std::str::FromStr;
use thiserror::Error;

/// Error from parsing a filter expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression has neither `=` nor `~`.
    #[error("invalid filter '{0}', expected key=value or key~substring")]
    Invalid(String),
}

/// Comparison operator of a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact match after stringification.
    Equals,
    /// Substring containment after stringification.
    Contains,
}

/// One parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Metadata key to compare.
    pub key: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Right-hand side of the comparison.
    pub value: String,
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `=` takes precedence over `~` when both appear.
        if let Some((key, value)) = s.split_once('=') {
            return Ok(Filter {
                key: key.to_string(),
                op: FilterOp::Equals,
                value: value.to_string(),
            });
        }
        if let Some((key, value)) = s.split_once('~') {
            return Ok(Filter {
                key: key.to_string(),
                op: FilterOp::Contains,
                value: value.to_string(),
            });
        }
        Err(FilterError::Invalid(s.to_string()))
    }
}

impl Filter {
    /// Whether `info` matches this filter.
    pub fn matches(&self, info: &Record) -> bool {
        let Some(value) = info.get(&self.key) else {
            return false;
        };
        let s = value.to_string();
        match self.op {
            FilterOp::Equals => s == self.value,
            FilterOp::Contains => s.contains(&self.value),
        }
    }
}

/// Parse a list of filter expressions.
pub fn parse_filters(expressions: &[String]) -> Result<Vec<Filter>, FilterError> {
    expressions.iter().map(|s| s.parse()).collect()
}

/// Select the benchmarks whose metadata matches every filter.
pub fn select<'a>(benchmarks: &'a [Benchmark], filters: &[Filter]) -> Vec<&'a Benchmark> {
    benchmarks
        .iter()
        .filter(|b| filters.iter().all(|f| f.matches(b.info())))
        .collect()
}
