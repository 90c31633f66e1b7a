//! Benchmark Registry
//!
//! `BenchmarkSet` is an explicit registry with its own lifecycle: construct,
//! populate, pass by reference into the engine. Combinatorial declaration
//! expands a map of parameter lists into the Cartesian product, formats each
//! combination into a command template and merges it into the metadata.

use crate::benchmark::{Benchmark, PostFn, Record};
use crate::value::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from command-template expansion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{name}` placeholder has no matching metadata entry.
    #[error("unknown placeholder '{{{0}}}' in command template")]
    UnknownKey(String),
    /// A `{` without a closing `}` (or a stray `}`).
    #[error("unbalanced braces in command template")]
    Unbalanced,
}

/// An ordered collection of declared benchmarks.
#[derive(Debug, Default, Clone)]
pub struct BenchmarkSet {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single benchmark.
    pub fn add(&mut self, benchmark: Benchmark) {
        self.benchmarks.push(benchmark);
    }

    /// Register the Cartesian product of `params` over a command template.
    ///
    /// Each combination is merged over `fixed_info`, substituted into the
    /// `{name}` placeholders of `template` and registered as one benchmark
    /// with the merged map as its metadata.
    pub fn add_set(
        &mut self,
        template: &str,
        fixed_info: &Record,
        params: &BTreeMap<String, Vec<Value>>,
    ) -> Result<(), TemplateError> {
        for combination in product(params) {
            let mut info = fixed_info.clone();
            info.extend(combination);
            let line = format_template(template, &info)?;
            self.benchmarks.push(Benchmark::command(line).with_info(info));
        }
        Ok(())
    }

    /// Append a post-run hook to every declared benchmark.
    pub fn add_post_fn(&mut self, f: PostFn) {
        for benchmark in &mut self.benchmarks {
            benchmark.add_post_fn(f.clone());
        }
    }

    /// Declared benchmarks, in declaration order.
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    /// Number of declared benchmarks.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

/// Expand a map of parameter lists into every key→value combination.
/// Keys iterate in map order, the last key varying fastest.
fn product(params: &BTreeMap<String, Vec<Value>>) -> Vec<Record> {
    let mut combinations = vec![Record::new()];
    for (key, values) in params {
        let mut next = Vec::with_capacity(combinations.len() * values.len());
        for partial in &combinations {
            for value in values {
                let mut combination = partial.clone();
                combination.insert(key.clone(), value.clone());
                next.push(combination);
            }
        }
        combinations = next;
    }
    combinations
}

/// Substitute `{name}` placeholders with stringified metadata values.
fn format_template(template: &str, info: &Record) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(TemplateError::Unbalanced),
                    }
                }
                let value = info
                    .get(&name)
                    .ok_or_else(|| TemplateError::UnknownKey(name.clone()))?;
                out.push_str(&value.to_string());
            }
            '}' => return Err(TemplateError::Unbalanced),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::KEY_COMMAND;

    fn params(entries: &[(&str, &[i64])]) -> BTreeMap<String, Vec<Value>> {
        entries
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|&v| Value::from(v)).collect()))
            .collect()
    }

    #[test]
    fn add_set_expands_the_cartesian_product() {
        let mut set = BenchmarkSet::new();
        set.add_set(
            "solver -n {n} -t {threads}",
            &Record::new(),
            &params(&[("n", &[10, 20]), ("threads", &[1, 4])]),
        )
        .unwrap();

        assert_eq!(set.len(), 4);
        let lines: Vec<String> = set
            .benchmarks()
            .iter()
            .map(|b| b.get(KEY_COMMAND).unwrap().to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "solver -n 10 -t 1",
                "solver -n 10 -t 4",
                "solver -n 20 -t 1",
                "solver -n 20 -t 4",
            ]
        );
    }

    #[test]
    fn fixed_info_is_merged_into_every_combination() {
        let mut fixed = Record::new();
        fixed.insert("binary".to_string(), Value::from("solver"));

        let mut set = BenchmarkSet::new();
        set.add_set("{binary} -n {n}", &fixed, &params(&[("n", &[1])]))
            .unwrap();

        let bench = &set.benchmarks()[0];
        assert_eq!(bench.get("binary"), Some(&Value::from("solver")));
        assert_eq!(bench.get("n"), Some(&Value::from(1)));
        assert_eq!(bench.get(KEY_COMMAND), Some(&Value::from("solver -n 1")));
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let mut set = BenchmarkSet::new();
        let err = set
            .add_set("run {missing}", &Record::new(), &params(&[("n", &[1])]))
            .unwrap_err();
        assert_eq!(err, TemplateError::UnknownKey("missing".into()));
    }

    #[test]
    fn unbalanced_braces_are_an_error() {
        let mut set = BenchmarkSet::new();
        let err = set
            .add_set("run {n", &Record::new(), &params(&[("n", &[1])]))
            .unwrap_err();
        assert_eq!(err, TemplateError::Unbalanced);
    }
}
