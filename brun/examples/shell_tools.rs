//! Example benchmark declaration: compare a few shell pipelines over
//! generated input sizes.
//!
//! Run with e.g.:
//!
//! ```text
//! cargo run --example shell_tools -- --repeat 3 --timeout 10 --pivot n command time
//! ```

use brun::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let mut set = BenchmarkSet::new();

    let mut params = BTreeMap::new();
    params.insert(
        "n".to_string(),
        vec![Value::from(10_000), Value::from(100_000)],
    );
    set.add_set(
        "seq 1 {n}",
        &Record::new(),
        &params,
    )?;

    // A shell-interpreted pipeline with a post-run hook that records the
    // line count of captured stdout.
    let mut pipeline = Benchmark::shell("seq 1 100000 | sort -rn | head -1");
    pipeline.add_post_fn(Arc::new(|_ctx, mut record, stdout| {
        let lines = stdout.map(|s| s.lines().count()).unwrap_or(0);
        record.insert("stdout_lines".to_string(), Value::from(lines));
        record
    }));
    set.add(pipeline);

    brun::run(&set)
}
