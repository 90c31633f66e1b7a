//! Engine integration tests driving real child processes.

use brun_core::{
    Benchmark, Engine, Record, RunConfig, Value, KEY_COMMAND, KEY_STATUS, KEY_TIME,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn status_of(record: &Record) -> &str {
    record
        .get(KEY_STATUS)
        .and_then(Value::as_str)
        .expect("record has a status")
}

fn engine(jobs: usize, timeout: Option<Duration>, repeat: usize) -> Engine {
    Engine::new(RunConfig {
        jobs,
        timeout,
        repeat,
    })
}

#[test]
fn zero_exit_yields_ok_with_elapsed_time() {
    let benchmarks = vec![Benchmark::argv(["true"])];
    let records = engine(1, None, 1).run(&benchmarks);

    assert_eq!(records.len(), 1);
    assert_eq!(status_of(&records[0]), "ok");
    let time = records[0]
        .get(KEY_TIME)
        .and_then(Value::as_f64)
        .expect("ok record has a time");
    assert!(time >= 0.0);
}

#[test]
fn non_zero_exit_yields_failed_without_time() {
    let benchmarks = vec![Benchmark::argv(["false"])];
    let records = engine(1, None, 1).run(&benchmarks);

    assert_eq!(status_of(&records[0]), "failed");
    assert!(records[0].get(KEY_TIME).is_none());
}

#[test]
fn unspawnable_command_yields_failed_not_a_panic() {
    let benchmarks = vec![Benchmark::argv(["/nonexistent/definitely-not-a-binary"])];
    let records = engine(1, None, 1).run(&benchmarks);

    assert_eq!(records.len(), 1);
    assert_eq!(status_of(&records[0]), "failed");
}

#[test]
fn timeout_terminates_the_child_and_reports_timeout() {
    let benchmarks = vec![Benchmark::argv(["sleep", "30"])];
    let start = Instant::now();
    let records = engine(1, Some(Duration::from_millis(200)), 1).run(&benchmarks);
    let elapsed = start.elapsed();

    assert_eq!(status_of(&records[0]), "timeout");
    assert!(records[0].get(KEY_TIME).is_none());
    // The call returns promptly after termination, nowhere near the 30s the
    // child wanted to sleep.
    assert!(elapsed < Duration::from_secs(5), "elapsed {:?}", elapsed);
}

#[test]
fn one_timeout_does_not_disturb_sibling_runs() {
    let benchmarks = vec![
        Benchmark::argv(["sleep", "30"]),
        Benchmark::argv(["true"]),
        Benchmark::argv(["false"]),
    ];
    let records = engine(2, Some(Duration::from_millis(200)), 1).run(&benchmarks);

    assert_eq!(records.len(), 3);
    assert_eq!(status_of(&records[0]), "timeout");
    assert_eq!(status_of(&records[1]), "ok");
    assert_eq!(status_of(&records[2]), "failed");
}

#[test]
fn shell_commands_run_through_sh() {
    let benchmarks = vec![Benchmark::shell("exit $((2 - 2))")];
    let records = engine(1, None, 1).run(&benchmarks);
    assert_eq!(status_of(&records[0]), "ok");
}

#[test]
fn result_order_is_preserved_across_concurrency_levels() {
    let benchmarks = vec![
        Benchmark::command("echo a").with_entry("name", "a"),
        Benchmark::command("echo b").with_entry("name", "b"),
        Benchmark::command("echo c").with_entry("name", "c"),
    ];

    for jobs in [1, 2, 8] {
        let records = engine(jobs, None, 2).run(&benchmarks);
        assert_eq!(records.len(), benchmarks.len() * 2, "jobs={}", jobs);

        let names: Vec<&str> = records
            .iter()
            .map(|r| r.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, ["a", "a", "b", "b", "c", "c"], "jobs={}", jobs);
        assert!(records.iter().all(|r| status_of(r) == "ok"));
    }
}

#[test]
fn skip_predicate_suppresses_execution() {
    let benchmarks = vec![
        Benchmark::command("echo keep").with_entry("name", "keep"),
        // Would fail loudly if it ever ran
        Benchmark::argv(["/nonexistent/skipped-binary"]).with_entry("name", "drop"),
    ];
    let records = engine(1, None, 1).run_with_skip(&benchmarks, |b| {
        b.get("name").and_then(Value::as_str) == Some("drop")
    });

    assert_eq!(status_of(&records[0]), "ok");
    assert_eq!(status_of(&records[1]), "skipped");
    assert!(records[1].get(KEY_TIME).is_none());
}

#[test]
fn skipped_runs_still_invoke_hooks_with_absent_stdout() {
    let mut benchmark = Benchmark::argv(["true"]);
    benchmark.add_post_fn(Arc::new(|_ctx, mut record, stdout| {
        record.insert("saw_stdout".to_string(), Value::from(stdout.is_some()));
        record
    }));
    let benchmarks = vec![benchmark];

    let records = engine(1, None, 1).run_with_skip(&benchmarks, |_| true);
    assert_eq!(status_of(&records[0]), "skipped");
    assert_eq!(records[0].get("saw_stdout"), Some(&Value::Bool(false)));
}

#[test]
fn hooks_receive_captured_stdout_and_transform_the_record() {
    let mut benchmark = Benchmark::command("echo hello");
    benchmark.add_post_fn(Arc::new(|_ctx, mut record, stdout| {
        let out = stdout.unwrap_or("").trim().to_string();
        record.insert("first_line".to_string(), Value::from(out));
        record
    }));
    benchmark.add_post_fn(Arc::new(|_ctx, mut record, _stdout| {
        // Hooks run in registration order and see earlier hooks' edits
        let seen = record.get("first_line").cloned();
        record.insert(
            "second_hook_saw".to_string(),
            seen.unwrap_or(Value::from("")),
        );
        record
    }));
    let benchmarks = vec![benchmark];

    let records = engine(1, None, 1).run(&benchmarks);
    assert_eq!(records[0].get("first_line"), Some(&Value::from("hello")));
    assert_eq!(records[0].get("second_hook_saw"), Some(&Value::from("hello")));
}

#[test]
fn hook_can_mark_later_slots_skipped() {
    let mut benchmark = Benchmark::argv(["true"]).with_entry("name", "flaky");
    benchmark.add_post_fn(Arc::new(|ctx, record, _stdout| {
        // After the first completed run, stop re-running this benchmark.
        ctx.skip_matching(|b| b.get("name").and_then(Value::as_str) == Some("flaky"));
        record
    }));
    let benchmarks = vec![benchmark];

    let records = engine(1, None, 3).run(&benchmarks);
    assert_eq!(records.len(), 3);
    assert_eq!(status_of(&records[0]), "ok");
    assert_eq!(status_of(&records[1]), "skipped");
    assert_eq!(status_of(&records[2]), "skipped");
}

#[test]
fn records_seed_from_benchmark_info() {
    let benchmarks =
        vec![Benchmark::command("echo x").with_entry("variant", "baseline")];
    let records = engine(1, None, 1).run(&benchmarks);

    assert_eq!(records[0].get(KEY_COMMAND), Some(&Value::from("echo x")));
    assert_eq!(records[0].get("variant"), Some(&Value::from("baseline")));
    // The benchmark's own info is untouched
    assert!(benchmarks[0].get(KEY_STATUS).is_none());
}

#[test]
fn chatty_child_stdout_does_not_deadlock_the_timeout_loop() {
    // Far more output than a pipe buffer holds
    let benchmarks = vec![Benchmark::shell("seq 1 200000")];
    let records = engine(1, Some(Duration::from_secs(30)), 1).run(&benchmarks);
    assert_eq!(status_of(&records[0]), "ok");
}
