//! Execution Engine
//!
//! Runs a batch of benchmarks through a bounded worker pool, one child
//! process per run slot. Each run has an independent timeout clock; expiry
//! terminates only that run's child. Per-run failures are captured in the
//! result record's `status` field and never abort the batch.
//!
//! The skip-set check and the progress banner share a single critical
//! section so displayed run indices stay monotonic and lines never garble;
//! process execution and waiting run unsynchronized.

use crate::benchmark::{Benchmark, Command, Record, KEY_STATUS, KEY_TIME};
use crate::value::Value;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::process::{Child, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of the child-exit poll loop.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Grace window between SIGTERM and SIGKILL on timeout.
#[cfg(unix)]
const TERM_GRACE: Duration = Duration::from_millis(200);

/// Outcome classification of one run slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited zero within the timeout.
    Ok,
    /// Process exited non-zero, or could not be spawned at all.
    Failed,
    /// Process outlived the timeout and was forcibly terminated.
    Timeout,
    /// Run intentionally not executed; no process was launched.
    Skipped,
}

impl RunStatus {
    /// Canonical string form stored in result records.
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ok => "ok",
            RunStatus::Failed => "failed",
            RunStatus::Timeout => "timeout",
            RunStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine configuration for one batch invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of concurrent runs; 1 executes strictly sequentially.
    pub jobs: usize,
    /// Per-run wall-clock bound; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// How many run slots each benchmark occupies.
    pub repeat: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            timeout: None,
            repeat: 1,
        }
    }
}

struct Shared {
    skip: HashSet<usize>,
    started: usize,
}

/// Per-batch state shared across workers: the benchmark list, the timeout,
/// and the mutex guarding the skip set and console output.
pub struct RunContext<'a> {
    benchmarks: &'a [Benchmark],
    timeout: Option<Duration>,
    total: usize,
    shared: Mutex<Shared>,
}

impl<'a> RunContext<'a> {
    fn new(benchmarks: &'a [Benchmark], timeout: Option<Duration>, total: usize) -> Self {
        Self {
            benchmarks,
            timeout,
            total,
            shared: Mutex::new(Shared {
                skip: HashSet::new(),
                started: 0,
            }),
        }
    }

    /// The benchmarks of this batch, in declaration order.
    pub fn benchmarks(&self) -> &[Benchmark] {
        self.benchmarks
    }

    /// The per-run timeout of this batch.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Mark every benchmark matching `predicate` to be skipped in run slots
    /// that have not started yet. Hooks use this to stop re-running a
    /// command that is no longer worth testing.
    pub fn skip_matching(&self, predicate: impl Fn(&Benchmark) -> bool) {
        let mut shared = self.lock();
        for (index, benchmark) in self.benchmarks.iter().enumerate() {
            if predicate(benchmark) {
                shared.skip.insert(index);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Skip check plus start banner, one critical section.
    fn begin_run(&self, index: usize) -> bool {
        let mut shared = self.lock();
        shared.started += 1;
        println!(
            "================ [{}/{}] ================",
            shared.started, self.total
        );
        println!("Command: {}", self.benchmarks[index].command_spec());
        shared.skip.contains(&index)
    }

    /// One-line outcome, printed under the same lock as the banner.
    fn finish_run(&self, command: &Command, status: RunStatus, elapsed_secs: Option<f64>) {
        let _shared = self.lock();
        match elapsed_secs {
            Some(secs) => println!("Time:    {:.3}s  ({})", secs, command),
            None => println!("Status:  {}  ({})", status, command),
        }
    }
}

/// Runs batches of benchmarks and aggregates per-run result records.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: RunConfig,
}

impl Engine {
    /// Create an engine for one batch invocation.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run every benchmark `repeat` times and return one record per run
    /// slot, in the same order as the repeated input list regardless of
    /// completion order.
    pub fn run(&self, benchmarks: &[Benchmark]) -> Vec<Record> {
        self.run_with_skip(benchmarks, |_| false)
    }

    /// Like [`Engine::run`], seeding the skip set from `skip` before the
    /// first run slot starts.
    pub fn run_with_skip(
        &self,
        benchmarks: &[Benchmark],
        skip: impl Fn(&Benchmark) -> bool + Sync,
    ) -> Vec<Record> {
        let repeat = self.config.repeat.max(1);
        let slots: Vec<usize> = (0..benchmarks.len())
            .flat_map(|index| std::iter::repeat(index).take(repeat))
            .collect();

        let ctx = RunContext::new(benchmarks, self.config.timeout, slots.len());
        ctx.skip_matching(skip);

        let jobs = self.config.jobs.max(1).min(slots.len().max(1));
        if jobs <= 1 {
            return slots.iter().map(|&index| run_slot(&ctx, index)).collect();
        }

        match ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| {
                slots
                    .par_iter()
                    .map(|&index| run_slot(&ctx, index))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "worker pool construction failed, running sequentially");
                slots.iter().map(|&index| run_slot(&ctx, index)).collect()
            }
        }
    }
}

enum ExecOutcome {
    Completed { elapsed_secs: f64, stdout: String },
    Failed,
    Timeout,
}

fn run_slot(ctx: &RunContext<'_>, index: usize) -> Record {
    let benchmark = &ctx.benchmarks[index];
    let mut record = benchmark.info().clone();

    let skipped = ctx.begin_run(index);
    let outcome = if skipped {
        None
    } else {
        Some(execute(benchmark.command_spec(), ctx.timeout()))
    };

    let (status, elapsed_secs, stdout) = match outcome {
        None => (RunStatus::Skipped, None, None),
        Some(ExecOutcome::Completed {
            elapsed_secs,
            stdout,
        }) => (RunStatus::Ok, Some(elapsed_secs), Some(stdout)),
        Some(ExecOutcome::Failed) => (RunStatus::Failed, None, None),
        Some(ExecOutcome::Timeout) => (RunStatus::Timeout, None, None),
    };

    record.insert(KEY_STATUS.to_string(), Value::from(status.as_str()));
    if let Some(secs) = elapsed_secs {
        record.insert(KEY_TIME.to_string(), Value::Num(secs));
    }

    ctx.finish_run(benchmark.command_spec(), status, elapsed_secs);

    for post_fn in benchmark.post_fns() {
        record = post_fn(ctx, record, stdout.as_deref());
    }
    record
}

/// Launch a command, bound its wall-clock time and capture stdout. Never
/// returns a timeout before the child is confirmed terminated.
fn execute(command: &Command, timeout: Option<Duration>) -> ExecOutcome {
    let mut cmd = match command {
        Command::Argv(args) => {
            let Some((program, rest)) = args.split_first() else {
                tracing::debug!("empty argv, nothing to execute");
                return ExecOutcome::Failed;
            };
            let mut cmd = std::process::Command::new(program);
            cmd.args(rest);
            cmd
        }
        Command::Shell(line) => {
            let mut cmd = std::process::Command::new("sh");
            cmd.arg("-c").arg(line);
            cmd
        }
    };
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let start = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(error = %e, command = %command, "failed to spawn benchmark child");
            return ExecOutcome::Failed;
        }
    };
    tracing::debug!(pid = child.id(), command = %command, "spawned benchmark child");

    // Drain stdout on its own thread so a chatty child cannot fill the pipe
    // and block while we poll for exit.
    let reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let deadline = timeout.map(|t| start + t);
    let exit = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "wait on benchmark child failed");
                terminate(&mut child);
                if let Some(handle) = reader {
                    let _ = handle.join();
                }
                return ExecOutcome::Failed;
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    match exit {
        Some(status) => {
            let elapsed_secs = start.elapsed().as_secs_f64();
            let stdout = reader
                .map(|handle| handle.join().unwrap_or_default())
                .unwrap_or_default();
            if status.success() {
                ExecOutcome::Completed {
                    elapsed_secs,
                    stdout,
                }
            } else {
                tracing::debug!(command = %command, code = ?status.code(), "benchmark child exited non-zero");
                ExecOutcome::Failed
            }
        }
        None => {
            tracing::debug!(pid = child.id(), command = %command, "timeout expired, terminating child");
            terminate(&mut child);
            if let Some(handle) = reader {
                let _ = handle.join();
            }
            ExecOutcome::Timeout
        }
    }
}

/// Terminate and reap a child. On unix: SIGTERM first, short grace window,
/// then SIGKILL.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
        }
        let grace_deadline = Instant::now() + TERM_GRACE;
        while Instant::now() < grace_deadline {
            if matches!(child.try_wait(), Ok(Some(_))) {
                return;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_are_canonical() {
        assert_eq!(RunStatus::Ok.as_str(), "ok");
        assert_eq!(RunStatus::Failed.as_str(), "failed");
        assert_eq!(RunStatus::Timeout.as_str(), "timeout");
        assert_eq!(RunStatus::Skipped.as_str(), "skipped");
    }

    #[test]
    fn default_config_is_sequential_and_unbounded() {
        let config = RunConfig::default();
        assert_eq!(config.jobs, 1);
        assert_eq!(config.repeat, 1);
        assert!(config.timeout.is_none());
    }
}
