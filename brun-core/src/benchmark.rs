//! Benchmark Model
//!
//! A `Benchmark` is an immutable description of one unit of work: the
//! command to execute, a metadata map seeding the result record, and an
//! ordered list of post-run hooks.

use crate::engine::RunContext;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Key of the derived human-readable command entry in `info`.
pub const KEY_COMMAND: &str = "command";
/// Key of the run status entry in a result record.
pub const KEY_STATUS: &str = "status";
/// Key of the elapsed-seconds entry in a result record (ok runs only).
pub const KEY_TIME: &str = "time";

/// A flat result record: a copy of the benchmark's `info` annotated with
/// `status` and, for ok runs, `time`.
pub type Record = BTreeMap<String, Value>;

/// A post-run hook: an ordered pure transformation applied to the result
/// record after each run. `stdout` is present only for ok runs.
pub type PostFn = Arc<dyn Fn(&RunContext<'_>, Record, Option<&str>) -> Record + Send + Sync>;

/// How a benchmark's command is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// An argument vector executed directly, no shell involved.
    Argv(Vec<String>),
    /// A single line handed to `sh -c`.
    Shell(String),
}

impl Command {
    /// Human-readable joined form, stored in `info["command"]`.
    pub fn display_line(&self) -> String {
        match self {
            Command::Argv(args) => args.join(" "),
            Command::Shell(line) => line.clone(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_line())
    }
}

/// One declared benchmark. Created once at declaration time; the same
/// benchmark is reused across repeated run slots.
#[derive(Clone)]
pub struct Benchmark {
    command: Command,
    info: Record,
    post_fns: Vec<PostFn>,
}

impl Benchmark {
    /// Declare a benchmark from a command line split on whitespace and
    /// executed directly.
    pub fn command(line: impl AsRef<str>) -> Self {
        let argv = line
            .as_ref()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self::from_command(Command::Argv(argv))
    }

    /// Declare a benchmark from an explicit argument vector.
    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_command(Command::Argv(args.into_iter().map(Into::into).collect()))
    }

    /// Declare a benchmark whose command is interpreted by `sh -c`.
    pub fn shell(line: impl Into<String>) -> Self {
        Self::from_command(Command::Shell(line.into()))
    }

    fn from_command(command: Command) -> Self {
        let mut info = Record::new();
        info.insert(KEY_COMMAND.to_string(), Value::from(command.display_line()));
        Self {
            command,
            info,
            post_fns: Vec::new(),
        }
    }

    /// Merge metadata entries into `info`. The derived `"command"` entry is
    /// always re-established afterwards.
    pub fn with_info(mut self, info: Record) -> Self {
        self.info.extend(info);
        self.info
            .insert(KEY_COMMAND.to_string(), Value::from(self.command.display_line()));
        self
    }

    /// Set a single metadata entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != KEY_COMMAND {
            self.info.insert(key, value.into());
        }
        self
    }

    /// Append a post-run hook (builder form).
    pub fn with_post_fn(mut self, f: PostFn) -> Self {
        self.post_fns.push(f);
        self
    }

    /// Append a post-run hook.
    pub fn add_post_fn(&mut self, f: PostFn) {
        self.post_fns.push(f);
    }

    /// The command to execute.
    pub fn command_spec(&self) -> &Command {
        &self.command
    }

    /// The metadata map. Never mutated in place by the engine; each run
    /// copies it before annotating.
    pub fn info(&self) -> &Record {
        &self.info
    }

    /// Look up a metadata entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.info.get(key)
    }

    /// Registered post-run hooks, in registration order.
    pub fn post_fns(&self) -> &[PostFn] {
        &self.post_fns
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("command", &self.command)
            .field("info", &self.info)
            .field("post_fns", &self.post_fns.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_splits_into_argv() {
        let b = Benchmark::command("gzip -9 data.bin");
        assert_eq!(
            b.command_spec(),
            &Command::Argv(vec!["gzip".into(), "-9".into(), "data.bin".into()])
        );
        assert_eq!(
            b.get(KEY_COMMAND),
            Some(&Value::from("gzip -9 data.bin"))
        );
    }

    #[test]
    fn shell_command_is_kept_verbatim() {
        let b = Benchmark::shell("sort data | uniq -c");
        assert_eq!(
            b.command_spec(),
            &Command::Shell("sort data | uniq -c".into())
        );
        assert_eq!(b.get(KEY_COMMAND), Some(&Value::from("sort data | uniq -c")));
    }

    #[test]
    fn info_always_keeps_the_derived_command_entry() {
        let mut extra = Record::new();
        extra.insert(KEY_COMMAND.to_string(), Value::from("overwritten"));
        extra.insert("size".to_string(), Value::from(64));

        let b = Benchmark::argv(["true"]).with_info(extra);
        assert_eq!(b.get(KEY_COMMAND), Some(&Value::from("true")));
        assert_eq!(b.get("size"), Some(&Value::from(64)));
    }
}
