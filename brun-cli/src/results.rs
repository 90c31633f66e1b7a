//! Results Persistence
//!
//! After execution every result record is serialized to a results file, one
//! mapping per run in run order, so downstream tooling can reuse results
//! without re-running benchmarks.

use brun_core::Record;
use std::path::Path;

/// Write `records` as prettified JSON to `path`, creating parent
/// directories as needed.
pub fn write_results(path: impl AsRef<Path>, records: &[Record]) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brun_core::Value;

    #[test]
    fn round_trips_through_json() {
        let mut record = Record::new();
        record.insert("command".to_string(), Value::from("true"));
        record.insert("status".to_string(), Value::from("ok"));
        record.insert("time".to_string(), Value::from(0.25));
        let records = vec![record];

        let path = std::env::temp_dir().join(format!(
            "brun-results-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        write_results(&path, &records).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);

        let _ = std::fs::remove_file(&path);
    }
}
