//! The per-run JSON files written by the benchmarking harness.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use crate::{
    debug,
    units::{MicroSeconds, RequestsPerSecond},
};

/// Result of a model running alone (`ideal/{model}_{run}_hp.json`).
/// Other fields in the file are ignored.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct IdealRunResult {
    pub throughput: RequestsPerSecond,
    pub p95_latency: MicroSeconds,
}

/// Result of an HP and a BE model running side by side under MPS
/// (`mps/{hp}_{be}_{run}.json`). Index 0 is the HP job, 1 the BE job.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MpsRunResult {
    #[serde(rename = "throughput-0")]
    pub hp_throughput: RequestsPerSecond,
    #[serde(rename = "throughput-1")]
    pub be_throughput: RequestsPerSecond,
    /// Only measured for the HP job
    #[serde(rename = "p95-latency-0")]
    pub hp_p95_latency: MicroSeconds,
}

/// Whether `value` counts as "no result": null, false, zero, or an
/// empty string, array or object.
pub fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn read_json_value(path: &Path) -> Result<Value> {
    debug!("reading {path:?}");
    let s = std::fs::read_to_string(path)
        .with_context(|| anyhow!("reading run result file {path:?}"))?;
    serde_json::from_str(&s).with_context(|| anyhow!("parsing JSON from run result file {path:?}"))
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value, path: &Path) -> Result<T> {
    serde_path_to_error::deserialize(value)
        .with_context(|| anyhow!("decoding run result file {path:?}"))
}

impl IdealRunResult {
    pub fn read_file(path: &Path) -> Result<Self> {
        from_value(read_json_value(path)?, path)
    }
}

impl MpsRunResult {
    /// None if the file holds an empty result (the run is to be
    /// skipped).
    pub fn read_file(path: &Path) -> Result<Option<Self>> {
        let value = read_json_value(path)?;
        if is_empty_result(&value) {
            debug!("empty result in {path:?}");
            Ok(None)
        } else {
            Ok(Some(from_value(value, path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn t_is_empty_result() {
        for v in [json!(null), json!({}), json!([]), json!(""), json!(0), json!(0.0), json!(false)] {
            assert!(is_empty_result(&v), "{v}");
        }
        for v in [json!({"a": 1}), json!([0]), json!("x"), json!(1), json!(true)] {
            assert!(!is_empty_result(&v), "{v}");
        }
    }

    #[test]
    fn t_read_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let ideal = dir.path().join("ideal.json");
        std::fs::write(
            &ideal,
            r#"{"throughput": 100.0, "p95_latency": 5000, "p50_latency": 1}"#,
        )?;
        let r = IdealRunResult::read_file(&ideal)?;
        assert_eq!(r.throughput, RequestsPerSecond(100.));
        assert_eq!(r.p95_latency, MicroSeconds(5000.));

        let mps = dir.path().join("mps.json");
        std::fs::write(
            &mps,
            r#"{"throughput-0": 50.0, "throughput-1": 30.0, "p95-latency-0": 8000.0}"#,
        )?;
        let r = MpsRunResult::read_file(&mps)?.expect("non-empty");
        assert_eq!(r.hp_throughput, RequestsPerSecond(50.));
        assert_eq!(r.be_throughput, RequestsPerSecond(30.));
        assert_eq!(r.hp_p95_latency, MicroSeconds(8000.));

        std::fs::write(&mps, "{}")?;
        assert_eq!(MpsRunResult::read_file(&mps)?, None);
        Ok(())
    }

    #[test]
    fn t_errors_name_the_field() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"throughput": "fast", "p95_latency": 1.0}"#)?;
        let e = IdealRunResult::read_file(&path).unwrap_err();
        assert!(format!("{e:#}").contains("throughput"), "{e:#}");

        let e = IdealRunResult::read_file(&dir.path().join("missing.json")).unwrap_err();
        let io = e.downcast_ref::<std::io::Error>().expect("io error in chain");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        Ok(())
    }
}
