//! Benchmark results as exported by the benchmarking harness (JSON).
//!
//! ```ignore
//! {
//!   "results": [
//!     {
//!       "command": "java -XX:G1HeapRegionSize=8M -jar dacapo.jar lusearch",
//!       "mean": 2.31, "stddev": 0.04,
//!       "times": [2.29, 2.35, 2.30],
//!       "fragm_1": 12.0, "fragm_2": 4.0,
//!       "parameters": { "benchmark": "lusearch", "ppparams": "-XX:G1HeapRegionSize=8M" }
//!     }
//!   ]
//! }
//! ```

use crate::errors::*;
use crate::utils;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parameter holding the JVM options of a run.
pub const CONFIG_KEY: &str = "ppparams";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BenchmarkResults {
    pub results: Vec<BenchmarkRun>,
}

/// One parameter combination of the parameter sweep.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    #[serde(default)]
    pub command: Option<String>,

    /// Mean wall clock time, in seconds.
    pub mean: f64,

    /// Standard deviation; the harness writes `null` for a single run.
    stddev: Option<f64>,

    /// Every measured time. Only used to count runs and as a fallback for a
    /// missing standard deviation.
    #[serde(default)]
    pub times: Option<Vec<f64>>,

    /// External fragmentation, as reported by the instrumented JVM.
    #[serde(default)]
    pub fragm_1: Option<f64>,
    #[serde(default)]
    pub fragm_2: Option<f64>,

    pub parameters: BTreeMap<String, String>,
}

impl BenchmarkRun {
    /// Looks up a parameter of the run.
    pub fn parameter(&self, key: &str) -> Result<&str> {
        self.parameters
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| ErrorKind::MissingParameter(key.to_string()).into())
    }

    /// The reported standard deviation. If the harness left it out, it is
    /// recomputed from `times`, and 0 when that is not possible either.
    pub fn stddev(&self) -> f64 {
        match self.stddev {
            Some(sd) => sd,
            None => self
                .times
                .as_ref()
                .and_then(|t| utils::sample_stddev(t.iter().cloned()))
                .unwrap_or(0.0),
        }
    }

    /// Number of measured runs.
    pub fn runs(&self) -> usize {
        self.times.as_ref().map(|t| t.len()).unwrap_or(0)
    }
}

impl BenchmarkResults {
    /// Opens a results file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<BenchmarkResults> {
        let path = path.as_ref();
        let file = File::open(path).chain_err(|| format!("no results file {}", path.display()))?;
        BenchmarkResults::from_reader(BufReader::new(file))
            .chain_err(|| format!("cannot parse {}", path.display()))
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<BenchmarkResults> {
        let results: BenchmarkResults = serde_json::from_reader(rdr)?;
        debug!("read {} benchmark results", results.results.len());
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_harness_export() {
        let json = r#"{
          "results": [
            { "command": "run a", "mean": 1.5, "stddev": 0.1, "median": 1.4,
              "times": [1.4, 1.5, 1.6], "exit_codes": [0, 0, 0],
              "parameters": { "bench": "lusearch", "ppparams": "" } },
            { "mean": 2.0, "stddev": null, "times": [1.0, 3.0],
              "fragm_1": 10.0, "fragm_2": 4.5,
              "parameters": { "bench": "h2", "ppparams": "16M" } }
          ]
        }"#;
        let results = BenchmarkResults::from_reader(json.as_bytes()).unwrap();
        assert_eq!(results.len(), 2);

        let first = &results.results[0];
        assert_eq!(first.parameter("bench").unwrap(), "lusearch");
        assert_eq!(first.parameter(CONFIG_KEY).unwrap(), "");
        assert_eq!(first.stddev(), 0.1);
        assert_eq!(first.runs(), 3);
        assert_eq!(first.fragm_2, None);

        let second = &results.results[1];
        assert!((second.stddev() - 2.0f64.sqrt()).abs() < 1e-9);
        assert_eq!(second.fragm_2, Some(4.5));
    }

    #[test]
    fn missing_parameter() {
        let json = r#"{ "results": [ { "mean": 1.0, "stddev": 0.0, "parameters": {} } ] }"#;
        let results = BenchmarkResults::from_reader(json.as_bytes()).unwrap();
        match results.results[0].parameter("bench") {
            Err(Error(ErrorKind::MissingParameter(ref k), _)) => assert_eq!(k, "bench"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn single_run_without_stddev() {
        let json = r#"{ "results": [ { "mean": 1.0, "stddev": null, "times": [1.0], "parameters": {} } ] }"#;
        let results = BenchmarkResults::from_reader(json.as_bytes()).unwrap();
        assert_eq!(results.results[0].stddev(), 0.0);
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(BenchmarkResults::from_reader("{ \"runs\": [] }".as_bytes()).is_err());
        assert!(BenchmarkResults::from_reader(r#"{ "results": [ { "parameters": {} } ] }"#.as_bytes()).is_err());
        assert!(BenchmarkResults::from_reader("not json".as_bytes()).is_err());
    }
}
