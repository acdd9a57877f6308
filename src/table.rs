//! The aggregation table: benchmark name → configuration label → statistics.

use crate::category::Scheme;
use crate::errors::*;
use crate::results::{BenchmarkResults, BenchmarkRun, CONFIG_KEY};
use std::collections::BTreeMap;

/// Statistics of one (benchmark, label) cell.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Stats {
    pub mean: f64,
    pub stddev: f64,
    pub fragm_1: Option<f64>,
    pub fragm_2: Option<f64>,
    pub runs: usize,
}

impl<'a> From<&'a BenchmarkRun> for Stats {
    fn from(run: &'a BenchmarkRun) -> Stats {
        Stats {
            mean: run.mean,
            stddev: run.stddev(),
            fragm_1: run.fragm_1,
            fragm_2: run.fragm_2,
            runs: run.runs(),
        }
    }
}

/// All labels measured for one benchmark.
#[derive(Debug, PartialEq, Clone)]
pub struct Entry {
    pub name: String,
    configs: BTreeMap<&'static str, Stats>,
}

impl Entry {
    fn new(name: &str) -> Entry {
        Entry {
            name: name.to_string(),
            configs: BTreeMap::new(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Stats> {
        self.configs.get(label)
    }

    /// Number of labels present.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// Benchmarks in first-seen order, each with its labels.
#[derive(Debug, PartialEq, Clone)]
pub struct Table {
    scheme: Scheme,
    benchmarks: Vec<Entry>,
}

impl Table {
    pub fn new(scheme: Scheme) -> Table {
        Table {
            scheme: scheme,
            benchmarks: Vec::new(),
        }
    }

    /// Classifies every result with `scheme`. A later result for the same
    /// (benchmark, label) replaces the earlier one.
    pub fn build(results: &BenchmarkResults, scheme: Scheme) -> Result<Table> {
        let mut table = Table::new(scheme);
        for run in &results.results {
            let name = run.parameter(scheme.bench_key())?;
            let label = scheme.categorize(run.parameter(CONFIG_KEY)?);
            table.insert(name, label, Stats::from(run));
        }
        info!(
            "aggregated {} results into {} benchmarks ({} scheme)",
            results.len(),
            table.len(),
            scheme
        );
        Ok(table)
    }

    /// Stores `stats` at (`name`, `label`), overwriting any previous value.
    pub fn insert(&mut self, name: &str, label: &'static str, stats: Stats) {
        let idx = match self.benchmarks.iter().position(|e| e.name == name) {
            Some(i) => i,
            None => {
                self.benchmarks.push(Entry::new(name));
                self.benchmarks.len() - 1
            }
        };
        if let Some(old) = self.benchmarks[idx].configs.insert(label, stats) {
            debug!("{} / {}: replacing {:?}", name, label, old);
        }
    }

    /// Orders benchmarks alphabetically.
    pub fn sort_by_name(&mut self) {
        self.benchmarks.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.benchmarks.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.benchmarks
    }

    pub fn names(&self) -> Vec<&str> {
        self.benchmarks.iter().map(|e| e.name.as_str()).collect()
    }

    /// The cell for `label` of every benchmark, in table order.
    pub fn series(&self, label: &str) -> Vec<Option<&Stats>> {
        self.benchmarks.iter().map(|e| e.get(label)).collect()
    }

    /// Runs summed over every cell.
    pub fn total_runs(&self) -> usize {
        self.benchmarks
            .iter()
            .flat_map(|e| e.configs.values())
            .map(|s| s.runs)
            .sum()
    }

    /// Size of the scheme's label set.
    pub fn label_count(&self) -> usize {
        self.scheme.labels().len()
    }
}
