//! Categorization of JVM option strings into configuration labels.
//!
//! Every scheme is total: a string that matches none of the explicit rules
//! gets the scheme's fallback label.

use crate::errors::*;
use std::fmt;
use std::str::FromStr;

const REGION_SIZE_LABELS: [&str; 4] = [
    "1M RegionSize",
    "8M RegionSize",
    "16M RegionSize",
    "32M RegionSize",
];

const ASYNC_LOGGING: &str = "-Xlog:async -Xlog:gc+heap+region=trace:file=/tmp/gc.log";
const SYNC_LOGGING: &str = "-Xlog:gc+heap+region=trace:file=/tmp/gc.log";
const LOGGING_LABELS: [&str; 3] = ["Baseline", ASYNC_LOGGING, SYNC_LOGGING];

const PUBLICATION_LABELS: [&str; 3] = ["1M", "Baseline", "32M"];

/// A label set together with the rules that pick a label.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Scheme {
    /// G1HeapRegionSize sweep: 1M, 8M, 16M, anything else is 32M.
    RegionSize,

    /// Region trace logging overhead: none, asynchronous, synchronous.
    Logging,

    /// RegionSize sweep with 16M (the default) shown as baseline.
    Publication,
}

impl Scheme {
    /// Labels in legend order.
    pub fn labels(&self) -> &'static [&'static str] {
        match *self {
            Scheme::RegionSize => &REGION_SIZE_LABELS,
            Scheme::Logging => &LOGGING_LABELS,
            Scheme::Publication => &PUBLICATION_LABELS,
        }
    }

    /// Parameter holding the benchmark name. The region size sweep was run
    /// with a differently named harness parameter.
    pub fn bench_key(&self) -> &'static str {
        match *self {
            Scheme::RegionSize => "benchmark",
            Scheme::Logging | Scheme::Publication => "bench",
        }
    }

    /// Maps a JVM option string to its label. Rules are tried in order.
    pub fn categorize(&self, ppparams: &str) -> &'static str {
        match *self {
            Scheme::RegionSize => {
                if ppparams == "1M" {
                    REGION_SIZE_LABELS[0]
                } else if ppparams.contains("8M") {
                    REGION_SIZE_LABELS[1]
                } else if ppparams.contains("16M") {
                    REGION_SIZE_LABELS[2]
                } else {
                    REGION_SIZE_LABELS[3]
                }
            }
            Scheme::Logging => {
                if ppparams.is_empty() {
                    LOGGING_LABELS[0]
                } else if ppparams.contains("-Xlog:async") {
                    ASYNC_LOGGING
                } else {
                    SYNC_LOGGING
                }
            }
            Scheme::Publication => {
                if ppparams == "1M" {
                    PUBLICATION_LABELS[0]
                } else if ppparams.contains("16M") {
                    PUBLICATION_LABELS[1]
                } else {
                    PUBLICATION_LABELS[2]
                }
            }
        }
    }

    /// Position of `label` in `labels()`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| *l == label)
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Scheme> {
        match s {
            "region-size" => Ok(Scheme::RegionSize),
            "logging" => Ok(Scheme::Logging),
            "publication" => Ok(Scheme::Publication),
            other => Err(ErrorKind::UnknownScheme(other.to_string()).into()),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            Scheme::RegionSize => "region-size",
            Scheme::Logging => "logging",
            Scheme::Publication => "publication",
        };
        write!(f, "{}", s)
    }
}
