//! heapfrag: tooling for G1 heap-fragmentation experiments.
//!
//! The crate reads G1 region trace logs into heap snapshots and computes
//! fragmentation metrics on them; it also turns benchmark results into
//! grouped bar charts, one group per benchmark and one bar per JVM
//! configuration.
//!
//! Every report goes through the same pipeline: parse, categorize,
//! aggregate, lay out, render. See `report` for the entry points.
#![recursion_limit = "1024"]

extern crate average;
extern crate chrono;
extern crate csv;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate plotters;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate structopt;
extern crate toml;

pub mod errors;
mod utils;

pub mod category;
pub mod chart;
pub mod cli;
pub mod frag;
pub mod gclog;
pub mod region;
pub mod report;
pub mod results;
pub mod setting;
pub mod snapshot;
pub mod table;

pub use category::Scheme;
pub use frag::{FragEvent, FragSummary, FragTable};
pub use report::{BenchmarkPreset, BenchmarkReport, FragmentationReport};
pub use results::BenchmarkResults;
pub use setting::Setting;
pub use snapshot::HeapSnapshot;
pub use table::Table;
pub use utils::init_logger;
