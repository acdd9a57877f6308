//! Reader for G1 GC logs with region tracing
//! (`-Xlog:gc,gc+heap+region=trace`).
//!
//! A region dump looks like:
//!
//! ```ignore
//! [0.150s][info ][gc,start       ] GC(0) Pause Young (Normal) (G1 Evacuation Pause)
//! [0.152s][trace][gc,heap,region ] GC(0) Heap Regions: E=young(eden), S=young(survivor), O=old, ...
//! [0.152s][trace][gc,heap,region ] GC(0) |   0|0x0000000680000000, 0x0000000680000000, 0x0000000680400000|  0%| F|  |TAMS 0x0000000680000000| PB 0x0000000680000000| Untracked
//! [0.152s][trace][gc,heap,region ] GC(0) |   1|0x0000000680400000, 0x0000000680400000, 0x0000000680800000|  0%| F|  |TAMS 0x0000000680400000| PB 0x0000000680400000| Untracked
//! ```
//!
//! G1 prints a dump before and after every collection, so snapshots come in
//! before/after pairs.

use crate::errors::*;
use crate::region::{self, Region};
use crate::snapshot::HeapSnapshot;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const REGIONS_HEADER: &str = "Heap Regions:";
const GC_START: &str = "gc,start";
const HUMONGOUS: &str = "Humongous regions:";

/// Humongous count above which `humongous` reports a cycle.
pub const DEFAULT_HUMONGOUS_THRESHOLD: u64 = 90_000;

/// Opens and parses a GC log file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<HeapSnapshot>> {
    let path = path.as_ref();
    let file = File::open(path).chain_err(|| format!("no gc log {}", path.display()))?;
    parse_log(BufReader::new(file))
}

/// Splits a GC log into heap snapshots, one per region dump.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<HeapSnapshot>> {
    let mut snapshots = Vec::new();
    let mut regions: Vec<Region> = Vec::new();
    let mut in_dump = false;
    let mut is_full = false;
    let mut gc_type = String::new();
    let mut prev_line = String::new();

    for line in reader.lines() {
        let line = line?;

        if line.contains(REGIONS_HEADER) {
            in_dump = true;
            if prev_line.contains(GC_START) {
                is_full = prev_line.contains("Full");
                gc_type = gc_cause(&prev_line);
            }
            continue;
        }

        if !in_dump {
            prev_line = line;
            continue;
        }

        match Region::parse_line(&line) {
            Some(region) => regions.push(region),
            None => {
                if !regions.is_empty() {
                    snapshots.push(close_dump(&mut regions, is_full, &gc_type));
                }
                regions.clear();
                in_dump = false;
                is_full = false;
                gc_type.clear();
                prev_line = line;
            }
        }
    }

    // crash logs (and truncated logs) end in the middle of a dump
    if !regions.is_empty() {
        snapshots.push(close_dump(&mut regions, is_full, &gc_type));
    }

    debug!("parsed {} heap snapshots", snapshots.len());
    Ok(snapshots)
}

fn close_dump(regions: &mut Vec<Region>, is_full: bool, gc_type: &str) -> HeapSnapshot {
    let regions = ::std::mem::replace(regions, Vec::new());
    let gc_cycle = regions.last().map(|r| r.gc_cycle).unwrap_or(0);
    trace!("snapshot GC({}) with {} regions", gc_cycle, regions.len());
    HeapSnapshot::new(gc_cycle, regions, is_full, gc_type.to_string())
}

/// Text after the `GC(n)` decoration, e.g. `Pause Full (System.gc())`.
fn gc_cause(line: &str) -> String {
    match line.find(')') {
        Some(i) => line.get(i + 2..).unwrap_or("").to_string(),
        None => String::new(),
    }
}

/// One `Humongous regions: a->b` heap summary line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct HumongousLine {
    pub gc: u32,
    pub before: u64,
    pub after: u64,
}

impl HumongousLine {
    /// Parses a line such as
    /// `[1.234s][info][gc,heap] GC(3) Humongous regions: 5->2`.
    pub fn parse(line: &str) -> Result<HumongousLine> {
        let malformed = || ErrorKind::MalformedLine(line.to_string());
        let start = line.find("GC(").ok_or_else(malformed)?;
        let fields = line[start..].split_whitespace().collect::<Vec<&str>>();
        if fields.len() < 4 {
            bail!(malformed());
        }

        let mut counts = fields[3].splitn(2, "->");
        let before = counts.next().and_then(|s| s.parse().ok());
        let after = counts.next().and_then(|s| s.parse().ok());
        match (before, after) {
            (Some(b), Some(a)) => Ok(HumongousLine {
                gc: region::parse_gc_cycle(fields[0]),
                before: b,
                after: a,
            }),
            _ => bail!(malformed()),
        }
    }
}

impl ::std::fmt::Display for HumongousLine {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}, {}, {}", self.gc, self.before, self.after)
    }
}

/// Returns the humongous summaries whose count after collection exceeds
/// `min_after`.
pub fn scan_humongous<R: BufRead>(reader: R, min_after: u64) -> Result<Vec<HumongousLine>> {
    let mut found = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.contains(HUMONGOUS) {
            continue;
        }
        let h = HumongousLine::parse(&line)?;
        if h.after > min_after {
            found.push(h);
        }
    }
    Ok(found)
}

/// Per-snapshot export: metrics plus the grid cells a heap viewer draws.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SnapshotView {
    pub gc_cycle: u32,
    pub gc_type: String,
    pub is_full: bool,
    pub grid_size: usize,
    pub ext: u32,
    pub int: u32,
    pub free: u32,
    pub regions: Vec<[usize; 3]>,
}

impl<'a> From<&'a HeapSnapshot> for SnapshotView {
    fn from(hs: &'a HeapSnapshot) -> SnapshotView {
        SnapshotView {
            gc_cycle: hs.gc_cycle,
            gc_type: hs.gc_type.clone(),
            is_full: hs.is_full,
            grid_size: hs.grid_size(),
            ext: hs.external_fragmentation(),
            int: hs.internal_fragmentation(),
            free: hs.free_percent(),
            regions: hs.grid_cells(),
        }
    }
}
