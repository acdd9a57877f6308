//! The fragmentation table: one row per GC with external fragmentation
//! before and after the collection.
//!
//! ```ignore
//! GC#, ext frag before GC, ext frag after GC, is full GC
//! 0, 45, 12, 0
//! 1, 51, 9, 1
//! ```

use crate::errors::*;
use crate::snapshot::HeapSnapshot;
use crate::utils;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const HEADER: [&str; 4] = ["GC#", " ext frag before GC", " ext frag after GC", " is full GC"];

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FragEvent {
    pub gc_count: f64,
    pub frag_before: f64,
    pub frag_after: f64,
    pub is_full_gc: bool,
}

impl FragEvent {
    /// Builds an event from the four columns; `None` if any of them is
    /// missing or not a finite number.
    fn from_record(record: &csv::StringRecord) -> Option<FragEvent> {
        let field = |i: usize| {
            record
                .get(i)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        match (field(0), field(1), field(2), field(3)) {
            (Some(gc), Some(before), Some(after), Some(full)) => Some(FragEvent {
                gc_count: gc,
                frag_before: before,
                frag_after: after,
                is_full_gc: full == 1.0,
            }),
            _ => None,
        }
    }
}

/// Statistics printed under the fragmentation chart.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FragSummary {
    pub total: usize,
    pub full_gc: usize,
    pub avg_before: f64,
    pub avg_after: f64,
    pub max_before: f64,
    pub max_after: f64,
}

impl ::std::fmt::Display for FragSummary {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        writeln!(f, "Total GC events: {}", self.total)?;
        writeln!(f, "Full GC events: {}", self.full_gc)?;
        writeln!(f, "Average fragmentation before GC: {:.2}", self.avg_before)?;
        writeln!(f, "Average fragmentation after GC: {:.2}", self.avg_after)?;
        writeln!(f, "Max fragmentation before GC: {}", self.max_before)?;
        write!(f, "Max fragmentation after GC: {}", self.max_after)
    }
}

/// Events in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FragTable {
    pub events: Vec<FragEvent>,
}

impl FragTable {
    /// Opens a fragmentation CSV.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FragTable> {
        let path = path.as_ref();
        let file = File::open(path)
            .chain_err(|| format!("no fragmentation file {}", path.display()))?;
        FragTable::from_reader(file)
    }

    /// Reads the table. The first row is a header; rows with a missing or
    /// non-numeric field are dropped.
    pub fn from_reader<R: Read>(rdr: R) -> Result<FragTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let mut events = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    if e.is_io_error() {
                        return Err(e.into());
                    }
                    debug!("dropping row {}: {}", line + 2, e);
                    continue;
                }
            };
            match FragEvent::from_record(&record) {
                Some(ev) => events.push(ev),
                None => debug!("dropping row {}: {:?}", line + 2, record),
            }
        }

        info!("{} valid fragmentation events", events.len());
        Ok(FragTable { events: events })
    }

    /// Pairs consecutive snapshots, (0, 1), (2, 3), ..., into before/after
    /// events. A trailing unpaired snapshot is ignored.
    pub fn from_snapshots(snapshots: &[HeapSnapshot]) -> FragTable {
        let events = snapshots
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| {
                let (before, after) = (&pair[0], &pair[1]);
                if before.gc_cycle != after.gc_cycle {
                    warn!(
                        "pairing snapshots of different cycles: GC({}) and GC({})",
                        before.gc_cycle,
                        after.gc_cycle
                    );
                }
                FragEvent {
                    gc_count: before.gc_cycle as f64,
                    frag_before: before.external_fragmentation() as f64,
                    frag_after: after.external_fragmentation() as f64,
                    is_full_gc: before.is_full,
                }
            })
            .collect();
        FragTable { events: events }
    }

    /// Writes the table in the format `from_reader` reads.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        writer.write_record(&HEADER)?;
        for ev in &self.events {
            writer.write_record(&[
                ev.gc_count.to_string(),
                format!(" {}", ev.frag_before),
                format!(" {}", ev.frag_after),
                format!(" {}", if ev.is_full_gc { 1 } else { 0 }),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn full_gc_events(&self) -> impl Iterator<Item = &FragEvent> {
        self.events.iter().filter(|e| e.is_full_gc)
    }

    pub fn summary(&self) -> FragSummary {
        FragSummary {
            total: self.events.len(),
            full_gc: self.full_gc_events().count(),
            avg_before: utils::mean(self.events.iter().map(|e| e.frag_before)),
            avg_after: utils::mean(self.events.iter().map(|e| e.frag_after)),
            max_before: utils::max(self.events.iter().map(|e| e.frag_before)).unwrap_or(0.0),
            max_after: utils::max(self.events.iter().map(|e| e.frag_after)).unwrap_or(0.0),
        }
    }
}
