//! Heap snapshots: one region dump, plus the fragmentation metrics over it.

use crate::errors::*;
use crate::region::Region;

/// The regions of one `Heap Regions:` dump.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapSnapshot {
    pub gc_cycle: u32,
    pub regions: Vec<Region>,

    /// Dump was printed at the start of a full collection.
    pub is_full: bool,

    /// Cause text of the `gc,start` line, e.g. `Pause Young (Normal) (G1 Evacuation Pause)`.
    pub gc_type: String,
}

impl HeapSnapshot {
    pub fn new(gc_cycle: u32, regions: Vec<Region>, is_full: bool, gc_type: String) -> Self {
        HeapSnapshot {
            gc_cycle: gc_cycle,
            regions: regions,
            is_full: is_full,
            gc_type: gc_type,
        }
    }

    /// Side of the smallest square grid that holds every region.
    pub fn grid_size(&self) -> usize {
        (self.regions.len() as f64).sqrt().ceil() as usize
    }

    /// Non-free regions as `[row, column, code]` cells.
    pub fn grid_cells(&self) -> Vec<[usize; 3]> {
        let grid = self.grid_size();
        self.regions
            .iter()
            .filter_map(|r| r.grid_cell(grid))
            .collect()
    }

    /// `grid_cells` as a JSON array.
    pub fn regions_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.grid_cells())?)
    }

    /// External fragmentation in percent: how scattered the free regions
    /// are. 0 means all free regions form one contiguous run; a heap without
    /// free regions is 100.
    pub fn external_fragmentation(&self) -> u32 {
        if self.regions.is_empty() {
            return 0;
        }

        let mut last_index: Option<usize> = None;
        let mut max_contig = 0;
        let mut contig = 0;
        let mut free = 0;

        for region in &self.regions {
            if region.kind.is_free() {
                free += 1;
                // a run continues only over consecutive indices
                if last_index.map(|i| i + 1) == Some(region.index) {
                    contig += 1;
                } else {
                    contig = 1;
                }
            } else {
                contig = 0;
            }
            max_contig = ::std::cmp::max(max_contig, contig);
            last_index = Some(region.index);
        }

        if free == 0 {
            return 100;
        }

        let ef = 1.0 - (max_contig as f64 / free as f64);
        (ef * 100.0).round() as u32
    }

    /// Share of free regions in percent (truncated).
    pub fn free_percent(&self) -> u32 {
        if self.regions.is_empty() {
            return 0;
        }
        let free = self.regions.iter().filter(|r| r.kind.is_free()).count();
        (free * 100 / self.regions.len()) as u32
    }

    /// Internal fragmentation in percent: how thinly used memory is spread
    /// over regions. `1 - sum(u^2) / (100 * sum(u))` over usage percents.
    pub fn internal_fragmentation(&self) -> u32 {
        let (squared, linear) = self.regions.iter().fold((0.0, 0.0), |acc, r| {
            let u = r.usage as f64;
            (acc.0 + u * u, acc.1 + u)
        });

        if linear > 0.0 {
            let fragmentation = 1.0 - squared / (100.0 * linear);
            (fragmentation * 100.0).round() as u32
        } else {
            0
        }
    }
}
