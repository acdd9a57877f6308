//! A single G1 heap region as printed by `-Xlog:gc+heap+region=trace`.
//!
//! ```ignore
//! [0.152s][trace][gc,heap,region] GC(0) |  11|0x000000069e800000, 0x000000069ebd0940, 0x000000069ec00000| 95%| E|  |TAMS 0x000000069e800000| PB 0x000000069e800000| Complete
//! ```

use crate::errors::*;
use std::fmt;
use std::str::FromStr;

/// Region type column. The numeric codes are what the grid export carries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum RegionType {
    Free,
    CollectionSet,
    Eden,
    Survivor,
    Old,
    HumongousStart,
    HumongousCont,
}

impl RegionType {
    /// Code used in the grid export.
    pub fn code(&self) -> u32 {
        match *self {
            RegionType::Free => 0,
            RegionType::CollectionSet => 10,
            RegionType::Eden => 30,
            RegionType::Survivor => 60,
            RegionType::Old => 90,
            RegionType::HumongousStart => 120,
            RegionType::HumongousCont => 150,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        *self == RegionType::Free
    }
}

impl FromStr for RegionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<RegionType> {
        match s.trim() {
            "F" => Ok(RegionType::Free),
            "CS" => Ok(RegionType::CollectionSet),
            "E" => Ok(RegionType::Eden),
            "S" => Ok(RegionType::Survivor),
            "O" => Ok(RegionType::Old),
            "HS" => Ok(RegionType::HumongousStart),
            "HC" => Ok(RegionType::HumongousCont),
            other => Err(ErrorKind::UnknownRegionType(other.to_string()).into()),
        }
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            RegionType::Free => "F",
            RegionType::CollectionSet => "CS",
            RegionType::Eden => "E",
            RegionType::Survivor => "S",
            RegionType::Old => "O",
            RegionType::HumongousStart => "HS",
            RegionType::HumongousCont => "HC",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Region {
    /// Position of the region in the heap.
    pub index: usize,

    pub kind: RegionType,

    /// GC cycle the dump belongs to; 0 for crash logs, which carry no cycle.
    pub gc_cycle: u32,

    /// Used percentage of the region, 0-100.
    pub usage: u32,
}

impl Region {
    pub fn new(index: usize, kind: RegionType, gc_cycle: u32) -> Region {
        Region {
            index: index,
            kind: kind,
            gc_cycle: gc_cycle,
            usage: 0,
        }
    }

    /// Same as `new` with a usage percentage.
    pub fn with_usage(index: usize, kind: RegionType, gc_cycle: u32, usage: u32) -> Region {
        Region {
            usage: usage,
            ..Region::new(index, kind, gc_cycle)
        }
    }

    /// Parses one line of a region dump. Returns `None` when the line is not
    /// a region row, which is how the end of a dump is detected.
    pub fn parse_line(line: &str) -> Option<Region> {
        let parts = line.split('|').collect::<Vec<&str>>();
        if parts.len() < 5 {
            return None;
        }

        let index = match parts[1].trim().parse::<usize>() {
            Ok(i) => i,
            Err(_) => return None,
        };

        let token = parts[4].trim();
        if token.is_empty() {
            return None;
        }
        let kind = match token.parse::<RegionType>() {
            Ok(k) => k,
            Err(e) => {
                warn!("region {}: {}", index, e);
                return None;
            }
        };

        Some(Region::with_usage(
            index,
            kind,
            parse_gc_cycle(parts[0]),
            parse_usage(parts[3]),
        ))
    }

    /// Grid cell `[row, column, code]` for a heap laid out on a `grid` wide
    /// square. Free regions are not exported.
    pub fn grid_cell(&self, grid: usize) -> Option<[usize; 3]> {
        if self.kind.is_free() || grid == 0 {
            return None;
        }
        Some([self.index / grid, self.index % grid, self.kind.code() as usize])
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Region {}: type={}, usage={}%, cycle={}",
            self.index,
            self.kind,
            self.usage,
            self.gc_cycle
        )
    }
}

/// Extracts `n` from the `GC(n)` decoration; 0 when there is none.
pub(crate) fn parse_gc_cycle(prefix: &str) -> u32 {
    prefix
        .find("GC(")
        .map(|start| &prefix[start + 3..])
        .and_then(|rest| rest.find(')').map(|end| &rest[..end]))
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0)
}

/// Parses strings like `" 95%"`; 0 when unparsable.
fn parse_usage(s: &str) -> u32 {
    s.trim().trim_end_matches('%').trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDEN: &str = "[0.152s][trace][gc,heap,region] GC(7) |  11|0x000000069e800000, \
                        0x000000069ebd0940, 0x000000069ec00000| 95%| E|  |TAMS \
                        0x000000069e800000| PB 0x000000069e800000| Complete";

    #[test]
    fn parse_region_row() {
        let r = Region::parse_line(EDEN).unwrap();
        assert_eq!(r.index, 11);
        assert_eq!(r.kind, RegionType::Eden);
        assert_eq!(r.gc_cycle, 7);
        assert_eq!(r.usage, 95);
    }

    #[test]
    fn crash_log_row_has_no_cycle() {
        let line = "|   3|0x0000000680c00000, 0x0000000680c00000, 0x0000000681000000|  0%| F|  |TAMS 0x0| PB 0x0| Untracked";
        let r = Region::parse_line(line).unwrap();
        assert_eq!(r.index, 3);
        assert_eq!(r.kind, RegionType::Free);
        assert_eq!(r.gc_cycle, 0);
    }

    #[test]
    fn non_region_lines() {
        assert!(Region::parse_line("[0.153s][info][gc] GC(0) Pause Young").is_none());
        assert!(Region::parse_line("| x|a|b| F|").is_none());
        assert!(Region::parse_line("| 1|a|0%|  |").is_none());
        assert!(Region::parse_line("| 1|a|0%| ZZ|").is_none());
    }

    #[test]
    fn region_type_codes() {
        assert_eq!("HS".parse::<RegionType>().unwrap().code(), 120);
        assert_eq!(" HC ".parse::<RegionType>().unwrap().code(), 150);
        assert_eq!("F".parse::<RegionType>().unwrap().code(), 0);
        assert!("TAMS".parse::<RegionType>().is_err());
    }

    #[test]
    fn grid_cells_skip_free() {
        let old = Region::new(10, RegionType::Old, 0);
        assert_eq!(old.grid_cell(4), Some([2, 2, 90]));
        assert_eq!(Region::new(10, RegionType::Free, 0).grid_cell(4), None);
    }
}
