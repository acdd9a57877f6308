//! Lists GC cycles that leave a very large number of humongous regions
//! behind. Prints `gc, before, after` for every kept heap summary line.

extern crate heapfrag;
#[macro_use]
extern crate log;
extern crate structopt;

use heapfrag::cli;
use heapfrag::errors::*;
use heapfrag::gclog::{self, DEFAULT_HUMONGOUS_THRESHOLD};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "humongous")]
#[structopt(about = "Find GC cycles with many humongous regions left")]
struct Opt {
    /// A GC log, or a directory whose *.log files are scanned
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Report cycles with more humongous regions than this after GC
    #[structopt(short = "m", long = "min-after")]
    min_after: Option<u64>,
}

impl Opt {
    fn threshold(&self) -> u64 {
        self.min_after.unwrap_or(DEFAULT_HUMONGOUS_THRESHOLD)
    }
}

fn main() {
    heapfrag::init_logger();
    let opt = Opt::from_args();
    cli::exit_on_error(run(&opt));
}

fn run(opt: &Opt) -> Result<()> {
    let min_after = opt.threshold();
    if min_after != DEFAULT_HUMONGOUS_THRESHOLD {
        info!("threshold: {} humongous regions", min_after);
    }

    if !opt.input.is_dir() {
        return scan(&opt.input, min_after);
    }

    let mut logs = Vec::new();
    for entry in fs::read_dir(&opt.input)? {
        let path = entry?.path();
        if path.extension().map_or(false, |e| e == "log") {
            logs.push(path);
        }
    }
    logs.sort();
    debug!("{} log files in {}", logs.len(), opt.input.display());

    for path in &logs {
        scan(path, min_after)?;
    }
    Ok(())
}

fn scan(path: &Path, min_after: u64) -> Result<()> {
    let file = File::open(path).chain_err(|| format!("no gc log {}", path.display()))?;
    let lines = gclog::scan_humongous(BufReader::new(file), min_after)
        .chain_err(|| format!("cannot scan {}", path.display()))?;
    for line in &lines {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_defaults_to_library_constant() {
        let opt = Opt::from_iter(vec!["humongous", "gc.log"]);
        assert_eq!(opt.min_after, None);
        assert_eq!(opt.threshold(), DEFAULT_HUMONGOUS_THRESHOLD);

        let opt = Opt::from_iter(vec!["humongous", "-m", "12", "gc.log"]);
        assert_eq!(opt.threshold(), 12);
    }
}
