//! Reads a G1 region trace log (`-Xlog:gc+heap+region=trace`) and prints
//! the fragmentation table that `plot_fragmentation` reads, followed by the
//! average fragmentation before and after GC.

#[macro_use]
extern crate error_chain;
extern crate heapfrag;
#[macro_use]
extern crate log;
extern crate serde_json;
extern crate structopt;

use heapfrag::cli;
use heapfrag::errors::*;
use heapfrag::gclog::{self, SnapshotView};
use heapfrag::FragTable;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "gclog")]
#[structopt(about = "Compute heap fragmentation from a G1 region trace log")]
struct Opt {
    /// GC log file
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Also write every snapshot (metrics and region grid) as JSON
    #[structopt(long = "json", parse(from_os_str))]
    json: Option<PathBuf>,
}

fn main() {
    heapfrag::init_logger();
    let opt = Opt::from_args();
    cli::exit_on_error(run(&opt));
}

fn run(opt: &Opt) -> Result<()> {
    let snapshots = gclog::parse_file(&opt.input)?;
    info!("{} heap snapshots in {}", snapshots.len(), opt.input.display());

    if let Some(ref path) = opt.json {
        let views = snapshots.iter().map(SnapshotView::from).collect::<Vec<_>>();
        let file = File::create(path).chain_err(|| format!("cannot create {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &views)?;
        info!("wrote {}", path.display());
    }

    let table = FragTable::from_snapshots(&snapshots);
    if table.is_empty() {
        bail!(ErrorKind::EmptyInput("before/after region dumps".to_string()));
    }
    let stdout = io::stdout();
    table.write_csv(stdout.lock())?;

    let summary = table.summary();
    println!("AVG frag before: ");
    println!("{}", summary.avg_before.trunc());
    println!("AVG frag after: ");
    println!("{}", summary.avg_after.trunc());
    Ok(())
}
