//! Plots external fragmentation before and after each GC, as written by
//! `gclog`:
//!
//! ```ignore
//! GC#, ext frag before GC, ext frag after GC, is full GC
//! 0, 45, 12, 0
//! ```

extern crate heapfrag;
extern crate structopt;

use heapfrag::cli::{self, OutputOpt};
use heapfrag::errors::*;
use heapfrag::FragmentationReport;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "plot_fragmentation")]
#[structopt(about = "Plot fragmentation before and after garbage collection")]
struct Opt {
    /// Fragmentation table (CSV)
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    #[structopt(flatten)]
    output: OutputOpt,
}

fn main() {
    heapfrag::init_logger();
    let opt = Opt::from_args();
    cli::exit_on_error(run(&opt));
}

fn run(opt: &Opt) -> Result<()> {
    let setting = opt.output.setting()?;
    let report = FragmentationReport::prepare(&opt.input, &setting)?;
    let written = report.render()?;

    println!("Figures saved:");
    for path in &written {
        println!("  - {}", path.display());
    }
    println!("\nData Statistics:");
    println!("{}", report.summary());
    Ok(())
}
