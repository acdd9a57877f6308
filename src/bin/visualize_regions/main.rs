//! Grayscale vector figures of the 1M / 16M (baseline) / 32M region size
//! comparison.

extern crate heapfrag;
extern crate structopt;

use heapfrag::cli::{self, OutputOpt};
use heapfrag::errors::*;
use heapfrag::{BenchmarkPreset, BenchmarkReport};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "visualize_regions")]
#[structopt(about = "Grayscale G1HeapRegionSize charts for print")]
struct Opt {
    /// Benchmark results exported by the benchmarking harness (JSON)
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
    let report = BenchmarkReport::prepare(&opt.input, BenchmarkPreset::publication(), &setting)?;
    let rendered = report.render()?;

    println!("Chart saved as '{}'", rendered.main.display());
    if let (Some(path), Some(focus)) = (rendered.focused, report.focus()) {
        println!("Focused {} chart saved as '{}'", focus, path.display());
    }
    println!("{}", report.summary());
    Ok(())
}
