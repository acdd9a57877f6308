//! Grouped bar chart of a G1HeapRegionSize sweep. The external fragmentation
//! measured after each run is drawn over the bars.

extern crate heapfrag;
extern crate structopt;

use heapfrag::cli::{self, OutputOpt};
use heapfrag::errors::*;
use heapfrag::{BenchmarkPreset, BenchmarkReport};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "visualize_benchmark")]
#[structopt(about = "Chart DaCapo results of a G1HeapRegionSize sweep")]
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
    let report = BenchmarkReport::prepare(&opt.input, BenchmarkPreset::region_size(), &setting)?;
    let rendered = report.render()?;

    println!("Chart saved as '{}'", rendered.main.display());
    if let (Some(path), Some(focus)) = (rendered.focused, report.focus()) {
        println!("Focused {} chart saved as '{}'", focus, path.display());
    }
    println!("{}", report.summary());
    Ok(())
}
