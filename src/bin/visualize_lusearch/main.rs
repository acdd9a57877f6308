//! Compares benchmark times without region logging, with asynchronous and
//! with synchronous `gc+heap+region=trace` logging.

extern crate heapfrag;
extern crate structopt;

use heapfrag::cli::{self, OutputOpt};
use heapfrag::errors::*;
use heapfrag::{BenchmarkPreset, BenchmarkReport};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "visualize_lusearch")]
#[structopt(about = "Chart the overhead of G1 region trace logging")]
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
    let report = BenchmarkReport::prepare(&opt.input, BenchmarkPreset::logging(), &setting)?;
    let rendered = report.render()?;

    println!("Chart saved as '{}'", rendered.main.display());
    if let (Some(path), Some(focus)) = (rendered.focused, report.focus()) {
        println!("Focused {} chart saved as '{}'", focus, path.display());
    }
    println!("{}", report.summary());
    Ok(())
}
