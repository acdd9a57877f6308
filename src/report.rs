//! The reporting pipeline: parse, categorize, aggregate, lay out, render.
//!
//! A `BenchmarkPreset` fixes the categorization scheme and the look of the
//! two benchmark charts; the input adapter is chosen by the report type.

use crate::category::Scheme;
use crate::chart::{self, ChartStyle, FocusedLayout, FragLayout, GroupedLayout, Palette};
use crate::errors::*;
use crate::frag::{FragSummary, FragTable};
use crate::results::BenchmarkResults;
use crate::setting::Setting;
use crate::table::Table;
use std::fmt;
use std::path::{Path, PathBuf};

pub const FRAGMENTATION_PNG: &str = "fragmentation_analysis.png";
pub const FRAGMENTATION_SVG: &str = "fragmentation_analysis.svg";

const TIME_DESC: &str = "Mean Execution Time (seconds)";

/// What a benchmark report looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkPreset {
    pub scheme: Scheme,
    pub main_file: &'static str,
    pub focus_file: &'static str,
    pub main_style: ChartStyle,

    /// Focused chart title; the benchmark name is put in front of it.
    pub focus_title: Option<&'static str>,
    pub focus_style: ChartStyle,

    /// Benchmark of the focused chart, unless the setting names another.
    pub focus: &'static str,
    pub sorted: bool,
    pub overlay: bool,
    pub stats_box: bool,
}

impl BenchmarkPreset {
    /// G1HeapRegionSize sweep with the fragmentation overlay.
    pub fn region_size() -> BenchmarkPreset {
        BenchmarkPreset {
            scheme: Scheme::RegionSize,
            main_file: "dacapo_benchmark_results.png",
            focus_file: "benchmark_comparison.png",
            main_style: ChartStyle {
                title: Some(
                    "DaCapo Benchmark Results: JVM G1HeapRegionSize Parameter Comparison".to_string(),
                ),
                x_desc: "Benchmark",
                y_desc: TIME_DESC,
                palette: Palette::Vivid,
                legend_left: false,
            },
            focus_title: Some("Benchmark: JVM G1HeapRegionSize Parameter Impact"),
            focus_style: ChartStyle {
                title: None,
                x_desc: "Configuration",
                y_desc: TIME_DESC,
                palette: Palette::Vivid,
                legend_left: false,
            },
            focus: "eclipse",
            sorted: false,
            overlay: true,
            stats_box: false,
        }
    }

    /// Overhead of region trace logging.
    pub fn logging() -> BenchmarkPreset {
        BenchmarkPreset {
            scheme: Scheme::Logging,
            main_file: "dacapo_benchmark_results_logs.png",
            focus_file: "lusearch_benchmark_comparison.png",
            main_style: ChartStyle {
                title: Some("DaCapo Benchmark Results: JVM Logging Parameter Comparison".to_string()),
                x_desc: "Benchmark",
                y_desc: TIME_DESC,
                palette: Palette::Cool,
                legend_left: true,
            },
            focus_title: Some("Benchmark: JVM Logging Parameter Impact"),
            focus_style: ChartStyle {
                title: None,
                x_desc: "Configuration",
                y_desc: TIME_DESC,
                palette: Palette::Cool,
                legend_left: false,
            },
            focus: "lusearch",
            sorted: true,
            overlay: false,
            stats_box: true,
        }
    }

    /// Grayscale vector figures for print.
    pub fn publication() -> BenchmarkPreset {
        BenchmarkPreset {
            scheme: Scheme::Publication,
            main_file: "dacapo_benchmark_results.svg",
            focus_file: "lusearch_benchmark_comparison.svg",
            main_style: ChartStyle {
                title: None,
                x_desc: "Benchmark",
                y_desc: "Execution Time (s)",
                palette: Palette::Grayscale,
                legend_left: false,
            },
            focus_title: None,
            focus_style: ChartStyle {
                title: None,
                x_desc: "Configuration",
                y_desc: "Execution Time (s)",
                palette: Palette::Grayscale,
                legend_left: false,
            },
            focus: "lusearch",
            sorted: true,
            overlay: false,
            stats_box: false,
        }
    }
}

/// Counts shown after a benchmark report is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub benchmarks: usize,
    pub configurations: usize,
    pub total_runs: usize,
    pub files: Vec<PathBuf>,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Benchmarks: {}", self.benchmarks)?;
        writeln!(f, "Configurations: {}", self.configurations)?;
        write!(f, "Total runs: {}", self.total_runs)
    }
}

/// Where a benchmark report was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub main: PathBuf,
    pub focused: Option<PathBuf>,
}

/// A benchmark report, laid out and ready to render.
#[derive(Debug)]
pub struct BenchmarkReport {
    preset: BenchmarkPreset,
    setting: Setting,
    table: Table,
    main: GroupedLayout,
    focused: Option<FocusedLayout>,
}

impl BenchmarkReport {
    /// Reads the results file and lays out both charts.
    pub fn prepare<P: AsRef<Path>>(
        input: P,
        preset: BenchmarkPreset,
        setting: &Setting,
    ) -> Result<BenchmarkReport> {
        let results = BenchmarkResults::load(input)?;
        BenchmarkReport::from_results(&results, preset, setting)
    }

    pub fn from_results(
        results: &BenchmarkResults,
        preset: BenchmarkPreset,
        setting: &Setting,
    ) -> Result<BenchmarkReport> {
        let mut table = Table::build(results, preset.scheme)?;
        if preset.sorted {
            table.sort_by_name();
        }

        let main = GroupedLayout::build(
            &table,
            preset.main_style.clone(),
            preset.overlay,
            preset.stats_box,
        )?;

        let focus = setting
            .focus
            .as_ref()
            .map(|s| s.as_str())
            .unwrap_or(preset.focus);
        let mut focus_style = preset.focus_style.clone();
        focus_style.title = preset
            .focus_title
            .map(|t| format!("{} {}", capitalize(focus), t));
        let focused = FocusedLayout::build(&table, focus, focus_style);
        if focused.is_none() {
            info!("benchmark {} not in results, skipping the focused chart", focus);
        }

        Ok(BenchmarkReport {
            preset: preset,
            setting: setting.clone(),
            table: table,
            main: main,
            focused: focused,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn main_layout(&self) -> &GroupedLayout {
        &self.main
    }

    pub fn focused_layout(&self) -> Option<&FocusedLayout> {
        self.focused.as_ref()
    }

    /// Benchmark of the focused chart, if it is drawn.
    pub fn focus(&self) -> Option<&str> {
        self.focused.as_ref().map(|f| f.benchmark.as_str())
    }

    /// Writes the figures into the output directory.
    pub fn render(&self) -> Result<Rendered> {
        let main_path = self.setting.output_path(self.preset.main_file)?;
        chart::render(
            &self.main,
            &main_path,
            (self.setting.width, self.setting.height),
        )?;

        let focused = match self.focused {
            Some(ref layout) => {
                let path = self.setting.output_path(self.preset.focus_file)?;
                chart::render(
                    layout,
                    &path,
                    (self.setting.focus_width, self.setting.focus_height),
                )?;
                Some(path)
            }
            None => None,
        };

        Ok(Rendered {
            main: main_path,
            focused: focused,
        })
    }

    /// Counts of the report, and the files `render` writes.
    pub fn summary(&self) -> ReportSummary {
        let dir = &self.setting.output_dir;
        let mut files = vec![dir.join(self.preset.main_file)];
        if self.focused.is_some() {
            files.push(dir.join(self.preset.focus_file));
        }
        ReportSummary {
            benchmarks: self.table.len(),
            configurations: self.table.label_count(),
            total_runs: self.table.total_runs(),
            files: files,
        }
    }
}

/// The fragmentation chart, in a bitmap and a vector version.
#[derive(Debug)]
pub struct FragmentationReport {
    setting: Setting,
    table: FragTable,
    layout: FragLayout,
}

impl FragmentationReport {
    pub fn prepare<P: AsRef<Path>>(input: P, setting: &Setting) -> Result<FragmentationReport> {
        let table = FragTable::load(input)?;
        FragmentationReport::from_table(table, setting)
    }

    pub fn from_table(table: FragTable, setting: &Setting) -> Result<FragmentationReport> {
        let layout = FragLayout::build(&table)?;
        Ok(FragmentationReport {
            setting: setting.clone(),
            table: table,
            layout: layout,
        })
    }

    pub fn layout(&self) -> &FragLayout {
        &self.layout
    }

    /// Writes both files and returns their paths.
    pub fn render(&self) -> Result<Vec<PathBuf>> {
        let size = (
            self.setting.fragmentation_width,
            self.setting.fragmentation_height,
        );
        let mut written = Vec::new();
        for name in &[FRAGMENTATION_PNG, FRAGMENTATION_SVG] {
            let path = self.setting.output_path(name)?;
            chart::render(&self.layout, &path, size)?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn summary(&self) -> FragSummary {
        self.table.summary()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    const LOGGING_RESULTS: &str = r#"{ "results": [
      { "mean": 3.0, "stddev": 0.1, "times": [3.0, 3.0], "parameters": { "bench": "xalan", "ppparams": "" } },
      { "mean": 1.0, "stddev": 0.1, "times": [1.0, 1.0], "parameters": { "bench": "lusearch", "ppparams": "" } },
      { "mean": 1.4, "stddev": 0.2, "times": [1.4], "parameters": { "bench": "lusearch", "ppparams": "-Xlog:async -Xlog:gc+heap+region=trace:file=/tmp/gc.log" } },
      { "mean": 1.9, "stddev": null, "times": [1.8, 2.0], "parameters": { "bench": "lusearch", "ppparams": "-Xlog:gc+heap+region=trace:file=/tmp/gc.log" } }
    ] }"#;

    const REGION_RESULTS: &str = r#"{ "results": [
      { "mean": 2.0, "stddev": 0.1, "fragm_2": 3.0, "parameters": { "benchmark": "eclipse", "ppparams": "1M" } },
      { "mean": 2.2, "stddev": 0.2, "fragm_2": 5.0, "parameters": { "benchmark": "eclipse", "ppparams": "8M" } },
      { "mean": 1.1, "stddev": 0.1, "parameters": { "benchmark": "h2", "ppparams": "16M" } },
      { "mean": 1.3, "stddev": 0.1, "parameters": { "benchmark": "h2", "ppparams": "" } }
    ] }"#;

    fn results(json: &str) -> BenchmarkResults {
        BenchmarkResults::from_reader(json.as_bytes()).unwrap()
    }

    fn setting_in(dir: &TempDir) -> Setting {
        let mut setting = Setting::default();
        setting.output_dir = dir.path().join("figures");
        setting
    }

    fn assert_written(path: &Path) {
        let len = fs::metadata(path).unwrap().len();
        assert!(len > 0, "{} is empty", path.display());
    }

    // Writes stale bytes over every file, renders again and checks they are gone.
    fn assert_rerender_replaces(paths: &[PathBuf], render: &dyn Fn()) {
        for path in paths {
            fs::write(path, b"stale").unwrap();
        }
        render();
        for path in paths {
            assert_written(path);
            assert_ne!(fs::read(path).unwrap(), b"stale".to_vec());
        }
    }

    fn render_preset(json: &str, preset: BenchmarkPreset) {
        let dir = TempDir::new().unwrap();
        let mut setting = setting_in(&dir);
        setting.width = 640;
        setting.height = 360;
        setting.focus_width = 480;
        setting.focus_height = 360;

        let report = BenchmarkReport::from_results(&results(json), preset.clone(), &setting).unwrap();
        let rendered = report.render().unwrap();
        assert_eq!(rendered.main, setting.output_dir.join(preset.main_file));
        assert_eq!(
            rendered.focused,
            Some(setting.output_dir.join(preset.focus_file))
        );

        let paths = report.summary().files;
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_written(path);
        }
        assert_rerender_replaces(&paths, &|| {
            report.render().unwrap();
        });
    }

    #[test]
    fn logging_report() {
        let setting = Setting::default();
        let report =
            BenchmarkReport::from_results(&results(LOGGING_RESULTS), BenchmarkPreset::logging(), &setting)
                .unwrap();

        assert_eq!(report.table().names(), vec!["lusearch", "xalan"]);
        assert_eq!(report.focus(), Some("lusearch"));
        assert_eq!(report.main_layout().style.palette, Palette::Cool);
        assert_eq!(report.main_layout().bars.len(), 4);
        assert_eq!(
            report.main_layout().stats.as_ref().map(|s| s.as_str()),
            Some("Benchmarks: 2 | Configurations: 3")
        );

        let focused = report.focused_layout().unwrap();
        assert_eq!(focused.bars.len(), 3);
        assert_eq!(
            focused.style.title.as_ref().map(|s| s.as_str()),
            Some("Lusearch Benchmark: JVM Logging Parameter Impact")
        );

        let summary = report.summary();
        assert_eq!(summary.benchmarks, 2);
        assert_eq!(summary.configurations, 3);
        assert_eq!(summary.total_runs, 7);
        assert_eq!(
            summary.files,
            vec![
                PathBuf::from("./dacapo_benchmark_results_logs.png"),
                PathBuf::from("./lusearch_benchmark_comparison.png"),
            ]
        );
    }

    #[test]
    fn focus_benchmark_missing() {
        let json = r#"{ "results": [ { "mean": 1.0, "stddev": 0.1, "parameters": { "benchmark": "h2", "ppparams": "1M" } } ] }"#;
        let report =
            BenchmarkReport::from_results(&results(json), BenchmarkPreset::region_size(), &Setting::default())
                .unwrap();
        assert!(report.focused_layout().is_none());
        assert_eq!(report.summary().files.len(), 1);
    }

    #[test]
    fn setting_overrides_focus() {
        let mut setting = Setting::default();
        setting.focus = Some("xalan".to_string());
        let report =
            BenchmarkReport::from_results(&results(LOGGING_RESULTS), BenchmarkPreset::logging(), &setting)
                .unwrap();
        assert_eq!(report.focus(), Some("xalan"));
    }

    #[test]
    fn region_size_keeps_insertion_order() {
        let json = r#"{ "results": [
          { "mean": 1.0, "stddev": 0.1, "fragm_2": 3.0, "parameters": { "benchmark": "xalan", "ppparams": "1M" } },
          { "mean": 1.0, "stddev": 0.1, "fragm_2": 4.0, "parameters": { "benchmark": "xalan", "ppparams": "8M" } },
          { "mean": 1.0, "stddev": 0.1, "parameters": { "benchmark": "eclipse", "ppparams": "1M" } }
        ] }"#;
        let report =
            BenchmarkReport::from_results(&results(json), BenchmarkPreset::region_size(), &Setting::default())
                .unwrap();
        assert_eq!(report.table().names(), vec!["xalan", "eclipse"]);
        assert_eq!(report.main_layout().overlay.len(), 1);
        assert_eq!(report.focus(), Some("eclipse"));
    }

    #[test]
    fn publication_writes_svg() {
        let preset = BenchmarkPreset::publication();
        assert_eq!(preset.main_style.palette, Palette::Grayscale);
        assert_eq!(
            chart::Format::from_path(Path::new(preset.main_file)),
            chart::Format::Svg
        );
        assert_eq!(
            chart::Format::from_path(Path::new(preset.focus_file)),
            chart::Format::Svg
        );
    }

    #[test]
    fn missing_results_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("none.json");
        assert!(BenchmarkReport::prepare(&missing, BenchmarkPreset::logging(), &Setting::default()).is_err());
    }

    #[test]
    fn fragmentation_report_from_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("frag.csv");
        let mut f = File::create(&input).unwrap();
        writeln!(f, "GC#, ext frag before GC, ext frag after GC, is full GC").unwrap();
        writeln!(f, "0, 40, 10, 0").unwrap();
        writeln!(f, "1, 60, 30, 1").unwrap();
        drop(f);

        let report = FragmentationReport::prepare(&input, &Setting::default()).unwrap();
        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.full_gc, 1);
        assert_eq!(report.layout().first_full_gc, Some(1.0));
    }

    #[test]
    fn fragmentation_report_needs_events() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("frag.csv");
        File::create(&input)
            .unwrap()
            .write_all(b"GC#, a, b, c\nx, y, z, w\n")
            .unwrap();
        assert!(FragmentationReport::prepare(&input, &Setting::default()).is_err());
    }

    #[test]
    fn render_logging_preset() {
        render_preset(LOGGING_RESULTS, BenchmarkPreset::logging());
    }

    #[test]
    fn render_region_size_preset() {
        render_preset(REGION_RESULTS, BenchmarkPreset::region_size());
    }

    #[test]
    fn render_publication_preset() {
        render_preset(LOGGING_RESULTS, BenchmarkPreset::publication());
        let dir = TempDir::new().unwrap();
        let setting = setting_in(&dir);
        let report =
            BenchmarkReport::from_results(&results(LOGGING_RESULTS), BenchmarkPreset::publication(), &setting)
                .unwrap();
        let rendered = report.render().unwrap();
        let svg = fs::read_to_string(&rendered.main).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn render_without_focus_writes_main_only() {
        let json = r#"{ "results": [ { "mean": 1.0, "stddev": 0.1, "parameters": { "benchmark": "h2", "ppparams": "1M" } } ] }"#;
        let dir = TempDir::new().unwrap();
        let setting = setting_in(&dir);
        let report =
            BenchmarkReport::from_results(&results(json), BenchmarkPreset::region_size(), &setting).unwrap();
        let rendered = report.render().unwrap();
        assert_written(&rendered.main);
        assert!(rendered.focused.is_none());
        assert!(!setting.output_dir.join("benchmark_comparison.png").exists());
    }

    #[test]
    fn render_fragmentation_report() {
        let dir = TempDir::new().unwrap();
        let mut setting = setting_in(&dir);
        setting.fragmentation_width = 640;
        setting.fragmentation_height = 320;

        let table = FragTable::from_reader(
            "GC#, ext frag before GC, ext frag after GC, is full GC\n\
             0, 40, 10, 0\n\
             1, 55, 20, 0\n\
             2, 60, 5, 1\n"
                .as_bytes(),
        )
        .unwrap();
        let report = FragmentationReport::from_table(table, &setting).unwrap();
        let written = report.render().unwrap();
        assert_eq!(
            written,
            vec![
                setting.output_dir.join(FRAGMENTATION_PNG),
                setting.output_dir.join(FRAGMENTATION_SVG),
            ]
        );
        for path in &written {
            assert_written(path);
        }
        assert_rerender_replaces(&written, &|| {
            report.render().unwrap();
        });
    }

    #[test]
    fn capitalize_names() {
        assert_eq!(capitalize("eclipse"), "Eclipse");
        assert_eq!(capitalize(""), "");
    }
}
