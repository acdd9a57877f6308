//! Chart layouts and their rendering with `plotters`.
//!
//! A layout is plain data (bar rectangles, error extents, axis ranges); it is
//! computed from the aggregation table and only then handed to a drawing
//! backend. The backend is picked from the output file extension.

use crate::errors::*;
use crate::frag::FragTable;
use crate::table::Table;
use crate::utils;
use itertools::{Itertools, MinMaxResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::iter;
use std::path::Path;

const CORAL: RGBColor = RGBColor(255, 127, 80);
const STEELBLUE: RGBColor = RGBColor(70, 130, 180);
const LIGHTGREEN: RGBColor = RGBColor(144, 238, 144);
const WHEAT: RGBColor = RGBColor(245, 222, 179);
const GREY: RGBColor = RGBColor(128, 128, 128);

const LIGHT_GRAY: RGBColor = RGBColor(230, 230, 230);
const MID_GRAY: RGBColor = RGBColor(153, 153, 153);
const DARK_GRAY: RGBColor = RGBColor(77, 77, 77);

const FRAG_BEFORE: RGBColor = RGBColor(0xE7, 0x4C, 0x3C);
const FRAG_AFTER: RGBColor = RGBColor(0x34, 0x98, 0xDB);
const FULL_GC: RGBColor = RGBColor(0x2E, 0xCC, 0x71);

const VIVID_MAIN: [RGBColor; 4] = [CORAL, STEELBLUE, LIGHTGREEN, WHEAT];
const COOL: [RGBColor; 3] = [STEELBLUE, LIGHTGREEN, CORAL];
const GRAYS: [RGBColor; 3] = [LIGHT_GRAY, MID_GRAY, DARK_GRAY];

/// Share of a group's width covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

const FONT: &str = "sans-serif";

/// Output file format.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Format {
    Png,
    Svg,
}

impl Format {
    /// `.svg` gives vector output, anything else a bitmap.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Format::Svg,
            _ => Format::Png,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Palette {
    /// Coral first; wheat for a fourth series.
    Vivid,

    /// Steelblue first.
    Cool,

    Grayscale,
}

impl Palette {
    /// Series colors of the grouped chart.
    pub fn main_colors(&self) -> &'static [RGBColor] {
        match *self {
            Palette::Vivid => &VIVID_MAIN,
            Palette::Cool => &COOL,
            Palette::Grayscale => &GRAYS,
        }
    }

    /// Bar colors of the focused chart.
    pub fn focus_colors(&self) -> &'static [RGBColor] {
        match *self {
            Palette::Vivid | Palette::Cool => &COOL,
            Palette::Grayscale => &GRAYS,
        }
    }

    /// Text printed above a focused bar.
    pub fn value_label(&self, mean: f64) -> String {
        match *self {
            Palette::Vivid | Palette::Cool => format!("{:.3}s", mean),
            Palette::Grayscale => format!("{:.2}", mean),
        }
    }

    fn pick(colors: &[RGBColor], i: usize) -> RGBColor {
        colors[i % colors.len()]
    }
}

/// Text and colors shared by the benchmark charts.
#[derive(Debug, PartialEq, Clone)]
pub struct ChartStyle {
    pub title: Option<String>,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub palette: Palette,
    pub legend_left: bool,
}

impl ChartStyle {
    fn legend_position(&self) -> SeriesLabelPosition {
        if self.legend_left {
            SeriesLabelPosition::UpperLeft
        } else {
            SeriesLabelPosition::UpperRight
        }
    }
}

/// One bar of a bar chart, in data coordinates.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Bar {
    /// Index into the label set, which selects the color.
    pub series: usize,
    pub left: f64,
    pub right: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl Bar {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Top of the error bar.
    pub fn top(&self) -> f64 {
        self.mean + self.stddev
    }
}

/// Grouped bar chart: a group per benchmark, a bar per label.
#[derive(Debug, PartialEq, Clone)]
pub struct GroupedLayout {
    pub style: ChartStyle,
    pub labels: Vec<&'static str>,
    pub groups: Vec<String>,
    pub bars: Vec<Bar>,

    /// Fragmentation stems as (x, height).
    pub stems: Vec<(f64, f64)>,

    /// One polyline per benchmark through its stems.
    pub overlay: Vec<Vec<(f64, f64)>>,

    pub stats: Option<String>,
    pub y_max: f64,
}

impl GroupedLayout {
    pub fn build(
        table: &Table,
        style: ChartStyle,
        overlay: bool,
        stats_box: bool,
    ) -> Result<GroupedLayout> {
        if table.is_empty() {
            bail!(ErrorKind::EmptyInput("benchmark results".to_string()));
        }

        let labels = table.scheme().labels();
        let width = GROUP_WIDTH / labels.len() as f64;
        let mid = (labels.len() as f64 - 1.0) / 2.0;

        let mut bars = Vec::new();
        let mut stems = Vec::new();
        let mut lines = Vec::new();

        for (group, entry) in table.entries().iter().enumerate() {
            let mut line = Vec::new();
            for (series, label) in labels.iter().enumerate() {
                let stats = match entry.get(label) {
                    Some(s) => s,
                    None => continue,
                };
                let center = group as f64 + (series as f64 - mid) * width;
                bars.push(Bar {
                    series: series,
                    left: center - width / 2.0,
                    right: center + width / 2.0,
                    mean: stats.mean,
                    stddev: stats.stddev,
                });
                if overlay {
                    if let Some(frag) = stats.fragm_2 {
                        stems.push((center, frag));
                        line.push((center, frag));
                    }
                }
            }
            if line.len() > 1 {
                lines.push(line);
            }
        }

        let highest = utils::max(
            bars.iter()
                .map(|b| b.top())
                .chain(stems.iter().map(|s| s.1)),
        )
        .unwrap_or(0.0);

        let stats = if stats_box {
            Some(format!(
                "Benchmarks: {} | Configurations: {}",
                table.len(),
                table.label_count()
            ))
        } else {
            None
        };

        Ok(GroupedLayout {
            style: style,
            labels: labels.to_vec(),
            groups: table.names().iter().map(|s| s.to_string()).collect(),
            bars: bars,
            stems: stems,
            overlay: lines,
            stats: stats,
            y_max: y_limit(highest),
        })
    }
}

/// Bar chart of one benchmark across its labels.
#[derive(Debug, PartialEq, Clone)]
pub struct FocusedLayout {
    pub style: ChartStyle,
    pub benchmark: String,
    pub labels: Vec<&'static str>,
    pub bars: Vec<Bar>,
    pub values: Vec<String>,
    pub y_max: f64,
}

impl FocusedLayout {
    /// `None` when `benchmark` is not in the table.
    pub fn build(table: &Table, benchmark: &str, style: ChartStyle) -> Option<FocusedLayout> {
        let entry = table.get(benchmark)?;

        let present = table
            .scheme()
            .labels()
            .iter()
            .filter_map(|label| entry.get(label).map(|s| (*label, s)))
            .collect::<Vec<_>>();

        let bars = present
            .iter()
            .enumerate()
            .map(|(i, &(_, stats))| Bar {
                series: i,
                left: i as f64 - GROUP_WIDTH / 2.0,
                right: i as f64 + GROUP_WIDTH / 2.0,
                mean: stats.mean,
                stddev: stats.stddev,
            })
            .collect::<Vec<_>>();

        let values = bars
            .iter()
            .map(|b| style.palette.value_label(b.mean))
            .collect();
        let highest = utils::max(bars.iter().map(|b| b.top())).unwrap_or(0.0);

        Some(FocusedLayout {
            style: style,
            benchmark: benchmark.to_string(),
            labels: present.iter().map(|p| p.0).collect(),
            bars: bars,
            values: values,
            y_max: y_limit(highest),
        })
    }
}

/// Fragmentation before and after each GC.
#[derive(Debug, PartialEq, Clone)]
pub struct FragLayout {
    pub before: Vec<(f64, f64)>,
    pub after: Vec<(f64, f64)>,

    /// Shaded x intervals, one per full GC.
    pub full_gc_spans: Vec<(f64, f64)>,
    pub first_full_gc: Option<f64>,

    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl FragLayout {
    pub fn build(table: &FragTable) -> Result<FragLayout> {
        let (x_min, x_max) = match table.events.iter().map(|e| e.gc_count).minmax() {
            MinMaxResult::NoElements => {
                bail!(ErrorKind::EmptyInput("fragmentation table".to_string()))
            }
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let y_max = utils::max(
            table
                .events
                .iter()
                .flat_map(|e| iter::once(e.frag_before).chain(iter::once(e.frag_after))),
        )
        .unwrap_or(0.0);

        let full_gcs = table.full_gc_events().map(|e| e.gc_count).collect::<Vec<_>>();

        Ok(FragLayout {
            before: table
                .events
                .iter()
                .map(|e| (e.gc_count, e.frag_before))
                .collect(),
            after: table
                .events
                .iter()
                .map(|e| (e.gc_count, e.frag_after))
                .collect(),
            full_gc_spans: full_gcs.iter().map(|&x| (x - 0.5, x + 0.5)).collect(),
            first_full_gc: full_gcs.first().cloned(),
            x_range: (x_min - 2.0, x_max + 2.0),
            y_range: (-2.0, y_max + 5.0),
        })
    }
}

/// Headroom above the highest drawn value.
fn y_limit(highest: f64) -> f64 {
    if highest > 0.0 {
        highest * 1.1
    } else {
        1.0
    }
}

/// Something that draws itself onto a drawing area.
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Draws `figure` into `path`, replacing any existing file.
pub fn render<F: Figure>(figure: &F, path: &Path, size: (u32, u32)) -> Result<()> {
    match Format::from_path(path) {
        Format::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(render_err)?;
        }
        Format::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(render_err)?;
        }
    }
    info!("wrote {}", path.display());
    Ok(())
}

/// Category names centred under their x positions.
fn draw_x_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    anchors: Vec<(i32, i32)>,
    names: &[&str],
) -> Result<()> {
    let style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (&(x, y), name) in anchors.iter().zip(names) {
        root.draw(&Text::new(*name, (x, y + 8), style.clone()))
            .map_err(render_err)?;
    }
    Ok(())
}

impl Figure for GroupedLayout {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20).x_label_area_size(50).y_label_area_size(70);
        if let Some(ref title) = self.style.title {
            builder.caption(title, (FONT, 26).into_font());
        }
        let n = self.groups.len() as f64;
        let mut chart = builder
            .build_cartesian_2d(-0.5..n - 0.5, 0.0..self.y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(WHITE)
            .x_labels(0)
            .x_desc(self.style.x_desc)
            .y_desc(self.style.y_desc)
            .axis_desc_style((FONT, 18))
            .draw()
            .map_err(render_err)?;

        let colors = self.style.palette.main_colors();
        for (series, label) in self.labels.iter().enumerate() {
            let color = Palette::pick(colors, series);
            chart
                .draw_series(
                    self.bars
                        .iter()
                        .filter(|b| b.series == series)
                        .map(|b| Rectangle::new([(b.left, 0.0), (b.right, b.mean)], color.mix(0.8).filled())),
                )
                .map_err(render_err)?
                .label(*label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.mix(0.8).filled()));
        }

        chart
            .draw_series(
                self.bars
                    .iter()
                    .map(|b| Rectangle::new([(b.left, 0.0), (b.right, b.mean)], BLACK.stroke_width(1))),
            )
            .map_err(render_err)?;
        chart
            .draw_series(self.bars.iter().map(|b| {
                ErrorBar::new_vertical(b.center(), b.mean - b.stddev, b.mean, b.top(), BLACK.filled(), 6)
            }))
            .map_err(render_err)?;

        if !self.stems.is_empty() {
            chart
                .draw_series(
                    self.stems
                        .iter()
                        .map(|&(x, h)| PathElement::new(vec![(x, 0.0), (x, h)], BLUE.mix(0.6).stroke_width(1))),
                )
                .map_err(render_err)?;
            chart
                .draw_series(self.stems.iter().map(|&(x, h)| Cross::new((x, h), 4, BLUE.filled())))
                .map_err(render_err)?;
        }

        for (i, line) in self.overlay.iter().enumerate() {
            let anno = chart
                .draw_series(iter::once(PathElement::new(line.clone(), GREY.stroke_width(1))))
                .map_err(render_err)?;
            if i == 0 {
                anno.label("Ext. fragmentation")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 14, y)], GREY.stroke_width(1)));
            }
        }

        chart
            .configure_series_labels()
            .position(self.style.legend_position())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()
            .map_err(render_err)?;

        let anchors = (0..self.groups.len())
            .map(|i| chart.plotting_area().map_coordinate(&(i as f64, 0.0)))
            .collect();
        let names = self.groups.iter().map(|s| s.as_str()).collect::<Vec<_>>();
        draw_x_labels(root, anchors, &names)?;

        if let Some(ref text) = self.stats {
            let (xs, ys) = chart.plotting_area().get_pixel_range();
            let style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Top));
            let (w, h) = root.estimate_text_size(text, &style).map_err(render_err)?;
            let (x, y) = (xs.end - 16, ys.start + 16);
            root.draw(&Rectangle::new(
                [(x - w as i32 - 8, y - 6), (x + 8, y + h as i32 + 6)],
                WHEAT.mix(0.5).filled(),
            ))
            .map_err(render_err)?;
            root.draw(&Text::new(text.as_str(), (x, y), style))
                .map_err(render_err)?;
        }

        Ok(())
    }
}

impl Figure for FocusedLayout {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20).x_label_area_size(50).y_label_area_size(70);
        if let Some(ref title) = self.style.title {
            builder.caption(title, (FONT, 22).into_font());
        }
        let n = self.bars.len().max(1) as f64;
        let mut chart = builder
            .build_cartesian_2d(-0.5..n - 0.5, 0.0..self.y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(WHITE)
            .x_labels(0)
            .x_desc(self.style.x_desc)
            .y_desc(self.style.y_desc)
            .axis_desc_style((FONT, 18))
            .draw()
            .map_err(render_err)?;

        let colors = self.style.palette.focus_colors();
        chart
            .draw_series(self.bars.iter().map(|b| {
                let color = Palette::pick(colors, b.series);
                Rectangle::new([(b.left, 0.0), (b.right, b.mean)], color.mix(0.7).filled())
            }))
            .map_err(render_err)?;
        chart
            .draw_series(
                self.bars
                    .iter()
                    .map(|b| Rectangle::new([(b.left, 0.0), (b.right, b.mean)], BLACK.stroke_width(1))),
            )
            .map_err(render_err)?;
        chart
            .draw_series(self.bars.iter().map(|b| {
                ErrorBar::new_vertical(b.center(), b.mean - b.stddev, b.mean, b.top(), BLACK.filled(), 10)
            }))
            .map_err(render_err)?;

        let value_style = TextStyle::from((FONT, 15).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        for (bar, value) in self.bars.iter().zip(&self.values) {
            chart
                .plotting_area()
                .draw(&Text::new(value.as_str(), (bar.center(), bar.top()), value_style.clone()))
                .map_err(render_err)?;
        }

        let anchors = self
            .bars
            .iter()
            .map(|b| chart.plotting_area().map_coordinate(&(b.center(), 0.0)))
            .collect();
        draw_x_labels(root, anchors, &self.labels)
    }
}

impl Figure for FragLayout {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(render_err)?;

        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let mut chart = ChartBuilder::on(root)
            .caption(
                "Memory Fragmentation Before and After Garbage Collection",
                (FONT, 22).into_font(),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("GC Event Count")
            .y_desc("External Fragmentation")
            .axis_desc_style((FONT, 16))
            .light_line_style(WHITE)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                self.full_gc_spans
                    .iter()
                    .map(|&(a, b)| Rectangle::new([(a, y0), (b, y1)], FULL_GC.mix(0.15).filled())),
            )
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(self.before.iter().cloned(), FRAG_BEFORE.mix(0.8).stroke_width(2)))
            .map_err(render_err)?
            .label("Fragmentation before GC")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FRAG_BEFORE.stroke_width(2)));
        chart
            .draw_series(self.before.iter().map(|&p| Circle::new(p, 3, FRAG_BEFORE.filled())))
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(self.after.iter().cloned(), FRAG_AFTER.mix(0.8).stroke_width(2)))
            .map_err(render_err)?
            .label("Fragmentation after GC")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FRAG_AFTER.stroke_width(2)));
        chart
            .draw_series(
                self.after
                    .iter()
                    .map(|&p| EmptyElement::at(p) + Rectangle::new([(-3, -3), (3, 3)], FRAG_AFTER.filled())),
            )
            .map_err(render_err)?;

        if let Some(x) = self.first_full_gc {
            chart
                .draw_series(iter::once(PathElement::new(
                    vec![(x, y0), (x, y1)],
                    FULL_GC.mix(0.7).stroke_width(2),
                )))
                .map_err(render_err)?
                .label("Full GC")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FULL_GC.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        Ok(())
    }
}
