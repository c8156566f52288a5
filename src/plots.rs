//! PNG figures for the EDA, comparison and opinion reports.
//!
//! Everything is drawn with the plotters bitmap backend. Text needs a TrueType
//! font registered at runtime; without one the figures are drawn bare (no
//! captions, axis labels or legends).

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::comparison::{ComparisonStats, ConfusionMatrix};
use crate::eda::{EdaStats, TOP_DOMAIN_ASPECTS};
use crate::models::{OpinionSummaryRow, Sentiment};
use crate::opinion_summary::{self, SummaryMethod};

const FONT_FAMILY: &str = "sans-serif";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

const TOP_ASPECTS: usize = 10;
const RADAR_ASPECTS: usize = 6;
const LENGTH_BINS: usize = 30;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

fn sentiment_color(label: Sentiment) -> RGBColor {
    match label {
        Sentiment::Positive => RGBColor(44, 160, 44),
        Sentiment::Neutral => RGBColor(150, 150, 150),
        Sentiment::Negative => RGBColor(214, 39, 40),
    }
}

/// Registers the figure font once per process. `custom` is tried before the
/// system locations. Returns whether text can be drawn.
pub fn init_font(custom: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = custom
            .map(Path::to_path_buf)
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(|p| PathBuf::from(*p)));
        for path in candidates {
            let Ok(bytes) = fs::read(&path) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
                Ok(()) => {
                    info!("Figure font loaded from {:?}", path);
                    return true;
                }
                Err(_) => warn!("Font file {:?} could not be parsed", path),
            }
        }
        warn!("No usable font found, figures are drawn without text");
        false
    })
}

fn draw_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("Failed to draw figure: {}", e)
}

fn canvas(path: &Path, size: (u32, u32)) -> Result<DrawingArea<BitMapBackend<'_>, Shift>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    Ok(root)
}

fn value_label(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

// Category name for an axis position; only whole positions are labelled.
fn category_at(categories: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarLayout {
    Grouped,
    Stacked,
}

/// Bar chart over named categories, one value per category in every series.
struct BarFigure<'a> {
    title: &'a str,
    category_desc: &'a str,
    value_desc: &'a str,
    categories: Vec<String>,
    series: Vec<(String, Vec<f64>, RGBColor)>,
    layout: BarLayout,
    horizontal: bool,
}

impl<'a> BarFigure<'a> {
    fn single(title: &'a str, category_desc: &'a str, value_desc: &'a str, rows: Vec<(String, f64)>, color: RGBColor) -> Self {
        let (categories, values): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();
        BarFigure {
            title,
            category_desc,
            value_desc,
            categories,
            series: vec![(value_desc.to_string(), values, color)],
            layout: BarLayout::Grouped,
            horizontal: false,
        }
    }

    fn max_value(&self) -> f64 {
        let max = match self.layout {
            BarLayout::Grouped => self
                .series
                .iter()
                .flat_map(|(_, values, _)| values.iter().copied())
                .fold(0.0, f64::max),
            BarLayout::Stacked => (0..self.categories.len())
                .map(|c| self.series.iter().map(|(_, values, _)| values[c]).sum::<f64>())
                .fold(0.0, f64::max),
        };
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn draw(&self, path: &Path, size: (u32, u32)) -> Result<bool> {
        let n = self.categories.len();
        if n == 0 {
            info!("No data for figure '{}', skipping.", self.title);
            return Ok(false);
        }
        let labelled = init_font(None);
        let root = canvas(path, size)?;

        let category_range = -0.5..(n as f64 - 0.5);
        let value_range = 0.0..self.max_value();
        let (x_range, y_range) = if self.horizontal {
            (value_range, category_range)
        } else {
            (category_range, value_range)
        };

        let mut builder = ChartBuilder::on(&root);
        builder.margin(15);
        if labelled {
            builder.caption(self.title, (FONT_FAMILY, 24));
            if self.horizontal {
                builder.x_label_area_size(45).y_label_area_size(170);
            } else {
                builder.x_label_area_size(50).y_label_area_size(65);
            }
        }
        let mut chart = builder.build_cartesian_2d(x_range, y_range).map_err(draw_err)?;

        // Horizontal charts list the first category at the top.
        let horizontal = self.horizontal;
        let position = |c: usize| if horizontal { (n - 1 - c) as f64 } else { c as f64 };
        let ordered: Vec<String> = if horizontal {
            self.categories.iter().rev().cloned().collect()
        } else {
            self.categories.clone()
        };

        if labelled {
            let category_fmt = |v: &f64| category_at(&ordered, *v);
            let value_fmt = |v: &f64| value_label(*v);
            let mut mesh = chart.configure_mesh();
            if horizontal {
                mesh.disable_y_mesh()
                    .y_labels(n)
                    .y_label_formatter(&category_fmt)
                    .x_label_formatter(&value_fmt)
                    .x_desc(self.value_desc)
                    .y_desc(self.category_desc);
            } else {
                mesh.disable_x_mesh()
                    .x_labels(n)
                    .x_label_formatter(&category_fmt)
                    .y_label_formatter(&value_fmt)
                    .x_desc(self.category_desc)
                    .y_desc(self.value_desc);
            }
            mesh.draw().map_err(draw_err)?;
        }

        let groups = self.series.len().max(1) as f64;
        let mut stacked_base = vec![0.0; n];
        for (s, (name, values, color)) in self.series.iter().enumerate() {
            let color = *color;
            let rects: Vec<Rectangle<(f64, f64)>> = values
                .iter()
                .enumerate()
                .map(|(c, &v)| {
                    let (lo, hi, from, to) = match self.layout {
                        BarLayout::Grouped => {
                            let width = 0.8 / groups;
                            let lo = position(c) - 0.4 + s as f64 * width;
                            (lo, lo + width, 0.0, v)
                        }
                        BarLayout::Stacked => {
                            let from = stacked_base[c];
                            stacked_base[c] += v;
                            (position(c) - 0.4, position(c) + 0.4, from, from + v)
                        }
                    };
                    let corners = if horizontal {
                        [(from, lo), (to, hi)]
                    } else {
                        [(lo, from), (hi, to)]
                    };
                    Rectangle::new(corners, color.filled())
                })
                .collect();
            let drawn = chart.draw_series(rects).map_err(draw_err)?;
            if labelled && self.series.len() > 1 {
                drawn
                    .label(name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
        }

        if labelled && self.series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(true)
    }
}

/// Annotated count grid; `counts[row][col]`, first row drawn at the top.
fn draw_heatmap(
    path: &Path,
    title: &str,
    (x_desc, y_desc): (&str, &str),
    columns: &[String],
    rows: &[String],
    counts: &[Vec<u64>],
) -> Result<()> {
    let labelled = init_font(None);
    let root = canvas(path, (600, 500))?;
    let (n_cols, n_rows) = (columns.len(), rows.len());

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if labelled {
        builder.caption(title, (FONT_FAMILY, 22)).x_label_area_size(50).y_label_area_size(90);
    }
    let mut chart = builder
        .build_cartesian_2d(-0.5..(n_cols as f64 - 0.5), -0.5..(n_rows as f64 - 0.5))
        .map_err(draw_err)?;

    let reversed_rows: Vec<String> = rows.iter().rev().cloned().collect();
    if labelled {
        let x_fmt = |v: &f64| category_at(columns, *v);
        let y_fmt = |v: &f64| category_at(&reversed_rows, *v);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n_cols)
            .y_labels(n_rows)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .map_err(draw_err)?;
    }

    let max = counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let shade = |v: u64| {
        let t = v as f64 / max;
        let mix = |light: f64, dark: f64| (light + (dark - light) * t).round() as u8;
        RGBColor(mix(247.0, 8.0), mix(251.0, 48.0), mix(255.0, 107.0))
    };

    let mut cells = Vec::new();
    let mut annotations = Vec::new();
    for (r, row) in counts.iter().enumerate() {
        let y = (n_rows - 1 - r) as f64;
        for (c, &v) in row.iter().enumerate() {
            let x = c as f64;
            cells.push(Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], shade(v).filled()));
            let text_color = if v as f64 > max * 0.5 { WHITE } else { BLACK };
            annotations.push(Text::new(
                v.to_string(),
                (x, y),
                (FONT_FAMILY, 22)
                    .into_font()
                    .color(&text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ));
        }
    }
    chart.draw_series(cells).map_err(draw_err)?;
    if labelled {
        chart.draw_series(annotations).map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Radar over `axes`; each series holds one value in 0..=1 per axis.
fn draw_radar(path: &Path, title: &str, axes: &[&str], series: &[(String, Vec<f64>)]) -> Result<()> {
    let labelled = init_font(None);
    let root = canvas(path, (650, 650))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if labelled {
        builder.caption(title, (FONT_FAMILY, 20));
    }
    let mut chart = builder.build_cartesian_2d(-1.3..1.3, -1.3..1.3).map_err(draw_err)?;

    let m = axes.len();
    let angle = |k: usize| PI / 2.0 - 2.0 * PI * k as f64 / m as f64;
    let point = |k: usize, r: f64| (r * angle(k).cos(), r * angle(k).sin());

    let grid = RGBColor(200, 200, 200);
    let rings = [0.25, 0.5, 0.75, 1.0].map(|r| PathElement::new((0..=m).map(|k| point(k % m, r)).collect::<Vec<_>>(), grid.stroke_width(1)));
    chart.draw_series(rings).map_err(draw_err)?;
    chart
        .draw_series((0..m).map(|k| PathElement::new(vec![(0.0, 0.0), point(k, 1.0)], grid.stroke_width(1))))
        .map_err(draw_err)?;

    if labelled {
        let style = (FONT_FAMILY, 16).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(axes.iter().enumerate().map(|(k, name)| Text::new(name.to_string(), point(k, 1.15), style.clone())))
            .map_err(draw_err)?;
    }

    for (i, (name, values)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let outline: Vec<(f64, f64)> = (0..=m).map(|k| point(k % m, values[k % m])).collect();
        let drawn = chart
            .draw_series(std::iter::once(PathElement::new(outline, color.stroke_width(2))))
            .map_err(draw_err)?;
        if labelled {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color.stroke_width(2)));
        }
    }

    if labelled && !series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Pie with percentage labels; slices with a zero value are left out.
fn draw_pie(path: &Path, title: &str, slices: &[(String, f64, RGBColor)]) -> Result<bool> {
    let total: f64 = slices.iter().map(|(_, v, _)| *v).sum();
    if total <= 0.0 {
        info!("No data for figure '{}', skipping.", title);
        return Ok(false);
    }
    let labelled = init_font(None);
    let root = canvas(path, (600, 600))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if labelled {
        builder.caption(title, (FONT_FAMILY, 20));
    }
    let mut chart = builder.build_cartesian_2d(-1.2..1.2, -1.2..1.2).map_err(draw_err)?;

    let mut start = PI / 2.0;
    for (label, value, color) in slices.iter().filter(|(_, v, _)| *v > 0.0) {
        let sweep = 2.0 * PI * value / total;
        let steps = ((sweep / (2.0 * PI)) * 180.0).ceil().max(2.0) as usize;
        let mut outline = vec![(0.0, 0.0)];
        outline.extend((0..=steps).map(|i| {
            let a = start - sweep * i as f64 / steps as f64;
            (a.cos(), a.sin())
        }));
        chart
            .draw_series(std::iter::once(Polygon::new(outline, color.filled())))
            .map_err(draw_err)?;

        if labelled {
            let middle = start - sweep / 2.0;
            let text = format!("{} {:.1}%", label, 100.0 * value / total);
            let style = (FONT_FAMILY, 16).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center));
            chart
                .draw_series(std::iter::once(Text::new(text, (0.65 * middle.cos(), 0.65 * middle.sin()), style)))
                .map_err(draw_err)?;
        }
        start -= sweep;
    }

    root.present().map_err(draw_err)?;
    Ok(true)
}

/// Groups (length, rows) pairs into at most `max_bins` equal-width bins.
fn length_bins(lengths: &[(usize, u64)], max_bins: usize) -> Vec<(String, f64)> {
    let (Some(&(min, _)), Some(&(max, _))) = (lengths.first(), lengths.last()) else {
        return Vec::new();
    };
    let span = max - min + 1;
    let width = span.div_ceil(max_bins.max(1));
    let mut counts = vec![0u64; span.div_ceil(width)];
    for &(len, n) in lengths {
        counts[(len - min) / width] += n;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(b, n)| {
            let lo = min + b * width;
            let label = if width == 1 { lo.to_string() } else { format!("{}-{}", lo, lo + width - 1) };
            (label, n as f64)
        })
        .collect()
}

fn sentiment_series<F>(categories: usize, count: F) -> Vec<(String, Vec<f64>, RGBColor)>
where
    F: Fn(Sentiment, usize) -> f64,
{
    Sentiment::ALL
        .iter()
        .map(|&label| {
            let values = (0..categories).map(|c| count(label, c)).collect();
            (label.as_str().to_string(), values, sentiment_color(label))
        })
        .collect()
}

fn keep(written: bool, path: PathBuf, out: &mut Vec<PathBuf>) {
    if written {
        out.push(path);
    }
}

/// Writes the exploratory figures into `dir` and returns the files written.
pub fn write_eda_figures(dir: &Path, stats: &EdaStats) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let path = dir.join("sentiment_distribution.png");
    let rows: Vec<(String, f64)> = Sentiment::ALL
        .iter()
        .map(|s| (s.to_string(), stats.sentiment_count(*s) as f64))
        .filter(|(_, n)| *n > 0.0)
        .collect();
    let ok = BarFigure::single("Sentiment Distribution", "Sentiment", "Count", rows, PALETTE[0]).draw(&path, (900, 600))?;
    keep(ok, path, &mut written);

    let path = dir.join("sentiment_strength.png");
    let strengths = &stats.strength_counts;
    let figure = BarFigure {
        title: "Sentiment Strength by Polarity",
        category_desc: "Strength (1-3)",
        value_desc: "Count",
        categories: strengths.iter().map(|(s, _)| s.to_string()).collect(),
        series: sentiment_series(strengths.len(), |label, c| strengths[c].1[label.index()] as f64),
        layout: BarLayout::Grouped,
        horizontal: false,
    };
    keep(figure.draw(&path, (900, 600))?, path, &mut written);

    let path = dir.join("sentence_length_distribution.png");
    let bins = length_bins(&stats.sentence_lengths, LENGTH_BINS);
    let ok = BarFigure::single("Sentence Length Distribution", "Number of Words", "Frequency", bins, PALETTE[0]).draw(&path, (1000, 600))?;
    keep(ok, path, &mut written);

    if let Some(tags) = &stats.top_pos_tags {
        let path = dir.join("pos_tag_distribution.png");
        let mut figure = BarFigure::single("Top 15 POS Tags", "POS Tag", "Frequency", counts_to_rows(tags), PALETTE[4]);
        figure.horizontal = true;
        keep(figure.draw(&path, (900, 600))?, path, &mut written);
    }

    if let Some(nps) = &stats.top_noun_phrases {
        let path = dir.join("noun_phrase_distribution.png");
        let mut figure = BarFigure::single("Top 15 Noun Phrases", "Noun Phrase", "Frequency", counts_to_rows(nps), PALETTE[9]);
        figure.horizontal = true;
        keep(figure.draw(&path, (1000, 650))?, path, &mut written);
    }

    if let Some(table) = stats.aspect_domain.as_ref().map(|t| t.top_aspects(TOP_DOMAIN_ASPECTS)) {
        let path = dir.join("aspect_per_domain_distribution.png");
        let figure = BarFigure {
            title: "Aspect Distribution per Domain",
            category_desc: "Domain",
            value_desc: "Count",
            categories: table.domains.clone(),
            series: table
                .aspects
                .iter()
                .enumerate()
                .map(|(a, aspect)| {
                    let values = table.counts[a].iter().map(|&n| n as f64).collect();
                    (aspect.clone(), values, PALETTE[a % PALETTE.len()])
                })
                .collect(),
            layout: BarLayout::Stacked,
            horizontal: true,
        };
        keep(figure.draw(&path, (1000, 650))?, path, &mut written);
    }

    info!("Wrote {} EDA figures to {:?}", written.len(), dir);
    Ok(written)
}

fn counts_to_rows(counts: &[(String, u64)]) -> Vec<(String, f64)> {
    counts.iter().map(|(name, n)| (name.clone(), *n as f64)).collect()
}

/// Confusion-matrix heatmap and agreement counts.
pub fn write_comparison_figures(dir: &Path, stats: &ComparisonStats, matrix: &ConfusionMatrix) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let labels: Vec<String> = Sentiment::ALL.iter().map(|s| s.to_string()).collect();

    let path = dir.join("confusion_matrix.png");
    let counts: Vec<Vec<u64>> = matrix.counts.iter().map(|row| row.to_vec()).collect();
    draw_heatmap(
        &path,
        "Confusion Matrix: Rule vs BERT",
        ("BERT Sentiment", "Rule-based Sentiment"),
        &labels,
        &labels,
        &counts,
    )?;
    written.push(path);

    let path = dir.join("agreement_distribution.png");
    let rows = vec![
        ("False".to_string(), (stats.total - stats.agreement) as f64),
        ("True".to_string(), stats.agreement as f64),
    ];
    let ok = BarFigure::single("Agreement Between Rule and BERT", "Agreement (True/False)", "Count", rows, PALETTE[0]).draw(&path, (600, 450))?;
    keep(ok, path, &mut written);

    info!("Wrote {} comparison figures to {:?}", written.len(), dir);
    Ok(written)
}

/// Rankings, composition, radar and overall pie for one mapping method.
pub fn write_opinion_figures(
    dir: &Path,
    method: SummaryMethod,
    summary: &[OpinionSummaryRow],
    overall: [u64; 3],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let suffix = format!("({}-based)", method.title());

    let rankings: [(&str, &str, &str, fn(&OpinionSummaryRow) -> f64, RGBColor); 3] = [
        ("top_positive_aspects.png", "Top 10 Positive Aspects", "Positive Ratio", |r| r.positive_ratio, sentiment_color(Sentiment::Positive)),
        ("top_negative_aspects.png", "Top 10 Negative Aspects", "Negative Ratio", |r| r.negative_ratio, sentiment_color(Sentiment::Negative)),
        ("top_mentioned_aspects.png", "Top 10 Most Mentioned Aspects", "Total Mentions", |r| r.total_mentions as f64, PALETTE[0]),
    ];
    for (file, title, metric, key, color) in rankings {
        let path = dir.join(file);
        let title = format!("{} {}", title, suffix);
        let (categories, values): (Vec<String>, Vec<f64>) = opinion_summary::top_by(summary, TOP_ASPECTS, key)
            .into_iter()
            .map(|r| (r.aspect.clone(), key(r)))
            .unzip();
        let figure = BarFigure {
            title: &title,
            category_desc: "Aspect",
            value_desc: metric,
            categories,
            series: vec![(metric.to_string(), values, color)],
            layout: BarLayout::Grouped,
            horizontal: true,
        };
        keep(figure.draw(&path, (900, 600))?, path, &mut written);
    }

    let top_mentioned = opinion_summary::top_by(summary, TOP_ASPECTS, |r| r.total_mentions as f64);
    let path = dir.join("aspect_sentiment_composition.png");
    let title = format!("Sentiment Composition for Top Aspects {}", suffix);
    let figure = BarFigure {
        title: &title,
        category_desc: "Aspect",
        value_desc: "Mentions",
        categories: top_mentioned.iter().map(|r| r.aspect.clone()).collect(),
        series: sentiment_series(top_mentioned.len(), |label, c| top_mentioned[c].count(label) as f64),
        layout: BarLayout::Stacked,
        horizontal: true,
    };
    keep(figure.draw(&path, (900, 600))?, path, &mut written);

    let radar_rows = opinion_summary::top_by(summary, RADAR_ASPECTS, |r| r.total_mentions as f64);
    if radar_rows.is_empty() {
        info!("No aspects to plot on the radar chart, skipping.");
    } else {
        let path = dir.join("aspect_sentiment_radar.png");
        let series: Vec<(String, Vec<f64>)> = radar_rows
            .iter()
            .map(|r| (r.aspect.clone(), Sentiment::ALL.iter().map(|s| r.ratio(*s)).collect()))
            .collect();
        draw_radar(
            &path,
            &format!("Sentiment Ratios Radar Chart {}", suffix),
            &["Positive", "Neutral", "Negative"],
            &series,
        )?;
        written.push(path);
    }

    let path = dir.join("overall_sentiment_pie.png");
    let slices: Vec<(String, f64, RGBColor)> = Sentiment::ALL
        .iter()
        .map(|&s| (s.to_string(), overall[s.index()] as f64, sentiment_color(s)))
        .collect();
    let ok = draw_pie(&path, &format!("Overall Sentiment Distribution {}", suffix), &slices)?;
    keep(ok, path, &mut written);

    info!("Wrote {} opinion figures to {:?}", written.len(), dir);
    Ok(written)
}
