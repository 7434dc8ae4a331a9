// Copyright 2020 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Renders grouped bar charts comparing one statistic across two runs. When
//! the runs are close together an inset repeats the bars over a restricted
//! y-range so small deltas stay visible.

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use log::info;

use crate::stats::StatsFile;

use std::error::Error;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

const RUN_A_COLOUR: RGBColor = hexcolour!(0x1FD082);
const RUN_B_COLOUR: RGBColor = hexcolour!(0xFC7634);

// 14x8 figure at print resolution
const FIGURE_SIZE: (u32, u32) = (2800, 1600);
const BAR_WIDTH: f64 = 0.35;

// differences below this fraction of the maximum trigger the zoomed inset
const ZOOM_THRESHOLD: f64 = 0.1;

/// One statistic aligned across the benchmarks common to two runs.
pub struct Comparison {
    pub benchmarks: Vec<String>,
    pub values_a: Vec<f64>,
    pub values_b: Vec<f64>,
}

impl Comparison {
    /// Align the chosen statistic across the benchmarks present in both
    /// files. Returns `None` when the files share no benchmarks. A benchmark
    /// missing the statistic in one file contributes a zero for that file.
    pub fn build(
        a: &StatsFile,
        b: &StatsFile,
        stat: &str,
        use_percentage: bool,
    ) -> Option<Comparison> {
        let benchmarks: Vec<String> = a.keys().filter(|k| b.contains_key(*k)).cloned().collect();
        if benchmarks.is_empty() {
            return None;
        }

        let mut values_a = Vec::with_capacity(benchmarks.len());
        let mut values_b = Vec::with_capacity(benchmarks.len());
        for bench in &benchmarks {
            values_a.push(value_of(a, bench, stat, use_percentage));
            values_b.push(value_of(b, bench, stat, use_percentage));
        }

        Some(Comparison {
            benchmarks,
            values_a,
            values_b,
        })
    }

    /// per-benchmark signed difference, second run minus first
    pub fn differences(&self) -> Vec<f64> {
        self.values_b
            .iter()
            .zip(&self.values_a)
            .map(|(b, a)| b - a)
            .collect()
    }

    fn min_value(&self) -> f64 {
        self.values_a
            .iter()
            .chain(&self.values_b)
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    fn max_value(&self) -> f64 {
        self.values_a
            .iter()
            .chain(&self.values_b)
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// y-axis range padded by 10% of the data range, floored at zero
    pub fn y_bounds(&self) -> (f64, f64) {
        let min = self.min_value();
        let max = self.max_value();
        let padding = (max - min) * 0.1;
        let lo = (min - padding).max(0.0);
        let mut hi = max + padding;
        if hi <= lo {
            // flat data still needs a drawable axis
            hi = lo + 1.0;
        }
        (lo, hi)
    }

    /// true when every per-benchmark difference is small relative to the
    /// overall maximum
    pub fn needs_zoom(&self) -> bool {
        let max = self.max_value();
        max > 0.0
            && self
                .differences()
                .iter()
                .all(|d| d.abs() / max < ZOOM_THRESHOLD)
    }

    /// the lowest 30% slice above the padded minimum, used by the inset
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let min = self.min_value();
        let max = self.max_value();
        let padding = (max - min) * 0.1;
        let lo = (min - padding).max(0.0);
        let mut hi = lo + (max - lo) * 0.3;
        if hi <= lo {
            hi = lo + 1.0;
        }
        (lo, hi)
    }
}

fn value_of(file: &StatsFile, bench: &str, stat: &str, use_percentage: bool) -> f64 {
    file.get(bench)
        .and_then(|record| record.get(stat))
        .map(|v| {
            if use_percentage {
                v.percentage
            } else {
                v.total
            }
        })
        .unwrap_or(0.0)
}

/// bar annotation: one decimal with a % suffix in percentage mode, two
/// decimals otherwise
pub fn value_label(value: f64, use_percentage: bool) -> String {
    if use_percentage {
        format!("{:.1}%", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn output_filename(stat: &str) -> String {
    format!("{}_comparison.png", stat.replace(' ', "_"))
}

/// Render one statistic from two parsed runs into a PNG in the working
/// directory. An empty benchmark intersection is reported and skipped
/// without error.
pub fn render_comparison(
    a: &StatsFile,
    b: &StatsFile,
    label_a: &str,
    label_b: &str,
    stat: &str,
    use_percentage: bool,
) -> Result<(), Box<dyn Error>> {
    let comparison = match Comparison::build(a, b, stat, use_percentage) {
        Some(comparison) => comparison,
        None => {
            info!("no common benchmarks found between the files");
            return Ok(());
        }
    };

    let filename = output_filename(stat);
    draw(&comparison, &filename, label_a, label_b, stat, use_percentage)?;
    info!("plot saved as {}", filename);
    Ok(())
}

fn draw(
    comparison: &Comparison,
    filename: &str,
    label_a: &str,
    label_b: &str,
    stat: &str,
    use_percentage: bool,
) -> Result<(), Box<dyn Error>> {
    let count = comparison.benchmarks.len();
    let x_range = -0.5..(count as f64 - 0.5);
    let (y_lo, y_hi) = comparison.y_bounds();
    let unit = if use_percentage { "%" } else { "Total" };

    let root = BitMapBackend::new(filename, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Comparison of {} between {} and {}", stat, label_a, label_b),
            ("sans-serif", 50),
        )
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 140)
        .set_label_area_size(LabelAreaPosition::Bottom, 180)
        .build_cartesian_2d(x_range.clone(), y_lo..y_hi)?;

    let benchmarks = &comparison.benchmarks;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_label_formatter(&|x| {
            let index = x.round();
            if index < 0.0 || (x - index).abs() > 0.3 {
                return String::new();
            }
            benchmarks
                .get(index as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_label_style(("sans-serif", 28).into_font().transform(FontTransform::Rotate90))
        .y_label_style(("sans-serif", 28))
        .y_desc(format!("{} ({})", stat, unit))
        .axis_desc_style(("sans-serif", 34))
        .draw()?;

    draw_bars(&mut chart, comparison, y_lo)?;
    draw_value_labels(&mut chart, comparison, use_percentage)?;

    // zero-sized anchors carry the legend entries
    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, y_hi),
            0,
            RUN_A_COLOUR.filled(),
        )))?
        .label(label_a)
        .legend(|(x, y)| Rectangle::new([(x, y - 8), (x + 24, y + 8)], RUN_A_COLOUR.filled()));
    chart
        .draw_series(std::iter::once(Circle::new(
            (0.0, y_hi),
            0,
            RUN_B_COLOUR.filled(),
        )))?
        .label(label_b)
        .legend(|(x, y)| Rectangle::new([(x, y - 8), (x + 24, y + 8)], RUN_B_COLOUR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 30))
        .draw()?;

    if comparison.needs_zoom() {
        let (width, height) = root.dim_in_pixel();
        let (width, height) = (width as i32, height as i32);
        let inset = root
            .clone()
            .shrink((width / 10, height / 10), (width * 2 / 5, height * 3 / 10));
        inset.fill(&WHITE)?;

        let (zoom_lo, zoom_hi) = comparison.zoom_bounds();
        let mut zoomed = ChartBuilder::on(&inset)
            .caption("Zoomed View", ("sans-serif", 28))
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 90)
            .build_cartesian_2d(x_range, zoom_lo..zoom_hi)?;

        // no x labels in the inset
        zoomed
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_label_style(("sans-serif", 22))
            .draw()?;

        draw_bars(&mut zoomed, comparison, zoom_lo)?;
    }

    root.present()?;
    Ok(())
}

fn draw_bars(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    comparison: &Comparison,
    base: f64,
) -> Result<(), Box<dyn Error>> {
    chart.draw_series(comparison.values_a.iter().enumerate().map(|(i, &v)| {
        let x = i as f64;
        Rectangle::new([(x - BAR_WIDTH, base), (x, v)], RUN_A_COLOUR.mix(0.8).filled())
    }))?;
    chart.draw_series(comparison.values_b.iter().enumerate().map(|(i, &v)| {
        let x = i as f64;
        Rectangle::new([(x, base), (x + BAR_WIDTH, v)], RUN_B_COLOUR.mix(0.8).filled())
    }))?;
    Ok(())
}

fn draw_value_labels(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    comparison: &Comparison,
    use_percentage: bool,
) -> Result<(), Box<dyn Error>> {
    let style = TextStyle::from(("sans-serif", 24).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    chart.draw_series(comparison.values_a.iter().enumerate().map(|(i, &v)| {
        Text::new(
            value_label(v, use_percentage),
            (i as f64 - BAR_WIDTH / 2.0, v),
            style.clone(),
        )
    }))?;
    chart.draw_series(comparison.values_b.iter().enumerate().map(|(i, &v)| {
        Text::new(
            value_label(v, use_percentage),
            (i as f64 + BAR_WIDTH / 2.0, v),
            style.clone(),
        )
    }))?;
    Ok(())
}
