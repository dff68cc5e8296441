use super::{time_range, value_range, Canvas};
use crate::timestamp::Timestamp;
use crate::views::{CacheEffectiveness, OverallTrend, StageBreakdown, StageTrends, TimePoint};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

const FONT: &str = "sans-serif";
const ORANGE: RGBColor = RGBColor(255, 140, 0);
const CACHE_GREEN: RGBColor = RGBColor(46, 160, 67);

fn annotation_style() -> TextStyle<'static> {
    TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom))
}

/// X axis for bar charts: one unit-wide slot per bar, slot `i` centred on `i`.
fn slot_range(count: usize) -> Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

/// Tick label for a slot centre; ticks between slots stay blank.
fn slot_label<S: AsRef<str>>(labels: &[S], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| l.as_ref().to_string())
        .unwrap_or_default()
}

fn slot_bar(slot: usize, half_width: f64, bottom: f64, top: f64) -> [(f64, f64); 2] {
    let x = slot as f64;
    [(x - half_width, bottom), (x + half_width, top)]
}

/// Line with a marker on every point, sharing one time axis.
fn draw_time_series(
    area: &Canvas<'_>,
    caption: &str,
    y_desc: &str,
    points: &[TimePoint],
    color: RGBColor,
    time_format: &str,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .caption(caption, (FONT, 26))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(
            time_range(points.iter().map(|(t, _)| t)),
            value_range(points.iter().map(|(_, v)| *v), 1.1),
        )?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|t: &Timestamp| t.format(time_format).to_string())
        .x_desc("Timestamp")
        .y_desc(y_desc)
        .label_style((FONT, 14))
        .axis_desc_style((FONT, 16))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        color.stroke_width(2),
    ))?;
    chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))?;

    Ok(())
}

/// Duration and memory stacked vertically over the same runs.
pub fn draw_overall_trend(root: &Canvas<'_>, view: &OverallTrend) -> Result<()> {
    let panels = root.split_evenly((2, 1));
    draw_time_series(
        &panels[0],
        "Total Analysis Duration Over Time",
        "Time (ms)",
        &view.duration,
        BLUE,
        "%m/%d %H:%M",
    )?;
    draw_time_series(
        &panels[1],
        "Memory Usage Over Time",
        "Memory (MB)",
        &view.memory,
        RED,
        "%m/%d %H:%M",
    )?;
    Ok(())
}

pub fn draw_stage_breakdown(root: &Canvas<'_>, view: &StageBreakdown) -> Result<()> {
    let names: Vec<&str> = view.bars.iter().map(|b| b.stage.as_str()).collect();

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(
            format!(
                "Analysis Stage Breakdown - {}",
                view.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            (FONT, 28),
        )
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(
            slot_range(names.len()),
            value_range(view.bars.iter().map(|b| b.duration_ms), 1.15),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&|x: &f64| slot_label(&names[..], *x))
        .x_desc("Analysis Stage")
        .y_desc("Duration (ms)")
        .label_style((FONT, 14))
        .axis_desc_style((FONT, 16))
        .draw()?;

    let n = view.bars.len();
    chart.draw_series(view.bars.iter().enumerate().map(|(i, bar)| {
        let rgb = colorous::VIRIDIS.eval_continuous(i as f64 / n.max(1) as f64);
        Rectangle::new(
            slot_bar(i, 0.4, 0.0, bar.duration_ms),
            RGBColor(rgb.r, rgb.g, rgb.b).filled(),
        )
    }))?;

    chart.draw_series(view.bars.iter().enumerate().map(|(i, bar)| {
        Text::new(bar.label(), (i as f64, bar.duration_ms), annotation_style())
    }))?;

    Ok(())
}

pub fn draw_stage_trends(root: &Canvas<'_>, view: &StageTrends) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption("Stage Duration Trends Over Time", (FONT, 28))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(
            time_range(view.points().map(|(t, _)| t)),
            value_range(view.points().map(|(_, v)| *v), 1.1),
        )?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|t: &Timestamp| t.format("%m/%d %H:%M").to_string())
        .x_desc("Timestamp")
        .y_desc("Duration (ms)")
        .label_style((FONT, 14))
        .axis_desc_style((FONT, 16))
        .draw()?;

    for (idx, series) in view.series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(1.0);
        for segment in &series.segments {
            chart.draw_series(LineSeries::new(
                segment.iter().copied(),
                color.stroke_width(2),
            ))?;
        }
        chart
            .draw_series(series.points().map(|p| Circle::new(*p, 4, color.filled())))?
            .label(series.stage.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;

    Ok(())
}

/// Stacked cached/new bars per run with the hit rate above each bar.
pub fn draw_cache_effectiveness(root: &Canvas<'_>, view: &CacheEffectiveness) -> Result<()> {
    let labels: Vec<String> = view
        .runs
        .iter()
        .map(|r| r.as_ref().map(|b| b.label.clone()).unwrap_or_default())
        .collect();

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption("Cache Effectiveness Over Time", (FONT, 28))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(
            slot_range(labels.len()),
            value_range(std::iter::once(view.max_total() as f64), 1.15),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|x: &f64| slot_label(&labels[..], *x))
        .x_desc("Run")
        .y_desc("File Count")
        .label_style((FONT, 13))
        .axis_desc_style((FONT, 16))
        .draw()?;

    let bars: Vec<_> = view.runs.iter().flatten().collect();

    chart
        .draw_series(bars.iter().map(|b| {
            Rectangle::new(
                slot_bar(b.run_index, 0.35, 0.0, b.cached as f64),
                CACHE_GREEN.filled(),
            )
        }))?
        .label("From Cache")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], CACHE_GREEN.filled()));

    chart
        .draw_series(bars.iter().map(|b| {
            Rectangle::new(
                slot_bar(
                    b.run_index,
                    0.35,
                    b.cached as f64,
                    (b.cached + b.non_cached) as f64,
                ),
                ORANGE.filled(),
            )
        }))?
        .label("Newly Processed")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], ORANGE.filled()));

    chart.draw_series(bars.iter().filter_map(|b| {
        b.annotation.as_ref().map(|text| {
            Text::new(
                text.clone(),
                (b.run_index as f64, b.total as f64),
                annotation_style(),
            )
        })
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;

    Ok(())
}

/// Live throughput line, x-axis labelled with wall-clock time only.
pub fn draw_throughput(root: &Canvas<'_>, points: &[TimePoint]) -> Result<()> {
    draw_time_series(
        root,
        "Files Processed per Second Over Time",
        "Files per Second",
        points,
        BLUE,
        "%H:%M:%S",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetailRecord, SummaryRecord, SummaryTable};
    use crate::render::{render_to_png_bytes, ChartSize};
    use crate::timestamp::parse_timestamp;
    use crate::views::{cache_effectiveness, stage_breakdown};

    const SIZE: ChartSize = ChartSize::new(600, 400);

    /// Leftmost and rightmost column holding a pixel of exactly `color`.
    fn horizontal_extent(png: &[u8], color: RGBColor) -> Option<(u32, u32)> {
        let img = image::load_from_memory(png).unwrap().to_rgb8();
        let mut extent: Option<(u32, u32)> = None;
        for (x, _, px) in img.enumerate_pixels() {
            if px.0 == [color.0, color.1, color.2] {
                extent = Some(match extent {
                    None => (x, x),
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                });
            }
        }
        extent
    }

    #[test]
    fn slot_labels_only_on_centres() {
        let labels = ["parse", "lint"];
        assert_eq!(slot_label(&labels[..], 0.0), "parse");
        assert_eq!(slot_label(&labels[..], 1.0), "lint");
        assert_eq!(slot_label(&labels[..], 0.5), "");
        assert_eq!(slot_label(&labels[..], 2.0), "");
        assert_eq!(slot_label(&labels[..], -1.0), "");
        assert_eq!(slot_range(3), -0.5..2.5);
    }

    #[test]
    fn single_stage_bar_fills_the_plot_width() {
        let details = vec![DetailRecord {
            timestamp: parse_timestamp("2024-01-01 00:00:00").unwrap(),
            stage: "parse".to_string(),
            duration_ms: 1200.0,
        }];
        let view = stage_breakdown(&details).unwrap();
        let png = render_to_png_bytes(SIZE, |root| draw_stage_breakdown(root, &view)).unwrap();

        let first = colorous::VIRIDIS.eval_continuous(0.0);
        let (lo, hi) =
            horizontal_extent(&png, RGBColor(first.r, first.g, first.b)).expect("bar drawn");
        assert!(lo < 200, "bar starts at x={lo}");
        assert!(hi > 450, "bar ends at x={hi}");
    }

    #[test]
    fn last_cache_bar_reaches_the_right_edge() {
        let row = |t: &str| SummaryRecord {
            timestamp: parse_timestamp(t).unwrap(),
            total_duration_ms: 100.0,
            memory_used_mb: 10.0,
            file_count: Some(100),
            cached_files: Some(40),
        };
        let table = SummaryTable {
            records: vec![row("2024-01-01 00:00:00"), row("2024-01-02 00:00:00")],
            has_file_count: true,
            has_cached_files: true,
        };
        let view = cache_effectiveness(&table).unwrap();
        let png =
            render_to_png_bytes(SIZE, |root| draw_cache_effectiveness(root, &view)).unwrap();

        let (_, hi) = horizontal_extent(&png, ORANGE).expect("bars drawn");
        assert!(hi > 450, "last bar ends at x={hi}");
    }
}
