//! Chart rendering on top of plotters.
//!
//! A chart never draws into shared state: every render call creates its own
//! bitmap canvas, hands it to a drawer, presents it and drops it before the
//! next chart starts.

pub mod charts;

use crate::timestamp::Timestamp;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

pub use charts::{
    draw_cache_effectiveness, draw_overall_trend, draw_stage_breakdown, draw_stage_trends,
    draw_throughput,
};

pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Pixel dimensions of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn dims(self) -> (u32, u32) {
        (self.width.max(1), self.height.max(1))
    }
}

pub const THROUGHPUT_SIZE: ChartSize = ChartSize::new(1800, 900);

/// Renders one chart to a PNG file.
///
/// The file is only replaced once the whole chart has drawn and encoded, so a
/// failing drawer leaves any previous image untouched.
pub fn render_to_file<F>(path: &Path, size: ChartSize, draw: F) -> Result<()>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let png = render_to_png_bytes(size, draw)?;
    std::fs::write(path, png)
        .with_context(|| format!("failed to write chart {}", path.display()))?;
    Ok(())
}

/// Renders one chart into an in-memory PNG.
pub fn render_to_png_bytes<F>(size: ChartSize, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let (width, height) = size.dims();
    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let buffer = image::RgbImage::from_raw(width, height, rgb)
        .context("bitmap buffer does not match chart dimensions")?;
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buffer)
        .write_to(&mut png, image::ImageFormat::Png)
        .context("failed to encode PNG")?;
    Ok(png.into_inner())
}

/// X range covering every timestamp with a little padding on both sides.
///
/// Falls back to a one hour window at the epoch when there is nothing to plot.
pub(crate) fn time_range<'a, I>(timestamps: I) -> Range<Timestamp>
where
    I: IntoIterator<Item = &'a Timestamp>,
{
    let mut bounds: Option<(Timestamp, Timestamp)> = None;
    for t in timestamps {
        bounds = Some(match bounds {
            None => (*t, *t),
            Some((lo, hi)) => (lo.min(*t), hi.max(*t)),
        });
    }

    match bounds {
        Some((lo, hi)) => {
            let span = hi - lo;
            let pad = if span <= Duration::zero() {
                Duration::minutes(1)
            } else {
                span / 20
            };
            (lo - pad)..(hi + pad)
        }
        None => {
            let epoch = DateTime::<Utc>::default().fixed_offset();
            epoch..(epoch + Duration::hours(1))
        }
    }
}

/// Y range from zero to just above the largest value.
pub(crate) fn value_range<I>(values: I, headroom: f64) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi <= lo {
        return lo..(lo + 1.0);
    }
    lo..(hi * headroom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_timestamp;

    #[test]
    fn single_timestamp_range_is_padded() {
        let t = parse_timestamp("2024-01-01T12:00:00Z").unwrap();
        let r = time_range([t].iter());
        assert!(r.start < t && t < r.end);
    }

    #[test]
    fn value_range_has_headroom() {
        let r = value_range([10.0, 40.0], 1.1);
        assert_eq!(r.start, 0.0);
        assert!((r.end - 44.0).abs() < 1e-9);

        let flat = value_range(std::iter::empty(), 1.1);
        assert_eq!(flat, 0.0..1.0);
    }

    #[test]
    fn failed_draw_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"previous run").unwrap();

        let err = render_to_file(&path, ChartSize::new(64, 32), |root| {
            root.fill(&RED)?;
            anyhow::bail!("series went missing")
        })
        .unwrap_err();
        assert!(err.to_string().contains("series went missing"));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous run");
    }

    #[test]
    fn successful_draw_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"previous run").unwrap();

        render_to_file(&path, ChartSize::new(64, 32), |_| Ok(())).unwrap();
        assert!(std::fs::read(&path)
            .unwrap()
            .starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn png_bytes_have_png_signature() {
        let png = render_to_png_bytes(ChartSize::new(64, 32), |root| {
            root.fill(&BLUE)?;
            Ok(())
        })
        .unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
