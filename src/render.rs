//! Wheel drawing.
//!
//! Geometry is computed in screen convention: angle 0 points due right and
//! angles grow clockwise (y axis pointing down). Segment `i` starts at
//! `i * 2π/n + offset`. The pointer is drawn at the top of the circle, which
//! is what [`crate::wheel::winner_index`] accounts for.

use serde::Serialize;
use std::f64::consts::TAU;

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub name: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Fill hue in degrees. Only used to tell neighbours apart.
    pub hue: f64,
}

impl Segment {
    /// Angle the label is drawn along: the middle of the slice.
    pub fn label_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Lays out `candidates` around the wheel rotated by `offset`.
///
/// Pure function of its inputs: the same list and offset always give the
/// same segments.
pub fn wheel_geometry(candidates: &[String], offset: f64) -> Vec<Segment> {
    let n = candidates.len();
    let step = TAU / n.max(1) as f64;
    candidates
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let start_angle = i as f64 * step + offset;
            Segment {
                index: i,
                name: name.clone(),
                start_angle,
                end_angle: start_angle + step,
                hue: 360.0 * i as f64 / n as f64,
            }
        })
        .collect()
}

#[cfg(feature = "web")]
pub use raster::{MAX_SIZE, MIN_SIZE, RenderError, RenderOptions, render_png};

#[cfg(feature = "web")]
mod raster {
    use super::{Segment, wheel_geometry};
    use plotters::prelude::*;
    use plotters::style::text_anchor::{HPos, Pos, VPos};
    use std::f64::consts::PI;
    use std::io::Cursor;
    use thiserror::Error;

    pub const MIN_SIZE: u32 = 64;
    pub const MAX_SIZE: u32 = 2048;

    const POINTER_HALF_WIDTH: i32 = 10;
    const POINTER_HEIGHT: i32 = 10;
    const LABEL_RADIUS: f64 = 0.7;
    const FONT_SIZE: f64 = 16.0;
    const GLYPH_ADVANCE: f64 = FONT_SIZE * 0.6;

    #[derive(Debug, Error)]
    pub enum RenderError {
        #[error("drawing failed: {0}")]
        Draw(String),
        #[error("png encoding failed: {0}")]
        Encode(String),
    }

    /// Size and decoration of a rendered wheel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderOptions {
        /// Edge of the square image in pixels, clamped to
        /// `MIN_SIZE..=MAX_SIZE`.
        pub size: u32,
        /// Draw candidate names. Needs a system sans-serif font.
        pub labels: bool,
    }

    impl Default for RenderOptions {
        fn default() -> Self {
            RenderOptions {
                size: 600,
                labels: true,
            }
        }
    }

    /// Renders the wheel to PNG bytes.
    pub fn render_png(
        candidates: &[String],
        offset: f64,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let size = options.size.clamp(MIN_SIZE, MAX_SIZE);
        let segments = wheel_geometry(candidates, offset);

        let mut buffer = vec![0u8; (size * size * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (size, size)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let radius = f64::from(size) / 2.0;
            let center = (radius, radius);

            for segment in &segments {
                let fill = HSLColor(segment.hue / 360.0, 0.7, 0.6);
                root.draw(&Polygon::new(
                    slice_points(center, radius, segment),
                    fill.filled(),
                ))
                .map_err(draw_error)?;

                if options.labels {
                    draw_radial_label(&root, center, radius, segment)?;
                }
            }

            let mid = radius.round() as i32;
            root.draw(&Polygon::new(
                vec![
                    (mid - POINTER_HALF_WIDTH, POINTER_HEIGHT),
                    (mid + POINTER_HALF_WIDTH, POINTER_HEIGHT),
                    (mid, 0),
                ],
                BLACK.filled(),
            ))
            .map_err(draw_error)?;

            root.present().map_err(draw_error)?;
        }

        let image = image::RgbImage::from_raw(size, size, buffer)
            .ok_or_else(|| RenderError::Encode("buffer does not match image size".to_string()))?;
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(png)
    }

    // plotters only rotates text in quarter turns, so the label is laid out
    // one glyph at a time along the slice's middle ray, centred at
    // `LABEL_RADIUS` like the canvas on the page.
    fn draw_radial_label<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        center: (f64, f64),
        radius: f64,
        segment: &Segment,
    ) -> Result<(), RenderError> {
        let angle = segment.label_angle();
        let (sin, cos) = angle.sin_cos();
        let style = ("sans-serif", FONT_SIZE)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (distance, glyph) in glyph_distances(&segment.name, radius * LABEL_RADIUS) {
            let at = (
                (center.0 + distance * cos).round() as i32,
                (center.1 + distance * sin).round() as i32,
            );
            root.draw(&Text::new(glyph.to_string(), at, style.clone()))
                .map_err(draw_error)?;
        }
        Ok(())
    }

    /// Distance from the centre of every non-blank glyph of `name` when the
    /// text is centred at `middle`.
    fn glyph_distances(name: &str, middle: f64) -> Vec<(f64, char)> {
        let count = name.chars().count() as f64;
        let first = middle - GLYPH_ADVANCE * (count - 1.0) / 2.0;
        name.chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| (first + GLYPH_ADVANCE * i as f64, c))
            .collect()
    }

    fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
        RenderError::Draw(e.to_string())
    }

    // Pie slice as a polygon: the centre followed by points along the arc,
    // at most two degrees apart.
    fn slice_points(center: (f64, f64), radius: f64, segment: &Segment) -> Vec<(i32, i32)> {
        let span = segment.end_angle - segment.start_angle;
        let steps = ((span / (PI / 90.0)).ceil() as usize).max(2);
        let mut points = Vec::with_capacity(steps + 2);
        points.push((center.0.round() as i32, center.1.round() as i32));
        for k in 0..=steps {
            let a = segment.start_angle + span * k as f64 / steps as f64;
            points.push((
                (center.0 + radius * a.cos()).round() as i32,
                (center.1 + radius * a.sin()).round() as i32,
            ));
        }
        points
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn segments_split_the_circle_evenly() {
        let segments = wheel_geometry(&names(&["a", "b", "c", "d"]), 0.5);
        assert_eq!(segments.len(), 4);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.index, i);
            assert!((s.end_angle - s.start_angle - PI / 2.0).abs() < 1e-12);
            assert!((s.start_angle - (0.5 + i as f64 * PI / 2.0)).abs() < 1e-12);
        }
        assert_eq!(
            segments.iter().map(|s| s.hue).collect::<Vec<_>>(),
            vec![0.0, 90.0, 180.0, 270.0]
        );
        assert!((segments[0].label_angle() - (0.5 + PI / 4.0)).abs() < 1e-12);
    }

    #[test]
    fn geometry_is_deterministic() {
        let list = names(&["Bram Verbelen", "Lisa Corten", "Oscar Peersman"]);
        assert_eq!(wheel_geometry(&list, 7.1), wheel_geometry(&list, 7.1));
        assert!(wheel_geometry(&[], 1.0).is_empty());
    }
}
