//! Raster bar charts for [`Histogram`]s.

use dnacom_stack_model::VelocityAxis;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::annotate::Rgb8;
use crate::histogram::Histogram;

/// Appearance of a rendered histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    pub bar_color: Rgb8,
    pub background: Rgb8,
    pub axis_color: Rgb8,

    /// Fraction of each bin's width covered by its bar.
    pub bar_width_ratio: f64,

    /// Blank border around the plot area, in pixels.
    pub margin: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            bar_color: [0, 0, 255],
            background: [255, 255, 255],
            axis_color: [0, 0, 0],
            bar_width_ratio: 0.85,
            margin: 40,
        }
    }
}

impl PlotStyle {
    /// Green bars for x velocity, blue bars for y velocity.
    pub fn for_axis(axis: VelocityAxis) -> Self {
        let bar_color = match axis {
            VelocityAxis::X => [0, 128, 0],
            VelocityAxis::Y => [0, 0, 255],
        };
        Self {
            bar_color,
            ..Self::default()
        }
    }

    fn plot_area(&self) -> (f32, f32, f32, f32) {
        let margin = self.margin.min(self.width / 4).min(self.height / 4) as f32;
        let left = margin;
        let top = margin;
        let right = (self.width as f32 - margin).max(left + 1.0);
        let bottom = (self.height as f32 - margin).max(top + 1.0);
        (left, top, right, bottom)
    }
}

/// Draw `histogram` as a bar chart.
///
/// Bar heights are scaled to the tallest bin. Every non-empty bin gets a bar
/// at least one pixel wide and tall, however many bins share the plot. A vertical line marks zero
/// velocity when zero lies inside the histogram's range.
pub fn render_histogram(histogram: &Histogram, style: &PlotStyle) -> RgbImage {
    let mut image = RgbImage::from_pixel(style.width, style.height, Rgb(style.background));
    let (left, top, right, bottom) = style.plot_area();
    let plot_width = right - left;
    let plot_height = bottom - top;

    let bins = histogram.bin_count();
    let max_count = histogram.max_count();
    if bins > 0 && max_count > 0 {
        let slot = plot_width / bins as f32;
        let ratio = style.bar_width_ratio.clamp(0.0, 1.0) as f32;
        let bar_width = slot * ratio;
        let inset = (slot - bar_width) / 2.0;

        // Non-empty bins stay visible even when a bar is narrower than a pixel.
        let w = (bar_width.round() as u32).max(1);
        for (i, &count) in histogram.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let bar_height = plot_height * count as f32 / max_count as f32;
            let h = (bar_height.round() as u32).max(1);
            let x = (left + slot * i as f32 + inset).round() as i32;
            let y = (bottom - bar_height).round() as i32;
            draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(w, h), Rgb(style.bar_color));
        }
    }

    let axis = Rgb(style.axis_color);
    draw_line_segment_mut(&mut image, (left, bottom), (right, bottom), axis);
    draw_line_segment_mut(&mut image, (left, top), (left, bottom), axis);

    let (lo, hi) = histogram.range();
    if lo < 0.0 && hi > 0.0 {
        let x = left + plot_width * ((0.0 - lo) / (hi - lo)) as f32;
        draw_line_segment_mut(&mut image, (x, top), (x, bottom), axis);
    }

    image
}
