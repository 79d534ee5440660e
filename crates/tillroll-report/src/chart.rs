//! Chart rasterization.
//!
//! Charts are drawn pixel-by-pixel into RGB buffers and embedded in the PDF
//! as images; axis labels and legends are typeset by the PDF layer, keyed to
//! slice order and [`PALETTE`] position.

use image::{Rgb, RgbImage};

/// Slice and swatch colors, cycled in order.
///
/// Every channel is 0 or 255 so the PDF legend can reproduce a color exactly
/// with integer color operands.
pub const PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 0, 255],
    [0, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 0],
];

/// Bar fill, the bootstrap primary blue.
const BAR_COLOR: [u8; 3] = [0x0d, 0x6e, 0xfd];
const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Color for the nth series entry.
#[must_use]
pub fn series_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

/// Rasterize a pie chart over the given weights.
///
/// Slices start at twelve o'clock and run clockwise in input order. Weights
/// must sum to a positive value; callers substitute a single placeholder
/// slice when they do not.
#[must_use]
pub fn pie_chart(weights: &[f64], size: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(size, size, Rgb(BACKGROUND));
    let total: f64 = weights.iter().filter(|weight| **weight > 0.0).sum();
    if total <= 0.0 {
        return canvas;
    }

    // Cumulative fraction where each slice ends.
    let mut bounds = Vec::with_capacity(weights.len());
    let mut running = 0.0;
    for weight in weights {
        running += weight.max(0.0) / total;
        bounds.push(running);
    }

    let center = f64::from(size) / 2.0;
    let radius = center - 2.0;

    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) + 0.5 - center;
            let dy = f64::from(y) + 0.5 - center;
            if dx * dx + dy * dy > radius * radius {
                continue;
            }

            // Angle as a clockwise fraction of a turn from twelve o'clock.
            let mut turn = dx.atan2(-dy) / std::f64::consts::TAU;
            if turn < 0.0 {
                turn += 1.0;
            }

            let slice = bounds
                .iter()
                .position(|bound| turn < *bound)
                .unwrap_or(weights.len() - 1);
            canvas.put_pixel(x, y, Rgb(series_color(slice)));
        }
    }

    canvas
}

/// Rasterize a bar chart over the given values, left to right.
#[must_use]
pub fn bar_chart(values: &[f64], width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if values.is_empty() || max <= 0.0 {
        return canvas;
    }

    let count = values.len() as u32;
    let slot = width / count.max(1);
    let gap = (slot / 5).max(1);
    let bar_width = slot.saturating_sub(gap).max(1);

    for (index, value) in values.iter().enumerate() {
        let fraction = (value.max(0.0) / max).min(1.0);
        let bar_height = (fraction * f64::from(height.saturating_sub(2))) as u32;
        let left = index as u32 * slot + gap / 2;

        for x in left..(left + bar_width).min(width) {
            for y in (height - bar_height)..height {
                canvas.put_pixel(x, y, Rgb(BAR_COLOR));
            }
        }
    }

    canvas
}
