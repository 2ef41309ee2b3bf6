/// Reversed grey-scale rendering of storm images
///
/// Minimum maps to black, maximum to white, non-finite cells are transparent.
/// Array row 0 is drawn at the bottom of the picture, like a mesh plot.

use image::{Rgba, RgbaImage};
use std::path::Path;

use super::npy::StormImage;
use crate::error::Result;

/// Grey level (0 = black) of `value` within `[lo, hi]`
pub fn grey_level(value: f64, lo: f64, hi: f64) -> u8 {
    let span = hi - lo;
    if span <= 0.0 {
        return 0;
    }
    let t = ((value - lo) / span).clamp(0.0, 1.0);
    (t * 255.0).round() as u8
}

/// Render to an RGBA image, flipped so that row 0 is at the bottom
pub fn render_greys_r(image: &StormImage) -> RgbaImage {
    let (lo, hi) = image.finite_range().unwrap_or((0.0, 0.0));
    let mut out = RgbaImage::new(image.cols as u32, image.rows as u32);
    for row in 0..image.rows {
        let y = (image.rows - 1 - row) as u32;
        for col in 0..image.cols {
            let v = image.value(row, col);
            let px = if v.is_finite() {
                let g = grey_level(v, lo, hi);
                Rgba([g, g, g, 255])
            } else {
                Rgba([0, 0, 0, 0])
            };
            out.put_pixel(col as u32, y, px);
        }
    }
    out
}

/// Save the grey-scale rendering as PNG, upscaled by an integer factor
pub fn save_png(storm: &StormImage, path: &Path, scale: u32) -> Result<()> {
    let base = render_greys_r(storm);
    let scale = scale.max(1);
    let scaled = image::imageops::resize(
        &base,
        base.width() * scale,
        base.height() * scale,
        image::imageops::FilterType::Nearest,
    );
    scaled.save(path)?;
    log::info!("Saved image: {}", path.display());
    Ok(())
}
