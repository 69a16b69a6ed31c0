use crate::error::{IconError, Result};
use crate::font::IconFont;
use crate::models::{ACCENT, BACKGROUND, LABEL_LIFT, TEXT};
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Renders one square icon: background disc, accent ring, and `text` centered on top.
pub fn create_icon(size: u32, text: &str, font_path: &Path) -> Result<RgbaImage> {
    if size == 0 {
        return Err(IconError::InvalidSize(size));
    }

    let mut image = ImageBuffer::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    draw_badge(&mut image);

    let font = IconFont::resolve(font_path, size / 2, text);
    let (x, y) = label_origin(size, &font, text);
    debug!(size, x, y, builtin = font.is_builtin(), "placing label");
    font.draw_text(&mut image, x, y, TEXT, text);

    Ok(image)
}

/// Paints the background disc over the whole canvas and the accent ring inset by a fifth.
pub fn draw_badge(image: &mut RgbaImage) {
    let size = image.width();
    let center = size as f32 / 2.0;
    let padding = size / 5;
    let stroke = (size / 20).max(1) as f32;
    // Outline grows inward from the ring's bounding box
    let ring_outer = center - padding as f32;
    let ring_inner = ring_outer - stroke;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance_from_center = (dx * dx + dy * dy).sqrt();

        if distance_from_center <= center {
            *pixel = BACKGROUND;
        }
        if ring_outer > 0.0
            && distance_from_center >= ring_inner
            && distance_from_center <= ring_outer
        {
            *pixel = ACCENT;
        }
    }
}

/// Top-left draw position that centers the label's bounding box, then lifts it a little.
/// Fractions are truncated toward the top-left.
fn label_origin(size: u32, font: &IconFont, text: &str) -> (i32, i32) {
    let bbox = font.text_bbox(text);
    let width = bbox.width() as f32;
    let height = bbox.height() as f32;

    let x = (size as f32 - width) / 2.0;
    let y = (size as f32 - height) / 2.0 - height * LABEL_LIFT;
    (x.floor() as i32, y.floor() as i32)
}
