use crate::models::TextBox;
use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::Canvas;
use imageproc::pixelops::interpolate;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

/// A font able to measure and draw a label, whichever way it was obtained.
pub enum IconFont {
    /// TrueType/OpenType face loaded from disk.
    Outline { font: FontVec, scale: PxScale },
    /// Embedded bitmap face, used when the preferred font is unusable.
    Builtin(BuiltinFont),
}

impl IconFont {
    /// Loads the preferred font at `px` pixels per em, or falls back to the built-in face.
    /// The outline face is only kept if it has a glyph for every visible character of `text`.
    pub fn resolve(path: &Path, px: u32, text: &str) -> IconFont {
        let Some(found) = locate_font(path) else {
            warn!("font {} not found, using built-in font", path.display());
            return IconFont::Builtin(BuiltinFont);
        };

        let font = match fs::read(&found) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => font,
                Err(e) => {
                    warn!("font {} is not usable ({}), using built-in font", found.display(), e);
                    return IconFont::Builtin(BuiltinFont);
                }
            },
            Err(e) => {
                warn!("cannot read font {} ({}), using built-in font", found.display(), e);
                return IconFont::Builtin(BuiltinFont);
            }
        };

        if let Some(missing) = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .find(|&c| font.glyph_id(c) == GlyphId(0))
        {
            warn!("font {} has no glyph for {:?}, using built-in font", found.display(), missing);
            return IconFont::Builtin(BuiltinFont);
        }

        let scale = em_scale(&font, px as f32);
        debug!("using font {} at {}px", found.display(), px);
        IconFont::Outline { font, scale }
    }

    /// True when the embedded bitmap face is in use.
    pub fn is_builtin(&self) -> bool {
        matches!(self, IconFont::Builtin(_))
    }

    /// Bounding box of `text` drawn at origin (0, 0).
    pub fn text_bbox(&self, text: &str) -> TextBox {
        match self {
            IconFont::Outline { font, scale } => layout(font, *scale, text)
                .iter()
                .map(|g| {
                    let bb = g.px_bounds();
                    TextBox {
                        left: bb.min.x.floor() as i32,
                        top: bb.min.y.floor() as i32,
                        right: bb.max.x.ceil() as i32,
                        bottom: bb.max.y.ceil() as i32,
                    }
                })
                .fold(TextBox::default(), TextBox::union),
            IconFont::Builtin(builtin) => builtin.text_bbox(text),
        }
    }

    /// Draws `text` with its origin at (x, y). Anything off the canvas is clipped.
    pub fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        match self {
            IconFont::Outline { font, scale } => {
                for glyph in layout(font, *scale, text) {
                    let bb = glyph.px_bounds();
                    let (left, top) = (x + bb.min.x as i32, y + bb.min.y as i32);
                    glyph.draw(|gx, gy, coverage| {
                        let (px, py) = (left + gx as i32, top + gy as i32);
                        if in_bounds(canvas, px, py) {
                            let (px, py) = (px as u32, py as u32);
                            let under = *canvas.get_pixel(px, py);
                            canvas.draw_pixel(px, py, interpolate(color, under, coverage));
                        }
                    });
                }
            }
            IconFont::Builtin(builtin) => builtin.draw_text(canvas, x, y, color, text),
        }
    }
}

/// Scale at which one em spans `px` pixels, matching how font sizes are usually given.
fn em_scale(font: &FontVec, px: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) => PxScale::from(px * font.height_unscaled() / units_per_em),
        None => PxScale::from(px),
    }
}

/// Lays glyphs out on a baseline at the font's ascent, so y = 0 is the top of the line.
fn layout(font: &FontVec, scale: PxScale, text: &str) -> Vec<OutlinedGlyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0;
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::new();

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        previous = Some(id);

        // Whitespace has no outline
        if let Some(outlined) = font.outline_glyph(glyph) {
            glyphs.push(outlined);
        }
    }
    glyphs
}

/// Whether (x, y) lies on the canvas.
fn in_bounds(canvas: &RgbaImage, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height()
}

/// Finds a font file. Existing paths are used as given; bare file names are
/// searched for (case-insensitively) under the platform font directories.
pub fn locate_font(name: &Path) -> Option<PathBuf> {
    if name.is_file() {
        return Some(name.to_path_buf());
    }
    if name.components().count() != 1 {
        return None;
    }
    let wanted = name.file_name()?.to_string_lossy().to_lowercase();

    font_dirs().into_iter().filter(|dir| dir.is_dir()).find_map(|dir| {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_string_lossy().to_lowercase() == wanted
            })
            .map(|e| e.into_path())
    })
}

/// Platform font directories, in search order. Missing ones are skipped by the caller.
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(windir) = env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    for dir in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
    ] {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(home) = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
        let home = PathBuf::from(home);
        for sub in [".fonts", ".local/share/fonts", "Library/Fonts"] {
            dirs.push(home.join(sub));
        }
    }
    dirs
}

/// Fixed-size 5x7 bitmap face. Ignores the requested size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuiltinFont;

impl BuiltinFont {
    /// Union of the lit cells of `text` drawn at origin (0, 0).
    pub fn text_bbox(&self, text: &str) -> TextBox {
        let mut bbox = TextBox::default();
        self.for_each_cell(text, |x, y| {
            bbox = bbox.union(TextBox { left: x, top: y, right: x + 1, bottom: y + 1 });
        });
        bbox
    }

    /// Writes every lit cell as a solid `color` pixel.
    pub fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, text: &str) {
        self.for_each_cell(text, |cx, cy| {
            let (px, py) = (x + cx, y + cy);
            if in_bounds(canvas, px, py) {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        });
    }

    /// Calls `f` with the origin-relative position of every lit cell.
    fn for_each_cell(&self, text: &str, mut f: impl FnMut(i32, i32)) {
        for (i, c) in text.chars().enumerate() {
            let left = i as i32 * GLYPH_ADVANCE;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        f(left + col, row as i32);
                    }
                }
            }
        }
    }
}

/// Rows top to bottom, leftmost column in bit 4.
fn glyph(c: char) -> &'static [u8; GLYPH_HEIGHT as usize] {
    match c.to_ascii_uppercase() {
        ' ' => &[0, 0, 0, 0, 0, 0, 0],
        '0' => &[0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => &[0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => &[0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => &[0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => &[0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => &[0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => &[0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => &[0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => &[0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => &[0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => &[0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => &[0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => &[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => &[0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => &[0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => &[0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => &[0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => &[0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => &[0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => &[0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => &[0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => &[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => &[0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => &[0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => &[0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => &[0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => &[0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => &[0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => &[0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '.' => &[0, 0, 0, 0, 0, 0b01100, 0b01100],
        '-' => &[0, 0, 0, 0b11111, 0, 0, 0],
        ':' => &[0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0],
        '!' => &[0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100],
        '?' => &[0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100],
        // Unknown characters get a hollow box
        _ => &[0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}
