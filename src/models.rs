use image::Rgba;
use std::path::PathBuf;

/// Fill of the background disc (#1e1e2e).
pub const BACKGROUND: Rgba<u8> = Rgba([0x1e, 0x1e, 0x2e, 255]);
/// Stroke of the inner ring (#89b4fa).
pub const ACCENT: Rgba<u8> = Rgba([0x89, 0xb4, 0xfa, 255]);
/// Label color (#ffffff).
pub const TEXT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 255]);

pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];
pub const DEFAULT_LABEL: &str = "TT";
pub const DEFAULT_OUT_DIR: &str = "icons";
pub const DEFAULT_FONT: &str = "arial.ttf";

/// Fraction of the label height the label is raised above true center.
/// Empirical optical correction, keep as-is.
pub const LABEL_LIFT: f32 = 0.1;

/// Describes one run of the generator: which sizes, what label, where to write.
#[derive(Clone, Debug, PartialEq)]
pub struct IconSet {
    pub sizes: Vec<u32>,
    pub label: String,
    pub out_dir: PathBuf,
    /// Preferred font file: a path, or a bare file name looked up in the system font
    /// directories.
    pub font: PathBuf,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            label: DEFAULT_LABEL.to_owned(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            font: PathBuf::from(DEFAULT_FONT),
        }
    }
}

/// Bounding box of rendered text, relative to the draw origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    /// Horizontal extent in pixels, zero for inverted boxes.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Vertical extent in pixels, zero for inverted boxes.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// True when the box encloses no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Smallest box enclosing both. An empty box is the identity.
    pub fn union(self, other: TextBox) -> TextBox {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        TextBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_box_dimensions() {
        let b = TextBox { left: -1, top: 3, right: 10, bottom: 12 };
        assert_eq!(b.width(), 11);
        assert_eq!(b.height(), 9);
        assert!(!b.is_empty());

        let inverted = TextBox { left: 5, top: 5, right: 2, bottom: 2 };
        assert_eq!(inverted.width(), 0);
        assert!(inverted.is_empty());
    }

    #[test]
    fn union_skips_empty_boxes() {
        let a = TextBox { left: 0, top: 2, right: 4, bottom: 9 };
        let b = TextBox { left: 6, top: 0, right: 11, bottom: 7 };
        assert_eq!(a.union(b), TextBox { left: 0, top: 0, right: 11, bottom: 9 });
        assert_eq!(TextBox::default().union(a), a);
        assert_eq!(a.union(TextBox::default()), a);
    }

    #[test]
    fn default_set_matches_extension_icons() {
        let set = IconSet::default();
        assert_eq!(set.sizes, vec![16, 48, 128]);
        assert_eq!(set.label, "TT");
        assert_eq!(set.out_dir, PathBuf::from("icons"));
        assert_eq!(set.font, PathBuf::from("arial.ttf"));
    }
}
