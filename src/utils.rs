use crate::error::{IconError, Result};
use crate::models::IconSet;
use crate::render::create_icon;
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders every size in the set and writes them as PNGs into the output directory.
/// Stops at the first failure; files already written are left in place.
pub fn generate_icons(set: &IconSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&set.out_dir).map_err(|source| IconError::CreateDir {
        path: set.out_dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(set.sizes.len());
    for &size in &set.sizes {
        let image = create_icon(size, &set.label, &set.font)?;
        let path = icon_path(&set.out_dir, size);
        save_png(&image, &path)?;

        println!("Created {}", path.display());
        info!("wrote {}x{} icon to {}", size, size, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Path of the icon for `size`, e.g. `icons/icon48.png`.
pub fn icon_path(dir: &Path, size: u32) -> PathBuf {
    dir.join(format!("icon{}.png", size))
}

/// Encodes `image` as an RGBA PNG at `path`.
fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| IconError::Save {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ColorType;
    use std::collections::BTreeSet;

    fn test_set(root: &Path) -> IconSet {
        IconSet {
            out_dir: root.join("icons"),
            font: root.join("fonts").join("arial.ttf"),
            ..IconSet::default()
        }
    }

    #[test]
    fn icon_path_follows_naming_convention() {
        assert_eq!(icon_path(Path::new("icons"), 16), PathBuf::from("icons/icon16.png"));
        assert_eq!(icon_path(Path::new("out"), 128), Path::new("out").join("icon128.png"));
    }

    #[test]
    fn writes_three_rgba_pngs_into_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let set = test_set(tmp.path());
        assert!(!set.out_dir.exists());

        let written = generate_icons(&set).unwrap();
        assert_eq!(
            written,
            vec![
                set.out_dir.join("icon16.png"),
                set.out_dir.join("icon48.png"),
                set.out_dir.join("icon128.png"),
            ]
        );

        let names: BTreeSet<String> = fs::read_dir(&set.out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let expected: BTreeSet<String> =
            ["icon16.png", "icon48.png", "icon128.png"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);

        for (path, size) in written.iter().zip([16u32, 48, 128]) {
            let decoded = image::open(path).unwrap();
            assert_eq!(decoded.color(), ColorType::Rgba8);
            assert_eq!((decoded.width(), decoded.height()), (size, size));
        }
    }

    #[test]
    fn existing_directory_is_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let set = test_set(tmp.path());

        let first = generate_icons(&set).unwrap();
        let before = fs::read(&first[1]).unwrap();
        let second = generate_icons(&set).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second[1]).unwrap(), before);
    }

    #[test]
    fn output_dir_blocked_by_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("icons");
        fs::write(&blocker, b"not a directory").unwrap();

        let set = IconSet {
            out_dir: blocker.join("nested"),
            ..test_set(tmp.path())
        };
        let err = generate_icons(&set).unwrap_err();
        assert!(matches!(err, IconError::CreateDir { .. }));
    }

    #[test]
    fn zero_size_aborts_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let set = IconSet {
            sizes: vec![16, 0, 48],
            ..test_set(tmp.path())
        };

        let err = generate_icons(&set).unwrap_err();
        assert!(matches!(err, IconError::InvalidSize(0)));
        // Earlier output stays, later sizes never happen
        assert!(set.out_dir.join("icon16.png").exists());
        assert!(!set.out_dir.join("icon48.png").exists());
    }

    #[test]
    fn write_failure_aborts_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let set = test_set(tmp.path());
        // A directory where the 48px icon should go makes the write fail
        fs::create_dir_all(set.out_dir.join("icon48.png")).unwrap();

        let err = generate_icons(&set).unwrap_err();
        match err {
            IconError::Save { path, .. } => assert_eq!(path, set.out_dir.join("icon48.png")),
            other => panic!("expected a save error, got {other:?}"),
        }
        assert!(set.out_dir.join("icon16.png").is_file());
        assert!(!set.out_dir.join("icon128.png").exists());
    }
}
