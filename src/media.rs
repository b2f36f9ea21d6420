//! Question image handling.
//!
//! The terminal can't render bitmaps, so an image reference reduces to a
//! caption: a readable file shows its path, anything else shows a "not found"
//! placeholder. Failures are swallowed here, never propagated.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    /// The question carries no image.
    None,
    /// The referenced file exists and is readable.
    Available(PathBuf),
    /// The reference is broken; render the placeholder.
    Missing(PathBuf),
}

pub fn resolve(path: Option<&Path>) -> ImageSlot {
    let Some(path) = path else {
        return ImageSlot::None;
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => ImageSlot::Available(path.to_path_buf()),
        _ => {
            warn!("image {} not found, using placeholder", path.display());
            ImageSlot::Missing(path.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_means_no_image() {
        assert_eq!(resolve(None), ImageSlot::None);
    }

    #[test]
    fn test_broken_reference_becomes_placeholder() {
        let path = Path::new("definitely/not/here.png");
        assert_eq!(resolve(Some(path)), ImageSlot::Missing(path.to_path_buf()));
    }

    #[test]
    fn test_existing_file_is_available() {
        let path = std::env::temp_dir().join(format!(
            "quizmaster-img-{}.png",
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, b"png").unwrap();

        assert_eq!(resolve(Some(&path)), ImageSlot::Available(path.clone()));

        fs::remove_file(&path).unwrap();
    }
}
