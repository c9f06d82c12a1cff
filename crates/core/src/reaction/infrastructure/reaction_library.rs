use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::gesture::domain::gesture::{GestureLabel, ReactionAsset};
use crate::shared::constants::{REACTION_ASSETS, REACTION_ASSET_EXTENSION};
use crate::shared::error::SessionError;
use crate::shared::frame::Frame;

/// `<dir>/<asset id>.jpg`
pub fn asset_path(dir: &Path, asset: ReactionAsset) -> PathBuf {
    dir.join(format!("{}.{}", asset.id(), REACTION_ASSET_EXTENSION))
}

/// One row of the reaction catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionEntry {
    pub gesture: GestureLabel,
    pub reaction: ReactionAsset,
    pub file: String,
    pub path: PathBuf,
    pub available: bool,
}

/// Static asset table resolved against `dir`, with on-disk availability.
pub fn catalog(dir: &Path) -> Vec<ReactionEntry> {
    REACTION_ASSETS
        .iter()
        .map(|&asset| {
            let path = asset_path(dir, asset);
            ReactionEntry {
                gesture: asset.gesture(),
                reaction: asset,
                file: format!("{}.{}", asset.id(), REACTION_ASSET_EXTENSION),
                available: path.is_file(),
                path,
            }
        })
        .collect()
}

/// Reaction images decoded once at session start.
///
/// Assets that fail to load are reported once (log warning plus
/// [`missing`](Self::missing)) and afterwards simply have no image.
pub struct ReactionLibrary {
    images: HashMap<ReactionAsset, Frame>,
    missing: Vec<SessionError>,
}

impl ReactionLibrary {
    pub fn load(dir: &Path) -> Self {
        let mut images = HashMap::new();
        let mut missing = Vec::new();

        for &asset in REACTION_ASSETS {
            let path = asset_path(dir, asset);
            match image::open(&path) {
                Ok(img) => {
                    images.insert(asset, Frame::from_rgb_image(img.into_rgb8()));
                }
                Err(e) => {
                    let err = SessionError::AssetMissing {
                        asset,
                        path,
                        reason: e.to_string(),
                    };
                    log::warn!("{err}");
                    missing.push(err);
                }
            }
        }

        Self { images, missing }
    }

    /// Library with no images at all (every reaction displays nothing).
    pub fn empty() -> Self {
        Self {
            images: HashMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn with_image(mut self, asset: ReactionAsset, image: Frame) -> Self {
        self.images.insert(asset, image);
        self
    }

    pub fn get(&self, asset: ReactionAsset) -> Option<&Frame> {
        self.images.get(&asset)
    }

    pub fn missing(&self) -> &[SessionError] {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_asset(dir: &Path, asset: ReactionAsset, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        img.save(asset_path(dir, asset)).unwrap();
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(
            asset_path(Path::new("assets"), ReactionAsset::Head),
            PathBuf::from("assets/reaction_head.jpg")
        );
    }

    #[test]
    fn test_load_all_present() {
        let dir = tempfile::tempdir().unwrap();
        for &asset in REACTION_ASSETS {
            write_asset(dir.path(), asset, 16, 8);
        }
        let lib = ReactionLibrary::load(dir.path());
        assert!(lib.missing().is_empty());
        let thumb = lib.get(ReactionAsset::Thumb).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (16, 8));
    }

    #[test]
    fn test_missing_asset_is_reported_once_and_has_no_image() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), ReactionAsset::Thumb, 4, 4);
        write_asset(dir.path(), ReactionAsset::Point, 4, 4);

        let lib = ReactionLibrary::load(dir.path());
        assert!(lib.get(ReactionAsset::Head).is_none());
        assert_eq!(lib.missing().len(), 1);
        assert!(matches!(
            lib.missing()[0],
            SessionError::AssetMissing {
                asset: ReactionAsset::Head,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_asset_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(asset_path(dir.path(), ReactionAsset::Point), b"not a jpeg").unwrap();
        let lib = ReactionLibrary::load(dir.path());
        assert!(lib.get(ReactionAsset::Point).is_none());
        assert_eq!(lib.missing().len(), 3);
    }

    #[test]
    fn test_catalog_reports_availability() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), ReactionAsset::Point, 4, 4);

        let entries = catalog(dir.path());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].gesture, GestureLabel::ThumbsUp);
        assert_eq!(entries[0].file, "reaction_thumb.jpg");
        assert!(!entries[0].available);
        assert_eq!(entries[1].reaction, ReactionAsset::Point);
        assert!(entries[1].available);
        assert_eq!(entries[2].path, dir.path().join("reaction_head.jpg"));
    }
}
