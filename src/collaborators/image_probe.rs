use std::path::Path;

use anyhow::{Context, Result};
use image::ImageReader;
use tracing::warn;

use crate::error::AdvisoryError;

/// Whether an image can be shown, as reported by the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAvailability {
    Available { width: u32, height: u32 },
    Missing,
    Undecodable,
}

/// Where a probed image is displayed; selects the placeholder wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Image,
    Scene,
    Crop,
}

impl ImageAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Placeholder text shown instead of the image, if it cannot be shown.
    pub fn placeholder(&self, kind: TileKind) -> Option<&'static str> {
        match (self, kind) {
            (Self::Available { .. }, _) => None,
            (Self::Missing, TileKind::Image) => Some("Image\nNot Found"),
            (Self::Undecodable, TileKind::Image) => Some("Image\nUnavailable"),
            (Self::Missing, TileKind::Scene) => Some("Scene Image\nNot Found"),
            (Self::Undecodable, TileKind::Scene) => Some("Scene Image\nUnavailable"),
            (Self::Missing, TileKind::Crop) => Some("No crop available"),
            (Self::Undecodable, TileKind::Crop) => Some("Image not available"),
        }
    }

    /// Converts a failed probe into an advisory error for the affected tile.
    pub fn check(self, path: &Path) -> Result<(u32, u32), AdvisoryError> {
        match self {
            Self::Available { width, height } => Ok((width, height)),
            Self::Missing | Self::Undecodable => Err(AdvisoryError::ImageUnavailable {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reports whether an image file can be displayed.
pub trait ImageProbe {
    fn probe(&self, path: &Path) -> ImageAvailability;

    /// Probes an optional path; an absent path counts as missing.
    fn probe_optional(&self, path: Option<&Path>) -> ImageAvailability {
        match path {
            Some(path) => self.probe(path),
            None => ImageAvailability::Missing,
        }
    }
}

/// Probes images by reading their header with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingProbe;

impl ImageProbe for DecodingProbe {
    fn probe(&self, path: &Path) -> ImageAvailability {
        if !path.is_file() {
            return ImageAvailability::Missing;
        }
        match read_dimensions(path) {
            Ok((width, height)) => ImageAvailability::Available { width, height },
            Err(e) => {
                warn!(?path, error = ?e, "Image not decodable");
                ImageAvailability::Undecodable
            }
        }
    }
}

pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?
        .with_guessed_format()
        .context("Failed to guess image format")?;
    reader
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // Minimal valid 1x1 PNG.
    const PNG_1X1: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x0F, 0x00, 0x00, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_probe_available() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ok.png");
        fs::write(&path, PNG_1X1).unwrap();

        let availability = DecodingProbe.probe(&path);
        assert_eq!(
            availability,
            ImageAvailability::Available {
                width: 1,
                height: 1
            }
        );
        assert_eq!(availability.placeholder(TileKind::Scene), None);
    }

    #[test]
    fn test_probe_missing() {
        let dir = tempdir().unwrap();
        let availability = DecodingProbe.probe(&dir.path().join("absent.jpg"));
        assert_eq!(availability, ImageAvailability::Missing);
        assert_eq!(
            availability.placeholder(TileKind::Image),
            Some("Image\nNot Found")
        );
    }

    #[test]
    fn test_probe_undecodable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.jpg");
        fs::write(&path, b"definitely not an image").unwrap();

        let availability = DecodingProbe.probe(&path);
        assert_eq!(availability, ImageAvailability::Undecodable);
        assert_eq!(
            availability.placeholder(TileKind::Scene),
            Some("Scene Image\nUnavailable")
        );
        assert!(matches!(
            availability.check(&path),
            Err(AdvisoryError::ImageUnavailable { .. })
        ));
    }

    #[test]
    fn test_probe_optional_none_is_missing() {
        let availability = DecodingProbe.probe_optional(None);
        assert_eq!(
            availability.placeholder(TileKind::Crop),
            Some("No crop available")
        );
    }
}
