//! Compression settings as passed in from the UI.

use serde::{Deserialize, Serialize};

use crate::quality::{Quality, QualityError};
use crate::surface::SurfaceLimits;

/// Plain settings object; deserialized from JavaScript as
/// `{ quality: 80, maxPixels: 1000000 }` with every field optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressSettings {
    /// Quality percentage, validated on [`CompressSettings::quality`].
    pub quality: u8,
    /// Override for the surface area limit.
    pub max_pixels: Option<u64>,
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self {
            quality: Quality::DEFAULT.value(),
            max_pixels: None,
        }
    }
}

impl CompressSettings {
    /// Validated quality.
    pub fn quality(&self) -> Result<Quality, QualityError> {
        Quality::new(self.quality)
    }

    /// Surface limits, falling back to the defaults.
    pub fn limits(&self) -> SurfaceLimits {
        self.max_pixels
            .map(SurfaceLimits::new)
            .unwrap_or_default()
    }
}
