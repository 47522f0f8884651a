//! The lossy encoder quality knob.
//!
//! Quality is an integer percentage in `[10, 100]` on a grid of 5, matching
//! the slider the UI offers. Anything else is rejected at construction so the
//! encoder never sees an unexpected value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Quality`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityError {
    /// Value is outside `[Quality::MIN, Quality::MAX]`
    #[error("Quality {value} is out of range ({min}-{max})", min = Quality::MIN, max = Quality::MAX)]
    OutOfRange { value: u8 },

    /// Value is not a multiple of `Quality::STEP`
    #[error("Quality {value} is not a multiple of {step}", step = Quality::STEP)]
    OffStep { value: u8 },
}

/// Encoder quality as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest accepted quality.
    pub const MIN: u8 = 10;
    /// Highest accepted quality.
    pub const MAX: u8 = 100;
    /// Slider granularity.
    pub const STEP: u8 = 5;
    /// Quality selected when nothing else has been chosen.
    pub const DEFAULT: Quality = Quality(80);

    /// Quick-pick values offered next to the slider, best first.
    pub const PRESETS: [Quality; 5] = [
        Quality(95),
        Quality(85),
        Quality(70),
        Quality(50),
        Quality(30),
    ];

    /// Create a quality value, validating range and step.
    pub fn new(value: u8) -> Result<Self, QualityError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(QualityError::OutOfRange { value });
        }
        if value % Self::STEP != 0 {
            return Err(QualityError::OffStep { value });
        }
        Ok(Self(value))
    }

    /// The raw percentage.
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Descriptive tier for display.
    pub fn tier(self) -> QualityTier {
        QualityTier::from(self)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = QualityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Human-facing quality bands shown next to the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    /// 90 and above.
    Maximum,
    /// 80 to 89.
    High,
    /// 60 to 79.
    Medium,
    /// 40 to 59.
    Low,
    /// Below 40.
    Minimum,
}

impl QualityTier {
    /// Display label for this tier.
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Maximum => "Maximum quality",
            QualityTier::High => "High quality",
            QualityTier::Medium => "Medium quality",
            QualityTier::Low => "Low quality",
            QualityTier::Minimum => "Minimum quality",
        }
    }

    /// Traffic-light indicator used to color the label.
    pub fn indicator(self) -> QualityIndicator {
        match self {
            QualityTier::Maximum | QualityTier::High => QualityIndicator::Good,
            QualityTier::Medium => QualityIndicator::Fair,
            QualityTier::Low | QualityTier::Minimum => QualityIndicator::Poor,
        }
    }
}

impl From<Quality> for QualityTier {
    fn from(quality: Quality) -> Self {
        match quality.value() {
            90.. => QualityTier::Maximum,
            80..=89 => QualityTier::High,
            60..=79 => QualityTier::Medium,
            40..=59 => QualityTier::Low,
            _ => QualityTier::Minimum,
        }
    }
}

/// Coarse color hint for a [`QualityTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityIndicator {
    Good,
    Fair,
    Poor,
}
