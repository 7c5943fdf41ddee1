//! Capture resolution tiers and the threshold multipliers they imply.

use crate::util::{TagMatchError, TagMatchResult};

/// Coarse classification of a capture's resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeTier {
    /// Below the minimum resolution.
    TooSmall,
    /// At least the minimum but below the recommended resolution.
    Acceptable,
    /// At or above the recommended resolution.
    Good,
}

impl SizeTier {
    /// User-facing suggestion for this tier, if any.
    pub fn advice(self) -> Option<&'static str> {
        match self {
            SizeTier::TooSmall => {
                Some("window is below the minimum size; enlarge it for reliable recognition")
            }
            SizeTier::Acceptable => Some("window is usable but small; enlarging it improves accuracy"),
            SizeTier::Good => None,
        }
    }
}

/// Resolution bounds and per-tier threshold multipliers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizePolicy {
    /// Captures narrower than this are [`SizeTier::TooSmall`].
    pub min_width: u32,
    /// Captures shorter than this are [`SizeTier::TooSmall`].
    pub min_height: u32,
    /// Captures at least this wide (and tall enough) are [`SizeTier::Good`].
    pub recommended_width: u32,
    /// Captures at least this tall (and wide enough) are [`SizeTier::Good`].
    pub recommended_height: u32,
    /// Multiplier for [`SizeTier::TooSmall`].
    pub small_multiplier: f32,
    /// Multiplier for [`SizeTier::Acceptable`].
    pub acceptable_multiplier: f32,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            recommended_width: 1024,
            recommended_height: 768,
            small_multiplier: 0.7,
            acceptable_multiplier: 0.85,
        }
    }
}

impl SizePolicy {
    /// Classifies a capture of `width` x `height`.
    pub fn classify(&self, width: u32, height: u32) -> SizeTier {
        if width < self.min_width || height < self.min_height {
            SizeTier::TooSmall
        } else if width < self.recommended_width || height < self.recommended_height {
            SizeTier::Acceptable
        } else {
            SizeTier::Good
        }
    }

    /// Threshold multiplier for `tier`.
    pub fn multiplier(&self, tier: SizeTier) -> f32 {
        match tier {
            SizeTier::TooSmall => self.small_multiplier,
            SizeTier::Acceptable => self.acceptable_multiplier,
            SizeTier::Good => 1.0,
        }
    }

    /// Rejects inverted bounds and non-positive multipliers.
    pub fn validate(&self) -> TagMatchResult<()> {
        if self.min_width > self.recommended_width || self.min_height > self.recommended_height {
            return Err(TagMatchError::InvalidConfig(
                "minimum resolution must not exceed the recommended resolution",
            ));
        }
        let valid = |m: f32| m.is_finite() && m > 0.0;
        if !valid(self.small_multiplier) || !valid(self.acceptable_multiplier) {
            return Err(TagMatchError::InvalidConfig("tier multipliers must be finite and > 0"));
        }
        Ok(())
    }
}

/// Classifies `width` x `height` with the default 800x600 / 1024x768 bounds.
pub fn classify_size(width: u32, height: u32) -> SizeTier {
    SizePolicy::default().classify(width, height)
}
