//! Acceptance thresholds: fixed constants or derived from measured quality.

use crate::config::Policy;
use crate::image::RasterImage;
use crate::quality::{template_quality, template_quality_at, QualityProfile};
use crate::trace::{trace_event, trace_warn};
use crate::util::{TagMatchError, TagMatchResult};
use std::path::Path;

/// Quality-to-threshold mapping: `base + (quality - 0.5) * gain`, clamped.
///
/// The default upper clamp of 1.05 lies above the best attainable normalized
/// similarity; thresholds that high reject every candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptiveThreshold {
    /// Threshold at quality 0.5.
    pub base: f32,
    /// Threshold change per unit of quality.
    pub gain: f32,
    /// Lower clamp.
    pub min: f32,
    /// Upper clamp.
    pub max: f32,
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self {
            base: 0.85,
            gain: 0.4,
            min: 0.65,
            max: 1.05,
        }
    }
}

impl AdaptiveThreshold {
    /// Maps a combined quality score to a threshold.
    pub fn from_quality(&self, quality: f64) -> f32 {
        let raw = self.base as f64 + (quality - 0.5) * self.gain as f64;
        (raw as f32).clamp(self.min, self.max)
    }
}

/// Fixed and adaptive threshold settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdConfig {
    /// Fixed final accept/reject threshold.
    pub accept: f32,
    /// Fixed high-recall threshold used to filter search results.
    pub search: f32,
    /// Quality-adaptive threshold for high-quality runs.
    pub adaptive: AdaptiveThreshold,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            accept: 0.75,
            search: 0.3,
            adaptive: AdaptiveThreshold::default(),
        }
    }
}

impl ThresholdConfig {
    /// Rejects non-finite values and an inverted adaptive clamp.
    pub fn validate(&self) -> TagMatchResult<()> {
        let a = &self.adaptive;
        let values = [self.accept, self.search, a.base, a.gain, a.min, a.max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TagMatchError::InvalidConfig("thresholds must be finite"));
        }
        if a.min > a.max {
            return Err(TagMatchError::InvalidConfig("adaptive min must not exceed max"));
        }
        Ok(())
    }

    /// Adaptive threshold for one template given the target's profile.
    pub fn adaptive_for(&self, profile: &QualityProfile, template: &RasterImage) -> f32 {
        let quality = profile.score(template_quality(template));
        let threshold = self.adaptive.from_quality(quality);
        trace_event!("adaptive_threshold", quality = quality, threshold = threshold);
        threshold
    }

    /// Untiered filtering threshold for one template.
    ///
    /// Simple runs filter at the fixed search threshold. High-quality runs
    /// use the adaptive threshold, falling back to its base when the target
    /// could not be profiled.
    pub fn base_cutoff(
        &self,
        policy: Policy,
        profile: Option<&QualityProfile>,
        template: &RasterImage,
    ) -> f32 {
        match (policy, profile) {
            (Policy::Simple, _) => self.search,
            (Policy::HighQuality, Some(profile)) => self.adaptive_for(profile, template),
            (Policy::HighQuality, None) => self.adaptive.base,
        }
    }
}

/// Acceptance threshold for matching the template stored at `template_path`
/// against `target`.
///
/// Under [`Policy::Simple`] this is the fixed accept threshold. Under
/// [`Policy::HighQuality`] it is derived from the target's quality profile and
/// the template's quality; if the target cannot be profiled the adaptive base
/// is returned.
pub fn derive_threshold<P: AsRef<Path>>(
    target: &RasterImage,
    template_path: P,
    policy: Policy,
    cfg: &ThresholdConfig,
) -> f32 {
    match policy {
        Policy::Simple => cfg.accept,
        Policy::HighQuality => match QualityProfile::measure(target) {
            Ok(profile) => {
                let quality = profile.score(template_quality_at(template_path));
                cfg.adaptive.from_quality(quality)
            }
            Err(err) => {
                trace_warn!("threshold_fallback", error = err);
                cfg.adaptive.base
            }
        },
    }
}
