//! Run-level configuration: the policy switch and the knobs of one analysis.

use crate::search::SearchConfig;
use crate::size::SizePolicy;
use crate::threshold::ThresholdConfig;
use crate::util::{TagMatchError, TagMatchResult};

/// Preprocessing and matching strategy, selected once per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Grayscale only, single-shot correlation, fixed threshold.
    #[default]
    Simple,
    /// Full denoise/enhance/sharpen chain, scale and rotation grid, all
    /// metrics, quality-adaptive threshold.
    HighQuality,
}

/// Configuration for one analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Preprocessing, search and threshold strategy.
    pub policy: Policy,
    /// Scale/rotation grid used by [`Policy::HighQuality`].
    pub search: SearchConfig,
    /// Fixed and adaptive thresholds.
    pub threshold: ThresholdConfig,
    /// Resolution tiers and their threshold multipliers.
    pub size: SizePolicy,
    /// Maximum number of tags reported.
    pub result_cap: usize,
    /// Score catalog entries on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Simple,
            search: SearchConfig::default(),
            threshold: ThresholdConfig::default(),
            size: SizePolicy::default(),
            result_cap: 5,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    /// Validates every nested section.
    pub fn validate(&self) -> TagMatchResult<()> {
        if self.result_cap == 0 {
            return Err(TagMatchError::InvalidConfig("result_cap must be >= 1"));
        }
        self.search.validate()?;
        self.threshold.validate()?;
        self.size.validate()
    }
}
