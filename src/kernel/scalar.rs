//! Scalar kernels for score evaluation.

use crate::kernel::{Kernel, WindowStats};
use crate::template::TemplatePlan;
use crate::util::{TagMatchError, TagMatchResult};

/// Normalized correlation coefficient (primary metric).
pub struct CcoeffNormedScalar;

/// Normalized cross-correlation (secondary metric).
pub struct CcorrNormedScalar;

/// Normalized squared difference, reported as `1 - distance` (tertiary metric).
pub struct SqdiffNormedScalar;

impl Kernel for CcoeffNormedScalar {
    fn check_plan(plan: &TemplatePlan) -> TagMatchResult<()> {
        if plan.var_t() <= 1e-8 {
            return Err(TagMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }
        Ok(())
    }

    fn score_window(plan: &TemplatePlan, window: WindowStats, dot: f64) -> Option<f32> {
        // Σ (t - mean_t) · I
        let centered = dot - plan.mean() * window.sum;
        let score = centered / (plan.var_t() * window.var).sqrt();
        score.is_finite().then(|| score.clamp(-1.0, 1.0) as f32)
    }
}

impl Kernel for CcorrNormedScalar {
    fn check_plan(plan: &TemplatePlan) -> TagMatchResult<()> {
        if plan.sum_sq() <= 0.0 {
            return Err(TagMatchError::DegenerateTemplate {
                reason: "zero energy",
            });
        }
        Ok(())
    }

    fn score_window(plan: &TemplatePlan, window: WindowStats, dot: f64) -> Option<f32> {
        let score = dot / (plan.sum_sq() * window.sum_sq).sqrt();
        score.is_finite().then(|| score.clamp(-1.0, 1.0) as f32)
    }
}

impl Kernel for SqdiffNormedScalar {
    fn check_plan(plan: &TemplatePlan) -> TagMatchResult<()> {
        CcorrNormedScalar::check_plan(plan)
    }

    fn score_window(plan: &TemplatePlan, window: WindowStats, dot: f64) -> Option<f32> {
        let distance =
            (plan.sum_sq() - 2.0 * dot + window.sum_sq).max(0.0) / (plan.sum_sq() * window.sum_sq).sqrt();
        let similarity = 1.0 - distance;
        similarity.is_finite().then_some(similarity as f32)
    }
}
