//! Correlation kernels scoring a template plan against a prepared target.
//!
//! Every kernel reports a similarity where larger is better. Distance metrics
//! convert to similarity inside the kernel (`1 - distance`).
//!
//! Scoring is split in two: a [`DotMap`] holds the raw template/window dot
//! products for every placement (computed once per template plan), and each
//! kernel turns a dot product plus the window moments into its metric. Windows
//! whose variance is at or below [`ScanParams::min_var_i`] are not scored by
//! any metric.

use crate::template::TemplatePlan;
use crate::util::TagMatchResult;

mod dots;
mod prepared;
pub mod scalar;
mod spectral;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use dots::DotMap;
pub use prepared::{PreparedTarget, WindowStats};

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Image windows with variance at or below this are skipped.
    pub min_var_i: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self { min_var_i: 1e-6 }
    }
}

/// Kernel trait for turning window statistics into a similarity.
pub trait Kernel {
    /// Rejects plans for which the metric is undefined.
    fn check_plan(plan: &TemplatePlan) -> TagMatchResult<()>;

    /// Similarity of one placement from its window moments and the raw dot
    /// product `Σ t · I`. `None` when the metric is undefined there.
    fn score_window(plan: &TemplatePlan, window: WindowStats, dot: f64) -> Option<f32>;
}

/// Scores placement `(x, y)`; flat windows yield `None`.
pub fn score_placement<K: Kernel>(
    target: &PreparedTarget,
    plan: &TemplatePlan,
    dots: &DotMap,
    x: usize,
    y: usize,
    params: ScanParams,
) -> Option<f32> {
    let window = target.window(x, y, plan.width(), plan.height());
    if window.var <= params.min_var_i {
        return None;
    }
    K::score_window(plan, window, dots.get(x, y))
}

/// Best similarity over placement row `y`.
pub(crate) fn row_best<K: Kernel>(
    target: &PreparedTarget,
    plan: &TemplatePlan,
    dots: &DotMap,
    y: usize,
    params: ScanParams,
) -> Option<f32> {
    (0..dots.width())
        .filter_map(|x| score_placement::<K>(target, plan, dots, x, y, params))
        .reduce(f32::max)
}

/// Best similarity over every placement in `dots`, or `None` when no
/// placement was evaluable.
pub fn best_in_map<K: Kernel>(
    target: &PreparedTarget,
    plan: &TemplatePlan,
    dots: &DotMap,
    params: ScanParams,
) -> TagMatchResult<Option<f32>> {
    K::check_plan(plan)?;
    Ok((0..dots.height())
        .filter_map(|y| row_best::<K>(target, plan, dots, y, params))
        .reduce(f32::max))
}

/// Similarity metrics available to the geometric search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Normalized correlation coefficient (zero-mean NCC), in `[-1, 1]`.
    CcoeffNormed,
    /// Normalized cross-correlation, in `[0, 1]` for non-negative images.
    CcorrNormed,
    /// `1 - normalized squared difference`.
    SqdiffNormed,
}

impl Metric {
    /// Primary, secondary and tertiary metrics in evaluation order.
    pub const ALL: [Metric; 3] = [Metric::CcoeffNormed, Metric::CcorrNormed, Metric::SqdiffNormed];

    /// Best similarity of this metric over a precomputed dot map.
    pub fn best_in_map(
        self,
        target: &PreparedTarget,
        plan: &TemplatePlan,
        dots: &DotMap,
        params: ScanParams,
        parallel: bool,
    ) -> TagMatchResult<Option<f32>> {
        use scalar::{CcoeffNormedScalar, CcorrNormedScalar, SqdiffNormedScalar};

        #[cfg(feature = "rayon")]
        if parallel {
            return match self {
                Metric::CcoeffNormed => rayon::best_in_map_par::<CcoeffNormedScalar>(target, plan, dots, params),
                Metric::CcorrNormed => rayon::best_in_map_par::<CcorrNormedScalar>(target, plan, dots, params),
                Metric::SqdiffNormed => rayon::best_in_map_par::<SqdiffNormedScalar>(target, plan, dots, params),
            };
        }
        #[cfg(not(feature = "rayon"))]
        let _ = parallel;

        match self {
            Metric::CcoeffNormed => best_in_map::<CcoeffNormedScalar>(target, plan, dots, params),
            Metric::CcorrNormed => best_in_map::<CcorrNormedScalar>(target, plan, dots, params),
            Metric::SqdiffNormed => best_in_map::<SqdiffNormedScalar>(target, plan, dots, params),
        }
    }
}
