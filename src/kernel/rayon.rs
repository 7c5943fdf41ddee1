//! Rayon-parallel scan helpers (feature-gated).
//!
//! Parallelizes the placement scan over rows; each worker reduces its row to a
//! single best score and the row maxima are merged afterwards, so the result
//! equals the sequential scan.

use crate::kernel::{row_best, DotMap, Kernel, PreparedTarget, ScanParams};
use crate::template::TemplatePlan;
use crate::util::TagMatchResult;
use rayon::prelude::*;

/// Row-parallel scan of a dot map returning the best similarity for kernel `K`.
pub fn best_in_map_par<K: Kernel>(
    target: &PreparedTarget,
    plan: &TemplatePlan,
    dots: &DotMap,
    params: ScanParams,
) -> TagMatchResult<Option<f32>> {
    K::check_plan(plan)?;
    let best = (0..dots.height())
        .into_par_iter()
        .map(|y| row_best::<K>(target, plan, dots, y, params))
        .reduce(
            || None,
            |a, b| match (a, b) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, None) => a,
                (None, b) => b,
            },
        );

    Ok(best)
}
