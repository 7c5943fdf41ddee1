//! Raw template/window dot products over every valid placement.

use crate::kernel::PreparedTarget;
use crate::template::TemplatePlan;

/// `Σ t(i, j) · I(x + i, y + j)` for every top-left placement `(x, y)`,
/// row-major over `width x height` placements.
#[derive(Clone, Debug)]
pub struct DotMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl DotMap {
    pub(crate) fn from_values(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    /// Direct summation; cost is placements times template area.
    ///
    /// The template must fit inside the target.
    pub fn direct(target: &PreparedTarget, plan: &TemplatePlan) -> Self {
        let width = target.width() - plan.width() + 1;
        let height = target.height() - plan.height() + 1;
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let mut dot = 0.0f64;
                for ty in 0..plan.height() {
                    let img_row = &target.row(y + ty)[x..x + plan.width()];
                    for (&t, &value) in plan.row(ty).iter().zip(img_row) {
                        dot += t * f64::from(value);
                    }
                }
                values.push(dot);
            }
        }
        Self::from_values(width, height, values)
    }

    /// Number of placements along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of placements along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the dot product at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }
}
