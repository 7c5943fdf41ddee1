//! Extraction of the recruitment tag strip from a full capture.

use crate::image::RasterImage;
use crate::util::TagMatchResult;

/// Crops the vertical middle third of `capture` at full width.
///
/// Rows `h / 3 .. 2 * h / 3` (integer division) are kept. A single-row
/// capture yields an empty band and is rejected; the analysis pipeline treats
/// that as a capture with no tags.
pub fn crop_recruitment_area(capture: &RasterImage) -> TagMatchResult<RasterImage> {
    let height = capture.height();
    let top = height / 3;
    let bottom = height * 2 / 3;
    capture.crop_rows(top, bottom - top)
}
