//! Geometric search: scoring one template against one target.
//!
//! Under [`Policy::HighQuality`] the preprocessed template is resized to every
//! scale of the grid (skipping sizes that collapse to zero or exceed the
//! target), rotated to every angle about its center, and scored with every
//! metric. A grid point's score is the maximum over metrics that produced a
//! value; the template's score is the maximum over all grid points, or 0.0 if
//! none was evaluable.
//!
//! Under [`Policy::Simple`] the search is single-shot: grayscale only, scale
//! 1.0, angle 0, correlation coefficient only.

mod grid;

pub use grid::{DEFAULT_ANGLES_DEG, DEFAULT_SCALES};

use crate::config::Policy;
use crate::image::raster::scaled_dims;
use crate::image::RasterImage;
use crate::kernel::{Metric, PreparedTarget, ScanParams};
use crate::preprocess::{preprocess, preprocess_template};
use crate::template::rotate::rotate_gray_bilinear;
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{TagMatchError, TagMatchResult};
use image::imageops::{self, FilterType};
use image::GrayImage;
use std::borrow::Cow;

/// Configuration of the scale/rotation grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Template scale factors, ascending.
    pub scales: Vec<f32>,
    /// Template rotations in degrees.
    pub angles_deg: Vec<f32>,
    /// Fill value for corners uncovered by rotation.
    pub fill_value: u8,
    /// Windows with variance at or below this are not scored by any metric.
    pub min_var_i: f64,
    /// Scan placements row-parallel (requires the `rayon` feature).
    pub parallel_scan: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES.to_vec(),
            angles_deg: DEFAULT_ANGLES_DEG.to_vec(),
            fill_value: 0,
            min_var_i: ScanParams::default().min_var_i,
            parallel_scan: false,
        }
    }
}

impl SearchConfig {
    /// Checks grid values.
    pub fn validate(&self) -> TagMatchResult<()> {
        grid::check_scales(&self.scales)?;
        grid::check_angles(&self.angles_deg)?;
        if !self.min_var_i.is_finite() || self.min_var_i < 0.0 {
            return Err(TagMatchError::InvalidConfig("min_var_i must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Best similarity found for one tag.
#[derive(Clone, Debug, PartialEq)]
pub struct TagScore {
    /// Tag label.
    pub tag: String,
    /// Maximum similarity over the search grid.
    pub score: f32,
}

/// A target prepared once and scored against many templates.
pub struct Searcher {
    policy: Policy,
    cfg: SearchConfig,
    target: TagMatchResult<PreparedTarget>,
}

impl Searcher {
    /// Preprocesses `target` under `policy` and builds its window statistics.
    pub fn new(target: &RasterImage, policy: Policy, cfg: &SearchConfig) -> Self {
        let normalized = preprocess(target, policy);
        let prepared = PreparedTarget::new(normalized.to_gray());
        if let Err(err) = &prepared {
            trace_warn!("target_unusable", error = err);
        }
        Self {
            policy,
            cfg: cfg.clone(),
            target: prepared,
        }
    }

    /// Returns the policy this searcher was prepared with.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Scores `template`; any failure degrades to 0.0.
    pub fn score(&self, template: &Template) -> TagScore {
        let score = match self.best_similarity(template) {
            Ok(Some(score)) => score,
            Ok(None) => 0.0,
            Err(err) => {
                trace_warn!("search_failed", tag = template.name(), error = err);
                0.0
            }
        };
        trace_event!("tag_score", score = score);
        TagScore {
            tag: template.name().to_owned(),
            score,
        }
    }

    /// Returns the best similarity, `None` when no grid point was evaluable.
    pub fn best_similarity(&self, template: &Template) -> TagMatchResult<Option<f32>> {
        let target = self.target.as_ref().map_err(|err| err.clone())?;
        let tpl = preprocess_template(template.image(), self.policy).to_gray();
        match self.policy {
            Policy::Simple => self.single_shot(target, &tpl),
            Policy::HighQuality => self.grid(target, &tpl),
        }
    }

    fn scan_params(&self) -> ScanParams {
        ScanParams {
            min_var_i: self.cfg.min_var_i,
        }
    }

    fn single_shot(&self, target: &PreparedTarget, tpl: &GrayImage) -> TagMatchResult<Option<f32>> {
        let plan = TemplatePlan::from_gray(tpl)?;
        let dots = target.dots(&plan)?;
        Metric::CcoeffNormed.best_in_map(target, &plan, &dots, self.scan_params(), self.cfg.parallel_scan)
    }

    fn grid(&self, target: &PreparedTarget, tpl: &GrayImage) -> TagMatchResult<Option<f32>> {
        let _span = trace_span!(
            "grid_search",
            scales = self.cfg.scales.len(),
            angles = self.cfg.angles_deg.len()
        )
        .entered();

        let mut best: Option<f32> = None;
        for &scale in &self.cfg.scales {
            let scaled = if scale == 1.0 {
                Cow::Borrowed(tpl)
            } else {
                let (width, height) = scaled_dims(tpl.width(), tpl.height(), scale);
                if width == 0 || height == 0 {
                    continue;
                }
                Cow::Owned(imageops::resize(tpl, width, height, FilterType::CatmullRom))
            };
            if scaled.width() as usize > target.width() || scaled.height() as usize > target.height() {
                continue;
            }

            for &angle in &self.cfg.angles_deg {
                if let Some(score) = self.grid_point(target, &scaled, angle) {
                    best = Some(best.map_or(score, |b| b.max(score)));
                }
            }
        }
        Ok(best)
    }

    /// Scores one (scale, angle) cell; the max over metrics that succeeded.
    ///
    /// The window dot products are computed once and shared by all metrics.
    fn grid_point(&self, target: &PreparedTarget, scaled: &GrayImage, angle: f32) -> Option<f32> {
        let rotated = rotate_gray_bilinear(scaled, angle, self.cfg.fill_value);
        let plan = TemplatePlan::from_gray(&rotated).ok()?;
        let dots = match target.dots(&plan) {
            Ok(dots) => dots,
            Err(err) => {
                trace_warn!("grid_point_skipped", angle = angle, error = err);
                return None;
            }
        };

        let mut best: Option<f32> = None;
        for metric in Metric::ALL {
            match metric.best_in_map(target, &plan, &dots, self.scan_params(), self.cfg.parallel_scan) {
                Ok(Some(score)) => best = Some(best.map_or(score, |b| b.max(score))),
                Ok(None) => {}
                Err(err) => {
                    trace_warn!("metric_failed", metric = format!("{metric:?}"), error = err);
                }
            }
        }
        best
    }
}

/// Scores `template` against `target` under `policy`.
pub fn search(target: &RasterImage, template: &Template, policy: Policy, cfg: &SearchConfig) -> TagScore {
    Searcher::new(target, policy, cfg).score(template)
}

/// Single-shot grayscale search at scale 1.0, angle 0, correlation coefficient.
pub fn simple_search(target: &RasterImage, template: &Template) -> TagScore {
    search(target, template, Policy::Simple, &SearchConfig::default())
}
