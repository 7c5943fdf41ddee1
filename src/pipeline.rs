//! End-to-end analysis of one capture: crop, classify, rank.

use crate::area::crop_recruitment_area;
use crate::cancel::CancelToken;
use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::image::RasterImage;
use crate::rank::Ranker;
use crate::search::TagScore;
use crate::size::SizeTier;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{TagMatchError, TagMatchResult};

/// Result of one analysis run.
#[derive(Clone, Debug)]
pub struct Analysis {
    tags: Vec<TagScore>,
    tier: SizeTier,
    capture_width: u32,
    capture_height: u32,
    capture: RasterImage,
}

impl Analysis {
    /// Selected tags, best first.
    pub fn tags(&self) -> &[TagScore] {
        &self.tags
    }

    /// Tag labels in ranking order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.tag.as_str()).collect()
    }

    /// Report text: one tag per line.
    pub fn text(&self) -> String {
        self.tag_names().join("\n")
    }

    /// Size tier of the full capture.
    pub fn tier(&self) -> SizeTier {
        self.tier
    }

    /// Width and height of the full capture.
    pub fn capture_size(&self) -> (u32, u32) {
        (self.capture_width, self.capture_height)
    }

    /// The analyzed capture, handed back for persistence.
    pub fn capture(&self) -> &RasterImage {
        &self.capture
    }

    /// Consumes the analysis and returns the capture.
    pub fn into_capture(self) -> RasterImage {
        self.capture
    }
}

/// Runs analyses with a fixed configuration and catalog.
#[derive(Clone, Debug)]
pub struct Analyzer {
    cfg: AnalysisConfig,
    catalog: Catalog,
}

impl Analyzer {
    /// Validates `cfg` and binds it to `catalog`.
    pub fn new(cfg: AnalysisConfig, catalog: Catalog) -> TagMatchResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg, catalog })
    }

    /// Returns the bound configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.cfg
    }

    /// Returns the bound catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Analyzes `capture`; `None` fails with [`TagMatchError::NoInput`].
    pub fn analyze(&self, capture: Option<RasterImage>) -> TagMatchResult<Analysis> {
        run(&self.cfg, &self.catalog, capture, None)
    }

    /// Like [`analyze`](Self::analyze), aborting between catalog entries once
    /// `cancel` fires.
    pub fn analyze_with_cancel(
        &self,
        capture: Option<RasterImage>,
        cancel: &CancelToken,
    ) -> TagMatchResult<Analysis> {
        run(&self.cfg, &self.catalog, capture, Some(cancel))
    }
}

/// One-shot analysis of `capture` against `catalog`.
pub fn analyze(
    capture: Option<RasterImage>,
    catalog: &Catalog,
    cfg: &AnalysisConfig,
) -> TagMatchResult<Analysis> {
    cfg.validate()?;
    run(cfg, catalog, capture, None)
}

fn run(
    cfg: &AnalysisConfig,
    catalog: &Catalog,
    capture: Option<RasterImage>,
    cancel: Option<&CancelToken>,
) -> TagMatchResult<Analysis> {
    let capture = capture.ok_or(TagMatchError::NoInput)?;
    let (width, height) = (capture.width(), capture.height());
    let _span = trace_span!("analyze", width = width, height = height).entered();

    let tier = cfg.size.classify(width, height);
    trace_event!("size_tier", multiplier = cfg.size.multiplier(tier));
    if let Some(advice) = tier.advice() {
        trace_warn!("window_size", advice = advice);
    }

    // A capture too short to have a middle band has nothing to recognize.
    let tags = match crop_recruitment_area(&capture) {
        Ok(area) => {
            let mut ranker = Ranker::new(cfg).with_tier(tier);
            if let Some(token) = cancel {
                ranker = ranker.with_cancel(token.clone());
            }
            ranker.rank(&area, catalog)?
        }
        Err(err) => {
            trace_warn!("recruitment_area_empty", error = err);
            Vec::new()
        }
    };

    Ok(Analysis {
        tags,
        tier,
        capture_width: width,
        capture_height: height,
        capture,
    })
}
