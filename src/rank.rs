//! Ranking of catalog entries against one target.
//!
//! Every entry is scored once. A candidate survives when its score strictly
//! exceeds its tier-adjusted cutoff; survivors are sorted by descending score
//! (ties keep catalog order), truncated to the result cap, and finally
//! restricted to labels of the known vocabulary.

use crate::cancel::CancelToken;
use crate::catalog::{is_known_tag, Catalog, CatalogEntry};
use crate::config::{AnalysisConfig, Policy};
use crate::image::RasterImage;
use crate::quality::QualityProfile;
use crate::search::{Searcher, TagScore};
use crate::size::SizeTier;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{TagMatchError, TagMatchResult};

/// A scored catalog entry and the cutoff it must beat.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Tag label of the catalog entry.
    pub tag: String,
    /// Best similarity found for the entry.
    pub score: f32,
    /// Tier-adjusted threshold for this entry.
    pub cutoff: f32,
}

impl Candidate {
    /// Returns true when the score strictly exceeds the cutoff.
    pub fn passes(&self) -> bool {
        self.score > self.cutoff
    }
}

/// Filters, orders, caps and vocabulary-checks scored candidates.
pub fn select_tags(candidates: Vec<Candidate>, result_cap: usize) -> Vec<TagScore> {
    let mut kept: Vec<TagScore> = candidates
        .into_iter()
        .filter(Candidate::passes)
        .map(|c| TagScore {
            tag: c.tag,
            score: c.score,
        })
        .collect();
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept.truncate(result_cap);
    kept.retain(|t| {
        let known = is_known_tag(&t.tag);
        if !known {
            trace_warn!("unknown_tag_dropped", tag = t.tag);
        }
        known
    });
    kept
}

/// Scores a catalog against a target under one configuration.
#[derive(Clone, Debug)]
pub struct Ranker<'a> {
    cfg: &'a AnalysisConfig,
    tier: Option<SizeTier>,
    cancel: Option<CancelToken>,
}

struct RunContext {
    searcher: Searcher,
    profile: Option<QualityProfile>,
    multiplier: f32,
}

impl<'a> Ranker<'a> {
    /// Creates a ranker; the tier defaults to the target's own size.
    pub fn new(cfg: &'a AnalysisConfig) -> Self {
        Self {
            cfg,
            tier: None,
            cancel: None,
        }
    }

    /// Uses `tier` instead of classifying the target's own dimensions.
    pub fn with_tier(mut self, tier: SizeTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Checks `token` between catalog entries.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Scores every entry, in catalog order.
    pub fn candidates(&self, target: &RasterImage, catalog: &Catalog) -> TagMatchResult<Vec<Candidate>> {
        let tier = self
            .tier
            .unwrap_or_else(|| self.cfg.size.classify(target.width(), target.height()));
        let _span = trace_span!("rank", entries = catalog.len()).entered();

        let profile = match self.cfg.policy {
            Policy::Simple => None,
            Policy::HighQuality => match QualityProfile::measure(target) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    trace_warn!("quality_profile_failed", error = err);
                    None
                }
            },
        };
        let ctx = RunContext {
            searcher: Searcher::new(target, self.cfg.policy, &self.cfg.search),
            profile,
            multiplier: self.cfg.size.multiplier(tier),
        };

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return self.candidates_par(&ctx, catalog);
        }

        let mut out = Vec::with_capacity(catalog.len());
        for entry in catalog.iter() {
            self.check_cancelled()?;
            out.push(self.score_entry(&ctx, entry));
        }
        Ok(out)
    }

    #[cfg(feature = "rayon")]
    fn candidates_par(&self, ctx: &RunContext, catalog: &Catalog) -> TagMatchResult<Vec<Candidate>> {
        use rayon::prelude::*;

        catalog
            .entries()
            .par_iter()
            .map(|entry| {
                self.check_cancelled()?;
                Ok(self.score_entry(ctx, entry))
            })
            .collect()
    }

    /// Returns the selected tags, best first.
    pub fn rank(&self, target: &RasterImage, catalog: &Catalog) -> TagMatchResult<Vec<TagScore>> {
        let candidates = self.candidates(target, catalog)?;
        let selected = select_tags(candidates, self.cfg.result_cap);
        trace_event!("rank_selected", count = selected.len());
        Ok(selected)
    }

    fn check_cancelled(&self) -> TagMatchResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(TagMatchError::Cancelled),
            _ => Ok(()),
        }
    }

    fn score_entry(&self, ctx: &RunContext, entry: &CatalogEntry) -> Candidate {
        let threshold = &self.cfg.threshold;
        let (score, base) = match entry.template() {
            Ok(template) => {
                let score = ctx.searcher.score(&template).score;
                let base = threshold.base_cutoff(self.cfg.policy, ctx.profile.as_ref(), template.image());
                (score, base)
            }
            Err(err) => {
                trace_warn!("template_load_failed", tag = entry.tag(), error = err);
                let base = match self.cfg.policy {
                    Policy::Simple => threshold.search,
                    Policy::HighQuality => threshold.adaptive.base,
                };
                (0.0, base)
            }
        };
        let cutoff = base * ctx.multiplier;
        trace_event!("tag_scored", tag = entry.tag(), score = score, cutoff = cutoff);
        if score > cutoff && score <= threshold.accept {
            trace_event!("low_confidence_tag", tag = entry.tag(), score = score);
        }
        Candidate {
            tag: entry.tag().to_owned(),
            score,
            cutoff,
        }
    }
}

/// Ranks `catalog` against `target`, classifying the target's own size.
pub fn rank(target: &RasterImage, catalog: &Catalog, cfg: &AnalysisConfig) -> Vec<TagScore> {
    // Cancellation is the only error and no token is attached.
    Ranker::new(cfg).rank(target, catalog).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{select_tags, Candidate};

    fn cand(tag: &str, score: f32, cutoff: f32) -> Candidate {
        Candidate {
            tag: tag.to_owned(),
            score,
            cutoff,
        }
    }

    #[test]
    fn equal_score_and_cutoff_is_rejected() {
        assert!(!cand("火力", 0.3, 0.3).passes());
        assert!(cand("火力", 0.31, 0.3).passes());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let out = select_tags(
            vec![cand("火力", 0.8, 0.3), cand("防御", 0.9, 0.3), cand("生存", 0.8, 0.3)],
            5,
        );
        let tags: Vec<_> = out.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["防御", "火力", "生存"]);
    }
}
