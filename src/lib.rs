//! TagMatch recognizes recruitment tags in game captures by template matching.
//!
//! A capture is cropped to its tag strip, classified by resolution, and scored
//! against a catalog of reference icons. Scores are filtered by a fixed or
//! quality-adaptive threshold, ranked, and capped. Scoring across catalog
//! entries can run on the rayon pool via the `rayon` feature; the `tracing`
//! feature emits spans and events for each stage.

mod area;
mod cancel;
pub mod catalog;
mod config;
pub mod image;
pub mod kernel;
mod pipeline;
pub mod preprocess;
pub mod quality;
pub mod rank;
pub mod search;
mod size;
pub mod template;
pub mod threshold;
mod trace;
pub mod util;

pub use area::crop_recruitment_area;
pub use cancel::CancelToken;
pub use catalog::{Catalog, CatalogEntry, TemplateSource, DEFAULT_CATALOG, TAG_VOCABULARY};
pub use config::{AnalysisConfig, Policy};
pub use image::RasterImage;
pub use kernel::{Kernel, Metric, PreparedTarget, ScanParams};
pub use pipeline::{analyze, Analysis, Analyzer};
pub use preprocess::{preprocess, preprocess_template};
pub use quality::QualityProfile;
pub use rank::{rank, select_tags, Candidate, Ranker};
pub use search::{search, simple_search, SearchConfig, Searcher, TagScore};
pub use size::{classify_size, SizePolicy, SizeTier};
pub use template::{Template, TemplatePlan};
pub use threshold::{derive_threshold, AdaptiveThreshold, ThresholdConfig};
pub use util::{TagMatchError, TagMatchResult};
