use chrono::Local;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tagmatch::image::io::{load_raster, save_raster};
use tagmatch::{
    AdaptiveThreshold, Analysis, AnalysisConfig, Analyzer, Catalog, Policy, SearchConfig,
    SizePolicy, SizeTier, ThresholdConfig,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

const REPORT_TEXT: &str = "report.txt";
const REPORT_IMAGE: &str = "report.png";
const ERROR_LOG: &str = "error_log.txt";

#[derive(Parser, Debug)]
#[command(author, version, about = "Recruitment tag recognizer (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PolicyConfig {
    Simple,
    HighQuality,
}

impl From<PolicyConfig> for Policy {
    fn from(value: PolicyConfig) -> Self {
        match value {
            PolicyConfig::Simple => Policy::Simple,
            PolicyConfig::HighQuality => Policy::HighQuality,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    scales: Vec<f32>,
    angles_deg: Vec<f32>,
    fill_value: u8,
    min_var_i: f64,
    parallel_scan: bool,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            scales: cfg.scales,
            angles_deg: cfg.angles_deg,
            fill_value: cfg.fill_value,
            min_var_i: cfg.min_var_i,
            parallel_scan: cfg.parallel_scan,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AdaptiveJson {
    base: f32,
    gain: f32,
    min: f32,
    max: f32,
}

impl Default for AdaptiveJson {
    fn default() -> Self {
        let cfg = AdaptiveThreshold::default();
        Self {
            base: cfg.base,
            gain: cfg.gain,
            min: cfg.min,
            max: cfg.max,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ThresholdJson {
    accept: f32,
    search: f32,
    adaptive: AdaptiveJson,
}

impl Default for ThresholdJson {
    fn default() -> Self {
        let cfg = ThresholdConfig::default();
        Self {
            accept: cfg.accept,
            search: cfg.search,
            adaptive: AdaptiveJson::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SizeJson {
    min_width: u32,
    min_height: u32,
    recommended_width: u32,
    recommended_height: u32,
    small_multiplier: f32,
    acceptable_multiplier: f32,
}

impl Default for SizeJson {
    fn default() -> Self {
        let cfg = SizePolicy::default();
        Self {
            min_width: cfg.min_width,
            min_height: cfg.min_height,
            recommended_width: cfg.recommended_width,
            recommended_height: cfg.recommended_height,
            small_multiplier: cfg.small_multiplier,
            acceptable_multiplier: cfg.acceptable_multiplier,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    screenshot_path: Option<String>,
    catalog_dir: String,
    output_dir: Option<String>,
    policy: PolicyConfig,
    result_cap: usize,
    parallel: bool,
    search: SearchConfigJson,
    threshold: ThresholdJson,
    size: SizeJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screenshot_path: None,
            catalog_dir: String::new(),
            output_dir: None,
            policy: PolicyConfig::Simple,
            result_cap: AnalysisConfig::default().result_cap,
            parallel: false,
            search: SearchConfigJson::default(),
            threshold: ThresholdJson::default(),
            size: SizeJson::default(),
        }
    }
}

impl Config {
    fn analysis(self) -> AnalysisConfig {
        let adaptive = self.threshold.adaptive;
        AnalysisConfig {
            policy: self.policy.into(),
            search: SearchConfig {
                scales: self.search.scales,
                angles_deg: self.search.angles_deg,
                fill_value: self.search.fill_value,
                min_var_i: self.search.min_var_i,
                parallel_scan: self.search.parallel_scan,
            },
            threshold: ThresholdConfig {
                accept: self.threshold.accept,
                search: self.threshold.search,
                adaptive: AdaptiveThreshold {
                    base: adaptive.base,
                    gain: adaptive.gain,
                    min: adaptive.min,
                    max: adaptive.max,
                },
            },
            size: SizePolicy {
                min_width: self.size.min_width,
                min_height: self.size.min_height,
                recommended_width: self.size.recommended_width,
                recommended_height: self.size.recommended_height,
                small_multiplier: self.size.small_multiplier,
                acceptable_multiplier: self.size.acceptable_multiplier,
            },
            result_cap: self.result_cap,
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Serialize)]
struct TagRecord {
    tag: String,
    score: f32,
}

#[derive(Debug, Serialize)]
struct Output {
    tags: Vec<TagRecord>,
    text: String,
    tier: &'static str,
    advice: Option<&'static str>,
    capture_width: u32,
    capture_height: u32,
    persisted: bool,
}

fn tier_name(tier: SizeTier) -> &'static str {
    match tier {
        SizeTier::TooSmall => "too_small",
        SizeTier::Acceptable => "acceptable",
        SizeTier::Good => "good",
    }
}

/// Writes the report text and a copy of the analyzed capture into `dir`.
fn persist(analysis: &Analysis, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(REPORT_TEXT), analysis.text())?;
    save_raster(analysis.capture(), dir.join(REPORT_IMAGE))?;
    Ok(())
}

fn append_error_log(dir: &Path, message: &str) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(ERROR_LOG))?;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{timestamp}] {message}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tagmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.catalog_dir.is_empty() {
        return Err("catalog_dir must be set in the config".into());
    }

    let capture = match config.screenshot_path.as_deref() {
        Some(path) => match load_raster(path) {
            Ok(raster) => Some(raster),
            Err(err) => {
                tracing::warn!(error = %err, "screenshot unavailable");
                None
            }
        },
        None => None,
    };

    let catalog = Catalog::load(&config.catalog_dir)?;
    let output_dir = config.output_dir.clone().map(PathBuf::from);
    let analyzer = Analyzer::new(config.analysis(), catalog)?;
    let analysis = analyzer.analyze(capture)?;

    let persisted = match &output_dir {
        Some(dir) => match persist(&analysis, dir) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "failed to persist report");
                if let Err(log_err) = append_error_log(dir, &format!("report persistence failed: {err}")) {
                    tracing::error!(error = %log_err, "failed to append error log");
                }
                false
            }
        },
        None => false,
    };

    let (capture_width, capture_height) = analysis.capture_size();
    let output = Output {
        tags: analysis
            .tags()
            .iter()
            .map(|t| TagRecord {
                tag: t.tag.clone(),
                score: t.score,
            })
            .collect(),
        text: analysis.text(),
        tier: tier_name(analysis.tier()),
        advice: analysis.tier().advice(),
        capture_width,
        capture_height,
        persisted,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
