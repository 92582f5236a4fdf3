//! Run configuration and its resolution
//!
//! Every field resolves with the same priority order:
//! 1. Command-line override (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// GraphQL endpoint of the politigraph service
pub const DEFAULT_ENDPOINT: &str = "https://politigraph.wevis.info/graphql";
/// Rows requested per page
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Consecutive pages without new rows before pagination is considered stalled
pub const DEFAULT_MAX_EMPTY_LOOPS: usize = 2;
/// Pause between page requests
pub const DEFAULT_INTER_PAGE_DELAY_MS: u64 = 1000;
/// Per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Directory receiving the generated tables
pub const DEFAULT_OUTPUT_DIR: &str = "public/data/new-data";
/// Year whose vote events feed the vote tables
pub const DEFAULT_TARGET_YEAR: &str = "2025";
/// Prime-minister approval vote, left out of the per-province tables
pub const DEFAULT_EXCLUDED_EVENT_TITLE: &str = "การพิจารณาให้ความเห็นชอบบุคคลซึ่งสมควรได้รับแต่งตั้งเป็นนายกรัฐมนตรี ตามมาตรา ๑๕๙ ของรัฐธรรมนูญแห่งราชอาณาจักรไทย";
/// Post label prefix of a House of Representatives term ("MP, term N")
pub const DEFAULT_REP_TERM_PREFIX: &str = "สส. ชุดที่";
/// Character length of a well-formed term label, e.g. "สส. ชุดที่ 26"
pub const DEFAULT_REP_TERM_LABEL_WIDTH: usize = 13;

/// Environment variable naming an explicit TOML config file
pub const ENV_CONFIG_PATH: &str = "POLITIGRAPH_CONFIG";
pub const ENV_ENDPOINT: &str = "POLITIGRAPH_ENDPOINT";
pub const ENV_OUTPUT_DIR: &str = "POLITIGRAPH_OUTPUT_DIR";
pub const ENV_TARGET_YEAR: &str = "POLITIGRAPH_TARGET_YEAR";
pub const ENV_BATCH_SIZE: &str = "POLITIGRAPH_BATCH_SIZE";

/// Immutable configuration for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// GraphQL endpoint URL
    pub endpoint_url: String,
    /// Rows requested per page
    pub batch_size: usize,
    /// Consecutive no-new-row pages tolerated before stopping
    pub max_empty_loops: usize,
    /// Pause between page requests
    pub inter_page_delay: Duration,
    /// Per-request timeout (None = wait indefinitely)
    pub request_timeout: Option<Duration>,
    /// Destination directory for the output tables
    pub output_dir: PathBuf,
    /// Four-digit year matched against vote event start dates
    pub target_year: String,
    /// Vote event title excluded from the per-province tables
    pub excluded_event_title: String,
    /// Post label prefix identifying a representative term
    pub rep_term_prefix: String,
    /// Expected character length of a representative term label
    pub rep_term_label_width: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_empty_loops: DEFAULT_MAX_EMPTY_LOOPS,
            inter_page_delay: Duration::from_millis(DEFAULT_INTER_PAGE_DELAY_MS),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target_year: DEFAULT_TARGET_YEAR.to_string(),
            excluded_event_title: DEFAULT_EXCLUDED_EVENT_TITLE.to_string(),
            rep_term_prefix: DEFAULT_REP_TERM_PREFIX.to_string(),
            rep_term_label_width: DEFAULT_REP_TERM_LABEL_WIDTH,
        }
    }
}

impl RunConfig {
    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_url.trim().is_empty() {
            return Err(Error::Config("endpoint_url must not be empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.max_empty_loops == 0 {
            return Err(Error::Config("max_empty_loops must be at least 1".to_string()));
        }
        if !is_valid_year(&self.target_year) {
            return Err(Error::Config(format!(
                "target_year must be four digits, got {:?}",
                self.target_year
            )));
        }
        Ok(())
    }
}

/// Four ASCII digits
pub fn is_valid_year(year: &str) -> bool {
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

/// TOML config file schema
///
/// All fields are optional; anything left out falls through to the
/// compiled default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub endpoint_url: Option<String>,
    pub batch_size: Option<usize>,
    pub max_empty_loops: Option<usize>,
    pub inter_page_delay_ms: Option<u64>,
    /// 0 disables the timeout
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub target_year: Option<String>,
    pub excluded_event_title: Option<String>,
    pub rep_term_prefix: Option<String>,
    pub rep_term_label_width: Option<usize>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    fn apply_to(self, config: &mut RunConfig) {
        if let Some(v) = self.endpoint_url {
            config.endpoint_url = v;
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = self.max_empty_loops {
            config.max_empty_loops = v;
        }
        if let Some(ms) = self.inter_page_delay_ms {
            config.inter_page_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.target_year {
            config.target_year = v;
        }
        if let Some(v) = self.excluded_event_title {
            config.excluded_event_title = v;
        }
        if let Some(v) = self.rep_term_prefix {
            config.rep_term_prefix = v;
        }
        if let Some(v) = self.rep_term_label_width {
            config.rep_term_label_width = v;
        }
    }
}

/// Command-line overrides (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub target_year: Option<String>,
    pub batch_size: Option<usize>,
}

impl ConfigOverrides {
    fn apply_to(&self, config: &mut RunConfig) {
        if let Some(v) = &self.endpoint_url {
            config.endpoint_url = v.clone();
        }
        if let Some(v) = &self.output_dir {
            config.output_dir = v.clone();
        }
        if let Some(v) = &self.target_year {
            config.target_year = v.clone();
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
    }
}

/// Builds a [`RunConfig`] from defaults, TOML, environment and CLI
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit config file (must exist)
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve and validate the run configuration
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = RunConfig::default();

        if let Some(toml_config) = self.load_toml()? {
            toml_config.apply_to(&mut config);
        }
        apply_env(&mut config)?;
        self.overrides.apply_to(&mut config);

        config.validate()?;
        Ok(config)
    }

    /// Load the TOML layer
    ///
    /// An explicitly named file (CLI or `POLITIGRAPH_CONFIG`) must exist.
    /// The per-user default file is optional.
    fn load_toml(&self) -> Result<Option<TomlConfig>> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Loading config from {}", path.display());
            return TomlConfig::load(&path).map(Some);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                TomlConfig::load(&path).map(Some)
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(None)
            }
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(None)
            }
        }
    }
}

/// Per-user config file location, e.g. ~/.config/politigraph/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("politigraph").join("config.toml"))
}

fn apply_env(config: &mut RunConfig) -> Result<()> {
    if let Ok(v) = std::env::var(ENV_ENDPOINT) {
        config.endpoint_url = v;
    }
    if let Ok(v) = std::env::var(ENV_OUTPUT_DIR) {
        config.output_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var(ENV_TARGET_YEAR) {
        config.target_year = v;
    }
    if let Ok(v) = std::env::var(ENV_BATCH_SIZE) {
        config.batch_size = v.trim().parse().map_err(|_| {
            Error::Config(format!("{} must be a positive integer, got {:?}", ENV_BATCH_SIZE, v))
        })?;
    }
    Ok(())
}
