//! # Configuration
//!
//! Pricing, animation timing, the starting catalog, and snippet defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_TAX_RATE_BPS=825                                             │
//! │     TALLY_SNIPPET_URL=https://example.com                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5% tax, $5.00 shipping, 500/500/1500 ms, three books               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! tax_rate_bps = 500
//! shipping_fee_cents = 500
//!
//! [animation]
//! removal_delay_ms = 500
//! restore_delay_ms = 500
//! settle_delay_ms = 1500
//!
//! [[catalog]]
//! id = "BOOK-DUNE"
//! title = "Dune"
//! unit_price_cents = 999
//!
//! [snippet]
//! url = "https://github.com/nolanw/HTMLReader"
//! selector = ".repository-description"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tally_core::validation::{
    validate_catalog, validate_shipping_fee_cents, validate_tax_rate_bps,
};
use tally_core::{
    AnimationDelays, CatalogEntry, Money, Pricing, TaxRate, ValidationError,
    DEFAULT_SHIPPING_FEE_CENTS, DEFAULT_TAX_RATE_BPS,
};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "tally.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Tax and shipping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Sales tax in basis points (500 = 5%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Flat shipping fee for any non-empty cart.
    #[serde(default = "default_shipping_fee_cents")]
    pub shipping_fee_cents: i64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_shipping_fee_cents() -> i64 {
    DEFAULT_SHIPPING_FEE_CENTS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
            shipping_fee_cents: default_shipping_fee_cents(),
        }
    }
}

/// Animation phase lengths, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "default_removal_delay")]
    pub removal_delay_ms: u64,

    #[serde(default = "default_restore_delay")]
    pub restore_delay_ms: u64,

    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

fn default_removal_delay() -> u64 {
    500
}
fn default_restore_delay() -> u64 {
    500
}
fn default_settle_delay() -> u64 {
    1500
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            removal_delay_ms: default_removal_delay(),
            restore_delay_ms: default_restore_delay(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

/// Defaults for `tally snippet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetSettings {
    #[serde(default = "default_snippet_url")]
    pub url: String,

    #[serde(default = "default_snippet_selector")]
    pub selector: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_snippet_url() -> String {
    "https://github.com/nolanw/HTMLReader".to_string()
}

fn default_snippet_selector() -> String {
    ".repository-description".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("tally/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for SnippetSettings {
    fn default() -> Self {
        SnippetSettings {
            url: default_snippet_url(),
            selector: default_snippet_selector(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("BOOK-DUNE", "Dune", 999),
        CatalogEntry::new("BOOK-EMMA", "Emma", 1250),
        CatalogEntry::new("BOOK-ILIAD", "The Iliad", 1500),
    ]
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub animation: AnimationSettings,

    /// The cart's starting lines, which is also what `restore` goes back to.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CatalogEntry>,

    #[serde(default)]
    pub snippet: SnippetSettings,
}

impl Default for TallyConfig {
    fn default() -> Self {
        TallyConfig {
            pricing: PricingSettings::default(),
            animation: AnimationSettings::default(),
            catalog: default_catalog(),
            snippet: SnippetSettings::default(),
        }
    }
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    ///
    /// An explicit path that doesn't exist is an error; a missing file at
    /// the default location just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tax_rate_bps(self.pricing.tax_rate_bps)?;
        validate_shipping_fee_cents(self.pricing.shipping_fee_cents)?;
        validate_catalog(&self.catalog)?;

        if self.animation.settle_delay_ms < self.animation.restore_delay_ms {
            return Err(ConfigError::InvalidValue(
                "animation.settle_delay_ms (must not be shorter than restore_delay_ms)".into(),
            ));
        }

        if self.snippet.selector.trim().is_empty() {
            return Err(ConfigError::InvalidValue("snippet.selector".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Some(bps) = env_parse::<u32>("TALLY_TAX_RATE_BPS")? {
            debug!(bps, "Overriding tax rate from environment");
            self.pricing.tax_rate_bps = bps;
        }

        if let Some(cents) = env_parse::<i64>("TALLY_SHIPPING_FEE_CENTS")? {
            self.pricing.shipping_fee_cents = cents;
        }

        if let Some(ms) = env_parse::<u64>("TALLY_REMOVAL_DELAY_MS")? {
            self.animation.removal_delay_ms = ms;
        }

        if let Some(ms) = env_parse::<u64>("TALLY_RESTORE_DELAY_MS")? {
            self.animation.restore_delay_ms = ms;
        }

        if let Some(ms) = env_parse::<u64>("TALLY_SETTLE_DELAY_MS")? {
            self.animation.settle_delay_ms = ms;
        }

        if let Ok(url) = std::env::var("TALLY_SNIPPET_URL") {
            debug!(url = %url, "Overriding snippet URL from environment");
            self.snippet.url = url;
        }

        if let Ok(selector) = std::env::var("TALLY_SNIPPET_SELECTOR") {
            self.snippet.selector = selector;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn pricing(&self) -> Pricing {
        Pricing::new(
            TaxRate::from_bps(self.pricing.tax_rate_bps),
            Money::from_cents(self.pricing.shipping_fee_cents),
        )
    }

    pub fn delays(&self) -> AnimationDelays {
        AnimationDelays::from_millis(
            self.animation.removal_delay_ms,
            self.animation.restore_delay_ms,
            self.animation.settle_delay_ms,
        )
    }
}

/// Reads and parses an environment variable. Unset is `Ok(None)`; set but
/// unparseable is an error naming the variable.
fn env_parse<T: std::str::FromStr>(name: &str) -> ConfigResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(None),
    }
}
