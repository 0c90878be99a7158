//! Configuration structures for Chalkboard.
//!
//! This module provides TOML-based configuration with a precedence system:
//! - Bundled defaults (include_str! from chalkboard.toml)
//! - User overrides (./chalkboard.toml or ~/.config/chalkboard/chalkboard.toml)
//! with user values taking precedence.

use crate::Tier;
use chalkboard_error::{ChalkboardError, ChalkboardResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Model-specific rate limit overrides.
///
/// These override the tier-level defaults for specific models.
/// All fields are optional - only specified fields override tier defaults.
///
/// # Example
///
/// ```toml
/// [providers.gemini.tiers.free.models."veo-2.0-generate-001"]
/// rpm = 2
/// rpd = 50
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,

    /// Requests per day limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Configuration for a specific API tier.
///
/// This struct implements the `Tier` trait and can be loaded from TOML
/// configuration. All fields are optional, where `None` indicates
/// unlimited/not applicable.
///
/// # Tier-Level Defaults
///
/// ```toml
/// [providers.gemini.tiers.free]
/// name = "Free"
/// rpm = 10
/// tpm = 250_000
/// rpd = 250
/// max_concurrent = 1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Tier 1")
    pub name: String,

    /// Requests per minute limit (tier-level default)
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (tier-level default)
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Requests per day limit (tier-level default)
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (tier-level default)
    #[serde(default)]
    pub max_concurrent: Option<u32>,

    /// Model-specific rate limit overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Get a tier configuration with model-specific overrides applied.
    ///
    /// If the model has specific rate limit overrides in the configuration,
    /// they will override the tier-level defaults. Otherwise, returns the
    /// tier-level defaults.
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        if let Some(model_config) = self.models.get(model_name) {
            TierConfig {
                name: self.name.clone(),
                rpm: model_config.rpm.or(self.rpm),
                tpm: model_config.tpm.or(self.tpm),
                rpd: model_config.rpd.or(self.rpd),
                max_concurrent: model_config.max_concurrent.or(self.max_concurrent),
                models: HashMap::new(),
            }
        } else {
            self.clone()
        }
    }
}

/// Configuration for a specific provider.
///
/// Contains the default tier name and a map of tier configurations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// Roster storage selection.
///
/// The backend is chosen here, once, and never by conditionals in callers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RosterConfig {
    /// Storage backend name: "memory" or "document"
    pub backend: String,

    /// Base directory for the document backend
    #[serde(default)]
    pub path: Option<String>,
}

/// Realtime bridge configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LiveConfig {
    /// Address the bridge listener binds to
    pub bind: String,

    /// Live API model to open upstream sessions against
    #[serde(default)]
    pub model: Option<String>,
}

/// Top-level Chalkboard configuration.
///
/// Loads configuration from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from chalkboard.toml)
/// 2. User override (~/.config/chalkboard/chalkboard.toml, then ./chalkboard.toml)
///
/// # Example
///
/// ```no_run
/// use chalkboard_rate_limit::ChalkboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ChalkboardConfig::load()?;
/// let tier = config.get_tier("gemini", Some("free")).unwrap();
/// println!("Gemini free tier RPM: {:?}", tier.rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ChalkboardConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Roster storage selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<RosterConfig>,

    /// Realtime bridge configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveConfig>,
}

impl ChalkboardConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ChalkboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ChalkboardError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ChalkboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override
    /// earlier):
    /// 1. Bundled defaults (chalkboard.toml shipped with library)
    /// 2. User config in home directory (~/.config/chalkboard/chalkboard.toml)
    /// 3. User config in current directory (./chalkboard.toml)
    ///
    /// User config files are optional and will be silently skipped if not
    /// found.
    #[instrument]
    pub fn load() -> ChalkboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../chalkboard.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/chalkboard/chalkboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("chalkboard").required(false));

        builder
            .build()
            .map_err(|e| {
                ChalkboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ChalkboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Get tier configuration for a provider.
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider name (e.g., "gemini")
    /// * `tier_name` - Optional tier name (uses provider's default if None)
    ///
    /// # Returns
    ///
    /// Returns `Some(TierConfig)` if found, `None` otherwise.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_override_wins_over_tier_default() {
        let toml = r#"
            name = "Free"
            rpm = 10
            tpm = 250000
            rpd = 250
            max_concurrent = 1

            [models."veo-2.0-generate-001"]
            rpm = 2
            rpd = 50
        "#;

        let tier: TierConfig = toml::from_str(toml).unwrap();
        let video = tier.for_model("veo-2.0-generate-001");
        assert_eq!(video.rpm, Some(2));
        assert_eq!(video.rpd, Some(50));
        // Unspecified fields fall back to the tier default
        assert_eq!(video.tpm, Some(250_000));
        assert_eq!(video.max_concurrent, Some(1));

        let text = tier.for_model("gemini-2.0-flash");
        assert_eq!(text.rpm, Some(10));
    }
}
