//! Run configuration
//!
//! Settings come from an optional TOML file, then environment overrides.
//! Secrets (API keys) are only ever read from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use herald_ai::{AiConfig, AiProvider};
use serde::Deserialize;

use crate::error::{ChangelogError, Result};

pub const CONFIG_FILE_NAME: &str = "herald.toml";

const LINEAR_API_KEY_ENV: &str = "LINEAR_API_KEY";

/// Issue tracker settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinearSettings {
    pub team_id: Option<String>,
    pub api_url: Option<String>,
}

/// Text-generation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub provider: AiProvider,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Everything a run needs except secrets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub changelog_path: PathBuf,
    pub label: String,
    /// IANA zone that decides which calendar day an issue belongs to
    pub timezone: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Product name used in the generation directive
    pub product_name: String,
    pub linear: LinearSettings,
    pub ai: AiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            changelog_path: PathBuf::from("changelog.mdx"),
            label: "feature".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            page_size: 100,
            request_timeout_secs: 120,
            product_name: "our product".to_string(),
            linear: LinearSettings::default(),
            ai: AiSettings::default(),
        }
    }
}

/// Per-user config location, e.g. `~/.config/herald/herald.toml`
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("herald");
        path.push(CONFIG_FILE_NAME);
        path
    })
}

impl Settings {
    /// Load settings from `explicit`, else `./herald.toml`, else the user
    /// config directory, else defaults; then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a file cannot be
    /// parsed, or an environment override is invalid
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => [Some(PathBuf::from(CONFIG_FILE_NAME)), user_config_path()]
                .into_iter()
                .flatten()
                .find(|p| p.is_file()),
        };

        let mut settings = match file {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    ChangelogError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns an error if the TOML is invalid
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ChangelogError::Config(e.to_string()))
    }

    /// Apply `HERALD_*` and `LINEAR_TEAM_ID` overrides
    ///
    /// # Errors
    ///
    /// Returns an error if `HERALD_AI_PROVIDER` names an unknown provider
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup("HERALD_CHANGELOG_PATH") {
            self.changelog_path = PathBuf::from(path);
        }
        if let Some(label) = lookup("HERALD_LABEL") {
            self.label = label;
        }
        if let Some(zone) = lookup("HERALD_TIMEZONE") {
            self.timezone = zone;
        }
        if let Some(team_id) = lookup("LINEAR_TEAM_ID") {
            self.linear.team_id = Some(team_id);
        }
        if let Some(provider) = lookup("HERALD_AI_PROVIDER") {
            self.ai.provider = provider
                .parse()
                .map_err(|e: anyhow::Error| ChangelogError::Config(e.to_string()))?;
        }
        if let Some(model) = lookup("HERALD_AI_MODEL") {
            self.ai.model = Some(model);
        }
        Ok(())
    }

    /// Reference time zone for day grouping
    ///
    /// # Errors
    ///
    /// Returns an error if `timezone` is not a known IANA zone name
    pub fn reference_zone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ChangelogError::Config(format!("unknown time zone \"{}\"", self.timezone))
        })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// # Errors
    ///
    /// Returns an error if no team is configured
    pub fn team_id(&self) -> Result<&str> {
        self.linear.team_id.as_deref().ok_or_else(|| {
            ChangelogError::Config(
                "missing team id: set LINEAR_TEAM_ID or [linear] team_id (see `herald teams`)"
                    .to_string(),
            )
        })
    }

    /// # Errors
    ///
    /// Returns an error if `LINEAR_API_KEY` is not set
    pub fn linear_api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        required_env(&lookup, LINEAR_API_KEY_ENV)
    }

    /// Resolve the text-generation backend, reading its API key from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the provider needs an API key that is not set
    pub fn ai_config(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<AiConfig> {
        let api_key = match self.ai.provider.api_key_env() {
            Some(name) => Some(required_env(&lookup, name)?),
            None => None,
        };

        Ok(AiConfig {
            provider: self.ai.provider,
            model: self.ai.model.clone(),
            api_key,
            base_url: self.ai.base_url.clone(),
            timeout: self.request_timeout(),
        })
    }
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ChangelogError::Config(format!("missing environment variable {name}")))
}
