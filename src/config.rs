//! Startup configuration read from the environment (and `.env`)

use std::path::PathBuf;

use crate::utils::ConfigError;

const DEFAULT_IMAGE_DIR: &str = "./img";
const DEFAULT_COMMAND_PREFIX: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub discord_token: String,
    /// Explicit capture-website location; the platform default is used when unset
    pub renderer_path: Option<PathBuf>,
    pub image_dir: PathBuf,
    pub command_prefix: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let renderer_path = get("CAPTURE_WEBSITE_BIN").map(PathBuf::from);
        if let Some(path) = &renderer_path {
            if !path.is_absolute() {
                return Err(ConfigError::Invalid {
                    key: "CAPTURE_WEBSITE_BIN",
                    reason: format!("{} is not an absolute path", path.display()),
                });
            }
        }

        let image_dir = get("CHART_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR));

        let command_prefix = get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        Ok(Self {
            discord_token,
            renderer_path,
            image_dir,
            command_prefix,
        })
    }
}
