//! `token-launch.toml` loading and the template written by `init`.

use crate::error::{CliError, Result, ResultExt};
use github::GithubConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "token-launch.toml";
pub const DEFAULT_SOURCE_PATH: &str = "tokens-export.json";

fn default_source_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_PATH)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Where extracted tokens are read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

/// Where local downloads are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Include technical details on recovery screens
    #[serde(default)]
    pub show_technical_details: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            show_technical_details: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    /// Without this table the tool runs in local-only mode
    #[serde(default)]
    pub github: Option<GithubConfig>,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Load the explicit file, else the first file found by [`locate`],
    /// else the defaults. Returns the path that was used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        match locate() {
            Some(path) => {
                debug!(path = %path.display(), "using configuration file");
                Ok((Self::load(&path)?, Some(path)))
            }
            None => {
                debug!("no configuration file found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.path.as_os_str().is_empty() {
            return Err(CliError::Other("[source] path must not be empty".to_string()));
        }
        if let Some(github) = &self.github {
            github.validate()?;
        }
        Ok(())
    }
}

/// Search `./token-launch.toml`, then `<config dir>/token-launch/config.toml`
pub fn locate() -> Option<PathBuf> {
    candidates().into_iter().find(|path| path.is_file())
}

fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("token-launch").join("config.toml"));
    }
    paths
}

/// Write the commented template, refusing to overwrite unless `force` is set
pub fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, default_config_template())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn default_config_template() -> &'static str {
    r#"# token-launch configuration

[source]
# JSON produced by the design tool plugin's extraction step
path = "tokens-export.json"

[export]
# Directory for local downloads (design-tokens-<timestamp>.json)
output_dir = "."
# Show raw error messages on recovery screens
show_technical_details = false

# Remove this table to run in local-only mode
[github]
repository = "owner/design-tokens"
branch = "main"
path = "design-tokens/raw/figma-export.json"
# Environment variable holding a token with contents:write permission
token_env = "GITHUB_TOKEN"
# api_url = "https://api.github.com"
# timeout_seconds = 30
# commit_message = "chore(tokens): update design tokens"
"#
}
