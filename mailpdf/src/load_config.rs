/// `load_config` module: reads the static YAML configuration of the CLI.
///
/// The file holds no secrets. Tokens for GitHub and the chat workspace are
/// read from the environment by the clients themselves (`GITHUB_API_TOKEN`,
/// `CHAT_ACCESS_TOKEN`).
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use mailpdf_core::config::PipelineConfig;
use mailpdf_core::github::{GithubRepo, DEFAULT_API_BASE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub github: GithubSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub upload: UploadSection,
}

#[derive(Debug, Deserialize)]
pub struct GithubSection {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_sync_branch")]
    pub sync_branch: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            temp_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadSection {
    /// Channel used when `--channel` is not given.
    #[serde(default)]
    pub channel: Option<String>,
}

fn default_sync_branch() -> String {
    PipelineConfig::default().sync_reference
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("wkhtmltopdf")
}

impl CliConfig {
    pub fn github_repo(&self) -> GithubRepo {
        GithubRepo {
            owner: self.github.owner.clone(),
            repo: self.github.repo.clone(),
            api_base: self.github.api_base.clone(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sync_reference: self.github.sync_branch.clone(),
        }
    }
}

/// Loads the YAML config file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.github.owner.trim().is_empty() || config.github.repo.trim().is_empty() {
        error!(config_path = ?path_ref, "github.owner and github.repo must be set");
        return Err(anyhow::anyhow!(
            "Invalid config: github.owner and github.repo must not be empty"
        ));
    }

    Ok(config)
}
