use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Token;
use crate::error::TaskLensError;

/// Configuration file structure for TaskLens.
///
/// Lets users keep the organization, token and output location out of the
/// command line. Values given as flags or environment variables win over the
/// file, and the file wins over built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Azure DevOps connection settings
    #[serde(default)]
    pub azure: AzureConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AzureConfig {
    /// Organization name (the first path segment after the base URL)
    pub organization: Option<String>,

    /// Personal access token
    pub token: Option<String>,

    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// api-version used for projects and build definitions
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// api-version used for the task catalog
    #[serde(default = "default_tasks_api_version")]
    pub tasks_api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where the JSON report is written
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            organization: None,
            token: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_version: default_api_version(),
            tasks_api_version: default_tasks_api_version(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://dev.azure.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_version() -> String {
    "7.1".to_string()
}

fn default_tasks_api_version() -> String {
    "7.1-preview.1".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("deprecated_tasks.json")
}

const CANDIDATES: [&str; 4] = ["tasklens.toml", "tasklens.json", "tasklens.yaml", "tasklens.yml"];

/// Values supplied on the command line (or through their environment variables).
#[derive(Debug, Default)]
pub struct Overrides {
    pub organization: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub organization: String,
    pub token: Token,
    pub base_url: String,
    pub output: PathBuf,
    pub timeout: Duration,
    pub api_version: String,
    pub tasks_api_version: String,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./tasklens.toml, ./tasklens.json, ./tasklens.yaml, ./tasklens.yml
    /// 3. `<user config dir>/tasklens/config.toml`
    ///
    /// Returns default configuration if no file is found. An explicitly
    /// specified path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        if let Some(found) = Self::find_in(Path::new(".")) {
            return Self::load_from_path(&found);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tasklens").join("config.toml");
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        Ok(Self::default())
    }

    fn find_in(dir: &Path) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Merge command-line overrides over the file values and check that the
    /// required settings are present.
    pub fn resolve(self, overrides: Overrides) -> Result<AuditConfig> {
        let organization = overrides
            .organization
            .or(self.azure.organization)
            .filter(|org| !org.trim().is_empty())
            .ok_or_else(|| {
                TaskLensError::Config(
                    "organization is required (--org, AZURE_DEVOPS_ORG or azure.organization)"
                        .into(),
                )
            })?;

        let token = overrides
            .token
            .or(self.azure.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                TaskLensError::Config(
                    "access token is required (--token, AZURE_DEVOPS_PAT or azure.token)".into(),
                )
            })?;

        let timeout_secs = overrides.timeout_secs.unwrap_or(self.azure.timeout_secs);
        if timeout_secs == 0 {
            return Err(TaskLensError::Config("timeout must be at least one second".into()).into());
        }

        Ok(AuditConfig {
            organization,
            token: Token::from(token),
            base_url: overrides.base_url.unwrap_or(self.azure.base_url),
            output: overrides.output.unwrap_or(self.output.path),
            timeout: Duration::from_secs(timeout_secs),
            api_version: self.azure.api_version,
            tasks_api_version: self.azure.tasks_api_version,
        })
    }
}
