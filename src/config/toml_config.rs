use crate::adapters::http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::adapters::LocalCache;
use crate::core::deemed_service::ServiceRules;
use crate::domain::model::Jurisdiction;
use crate::domain::ports::SourceSettings;
use crate::utils::error::{DeadlineError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAX_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub seed: Option<SeedConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub enabled: Option<bool>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            enabled: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub jurisdiction: Option<Jurisdiction>,
    pub extension_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeadlineError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeadlineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOLIDAY_CACHE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeadlineError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        if let Some(path) = &self.cache.path {
            validation::validate_path("cache.path", path)?;
        }

        // [seed] 區段存在時必須指定路徑
        if let Some(seed) = &self.seed {
            let path = validation::validate_required_field("seed.path", &seed.path)?;
            validation::validate_path("seed.path", path)?;
        }

        if let Some(days) = self.default_extension_days() {
            ServiceRules::cpr().check_extension(days)?;
        }

        Ok(())
    }

    pub fn default_jurisdiction(&self) -> Option<Jurisdiction> {
        self.defaults.as_ref().and_then(|d| d.jurisdiction)
    }

    pub fn default_extension_days(&self) -> Option<i64> {
        self.defaults.as_ref().and_then(|d| d.extension_days)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl SourceSettings for EngineConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn timeout(&self) -> Duration {
        self.source
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn live_enabled(&self) -> bool {
        self.source.enabled.unwrap_or(true)
    }

    fn cache_path(&self) -> PathBuf {
        self.cache
            .path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(LocalCache::default_path)
    }

    fn seed_path(&self) -> Option<PathBuf> {
        self.seed
            .as_ref()
            .and_then(|s| s.path.as_ref())
            .map(PathBuf::from)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
