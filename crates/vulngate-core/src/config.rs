use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VulngateError;

/// Environment variable holding the inference API bearer token.
pub const ENV_TOKEN: &str = "HF_TOKEN";
/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "HF_MODEL";
/// Environment variable overriding the diff truncation bound.
pub const ENV_MAX_DIFF_CHARS: &str = "MAX_DIFF_CHARS";
/// Environment variable overriding the inference API base URL.
pub const ENV_API_BASE: &str = "HF_API_BASE";

/// Model used when neither the environment nor the config file names one.
pub const DEFAULT_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";
/// Hosted inference API root.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
/// Upper bound on a single inference call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Diffs longer than this many characters are truncated before prompting.
pub const DEFAULT_MAX_DIFF_CHARS: usize = 12_000;

/// Top-level configuration loaded from `.vulngate.toml`.
///
/// Supports layered resolution: env vars > config file > defaults. The
/// bearer token is only ever taken from the environment.
///
/// # Examples
///
/// ```
/// use vulngate_core::VulngateConfig;
///
/// let config = VulngateConfig::default();
/// assert_eq!(config.scan.max_diff_chars, 12_000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulngateConfig {
    /// Inference endpoint settings.
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Diff handling settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl VulngateConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::FileNotFound`] if `path` does not exist,
    /// [`VulngateError::Io`] if it cannot be read, or
    /// [`VulngateError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, VulngateError> {
        if !path.exists() {
            return Err(VulngateError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vulngate_core::VulngateConfig;
    ///
    /// let toml = r#"
    /// [scan]
    /// max_diff_chars = 4000
    /// "#;
    /// let config = VulngateConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.scan.max_diff_chars, 4000);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VulngateError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Layer environment overrides on top of this configuration.
    ///
    /// `env` looks up a variable by name. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`VulngateError::Config`] if `MAX_DIFF_CHARS` is not a
    /// positive integer, or if the resulting diff bound or timeout is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use vulngate_core::VulngateConfig;
    ///
    /// let settings = VulngateConfig::default()
    ///     .resolve(|key| (key == "HF_MODEL").then(|| "org/model".to_string()))
    ///     .unwrap();
    /// assert_eq!(settings.inference.model, "org/model");
    /// assert!(settings.inference.token.is_none());
    /// ```
    pub fn resolve<F>(self, env: F) -> Result<Settings, VulngateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let model = lookup(ENV_MODEL).unwrap_or(self.inference.model);
        let base_url = lookup(ENV_API_BASE).unwrap_or(self.inference.base_url);
        let max_diff_chars = match lookup(ENV_MAX_DIFF_CHARS) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                VulngateError::Config(format!("{ENV_MAX_DIFF_CHARS}={raw:?} is not a valid size: {e}"))
            })?,
            None => self.scan.max_diff_chars,
        };
        if max_diff_chars == 0 {
            return Err(VulngateError::Config(
                "max_diff_chars must be greater than zero".into(),
            ));
        }
        if self.inference.timeout_secs == 0 {
            return Err(VulngateError::Config(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(Settings {
            inference: InferenceSettings {
                token: lookup(ENV_TOKEN),
                model,
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(self.inference.timeout_secs),
            },
            max_diff_chars,
        })
    }

    /// [`resolve`](Self::resolve) against the process environment.
    pub fn resolve_from_env(self) -> Result<Settings, VulngateError> {
        self.resolve(|key| std::env::var(key).ok())
    }
}

/// Inference endpoint configuration as written in the config file.
///
/// # Examples
///
/// ```
/// use vulngate_core::InferenceConfig;
///
/// let config = InferenceConfig::default();
/// assert_eq!(config.model, "HuggingFaceH4/zephyr-7b-beta");
/// assert_eq!(config.timeout_secs, 120);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Model identifier appended to the endpoint path.
    #[serde(default = "default_model")]
    pub model: String,
    /// API root, without the `/models/...` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 120).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Diff handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum diff characters sent to the model (default: 12000).
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,
}

fn default_max_diff_chars() -> usize {
    DEFAULT_MAX_DIFF_CHARS
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_diff_chars: default_max_diff_chars(),
        }
    }
}

/// Fully resolved settings for one run, built only once a diff needs scanning.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Everything the inference client needs.
    pub inference: InferenceSettings,
    /// Truncation bound for the diff, in characters.
    pub max_diff_chars: usize,
}

/// Resolved inference client settings.
#[derive(Clone)]
pub struct InferenceSettings {
    /// Bearer token; `None` until a network call actually needs it.
    pub token: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API root with no trailing slash.
    pub base_url: String,
    /// Single upper bound on the inference call.
    pub timeout: Duration,
}

impl InferenceSettings {
    /// URL the prompt is posted to.
    ///
    /// # Examples
    ///
    /// ```
    /// use vulngate_core::VulngateConfig;
    ///
    /// let settings = VulngateConfig::default().resolve(|_| None).unwrap();
    /// assert_eq!(
    ///     settings.inference.endpoint(),
    ///     "https://api-inference.huggingface.co/models/HuggingFaceH4/zephyr-7b-beta"
    /// );
    /// ```
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

impl fmt::Debug for InferenceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceSettings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
