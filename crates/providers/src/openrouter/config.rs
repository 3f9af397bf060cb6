use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fmt, fs, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "mistralai/mixtral-8x7b-instruct";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Bearer token for the completion endpoint. Debug output never shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OpenRouterFileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct OpenRouterConfig {
    pub api_key: Credential,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl OpenRouterConfig {
    pub fn new(api_key: Credential) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
        }
    }

    /// Credential from `OPENROUTER_API_KEY`, then the optional config file,
    /// then `OPENROUTER_BASE_URL` and proxy variables on top.
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let api_key = api_key_from(env::var("OPENROUTER_API_KEY").ok())?;
        let mut cfg = Self::new(api_key);

        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path)
                    .map_err(anyhow::Error::from)
                    .and_then(|s| Self::parse_file(&s))
                {
                    Ok(file_cfg) => cfg.apply_file(file_cfg),
                    Err(e) => {
                        warn!(target: "providers::openrouter", "ignoring config file {}: {}", path.display(), e)
                    }
                }
            }
        }

        if let Ok(base) = env::var("OPENROUTER_BASE_URL") {
            cfg.base_url = base;
        }
        cfg.proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok());

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn parse_file(text: &str) -> anyhow::Result<OpenRouterFileConfig> {
        Ok(toml::from_str::<OpenRouterFileConfig>(text)?)
    }

    pub fn apply_file(&mut self, file_cfg: OpenRouterFileConfig) {
        if let Some(m) = file_cfg.model {
            self.model = m;
        }
        if let Some(b) = file_cfg.base_url {
            self.base_url = b;
        }
        if let Some(t) = file_cfg.timeout_ms {
            self.timeout = Duration::from_millis(t);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.expose().trim().is_empty() {
            anyhow::bail!("OPENROUTER_API_KEY is empty");
        }
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("invalid base url '{}': {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("base url must be http(s): {}", self.base_url);
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("model must not be empty");
        }
        if self.timeout.is_zero() {
            anyhow::bail!("timeout_ms must be positive");
        }
        Ok(())
    }

    /// `<config_dir>/healthai/config.toml` on every platform.
    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("healthai").join("config.toml"))
    }
}

/// An unset, empty or whitespace-only key counts as missing.
fn api_key_from(value: Option<String>) -> anyhow::Result<Credential> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(Credential::new(v)),
        _ => anyhow::bail!("OPENROUTER_API_KEY not set"),
    }
}
