use anyhow::anyhow;
use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    api::FeatureFlag,
    state::feature_flags::default_module_flags,
    utils::storage::{FileStorage, KeyValueStorage, MemoryStorage},
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FLAG_CACHE_TTL_SECS: u64 = 10 * 60;
pub const DEFAULT_FLAG_UPDATED_BY: &str = "current_user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub flag_cache_ttl: Duration,
    pub flag_updated_by: String,
    /// Install the built-in module flags when the flag endpoint is unreachable.
    pub use_fallback_flags: bool,
    pub token_storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            flag_cache_ttl: Duration::from_secs(DEFAULT_FLAG_CACHE_TTL_SECS),
            flag_updated_by: DEFAULT_FLAG_UPDATED_BY.to_string(),
            use_fallback_flags: false,
            token_storage_path: None,
        }
    }
}

fn parse_secs(name: &str, default: u64) -> anyhow::Result<Duration> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, raw)),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn parse_flag(name: &str) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(anyhow!("Invalid {} value: {}", name, raw)),
        },
        Err(_) => Ok(false),
    }
}

impl ClientConfig {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let http_timeout = parse_secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let flag_cache_ttl = parse_secs("FEATURE_FLAG_CACHE_TTL_SECS", DEFAULT_FLAG_CACHE_TTL_SECS)?;

        let flag_updated_by = env::var("FEATURE_FLAG_UPDATED_BY")
            .unwrap_or_else(|_| DEFAULT_FLAG_UPDATED_BY.to_string());

        let use_fallback_flags = parse_flag("FEATURE_FLAG_FALLBACK")?;

        let token_storage_path = env::var("TOKEN_STORAGE_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(ClientConfig {
            api_base_url: normalize_base_url(&api_base_url),
            http_timeout,
            flag_cache_ttl,
            flag_updated_by,
            use_fallback_flags,
            token_storage_path,
        })
    }

    pub fn with_base_url(base_url: impl AsRef<str>) -> Self {
        Self {
            api_base_url: normalize_base_url(base_url.as_ref()),
            ..Self::default()
        }
    }

    pub fn fallback_flags(&self) -> Option<Vec<FeatureFlag>> {
        self.use_fallback_flags.then(default_module_flags)
    }

    pub fn open_storage(&self) -> anyhow::Result<Arc<dyn KeyValueStorage>> {
        match &self.token_storage_path {
            Some(path) => {
                let storage = FileStorage::open(path)
                    .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
                Ok(Arc::new(storage))
            }
            None => Ok(Arc::new(MemoryStorage::new())),
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
