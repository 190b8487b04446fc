use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::ClientConfig,
    error::AuthError,
    router::{first_available_route, module_links, ModuleLink},
    state::{auth::SessionGuard, feature_flags::FeatureFlagResolver},
    utils::storage::KeyValueStorage,
};

/// Per-user portal state: one HTTP client, the flag resolver and the token
/// guard built on it. Starts empty; `logout` returns it to that state.
pub struct PortalSession {
    api: ApiClient,
    flags: FeatureFlagResolver,
    guard: SessionGuard,
}

impl PortalSession {
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStorage>) -> anyhow::Result<Self> {
        let api = ApiClient::new(config)?;
        let flags = FeatureFlagResolver::from_config(api.clone(), config);
        let guard = SessionGuard::new(api.clone(), storage);
        tracing::debug!(
            api_base_url = %config.api_base_url,
            http_timeout_secs = config.http_timeout.as_secs(),
            flag_cache_ttl_secs = config.flag_cache_ttl.as_secs(),
            fallback_flags = config.use_fallback_flags,
            "portal session created"
        );
        Ok(Self { api, flags, guard })
    }

    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let storage = config.open_storage()?;
        Self::new(config, storage)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn flags(&self) -> &FeatureFlagResolver {
        &self.flags
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Loads flags (cache first) and returns the sidebar links. A failed
    /// fetch still yields links from whatever set is installed.
    pub async fn navigation(&self) -> Vec<ModuleLink> {
        self.sync_flags("navigation").await;
        module_links(&self.flags)
    }

    pub async fn landing_route(&self) -> &'static str {
        self.sync_flags("landing_route").await;
        first_available_route(&self.flags)
    }

    async fn sync_flags(&self, purpose: &'static str) {
        if let Err(err) = self.flags.fetch_all().await {
            tracing::debug!(purpose, error = %err, "flag sync failed; using installed flags");
        }
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.flags.reset();
        self.guard.logout()
    }
}
