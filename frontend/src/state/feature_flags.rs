use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::{
    api::{ApiClient, FeatureFlag, FeatureFlagStatus, UpdateFeatureFlagRequest},
    config::ClientConfig,
    error::FlagError,
    utils::{
        cache::{keys, TtlCache},
        time::now_rfc3339,
    },
};

#[derive(Debug, Default)]
struct FlagState {
    flags: Vec<FeatureFlag>,
    index: HashMap<String, FeatureFlagStatus>,
    last_error: Option<String>,
}

impl FlagState {
    fn install(&mut self, flags: Vec<FeatureFlag>) {
        self.index = flags
            .iter()
            .map(|flag| (flag.name.clone(), flag.status))
            .collect();
        self.flags = flags;
    }
}

/// Loads feature flags from the backend and answers status queries against
/// the most recently installed set.
pub struct FeatureFlagResolver {
    api: ApiClient,
    cache: TtlCache<Vec<FeatureFlag>>,
    updated_by: String,
    fallback_flags: Option<Vec<FeatureFlag>>,
    state: RwLock<FlagState>,
}

impl FeatureFlagResolver {
    pub fn new(api: ApiClient, cache_ttl: Duration, updated_by: impl Into<String>) -> Self {
        Self {
            api,
            cache: TtlCache::new(cache_ttl),
            updated_by: updated_by.into(),
            fallback_flags: None,
            state: RwLock::new(FlagState::default()),
        }
    }

    pub fn from_config(api: ApiClient, config: &ClientConfig) -> Self {
        Self::new(api, config.flag_cache_ttl, config.flag_updated_by.clone())
            .with_fallback_flags(config.fallback_flags())
    }

    /// Flags installed when the backend cannot be reached. `None` leaves the
    /// current set untouched on failure.
    pub fn with_fallback_flags(mut self, flags: Option<Vec<FeatureFlag>>) -> Self {
        self.fallback_flags = flags;
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FlagState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FlagState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn fetch_all(&self) -> Result<Vec<FeatureFlag>, FlagError> {
        if let Some(cached) = self.cache.get(keys::FEATURE_FLAGS) {
            tracing::debug!(count = cached.len(), "feature flags served from cache");
            let mut state = self.write_state();
            state.install(cached.clone());
            state.last_error = None;
            return Ok(cached);
        }

        match self.api.list_feature_flags().await {
            Ok(flags) => {
                tracing::debug!(count = flags.len(), "feature flags fetched");
                self.cache.insert(keys::FEATURE_FLAGS, flags.clone());
                let mut state = self.write_state();
                state.install(flags.clone());
                state.last_error = None;
                Ok(flags)
            }
            Err(err) => {
                let mut state = self.write_state();
                state.last_error = Some(err.to_string());
                match &self.fallback_flags {
                    Some(fallback) => {
                        tracing::warn!(error = %err, count = fallback.len(), "feature flag fetch failed; installing fallback flags");
                        state.install(fallback.clone());
                    }
                    None => tracing::warn!(error = %err, "feature flag fetch failed"),
                }
                Err(err)
            }
        }
    }

    pub fn status(&self, name: &str) -> Option<FeatureFlagStatus> {
        self.read_state().index.get(name).copied()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.status(name) == Some(FeatureFlagStatus::Enabled)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.status(name) == Some(FeatureFlagStatus::Disabled)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.status(name) == Some(FeatureFlagStatus::Hidden)
    }

    pub fn flag(&self, name: &str) -> Option<FeatureFlag> {
        self.read_state()
            .flags
            .iter()
            .find(|flag| flag.name == name)
            .cloned()
    }

    pub fn flags(&self) -> Vec<FeatureFlag> {
        self.read_state().flags.clone()
    }

    pub fn by_category(&self, category: &str) -> Vec<FeatureFlag> {
        self.read_state()
            .flags
            .iter()
            .filter(|flag| flag.category == category)
            .cloned()
            .collect()
    }

    pub fn by_module(&self, module: &str) -> Vec<FeatureFlag> {
        self.read_state()
            .flags
            .iter()
            .filter(|flag| flag.module == module)
            .cloned()
            .collect()
    }

    pub fn status_map(&self) -> HashMap<String, FeatureFlagStatus> {
        self.read_state().index.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.read_state().last_error.clone()
    }

    /// Sends a new status for `flag_id`. On success the cache is dropped and
    /// the full set re-fetched; on failure nothing local changes.
    pub async fn update(
        &self,
        flag_id: &str,
        status: FeatureFlagStatus,
    ) -> Result<FeatureFlag, FlagError> {
        let request = UpdateFeatureFlagRequest {
            status,
            updated_by: self.updated_by.clone(),
        };
        let updated = match self.api.update_feature_flag(flag_id, &request).await {
            Ok(flag) => flag,
            Err(err) => {
                tracing::warn!(flag_id, error = %err, "feature flag update rejected");
                return Err(err);
            }
        };
        tracing::info!(flag_id, name = %updated.name, status = %updated.status, "feature flag updated");

        self.cache.invalidate(keys::FEATURE_FLAGS);
        if let Err(err) = self.fetch_all().await {
            tracing::warn!(error = %err, "re-sync after feature flag update failed");
        }
        Ok(updated)
    }

    pub fn reset(&self) {
        self.cache.clear();
        *self.write_state() = FlagState::default();
    }
}

const DEFAULT_MODULES: &[(&str, &str, &str, &str, &str, bool)] = &[
    // (id, name, display_name, module, category, is_core_feature)
    ("default-directory", "directory_module", "Directory", "directory", "hr_modules", true),
    ("default-performance", "performance_module", "Performance", "performance", "hr_modules", false),
    ("default-leave", "leave_module", "Leave Management", "leave", "hr_modules", false),
    ("default-compensation", "compensation_module", "Compensation", "compensation", "hr_modules", false),
    ("default-recruitment", "recruitment_module", "Recruitment", "recruitment", "hr_modules", false),
    ("default-engagement", "engagement_module", "Engagement", "engagement", "hr_modules", false),
    ("default-resource-hub", "resource_hub_module", "Resource Hub", "resource_hub", "hr_modules", false),
    ("default-dashboard", "dashboard_module", "Dashboard", "dashboard", "hr_modules", false),
    ("default-admin-portal", "admin_portal", "Admin Portal", "admin", "admin_portal", true),
    ("default-home", "home_module", "Home", "home", "hr_modules", true),
    ("default-helpdesk", "helpdesk_module", "Helpdesk", "helpdesk", "hr_modules", false),
    ("default-learning", "learning_module", "Learning", "learning", "hr_modules", false),
    ("default-notifications", "notifications", "Notifications", "ui", "ui_components", false),
];

/// Every known module, all enabled. Meant for local development hosts that
/// want a navigable portal while the backend is down.
pub fn default_module_flags() -> Vec<FeatureFlag> {
    let now = now_rfc3339();
    DEFAULT_MODULES
        .iter()
        .map(
            |&(id, name, display_name, module, category, is_core_feature)| FeatureFlag {
                id: id.to_string(),
                name: name.to_string(),
                display_name: display_name.to_string(),
                description: None,
                status: FeatureFlagStatus::Enabled,
                module: module.to_string(),
                category: category.to_string(),
                is_core_feature,
                created_by: None,
                updated_by: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MODULE_NAVIGATION_ORDER;

    fn resolver() -> FeatureFlagResolver {
        let api = ApiClient::new_with_base_url("http://127.0.0.1:9/api").expect("client");
        FeatureFlagResolver::new(api, Duration::from_secs(60), "tester")
    }

    #[test]
    fn default_flags_cover_every_navigation_module() {
        let flags = default_module_flags();
        for entry in MODULE_NAVIGATION_ORDER {
            let flag = flags
                .iter()
                .find(|flag| flag.name == entry.feature_flag)
                .unwrap_or_else(|| panic!("missing default for {}", entry.feature_flag));
            assert_eq!(flag.status, FeatureFlagStatus::Enabled);
        }
        assert!(flags.iter().any(|flag| flag.name == "admin_portal"));
        assert!(flags.iter().any(|flag| flag.name == "notifications"));
    }

    #[test]
    fn predicates_are_false_before_any_fetch() {
        let resolver = resolver();
        assert!(!resolver.is_enabled("leave_module"));
        assert!(!resolver.is_disabled("leave_module"));
        assert!(!resolver.is_hidden("leave_module"));
        assert!(resolver.flags().is_empty());
        assert!(resolver.last_error().is_none());
    }

    #[test]
    fn install_indexes_by_name_and_filters_keep_order() {
        let resolver = resolver();
        let mut flags = default_module_flags();
        flags[0].status = FeatureFlagStatus::Hidden;
        resolver.write_state().install(flags);

        assert!(resolver.is_hidden("directory_module"));
        assert!(resolver.is_enabled("leave_module"));
        assert_eq!(resolver.by_category("admin_portal").len(), 1);
        assert_eq!(resolver.by_module("ui")[0].name, "notifications");
        let names: Vec<_> = resolver
            .by_category("hr_modules")
            .into_iter()
            .map(|flag| flag.name)
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("directory_module"));
        assert_eq!(
            resolver.flag("home_module").map(|flag| flag.display_name),
            Some("Home".to_string())
        );

        resolver.reset();
        assert!(resolver.status_map().is_empty());
    }
}
