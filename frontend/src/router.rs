use std::collections::HashMap;

use crate::{api::FeatureFlagStatus, state::feature_flags::FeatureFlagResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRoute {
    pub name: &'static str,
    pub route: &'static str,
    pub feature_flag: &'static str,
}

/// Sidebar order; also the priority used to pick the landing route.
pub const MODULE_NAVIGATION_ORDER: &[ModuleRoute] = &[
    ModuleRoute { name: "Home", route: "/home", feature_flag: "home_module" },
    ModuleRoute { name: "Directory", route: "/directory", feature_flag: "directory_module" },
    ModuleRoute { name: "Leave", route: "/leave", feature_flag: "leave_module" },
    ModuleRoute { name: "Recruitment", route: "/recruitment", feature_flag: "recruitment_module" },
    ModuleRoute { name: "Performance", route: "/performance", feature_flag: "performance_module" },
    ModuleRoute { name: "Analytics", route: "/dashboard", feature_flag: "dashboard_module" },
    ModuleRoute { name: "Engagement", route: "/engagement", feature_flag: "engagement_module" },
    ModuleRoute { name: "Resource Hub", route: "/resource-hub", feature_flag: "resource_hub_module" },
    ModuleRoute { name: "Compensation", route: "/compensation", feature_flag: "compensation_module" },
    ModuleRoute { name: "Learning", route: "/learning", feature_flag: "learning_module" },
    ModuleRoute { name: "Helpdesk", route: "/helpdesk", feature_flag: "helpdesk_module" },
];

pub const FALLBACK_ROUTE: &str = "/home";

/// Anything that can report a flag status by name.
pub trait FlagLookup {
    fn flag_status(&self, name: &str) -> Option<FeatureFlagStatus>;
}

impl FlagLookup for FeatureFlagResolver {
    fn flag_status(&self, name: &str) -> Option<FeatureFlagStatus> {
        self.status(name)
    }
}

impl FlagLookup for HashMap<String, FeatureFlagStatus> {
    fn flag_status(&self, name: &str) -> Option<FeatureFlagStatus> {
        self.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLink {
    pub module: ModuleRoute,
    pub interactive: bool,
}

/// Links to render: hidden modules are dropped, disabled ones kept but not
/// interactive. Modules without a known flag render as enabled.
pub fn module_links(flags: &impl FlagLookup) -> Vec<ModuleLink> {
    MODULE_NAVIGATION_ORDER
        .iter()
        .filter_map(|module| match flags.flag_status(module.feature_flag) {
            Some(FeatureFlagStatus::Hidden) => None,
            Some(FeatureFlagStatus::Disabled) => Some(ModuleLink {
                module: *module,
                interactive: false,
            }),
            Some(FeatureFlagStatus::Enabled) | None => Some(ModuleLink {
                module: *module,
                interactive: true,
            }),
        })
        .collect()
}

pub fn available_module_routes(flags: &impl FlagLookup) -> Vec<&'static str> {
    module_links(flags)
        .into_iter()
        .filter(|link| link.interactive)
        .map(|link| link.module.route)
        .collect()
}

pub fn first_available_route(flags: &impl FlagLookup) -> &'static str {
    module_links(flags)
        .into_iter()
        .find(|link| link.interactive)
        .map(|link| link.module.route)
        .unwrap_or(FALLBACK_ROUTE)
}

pub fn is_module_available(flags: &impl FlagLookup, module_name: &str) -> bool {
    module_links(flags)
        .iter()
        .any(|link| link.module.name == module_name && link.interactive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(entries: &[(&str, FeatureFlagStatus)]) -> HashMap<String, FeatureFlagStatus> {
        entries
            .iter()
            .map(|(name, status)| (name.to_string(), *status))
            .collect()
    }

    #[test]
    fn hidden_is_removed_disabled_is_inert_enabled_is_live() {
        let flags = statuses(&[
            ("leave_module", FeatureFlagStatus::Enabled),
            ("recruitment_module", FeatureFlagStatus::Disabled),
            ("learning_module", FeatureFlagStatus::Hidden),
        ]);
        let links = module_links(&flags);

        let leave = links.iter().find(|l| l.module.route == "/leave").unwrap();
        assert!(leave.interactive);
        let recruitment = links
            .iter()
            .find(|l| l.module.route == "/recruitment")
            .unwrap();
        assert!(!recruitment.interactive);
        assert!(links.iter().all(|l| l.module.route != "/learning"));
    }

    #[test]
    fn available_routes_include_leave_and_exclude_learning() {
        let flags = statuses(&[
            ("leave_module", FeatureFlagStatus::Enabled),
            ("learning_module", FeatureFlagStatus::Hidden),
        ]);
        let routes = available_module_routes(&flags);
        assert!(routes.contains(&"/leave"));
        assert!(!routes.contains(&"/learning"));
    }

    #[test]
    fn unknown_flags_count_as_enabled() {
        let flags = HashMap::new();
        assert_eq!(module_links(&flags).len(), MODULE_NAVIGATION_ORDER.len());
        assert_eq!(first_available_route(&flags), "/home");
        assert!(is_module_available(&flags, "Directory"));
        assert!(!is_module_available(&flags, "Payroll"));
    }

    #[test]
    fn landing_route_follows_navigation_order() {
        let flags = statuses(&[
            ("home_module", FeatureFlagStatus::Hidden),
            ("directory_module", FeatureFlagStatus::Disabled),
        ]);
        assert_eq!(first_available_route(&flags), "/leave");
        assert!(!is_module_available(&flags, "Directory"));
    }

    #[test]
    fn landing_route_falls_back_to_home_when_nothing_is_live() {
        let flags: HashMap<_, _> = MODULE_NAVIGATION_ORDER
            .iter()
            .map(|m| (m.feature_flag.to_string(), FeatureFlagStatus::Disabled))
            .collect();
        assert!(available_module_routes(&flags).is_empty());
        assert_eq!(first_available_route(&flags), FALLBACK_ROUTE);
    }
}
