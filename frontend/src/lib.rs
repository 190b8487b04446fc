pub mod api;
pub mod config;
pub mod error;
pub mod router;
pub mod state;
pub mod utils;

pub use api::{ApiClient, FeatureFlag, FeatureFlagStatus};
pub use config::ClientConfig;
pub use error::{AuthError, FlagError, StorageError};
pub use state::{auth::SessionGuard, feature_flags::FeatureFlagResolver, session::PortalSession};
