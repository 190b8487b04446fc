pub mod auth;
pub mod feature_flags;
pub mod session;
