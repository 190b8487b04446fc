mod auth;
pub mod client;
mod feature_flags;
pub mod types;

pub use client::*;
pub use types::*;

#[cfg(test)]
pub mod test_support;
