#![allow(dead_code)]
use ctor::ctor;
use httpmock::MockServer;
use hr_pulse_frontend::{
    utils::storage::{KeyValueStorage, MemoryStorage, AUTH_TOKEN_KEY},
    ApiClient, ClientConfig,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

#[ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hr_pulse_frontend=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        http_timeout: Duration::from_secs(5),
        ..ClientConfig::with_base_url(server.url("/api"))
    }
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_config(server)).expect("api client")
}

pub fn storage_with_token(token: Option<&str>) -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage
            .set_item(AUTH_TOKEN_KEY, token)
            .expect("seed token");
    }
    storage
}

pub fn stored_token(storage: &dyn KeyValueStorage) -> Option<String> {
    storage.get_item(AUTH_TOKEN_KEY).expect("read token")
}

/// Signed token whose `exp` lies `offset_secs` from now; `jti` keeps tokens
/// minted in the same second distinct.
pub fn token_expiring_in(offset_secs: i64, jti: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "user-123",
        "iat": now,
        "exp": now + offset_secs,
        "jti": jti,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn flag_json(id: &str, name: &str, status: &str) -> Value {
    let module = name.trim_end_matches("_module");
    json!({
        "id": id,
        "name": name,
        "display_name": module.replace('_', " "),
        "description": null,
        "status": status,
        "module": module,
        "category": if name == "admin_portal" { "admin_portal" } else { "hr_modules" },
        "is_core_feature": false,
        "created_by": "admin",
        "updated_by": null,
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00"
    })
}
