use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use crate::api::ApiClient;

pub fn flag_json(id: &str, name: &str, status: &str) -> Value {
    let module = name.trim_end_matches("_module");
    json!({
        "id": id,
        "name": name,
        "display_name": module.replace('_', " "),
        "description": null,
        "status": status,
        "module": module,
        "category": "hr_modules",
        "is_core_feature": false,
        "created_by": "admin",
        "updated_by": null,
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00"
    })
}

/// Signed token whose `exp` lies `offset_secs` from now (negative = past).
pub fn token_expiring_in(offset_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({ "sub": "u1", "iat": now, "exp": now + offset_secs });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode token")
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new_with_base_url(server.url("/api")).expect("api client")
}
