use tracing::Instrument;

use super::{client::ApiClient, types::TokenResponse};
use crate::error::AuthError;

impl ApiClient {
    /// Exchanges the current (possibly expired) bearer token for a new one.
    pub async fn refresh_access_token(&self, current_token: &str) -> Result<TokenResponse, AuthError> {
        let url = self.endpoint("/auth/refresh-token");
        async {
            let response = self
                .http_client()
                .post(&url)
                .bearer_auth(current_token)
                .send()
                .await
                .map_err(AuthError::from_reqwest)?;

            let status = response.status();
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), "token refresh rejected");
                return Err(AuthError::RefreshRejected {
                    status: status.as_u16(),
                });
            }

            let token: TokenResponse = response.json().await.map_err(AuthError::from_reqwest)?;
            if token.access_token.is_empty() {
                return Err(AuthError::Decode("empty access_token".into()));
            }
            Ok(token)
        }
        .instrument(tracing::debug_span!("refresh_access_token", %url))
        .await
    }
}
