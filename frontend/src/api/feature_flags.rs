use tracing::Instrument;

use super::{
    client::{error_message, ApiClient},
    types::{FeatureFlag, UpdateFeatureFlagRequest},
};
use crate::error::FlagError;

impl ApiClient {
    pub async fn list_feature_flags(&self) -> Result<Vec<FeatureFlag>, FlagError> {
        let url = self.endpoint("/feature-flags/");
        async {
            let response = self
                .http_client()
                .get(&url)
                .send()
                .await
                .map_err(FlagError::from_reqwest)?;

            let status = response.status();
            if status.is_success() {
                response
                    .json::<Vec<FeatureFlag>>()
                    .await
                    .map_err(|e| FlagError::Decode(e.to_string()))
            } else {
                Err(FlagError::Status {
                    status: status.as_u16(),
                    message: error_message(response).await,
                })
            }
        }
        .instrument(tracing::debug_span!("list_feature_flags", %url))
        .await
    }

    pub async fn update_feature_flag(
        &self,
        flag_id: &str,
        request: &UpdateFeatureFlagRequest,
    ) -> Result<FeatureFlag, FlagError> {
        let url = self
            .resource_url("/feature-flags/", flag_id)
            .ok_or_else(|| FlagError::Transport(format!("Invalid API base URL: {}", self.base_url())))?;
        async {
            let response = self
                .http_client()
                .put(url.as_str())
                .json(request)
                .send()
                .await
                .map_err(FlagError::from_reqwest)?;

            let status = response.status();
            if status.is_success() {
                response
                    .json::<FeatureFlag>()
                    .await
                    .map_err(|e| FlagError::Decode(e.to_string()))
            } else {
                Err(FlagError::Status {
                    status: status.as_u16(),
                    message: error_message(response).await,
                })
            }
        }
        .instrument(tracing::debug_span!("update_feature_flag", flag_id, status = %request.status))
        .await
    }
}
