use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    api::{client::is_unauthorized, ApiClient},
    error::AuthError,
    utils::{
        jwt::{decode_claims, is_token_expired, TokenClaims},
        storage::{KeyValueStorage, AUTH_TOKEN_KEY},
    },
};

type RefreshFuture = Shared<BoxFuture<'static, Result<String, AuthError>>>;

struct GuardInner {
    api: ApiClient,
    storage: Arc<dyn KeyValueStorage>,
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl GuardInner {
    fn read_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .storage
            .get_item(AUTH_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    async fn refresh_once(&self) -> Result<String, AuthError> {
        let Some(current) = self.read_token()? else {
            tracing::debug!("no stored token; skipping refresh");
            return Err(AuthError::NoToken);
        };
        // A failed refresh leaves the stale token where it is.
        let response = self.api.refresh_access_token(&current).await?;
        self.storage
            .set_item(AUTH_TOKEN_KEY, &response.access_token)?;
        tracing::info!("access token refreshed");
        Ok(response.access_token)
    }
}

/// Keeps the persisted bearer token usable for outbound requests.
///
/// Cloning is cheap and clones share the same in-flight refresh.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

impl SessionGuard {
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                api,
                storage,
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn is_expired(token: &str) -> bool {
        is_token_expired(token)
    }

    pub fn token_claims(token: &str) -> Option<TokenClaims> {
        decode_claims(token)
    }

    pub fn current_token(&self) -> Result<Option<String>, AuthError> {
        self.inner.read_token()
    }

    pub fn install_token(&self, token: &str) -> Result<(), AuthError> {
        self.inner.storage.set_item(AUTH_TOKEN_KEY, token)?;
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.inner.storage.remove_item(AUTH_TOKEN_KEY)?;
        tracing::info!("session token cleared");
        Ok(())
    }

    /// Refreshes the stored token. Callers arriving while a refresh is in
    /// flight wait for that one instead of starting their own.
    ///
    /// The refresh runs as its own task, so it completes and persists the
    /// new token even if every waiter is dropped.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let refresh = {
            let mut slot = self.inner.in_flight.lock().await;
            match slot.as_ref() {
                Some(existing) => {
                    tracing::debug!("joining in-flight token refresh");
                    existing.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    // The task clears the slot under this lock, so it is always set first.
                    let task = tokio::spawn(async move {
                        let result = inner.refresh_once().await;
                        inner.in_flight.lock().await.take();
                        result
                    });
                    let refresh = async move {
                        task.await.unwrap_or_else(|err| {
                            tracing::error!(error = %err, "token refresh task failed");
                            Err(AuthError::Transport(format!("refresh task failed: {}", err)))
                        })
                    }
                    .boxed()
                    .shared();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };
        refresh.await
    }

    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        let token = self.current_token()?.ok_or(AuthError::NoToken)?;
        if !is_token_expired(&token) {
            return Ok(token);
        }
        tracing::debug!("stored access token expired");
        self.refresh().await
    }

    /// Sends the request built by `build` with a bearer token attached.
    ///
    /// A 401 triggers one refresh and one retry; the retry's response is
    /// returned whatever its status. If the refresh fails the original 401
    /// response is returned.
    pub async fn authenticated_request<F>(&self, build: F) -> Result<Response, AuthError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self
            .get_valid_token()
            .await
            .map_err(|err| AuthError::NoValidToken(Box::new(err)))?;

        let response = self.send_with_token(&build, &token).await?;
        if !is_unauthorized(response.status()) {
            return Ok(response);
        }

        tracing::info!("request rejected with 401; refreshing token and retrying once");
        match self.refresh().await {
            Ok(new_token) => self.send_with_token(&build, &new_token).await,
            Err(err) => {
                tracing::warn!(error = %err, "token refresh after 401 failed");
                Ok(response)
            }
        }
    }

    async fn send_with_token<F>(&self, build: &F, token: &str) -> Result<Response, AuthError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        build(self.inner.api.http_client())
            .bearer_auth(token)
            .send()
            .await
            .map_err(AuthError::from_reqwest)
    }
}
