//! # API client
//!
//! [`ApiClient`] owns a [`Transport`], a [`TokenStore`] and the [`Settings`]. Every call
//! names a [`Profile`]:
//!
//! | Profile | Credentials | On `401` |
//! |---------|-------------|----------|
//! | [`Profile::Public`] | none | error returned as is |
//! | [`Profile::Authenticated`] | `Authorization: Bearer <access>` | refresh once, replay once |
//!
//! ## Refresh and replay
//!
//! When an authenticated request answers `401`, the stored refresh token is posted to
//! `/users/auth/token/refresh/`. On success the new access token is saved and the
//! original request is sent again, exactly once. If there is no refresh token or the
//! refresh itself fails, the stored tokens are cleared and the original `401` is
//! returned. There are no other retries.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use store::{TokenStore, Tokens};

use crate::error::{backend_detail, ApiError};
use crate::settings::Settings;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const TOKEN_REFRESH_PATH: &str = "/users/auth/token/refresh/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Public,
    Authenticated,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

pub struct ApiClient<T, S> {
    transport: T,
    tokens: S,
    settings: Settings,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub fn new(transport: T, tokens: S, settings: Settings) -> Self {
        Self {
            transport,
            tokens,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and return the successful response, or the HTTP error.
    pub async fn send(
        &self,
        profile: Profile,
        mut request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        if profile == Profile::Authenticated {
            request.bearer = self.tokens.load().await?.access;
        }

        tracing::debug!(method = %request.method, path = %request.path, ?profile, "sending request");
        let response = self.transport.send(&request).await?;

        if response.status == 401 && profile == Profile::Authenticated {
            let unauthorized = status_error(&request, &response);
            let Some(access) = self.refresh().await? else {
                return Err(unauthorized);
            };
            request.bearer = Some(access);
            tracing::debug!(path = %request.path, "replaying request with refreshed token");
            let replayed = self.transport.send(&request).await?;
            return check(&request, replayed);
        }

        check(&request, response)
    }

    /// Send `request` and decode the response body.
    pub async fn call<R: DeserializeOwned>(
        &self,
        profile: Profile,
        request: ApiRequest,
    ) -> Result<R, ApiError> {
        self.send(profile, request).await?.decode()
    }

    /// Send `request`, discarding the response body.
    pub async fn execute(&self, profile: Profile, request: ApiRequest) -> Result<(), ApiError> {
        self.send(profile, request).await.map(|_| ())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// `Ok(None)` means the session cannot be renewed; tokens have been cleared.
    async fn refresh(&self) -> Result<Option<String>, ApiError> {
        let stored = self.tokens.load().await?;
        let Some(refresh) = stored.refresh.clone() else {
            tracing::debug!("no refresh token stored");
            self.tokens.clear().await?;
            return Ok(None);
        };

        let request = ApiRequest::post(TOKEN_REFRESH_PATH).json(json!({ "refresh": refresh }));
        let renewed = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => response.decode::<RefreshResponse>().ok(),
            Ok(response) => {
                tracing::warn!(status = response.status, "token refresh rejected");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                None
            }
        };

        match renewed {
            Some(renewed) => {
                let tokens = Tokens {
                    access: Some(renewed.access.clone()),
                    refresh: renewed.refresh.or(stored.refresh),
                };
                self.tokens.save(&tokens).await?;
                tracing::info!("access token refreshed");
                Ok(Some(renewed.access))
            }
            None => {
                self.tokens.clear().await?;
                Ok(None)
            }
        }
    }
}

fn status_error(request: &ApiRequest, response: &ApiResponse) -> ApiError {
    tracing::warn!(method = %request.method, path = %request.path, status = response.status, "request failed");
    ApiError::Status {
        status: response.status,
        detail: backend_detail(&response.body),
    }
}

fn check(request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(status_error(request, &response))
    }
}
