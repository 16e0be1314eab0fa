//! Authenticated gateway: the single choke point for outbound API calls.
//!
//! Every feature module issues its requests through one [`Gateway`]. The
//! gateway attaches the bearer credential when one is set, decodes the
//! collaborator's `{ success, data }` envelope, and applies the one
//! cross-cutting protocol rule of the client: **any** 401 response tears the
//! session down (vault cleared, bearer cleared, invalidation hook fired)
//! regardless of which feature issued the call.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use hrdesk_auth::wire::{ApiErrorBody, ApiResponse};

use crate::error::GatewayError;
use crate::vault::TokenVault;

/// Called after a 401 teardown, so the session store can drop its principal.
pub(crate) type InvalidationHook = Arc<dyn Fn() + Send + Sync>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client carrying the bearer credential.
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
    vault: Arc<dyn TokenVault>,
    on_session_invalid: RwLock<Option<InvalidationHook>>,
}

impl Gateway {
    /// Gateway against `base_url` (e.g. `http://localhost:4000/api`).
    ///
    /// A trailing slash on `base_url` is tolerated; request paths must carry
    /// the leading slash (`/auth/login`, never `auth/login`).
    pub fn new(base_url: impl Into<String>, vault: Arc<dyn TokenVault>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url,
            bearer: RwLock::new(None),
            vault,
            on_session_invalid: RwLock::new(None),
        }
    }

    /// Set or clear the credential attached to future requests.
    pub fn set_bearer(&self, token: Option<String>) {
        *write(&self.bearer) = token;
    }

    /// The currently attached bearer token, if any.
    pub fn bearer(&self) -> Option<String> {
        read(&self.bearer).clone()
    }

    /// Install the hook fired after a 401 teardown. One hook per gateway;
    /// installed by the session store at construction.
    pub(crate) fn set_invalidation_hook(&self, hook: InvalidationHook) {
        *write(&self.on_session_invalid) = Some(hook);
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError> {
        debug_assert!(
            path.starts_with('/'),
            "gateway paths are absolute, with a leading slash"
        );

        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);

        if let Some(token) = read(&self.bearer).as_deref() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::debug!(%method, %url, error = %e, "request failed before a response");
            GatewayError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.teardown_session();
            return Err(GatewayError::SessionInvalid);
        }

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => (Some(body.error.code), body.error.message),
                Err(_) if text.is_empty() => (None, status.to_string()),
                Err(_) => (None, text),
            };
            return Err(GatewayError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let envelope: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        if !envelope.success {
            return Err(GatewayError::MalformedResponse(
                "collaborator reported failure without an error status".to_string(),
            ));
        }

        Ok(envelope.data)
    }

    /// 401 teardown: clear the vault, clear the bearer, notify the store.
    ///
    /// Runs in the response path so it applies uniformly to every call.
    fn teardown_session(&self) {
        tracing::warn!("bearer rejected with 401; tearing down the session");
        self.vault.clear();
        *write(&self.bearer) = None;

        let hook = read(&self.on_session_invalid).clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("bearer_set", &read(&self.bearer).is_some())
            .finish_non_exhaustive()
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::MemoryVault;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let gw = Gateway::new("http://localhost:4000/api/", Arc::new(MemoryVault::new()));
        assert_eq!(gw.base_url, "http://localhost:4000/api");
    }

    #[test]
    fn bearer_set_and_clear() {
        let gw = Gateway::new("http://localhost:4000/api", Arc::new(MemoryVault::new()));
        assert_eq!(gw.bearer(), None);

        gw.set_bearer(Some("t1".to_string()));
        assert_eq!(gw.bearer(), Some("t1".to_string()));

        gw.set_bearer(None);
        assert_eq!(gw.bearer(), None);
    }
}
