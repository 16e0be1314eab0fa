//! Wire contracts of the authentication collaborator.
//!
//! The server wraps every successful payload in a `{ success, data }`
//! envelope and reports failures as `{ error: { code, message } }`. Field
//! names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::Principal;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Principal,
    /// Access-token lifetime in seconds. Stored for completeness; this client
    /// has no refresh flow and re-verifies on startup instead.
    pub expires_in: u64,
}

/// Success envelope around every API payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error envelope returned on failed calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

/// The `error` object inside [`ApiErrorBody`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}
