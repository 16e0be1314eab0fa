//! Error model for the session core.

use thiserror::Error;

/// Message shown when the server cannot be reached or answers garbage.
pub const CONNECTIVITY_MESSAGE: &str = "Could not reach the server. Please try again.";

/// Message recorded when a stored credential is rejected on verification.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired or is invalid.";

/// Failure of a single gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server rejected the bearer credential (HTTP 401). The gateway has
    /// already cleared the vault and its own bearer by the time this surfaces.
    #[error("session invalid: credential rejected by the server")]
    SessionInvalid,

    /// Non-401 HTTP error, with the collaborator's error payload when it
    /// could be decoded.
    #[error("api error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failure of a session-store operation, as surfaced to callers (forms).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The collaborator rejected the submitted credentials. The message is
    /// suitable for inline display next to the login form.
    #[error("{0}")]
    Credentials(String),

    /// Network failure or malformed response; generic, user-facing message.
    #[error("{0}")]
    Connectivity(String),

    /// A previously valid session was invalidated server-side.
    #[error("session invalid")]
    SessionInvalid,
}

impl SessionError {
    /// Map a login-attempt gateway failure onto the user-facing taxonomy.
    ///
    /// Prefers the collaborator's own error message when one was decodable,
    /// falling back to a generic connectivity message.
    pub(crate) fn from_login_failure(err: GatewayError) -> Self {
        match err {
            GatewayError::SessionInvalid => SessionError::SessionInvalid,
            GatewayError::Api { message, .. } => SessionError::Credentials(message),
            GatewayError::Network(_) | GatewayError::MalformedResponse(_) => {
                SessionError::Connectivity(CONNECTIVITY_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failure_prefers_collaborator_message() {
        let err = SessionError::from_login_failure(GatewayError::Api {
            status: 400,
            code: Some("INVALID_CREDENTIALS".to_string()),
            message: "Invalid email or password".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(matches!(err, SessionError::Credentials(_)));
    }

    #[test]
    fn login_failure_falls_back_to_generic_message() {
        let err = SessionError::from_login_failure(GatewayError::Network("dns".to_string()));
        assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
    }
}
