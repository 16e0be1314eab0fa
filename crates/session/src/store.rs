//! The session state machine and its operations.
//!
//! One [`SessionStore`] exists per running client. It owns the session state
//! behind a lock; only its private reducer applies transitions, and everything
//! else — guards, forms, feature modules — reads snapshots or calls the
//! public operations.

use std::sync::{Arc, RwLock, Weak};

use tokio::sync::OnceCell;

use hrdesk_auth::wire::{AuthResponse, LoginRequest};
use hrdesk_auth::{Principal, Role};

use crate::error::{SessionError, CONNECTIVITY_MESSAGE, SESSION_EXPIRED_MESSAGE};
use crate::gateway::Gateway;
use crate::vault::TokenVault;

const LOGIN_PATH: &str = "/auth/login";
const ME_PATH: &str = "/auth/me";

/// In-memory authentication state of the running client.
///
/// Invariant: `is_authenticated == principal.is_some()`. `is_loading` is true
/// only strictly between the start of a login/verify attempt and its
/// resolution; logout is synchronous and never sets it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub const fn initial() -> Self {
        Self {
            principal: None,
            is_authenticated: false,
            is_loading: false,
            error: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Transitions of the session state machine.
#[derive(Debug, Clone)]
enum SessionAction {
    /// A login or verify attempt started.
    Start,
    /// The attempt resolved with an authenticated principal.
    Success(Principal),
    /// The attempt resolved with a user-facing failure message.
    Failure(String),
    /// Hard reset to the initial state.
    Logout,
    /// Clear the last error, leaving everything else untouched.
    ClearError,
}

fn reduce(state: &mut SessionState, action: SessionAction) {
    match action {
        SessionAction::Start => {
            state.is_loading = true;
            state.error = None;
        }
        SessionAction::Success(principal) => {
            *state = SessionState {
                principal: Some(principal),
                is_authenticated: true,
                is_loading: false,
                error: None,
            };
        }
        SessionAction::Failure(message) => {
            *state = SessionState {
                principal: None,
                is_authenticated: false,
                is_loading: false,
                error: Some(message),
            };
        }
        SessionAction::Logout => *state = SessionState::initial(),
        SessionAction::ClearError => state.error = None,
    }
}

/// Owner of the session state machine.
///
/// Construction wires the gateway's 401 teardown back into the store, so a
/// rejected bearer on *any* feature call forces the unauthenticated state.
pub struct SessionStore {
    state: RwLock<SessionState>,
    vault: Arc<dyn TokenVault>,
    gateway: Arc<Gateway>,
    verify_once: OnceCell<()>,
}

impl SessionStore {
    /// Build the store and its gateway against `base_url`.
    pub fn new(base_url: impl Into<String>, vault: Arc<dyn TokenVault>) -> Arc<Self> {
        let gateway = Arc::new(Gateway::new(base_url, Arc::clone(&vault)));

        let store = Arc::new(Self {
            state: RwLock::new(SessionState::initial()),
            vault,
            gateway: Arc::clone(&gateway),
            verify_once: OnceCell::new(),
        });

        // The gateway clears vault and bearer itself on 401; the hook makes
        // the state machine follow. Weak, so the hook never keeps a dropped
        // store alive.
        let weak: Weak<SessionStore> = Arc::downgrade(&store);
        gateway.set_invalidation_hook(Arc::new(move || {
            if let Some(store) = weak.upgrade() {
                store.dispatch(SessionAction::Logout);
            }
        }));

        store
    }

    /// The gateway shared by every feature module.
    pub fn gateway(&self) -> Arc<Gateway> {
        Arc::clone(&self.gateway)
    }

    fn dispatch(&self, action: SessionAction) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        reduce(&mut state, action);
    }

    /// Read-only copy of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn principal(&self) -> Option<Principal> {
        self.snapshot().principal
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot().error
    }

    /// True when the signed-in principal holds one of `roles`.
    ///
    /// Total and pure: false when unauthenticated, false for an empty slice.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.snapshot()
            .principal
            .map(|p| p.has_any_role(roles))
            .unwrap_or(false)
    }

    pub fn clear_error(&self) {
        self.dispatch(SessionAction::ClearError);
    }

    /// Authenticate against the collaborator.
    ///
    /// On success the credential pair lands in the vault, the gateway carries
    /// the new bearer, and the state holds the returned principal. On failure
    /// the state records a user-facing message and the error is returned so
    /// the login form can keep its own submitting state correct. The vault is
    /// never touched on a failed attempt.
    ///
    /// Callers must not invoke `login` again while a prior call is still
    /// loading; disable the submitting UI while `is_loading` is set.
    pub async fn login(&self, credentials: LoginRequest) -> Result<(), SessionError> {
        self.dispatch(SessionAction::Start);
        tracing::debug!(email = %credentials.email, "login attempt");

        let auth: AuthResponse = match self.gateway.post(LOGIN_PATH, &credentials).await {
            Ok(auth) => auth,
            Err(err) => {
                tracing::info!(error = %err, "login failed");
                let err = SessionError::from_login_failure(err);
                self.dispatch(SessionAction::Failure(err.to_string()));
                return Err(err);
            }
        };

        self.vault.store(&auth.access_token, &auth.refresh_token);
        self.gateway.set_bearer(Some(auth.access_token.clone()));
        tracing::info!(user = %auth.user.id, role = %auth.user.role, "login succeeded");
        self.dispatch(SessionAction::Success(auth.user));
        Ok(())
    }

    /// Synchronous sign-out: clear the bearer, clear the vault, reset the
    /// state. Safe to call when already unauthenticated.
    pub fn logout(&self) {
        self.gateway.set_bearer(None);
        self.vault.clear();
        self.dispatch(SessionAction::Logout);
        tracing::info!("logged out");
    }

    /// Verify a persisted credential on startup.
    ///
    /// Runs at most once per store lifetime: concurrent and repeated callers
    /// all await the same single check, so mounting several consumers never
    /// issues duplicate network calls. With an empty vault this is a no-op —
    /// no request is made and the state stays initial.
    pub async fn verify_session(&self) {
        self.verify_once
            .get_or_init(|| async {
                let Some(pair) = self.vault.read() else {
                    tracing::debug!("no stored credentials; skipping startup verification");
                    return;
                };

                self.gateway.set_bearer(Some(pair.access_token));
                self.dispatch(SessionAction::Start);

                match self.gateway.get::<Principal>(ME_PATH).await {
                    Ok(user) => {
                        tracing::info!(user = %user.id, "session verified");
                        self.dispatch(SessionAction::Success(user));
                    }
                    Err(err) => {
                        // On 401 the gateway has already cleared vault and
                        // bearer; all that remains is recording the failure.
                        tracing::info!(error = %err, "startup verification failed");
                        let message = match err {
                            crate::error::GatewayError::SessionInvalid => SESSION_EXPIRED_MESSAGE,
                            _ => CONNECTIVITY_MESSAGE,
                        };
                        self.dispatch(SessionAction::Failure(message.to_string()));
                    }
                }
            })
            .await;
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}
