//! Access guard for protected regions.
//!
//! A pure policy check over the current session state and the roles a region
//! requires. No IO, no panics, no hidden state: the routing layer calls
//! [`check_access`] on every protected navigation and acts on the decision.

use hrdesk_auth::Role;

use crate::store::SessionState;

/// Outcome of gating one protected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// A login/verify attempt is in flight; render a neutral pending
    /// indicator, neither the content nor a redirect.
    Pending,

    /// Not signed in; go to the login entry point, remembering where the
    /// visitor was headed so a successful login can return them there.
    RedirectToLogin { from: String },

    /// Signed in, but the role does not satisfy the requirement. Displayed
    /// in place; this is an expected outcome, not an error, and never a
    /// navigation.
    Denied { required: Vec<Role>, actual: Role },

    /// Render the protected content.
    Granted,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Gate a protected region.
///
/// `required` is the role set attached to the region by the routing layer; an
/// empty set means any authenticated visitor may enter. `requested_path` is
/// the location being navigated to, carried into the redirect decision.
pub fn check_access(
    session: &SessionState,
    required: &[Role],
    requested_path: &str,
) -> AccessDecision {
    if session.is_loading {
        return AccessDecision::Pending;
    }

    let Some(principal) = &session.principal else {
        return AccessDecision::RedirectToLogin {
            from: requested_path.to_string(),
        };
    };

    if !required.is_empty() && !principal.has_any_role(required) {
        return AccessDecision::Denied {
            required: required.to_vec(),
            actual: principal.role,
        };
    }

    AccessDecision::Granted
}
