//! `hrdesk-session` — client-side session and authorization core.
//!
//! Everything the rest of the client needs to know about authentication goes
//! through this crate:
//!
//! - [`vault`] holds the credential pair durably across restarts.
//! - [`gateway`] is the single choke point for outbound API calls; it attaches
//!   the bearer token and tears the session down on any 401.
//! - [`store`] owns the session state machine and its operations
//!   (`login`, `logout`, `has_role`, startup verification).
//! - [`guard`] decides whether a protected region may render.
//!
//! Feature modules (employee CRUD, payroll, documents, …) only read the
//! session state and issue requests through the gateway; none of them may
//! mutate session state directly.

pub mod error;
pub mod gateway;
pub mod guard;
pub mod store;
pub mod vault;

pub use error::{GatewayError, SessionError};
pub use gateway::Gateway;
pub use guard::{check_access, AccessDecision};
pub use store::{SessionState, SessionStore};
pub use vault::{CredentialPair, FileVault, MemoryVault, TokenVault};
