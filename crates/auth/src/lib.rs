//! `hrdesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it holds the
//! identity types (principal, role) and the collaborator wire contracts, and
//! nothing that performs IO.

pub mod principal;
pub mod roles;
pub mod wire;

pub use principal::Principal;
pub use roles::Role;
pub use wire::{ApiErrorBody, ApiResponse, AuthResponse, LoginRequest};
