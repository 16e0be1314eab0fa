//! `hrdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the HR records an
//! authenticated principal can link to.

pub mod employee;
pub mod error;
pub mod id;

pub use employee::{Department, EmployeeProfile, EmployeeStatus};
pub use error::{DomainError, DomainResult};
pub use id::{DepartmentId, EmployeeId, UserId};
