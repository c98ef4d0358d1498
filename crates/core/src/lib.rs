//! `coldstore-core`: shared domain building blocks.
//!
//! Tenant identity and the domain error model. No infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::TenantId;
