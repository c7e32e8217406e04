//! Tenant identity and task-local tenant context.
//!
//! This crate carries the runtime-facing half of row-level multi-tenancy:
//! an opaque [`TenantRef`] naming the owning tenant, and a task-local
//! context cell that makes a tenant "current" for the dynamic extent of a
//! scope. The enforcement engine (query scoping, stamping, validation)
//! lives in `tenancy-db` and consults this crate on every operation.
//!
//! # Example
//!
//! ```rust
//! use tenancy_core::{current_tenant, with_tenant_sync, TenantRef};
//! use uuid::Uuid;
//!
//! let acme = TenantRef::new(Uuid::new_v4());
//!
//! assert!(current_tenant().is_none());
//! let seen = with_tenant_sync(acme.clone(), || current_tenant());
//! assert_eq!(seen, Some(acme));
//! assert!(current_tenant().is_none());
//! ```
//!
//! Scopes nest: an inner scope masks the outer tenant and the outer value
//! is visible again as soon as the inner scope exits, on every exit path
//! including panics. Two concurrently executing tasks never observe each
//! other's current tenant.

pub mod config;
pub mod context;
pub mod tenant;

pub use config::{require_tenant, set_require_tenant};
pub use context::{
    current_tenant, with_tenant, with_tenant_sync, without_tenant, without_tenant_sync,
};
pub use tenant::TenantRef;
