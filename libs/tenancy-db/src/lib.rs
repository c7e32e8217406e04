//! Row-level multi-tenant isolation over `SeaORM`.
//!
//! Every read against a tenant-scoped entity is constrained to the current
//! tenant, every create is stamped with it, tenant assignment is immutable
//! once a record is persisted, and cross-tenant references are rejected at
//! validation time. The current tenant is task-local state managed by
//! [`tenancy_core`]; enforcement is structural, using the typestate pattern
//! so that an unscoped read does not compile.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tenancy_db::{
//!     insert_scoped, with_tenant, ScopedSelectExt, TenantAssociation, TenantRef, TenantScoped,
//! };
//! use sea_orm::entity::prelude::*;
//!
//! // 1. Declare how the entity reaches its owning tenant.
//! impl TenantScoped for project::Entity {
//!     fn tenant_association() -> TenantAssociation<project::Column> {
//!         TenantAssociation::direct(project::Column::TenantId)
//!     }
//! }
//!
//! // 2. Enter a tenant scope and operate; reads are filtered, creates are
//! //    stamped.
//! with_tenant(TenantRef::new(tenant_id), async {
//!     let mine = project::Entity::find()
//!         .tenant_scoped() // ScopedSelect<E, Unscoped>: cannot execute yet
//!         .scope()?        // ScopedSelect<E, Scoped>: tenant filter applied
//!         .all(&conn)
//!         .await?;
//!
//!     let created = insert_scoped::<project::Entity, _>(
//!         project::ActiveModel {
//!             id: Set(Uuid::new_v4()),
//!             name: Set("onboarding".into()),
//!             ..Default::default()
//!         },
//!         &conn,
//!     )
//!     .await?;
//!     assert_eq!(created.tenant_id, tenant_id);
//!     Ok::<_, tenancy_db::TenancyError>(())
//! })
//! .await?;
//! ```
//!
//! # Scoping policy
//!
//! | Context | Strict mode | Behavior |
//! |---------|-------------|----------|
//! | Tenant active, direct FK | — | `fk = tenant.id()` conjoined |
//! | Tenant active, through join | — | inner joins + filter on the tenant table |
//! | Empty | on | `NoTenantSet` before any query |
//! | Empty | off | unscoped pass-through (logged escape hatch) |
//!
//! Indirect (through-join) entities are never auto-stamped — there is no
//! single foreign key to write — and reject FK-dependent helpers with
//! [`TenancyError::ModelNotScopedByTenant`].

mod cond;
mod entity;
mod error;
mod select;
mod validate;
mod write;

// Core types
pub use entity::{TenantAssociation, TenantScoped};
pub use error::TenancyError;

// Context types from tenancy-core
pub use tenancy_core::{
    current_tenant, require_tenant, set_require_tenant, with_tenant, with_tenant_sync,
    without_tenant, without_tenant_sync, TenantRef,
};

// Select operations
pub use select::{Scoped, ScopedSelect, ScopedSelectExt, Unscoped};

// Write operations
pub use write::{
    insert_scoped, set_tenant, set_tenant_id, stamp_tenant, update_scoped, ScopedDeleteExt,
    ScopedDeleteMany, ScopedUpdateExt, ScopedUpdateMany,
};

// Validation
pub use validate::{check_reference, check_unique, FieldError, ValidationErrors};
