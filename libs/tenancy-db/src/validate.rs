//! Tenant-aware validation: belongs-to reference checks and per-tenant
//! uniqueness.
//!
//! Failures here are recoverable and accumulate in [`ValidationErrors`] so
//! multiple problems surface to the caller at once; only configuration
//! errors (strict mode with no tenant, a through-scoped entity handed to a
//! FK-dependent helper) abort with a [`TenancyError`].

use std::fmt;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IdenStatic, PaginatorTrait,
    PrimaryKeyTrait, QueryFilter,
};
use tenancy_core::current_tenant;
use uuid::Uuid;

use crate::entity::{TenantAssociation, TenantScoped};
use crate::error::TenancyError;
use crate::select::ScopedSelectExt;
use crate::write::{excluding_self, is_persisted, value_of};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulated field-level validation failures.
///
/// Empty means the record passed. Checks append rather than abort, so one
/// validation pass can report every failing field.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    /// Returns the accumulated failures when any check failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks that a belongs-to reference resolves within the caller's scope.
///
/// An empty value passes. A non-empty value must resolve through the
/// target entity's own tenant-scoped lookup, so an id belonging to a
/// different tenant fails exactly like a missing id; the field-level error
/// `association is invalid` is attached to `errors`.
///
/// The tenant association itself and polymorphic associations are not
/// checkable this way and are simply not declared by the caller.
///
/// # Errors
/// - [`TenancyError::NoTenantSet`] in strict mode with no active tenant.
/// - `TenancyError::Db` if the lookup fails.
pub async fn check_reference<T, C>(
    field: &str,
    value: Option<Uuid>,
    conn: &C,
    errors: &mut ValidationErrors,
) -> Result<(), TenancyError>
where
    T: TenantScoped,
    C: ConnectionTrait + Send + Sync,
    Uuid: Into<<T::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let Some(id) = value else {
        return Ok(());
    };

    let found = T::find_by_id(id).tenant_scoped().scope()?.one(conn).await?;
    if found.is_none() {
        errors.add(field, "association is invalid");
    }
    Ok(())
}

/// Checks that the candidate's values for `fields` are unique within its
/// tenant.
///
/// The uniqueness scope always includes the tenant foreign key, taken from
/// the candidate itself or, when not yet stamped, from the task-local
/// context — so identical values under different tenants both pass. A
/// persisted candidate excludes itself by primary key. A conflict attaches
/// `has already been taken` to the first field in `fields`.
///
/// # Errors
/// - [`TenancyError::ModelNotScopedByTenant`] for through-scoped entities,
///   which have no foreign key to scope by.
/// - `TenancyError::Db` if the count query fails.
pub async fn check_unique<E, C>(
    am: &E::ActiveModel,
    fields: &[E::Column],
    conn: &C,
    errors: &mut ValidationErrors,
) -> Result<(), TenancyError>
where
    E: TenantScoped,
    C: ConnectionTrait + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
    E::Model: sea_orm::FromQueryResult + Send + Sync,
{
    let TenantAssociation::Direct { fk } = E::tenant_association() else {
        return Err(TenancyError::ModelNotScopedByTenant);
    };
    let Some(first) = fields.first() else {
        return Ok(());
    };

    let fk_value = value_of::<E>(am, fk).or_else(|| current_tenant().map(|t| t.id().into()));
    let mut query = E::find().filter(match fk_value {
        Some(v) => fk.eq(v),
        None => fk.is_null(),
    });
    for col in fields {
        query = query.filter(match value_of::<E>(am, *col) {
            Some(v) => col.eq(v),
            None => col.is_null(),
        });
    }
    if is_persisted::<E>(am) {
        query = excluding_self(query, am);
    }

    if query.count(conn).await? > 0 {
        errors.add(first.as_str(), "has already been taken");
    }
    Ok(())
}
