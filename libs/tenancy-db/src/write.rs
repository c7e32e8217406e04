use std::marker::PhantomData;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, Iterable,
    PrimaryKeyToColumn, QueryFilter,
};
use tenancy_core::{current_tenant, require_tenant, TenantRef};
use uuid::Uuid;

use crate::entity::{TenantAssociation, TenantScoped};
use crate::error::TenancyError;
use crate::select::{Scoped, Unscoped};

/// Whether the active model describes an already-persisted record.
///
/// Only a database round-trip produces `Unchanged` values in `SeaORM`, so a
/// record is persisted iff any of its columns carries one.
pub(crate) fn is_persisted<E>(am: &E::ActiveModel) -> bool
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    E::Column::iter().any(|col| matches!(am.get(col), ActiveValue::Unchanged(_)))
}

pub(crate) fn value_of<E>(am: &E::ActiveModel, col: E::Column) -> Option<sea_orm::Value>
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    match am.get(col) {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

/// Stamps the tenant foreign key from the task-local context.
///
/// No-op when the entity is through-scoped (there is no single foreign key
/// to write), when no tenant is active, or when the caller already set the
/// field explicitly — an explicit value is preserved, not overwritten.
pub fn stamp_tenant<E>(am: &mut E::ActiveModel)
where
    E: TenantScoped,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    let TenantAssociation::Direct { fk } = E::tenant_association() else {
        return;
    };
    let Some(tenant) = current_tenant() else {
        return;
    };
    if matches!(am.get(fk), ActiveValue::NotSet) {
        am.set(fk, tenant.id().into());
    }
}

/// Assigns the tenant association on a new record.
///
/// Funnels through the same immutability check as [`set_tenant_id`]: the
/// assignment succeeds on a record that has never been persisted and fails
/// with [`TenancyError::TenantIsImmutable`] otherwise.
///
/// # Errors
/// - [`TenancyError::ModelNotScopedByTenant`] for through-scoped entities.
/// - [`TenancyError::TenantIsImmutable`] for persisted records.
pub fn set_tenant<E>(am: &mut E::ActiveModel, tenant: &TenantRef) -> Result<(), TenancyError>
where
    E: TenantScoped,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    set_tenant_id::<E>(am, tenant.id())
}

/// Assigns the tenant foreign key on a new record.
///
/// # Errors
/// - [`TenancyError::ModelNotScopedByTenant`] for through-scoped entities.
/// - [`TenancyError::TenantIsImmutable`] for persisted records.
pub fn set_tenant_id<E>(am: &mut E::ActiveModel, tenant_id: Uuid) -> Result<(), TenancyError>
where
    E: TenantScoped,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    let TenantAssociation::Direct { fk } = E::tenant_association() else {
        return Err(TenancyError::ModelNotScopedByTenant);
    };
    if is_persisted::<E>(am) {
        return Err(TenancyError::TenantIsImmutable);
    }
    am.set(fk, tenant_id.into());
    Ok(())
}

/// Guarded creation path: stamps the tenant foreign key, then inserts.
///
/// # Errors
/// Returns `TenancyError::Db` if the insert fails.
pub async fn insert_scoped<E, C>(mut am: E::ActiveModel, conn: &C) -> Result<E::Model, TenancyError>
where
    E: TenantScoped,
    C: ConnectionTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: sea_orm::IntoActiveModel<E::ActiveModel>,
{
    stamp_tenant::<E>(&mut am);
    Ok(am.insert(conn).await?)
}

/// Guarded update path: rejects tenant reassignment, then updates.
///
/// A `Set` tenant foreign key on an update is an attempted reassignment of
/// a persisted record's tenant and is never silently ignored.
///
/// # Errors
/// - [`TenancyError::TenantIsImmutable`] if the tenant foreign key carries
///   a new value.
/// - `TenancyError::Db` if the update fails.
pub async fn update_scoped<E, C>(am: E::ActiveModel, conn: &C) -> Result<E::Model, TenancyError>
where
    E: TenantScoped,
    C: ConnectionTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: sea_orm::IntoActiveModel<E::ActiveModel>,
{
    if let TenantAssociation::Direct { fk } = E::tenant_association() {
        if matches!(am.get(fk), ActiveValue::Set(_)) {
            return Err(TenancyError::TenantIsImmutable);
        }
    }
    Ok(am.update(conn).await?)
}

/// A wrapper around `SeaORM`'s `UpdateMany` that enforces tenant scoping,
/// mirroring [`crate::ScopedSelect`]: `exec` exists only on the [`Scoped`]
/// state.
///
/// # Example
/// ```rust,ignore
/// let result = project::Entity::update_many()
///     .col_expr(project::Column::Name, Expr::value("archived"))
///     .tenant_scoped()
///     .scope()?
///     .exec(&conn)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct ScopedUpdateMany<E: EntityTrait, S> {
    inner: sea_orm::UpdateMany<E>,
    _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `UpdateMany` into a
/// [`ScopedUpdateMany`].
pub trait ScopedUpdateExt<E: EntityTrait>: Sized {
    /// Convert this update into a scoped (but not yet executable) update.
    fn tenant_scoped(self) -> ScopedUpdateMany<E, Unscoped>;
}

impl<E> ScopedUpdateExt<E> for sea_orm::UpdateMany<E>
where
    E: EntityTrait,
{
    fn tenant_scoped(self) -> ScopedUpdateMany<E, Unscoped> {
        ScopedUpdateMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> ScopedUpdateMany<E, Unscoped>
where
    E: TenantScoped,
{
    /// Apply the current task's tenant, transitioning to the [`Scoped`]
    /// state. Same policy as [`crate::ScopedSelect::scope`].
    ///
    /// # Errors
    /// - [`TenancyError::NoTenantSet`] in strict mode with no active
    ///   tenant.
    /// - [`TenancyError::Invalid`] for through-scoped entities: SQL
    ///   UPDATE cannot express the join.
    pub fn scope(self) -> Result<ScopedUpdateMany<E, Scoped>, TenancyError> {
        match current_tenant() {
            Some(tenant) => self.scope_as(&tenant),
            None if require_tenant() => Err(TenancyError::NoTenantSet),
            None => Ok(ScopedUpdateMany {
                inner: self.inner,
                _state: PhantomData,
            }),
        }
    }

    /// Apply an explicitly supplied tenant.
    ///
    /// # Errors
    /// Returns [`TenancyError::Invalid`] for through-scoped entities.
    pub fn scope_as(self, tenant: &TenantRef) -> Result<ScopedUpdateMany<E, Scoped>, TenancyError> {
        match E::tenant_association() {
            TenantAssociation::Direct { fk } => Ok(ScopedUpdateMany {
                inner: self.inner.filter(fk.eq(tenant.id())),
                _state: PhantomData,
            }),
            TenantAssociation::Through { .. } => Err(TenancyError::Invalid(
                "scoped bulk writes require a direct tenant foreign key",
            )),
        }
    }
}

impl<E> ScopedUpdateMany<E, Scoped>
where
    E: EntityTrait,
{
    /// Execute the update.
    ///
    /// # Errors
    /// Returns `TenancyError::Db` if the database operation fails.
    pub async fn exec<C: ConnectionTrait + Send + Sync>(
        self,
        conn: &C,
    ) -> Result<sea_orm::UpdateResult, TenancyError> {
        Ok(self.inner.exec(conn).await?)
    }

    /// Add additional filters to the scoped update.
    /// The tenant conditions remain in place.
    #[must_use]
    pub fn filter(mut self, filter: sea_orm::Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Unwrap the inner `SeaORM` `UpdateMany` for advanced use cases. The
    /// caller must not remove or bypass the tenant conditions.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::UpdateMany<E> {
        self.inner
    }
}

/// A wrapper around `SeaORM`'s `DeleteMany` that enforces tenant scoping.
#[derive(Clone, Debug)]
pub struct ScopedDeleteMany<E: EntityTrait, S> {
    inner: sea_orm::DeleteMany<E>,
    _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `DeleteMany` into a
/// [`ScopedDeleteMany`].
pub trait ScopedDeleteExt<E: EntityTrait>: Sized {
    /// Convert this delete into a scoped (but not yet executable) delete.
    fn tenant_scoped(self) -> ScopedDeleteMany<E, Unscoped>;
}

impl<E> ScopedDeleteExt<E> for sea_orm::DeleteMany<E>
where
    E: EntityTrait,
{
    fn tenant_scoped(self) -> ScopedDeleteMany<E, Unscoped> {
        ScopedDeleteMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> ScopedDeleteMany<E, Unscoped>
where
    E: TenantScoped,
{
    /// Apply the current task's tenant, transitioning to the [`Scoped`]
    /// state. Same policy as [`crate::ScopedSelect::scope`].
    ///
    /// # Errors
    /// - [`TenancyError::NoTenantSet`] in strict mode with no active
    ///   tenant.
    /// - [`TenancyError::Invalid`] for through-scoped entities: SQL
    ///   DELETE cannot express the join.
    pub fn scope(self) -> Result<ScopedDeleteMany<E, Scoped>, TenancyError> {
        match current_tenant() {
            Some(tenant) => self.scope_as(&tenant),
            None if require_tenant() => Err(TenancyError::NoTenantSet),
            None => Ok(ScopedDeleteMany {
                inner: self.inner,
                _state: PhantomData,
            }),
        }
    }

    /// Apply an explicitly supplied tenant.
    ///
    /// # Errors
    /// Returns [`TenancyError::Invalid`] for through-scoped entities.
    pub fn scope_as(self, tenant: &TenantRef) -> Result<ScopedDeleteMany<E, Scoped>, TenancyError> {
        match E::tenant_association() {
            TenantAssociation::Direct { fk } => Ok(ScopedDeleteMany {
                inner: self.inner.filter(fk.eq(tenant.id())),
                _state: PhantomData,
            }),
            TenantAssociation::Through { .. } => Err(TenancyError::Invalid(
                "scoped bulk writes require a direct tenant foreign key",
            )),
        }
    }
}

impl<E> ScopedDeleteMany<E, Scoped>
where
    E: EntityTrait,
{
    /// Execute the delete.
    ///
    /// # Errors
    /// Returns `TenancyError::Db` if the database operation fails.
    pub async fn exec<C: ConnectionTrait + Send + Sync>(
        self,
        conn: &C,
    ) -> Result<sea_orm::DeleteResult, TenancyError> {
        Ok(self.inner.exec(conn).await?)
    }

    /// Add additional filters to the scoped delete.
    /// The tenant conditions remain in place.
    #[must_use]
    pub fn filter(mut self, filter: sea_orm::Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Unwrap the inner `SeaORM` `DeleteMany` for advanced use cases. The
    /// caller must not remove or bypass the tenant conditions.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::DeleteMany<E> {
        self.inner
    }
}

/// Primary-key self-exclusion filter for uniqueness checks on persisted
/// candidates.
pub(crate) fn excluding_self<E>(
    mut query: sea_orm::Select<E>,
    am: &E::ActiveModel,
) -> sea_orm::Select<E>
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    for pk in E::PrimaryKey::iter() {
        let col = pk.into_column();
        if let Some(v) = value_of::<E>(am, col) {
            query = query.filter(col.ne(v));
        }
    }
    query
}
