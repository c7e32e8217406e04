use std::marker::PhantomData;

use sea_orm::{
    ConnectionTrait, EntityName, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tenancy_core::{current_tenant, require_tenant, TenantRef};

use crate::cond::scope_select;
use crate::entity::TenantScoped;
use crate::error::TenancyError;

/// Typestate marker: query has not yet been scoped.
/// Cannot execute queries in this state.
#[derive(Debug, Clone, Copy)]
pub struct Unscoped;

/// Typestate marker: query has passed the tenant-scoping transition.
/// Can now execute queries safely.
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

/// A wrapper around `SeaORM`'s `Select` that enforces tenant scoping.
///
/// The typestate pattern makes omission of the tenant filter structural:
/// execution methods exist only on the [`Scoped`] state, and the only way
/// to reach it is through [`ScopedSelect::scope`] (task-local context) or
/// [`ScopedSelect::scope_as`] (explicit tenant).
///
/// # Example
/// ```rust,ignore
/// let projects = project::Entity::find()
///     .tenant_scoped() // ScopedSelect<E, Unscoped>
///     .scope()?        // ScopedSelect<E, Scoped>
///     .all(&conn)      // now executable
///     .await?;
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct ScopedSelect<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::Select<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `Select` into a
/// [`ScopedSelect`].
pub trait ScopedSelectExt<E: EntityTrait>: Sized {
    /// Convert this select into a scoped (but not yet executable) select.
    /// Call `.scope()` or `.scope_as()` before executing.
    fn tenant_scoped(self) -> ScopedSelect<E, Unscoped>;
}

impl<E> ScopedSelectExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
{
    fn tenant_scoped(self) -> ScopedSelect<E, Unscoped> {
        ScopedSelect {
            inner: self,
            _state: PhantomData,
        }
    }
}

// Methods available only on Unscoped queries
impl<E> ScopedSelect<E, Unscoped>
where
    E: TenantScoped,
{
    /// Apply the current task's tenant, transitioning to the [`Scoped`]
    /// state.
    ///
    /// - A tenant is active: its filter is conjoined (FK equality for a
    ///   direct association, join chain plus tenant-table filter for a
    ///   through association).
    /// - No tenant and strict mode on: fails before any query is issued.
    /// - No tenant and strict mode off: the query passes through unscoped.
    ///   This is a deliberate escape hatch, logged at debug level.
    ///
    /// # Errors
    /// Returns [`TenancyError::NoTenantSet`] in strict mode with no active
    /// tenant.
    pub fn scope(self) -> Result<ScopedSelect<E, Scoped>, TenancyError> {
        match current_tenant() {
            Some(tenant) => Ok(self.scope_as(&tenant)),
            None if require_tenant() => Err(TenancyError::NoTenantSet),
            None => {
                tracing::debug!(
                    entity = E::default().table_name(),
                    "no tenant active, query left unscoped"
                );
                Ok(ScopedSelect {
                    inner: self.inner,
                    _state: PhantomData,
                })
            }
        }
    }

    /// Apply an explicitly supplied tenant, bypassing the task-local
    /// context. Intended for system jobs that iterate tenants.
    pub fn scope_as(self, tenant: &TenantRef) -> ScopedSelect<E, Scoped> {
        ScopedSelect {
            inner: scope_select(self.inner, tenant),
            _state: PhantomData,
        }
    }
}

// Methods available only on Scoped queries
impl<E> ScopedSelect<E, Scoped>
where
    E: EntityTrait,
{
    /// Execute the query and return all matching results.
    ///
    /// # Errors
    /// Returns `TenancyError::Db` if the database query fails.
    pub async fn all<C>(self, conn: &C) -> Result<Vec<E::Model>, TenancyError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        Ok(self.inner.all(conn).await?)
    }

    /// Execute the query and return at most one result.
    ///
    /// # Errors
    /// Returns `TenancyError::Db` if the database query fails.
    pub async fn one<C>(self, conn: &C) -> Result<Option<E::Model>, TenancyError>
    where
        C: ConnectionTrait + Send + Sync,
    {
        Ok(self.inner.one(conn).await?)
    }

    /// Execute the query and return the number of matching results.
    ///
    /// # Errors
    /// Returns `TenancyError::Db` if the database query fails.
    pub async fn count<C>(self, conn: &C) -> Result<u64, TenancyError>
    where
        C: ConnectionTrait + Send + Sync,
        E::Model: sea_orm::FromQueryResult + Send + Sync,
    {
        Ok(self.inner.count(conn).await?)
    }

    /// Add additional filters to the scoped query.
    /// The tenant conditions remain in place.
    pub fn filter(mut self, filter: sea_orm::Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Add ordering to the scoped query.
    pub fn order_by<C>(mut self, col: C, order: sea_orm::Order) -> Self
    where
        C: sea_orm::IntoSimpleExpr,
    {
        self.inner = QueryOrder::order_by(self.inner, col, order);
        self
    }

    /// Add a limit to the scoped query.
    pub fn limit(mut self, limit: u64) -> Self {
        self.inner = QuerySelect::limit(self.inner, limit);
        self
    }

    /// Add an offset to the scoped query.
    pub fn offset(mut self, offset: u64) -> Self {
        self.inner = QuerySelect::offset(self.inner, offset);
        self
    }

    /// Unwrap the inner `SeaORM` `Select` for advanced use cases.
    ///
    /// This is an escape hatch for additional joins, grouping, or custom
    /// selection after scoping has been applied. The caller must not
    /// remove or bypass the tenant conditions applied during the scope
    /// transition.
    #[must_use]
    pub fn into_inner(self) -> sea_orm::Select<E> {
        self.inner
    }
}
