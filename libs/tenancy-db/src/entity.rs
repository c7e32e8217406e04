use std::fmt;

use sea_orm::sea_query::{DynIden, IntoIden};
use sea_orm::{EntityTrait, RelationDef};

/// Declares how an entity reaches its owning tenant.
///
/// Each tenant-scoped entity carries exactly one association, fixed by its
/// [`TenantScoped`] implementation:
/// - [`TenantAssociation::Direct`]: the tenant id is stored in a foreign-key
///   column on the entity itself. Reads filter on that column, creates stamp
///   it, and it is immutable once the record is persisted.
/// - [`TenantAssociation::Through`]: the tenant is reached via intermediate
///   relations. Reads join the hops and filter on the tenant table; there is
///   no foreign key to stamp or guard, so FK-dependent helpers reject such
///   entities.
pub enum TenantAssociation<C> {
    /// Tenant id stored in a foreign-key column on the entity.
    Direct {
        /// The foreign-key column holding the tenant's primary-key value.
        fk: C,
    },
    /// Tenant reached through intermediate relations.
    Through {
        /// Relation hops from this entity to the tenant table, in join
        /// order.
        hops: Vec<RelationDef>,
        /// The tenant table joined by the final hop.
        tenant_table: DynIden,
        /// The tenant primary-key column on that table.
        tenant_pk: DynIden,
    },
}

impl<C> TenantAssociation<C> {
    /// Direct association via a foreign-key column.
    pub fn direct(fk: C) -> Self {
        Self::Direct { fk }
    }

    /// Indirect association through a chain of relations ending at the
    /// tenant table.
    pub fn through<T, P>(hops: Vec<RelationDef>, tenant_table: T, tenant_pk: P) -> Self
    where
        T: IntoIden,
        P: IntoIden,
    {
        Self::Through {
            hops,
            tenant_table: tenant_table.into_iden(),
            tenant_pk: tenant_pk.into_iden(),
        }
    }

    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }
}

impl<C: fmt::Debug> fmt::Debug for TenantAssociation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct { fk } => f.debug_struct("Direct").field("fk", fk).finish(),
            Self::Through { hops, .. } => f
                .debug_struct("Through")
                .field("hops", &hops.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Contract for entities whose rows belong to exactly one tenant.
///
/// Implementing this trait opts the entity into the enforcement engine:
/// scoped reads ([`crate::ScopedSelectExt`]), creation-time stamping and
/// the immutability guard ([`crate::stamp_tenant`], [`crate::set_tenant`]),
/// and tenant-aware validation ([`crate::check_reference`],
/// [`crate::check_unique`]).
///
/// # Example
/// ```rust,ignore
/// impl TenantScoped for project::Entity {
///     fn tenant_association() -> TenantAssociation<project::Column> {
///         TenantAssociation::direct(project::Column::TenantId)
///     }
/// }
///
/// impl TenantScoped for task::Entity {
///     fn tenant_association() -> TenantAssociation<task::Column> {
///         TenantAssociation::through(
///             vec![
///                 task::Relation::Project.def(),
///                 project::Relation::Tenant.def(),
///             ],
///             tenant::Entity,
///             tenant::Column::Id,
///         )
///     }
/// }
/// ```
pub trait TenantScoped: EntityTrait {
    /// How rows of this entity are linked to their owning tenant.
    fn tenant_association() -> TenantAssociation<Self::Column>;
}
