use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, JoinType, QueryFilter, QuerySelect, Select};
use tenancy_core::TenantRef;

use crate::entity::{TenantAssociation, TenantScoped};

/// Conjoins the tenant filter for `tenant` into `select`.
///
/// - Direct association: `fk = tenant.id()`.
/// - Through association: inner-join each hop in order, then filter the
///   tenant table's primary key on the joined side.
///
/// The caller decides what "no tenant" means (strict error or unscoped
/// pass-through); this function always has a tenant to apply.
pub(crate) fn scope_select<E>(select: Select<E>, tenant: &TenantRef) -> Select<E>
where
    E: TenantScoped,
{
    match E::tenant_association() {
        TenantAssociation::Direct { fk } => select.filter(fk.eq(tenant.id())),
        TenantAssociation::Through {
            hops,
            tenant_table,
            tenant_pk,
        } => {
            let mut joined = select;
            for hop in hops {
                joined = joined.join(JoinType::InnerJoin, hop);
            }
            joined.filter(Expr::col((tenant_table, tenant_pk)).eq(tenant.id()))
        }
    }
}
