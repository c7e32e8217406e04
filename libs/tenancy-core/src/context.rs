//! Task-local "current tenant" cell.
//!
//! The current tenant is state owned by the executing task, not a process
//! global: two tasks running concurrently each observe their own value, and
//! setting the tenant in one is never visible to the other. Scope entry is
//! the only mutation path; the prior value is restored on every exit path,
//! including unwinds, so nested scopes behave as a stack.

use std::future::Future;

use crate::tenant::TenantRef;

tokio::task_local! {
    static CURRENT_TENANT: Option<TenantRef>;
}

/// Returns the tenant active for the calling task, or `None` when no scope
/// is active (or the innermost scope is an explicit [`without_tenant`]).
#[must_use]
pub fn current_tenant() -> Option<TenantRef> {
    CURRENT_TENANT.try_with(Clone::clone).ok().flatten()
}

/// Runs `body` with `tenant` as the current tenant.
///
/// The prior value is restored when `body` completes, whether it returns
/// normally, returns an error, or unwinds. Calls nest: an inner scope masks
/// the outer tenant for its duration only.
pub async fn with_tenant<F>(tenant: TenantRef, body: F) -> F::Output
where
    F: Future,
{
    CURRENT_TENANT.scope(Some(tenant), body).await
}

/// Synchronous form of [`with_tenant`].
pub fn with_tenant_sync<T>(tenant: TenantRef, body: impl FnOnce() -> T) -> T {
    CURRENT_TENANT.sync_scope(Some(tenant), body)
}

/// Runs `body` with an explicitly empty tenant context, masking any outer
/// scope. With strict mode off this is the sanctioned way to issue
/// unscoped operations; with strict mode on, scoped reads inside still
/// fail.
pub async fn without_tenant<F>(body: F) -> F::Output
where
    F: Future,
{
    CURRENT_TENANT.scope(None, body).await
}

/// Synchronous form of [`without_tenant`].
pub fn without_tenant_sync<T>(body: impl FnOnce() -> T) -> T {
    CURRENT_TENANT.sync_scope(None, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tenant() -> TenantRef {
        TenantRef::new(Uuid::new_v4())
    }

    #[test]
    fn empty_outside_any_scope() {
        assert!(current_tenant().is_none());
    }

    #[test]
    fn scope_sets_and_restores() {
        let t = tenant();

        let seen = with_tenant_sync(t.clone(), current_tenant);

        assert_eq!(seen, Some(t));
        assert!(current_tenant().is_none());
    }

    #[test]
    fn nested_scope_masks_outer_and_restores() {
        let outer = tenant();
        let inner = tenant();

        with_tenant_sync(outer.clone(), || {
            assert_eq!(current_tenant(), Some(outer.clone()));

            with_tenant_sync(inner.clone(), || {
                assert_eq!(current_tenant(), Some(inner.clone()));
            });

            assert_eq!(current_tenant(), Some(outer.clone()));
        });
    }

    #[test]
    fn without_tenant_masks_outer() {
        let outer = tenant();

        with_tenant_sync(outer.clone(), || {
            without_tenant_sync(|| {
                assert!(current_tenant().is_none());
            });
            assert_eq!(current_tenant(), Some(outer.clone()));
        });
    }

    #[test]
    fn scope_restores_after_panic() {
        let outer = tenant();
        let inner = tenant();

        with_tenant_sync(outer.clone(), || {
            let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                with_tenant_sync(inner.clone(), || panic!("boom"));
            }));

            assert!(unwound.is_err());
            assert_eq!(current_tenant(), Some(outer.clone()));
        });
    }

    #[test]
    fn deep_nesting_unwinds_in_order() {
        let tenants: Vec<TenantRef> = (0..8).map(|_| tenant()).collect();

        fn descend(tenants: &[TenantRef]) {
            let Some((head, rest)) = tenants.split_first() else {
                return;
            };
            with_tenant_sync(head.clone(), || {
                assert_eq!(current_tenant(), Some(head.clone()));
                descend(rest);
                assert_eq!(current_tenant(), Some(head.clone()));
            });
        }

        descend(&tenants);
        assert!(current_tenant().is_none());
    }
}
