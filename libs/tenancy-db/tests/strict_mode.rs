#![allow(clippy::unwrap_used, clippy::expect_used)]

// Strict mode flips a process-wide flag, so everything lives in one test
// function in its own binary; the other suites run with the default (lax)
// setting.

mod common;

use common::{create_project, project, seed_tenant};
use sea_orm::EntityTrait;
use tenancy_db::{
    set_require_tenant, with_tenant, ScopedDeleteExt, ScopedSelectExt, ScopedUpdateExt,
    TenancyError,
};

#[tokio::test]
async fn strict_mode_rejects_scoped_operations_without_a_tenant() {
    let conn = common::setup().await;
    let t1 = seed_tenant(&conn, "acme").await;
    with_tenant(t1.clone(), create_project(&conn, "alpha")).await;

    set_require_tenant(true);

    // The failure happens at the scope transition, before any query is
    // issued: no connection is involved.
    let err = project::Entity::find().tenant_scoped().scope().unwrap_err();
    assert!(matches!(err, TenancyError::NoTenantSet));

    let err = project::Entity::update_many()
        .tenant_scoped()
        .scope()
        .unwrap_err();
    assert!(matches!(err, TenancyError::NoTenantSet));

    let err = project::Entity::delete_many()
        .tenant_scoped()
        .scope()
        .unwrap_err();
    assert!(matches!(err, TenancyError::NoTenantSet));

    // With a tenant active, strict mode changes nothing.
    let visible = with_tenant(t1.clone(), async {
        project::Entity::find()
            .tenant_scoped()
            .scope()
            .expect("scope")
            .all(&conn)
            .await
            .expect("query")
    })
    .await;
    assert_eq!(visible.len(), 1);

    set_require_tenant(false);
}
