//! Process-wide enforcement configuration.

use std::sync::atomic::{AtomicBool, Ordering};

static REQUIRE_TENANT: AtomicBool = AtomicBool::new(false);

/// Enables or disables strict mode.
///
/// With strict mode on, a scoped read issued while no tenant is active
/// fails with `NoTenantSet` before any query reaches the database. With it
/// off, such reads pass through unscoped. Off by default.
pub fn set_require_tenant(enabled: bool) {
    REQUIRE_TENANT.store(enabled, Ordering::SeqCst);
}

/// Whether strict mode is enabled.
#[must_use]
pub fn require_tenant() -> bool {
    REQUIRE_TENANT.load(Ordering::SeqCst)
}
