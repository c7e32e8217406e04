/// Errors surfaced by the tenancy enforcement layer.
///
/// All variants except `Db` indicate a configuration or programming error
/// and abort the current operation; recoverable per-field validation
/// failures accumulate in [`crate::ValidationErrors`] instead.
#[derive(thiserror::Error, Debug)]
pub enum TenancyError {
    /// A scoped read was attempted with no tenant active and strict mode
    /// enabled.
    #[error("no tenant is active for the current task")]
    NoTenantSet,

    /// An attempt to change the tenant-linking field on a persisted record.
    #[error("tenant assignment is immutable once a record is persisted")]
    TenantIsImmutable,

    /// A tenant-FK-dependent helper was invoked on an entity without a
    /// direct tenant foreign key.
    #[error("entity is not scoped by a direct tenant foreign key")]
    ModelNotScopedByTenant,

    /// Database error occurred during query execution.
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// Invalid scoping configuration.
    #[error("invalid scoping: {0}")]
    Invalid(&'static str),
}
