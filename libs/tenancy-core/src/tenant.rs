use uuid::Uuid;

/// Opaque reference to the tenant that owns the current scope.
///
/// The enforcement layer never looks inside a tenant beyond its primary-key
/// value; callers typically build a `TenantRef` from whatever row or claim
/// identifies the tenant in their system.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TenantRef {
    id: Uuid,
}

impl TenantRef {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    /// Primary-key value of the referenced tenant.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl From<Uuid> for TenantRef {
    fn from(id: Uuid) -> Self {
        Self::new(id)
    }
}
