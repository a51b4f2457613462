use std::sync::Arc;

use super::directory::IdentityDirectory;
use crate::core::error::Result;
use crate::features::auth::gate::AdminGrant;

/// Admin-only view into the identity provider.
///
/// Holds the only path to the management credential. Every call needs an
/// [`AdminGrant`], which only `AccessGate::require_admin` can produce.
pub struct ElevatedIdentityBridge {
    directory: Arc<dyn IdentityDirectory>,
}

impl ElevatedIdentityBridge {
    pub fn new(directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { directory }
    }

    /// Contact email of another identity. `None` if the identity is unknown
    /// to the provider.
    pub async fn lookup_identity_contact(
        &self,
        grant: &AdminGrant,
        identity_id: &str,
    ) -> Result<Option<String>> {
        tracing::info!(
            actor = %grant.identity().id,
            target = %identity_id,
            "Elevated identity lookup"
        );

        self.directory.primary_email(identity_id).await
    }
}
