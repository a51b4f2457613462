use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::auth::model::{Identity, Profile, Role};

/// Where the caller's role lands
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandingDto {
    pub role: Option<Role>,
    pub destination: String,
}

/// Raw session and role resolution state for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugSessionDto {
    pub identity: Option<Identity>,
    /// Profile row as stored, including inactive ones
    pub profile: Option<Profile>,
    pub role: Option<Role>,
}
