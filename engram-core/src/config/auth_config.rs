use serde::{Deserialize, Serialize};

/// Bearer-token auth for the vault's HTTP facade (spec §6.2, §6.4).
///
/// Absent `bearer_token` means the facade is unauthenticated — acceptable
/// for local/embedded use, the caller's responsibility to gate network
/// exposure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub bearer_token: Option<String>,
}
