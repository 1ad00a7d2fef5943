mod auth_config;
mod consolidation_config;
mod embed_config;
mod extract_config;
mod lifecycle_config;
mod recall_config;

pub use auth_config::AuthConfig;
pub use consolidation_config::ConsolidationConfig;
pub use embed_config::EmbedConfig;
pub use extract_config::ExtractConfig;
pub use lifecycle_config::LifecycleConfig;
pub use recall_config::{RecallConfig, ScoringWeights, SpreadConfig};

use serde::{Deserialize, Serialize};

/// Top-level vault configuration (spec §6.4) — one aggregate, enumerated
/// options, `#[serde(default)]` throughout so a partial config document
/// only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Ownership tag, opaque to the engine; carried on every memory for
    /// multi-tenant deployments that share a process.
    pub owner: String,
    /// Filesystem path to the SQLite database file.
    pub db_path: String,
    pub embedding: EmbedConfig,
    pub recall: RecallConfig,
    pub consolidation: ConsolidationConfig,
    pub lifecycle: LifecycleConfig,
    pub extract: ExtractConfig,
    pub auth: AuthConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            owner: "default".to_string(),
            db_path: "engram.db".to_string(),
            embedding: EmbedConfig::default(),
            recall: RecallConfig::default(),
            consolidation: ConsolidationConfig::default(),
            lifecycle: LifecycleConfig::default(),
            extract: ExtractConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let cfg = VaultConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: VaultConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.owner, cfg.owner);
        assert_eq!(back.recall.rrf_k, cfg.recall.rrf_k);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let partial = r#"{"owner": "alice"}"#;
        let cfg: VaultConfig = serde_json::from_str(partial).expect("deserialize");
        assert_eq!(cfg.owner, "alice");
        assert_eq!(cfg.db_path, VaultConfig::default().db_path);
        assert_eq!(
            cfg.consolidation.merge_threshold,
            ConsolidationConfig::default().merge_threshold
        );
    }
}
