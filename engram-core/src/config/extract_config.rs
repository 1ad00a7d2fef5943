use serde::{Deserialize, Serialize};

/// Auto-extraction and aggregation-routing configuration (spec §4.2, §4.5.1,
/// §6.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Phrase patterns ("all X", "every X", "pending", ...) that route a
    /// query's seed phase to `byStatus`/`byType` materialization instead of
    /// vector search.
    pub aggregation_phrases: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            aggregation_phrases: vec![
                "all".to_string(),
                "every".to_string(),
                "pending".to_string(),
                "what are my commitments".to_string(),
                "list of decisions".to_string(),
            ],
        }
    }
}
