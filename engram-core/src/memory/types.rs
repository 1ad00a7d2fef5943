use serde::{Deserialize, Serialize};

/// Semantic type of a memory's content (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Event-like: "we discussed X", raw interaction records.
    Episodic,
    /// Declarative-like: copulas, definitions, role statements.
    Semantic,
    /// Imperative/recipe-like: how-to content.
    Procedural,
    /// Synthesized summary produced by consolidation.
    Consolidated,
}

impl MemoryType {
    pub const ALL: [MemoryType; 4] = [
        Self::Episodic,
        Self::Semantic,
        Self::Procedural,
        Self::Consolidated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Episodic => "episodic",
            Self::Semantic => "semantic",
            Self::Procedural => "procedural",
            Self::Consolidated => "consolidated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "episodic" => Some(Self::Episodic),
            "semantic" => Some(Self::Semantic),
            "procedural" => Some(Self::Procedural),
            "consolidated" => Some(Self::Consolidated),
            _ => None,
        }
    }
}

/// Lifecycle status of the *fact*, not of the storage row (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    Active,
    Pending,
    Fulfilled,
    Superseded,
    Archived,
}

impl MemoryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Superseded => "superseded",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "fulfilled" => Some(Self::Fulfilled),
            "superseded" => Some(Self::Superseded),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Where a memory's content originated (spec §3 `source`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    Conversation { session_id: Option<String> },
    Document { reference: Option<String> },
    External { reference: Option<String> },
    System { reference: Option<String> },
}

impl Source {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Source::Conversation { session_id } => session_id.as_deref(),
            _ => None,
        }
    }
}

/// Directed edge kind between memories or between a memory and an entity
/// node (spec §3 `Edge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Supports,
    Contradicts,
    Elaborates,
    Supersedes,
    EntityShared,
    TemporalNext,
    User,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::Elaborates => "elaborates",
            Self::Supersedes => "supersedes",
            Self::EntityShared => "entity-shared",
            Self::TemporalNext => "temporal-next",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supports" => Some(Self::Supports),
            "contradicts" => Some(Self::Contradicts),
            "elaborates" => Some(Self::Elaborates),
            "supersedes" => Some(Self::Supersedes),
            "entity-shared" => Some(Self::EntityShared),
            "temporal-next" => Some(Self::TemporalNext),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Default spreading-activation per-kind weight (spec §4.4).
    pub fn spread_weight(self) -> f64 {
        match self {
            Self::Supports | Self::Elaborates => 1.0,
            Self::EntityShared => 0.7,
            Self::TemporalNext => 0.4,
            Self::Contradicts => 0.0,
            Self::Supersedes | Self::User => 0.5,
        }
    }
}
