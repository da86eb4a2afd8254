//! Wire types for memory entries and agent messages
//!
//! These types define the JSON shapes exchanged across the `/api/agent`
//! boundary and the CLI memory file. Field names follow the wire contract
//! (`createdAt` in camelCase); optional message facets serialize only when
//! present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A durable, caller-held fact with an associated relevance weight.
///
/// Entries are owned by the caller: the engine receives the complete set on
/// every call and returns the complete updated set. `strength` is always
/// clamped to `[0.0, 1.0]`; it is mutated only by reinforcement or decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Unique opaque identifier, assigned at creation
    #[serde(default)]
    pub id: String,

    /// Free text describing the retained insight
    #[serde(default)]
    pub content: String,

    /// Short labels used for relevance matching (order irrelevant)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp, immutable after creation
    #[serde(rename = "createdAt", default = "epoch")]
    pub created_at: DateTime<Utc>,

    /// Relevance/confidence weight in `[0.0, 1.0]`
    #[serde(default = "neutral_strength")]
    pub strength: f64,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn neutral_strength() -> f64 {
    0.5
}

impl MemoryEntry {
    /// Create a new entry with a clamped strength
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
        strength: f64,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            tags,
            created_at,
            strength: strength.clamp(0.0, 1.0),
        }
    }
}

/// Seed memory for first use.
///
/// The caller invokes this factory when it has no memory of its own yet; the
/// engine never seeds memory implicitly.
pub fn seed_memory(now: DateTime<Utc>) -> Vec<MemoryEntry> {
    vec![MemoryEntry::new(
        "seed-vision",
        "Default focus: produce actionable strategies with measurable outcomes.",
        vec!["foundation".to_string()],
        now,
        0.8,
    )]
}

/// A candidate action with a certainty score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    /// Short label, unique within one response
    pub title: String,

    /// Explanatory text elaborating the action
    pub description: String,

    /// Certainty score in `[0.05, 0.95]`
    pub confidence: f64,
}

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A caller-issued directive
    User,
    /// An engine-produced reflection
    Agent,
}

/// The structured response produced once per engine invocation.
///
/// Facets (`plan`, `analysis`, `actions`, `reflections`) are explicit
/// optionals: absent facets are omitted from the wire shape entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Unique identifier
    pub id: String,

    /// Message author role
    pub role: Role,

    /// Primary text body
    pub content: String,

    /// Ordered plan steps, if a plan was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,

    /// Narrative analysis, if produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Candidate actions, if produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<AgentAction>>,

    /// Memory-change reflections, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflections: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_memory_entry_clamps_strength() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let high = MemoryEntry::new("a", "x", vec![], now, 1.7);
        assert_eq!(high.strength, 1.0);

        let low = MemoryEntry::new("b", "y", vec![], now, -0.3);
        assert_eq!(low.strength, 0.0);
    }

    #[test]
    fn test_memory_entry_lenient_deserialization() {
        // Missing tags and strength get the normalization defaults
        let entry: MemoryEntry =
            serde_json::from_str(r#"{"id": "m1", "content": "note"}"#).unwrap();
        assert!(entry.tags.is_empty());
        assert_eq!(entry.strength, 0.5);
        assert_eq!(entry.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_memory_entry_wire_shape() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let entry = MemoryEntry::new("m1", "note", vec!["ops".to_string()], now, 0.4);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["createdAt"], "2024-06-01T12:00:00Z");
        assert_eq!(json["strength"], 0.4);
    }

    #[test]
    fn test_seed_memory_shape() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let seed = seed_memory(now);
        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].id, "seed-vision");
        assert_eq!(seed[0].tags, vec!["foundation"]);
        assert_eq!(seed[0].strength, 0.8);
    }

    #[test]
    fn test_role_wire_values() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
    }

    #[test]
    fn test_absent_facets_are_omitted() {
        let message = AgentMessage {
            id: "m".to_string(),
            role: Role::Agent,
            content: "done".to_string(),
            plan: None,
            analysis: None,
            actions: None,
            reflections: None,
        };
        let json = serde_json::to_value(&message).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("plan"));
        assert!(!object.contains_key("analysis"));
        assert!(!object.contains_key("actions"));
        assert!(!object.contains_key("reflections"));
    }
}
