//! Memory-change reflections
//!
//! Summarizes what this call did to memory: one statement per reinforced
//! entry (up to three, in relevance order) plus one for a newly inserted
//! entry. A call that somehow touched nothing yields no reflections.

use sdk::types::MemoryEntry;

use crate::memory::RetrievedMemory;

/// Maximum reflections per response.
const MAX_REFLECTIONS: usize = 3;

/// Strength below this is reported as "low".
const LOW_BAND_CEILING: f64 = 0.35;

/// Strength below this (and at or above the low ceiling) is "medium".
const MEDIUM_BAND_CEILING: f64 = 0.7;

/// Build reflection statements for this call's memory changes.
pub fn reflect(retrieved: &[RetrievedMemory], inserted: Option<&MemoryEntry>) -> Vec<String> {
    let mut reflections: Vec<String> = retrieved
        .iter()
        .take(MAX_REFLECTIONS)
        .map(|memory| {
            format!(
                "Reinforced \"{}\" to {} strength ({:.2}).",
                memory.content,
                strength_band(memory.strength),
                memory.strength,
            )
        })
        .collect();

    if let Some(entry) = inserted {
        reflections.push(format!(
            "Recorded a new insight \"{}\" at neutral strength.",
            entry.content
        ));
    }

    reflections.truncate(MAX_REFLECTIONS);
    reflections
}

/// Classify a strength value into its reporting band.
pub fn strength_band(strength: f64) -> &'static str {
    if strength < LOW_BAND_CEILING {
        "low"
    } else if strength < MEDIUM_BAND_CEILING {
        "medium"
    } else {
        "high"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn retrieved(content: &str, strength: f64) -> RetrievedMemory {
        RetrievedMemory {
            id: "m".to_string(),
            content: content.to_string(),
            relevance: 1.0,
            strength,
        }
    }

    #[test]
    fn test_strength_bands() {
        assert_eq!(strength_band(0.0), "low");
        assert_eq!(strength_band(0.34), "low");
        assert_eq!(strength_band(0.35), "medium");
        assert_eq!(strength_band(0.69), "medium");
        assert_eq!(strength_band(0.7), "high");
        assert_eq!(strength_band(1.0), "high");
    }

    #[test]
    fn test_one_reflection_per_reinforced_entry() {
        let reflections = reflect(&[retrieved("ship weekly", 0.8)], None);
        assert_eq!(reflections.len(), 1);
        assert!(reflections[0].contains("\"ship weekly\""));
        assert!(reflections[0].contains("high strength (0.80)"));
    }

    #[test]
    fn test_insertion_reflection() {
        let entry = MemoryEntry::new(
            "insight-x",
            "Directive focus: launch",
            vec![],
            DateTime::<Utc>::UNIX_EPOCH,
            0.5,
        );
        let reflections = reflect(&[], Some(&entry));
        assert_eq!(reflections.len(), 1);
        assert!(reflections[0].contains("new insight"));
        assert!(reflections[0].contains("Directive focus: launch"));
    }

    #[test]
    fn test_capped_at_three() {
        let memories = vec![
            retrieved("a", 0.5),
            retrieved("b", 0.5),
            retrieved("c", 0.5),
            retrieved("d", 0.5),
        ];
        assert_eq!(reflect(&memories, None).len(), 3);
    }

    #[test]
    fn test_untouched_memory_yields_no_reflections() {
        assert!(reflect(&[], None).is_empty());
    }
}
