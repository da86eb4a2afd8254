//! Memory store
//!
//! Owns the caller-supplied memory snapshot for the duration of one call.
//! Supports scored retrieval, reinforcement of retrieved entries, decay of
//! untouched entries, and insertion of new insights. Entries are never
//! removed: memory grows in count and self-regulates in influence through
//! `strength`, which downstream confidence scoring consumes.
//!
//! Entries arriving from the wire may be malformed (missing fields, strength
//! outside `[0, 1]`). The store normalizes instead of failing so the engine
//! stays total.

use chrono::{DateTime, Utc};

use sdk::types::MemoryEntry;

use crate::intake::{clauses_match_tag, slug};
use crate::pipeline::EngineTuning;

/// A retrieved entry with its relevance score and post-reinforcement strength.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMemory {
    /// Entry id
    pub id: String,
    /// Entry content, for narrative use downstream
    pub content: String,
    /// Relevance score computed against the directive's clauses
    pub relevance: f64,
    /// Strength after reinforcement was applied
    pub strength: f64,
}

/// Call-scoped memory store.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Vec<MemoryEntry>,
    /// Ids touched this call (reinforced or inserted); exempt from decay
    touched: Vec<String>,
    /// Id of the entry inserted this call, if any
    inserted: Option<String>,
}

impl MemoryStore {
    /// Take ownership of the caller's snapshot, normalizing malformed entries.
    ///
    /// Normalization: strength clamped to `[0.0, 1.0]`, duplicate tags
    /// collapsed, empty or duplicate ids replaced with unique generated ones.
    pub fn new(entries: Vec<MemoryEntry>) -> Self {
        let mut normalized: Vec<MemoryEntry> = Vec::with_capacity(entries.len());

        for (index, mut entry) in entries.into_iter().enumerate() {
            entry.strength = entry.strength.clamp(0.0, 1.0);
            if !entry.strength.is_finite() {
                entry.strength = 0.5;
            }
            entry.tags.retain(|tag| !tag.trim().is_empty());
            dedupe_in_place(&mut entry.tags);

            if entry.id.trim().is_empty() {
                entry.id = format!("memory-{}", index + 1);
            }
            entry.id = unique_id(&normalized, entry.id);

            normalized.push(entry);
        }

        Self {
            entries: normalized,
            touched: Vec::new(),
            inserted: None,
        }
    }

    /// Retrieve entries relevant to the directive's clauses, reinforcing each.
    ///
    /// Relevance per entry is the fraction of its tags sharing a lexical stem
    /// with any clause, plus a strength bonus. Entries with no matching tag
    /// are excluded. Results are ordered by relevance, ties broken by higher
    /// strength, then earlier creation time. Every returned entry has its
    /// strength reinforced (clamped to 1.0) before this method returns.
    pub fn retrieve(&mut self, clauses: &[String], tuning: &EngineTuning) -> Vec<RetrievedMemory> {
        let mut scored: Vec<(usize, f64)> = Vec::new();

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.tags.is_empty() {
                continue;
            }
            let matched = entry
                .tags
                .iter()
                .filter(|tag| clauses_match_tag(clauses, tag))
                .count();
            if matched == 0 {
                continue;
            }
            let fraction = matched as f64 / entry.tags.len() as f64;
            let relevance = fraction + tuning.relevance_strength_bonus * entry.strength;
            scored.push((index, relevance));
        }

        scored.sort_by(|(a_idx, a_rel), (b_idx, b_rel)| {
            let a = &self.entries[*a_idx];
            let b = &self.entries[*b_idx];
            b_rel
                .total_cmp(a_rel)
                .then_with(|| b.strength.total_cmp(&a.strength))
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut retrieved = Vec::with_capacity(scored.len());
        for (index, relevance) in scored {
            let entry = &mut self.entries[index];
            entry.strength = (entry.strength + tuning.reinforcement_increment).min(1.0);
            self.touched.push(entry.id.clone());
            retrieved.push(RetrievedMemory {
                id: entry.id.clone(),
                content: entry.content.clone(),
                relevance,
                strength: entry.strength,
            });
        }

        retrieved
    }

    /// Decay every entry not touched this call, floored at 0.0.
    ///
    /// Models forgetting of unused knowledge; never removes entries.
    pub fn decay(&mut self, tuning: &EngineTuning) {
        for entry in &mut self.entries {
            if !self.touched.contains(&entry.id) {
                entry.strength = (entry.strength - tuning.decay_decrement).max(0.0);
            }
        }
    }

    /// Insert a new insight at neutral strength, returning its id.
    pub fn insert(
        &mut self,
        content: impl Into<String>,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> String {
        let content = content.into();
        let id = unique_id(&self.entries, format!("insight-{}", slug(&content, 4)));

        let entry = MemoryEntry::new(id.clone(), content, tags, now, 0.5);
        self.touched.push(id.clone());
        self.inserted = Some(id.clone());
        self.entries.push(entry);

        id
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The entry inserted this call, if any.
    pub fn inserted(&self) -> Option<&MemoryEntry> {
        self.inserted.as_deref().and_then(|id| self.get(id))
    }

    /// Consume the store, yielding the updated snapshot for the caller.
    pub fn into_entries(self) -> Vec<MemoryEntry> {
        self.entries
    }
}

/// Collapse duplicate tags, keeping first occurrence order.
fn dedupe_in_place(tags: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    tags.retain(|tag| {
        let lowered = tag.to_lowercase();
        if seen.contains(&lowered) {
            false
        } else {
            seen.push(lowered);
            true
        }
    });
}

/// Make an id unique within the given entries by appending a counter.
fn unique_id(entries: &[MemoryEntry], candidate: String) -> String {
    if !entries.iter().any(|entry| entry.id == candidate) {
        return candidate;
    }
    let mut counter = 2;
    loop {
        let attempt = format!("{candidate}-{counter}");
        if !entries.iter().any(|entry| entry.id == attempt) {
            return attempt;
        }
        counter += 1;
    }
}
