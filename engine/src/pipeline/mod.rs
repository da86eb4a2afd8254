//! Pipeline orchestration and response composition
//!
//! The whole engine is a single-pass pipeline with no state across calls:
//! normalize the directive, retrieve and reinforce relevant memory, decay
//! the rest, plan, analyze, synthesize actions, reflect, and compose the
//! reply together with the updated memory snapshot.
//!
//! `Engine::process` is total for any non-empty directive and any
//! well-formed memory set, and deterministic for identical
//! `(directive, memory, now)` inputs. The clock is an explicit argument so
//! the boundary, not the engine, owns wall time.

use chrono::{DateTime, Utc};
use tracing::debug;

use sdk::agent::AgentHandle;
use sdk::types::{AgentMessage, MemoryEntry, Role};

use crate::analyzer;
use crate::intake::{slug, stem, Normalizer};
use crate::memory::MemoryStore;
use crate::planner;
use crate::reflector;
use crate::synthesizer;

/// Minimum word length for a derived tag.
const MIN_TAG_WORD_LEN: usize = 4;

/// Maximum number of tags derived for an inserted insight.
const MAX_DERIVED_TAGS: usize = 3;

/// Tunable constants of the reasoning pipeline.
///
/// The reinforcement/decay magnitudes and scoring weights are design
/// choices, not behaviorally fixed values, so they are carried here and fed
/// from configuration. Defaults follow the reference behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineTuning {
    /// Strength added to every retrieved entry, clamped to 1.0
    pub reinforcement_increment: f64,
    /// Strength removed from every untouched entry, floored at 0.0
    pub decay_decrement: f64,
    /// Relevance bonus per unit of strength for tag-matched entries
    pub relevance_strength_bonus: f64,
    /// Weight of average retrieved strength in confidence scoring
    pub memory_weight: f64,
    /// Weight of directive specificity in confidence scoring
    pub specificity_weight: f64,
    /// Lower clamp for action confidence
    pub confidence_floor: f64,
    /// Upper clamp for action confidence
    pub confidence_ceiling: f64,
    /// Maximum plan steps (also the specificity scale cap)
    pub max_plan_steps: usize,
    /// Maximum synthesized actions per response
    pub max_actions: usize,
    /// Number of top retrieved entries the analyzer considers
    pub analysis_top_n: usize,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            reinforcement_increment: 0.15,
            decay_decrement: 0.05,
            relevance_strength_bonus: 0.1,
            memory_weight: 0.5,
            specificity_weight: 0.5,
            confidence_floor: 0.05,
            confidence_ceiling: 0.95,
            max_plan_steps: 5,
            max_actions: 3,
            analysis_top_n: 3,
        }
    }
}

/// The directive-reasoning engine.
///
/// Holds only tuning and the compiled clause splitter; all per-call state
/// lives in the call itself, so one engine value can serve any number of
/// isolated callers.
#[derive(Debug, Clone)]
pub struct Engine {
    tuning: EngineTuning,
    normalizer: Normalizer,
}

impl Engine {
    /// Create an engine with default tuning
    pub fn new() -> Self {
        Self::with_tuning(EngineTuning::default())
    }

    /// Create an engine with explicit tuning
    pub fn with_tuning(tuning: EngineTuning) -> Self {
        Self {
            tuning,
            normalizer: Normalizer::new(),
        }
    }

    /// The engine's tuning
    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    /// Run one directive through the pipeline.
    ///
    /// Returns the composed reply and the complete updated memory set.
    /// Every call either reinforces retrieved entries or inserts one new
    /// insight, so memory always changes in exactly one of the two ways.
    pub fn process(
        &self,
        directive: &str,
        memory: Vec<MemoryEntry>,
        now: DateTime<Utc>,
    ) -> (AgentMessage, Vec<MemoryEntry>) {
        let directive = directive.trim();
        let clauses = self.normalizer.clauses(directive);
        debug!(clause_count = clauses.len(), "normalized directive");

        let mut store = MemoryStore::new(memory);
        let retrieved = store.retrieve(&clauses, &self.tuning);
        store.decay(&self.tuning);
        debug!(reinforced = retrieved.len(), "memory retrieval complete");

        let plan = planner::plan(&clauses, &self.tuning);
        let analysis = analyzer::analyze(&plan, &retrieved, &self.tuning);
        let actions = synthesizer::synthesize(&plan, &retrieved, clauses.len(), &self.tuning);

        if retrieved.is_empty() {
            let content = format!("Directive focus: {directive}");
            let id = store.insert(content, derive_tags(&clauses), now);
            debug!(%id, "inserted new insight");
        }

        let reflections = reflector::reflect(&retrieved, store.inserted());

        let content = if retrieved.is_empty() {
            format!(
                "Processed the directive into {} plan steps and recorded one new insight.",
                plan.len()
            )
        } else {
            format!(
                "Processed the directive into {} plan steps, reinforcing {} memor{}.",
                plan.len(),
                retrieved.len(),
                if retrieved.len() == 1 { "y" } else { "ies" },
            )
        };

        let message = AgentMessage {
            id: format!("reply-{}", slug(directive, 4)),
            role: Role::Agent,
            content,
            plan: Some(plan),
            analysis: Some(analysis),
            actions: (!actions.is_empty()).then_some(actions),
            reflections: (!reflections.is_empty()).then_some(reflections),
        };

        (message, store.into_entries())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentHandle for Engine {
    fn process(
        &self,
        directive: &str,
        memory: Vec<MemoryEntry>,
        now: DateTime<Utc>,
    ) -> (AgentMessage, Vec<MemoryEntry>) {
        Engine::process(self, directive, memory, now)
    }
}

/// Derive insight tags from the directive's clauses: the first few distinct
/// stems of meaningful words.
fn derive_tags(clauses: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in clauses.iter().flat_map(|clause| clause.split_whitespace()) {
        if word.len() < MIN_TAG_WORD_LEN {
            continue;
        }
        let tag = stem(word);
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == MAX_DERIVED_TAGS {
            break;
        }
    }
    tags
}
