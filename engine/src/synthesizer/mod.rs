//! Action synthesis and confidence scoring
//!
//! Emits one candidate action per plan step, up to a cap. Confidence is the
//! engine's core scoring heuristic: a weighted combination of average
//! retrieved-memory strength and directive specificity, clamped away from
//! absolute certainty and impossibility. It is a pure function of the plan,
//! the retrieved memories, and the directive.

use sdk::types::AgentAction;

use crate::memory::RetrievedMemory;
use crate::pipeline::EngineTuning;

/// Number of words in an action title's short form.
const TITLE_WORDS: usize = 4;

/// Synthesize candidate actions for the leading plan steps.
pub fn synthesize(
    plan: &[String],
    retrieved: &[RetrievedMemory],
    clause_count: usize,
    tuning: &EngineTuning,
) -> Vec<AgentAction> {
    let confidence = confidence(retrieved, clause_count, tuning);

    let mut actions: Vec<AgentAction> = Vec::new();
    for step in plan.iter().take(tuning.max_actions) {
        let title = unique_title(&actions, short_form(step));
        let description = if retrieved.is_empty() {
            format!("{step}. Grounded in no prior memory, so validate assumptions while executing.")
        } else {
            format!(
                "{step}. Informed by {} reinforced memor{} from earlier directives.",
                retrieved.len(),
                if retrieved.len() == 1 { "y" } else { "ies" },
            )
        };
        actions.push(AgentAction {
            title,
            description,
            confidence,
        });
    }

    actions
}

/// Compute the confidence score shared by this call's actions.
///
/// `memory_weight * average retrieved strength + specificity_weight *
/// specificity`, where specificity is the clause count capped at the plan
/// limit and scaled into `[0, 1]`. The result is clamped to the configured
/// floor and ceiling (defaults 0.05 and 0.95).
pub fn confidence(
    retrieved: &[RetrievedMemory],
    clause_count: usize,
    tuning: &EngineTuning,
) -> f64 {
    let average_strength = if retrieved.is_empty() {
        0.0
    } else {
        retrieved.iter().map(|r| r.strength).sum::<f64>() / retrieved.len() as f64
    };

    let cap = tuning.max_plan_steps.max(1);
    let specificity = clause_count.min(cap) as f64 / cap as f64;

    (tuning.memory_weight * average_strength + tuning.specificity_weight * specificity)
        .clamp(tuning.confidence_floor, tuning.confidence_ceiling)
}

/// Short form of a step: its first few words.
fn short_form(step: &str) -> String {
    step.split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep titles unique within one response.
fn unique_title(actions: &[AgentAction], candidate: String) -> String {
    if !actions.iter().any(|action| action.title == candidate) {
        return candidate;
    }
    let mut counter = 2;
    loop {
        let attempt = format!("{candidate} ({counter})");
        if !actions.iter().any(|action| action.title == attempt) {
            return attempt;
        }
        counter += 1;
    }
}
