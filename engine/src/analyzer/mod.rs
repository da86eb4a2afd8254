//! Narrative analysis
//!
//! Produces one deterministic paragraph grounding the plan in retrieved
//! memory: how many entries were reinforced and which one carries the most
//! relevance. When nothing matched, it states that the directive opens a new
//! knowledge area.

use crate::memory::RetrievedMemory;
use crate::pipeline::EngineTuning;

/// Build the analysis paragraph for this call.
///
/// Deterministic given identical inputs: no clocks, no randomness.
pub fn analyze(plan: &[String], retrieved: &[RetrievedMemory], tuning: &EngineTuning) -> String {
    let steps = plan.len();

    if retrieved.is_empty() {
        return format!(
            "This directive opens a new knowledge area: no stored memory matched it. \
             The {steps}-step plan proceeds from the directive alone, so early steps \
             should emphasize gathering evidence."
        );
    }

    let reinforced = retrieved.len();
    let top = &retrieved[0];
    let considered = retrieved.len().min(tuning.analysis_top_n.max(1));

    format!(
        "Reinforced {reinforced} {} while planning {steps} {}, drawing on the top {considered} by relevance. \
         The strongest context is \"{}\" (relevance {:.2}), which should anchor execution.",
        plural(reinforced, "memory", "memories"),
        plural(steps, "step", "steps"),
        top.content,
        top.relevance,
    )
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
