//! Plan decomposition
//!
//! Turns normalized clauses into an ordered plan of 1 to 5 steps. Each
//! clause becomes one step; a directive with a single clause gets a
//! synthesized verification step so outcomes stay measurable, and overflow
//! clauses are merged into the final step.

use crate::pipeline::EngineTuning;

/// Step synthesized when a directive decomposes into a single clause.
const VERIFICATION_STEP: &str = "Verify outcomes against measurable success criteria";

/// Fallback first step when no clauses survive normalization.
const FALLBACK_STEP: &str = "Restate the directive as a concrete goal";

/// Decompose clauses into an ordered plan.
///
/// Never returns an empty plan and never exceeds `tuning.max_plan_steps`.
pub fn plan(clauses: &[String], tuning: &EngineTuning) -> Vec<String> {
    let max_steps = tuning.max_plan_steps.max(2);

    let mut steps: Vec<String> = clauses.iter().map(|clause| sentence_case(clause)).collect();

    if steps.is_empty() {
        steps.push(FALLBACK_STEP.to_string());
    }

    if steps.len() < 2 {
        steps.push(VERIFICATION_STEP.to_string());
    }

    if steps.len() > max_steps {
        let overflow = steps.split_off(max_steps - 1);
        steps.push(overflow.join("; "));
    }

    steps
}

/// Upper-case the first character of a clause.
fn sentence_case(clause: &str) -> String {
    let mut chars = clause.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> EngineTuning {
        EngineTuning::default()
    }

    fn clauses(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_single_clause_gets_verification_step() {
        let steps = plan(&clauses(&["launch a product"]), &tuning());
        assert_eq!(
            steps,
            vec!["Launch a product".to_string(), VERIFICATION_STEP.to_string()]
        );
    }

    #[test]
    fn test_each_clause_becomes_one_step() {
        let steps = plan(&clauses(&["research", "draft", "ship"]), &tuning());
        assert_eq!(steps, vec!["Research", "Draft", "Ship"]);
    }

    #[test]
    fn test_overflow_clauses_merge_into_final_step() {
        let steps = plan(
            &clauses(&["one", "two", "three", "four", "five", "six", "seven"]),
            &tuning(),
        );
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[3], "Four");
        assert_eq!(steps[4], "Five; Six; Seven");
    }

    #[test]
    fn test_plan_is_never_empty() {
        let steps = plan(&[], &tuning());
        assert!(!steps.is_empty());
        assert!(steps.len() <= 5);
    }

    #[test]
    fn test_plan_length_bounds() {
        for count in 1..12 {
            let input: Vec<String> = (0..count).map(|i| format!("clause {i}")).collect();
            let steps = plan(&input, &tuning());
            assert!((1..=5).contains(&steps.len()), "count {count}: {steps:?}");
        }
    }
}
