//! Directive intake and normalization
//!
//! Cleans and tokenizes the incoming directive before anything else runs.
//! A directive is lower-cased and split into candidate clauses on
//! sentence-ending punctuation, commas, and the coordinating conjunctions
//! "and" and "then". Non-empty input always yields at least one clause
//! (the whole directive if no separators are found).
//!
//! The module also owns the lexical stemmer shared with relevance scoring:
//! a deliberately small suffix-stripper, not a linguistic one. Matching is
//! by stem equality with a prefix tolerance so that close inflections
//! ("strategy" / "strategies") still land on the same stem.

use regex::Regex;

/// Minimum word length left after suffix stripping
const MIN_STEM_LEN: usize = 3;

/// Minimum stem length for prefix-tolerant matching
const MIN_PREFIX_MATCH_LEN: usize = 4;

/// Normalizer that splits directives into candidate clauses.
#[derive(Debug, Clone)]
pub struct Normalizer {
    splitter: Regex,
}

impl Normalizer {
    /// Create a new normalizer with the default clause separators
    pub fn new() -> Self {
        // Sentence-ending punctuation, commas, semicolons, and the
        // coordinating conjunctions "and"/"then" as whole words.
        let splitter = Regex::new(r"[.!?;,]|\band\b|\bthen\b").expect("clause splitter is valid");
        Self { splitter }
    }

    /// Split a directive into normalized clauses.
    ///
    /// Clauses are lower-cased and trimmed; empty fragments between
    /// separators are dropped. For non-empty input the result is never
    /// empty: if no separator produces a clause, the whole lowered
    /// directive is the single clause.
    pub fn clauses(&self, directive: &str) -> Vec<String> {
        let lowered = directive.trim().to_lowercase();

        let mut clauses: Vec<String> = self
            .splitter
            .split(&lowered)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(String::from)
            .collect();

        if clauses.is_empty() && !lowered.is_empty() {
            clauses.push(lowered);
        }

        clauses
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a word to a crude lexical stem by stripping common suffixes.
pub fn stem(word: &str) -> String {
    let lowered = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    if let Some(stripped) = lowered.strip_suffix("ies") {
        if stripped.len() >= MIN_STEM_LEN - 1 {
            return format!("{stripped}y");
        }
    }

    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stripped) = lowered.strip_suffix(suffix) {
            if stripped.len() >= MIN_STEM_LEN {
                return stripped.to_string();
            }
        }
    }

    lowered
}

/// Check whether two words share a lexical stem.
pub fn shares_stem(a: &str, b: &str) -> bool {
    let stem_a = stem(a);
    let stem_b = stem(b);

    if stem_a.is_empty() || stem_b.is_empty() {
        return false;
    }

    if stem_a == stem_b {
        return true;
    }

    // Prefix tolerance for inflections the stripper misses
    let (shorter, longer) = if stem_a.len() <= stem_b.len() {
        (&stem_a, &stem_b)
    } else {
        (&stem_b, &stem_a)
    };
    shorter.len() >= MIN_PREFIX_MATCH_LEN && longer.starts_with(shorter.as_str())
}

/// Build a deterministic slug from the first `max_words` words of a text.
///
/// Used for reply and insight ids so that identical input produces identical
/// identifiers.
pub fn slug(text: &str, max_words: usize) -> String {
    let joined = text
        .split_whitespace()
        .take(max_words)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if joined.is_empty() {
        "note".to_string()
    } else {
        joined
    }
}

/// Check whether any word of any clause shares a stem with the given tag.
pub fn clauses_match_tag(clauses: &[String], tag: &str) -> bool {
    clauses
        .iter()
        .flat_map(|clause| clause.split_whitespace())
        .any(|word| shares_stem(word, tag))
}
