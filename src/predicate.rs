//! Keyword predicates over normalized text.
//!
//! Routing and explanation rules are ordered lists of these predicates. Matching
//! is plain substring containment, so `"database"` also matches inside
//! `"databases"` and `"asc"` inside `"cascade"`.

/// Predicate evaluated against lower-cased text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPredicate {
    /// text CONTAINS every keyword
    All(&'static [&'static str]),
    /// text CONTAINS at least one keyword
    Any(&'static [&'static str]),
    /// text CONTAINS none of the keywords
    None(&'static [&'static str]),
    /// Always true (fallback rule)
    Always,
}

impl TextPredicate {
    /// Evaluate predicate against already lower-cased text.
    pub fn evaluate(&self, text: &str) -> bool {
        match self {
            Self::All(words) => words.iter().all(|w| text.contains(w)),
            Self::Any(words) => words.iter().any(|w| text.contains(w)),
            Self::None(words) => !words.iter().any(|w| text.contains(w)),
            Self::Always => true,
        }
    }
}

/// Return the outcome of the first rule whose predicate holds.
pub fn first_match<T: Copy>(rules: &[(TextPredicate, T)], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|(predicate, _)| predicate.evaluate(text))
        .map(|(_, outcome)| *outcome)
}
