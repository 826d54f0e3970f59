//! Best-effort spell correction of data requests.
//!
//! Misspelled schema words ("salry", "employes") make the model guess column
//! names, so requests are corrected against a small vocabulary before they are
//! put into the SQL prompt. Common English words are part of the vocabulary so
//! they are never rewritten into nearby SQL words.

use crate::config::SchemaConfig;
use crate::llm::DATA_KEYWORDS;
use std::collections::BTreeSet;

/// Words a data request commonly uses besides schema names.
const COMMON_WORDS: &[&str] = &[
    "show", "list", "find", "give", "display", "count", "total", "average", "highest",
    "lowest", "maximum", "minimum", "recent", "recently", "latest", "newest", "oldest",
    "earliest", "hired", "joined", "salaries", "employees", "departments", "records",
    "names", "first", "last", "email", "phone", "title", "each", "every", "than",
    "greater", "less", "more", "between", "before", "after", "order", "sorted",
    "ascending", "descending", "asc", "desc", "limit", "which", "whose", "with", "without",
    "earn", "earns", "earning", "paid", "year", "month", "date", "top", "bottom",
];

/// Ordinary English words that sit one edit away from a vocabulary word
/// ("that"/"than", "were"/"where") and must be left alone.
const FUNCTION_WORDS: &[&str] = &[
    "that", "this", "these", "those", "there", "their", "they", "them", "then", "were",
    "what", "when", "whom", "will", "would", "could", "should", "have", "been", "does",
    "from", "into", "onto", "over", "under", "only", "also", "just", "like", "some",
    "most", "many", "much", "name", "named", "here", "such", "same", "other", "about",
    "work", "works", "worked", "people", "staff", "person", "earned", "years", "months",
    "today", "above", "below", "least",
];

const MIN_WORD_LEN: usize = 4;

/// Spell-correction collaborator. Never fails.
pub trait SpellCorrector: Send + Sync {
    fn correct(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl SpellCorrector for PassThrough {
    fn correct(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Corrects words to the nearest vocabulary entry by edit distance.
#[derive(Debug, Clone)]
pub struct VocabularyCorrector {
    vocabulary: BTreeSet<String>,
}

impl VocabularyCorrector {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocabulary: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Data keywords, common request words, plus the table and its columns.
    pub fn for_schema(schema: &SchemaConfig) -> Self {
        let schema_words = std::iter::once(schema.table.as_str())
            .chain(schema.columns.iter().map(String::as_str));
        Self::new(
            DATA_KEYWORDS
                .iter()
                .copied()
                .chain(COMMON_WORDS.iter().copied())
                .chain(FUNCTION_WORDS.iter().copied())
                .chain(schema_words),
        )
    }

    /// Closest vocabulary word within the allowed distance.
    ///
    /// Ties go to the alphabetically first word.
    fn nearest(&self, word: &str) -> Option<&str> {
        let lower = word.to_lowercase();
        if word.chars().count() < MIN_WORD_LEN || self.vocabulary.contains(&lower) {
            return None;
        }
        let max_distance = if lower.chars().count() <= 6 { 1 } else { 2 };

        self.vocabulary
            .iter()
            .map(|candidate| (strsim::damerau_levenshtein(&lower, candidate), candidate))
            .filter(|(distance, _)| *distance <= max_distance)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.as_str())
    }
}

impl SpellCorrector for VocabularyCorrector {
    fn correct(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut word = String::new();

        for ch in text.chars() {
            if ch.is_alphabetic() || ch == '_' {
                word.push(ch);
                continue;
            }
            self.flush(&mut word, &mut out);
            out.push(ch);
        }
        self.flush(&mut word, &mut out);
        out
    }
}

impl VocabularyCorrector {
    fn flush(&self, word: &mut String, out: &mut String) {
        if word.is_empty() {
            return;
        }
        match self.nearest(word) {
            Some(fixed) => out.push_str(fixed),
            None => out.push_str(word),
        }
        word.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> VocabularyCorrector {
        VocabularyCorrector::for_schema(&SchemaConfig::default())
    }

    #[test]
    fn test_corrects_schema_words() {
        assert_eq!(
            corrector().correct("show me employess with highest salry"),
            "show me employees with highest salary"
        );
        assert_eq!(corrector().correct("order by hire_dat"), "order by hire_date");
    }

    #[test]
    fn test_keeps_known_short_and_numeric_tokens() {
        let c = corrector();
        assert_eq!(c.correct("top 5 by salary, desc"), "top 5 by salary, desc");
        assert_eq!(c.correct("employees hired in 2021"), "employees hired in 2021");
        assert_eq!(c.correct(""), "");
    }

    #[test]
    fn test_function_words_untouched() {
        let c = corrector();
        assert_eq!(
            c.correct("employees that earn more than 5000"),
            "employees that earn more than 5000"
        );
        assert_eq!(
            c.correct("list employees who were hired this year"),
            "list employees who were hired this year"
        );
    }

    #[test]
    fn test_far_words_untouched() {
        assert_eq!(corrector().correct("quantum physics"), "quantum physics");
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(PassThrough.correct("salry"), "salry");
    }
}
