//! One line of user input.

/// Raw user text for a single turn plus its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    original: String,
    normalized: String,
}

impl Utterance {
    /// Create utterance from a raw input line.
    ///
    /// The normalized form is trimmed and lower-cased.
    pub fn new(raw: impl Into<String>) -> Self {
        let original = raw.into();
        let normalized = original.trim().to_lowercase();
        Self { original, normalized }
    }

    /// Text exactly as typed.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Trimmed, lower-cased text used for routing.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// `true` if the user asked to leave the session.
    pub fn is_exit(&self) -> bool {
        matches!(self.normalized.as_str(), "exit" | "quit")
    }

    /// `true` if there is nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let u = Utterance::new("  Show ME Employees \n");
        assert_eq!(u.original(), "  Show ME Employees \n");
        assert_eq!(u.normalized(), "show me employees");
    }

    #[test]
    fn test_exit_words() {
        assert!(Utterance::new("exit").is_exit());
        assert!(Utterance::new("  QUIT ").is_exit());
        assert!(!Utterance::new("exit now").is_exit());
        assert!(!Utterance::new("").is_exit());
    }
}
