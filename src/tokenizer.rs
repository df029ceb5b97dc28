// 🔤 Tokenizer - Words, numbers and emails out of free text
// The normalized string is what every field rule searches against

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a missing text cell is tokenized as
pub const MISSING_TEXT: &str = "";

lazy_static! {
    /// Maximal runs of ASCII letters
    pub static ref WORD_PATTERN: Regex = Regex::new(r"\b[A-Za-z]+\b").unwrap();

    /// Maximal runs of ASCII digits
    pub static ref NUMBER_PATTERN: Regex = Regex::new(r"\b[0-9]+\b").unwrap();

    /// local@domain.tld, final label 2+ letters
    pub static ref EMAIL_PATTERN: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).unwrap();
}

// ============================================================================
// TOKEN SET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Alphabetic tokens, in discovery order
    pub words: Vec<String>,

    /// Numeric tokens, in discovery order
    pub numbers: Vec<String>,

    /// Email-shaped tokens, in discovery order
    pub emails: Vec<String>,

    /// words ++ numbers ++ emails joined by single spaces
    normalized: String,
}

impl TokenSet {
    /// Extract all three token classes from `text` and build the normalized string
    pub fn from_text(text: &str) -> Self {
        let words = collect_matches(&WORD_PATTERN, text);
        let numbers = collect_matches(&NUMBER_PATTERN, text);
        let emails = collect_matches(&EMAIL_PATTERN, text);

        let normalized = words
            .iter()
            .chain(numbers.iter())
            .chain(emails.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        TokenSet {
            words,
            numbers,
            emails,
            normalized,
        }
    }

    /// The recomposed, searchable form of the text
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn has_email(&self) -> bool {
        !self.emails.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.words.len() + self.numbers.len() + self.emails.len()
    }
}

fn collect_matches(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Coerce a possibly-missing cell into the text that gets tokenized
pub fn coerce_text(text: Option<&str>) -> &str {
    text.unwrap_or(MISSING_TEXT)
}

/// Tokenize a possibly-missing text cell
pub fn tokenize(text: Option<&str>) -> TokenSet {
    TokenSet::from_text(coerce_text(text))
}

// ============================================================================
// TESTS
// ============================================================================
