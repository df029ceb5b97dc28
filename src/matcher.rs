// 🎯 Presence Matcher - Cross-reference free text against an identity roster
// One tokenization per record, first identity that fires wins
//
// Two modes:
//   Legacy → the historical rules, including the identity-independent
//            "any email in the text" and "any number with the id's length"
//   Strict → email and id must belong to the identity under test

use crate::tokenizer::{tokenize, TokenSet};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// A blank id reads as "nan" in legacy mode; only its length takes part
const LEGACY_MISSING_ID: &str = "nan";

// ============================================================================
// MATCH MODE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Historical behavior, kept for parity
    #[default]
    Legacy,

    /// Email and id rules only fire for the identity's own email/id
    Strict,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Legacy => "legacy",
            MatchMode::Strict => "strict",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(MatchMode::Legacy),
            "strict" => Ok(MatchMode::Strict),
            other => Err(format!(
                "unknown match mode '{}' (expected 'legacy' or 'strict')",
                other
            )),
        }
    }
}

// ============================================================================
// MATCH RULE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Legacy: the text contains any email at all
    EmailPresent,

    /// Strict: the text contains the identity's email
    EmailEquals,

    /// Legacy: id is a raw substring of the normalized text
    IdSubstring,

    /// Strict: id appears as a whole word
    IdWord,

    /// Legacy: some number has as many digits as the id
    NumberLength,

    NameFirstLast,

    NameLastFirst,
}

impl MatchRule {
    pub fn description(&self) -> &'static str {
        match self {
            MatchRule::EmailPresent => "text contains an email address",
            MatchRule::EmailEquals => "text contains the identity's email",
            MatchRule::IdSubstring => "id found inside the text",
            MatchRule::IdWord => "id found as a whole word",
            MatchRule::NumberLength => "number with the same length as the id",
            MatchRule::NameFirstLast => "name (first last)",
            MatchRule::NameLastFirst => "name (last first)",
        }
    }

    /// True for the rules that fire without looking at the identity's own values
    pub fn is_identity_independent(&self) -> bool {
        matches!(self, MatchRule::EmailPresent | MatchRule::NumberLength)
    }
}

// ============================================================================
// DATA MODEL
// ============================================================================

/// Roster entry. Fields are `None` when the source cell was blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name_first_last: Option<String>,
    pub name_last_first: Option<String>,
}

impl Identity {
    /// Build from plain strings; empty strings become missing fields
    pub fn new(id: &str, email: &str, name_first_last: &str, name_last_first: &str) -> Self {
        Identity {
            id: non_empty(id),
            email: non_empty(email),
            name_first_last: non_empty(name_first_last),
            name_last_first: non_empty(name_last_first),
        }
    }

    /// Short label for logs and the results browser
    pub fn display_name(&self) -> String {
        match (&self.name_first_last, &self.id) {
            (Some(name), Some(id)) => format!("{} ({})", name, id),
            (Some(name), None) => name.clone(),
            (None, Some(id)) => id.clone(),
            (None, None) => self.email.clone().unwrap_or_else(|| "<blank>".to_string()),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Unmatched,
    Matched,
}

impl Presence {
    pub fn is_matched(&self) -> bool {
        *self == Presence::Matched
    }
}

/// Which identity flipped a record, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Position of the identity in the roster
    pub identity_index: usize,
    pub rule: MatchRule,
}

/// One free-text row under test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Position of the row in its source table
    pub row: usize,

    pub text: Option<String>,

    presence: Presence,

    outcome: Option<MatchOutcome>,
}

impl TextRecord {
    pub fn new(row: usize, text: Option<String>) -> Self {
        TextRecord {
            row,
            text,
            presence: Presence::Unmatched,
            outcome: None,
        }
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_matched(&self) -> bool {
        self.presence.is_matched()
    }

    /// Unmatched → Matched. A matched record is never touched again.
    pub fn mark_matched(&mut self, outcome: MatchOutcome) {
        if self.presence.is_matched() {
            return;
        }
        self.presence = Presence::Matched;
        self.outcome = Some(outcome);
    }

    pub fn tokens(&self) -> TokenSet {
        tokenize(self.text.as_deref())
    }
}

// ============================================================================
// FIELD MATCHER - one compiled identity
// ============================================================================

#[derive(Debug, Clone)]
pub struct FieldMatcher {
    mode: MatchMode,

    /// Raw id for the legacy substring rule
    id: Option<String>,

    /// Digit count for the legacy length rule
    id_len: Option<usize>,

    /// Lowercased email, strict mode only
    email: Option<String>,

    /// Whole-word id pattern, strict mode only
    id_pattern: Option<Regex>,

    /// Whole-word, case-insensitive name patterns in rule order
    name_patterns: Vec<(MatchRule, Regex)>,
}

impl FieldMatcher {
    pub fn compile(identity: &Identity, mode: MatchMode) -> Result<Self, regex::Error> {
        match mode {
            MatchMode::Legacy => Self::compile_legacy(identity),
            MatchMode::Strict => Self::compile_strict(identity),
        }
    }

    fn compile_legacy(identity: &Identity) -> Result<Self, regex::Error> {
        let present = |value: &Option<String>| -> Option<String> {
            value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
        };

        let id = present(&identity.id);
        let id_len = id.as_deref().unwrap_or(LEGACY_MISSING_ID).chars().count();

        // Blank names take no part in matching
        let mut name_patterns = Vec::new();
        if let Some(name) = present(&identity.name_first_last) {
            name_patterns.push((MatchRule::NameFirstLast, whole_word(&name, true)?));
        }
        if let Some(name) = present(&identity.name_last_first) {
            name_patterns.push((MatchRule::NameLastFirst, whole_word(&name, true)?));
        }

        Ok(FieldMatcher {
            mode: MatchMode::Legacy,
            id,
            id_len: Some(id_len),
            email: None,
            id_pattern: None,
            name_patterns,
        })
    }

    fn compile_strict(identity: &Identity) -> Result<Self, regex::Error> {
        let trimmed = |value: &Option<String>| -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        // A number token equal to the id is always a whole word as well
        let id_pattern = match trimmed(&identity.id) {
            Some(id) => Some(whole_word(&id, false)?),
            None => None,
        };

        // Names are searched in the same normalized form as the text,
        // so "O'Brien" looks for "O Brien"
        let normalized = |value: &Option<String>| -> Option<String> {
            trimmed(value)
                .map(|name| TokenSet::from_text(&name).normalized().to_string())
                .filter(|name| !name.is_empty())
        };

        let mut name_patterns = Vec::new();
        if let Some(name) = normalized(&identity.name_first_last) {
            name_patterns.push((MatchRule::NameFirstLast, whole_word(&name, true)?));
        }
        if let Some(name) = normalized(&identity.name_last_first) {
            name_patterns.push((MatchRule::NameLastFirst, whole_word(&name, true)?));
        }

        Ok(FieldMatcher {
            mode: MatchMode::Strict,
            id: None,
            id_len: None,
            email: trimmed(&identity.email).map(|e| e.to_lowercase()),
            id_pattern,
            name_patterns,
        })
    }

    /// First rule that holds for this identity against `tokens`
    pub fn first_match(&self, tokens: &TokenSet) -> Option<MatchRule> {
        match self.mode {
            MatchMode::Legacy => self.first_match_legacy(tokens),
            MatchMode::Strict => self.first_match_strict(tokens),
        }
    }

    fn first_match_legacy(&self, tokens: &TokenSet) -> Option<MatchRule> {
        let text = tokens.normalized();

        if tokens.has_email() {
            return Some(MatchRule::EmailPresent);
        }

        if let Some(id) = &self.id {
            if text.contains(id.as_str()) {
                return Some(MatchRule::IdSubstring);
            }
        }

        if let Some(id_len) = self.id_len {
            if tokens.numbers.iter().any(|n| n.len() == id_len) {
                return Some(MatchRule::NumberLength);
            }
        }

        self.first_name_match(text)
    }

    fn first_match_strict(&self, tokens: &TokenSet) -> Option<MatchRule> {
        let text = tokens.normalized();

        if let Some(email) = &self.email {
            if tokens.emails.iter().any(|e| e.to_lowercase() == *email) {
                return Some(MatchRule::EmailEquals);
            }
        }

        if let Some(pattern) = &self.id_pattern {
            if pattern.is_match(text) {
                return Some(MatchRule::IdWord);
            }
        }

        self.first_name_match(text)
    }

    fn first_name_match(&self, text: &str) -> Option<MatchRule> {
        self.name_patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(rule, _)| *rule)
    }
}

/// `\b<literal>\b`
fn whole_word(literal: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(literal)))
        .case_insensitive(case_insensitive)
        .build()
}

// ============================================================================
// MATCH STATS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,

    /// How many records each rule flipped
    pub by_rule: BTreeMap<MatchRule, usize>,
}

impl MatchStats {
    pub fn from_records(records: &[TextRecord]) -> Self {
        let mut stats = MatchStats {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.is_matched() {
                stats.matched += 1;
                if let Some(outcome) = record.outcome() {
                    *stats.by_rule.entry(outcome.rule).or_insert(0) += 1;
                }
            } else {
                stats.unmatched += 1;
            }
        }

        stats
    }

    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} records: {} matched, {} unmatched ({:.1}%)",
            self.total,
            self.matched,
            self.unmatched,
            self.match_rate() * 100.0
        )
    }
}

// ============================================================================
// MATCHER
// ============================================================================

pub struct Matcher {
    mode: MatchMode,
    fields: Vec<FieldMatcher>,
}

impl Matcher {
    /// Compile every identity of the roster once
    pub fn new(identities: &[Identity], mode: MatchMode) -> Result<Self, regex::Error> {
        let fields = identities
            .iter()
            .map(|identity| FieldMatcher::compile(identity, mode))
            .collect::<Result<Vec<_>, _>>()?;

        info!(identities = fields.len(), mode = %mode, "compiled identity roster");

        Ok(Matcher { mode, fields })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn identity_count(&self) -> usize {
        self.fields.len()
    }

    /// First identity (in roster order) that matches the tokenized text
    pub fn match_tokens(&self, tokens: &TokenSet) -> Option<MatchOutcome> {
        self.fields
            .iter()
            .enumerate()
            .find_map(|(identity_index, field)| {
                field.first_match(tokens).map(|rule| MatchOutcome {
                    identity_index,
                    rule,
                })
            })
    }

    pub fn match_record(&self, record: &TextRecord) -> Option<MatchOutcome> {
        self.match_tokens(&record.tokens())
    }

    /// Annotate every record in place
    pub fn annotate(&self, records: &mut [TextRecord]) -> MatchStats {
        self.annotate_with_progress(records, |_| {})
    }

    /// Annotate every record in place, calling `on_record` with the count of
    /// records processed so far
    pub fn annotate_with_progress<F>(&self, records: &mut [TextRecord], mut on_record: F) -> MatchStats
    where
        F: FnMut(usize),
    {
        for (done, record) in records.iter_mut().enumerate() {
            if !record.is_matched() {
                if let Some(outcome) = self.match_record(record) {
                    debug!(
                        row = record.row,
                        identity = outcome.identity_index,
                        rule = ?outcome.rule,
                        "record matched"
                    );
                    record.mark_matched(outcome);
                }
            }
            on_record(done + 1);
        }

        MatchStats::from_records(records)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_identity() -> Identity {
        Identity::new("12345", "x@y.com", "John Smith", "Smith John")
    }

    fn create_test_records(texts: &[&str]) -> Vec<TextRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextRecord::new(i, Some(t.to_string())))
            .collect()
    }

    fn first_rule(identity: &Identity, mode: MatchMode, text: &str) -> Option<MatchRule> {
        let field = FieldMatcher::compile(identity, mode).unwrap();
        field.first_match(&TokenSet::from_text(text))
    }

    #[test]
    fn test_scenario_name_and_id_both_modes() {
        let identity = create_test_identity();
        let text = "Contact John Smith at 12345";

        assert_eq!(
            first_rule(&identity, MatchMode::Legacy, text),
            Some(MatchRule::IdSubstring)
        );
        assert_eq!(
            first_rule(&identity, MatchMode::Strict, text),
            Some(MatchRule::IdWord)
        );
    }

    #[test]
    fn test_scenario_no_relevant_content() {
        let identity = Identity::new("999", "", "Jane Doe", "Doe Jane");

        for mode in [MatchMode::Legacy, MatchMode::Strict] {
            assert_eq!(first_rule(&identity, mode, "no relevant content here"), None);
        }
    }

    #[test]
    fn test_scenario_any_email_legacy() {
        let identity = Identity::new("999", "", "Jane Doe", "Doe Jane");

        assert_eq!(
            first_rule(&identity, MatchMode::Legacy, "reach me at foo@bar.com"),
            Some(MatchRule::EmailPresent)
        );
        assert_eq!(
            first_rule(&identity, MatchMode::Strict, "reach me at foo@bar.com"),
            None
        );
    }

    #[test]
    fn test_strict_email_must_be_identity_email() {
        let identity = Identity::new("999", "Foo@Bar.com", "Jane Doe", "Doe Jane");

        assert_eq!(
            first_rule(&identity, MatchMode::Strict, "reach me at foo@bar.com"),
            Some(MatchRule::EmailEquals)
        );
    }

    #[test]
    fn test_scenario_empty_text_unmatched() {
        let identity = create_test_identity();

        for mode in [MatchMode::Legacy, MatchMode::Strict] {
            assert_eq!(first_rule(&identity, mode, ""), None);

            let field = FieldMatcher::compile(&identity, mode).unwrap();
            assert_eq!(field.first_match(&tokenize(None)), None);
        }
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let identity = Identity::new("", "", "John Smith", "Smith John");

        for text in ["JOHN SMITH wrote", "john smith wrote", "John Smith wrote"] {
            assert_eq!(
                first_rule(&identity, MatchMode::Strict, text),
                Some(MatchRule::NameFirstLast),
                "text: {}",
                text
            );
        }

        assert_eq!(
            first_rule(&identity, MatchMode::Strict, "per smith, john"),
            Some(MatchRule::NameLastFirst)
        );
    }

    #[test]
    fn test_names_respect_word_boundaries() {
        let identity = Identity::new("", "", "Ann Lee", "Lee Ann");

        assert_eq!(first_rule(&identity, MatchMode::Strict, "Joann Leeds"), None);
        assert_eq!(
            first_rule(&identity, MatchMode::Strict, "cc: Ann Lee."),
            Some(MatchRule::NameFirstLast)
        );
    }

    #[test]
    fn test_id_boundary_strict_vs_legacy() {
        let identity = Identity::new("123", "", "Jane Doe", "Doe Jane");

        // Strict: whole word only
        assert_eq!(first_rule(&identity, MatchMode::Strict, "ref 11234"), None);

        // Legacy: raw substring of the normalized text
        assert_eq!(
            first_rule(&identity, MatchMode::Legacy, "ref 11234"),
            Some(MatchRule::IdSubstring)
        );
    }

    #[test]
    fn test_legacy_number_length_rule() {
        let identity = Identity::new("12345", "", "Jane Doe", "Doe Jane");

        assert_eq!(
            first_rule(&identity, MatchMode::Legacy, "invoice 99999"),
            Some(MatchRule::NumberLength)
        );
        assert_eq!(first_rule(&identity, MatchMode::Legacy, "invoice 9999"), None);
        assert_eq!(first_rule(&identity, MatchMode::Strict, "invoice 99999"), None);
    }

    #[test]
    fn test_scenario_empty_text_unmatched_with_blank_fields() {
        let identities = vec![
            Identity::new("12345", "john@corp.com", "John Smith", ""),
            Identity::new("", "", "Jane Doe", "Doe Jane"),
            Identity::new("777", "", "", "Ray Bob"),
        ];

        for mode in [MatchMode::Legacy, MatchMode::Strict] {
            let matcher = Matcher::new(&identities, mode).unwrap();
            let mut records = vec![
                TextRecord::new(0, None),
                TextRecord::new(1, Some(String::new())),
            ];

            let stats = matcher.annotate(&mut records);

            assert_eq!(stats.matched, 0, "mode: {}", mode);
            assert_eq!(records[0].outcome(), None);
            assert_eq!(records[1].outcome(), None);
        }
    }

    #[test]
    fn test_blank_fields_do_not_match_the_word_nan() {
        let half_named = Identity::new("12345", "john@corp.com", "John Smith", "");
        let no_id = Identity::new("", "", "Jane Doe", "Doe Jane");

        for mode in [MatchMode::Legacy, MatchMode::Strict] {
            assert_eq!(first_rule(&half_named, mode, "Nan called"), None);
            assert_eq!(first_rule(&no_id, mode, "Nan called"), None);
            assert_eq!(first_rule(&no_id, mode, "nan nan NaN"), None);
        }
    }

    #[test]
    fn test_legacy_blank_id_keeps_length_rule() {
        // A blank id reads as "nan": any 3 digit number matches on length
        let identity = Identity::new("", "", "Jane Doe", "Doe Jane");

        assert_eq!(
            first_rule(&identity, MatchMode::Legacy, "room 404"),
            Some(MatchRule::NumberLength)
        );
        assert_eq!(first_rule(&identity, MatchMode::Legacy, "room 4040"), None);
        assert_eq!(first_rule(&identity, MatchMode::Strict, "room 404"), None);
    }

    #[test]
    fn test_strict_id_number_is_a_whole_word() {
        let identity = Identity::new("12345", "", "Jane Doe", "Doe Jane");

        for text in ["12345", "x 12345 y", "a.12345,b", "12345x 12345"] {
            assert_eq!(
                first_rule(&identity, MatchMode::Strict, text),
                Some(MatchRule::IdWord),
                "text: {}",
                text
            );
        }
    }

    #[test]
    fn test_strict_names_with_punctuation() {
        let hyphenated = Identity::new("", "", "Anne-Marie Dupont", "Dupont Anne-Marie");
        let apostrophe = Identity::new("", "", "Pat O'Brien", "O'Brien Pat");

        assert_eq!(
            first_rule(&hyphenated, MatchMode::Strict, "met anne-marie dupont today"),
            Some(MatchRule::NameFirstLast)
        );
        assert_eq!(
            first_rule(&hyphenated, MatchMode::Strict, "Dupont,\nAnne-Marie"),
            Some(MatchRule::NameLastFirst)
        );
        assert_eq!(
            first_rule(&apostrophe, MatchMode::Strict, "call Pat O'Brien"),
            Some(MatchRule::NameFirstLast)
        );
        assert_eq!(first_rule(&apostrophe, MatchMode::Strict, "call Pat OBrien"), None);
    }

    #[test]
    fn test_strict_blank_identity_never_matches() {
        let identity = Identity::default();

        assert_eq!(
            first_rule(&identity, MatchMode::Strict, "nan 404 a@b.com"),
            None
        );
    }

    #[test]
    fn test_match_mode_parsing() {
        assert_eq!("legacy".parse::<MatchMode>(), Ok(MatchMode::Legacy));
        assert_eq!(" STRICT ".parse::<MatchMode>(), Ok(MatchMode::Strict));
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_annotate_marks_records() {
        let identities = vec![
            Identity::new("999", "", "Jane Doe", "Doe Jane"),
            create_test_identity(),
        ];
        let matcher = Matcher::new(&identities, MatchMode::Strict).unwrap();

        let mut records = create_test_records(&[
            "Contact John Smith at 12345",
            "no relevant content here",
            "escalated by doe jane",
        ]);
        let stats = matcher.annotate(&mut records);

        assert!(records[0].is_matched());
        assert_eq!(
            records[0].outcome(),
            Some(MatchOutcome {
                identity_index: 1,
                rule: MatchRule::IdWord
            })
        );
        assert!(!records[1].is_matched());
        assert_eq!(records[1].outcome(), None);
        assert_eq!(
            records[2].outcome(),
            Some(MatchOutcome {
                identity_index: 0,
                rule: MatchRule::NameLastFirst
            })
        );

        assert_eq!(stats.total, 3);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.unmatched, 1);
        assert_eq!(stats.by_rule.get(&MatchRule::IdWord), Some(&1));
    }

    #[test]
    fn test_adding_identities_is_monotonic() {
        let texts = ["Jane Doe called", "ticket 555 from bob", "nothing"];
        let small = vec![Identity::new("", "", "Jane Doe", "Doe Jane")];
        let mut large = small.clone();
        large.push(Identity::new("555", "", "Bob Ray", "Ray Bob"));

        for mode in [MatchMode::Legacy, MatchMode::Strict] {
            let mut before = create_test_records(&texts);
            let mut after = create_test_records(&texts);
            Matcher::new(&small, mode).unwrap().annotate(&mut before);
            Matcher::new(&large, mode).unwrap().annotate(&mut after);

            for (b, a) in before.iter().zip(after.iter()) {
                assert!(!b.is_matched() || a.is_matched());
            }
        }
    }

    #[test]
    fn test_matched_record_is_never_downgraded() {
        let matcher = Matcher::new(&[create_test_identity()], MatchMode::Strict).unwrap();
        let mut records = create_test_records(&["nothing to see"]);
        let earlier = MatchOutcome {
            identity_index: 7,
            rule: MatchRule::NameFirstLast,
        };
        records[0].mark_matched(earlier);

        matcher.annotate(&mut records);

        assert!(records[0].is_matched());
        assert_eq!(records[0].outcome(), Some(earlier));
    }

    #[test]
    fn test_empty_roster_matches_nothing() {
        let matcher = Matcher::new(&[], MatchMode::Legacy).unwrap();
        let mut records = create_test_records(&["reach me at foo@bar.com"]);

        let stats = matcher.annotate(&mut records);

        assert_eq!(stats.matched, 0);
    }

    #[test]
    fn test_progress_hook_sees_every_record() {
        let matcher = Matcher::new(&[create_test_identity()], MatchMode::Legacy).unwrap();
        let mut records = create_test_records(&["a", "b", "c"]);
        let mut seen = Vec::new();

        matcher.annotate_with_progress(&mut records, |done| seen.push(done));

        assert_eq!(seen, vec![1, 2, 3]);
    }
}
