// Presence Check - Core Library
// Cross-references free-text records against an identity roster

pub mod tokenizer;
pub mod matcher;
pub mod table;
pub mod config;
pub mod report;
pub mod check;

// Re-export commonly used types
pub use tokenizer::{tokenize, TokenSet, MISSING_TEXT};
pub use matcher::{
    FieldMatcher, Identity, MatchMode, MatchOutcome, MatchRule, MatchStats, Matcher,
    Presence, TextRecord,
};
pub use table::{identities, text_records, Table, TableError};
pub use config::{CheckConfig, ColumnConfig, Labels};
pub use report::{
    highlight_matched_rows, AnnotatedTable, CellStyle, ReportRow, RunSummary,
};
pub use check::{build_matcher, load_inputs, run_check, write_outputs, CheckInputs};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
