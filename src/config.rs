// ⚙️ Check Configuration - Paths, column names, labels and match mode
// Loaded from JSON, then overridden from the command line

use crate::matcher::{MatchMode, Presence};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "CheckMRS_UpdatedFile.csv";

// ============================================================================
// COLUMN NAMES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Free-text column of the records table
    pub text: String,

    pub id: String,
    pub email: String,
    pub name_first_last: String,
    pub name_last_first: String,

    /// Annotation column added to the output
    pub presence: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            text: "MRS Long Text".to_string(),
            id: "NOKIA ID".to_string(),
            email: "Email Address".to_string(),
            name_first_last: "NameFirstLast".to_string(),
            name_last_first: "NameLastFirst".to_string(),
            presence: "Presence".to_string(),
        }
    }
}

impl ColumnConfig {
    /// The four roster columns, in identity field order
    pub fn identity_columns(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.email.as_str(),
            self.name_first_last.as_str(),
            self.name_last_first.as_str(),
        ]
    }
}

// ============================================================================
// ANNOTATION LABELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub matched: String,
    pub unmatched: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            matched: "Yes".to_string(),
            unmatched: "No".to_string(),
        }
    }
}

impl Labels {
    pub fn for_presence(&self, presence: Presence) -> &str {
        match presence {
            Presence::Matched => &self.matched,
            Presence::Unmatched => &self.unmatched,
        }
    }
}

// ============================================================================
// CHECK CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// CSV with the free-text records
    pub records_path: Option<PathBuf>,

    /// CSV with the identity roster
    pub roster_path: Option<PathBuf>,

    /// Annotated CSV output
    pub output_path: PathBuf,

    /// Optional highlighted HTML rendering
    pub html_path: Option<PathBuf>,

    /// Optional JSON run summary
    pub summary_path: Option<PathBuf>,

    pub columns: ColumnConfig,
    pub labels: Labels,
    pub mode: MatchMode,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            records_path: None,
            roster_path: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            html_path: None,
            summary_path: None,
            columns: ColumnConfig::default(),
            labels: Labels::default(),
            mode: MatchMode::default(),
        }
    }
}

impl CheckConfig {
    /// Load from a JSON file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Paths are required, column names and labels must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.records_path.is_none() {
            bail!("No records file given (set records_path or pass --records)");
        }
        if self.roster_path.is_none() {
            bail!("No roster file given (set roster_path or pass --roster)");
        }

        let columns = [
            ("text", &self.columns.text),
            ("id", &self.columns.id),
            ("email", &self.columns.email),
            ("name_first_last", &self.columns.name_first_last),
            ("name_last_first", &self.columns.name_last_first),
            ("presence", &self.columns.presence),
        ];
        for (key, name) in columns {
            if name.trim().is_empty() {
                bail!("Column name '{}' must not be empty", key);
            }
        }

        if self.labels.matched == self.labels.unmatched {
            bail!(
                "Matched and unmatched labels must differ (both are '{}')",
                self.labels.matched
            );
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
