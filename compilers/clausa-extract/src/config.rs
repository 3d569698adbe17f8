use clausa_protocol::{ClauseType, CLAUSE_TABLE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do when two role-table rows fill the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleConflict {
    /// The later row wins (`dobj` over `obj`).
    #[default]
    Overwrite,
    /// The first match is kept.
    KeepFirst,
}

/// A subordinate-clause label and the clause type it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRule {
    pub label: String,
    pub clause_type: ClauseType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub role_conflict: RoleConflict,
    /// POS-tag prefix marking a verb, tested against `upos` then `xpos`.
    pub verb_marker: char,
    /// Extraction priority order; the first rule whose label occurs below the head wins.
    pub clause_rules: Vec<ClauseRule>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            role_conflict: RoleConflict::default(),
            verb_marker: 'V',
            clause_rules: CLAUSE_TABLE
                .iter()
                .map(|(label, clause_type)| ClauseRule {
                    label: label.to_string(),
                    clause_type: *clause_type,
                })
                .collect(),
        }
    }
}

impl ExtractorConfig {
    /// Decode a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}
