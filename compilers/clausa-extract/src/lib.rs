//! Clause extraction over dependency parses.
//!
//! A sentence's dependency tree is annotated with its root, main verb,
//! subject/object/indirect object, compoundness, transitivity and negation,
//! then split top-down into a matrix clause and nested subordinate clauses,
//! each annotated the same way.

pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod roles;

pub use config::{ClauseRule, ExtractorConfig, RoleConflict};
pub use document::{annotate_document, annotate_document_parallel, annotate_sentence, SentenceOutcome};
pub use error::{ConfigError, ExtractError};
pub use extractor::{ClauseExtractor, ClauseIdSequence, Extraction, Termination};
pub use roles::{RoleAnnotator, SyntacticUnit};
