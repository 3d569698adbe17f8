#![no_std] // The model has no OS dependencies

extern crate alloc;

// Enable std if the feature is active (for Error impls and tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod labels;

// Re-export core types for convenience
pub use ids::{ClauseId, DocumentId, SentenceId, TokenId};
pub use labels::{ClauseType, LabelClass, LabelError, Role, RoleRule, Transitivity, CLAUSE_TABLE, ROLE_TABLE};

pub mod model;
pub use model::*;
