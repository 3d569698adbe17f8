//! Reader for dependency parses exchanged as CoNLL-U.

pub mod conllu;
pub mod error;

pub use conllu::parse_conllu;
pub use error::ParseError;
