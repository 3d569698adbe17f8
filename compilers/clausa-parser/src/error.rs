use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: malformed row: {reason}")]
    Row { line: usize, reason: String },

    #[error("line {line}: expected token {expected}, found {found}")]
    TokenOrder { line: usize, expected: u32, found: u32 },

    #[error("line {line}: head {head} is outside the sentence ({len} tokens)")]
    HeadOutOfRange { line: usize, head: u32, len: usize },
}
