use clausa_protocol::SentenceId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The sentence does not have exactly one `root` arc.
    #[error("malformed parse: sentence {sentence} has {roots} root arcs, expected exactly one")]
    MalformedParse { sentence: SentenceId, roots: usize },
}
