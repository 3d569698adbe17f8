use clausa_graph::GraphError;
use clausa_protocol::SentenceId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("sentence {0} is not part of the document")]
    UnknownSentence(SentenceId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid extractor config: {0}")]
    Toml(#[from] toml::de::Error),
}
