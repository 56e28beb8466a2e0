use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Cannot fit a model on an empty corpus")]
    EmptyCorpus,

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("A rebuild is already in progress")]
    RebuildInProgress,

    #[error("Duplicate item id in corpus: {0}")]
    DuplicateItem(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
