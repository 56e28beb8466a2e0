use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} for column '{column}' on line {line}")]
    InvalidField {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Duplicate id {id} on line {line}")]
    DuplicateId { line: u64, id: String },
}

impl From<Error> for shelfmatch_core::Error {
    fn from(e: Error) -> Self {
        shelfmatch_core::Error::Corpus(e.to_string())
    }
}
