use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{table} could not be read from {path}: {source}")]
    Io {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} CSV error: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{table} is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("{table} data row {line} invalid: {message}")]
    DataRow {
        table: &'static str,
        line: u64,
        message: String,
    },

    #[error("unparseable air date '{value}'")]
    InvalidDate { value: String },
}

impl ParserError {
    pub(crate) fn csv(table: &'static str) -> impl FnOnce(csv::Error) -> Self {
        move |source| ParserError::Csv { table, source }
    }
}
