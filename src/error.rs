use thiserror::Error;

use crate::TABLE_MAX_PAGES;

/// Errors raised by the pager and table.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Table full.")]
    TableFull,

    #[error("Tried to fetch page number out of bounds: {0} >= {max}.", max = TABLE_MAX_PAGES)]
    PageOutOfBounds(usize),

    #[error("Row {0} not found.")]
    RowNotFound(u32),

    #[error("Tried to flush page {0}, which was never loaded.")]
    PageNotCached(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Errors raised while turning an input line into a statement.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PrepareError {
    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong,

    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("Unrecognized command: {0}")]
    Unrecognized(String),
}
