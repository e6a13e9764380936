use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::frontmatter::FormatError;

#[derive(Error, Debug)]
pub enum MemoError {
    #[error("Memo not found: {id}")]
    NotFound { id: String },

    #[error("Memo {id} is malformed: {source}")]
    Format {
        id: String,
        #[source]
        source: FormatError,
    },

    #[error("IO error during {op} of {id}: {source}")]
    Io {
        op: &'static str,
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("YAML serialization failed: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("No free memo id for {date} after {attempts} attempts")]
    Conflict { date: NaiveDate, attempts: u32 },
}

impl MemoError {
    pub fn not_found(id: impl Into<String>) -> Self {
        MemoError::NotFound { id: id.into() }
    }

    pub fn io(op: &'static str, id: impl Into<String>, source: io::Error) -> Self {
        MemoError::Io {
            op,
            id: id.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MemoError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, MemoError>;
