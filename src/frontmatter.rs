// src/frontmatter.rs
//! On-disk memo format.
//!
//! Every memo file is a YAML front-matter block followed by the Markdown body:
//!
//! ```text
//! ---
//! id: 2024-01-01-1
//! title: Groceries
//! tags:
//! - home
//! created_at: 2024-01-01T09:30:00Z
//! updated_at: 2024-01-01T09:30:00Z
//! ---
//!
//! - milk
//! - eggs
//! ```
//!
//! The first line must be exactly `---`. The metadata runs until the next
//! line that is exactly `---`; everything after it is the body, with leading
//! and trailing blank lines dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{Memo, MemoId};

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("missing opening '---' delimiter")]
    MissingOpeningDelimiter,

    #[error("front-matter is never closed with '---'")]
    UnterminatedFrontmatter,

    #[error("invalid front-matter: {0}")]
    Metadata(#[from] serde_yaml::Error),

    #[error("file is not valid UTF-8")]
    InvalidUtf8,

    #[error("front-matter id {found} does not match file name {expected}")]
    IdMismatch { expected: MemoId, found: MemoId },
}

#[derive(Serialize, Deserialize)]
struct MemoFrontmatter {
    id: MemoId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemoFrontmatter {
    fn from_memo(memo: &Memo) -> Self {
        Self {
            id: memo.id,
            title: memo.title.clone(),
            tags: memo.tags.clone(),
            created_at: memo.created_at,
            updated_at: memo.updated_at,
        }
    }

    fn into_memo(self, content: String) -> Memo {
        Memo {
            id: self.id,
            title: self.title,
            tags: self.tags,
            content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Decode raw file bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Memo, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8)?;
    parse(text)
}

/// Decode a memo file.
pub fn parse(text: &str) -> Result<Memo, FormatError> {
    let mut lines = text.split_inclusive('\n');

    match lines.next() {
        Some(first) if strip_line_ending(first) == DELIMITER => {}
        _ => return Err(FormatError::MissingOpeningDelimiter),
    }

    let yaml_start = text.len() - lines.clone().map(str::len).sum::<usize>();
    let mut offset = yaml_start;
    let mut yaml_end = None;
    for line in lines {
        if strip_line_ending(line) == DELIMITER {
            yaml_end = Some(offset);
            offset += line.len();
            break;
        }
        offset += line.len();
    }
    let yaml_end = yaml_end.ok_or(FormatError::UnterminatedFrontmatter)?;

    let metadata: MemoFrontmatter = serde_yaml::from_str(&text[yaml_start..yaml_end])?;
    let body = trim_blank_lines(&text[offset..]);

    Ok(metadata.into_memo(body.to_string()))
}

/// Encode a memo into its file contents.
pub fn format(memo: &Memo) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(&MemoFrontmatter::from_memo(memo))?;
    Ok(format!(
        "{delim}\n{yaml}{delim}\n\n{content}\n",
        delim = DELIMITER,
        yaml = yaml,
        content = memo.content
    ))
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Drop whitespace-only lines from both ends, keeping indentation inside.
pub(crate) fn trim_blank_lines(body: &str) -> &str {
    let lines: Vec<&str> = body.split_inclusive('\n').collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return "";
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);

    let start: usize = lines[..first].iter().map(|l| l.len()).sum();
    let end: usize = lines[..last].iter().map(|l| l.len()).sum::<usize>()
        + strip_line_ending(lines[last]).len();

    &body[start..end]
}
