// src/entity/id.rs
//! Memo identifiers of the form `YYYY-MM-DD-N`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const FILE_EXTENSION: &str = ".md";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid memo id: {0}")]
pub struct InvalidMemoId(pub String);

/// A memo id: the creation date plus a per-date sequence number starting at 1.
///
/// Only the canonical text form is accepted (zero-padded date, no leading
/// zeros in the sequence), so every id maps to exactly one file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoId {
    date: NaiveDate,
    seq: u32,
}

impl MemoId {
    pub fn new(date: NaiveDate, seq: u32) -> Self {
        Self { date, seq }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// File name this memo is stored under, e.g. `2024-01-01-3.md`
    pub fn file_name(&self) -> String {
        format!("{}{}", self, FILE_EXTENSION)
    }

    /// Recover an id from a directory entry name. Anything else returns `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.strip_suffix(FILE_EXTENSION)?.parse().ok()
    }
}

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format(DATE_FORMAT), self.seq)
    }
}

impl FromStr for MemoId {
    type Err = InvalidMemoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMemoId(s.to_string());

        let (date_part, seq_part) = s.rsplit_once('-').ok_or_else(invalid)?;
        if date_part.len() != 10
            || seq_part.is_empty()
            || seq_part.starts_with('0')
            || !seq_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| invalid())?;
        // chrono is lenient about padding; require the exact canonical form
        if date.format(DATE_FORMAT).to_string() != date_part {
            return Err(invalid());
        }
        let seq = seq_part.parse().map_err(|_| invalid())?;

        Ok(Self { date, seq })
    }
}

impl TryFrom<String> for MemoId {
    type Error = InvalidMemoId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemoId> for String {
    fn from(id: MemoId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_and_parse() {
        let id = MemoId::new(date(2024, 1, 1), 12);
        assert_eq!(id.to_string(), "2024-01-01-12");
        assert_eq!("2024-01-01-12".parse::<MemoId>().unwrap(), id);
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        for bad in [
            "",
            "2024-01-01",
            "2024-01-01-",
            "2024-01-01-0",
            "2024-01-01-01",
            "2024-1-01-1",
            "2024-01-1-1",
            "2024-13-01-1",
            "2024-02-30-1",
            "2024-01-01-1a",
            "2024-01-01--1",
            "../2024-01-01-1",
            "hello",
        ] {
            assert!(bad.parse::<MemoId>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_sequence_overflow_rejected() {
        assert!("2024-01-01-99999999999".parse::<MemoId>().is_err());
    }

    #[test]
    fn test_file_name_round_trip() {
        let id = MemoId::new(date(2023, 12, 31), 4);
        assert_eq!(id.file_name(), "2023-12-31-4.md");
        assert_eq!(MemoId::from_file_name("2023-12-31-4.md"), Some(id));
        assert_eq!(MemoId::from_file_name("2023-12-31-4.txt"), None);
        assert_eq!(MemoId::from_file_name("notes.md"), None);
        assert_eq!(MemoId::from_file_name(".2023-12-31-4.md"), None);
    }

    #[test]
    fn test_ordering_by_date_then_sequence() {
        let a = MemoId::new(date(2024, 1, 1), 10);
        let b = MemoId::new(date(2024, 1, 2), 1);
        let c = MemoId::new(date(2024, 1, 2), 2);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_serde_as_string() {
        let id = MemoId::new(date(2024, 5, 6), 7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"2024-05-06-7\"");
        let parsed: MemoId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<MemoId>("\"nope\"").is_err());
    }
}
