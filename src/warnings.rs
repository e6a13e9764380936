//! Size threshold warnings for the memo directory.
//!
//! Listing reads and parses every memo file, so very large directories make
//! the API slow. These warnings are logged when the store is opened.

/// Memo count above which a full directory scan becomes noticeably slow.
pub const MEMO_WARNING_THRESHOLD: usize = 5_000;

/// A warning about potential performance issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Memo count exceeds recommended threshold.
    HighMemoCount { count: usize, threshold: usize },
}

/// Check thresholds and return any warnings.
pub fn check_thresholds(memo_count: usize) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if memo_count > MEMO_WARNING_THRESHOLD {
        warnings.push(Warning::HighMemoCount {
            count: memo_count,
            threshold: MEMO_WARNING_THRESHOLD,
        });
    }

    warnings
}

/// Format a warning for display.
pub fn format_warning(warning: &Warning) -> String {
    match warning {
        Warning::HighMemoCount { count, threshold } => {
            format!(
                "Warning: {} memos exceeds recommended {} - listing may slow down",
                count, threshold
            )
        }
    }
}
