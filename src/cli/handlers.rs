use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::entity::{Memo, MemoDraft, MemoUpdate};
use crate::error::MemoError;
use crate::server::{self, AppState};
use crate::storage::{AttachmentStore, MemoStore};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] MemoError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

pub fn handle_serve(config: ServerConfig) -> CliResult<()> {
    let state = AppState {
        memos: std::sync::Arc::new(MemoStore::open(&config.data_dir)?),
        attachments: std::sync::Arc::new(AttachmentStore::open(&config.data_dir)?),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server::serve(state, &config))
        .map_err(|e| CliError::Server(e.to_string()))
}

pub fn handle_list(data_dir: &Path, tag: Option<String>, json: bool) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;
    let mut memos = store.list()?;

    if let Some(tag) = tag {
        memos.retain(|m| m.tags.contains(&tag));
    }
    memos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    if json {
        println!("{}", serde_json::to_string_pretty(&memos)?);
        return Ok(());
    }

    if memos.is_empty() {
        println!("No memos found.");
        return Ok(());
    }
    for memo in &memos {
        println!("{}", format_memo_line(memo));
    }
    Ok(())
}

pub fn handle_get(data_dir: &Path, id: &str, json: bool) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;
    let memo = store.get(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&memo)?);
    } else {
        print_memo(&memo);
    }
    Ok(())
}

pub fn handle_add(
    data_dir: &Path,
    title: String,
    tags: Vec<String>,
    stdin: bool,
    json: bool,
) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;

    let content = if stdin { read_stdin()? } else { String::new() };
    let memo = store.create(MemoDraft {
        title,
        tags,
        content,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&memo)?);
    } else {
        println!("Created memo {}: {}", memo.id, memo.title);
    }
    Ok(())
}

pub fn handle_update(
    data_dir: &Path,
    id: &str,
    title: Option<String>,
    tags: Vec<String>,
    stdin: bool,
    json: bool,
) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;

    let patch = MemoUpdate {
        title,
        tags: if tags.is_empty() { None } else { Some(tags) },
        content: if stdin { Some(read_stdin()?) } else { None },
    };
    store.update(id, patch)?;
    let memo = store.get(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&memo)?);
    } else {
        println!("Updated memo {}: {}", memo.id, memo.title);
    }
    Ok(())
}

pub fn handle_delete(data_dir: &Path, id: &str) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;
    store.delete(id)?;
    println!("Deleted memo {}", id);
    Ok(())
}

pub fn handle_tags(data_dir: &Path, json: bool) -> CliResult<()> {
    let store = MemoStore::open(data_dir)?;
    let tags = store.tags()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for tag in tags {
            println!("{}", tag);
        }
    }
    Ok(())
}

fn read_stdin() -> CliResult<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn format_memo_line(memo: &Memo) -> String {
    let title = if memo.title.is_empty() {
        "(untitled)"
    } else {
        memo.title.as_str()
    };

    if memo.tags.is_empty() {
        format!("{:<14} {}", memo.id, title)
    } else {
        format!("{:<14} {} [{}]", memo.id, title, memo.tags.join(", "))
    }
}

fn print_memo(memo: &Memo) {
    println!("ID:      {}", memo.id);
    println!("Title:   {}", memo.title);
    if !memo.tags.is_empty() {
        println!("Tags:    {}", memo.tags.join(", "));
    }
    println!("Created: {}", memo.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Updated: {}", memo.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if !memo.content.is_empty() {
        println!();
        println!("{}", memo.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MemoId;
    use chrono::{NaiveDate, Utc};

    fn memo(title: &str, tags: &[&str]) -> Memo {
        Memo {
            id: MemoId::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 2),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_memo_line_with_tags() {
        let line = format_memo_line(&memo("Groceries", &["home", "errands"]));
        assert!(line.starts_with("2024-01-01-2"));
        assert!(line.ends_with("Groceries [home, errands]"));
    }

    #[test]
    fn test_format_memo_line_untitled() {
        let line = format_memo_line(&memo("", &[]));
        assert!(line.ends_with("(untitled)"));
        assert!(!line.contains('['));
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err = CliError::from(MemoError::not_found("2024-01-01-1"));
        assert_eq!(err.to_string(), "Memo not found: 2024-01-01-1");
    }
}
