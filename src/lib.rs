pub mod cli;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod frontmatter;
pub mod server;
pub mod storage;
pub mod warnings;

pub use entity::{Memo, MemoDraft, MemoId, MemoUpdate};
pub use error::{MemoError, Result};
pub use storage::MemoStore;
