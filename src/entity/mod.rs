mod id;
mod memo;

pub use id::{InvalidMemoId, MemoId, DATE_FORMAT};
pub use memo::{Memo, MemoDraft, MemoUpdate};
