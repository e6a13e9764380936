mod attachments;
mod memo_store;
mod scan;
mod sequence;

pub use attachments::{Attachment, AttachmentStore};
pub use memo_store::{MemoStore, MAX_ID_ATTEMPTS};
pub use scan::{scan_memo_ids, MemoIds};
pub use sequence::SequenceCache;
