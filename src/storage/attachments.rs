// src/storage/attachments.rs
//! Uploaded files referenced from memo bodies.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{MemoError, Result};

const UPLOADS_DIR: &str = "uploads";

/// Extensions longer than this are dropped rather than kept verbatim
const MAX_EXTENSION_LEN: usize = 10;

/// A stored upload
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    /// Stored file name, unique within the uploads directory
    pub id: String,
    /// Name the file was uploaded with
    pub name: String,
}

impl Attachment {
    /// Path the HTTP layer serves this attachment under
    pub fn url(&self) -> String {
        format!("/api/uploads/{}", self.id)
    }
}

/// Flat directory of uploads at `<data_dir>/uploads`
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(UPLOADS_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| MemoError::io("create", dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<Attachment> {
        let id = stored_name(original_name);
        fs::write(self.dir.join(&id), bytes).map_err(|e| MemoError::io("upload", &id, e))?;

        info!(id = %id, size = bytes.len(), "Stored attachment");
        Ok(Attachment {
            id,
            name: original_name.to_string(),
        })
    }
}

/// `<uuid>-<slug>[.ext]`, safe to use as a single path component
fn stored_name(original: &str) -> String {
    let path = Path::new(original);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("{}-{}{}", Uuid::new_v4().simple(), slugify(stem), extension)
}

/// Lowercase ASCII alphanumerics with single hyphens between runs; `file`
/// when nothing usable is left.
fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut pending_hyphen = false;

    for c in stem.chars() {
        if !c.is_ascii_alphanumeric() {
            pending_hyphen = !slug.is_empty();
            continue;
        }
        if pending_hyphen {
            slug.push('-');
            pending_hyphen = false;
        }
        slug.push(c.to_ascii_lowercase());
    }

    if slug.is_empty() {
        return "file".to_string();
    }
    slug
}
