//! The open document: its text buffer and the file it is associated with.
//!
//! The document is shared between the UI loop and the auto-save ticker
//! through [`SharedDocument`]. Callers hold the lock only long enough to read
//! or swap state; file writes happen after the lock is released, so a manual
//! save and an auto-save tick race with last-write-wins semantics.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::buffer::TextBuffer;
use crate::error::DocumentError;

pub const DEFAULT_TITLE: &str = "Smart Notepad";
pub const TEXT_EXTENSION: &str = "txt";

#[derive(Debug, Default)]
pub struct Document {
    pub buffer: TextBuffer,
    pub file: Option<PathBuf>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Path and full text, captured together for a write.
    pub fn snapshot(&self) -> Option<(PathBuf, String)> {
        self.file.as_ref().map(|path| (path.clone(), self.text()))
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.file = None;
    }

    pub fn replace(&mut self, path: PathBuf, text: &str) {
        self.buffer = TextBuffer::from_text(text);
        self.file = Some(path);
    }

    pub fn title(&self) -> String {
        title_for(self.file.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedDocument(Arc<Mutex<Document>>);

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        SharedDocument(Arc::new(Mutex::new(document)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Document> {
        // A panicked holder leaves plain data behind; keep using it.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn title_for(file: Option<&Path>) -> String {
    match file.and_then(|path| path.file_name()) {
        Some(name) => format!("{} - {}", DEFAULT_TITLE, name.to_string_lossy()),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Appends `.txt` unless the file name already ends with it, and makes the
/// path absolute.
pub fn with_text_extension(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let suffix = format!(".{}", TEXT_EXTENSION);
    let has_suffix = path
        .file_name()
        .map(|name| name.to_string_lossy().ends_with(&suffix))
        .unwrap_or(false);
    if has_suffix {
        path
    } else {
        let mut raw = path.into_os_string();
        raw.push(&suffix);
        PathBuf::from(raw)
    }
}

pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(TEXT_EXTENSION))
        .unwrap_or(false)
}

pub fn read_file(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|source| DocumentError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_file(path: &Path, text: &str) -> Result<(), DocumentError> {
    fs::write(path, text).map_err(|source| DocumentError::Save {
        path: path.to_path_buf(),
        source,
    })
}
