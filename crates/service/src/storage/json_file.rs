//! Whole-file JSON document I/O.
//!
//! Files are always rewritten in full: the new contents go to a sibling
//! `*.tmp` file which is then renamed over the target.

use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use models::Document;
use serde_json::Value;

use crate::errors::StoreError;

/// Create the file (and its parent directories) if it does not exist yet.
/// Losing a creation race to another writer counts as success.
pub fn ensure_file(path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Read and parse a document. A missing file is `Ok(None)`.
pub fn read_document(path: &Path) -> Result<Option<Document>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    parse_document(path, &bytes).map(Some)
}

/// Like [`read_document`], but a missing or blank file reads as an empty document.
pub fn read_document_or_empty(path: &Path) -> Result<Document, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    parse_document(path, &bytes)
}

fn parse_document(path: &Path, bytes: &[u8]) -> Result<Document, StoreError> {
    match serde_json::from_slice::<Value>(bytes).map_err(|e| StoreError::parse(path, e))? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::malformed(path, "top-level value is not an object")),
    }
}

/// Replace the file contents with the document's JSON encoding.
pub fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let data = serde_json::to_vec(doc).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = tmp_path(path);
    fs::write(&tmp, data).map_err(|e| StoreError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
