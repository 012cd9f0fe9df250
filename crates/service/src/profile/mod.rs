//! Player profile persistence: the repository seam and its file-backed store.

pub mod repository;
pub mod file_store;
