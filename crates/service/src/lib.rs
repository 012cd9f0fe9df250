//! Per-player profile persistence.
//! - `storage`: path scheme, JSON document I/O, cache and write locks.
//! - `profile`: the `ProfileRepository` seam and the file-backed store.
//! - `serializer`: pluggable domain-object <-> document conversion.

pub mod errors;
pub mod serializer;
pub mod storage;
pub mod profile;

pub use errors::StoreError;
pub use profile::{file_store::FileProfileStore, repository::ProfileRepository};
