//! Storage building blocks for the profile store
//!
//! Path derivation, whole-file JSON document I/O, the profile cache and the
//! per-player write locks. `profile::file_store` composes them.

pub mod paths;
pub mod json_file;
pub mod profile_cache;
pub mod player_locks;
