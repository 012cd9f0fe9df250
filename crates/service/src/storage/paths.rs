use std::path::{Path, PathBuf};

use models::ProfileKey;
use uuid::Uuid;

pub const LOGOUT_FILE: &str = "last-logout.json";
pub const LOCATIONS_FILE: &str = "last-locations.json";

/// Resolves every file the store touches under one data root.
///
/// ```text
/// <root>/<uuid>/<group>[_<mode>].json
/// <root>/<uuid>/last-logout.json
/// <root>/<uuid>/last-locations.json
/// ```
#[derive(Debug, Clone)]
pub struct ProfilePaths {
    root: PathBuf,
}

impl ProfilePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn player_dir(&self, uuid: Uuid) -> PathBuf {
        self.root.join(uuid.to_string())
    }

    pub fn profile(&self, key: &ProfileKey) -> PathBuf {
        self.player_dir(key.uuid()).join(key.file_name())
    }

    pub fn logout(&self, uuid: Uuid) -> PathBuf {
        self.player_dir(uuid).join(LOGOUT_FILE)
    }

    pub fn locations(&self, uuid: Uuid) -> PathBuf {
        self.player_dir(uuid).join(LOCATIONS_FILE)
    }
}
