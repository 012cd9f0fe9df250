use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use configs::StorageConfig;
use models::{Document, Location, Player, PlayerProfile, ProfileKey};
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::profile::repository::ProfileRepository;
use crate::serializer::{DocumentSerializer, SerdeDocumentSerializer};
use crate::storage::{
    json_file::{ensure_file, read_document, read_document_or_empty, write_document},
    paths::ProfilePaths,
    player_locks::PlayerLocks,
    profile_cache::ProfileCache,
};

/// Top-level key of the per-world locations document.
pub const LOCATIONS_KEY: &str = "locations";

/// JSON-file-backed profile store with a bounded read cache.
///
/// Writes for one player are serialized through a per-player lock. A profile
/// read that misses the cache takes the same lock for the disk read and the
/// cache fill, so a concurrent [`save_player`](Self::save_player) can never be
/// followed by a stale cache entry. Cache hits and location reads take no lock
/// since every write replaces its file atomically. Only reads fill the cache.
pub struct FileProfileStore {
    paths: ProfilePaths,
    cache: ProfileCache,
    locks: PlayerLocks,
    players: Arc<dyn DocumentSerializer<PlayerProfile>>,
    locations: Arc<dyn DocumentSerializer<Location>>,
}

impl FileProfileStore {
    pub fn new(
        data_root: impl Into<PathBuf>,
        cache: ProfileCache,
        players: Arc<dyn DocumentSerializer<PlayerProfile>>,
        locations: Arc<dyn DocumentSerializer<Location>>,
    ) -> Self {
        Self {
            paths: ProfilePaths::new(data_root),
            cache,
            locks: PlayerLocks::new(),
            players,
            locations,
        }
    }

    /// Store using the serde-based serializers for profiles and locations.
    pub fn with_default_serializers(data_root: impl Into<PathBuf>, cache: ProfileCache) -> Self {
        Self::new(
            data_root,
            cache,
            Arc::new(SerdeDocumentSerializer::<PlayerProfile>::new()),
            Arc::new(SerdeDocumentSerializer::<Location>::new()),
        )
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self::with_default_serializers(&cfg.data_root, ProfileCache::from_config(cfg))
    }

    pub fn paths(&self) -> &ProfilePaths {
        &self.paths
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    pub fn save_player(&self, key: &ProfileKey, profile: &PlayerProfile) -> Result<(), StoreError> {
        let path = self.paths.profile(key);
        let result = self.locks.with_lock(key.uuid(), || -> Result<(), StoreError> {
            ensure_file(&path)?;
            let doc = self.players.to_document(profile)?;
            write_document(&path, &doc)?;
            self.cache.invalidate(key);
            Ok(())
        });
        match &result {
            Ok(()) => debug!(
                path = %path.display(),
                player = %profile.name,
                %key,
                "saved player profile"
            ),
            Err(e) => error!(
                path = %path.display(),
                player = %profile.name,
                %key,
                error = %e,
                "failed to save player profile"
            ),
        }
        result
    }

    pub fn get_player(&self, key: &ProfileKey) -> Result<Option<Document>, StoreError> {
        if let Some(doc) = self.cache.get(key) {
            debug!(%key, "profile cache hit");
            return Ok(Some(doc.as_ref().clone()));
        }

        let path = self.paths.profile(key);
        // Read and fill under the writer's lock; a save can't slip in between.
        let read = self.locks.with_lock(key.uuid(), || {
            let read = read_document(&path);
            if let Ok(Some(doc)) = &read {
                self.cache.put(key.clone(), Arc::new(doc.clone()));
            }
            read
        });
        match read {
            Ok(Some(doc)) => {
                debug!(path = %path.display(), %key, "loaded player profile");
                Ok(Some(doc))
            }
            Ok(None) => {
                debug!(path = %path.display(), %key, "no saved profile");
                Ok(None)
            }
            Err(e @ StoreError::Parse { .. }) => {
                error!(
                    path = %path.display(),
                    %key,
                    error = %e,
                    "player profile is not valid JSON"
                );
                Err(e)
            }
            Err(e) => {
                error!(path = %path.display(), %key, error = %e, "failed to read player profile");
                Ok(None)
            }
        }
    }

    pub fn load_player(&self, key: &ProfileKey) -> Result<Option<PlayerProfile>, StoreError> {
        let Some(doc) = self.get_player(key)? else {
            return Ok(None);
        };
        match self.players.from_document(&doc) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                error!(
                    path = %self.paths.profile(key).display(),
                    %key,
                    error = %e,
                    "cannot deserialize player profile"
                );
                Err(e.into())
            }
        }
    }

    pub fn save_logout(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let path = self.paths.logout(profile.uuid);
        let result = self.locks.with_lock(profile.uuid, || -> Result<(), StoreError> {
            ensure_file(&path)?;
            let doc = self.locations.to_document(&profile.location)?;
            write_document(&path, &doc)
        });
        match &result {
            Ok(()) => debug!(
                path = %path.display(),
                player = %profile.name,
                world = %profile.location.world,
                "saved logout location"
            ),
            Err(e) => error!(
                path = %path.display(),
                player = %profile.name,
                error = %e,
                "failed to save logout location"
            ),
        }
        result
    }

    pub fn get_logout(&self, uuid: Uuid) -> Option<Location> {
        let path = self.paths.logout(uuid);
        let doc = match read_document(&path) {
            Ok(doc) => doc?,
            Err(e) => {
                error!(path = %path.display(), %uuid, error = %e, "failed to read logout location");
                return None;
            }
        };
        self.decode_location(&doc, &path, uuid)
    }

    pub fn save_location(&self, player: &Player, location: &Location) -> Result<(), StoreError> {
        let path = self.paths.locations(player.uuid);
        let result = self.locks.with_lock(player.uuid, || -> Result<(), StoreError> {
            ensure_file(&path)?;
            let mut root = read_document_or_empty(&path)?;
            // Anything but an object under "locations" is left on disk as is.
            let mut worlds = match root.shift_remove(LOCATIONS_KEY) {
                Some(Value::Object(worlds)) => worlds,
                Some(_) => {
                    return Err(StoreError::malformed(&path, "\"locations\" is not an object"))
                }
                None => Document::new(),
            };
            let entry = self.locations.to_document(location)?;
            worlds.shift_remove(&location.world);
            worlds.insert(location.world.clone(), Value::Object(entry));
            root.insert(LOCATIONS_KEY.to_string(), Value::Object(worlds));
            write_document(&path, &root)
        });
        match &result {
            Ok(()) => debug!(
                path = %path.display(),
                player = %player.name,
                world = %location.world,
                "saved last location"
            ),
            Err(e) => error!(
                path = %path.display(),
                player = %player.name,
                world = %location.world,
                error = %e,
                "failed to save last location"
            ),
        }
        result
    }

    pub fn get_location(&self, uuid: Uuid, world: &str) -> Option<Location> {
        let path = self.paths.locations(uuid);
        let root = match read_document(&path) {
            Ok(root) => root?,
            Err(e) => {
                error!(path = %path.display(), %uuid, error = %e, "failed to read last locations");
                return None;
            }
        };
        let Some(worlds) = root.get(LOCATIONS_KEY).and_then(Value::as_object) else {
            debug!(path = %path.display(), %uuid, "no locations recorded yet");
            return None;
        };
        let Some(entry) = worlds.get(world).and_then(Value::as_object) else {
            debug!(path = %path.display(), %uuid, %world, "no location recorded for world");
            return None;
        };
        self.decode_location(entry, &path, uuid)
    }

    fn decode_location(&self, doc: &Document, path: &Path, uuid: Uuid) -> Option<Location> {
        match self.locations.from_document(doc) {
            Ok(location) => Some(location),
            Err(e) => {
                error!(path = %path.display(), %uuid, error = %e, "cannot deserialize location");
                None
            }
        }
    }
}

impl ProfileRepository for FileProfileStore {
    fn save_player(&self, key: &ProfileKey, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.save_player(key, profile)
    }

    fn get_player(&self, key: &ProfileKey) -> Result<Option<Document>, StoreError> {
        self.get_player(key)
    }

    fn load_player(&self, key: &ProfileKey) -> Result<Option<PlayerProfile>, StoreError> {
        self.load_player(key)
    }

    fn save_logout(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.save_logout(profile)
    }

    fn get_logout(&self, uuid: Uuid) -> Option<Location> {
        self.get_logout(uuid)
    }

    fn save_location(&self, player: &Player, location: &Location) -> Result<(), StoreError> {
        self.save_location(player, location)
    }

    fn get_location(&self, uuid: Uuid, world: &str) -> Option<Location> {
        self.get_location(uuid, world)
    }
}
