use models::{Document, Location, Player, PlayerProfile, ProfileKey};
use uuid::Uuid;

use crate::errors::StoreError;

/// Trait abstraction for per-player profile storage.
/// Implementations must be callable from many worker threads at once.
pub trait ProfileRepository: Send + Sync {
    /// Persist the profile for one (player, mode, group) key.
    fn save_player(&self, key: &ProfileKey, profile: &PlayerProfile) -> Result<(), StoreError>;
    /// Stored profile document; `Ok(None)` when nothing was ever saved for the key.
    fn get_player(&self, key: &ProfileKey) -> Result<Option<Document>, StoreError>;
    fn load_player(&self, key: &ProfileKey) -> Result<Option<PlayerProfile>, StoreError>;

    fn save_logout(&self, profile: &PlayerProfile) -> Result<(), StoreError>;
    fn get_logout(&self, uuid: Uuid) -> Option<Location>;

    /// Record the player's last location in `location.world`, keeping other worlds.
    fn save_location(&self, player: &Player, location: &Location) -> Result<(), StoreError>;
    fn get_location(&self, uuid: Uuid, world: &str) -> Option<Location>;
}
