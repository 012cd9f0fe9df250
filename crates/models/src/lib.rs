//! Value types shared by the profile store and its callers.
//! - No I/O here; persistence lives in the `service` crate.

pub mod errors;
pub mod document;
pub mod game_mode;
pub mod profile_key;
pub mod location;
pub mod player;

pub use document::Document;
pub use game_mode::GameMode;
pub use location::Location;
pub use player::{Inventory, ItemStack, Player, PlayerProfile, PlayerStats};
pub use profile_key::ProfileKey;
