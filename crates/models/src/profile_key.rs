use std::fmt;

use uuid::Uuid;

use crate::{errors::ModelError, game_mode::GameMode};

/// Identity of one stored profile: a player's state in one (group, game mode) context.
///
/// Used both as the cache key and as the input to path derivation, so equality
/// and hashing cover all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    uuid: Uuid,
    game_mode: GameMode,
    group: String,
}

impl ProfileKey {
    /// Build a key, rejecting group names that could escape the player's directory.
    pub fn new(
        uuid: Uuid,
        game_mode: GameMode,
        group: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let group = group.into();
        if group.trim().is_empty() {
            return Err(ModelError::invalid("group name required"));
        }
        if group.contains(['/', '\\', '\0']) || group.contains("..") {
            return Err(ModelError::invalid(format!(
                "group name not usable as a file name: {group}"
            )));
        }
        Ok(Self {
            uuid,
            game_mode,
            group,
        })
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// File name of this profile inside the player's directory:
    /// `<group>[_<mode>].json`, no suffix for survival.
    pub fn file_name(&self) -> String {
        format!("{}{}.json", self.group, self.game_mode.file_suffix())
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.uuid, self.group, self.game_mode)
    }
}
