use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Play mode a profile belongs to. Each mode keeps its own profile file per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Adventure,
    Creative,
    Spectator,
    #[default]
    Survival,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Adventure,
        GameMode::Creative,
        GameMode::Spectator,
        GameMode::Survival,
    ];

    /// Lowercase name used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Adventure => "adventure",
            GameMode::Creative => "creative",
            GameMode::Spectator => "spectator",
            GameMode::Survival => "survival",
        }
    }

    /// Suffix appended to the group name in a profile file name.
    /// Survival is the default mode and carries no suffix.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            GameMode::Survival => "",
            GameMode::Adventure => "_adventure",
            GameMode::Creative => "_creative",
            GameMode::Spectator => "_spectator",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        GameMode::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| ModelError::invalid(format!("unknown game mode: {s}")))
    }
}
