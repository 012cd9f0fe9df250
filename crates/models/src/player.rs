use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{game_mode::GameMode, location::Location};

/// Minimal identity of an online player, as handed in by event handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub uuid: Uuid,
    pub name: String,
}

impl Player {
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: String,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            meta: None,
        }
    }
}

/// Slot-indexed contents; `None` is an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub contents: Vec<Option<ItemStack>>,
    #[serde(default)]
    pub armor: Vec<Option<ItemStack>>,
    #[serde(default)]
    pub offhand: Option<ItemStack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: f64,
    pub food_level: i32,
    pub saturation: f32,
    pub exhaustion: f32,
    pub exp: f32,
    pub level: i32,
    pub total_experience: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 20.0,
            food_level: 20,
            saturation: 5.0,
            exhaustion: 0.0,
            exp: 0.0,
            level: 0,
            total_experience: 0,
        }
    }
}

/// Inventory and state of one player in one (group, game mode) context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub ender_chest: Vec<Option<ItemStack>>,
    #[serde(default)]
    pub stats: PlayerStats,
    /// Where the player stood when this profile was captured; persisted on logout.
    pub location: Location,
}

impl PlayerProfile {
    pub fn new(player: &Player, game_mode: GameMode, location: Location) -> Self {
        Self {
            uuid: player.uuid,
            name: player.name.clone(),
            game_mode,
            inventory: Inventory::default(),
            ender_chest: Vec::new(),
            stats: PlayerStats::default(),
            location,
        }
    }

    pub fn player(&self) -> Player {
        Player::new(self.uuid, self.name.clone())
    }
}
