//! Item data, used for evolution triggers.

use serde::{Deserialize, Serialize};

/// Item resource (reached through evolution details).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item id.
    pub id: u32,
    /// Item name.
    pub name: String,
    /// Purchase cost.
    #[serde(default)]
    pub cost: u32,
    /// Item sprites.
    #[serde(default)]
    pub sprites: ItemSprites,
}

/// Item sprites.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemSprites {
    /// Default sprite.
    #[serde(default)]
    pub default: Option<String>,
}
