//! World компоненты: слои движка (GameLayer), текущий слой entity (WorldLayer)
//!
//! ## Слои (0-31):
//! Таблица повторяет слои хост-игры один-в-один (индекс = номер слоя).
//! Части живут на `Parts`, болты на `Bolts`, триггеры на `TriggerOnly`.
//!
//! ## Rapier:
//! Слой N → `Group` с битом N (memberships). Filters = ALL,
//! фильтрацию коллизий решает хост.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group};
use serde::{Deserialize, Serialize};

/// Слой движка (32 фиксированных слота)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum GameLayer {
    #[default]
    Default,
    TransparentFX,
    IgnoreRaycast,
    Layer3,
    Water,
    UI,
    Layer6,
    Layer7,
    Road,
    HingedObjects,
    Terrain,
    DontCollide,
    Bolts,
    Dashboard,
    GUI,
    Tools,
    Wheel,
    Collider,
    Datsun,
    Parts,
    Player,
    Lifter,
    Collider2,
    PlayerOnlyColl,
    Cloud,
    Glass,
    Forest,
    NoRain,
    TriggerOnly,
    Layer29,
    Layer30,
    Layer31,
}

impl GameLayer {
    /// Номер слоя (0-31)
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Битовая маска слоя (1 << index)
    pub fn mask(self) -> u32 {
        1 << self.index()
    }

    /// Rapier collision groups: membership = этот слой, filter = все слои
    pub fn collision_groups(self) -> CollisionGroups {
        CollisionGroups::new(Group::from_bits_truncate(self.mask()), Group::ALL)
    }
}

/// Текущий слой entity (меняется при assemble/disassemble части)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct WorldLayer(pub GameLayer);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_indices_match_host_table() {
        assert_eq!(GameLayer::Default.index(), 0);
        assert_eq!(GameLayer::Bolts.index(), 12);
        assert_eq!(GameLayer::Parts.index(), 19);
        assert_eq!(GameLayer::TriggerOnly.index(), 28);
        assert_eq!(GameLayer::Layer31.index(), 31);
    }

    #[test]
    fn test_layer_mask_single_bit() {
        assert_eq!(GameLayer::Parts.mask(), 1 << 19);
        assert_eq!(GameLayer::Layer31.mask().count_ones(), 1);
    }
}
