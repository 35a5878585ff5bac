//! Part system events
//!
//! # Architecture
//!
//! **Zone events (от хоста / physics bridge):**
//! - `ZoneEntered` / `ZoneExited` → роутятся подписанным частям (AttachPoint listeners)
//!
//! **Requests (от поллеров или внешнего кода):**
//! - `AssembleRequest` → установить часть в зону
//! - `DisassembleRequest` → снять часть
//! - `JointBroken` → forced disassemble (Joint strategy)
//! - `SetZoneActive` → включить/выключить attach points части
//!
//! **Notifications (только успешные переходы):**
//! - `PartAssembled` / `PartDisassembled`
//! - `EffectRequested` → fire-and-forget звук/эффект

use bevy::prelude::*;

/// Collider вошёл в attach point
#[derive(Event, Debug, Clone, Copy)]
pub struct ZoneEntered {
    pub zone: Entity,
    pub other: Entity,
}

/// Collider вышел из attach point
#[derive(Event, Debug, Clone, Copy)]
pub struct ZoneExited {
    pub zone: Entity,
    pub other: Entity,
}

/// Установить часть в зону
#[derive(Event, Debug, Clone, Copy)]
pub struct AssembleRequest {
    pub part: Entity,
    pub zone: Entity,
    pub play_effect: bool,
}

impl AssembleRequest {
    pub fn new(part: Entity, zone: Entity) -> Self {
        Self {
            part,
            zone,
            play_effect: true,
        }
    }
}

/// Почему часть снимается
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisassembleCause {
    /// Игрок (secondary confirm) или внешний код
    Requested,
    /// Joint порвался
    JointBroken,
}

/// Снять часть
#[derive(Event, Debug, Clone, Copy)]
pub struct DisassembleRequest {
    pub part: Entity,
    pub play_effect: bool,
    pub cause: DisassembleCause,
}

impl DisassembleRequest {
    pub fn new(part: Entity) -> Self {
        Self {
            part,
            play_effect: true,
            cause: DisassembleCause::Requested,
        }
    }
}

/// Joint части порвался (physics host или `detect_joint_overload`)
#[derive(Event, Debug, Clone, Copy)]
pub struct JointBroken {
    pub part: Entity,
    /// Нагрузка при разрыве
    pub force: f32,
}

/// Какие attach points части включить/выключить
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSelector {
    All,
    Index(usize),
    /// Зона в которой часть сейчас установлена
    Attached,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SetZoneActive {
    pub part: Entity,
    pub selector: ZoneSelector,
    pub active: bool,
}

/// Notification: часть установлена
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartAssembled {
    pub part: Entity,
    pub zone: Entity,
    pub index: usize,
}

/// Notification: часть снята
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartDisassembled {
    pub part: Entity,
    pub zone: Entity,
    pub index: usize,
    pub cause: DisassembleCause,
}

/// Fire-and-forget эффект (звук) на transform entity
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct EffectRequested {
    pub at: Entity,
    /// Группа звуков ("CarBuilding")
    pub name: &'static str,
    /// Вариация ("assemble" / "disassemble")
    pub variation: &'static str,
}

pub const EFFECT_CAR_BUILDING: &str = "CarBuilding";
pub const VARIATION_ASSEMBLE: &str = "assemble";
pub const VARIATION_DISASSEMBLE: &str = "disassemble";
