//! Fastener events
//!
//! **От хоста (pointer/picking):**
//! - `FastenerPointerEntered` / `FastenerPointerExited`
//!
//! **Notifications:**
//! - `FastenerHoverStarted`: курсор на крепеже и инструмент подходит
//! - `FastenerHoverEnded`: курсор ушёл (всегда)
//!
//! **Alignment tooling:**
//! - `InspectFastener`: выбрать крепёж для инспекции
//! - `ApplyFastenerAlignment`: записать staged позу в крепёж

use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct FastenerPointerEntered {
    pub fastener: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct FastenerPointerExited {
    pub fastener: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastenerHoverStarted {
    pub fastener: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastenerHoverEnded {
    pub fastener: Entity,
}

/// Выбрать крепёж для инспекции (None: закрыть)
#[derive(Event, Debug, Clone, Copy)]
pub struct InspectFastener {
    pub fastener: Option<Entity>,
}

/// Применить staged позу из FastenerInspection
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ApplyFastenerAlignment;
