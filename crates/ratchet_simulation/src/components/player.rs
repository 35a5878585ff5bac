//! Player interaction компоненты: что игрок держит, на что смотрит, что нажал
//!
//! Все три источника внешние (хост пишет их каждый frame):
//! - `Carried`: игрок держит этот объект в руках
//! - `LookedAt`: луч взгляда игрока пересекает объект
//! - `InteractionInput`: edge-triggered кнопки (primary = assemble, secondary = disassemble)

use bevy::prelude::*;

/// Marker: игрок держит объект (carry query)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Carried;

/// Marker: игрок смотрит на объект (look-at query)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LookedAt;

/// Marker: объект можно подобрать (тег "PART" в хост-игре)
///
/// Снимается при assemble, возвращается при disassemble.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Pickable;

/// Кнопки взаимодействия за текущий frame
///
/// Edge-triggered: true только в тот frame когда кнопку нажали.
/// Хост выставляет флаги до `app.update()`, `clear_interaction_input` сбрасывает в конце frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionInput {
    /// Primary action (LMB): установить часть
    pub primary: bool,
    /// Secondary action (RMB): снять часть
    pub secondary: bool,
}

impl InteractionInput {
    pub fn primary() -> Self {
        Self { primary: true, secondary: false }
    }

    pub fn secondary() -> Self {
        Self { primary: false, secondary: true }
    }
}

/// Подсказки для GUI (assemble / disassemble prompt)
///
/// Пересчитываются каждый frame поллерами частей.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionPrompt {
    pub assemble: bool,
    pub disassemble: bool,
}
