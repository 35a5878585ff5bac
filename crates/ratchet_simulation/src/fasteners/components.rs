//! Fastener компоненты: болт/гайка, размер, затяжка, совместимость с инструментом

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Размер головки крепежа (мм): он же размер ключа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum FastenerSize {
    Mm5,
    Mm6,
    Mm7,
    Mm8,
    Mm9,
    Mm10,
    Mm11,
    Mm12,
    Mm13,
    Mm14,
    Mm15,
}

impl FastenerSize {
    pub fn millimeters(self) -> u8 {
        match self {
            FastenerSize::Mm5 => 5,
            FastenerSize::Mm6 => 6,
            FastenerSize::Mm7 => 7,
            FastenerSize::Mm8 => 8,
            FastenerSize::Mm9 => 9,
            FastenerSize::Mm10 => 10,
            FastenerSize::Mm11 => 11,
            FastenerSize::Mm12 => 12,
            FastenerSize::Mm13 => 13,
            FastenerSize::Mm14 => 14,
            FastenerSize::Mm15 => 15,
        }
    }
}

/// Тип крепежа (влияет только на визуал/анимацию инструмента у хоста)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum FastenerKind {
    #[default]
    Nut,
    Screw,
    ShortBolt,
    LongBolt,
}

/// Инструмент в руках игрока
///
/// Передаётся в предикат явно (никаких глобальных флагов).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolContext {
    /// Режим "пустые руки" (инструмент убран)
    pub free_hand: bool,
    /// Размер выбранного ключа (None: ключа нет)
    pub tool_size: Option<FastenerSize>,
}

impl ToolContext {
    pub fn wrench(size: FastenerSize) -> Self {
        Self {
            free_hand: false,
            tool_size: Some(size),
        }
    }

    pub fn free_hand() -> Self {
        Self {
            free_hand: true,
            tool_size: None,
        }
    }

    /// Подходит ли инструмент к крепежу размера `size`
    pub fn fits(&self, size: FastenerSize) -> bool {
        !self.free_hand && self.tool_size == Some(size)
    }
}

/// Гайка на болте (опционально)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct NutSettings {
    pub size: FastenerSize,
    /// Смещение гайки вдоль pos_direction от стартовой позиции болта
    pub offset: f32,
    /// Entity визуала гайки (позиционируется при alignment)
    pub entity: Option<Entity>,
}

/// Параметры крепежа для внешней tool-логики
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct FastenerSettings {
    pub kind: FastenerKind,
    pub size: FastenerSize,
    pub nut: Option<NutSettings>,
    /// Направление движения болта при затяжке
    pub pos_direction: Vec3,
    /// Ось вращения болта при затяжке
    pub rot_direction: Vec3,
    pub pos_step: f32,
    pub rot_step: f32,
    pub tightness_step: f32,
    /// Максимальная затяжка
    pub max_tightness: f32,
}

impl Default for FastenerSettings {
    fn default() -> Self {
        Self {
            kind: FastenerKind::default(),
            size: FastenerSize::Mm10,
            nut: None,
            pos_direction: Vec3::NEG_Z,
            rot_direction: Vec3::Z,
            pos_step: 0.0005,
            rot_step: 30.0,
            tightness_step: 1.0,
            max_tightness: 8.0,
        }
    }
}

impl FastenerSettings {
    pub fn sized(size: FastenerSize) -> Self {
        Self { size, ..default() }
    }

    pub fn with_nut(mut self, size: FastenerSize, offset: f32) -> Self {
        self.nut = Some(NutSettings {
            size,
            offset,
            entity: None,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastenerError {
    /// Инструмент не подходит (free hand или не тот размер)
    ToolIncompatible,
    /// У крепежа нет гайки
    NoNut,
}

impl fmt::Display for FastenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FastenerError::ToolIncompatible => write!(f, "equipped tool does not fit this fastener"),
            FastenerError::NoNut => write!(f, "fastener has no nut"),
        }
    }
}

impl std::error::Error for FastenerError {}

/// Save запись крепежа
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FastenerSaveInfo {
    pub tightness: f32,
    pub nut_tightness: f32,
}

/// Крепёж (болт + опциональная гайка)
///
/// Математику затяжки делает внешний tool-interaction код,
/// здесь: состояние, предикат совместимости и поза для alignment.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Fastener {
    pub settings: FastenerSettings,
    tightness: f32,
    nut_tightness: f32,
    /// Стартовая (ослабленная) локальная позиция
    pub start_position: Vec3,
    /// Стартовые euler углы (градусы)
    pub start_euler: Vec3,
}

impl Fastener {
    pub fn new(settings: FastenerSettings, save: Option<FastenerSaveInfo>) -> Self {
        let save = save.unwrap_or_default();
        Self {
            settings,
            tightness: save.tightness,
            nut_tightness: save.nut_tightness,
            start_position: Vec3::ZERO,
            start_euler: Vec3::ZERO,
        }
    }

    pub fn with_start_pose(mut self, position: Vec3, euler_degrees: Vec3) -> Self {
        self.start_position = position;
        self.start_euler = euler_degrees;
        self
    }

    pub fn size(&self) -> FastenerSize {
        self.settings.size
    }

    pub fn tightness(&self) -> f32 {
        self.tightness
    }

    pub fn has_nut(&self) -> bool {
        self.settings.nut.is_some()
    }

    /// Затяжка гайки (None если гайки нет)
    pub fn nut_tightness(&self) -> Option<f32> {
        self.settings.nut.map(|_| self.nut_tightness)
    }

    /// !free_hand && tool size == fastener size
    pub fn tool_compatible(&self, tool: &ToolContext) -> bool {
        tool.fits(self.settings.size)
    }

    /// Затяжка от внешней tool-логики (только подходящим инструментом)
    pub fn set_tightness(&mut self, tool: &ToolContext, value: f32) -> Result<f32, FastenerError> {
        if !self.tool_compatible(tool) {
            return Err(FastenerError::ToolIncompatible);
        }
        self.tightness = value.clamp(0.0, self.settings.max_tightness);
        Ok(self.tightness)
    }

    /// Затяжка гайки: ключ должен подходить к размеру гайки
    pub fn set_nut_tightness(&mut self, tool: &ToolContext, value: f32) -> Result<f32, FastenerError> {
        let nut = self.settings.nut.ok_or(FastenerError::NoNut)?;
        if !tool.fits(nut.size) {
            return Err(FastenerError::ToolIncompatible);
        }
        self.nut_tightness = value.clamp(0.0, self.settings.max_tightness);
        Ok(self.nut_tightness)
    }

    pub fn is_fully_tight(&self) -> bool {
        let bolt = self.tightness >= self.settings.max_tightness;
        match self.nut_tightness() {
            Some(nut) => bolt && nut >= self.settings.max_tightness,
            None => bolt,
        }
    }

    pub fn save_info(&self) -> FastenerSaveInfo {
        FastenerSaveInfo {
            tightness: self.tightness,
            nut_tightness: self.nut_tightness,
        }
    }

    /// Стартовая локальная поза болта
    pub fn start_transform(&self) -> Transform {
        Transform::from_translation(self.start_position).with_rotation(euler_degrees_to_quat(self.start_euler))
    }

    /// Локальная поза гайки: старт болта + offset вдоль pos_direction
    pub fn nut_transform(&self) -> Option<Transform> {
        let nut = self.settings.nut?;
        let direction = self.settings.pos_direction.normalize_or_zero();
        Some(
            Transform::from_translation(self.start_position + direction * nut.offset)
                .with_rotation(euler_degrees_to_quat(self.start_euler)),
        )
    }
}

fn euler_degrees_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Marker: крепёж подсвечен (hover + подходящий инструмент)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FastenerHighlighted;
