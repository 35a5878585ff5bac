//! Part / AttachPoint компоненты, настройки и save info

use bevy::prelude::*;
use bevy_rapier3d::prelude::AdditionalMassProperties;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::GameLayer;
use crate::parts::strategy::{AssemblyStrategy, Bond};
use crate::parts::task::PollTask;

/// Настройки части (фиксируются при init)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct PartSettings {
    pub strategy: AssemblyStrategy,
    /// Слой установленной части
    pub installed_layer: GameLayer,
    /// Слой свободной части
    pub not_installed_layer: GameLayer,
    /// Применять ли сохранённую позицию/поворот при init (только если не установлена)
    pub set_position_rotation_on_init: bool,
}

impl Default for PartSettings {
    fn default() -> Self {
        Self {
            strategy: AssemblyStrategy::default(),
            installed_layer: GameLayer::Parts,
            not_installed_layer: GameLayer::Parts,
            set_position_rotation_on_init: true,
        }
    }
}

impl PartSettings {
    pub fn with_strategy(strategy: AssemblyStrategy) -> Self {
        Self {
            strategy,
            ..default()
        }
    }

    pub fn layer_for(&self, installed: bool) -> GameLayer {
        if installed {
            self.installed_layer
        } else {
            self.not_installed_layer
        }
    }
}

/// Плоская save-запись части
///
/// position = world position, rotation = euler углы в градусах (порядок YXZ).
/// Позиция осмысленна только когда часть не установлена.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartSaveInfo {
    pub installed: bool,
    pub installed_point_index: Option<usize>,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl PartSaveInfo {
    /// Свободная часть в заданной позе
    pub fn at(position: Vec3, rotation_degrees: Vec3) -> Self {
        Self {
            installed: false,
            installed_point_index: None,
            position: position.to_array(),
            rotation: rotation_degrees.to_array(),
        }
    }

    /// Часть установленная в attach point `index`
    pub fn installed_at(index: usize) -> Self {
        Self {
            installed: true,
            installed_point_index: Some(index),
            ..default()
        }
    }

    pub fn from_transform(installed: bool, index: Option<usize>, transform: &Transform) -> Self {
        let (y, x, z) = transform.rotation.to_euler(EulerRot::YXZ);
        Self {
            installed,
            installed_point_index: index,
            position: transform.translation.to_array(),
            rotation: [x.to_degrees(), y.to_degrees(), z.to_degrees()],
        }
    }

    pub fn to_transform(&self) -> Transform {
        let [x, y, z] = self.rotation;
        Transform::from_translation(Vec3::from_array(self.position)).with_rotation(Quat::from_euler(
            EulerRot::YXZ,
            y.to_radians(),
            x.to_radians(),
            z.to_radians(),
        ))
    }
}

/// Стабильный ключ части в save-файле
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct PartKey(pub String);

impl PartKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// Marker: часть выключена (поллеры остановлены)
///
/// Снятие маркера перезапускает installed-поллер если часть установлена.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PartDisabled;

/// Attach point (trigger zone)
///
/// Занятая зона выключена (`enabled == false`) и не доставляет enter events,
/// поэтому вторая часть не может в неё встать.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttachPoint {
    pub enabled: bool,
    /// Части подписанные на события зоны (observer list)
    listeners: Vec<Entity>,
    /// Кто сейчас занимает зону
    occupant: Option<Entity>,
}

impl Default for AttachPoint {
    fn default() -> Self {
        Self {
            enabled: true,
            listeners: Vec::new(),
            occupant: None,
        }
    }
}

impl AttachPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Подписать часть (повторная подписка ничего не дублирует)
    pub fn subscribe(&mut self, part: Entity) -> bool {
        if self.listeners.contains(&part) {
            return false;
        }
        self.listeners.push(part);
        true
    }

    pub fn unsubscribe(&mut self, part: Entity) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| *listener != part);
        self.listeners.len() != before
    }

    pub fn listeners(&self) -> &[Entity] {
        &self.listeners
    }

    pub fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) fn occupy(&mut self, part: Entity) {
        self.enabled = false;
        self.occupant = Some(part);
    }

    pub(crate) fn release(&mut self) {
        self.enabled = true;
        self.occupant = None;
    }
}

/// Состояние машины части (вычисляется из полей Part)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    /// Не установлена, взаимодействия нет
    Idle,
    /// Игрок держит часть внутри зоны, ждём primary
    CarriedNearZone { zone: Entity },
    /// Установлена в attach point
    Installed { index: usize },
    /// Установлена, игрок смотрит на неё (доступен disassemble)
    InstalledInteracting { index: usize },
}

/// Нарушения предусловий assemble/disassemble
///
/// Операция с ошибкой является no-op, состояние части не меняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartError {
    /// Зона не из списка attach points этой части
    ZoneNotOwned { zone: Entity },
    ZoneIndexOutOfRange { index: usize, len: usize },
    /// Зона выключена (занята другой частью)
    ZoneOccupied { zone: Entity },
    AlreadyInstalled { index: usize },
    NotInstalled,
}

impl fmt::Display for PartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartError::ZoneNotOwned { zone } => {
                write!(f, "zone {:?} is not an attach point of this part", zone)
            }
            PartError::ZoneIndexOutOfRange { index, len } => {
                write!(f, "attach point index {} out of range (part has {})", index, len)
            }
            PartError::ZoneOccupied { zone } => write!(f, "zone {:?} is occupied", zone),
            PartError::AlreadyInstalled { index } => {
                write!(f, "part is already installed at attach point {}", index)
            }
            PartError::NotInstalled => write!(f, "part is not installed"),
        }
    }
}

impl std::error::Error for PartError {}

/// Прикрепляемая часть
///
/// Инварианты:
/// - `installed` ⇔ `installed_point_index.is_some()`, индекс валиден в `zones`
/// - одновременно крутится максимум один поллер (in-zone ИЛИ installed)
#[derive(Component, Debug, Clone)]
pub struct Part {
    pub settings: PartSettings,
    pub(crate) zones: Vec<Entity>,
    pub(crate) installed: bool,
    pub(crate) installed_point_index: Option<usize>,
    /// Save payload ждущий init (см. `initialize_parts`)
    pub(crate) pending_restore: Option<PartSaveInfo>,
    pub(crate) zone_task: PollTask,
    /// Зона в которой крутится in-zone поллер
    pub(crate) zone_target: Option<Entity>,
    pub(crate) installed_task: PollTask,
    /// Игрок смотрит на установленную часть (mouse over)
    pub(crate) looking: bool,
    pub(crate) bond: Option<Bond>,
    pub(crate) cached_mass: Option<AdditionalMassProperties>,
    pub(crate) suspended: bool,
    pub(crate) initialized: bool,
}

impl Part {
    /// Новая часть: settings + attach points + save info (None → defaults)
    pub fn new(settings: PartSettings, zones: Vec<Entity>, save: Option<PartSaveInfo>) -> Self {
        Self {
            settings,
            zones,
            installed: false,
            installed_point_index: None,
            pending_restore: Some(save.unwrap_or_default()),
            zone_task: PollTask::default(),
            zone_target: None,
            installed_task: PollTask::default(),
            looking: false,
            bond: None,
            cached_mass: None,
            suspended: false,
            initialized: false,
        }
    }

    pub fn installed(&self) -> bool {
        self.installed
    }

    pub fn installed_point_index(&self) -> Option<usize> {
        self.installed_point_index
    }

    pub fn zones(&self) -> &[Entity] {
        &self.zones
    }

    pub fn zone_index(&self, zone: Entity) -> Option<usize> {
        self.zones.iter().position(|z| *z == zone)
    }

    pub fn zone_at(&self, index: usize) -> Result<Entity, PartError> {
        self.zones
            .get(index)
            .copied()
            .ok_or(PartError::ZoneIndexOutOfRange { index, len: self.zones.len() })
    }

    /// Зона в которой часть установлена
    pub fn installed_zone(&self) -> Option<Entity> {
        self.installed_point_index.and_then(|index| self.zones.get(index).copied())
    }

    pub fn bond(&self) -> Option<&Bond> {
        self.bond.as_ref()
    }

    /// Масса закешированная для DeleteBody
    pub fn cached_mass(&self) -> Option<AdditionalMassProperties> {
        self.cached_mass
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn zone_poller_running(&self) -> bool {
        self.zone_task.is_running()
    }

    pub fn installed_poller_running(&self) -> bool {
        self.installed_task.is_running()
    }

    pub fn state(&self) -> PartState {
        match (self.installed, self.installed_point_index) {
            (true, Some(index)) if self.looking => PartState::InstalledInteracting { index },
            (true, Some(index)) => PartState::Installed { index },
            _ => match self.zone_target {
                Some(zone) if self.zone_task.is_running() => PartState::CarriedNearZone { zone },
                _ => PartState::Idle,
            },
        }
    }

    /// Snapshot для save-файла
    pub fn save_info(&self, world_transform: &Transform) -> PartSaveInfo {
        PartSaveInfo::from_transform(self.installed, self.installed_point_index, world_transform)
    }
}
