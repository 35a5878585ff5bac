//! Part state machine (чистая логика без ECS)
//!
//! Переходы:
//! - Idle --zone enter + carried--> CarriedNearZone (старт in-zone поллера)
//! - CarriedNearZone --primary--> Installed (через assemble)
//! - CarriedNearZone --zone exit / release--> Idle
//! - Installed --secondary + looked at--> Idle (через disassemble)
//! - Installed --joint break--> Idle (только Joint strategy)
//!
//! Побочные эффекты (transform, rigidbody, зона, события) применяют системы в `parts::systems`.

use bevy::prelude::*;

use crate::parts::components::{Part, PartError};
use crate::parts::strategy::Bond;

/// Внешние сигналы за один frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Игрок держит часть
    pub carried: bool,
    /// Игрок смотрит на часть
    pub looked_at: bool,
    /// Primary confirm (edge-triggered)
    pub primary: bool,
    /// Secondary confirm (edge-triggered)
    pub secondary: bool,
}

/// Что поллер решил сделать в этом frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartAction {
    Assemble { zone: Entity },
    Disassemble,
}

/// Результат одного шага поллеров
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub action: Option<PartAction>,
    /// Показать подсказку "assemble"
    pub prompt_assemble: bool,
    /// Показать подсказку "disassemble"
    pub prompt_disassemble: bool,
}

impl Part {
    /// Zone enter: старт in-zone поллера
    ///
    /// Учитывается только если часть не установлена, зона своя,
    /// вошла сама часть и игрок её держит. Возвращает true если поллер (пере)запущен.
    pub fn on_zone_enter(&mut self, this: Entity, zone: Entity, other: Entity, carried: bool) -> bool {
        if self.installed || self.suspended {
            return false;
        }
        if other != this || !carried || self.zone_index(zone).is_none() {
            return false;
        }

        // start() отменяет предыдущий in-zone поллер
        self.zone_task.start();
        self.zone_target = Some(zone);
        true
    }

    /// Zone exit: гасит in-zone поллер этой зоны (независимо от carry state)
    pub fn on_zone_exit(&mut self, zone: Entity) -> bool {
        if self.zone_target != Some(zone) {
            return false;
        }

        self.zone_task.cancel();
        self.zone_target = None;
        true
    }

    /// Один frame обоих поллеров
    pub fn step(&mut self, input: FrameInput) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        if self.suspended {
            return outcome;
        }

        // In-zone поллер (CarriedNearZone)
        if self.zone_task.is_running() {
            match self.zone_target {
                Some(zone) if input.carried => {
                    outcome.prompt_assemble = true;
                    if input.primary {
                        self.zone_task.cancel();
                        outcome.prompt_assemble = false;
                        outcome.action = Some(PartAction::Assemble { zone });
                    }
                }
                _ => {
                    // Отпустили часть (или потеряли зону) → Idle
                    self.zone_task.cancel();
                    self.zone_target = None;
                }
            }
        }

        // Installed поллер
        if self.installed_task.is_running() {
            if !self.installed {
                self.installed_task.cancel();
                self.looking = false;
            } else if input.looked_at {
                self.looking = true;
                outcome.prompt_disassemble = true;
                if input.secondary {
                    outcome.action = Some(PartAction::Disassemble);
                }
            } else if self.looking {
                self.looking = false;
            }
        }

        outcome
    }

    /// Пометить часть установленной в `zone`
    ///
    /// Возвращает индекс attach point. При ошибке часть не меняется.
    pub(crate) fn begin_assemble(&mut self, zone: Entity) -> Result<usize, PartError> {
        let index = self.zone_index(zone).ok_or(PartError::ZoneNotOwned { zone })?;
        if let (true, Some(installed_index)) = (self.installed, self.installed_point_index) {
            return Err(PartError::AlreadyInstalled { index: installed_index });
        }

        self.installed = true;
        self.installed_point_index = Some(index);
        self.zone_task.cancel();
        self.zone_target = None;
        self.looking = false;

        if !self.suspended {
            self.installed_task.start();
        }

        Ok(index)
    }

    /// Пометить часть снятой; возвращает индекс освобождённой attach point
    pub(crate) fn begin_disassemble(&mut self) -> Result<usize, PartError> {
        if !self.installed {
            return Err(PartError::NotInstalled);
        }
        let index = self.installed_point_index.take().ok_or(PartError::NotInstalled)?;

        self.installed = false;
        self.looking = false;
        self.installed_task.cancel();
        self.zone_task.cancel();
        self.zone_target = None;

        Ok(index)
    }

    pub(crate) fn set_bond(&mut self, bond: Option<Bond>) {
        if let Some(Bond::BodyRemoved { mass }) = bond {
            self.cached_mass = mass;
        }
        self.bond = bond;
    }

    pub(crate) fn take_bond(&mut self) -> Option<Bond> {
        self.bond.take()
    }

    /// Часть выключена: все поллеры стоп
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.zone_task.cancel();
        self.zone_target = None;
        self.installed_task.cancel();
        self.looking = false;
    }

    /// Часть снова включена: installed поллер перезапускается если установлена
    pub fn resume(&mut self) {
        self.suspended = false;
        if self.installed {
            self.installed_task.start();
        }
    }
}
