//! Fastener inspection: данные для внешнего alignment/debug инструмента
//!
//! Flow:
//! 1. `InspectFastener { Some(e) }` → staged поля загружаются из крепежа (один раз)
//! 2. Инструмент правит `staged_*` поля ресурса
//! 3. `ApplyFastenerAlignment` → staged поза пишется в крепёж, болт и гайка репозиционируются
//! 4. `InspectFastener { None }` → инспекция закрыта

use bevy::prelude::*;

use crate::fasteners::components::Fastener;
use crate::fasteners::events::{ApplyFastenerAlignment, InspectFastener};
use crate::{log, log_error};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct FastenerInspection {
    target: Option<Entity>,
    loaded: bool,
    pub staged_position: Vec3,
    pub staged_euler: Vec3,
    pub staged_nut_offset: f32,
}

impl FastenerInspection {
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn select(&mut self, target: Option<Entity>) {
        if self.target != target {
            self.target = target;
            self.loaded = false;
        }
    }

    /// Снять staged значения с крепежа
    fn load_from(&mut self, fastener: &Fastener) {
        self.staged_position = fastener.start_position;
        self.staged_euler = fastener.start_euler;
        self.staged_nut_offset = fastener.settings.nut.map(|nut| nut.offset).unwrap_or_default();
        self.loaded = true;
    }

    /// Записать staged значения в крепёж
    pub fn apply_to(&self, fastener: &mut Fastener) {
        fastener.start_position = self.staged_position;
        fastener.start_euler = self.staged_euler;
        if let Some(nut) = fastener.settings.nut.as_mut() {
            nut.offset = self.staged_nut_offset;
        }
    }
}

/// Система: выбор цели + загрузка staged полей
pub fn sync_fastener_inspection(
    mut selections: EventReader<InspectFastener>,
    mut inspection: ResMut<FastenerInspection>,
    fasteners: Query<&Fastener>,
) {
    for selection in selections.read() {
        inspection.select(selection.fastener);
    }

    let Some(target) = inspection.target() else {
        return;
    };
    if inspection.is_loaded() {
        return;
    }

    match fasteners.get(target) {
        Ok(fastener) => {
            inspection.load_from(fastener);
            log(&format!("Fastener {:?} selected for inspection", target));
        }
        Err(_) => {
            log_error(&format!("Fastener inspection: {:?} is not a fastener", target));
            inspection.select(None);
        }
    }
}

/// Система: apply staged позы (болт + гайка)
pub fn apply_fastener_alignment(
    mut applies: EventReader<ApplyFastenerAlignment>,
    inspection: Res<FastenerInspection>,
    mut fasteners: Query<&mut Fastener>,
    mut transforms: Query<&mut Transform>,
) {
    if applies.read().count() == 0 {
        return;
    }
    let Some(target) = inspection.target() else {
        return;
    };
    let Ok(mut fastener) = fasteners.get_mut(target) else {
        return;
    };

    inspection.apply_to(&mut fastener);

    if let Ok(mut transform) = transforms.get_mut(target) {
        *transform = fastener.start_transform();
    }

    let nut_entity = fastener.settings.nut.and_then(|nut| nut.entity);
    if let (Some(nut_entity), Some(nut_pose)) = (nut_entity, fastener.nut_transform()) {
        if let Ok(mut transform) = transforms.get_mut(nut_entity) {
            *transform = nut_pose;
        }
    }

    log(&format!("Fastener {:?} realigned", target));
}
