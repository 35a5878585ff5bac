//! Save info частей: snapshot в SavedParts + JSON
//!
//! Файловый I/O: на стороне хоста. Здесь только плоские записи
//! `{installed, installed_point_index, position, rotation}` по ключу PartKey.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::log_info;
use crate::parts::components::{Part, PartKey, PartSaveInfo};

/// Запрос на snapshot всех частей с PartKey
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SaveRequested;

/// Save записи по ключу (BTreeMap → стабильный порядок в JSON)
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedParts {
    pub parts: BTreeMap<String, PartSaveInfo>,
}

impl SavedParts {
    pub fn get(&self, key: &str) -> Option<&PartSaveInfo> {
        self.parts.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, info: PartSaveInfo) {
        self.parts.insert(key.into(), info);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Система: snapshot частей в SavedParts по SaveRequested
///
/// Для свободной части Transform = мировая поза (родителя нет).
pub fn collect_part_saves(
    mut requests: EventReader<SaveRequested>,
    parts: Query<(&Part, &PartKey, &Transform)>,
    mut saved: ResMut<SavedParts>,
) {
    if requests.read().count() == 0 {
        return;
    }

    for (part, key, transform) in parts.iter() {
        saved.insert(key.0.clone(), part.save_info(transform));
    }

    log_info(&format!("Saved {} parts", saved.len()));
}
