//! Spawn helpers для частей и attach points
//!
//! Возвращают bundle, годятся и для `Commands::spawn`, и для `World::spawn`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ActiveEvents, AdditionalMassProperties, Collider, RigidBody, Sensor};

use crate::components::{GameLayer, WorldLayer};
use crate::parts::components::{AttachPoint, Part, PartSaveInfo, PartSettings};

/// Часть с динамическим телом массы `mass`
///
/// Поза из save info применится в `initialize_parts`.
pub fn part_bundle(
    settings: PartSettings,
    zones: Vec<Entity>,
    save: Option<PartSaveInfo>,
    mass: f32,
) -> impl Bundle {
    (
        Part::new(settings, zones, save),
        Transform::default(),
        GlobalTransform::default(),
        RigidBody::Dynamic,
        AdditionalMassProperties::Mass(mass),
    )
}

/// Attach point без collider (события зоны шлёт хост)
pub fn attach_point_bundle(transform: Transform) -> impl Bundle {
    (
        AttachPoint::new(),
        transform,
        GlobalTransform::from(transform),
        WorldLayer(GameLayer::TriggerOnly),
    )
}

/// Attach point с rapier sensor (для RapierZoneBridgePlugin)
pub fn attach_point_sensor_bundle(transform: Transform, half_extents: Vec3) -> impl Bundle {
    (
        attach_point_bundle(transform),
        Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        GameLayer::TriggerOnly.collision_groups(),
    )
}

pub fn spawn_part(
    commands: &mut Commands,
    settings: PartSettings,
    zones: Vec<Entity>,
    save: Option<PartSaveInfo>,
    mass: f32,
) -> Entity {
    commands.spawn(part_bundle(settings, zones, save, mass)).id()
}

pub fn spawn_attach_point(commands: &mut Commands, parent: Option<Entity>, transform: Transform) -> Entity {
    let mut zone = commands.spawn(attach_point_bundle(transform));
    if let Some(parent) = parent {
        zone.insert(ChildOf(parent));
    }
    zone.id()
}
