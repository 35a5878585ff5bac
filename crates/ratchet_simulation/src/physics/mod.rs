//! Physics bridge module
//!
//! Физику считает хост (Rapier или движок игры). Здесь только мосты:
//! - `JointMonitorPlugin`: JointLoad (пишет хост) vs JointLimits → JointBroken
//! - `RapierZoneBridgePlugin`: rapier CollisionEvent на sensor-зонах → ZoneEntered/ZoneExited

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

use crate::parts::{AttachPoint, JointBroken, JointLimits, Part, PartSystems, ZoneEntered, ZoneExited};

/// Нагрузка на joint части за последний physics step
///
/// Пишется физическим хостом (реакция joint'а), читается `detect_joint_overload`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct JointLoad {
    pub force: f32,
    pub torque: f32,
}

/// Система: JointLoad превысил JointLimits → JointBroken
///
/// Нагрузка сбрасывается после разрыва, чтобы не слать событие каждый frame.
pub fn detect_joint_overload(
    mut joints: Query<(Entity, &JointLimits, &mut JointLoad)>,
    mut breaks: EventWriter<JointBroken>,
) {
    for (entity, limits, mut load) in joints.iter_mut() {
        if !limits.exceeded_by(load.force, load.torque) {
            continue;
        }

        breaks.write(JointBroken {
            part: entity,
            force: load.force,
        });
        *load = JointLoad::default();
    }
}

/// Joint monitor plugin (до систем частей, разрыв обрабатывается в том же frame)
pub struct JointMonitorPlugin;

impl Plugin for JointMonitorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JointBroken>()
            .add_systems(Update, detect_joint_overload.before(PartSystems));
    }
}

/// Найти часть которой принадлежит collider (сам collider или предок)
fn owning_part(
    collider: Entity,
    parts: &Query<(), With<Part>>,
    hierarchy: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = collider;
    loop {
        if parts.contains(current) {
            return Some(current);
        }
        current = hierarchy.get(current).ok()?.0;
    }
}

/// Система: rapier sensor events → zone events
///
/// Одна сторона пары это AttachPoint, другая это collider части (или его потомок).
pub fn bridge_rapier_zone_events(
    mut collisions: EventReader<CollisionEvent>,
    zones: Query<(), With<AttachPoint>>,
    parts: Query<(), With<Part>>,
    hierarchy: Query<&ChildOf>,
    mut entered: EventWriter<ZoneEntered>,
    mut exited: EventWriter<ZoneExited>,
) {
    for collision in collisions.read() {
        let (a, b, started) = match collision {
            CollisionEvent::Started(a, b, _) => (*a, *b, true),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, false),
        };

        let (zone, other) = if zones.contains(a) {
            (a, b)
        } else if zones.contains(b) {
            (b, a)
        } else {
            continue;
        };

        let Some(part) = owning_part(other, &parts, &hierarchy) else {
            continue;
        };

        if started {
            entered.write(ZoneEntered { zone, other: part });
        } else {
            exited.write(ZoneExited { zone, other: part });
        }
    }
}

/// Rapier → zone events bridge
///
/// Подключается хостом вместе с RapierPhysicsPlugin. Зонам нужны
/// `Collider` + `Sensor` + `ActiveEvents::COLLISION_EVENTS`.
pub struct RapierZoneBridgePlugin;

impl Plugin for RapierZoneBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .add_event::<ZoneEntered>()
            .add_event::<ZoneExited>()
            .add_systems(Update, bridge_rapier_zone_events.before(PartSystems));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::JointSettings;

    #[test]
    fn test_joint_load_default_is_zero() {
        let load = JointLoad::default();
        assert_eq!(load.force, 0.0);
        assert_eq!(load.torque, 0.0);
    }

    #[test]
    fn test_overload_detection_logic() {
        let limits = JointSettings { break_force: 100.0, targets: vec![] }.limits();
        let calm = JointLoad { force: 40.0, torque: 10.0 };
        let stressed = JointLoad { force: 120.0, torque: 10.0 };

        assert!(!limits.exceeded_by(calm.force, calm.torque));
        assert!(limits.exceeded_by(stressed.force, stressed.torque));
    }
}
