//! Assembly strategies: как часть физически крепится к attach point
//!
//! Три варианта, выбираются один раз в PartSettings:
//! - `DeleteBody`: удалить RigidBody (кешируем AdditionalMassProperties), при снятии вернуть как было
//! - `Kinematic`: переключить тело в kinematic, при снятии обратно в dynamic
//! - `Joint`: fixed joint к целевому телу с break force, поломка joint → forced disassemble
//!
//! Выбор действия делает чистая функция `plan_bond`, к ECS его применяют `apply_bond`/`apply_unbond`.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{AdditionalMassProperties, FixedJointBuilder, ImpulseJoint, RigidBody};

/// Стратегия сборки (fixed set)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum AssemblyStrategy {
    DeleteBody,
    Kinematic,
    Joint(JointSettings),
}

impl Default for AssemblyStrategy {
    fn default() -> Self {
        Self::DeleteBody
    }
}

impl AssemblyStrategy {
    /// Joint с конечной break force
    pub fn joint(break_force: f32, targets: Vec<Entity>) -> Self {
        Self::Joint(JointSettings { break_force, targets })
    }

    /// Неломаемый joint (break force = ∞)
    pub fn unbreakable_joint(targets: Vec<Entity>) -> Self {
        Self::joint(f32::INFINITY, targets)
    }

    pub fn is_joint(&self) -> bool {
        matches!(self, Self::Joint(_))
    }
}

/// Параметры `AssemblyStrategy::Joint`
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct JointSettings {
    /// Сила разрыва (f32::INFINITY = неломаемый)
    pub break_force: f32,
    /// Явные целевые тела по индексу attach point
    pub targets: Vec<Entity>,
}

impl Default for JointSettings {
    fn default() -> Self {
        Self {
            break_force: f32::INFINITY,
            targets: Vec::new(),
        }
    }
}

impl JointSettings {
    /// Break torque = половина break force
    pub fn break_torque(&self) -> f32 {
        self.break_force / 2.0
    }

    pub fn limits(&self) -> JointLimits {
        JointLimits {
            break_force: self.break_force,
            break_torque: self.break_torque(),
        }
    }
}

/// Пределы разрыва joint (живёт на части пока она прикреплена joint'ом)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct JointLimits {
    pub break_force: f32,
    pub break_torque: f32,
}

impl JointLimits {
    pub fn is_breakable(&self) -> bool {
        self.break_force.is_finite() || self.break_torque.is_finite()
    }

    /// true если нагрузка превышает хотя бы один предел
    pub fn exceeded_by(&self, force: f32, torque: f32) -> bool {
        force > self.break_force || torque > self.break_torque
    }
}

/// К чему крепится joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointTarget {
    Body(Entity),
    /// Тела не нашлось: часть замораживается в мире (kinematic), пределы разрыва сохраняются
    World,
}

/// Что было сделано при assemble (нужно чтобы корректно откатить при disassemble)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bond {
    /// None: у тела не было AdditionalMassProperties (масса из collider'ов)
    BodyRemoved { mass: Option<AdditionalMassProperties> },
    Kinematic,
    Joint {
        target: JointTarget,
        anchor: Vec3,
        limits: JointLimits,
    },
}

/// Динамика части на момент assemble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub has_body: bool,
    pub mass: Option<AdditionalMassProperties>,
}

/// Выбор тела для joint
///
/// Явная цель берётся только если список покрывает индекс attach point,
/// иначе ближайшее тело-предок зоны, иначе мир.
pub fn select_joint_target(
    settings: &JointSettings,
    zone_index: usize,
    zone_parent_body: Option<Entity>,
) -> JointTarget {
    match settings.targets.get(zone_index) {
        Some(&target) => JointTarget::Body(target),
        None => zone_parent_body.map_or(JointTarget::World, JointTarget::Body),
    }
}

/// Спланировать bonding для стратегии
///
/// Без тела у части крепить нечего → None (часть просто висит на зоне через иерархию).
pub fn plan_bond(
    strategy: &AssemblyStrategy,
    zone_index: usize,
    body: BodySnapshot,
    zone_parent_body: Option<Entity>,
    anchor: Vec3,
) -> Option<Bond> {
    if !body.has_body {
        return None;
    }

    let bond = match strategy {
        AssemblyStrategy::DeleteBody => Bond::BodyRemoved { mass: body.mass },
        AssemblyStrategy::Kinematic => Bond::Kinematic,
        AssemblyStrategy::Joint(settings) => Bond::Joint {
            target: select_joint_target(settings, zone_index, zone_parent_body),
            anchor,
            limits: settings.limits(),
        },
    };

    Some(bond)
}

/// Применить bonding к entity части
pub fn apply_bond(part: &mut EntityCommands, bond: &Bond) {
    match *bond {
        Bond::BodyRemoved { .. } => {
            part.remove::<(RigidBody, AdditionalMassProperties)>();
        }
        Bond::Kinematic => {
            part.insert(RigidBody::KinematicPositionBased);
        }
        Bond::Joint { target: JointTarget::Body(target), anchor, limits } => {
            let joint = FixedJointBuilder::new().local_anchor1(anchor);
            part.insert((ImpulseJoint::new(target, joint), limits));
        }
        Bond::Joint { target: JointTarget::World, limits, .. } => {
            part.insert((RigidBody::KinematicPositionBased, limits));
        }
    }
}

/// Откатить bonding (обратное действие к `apply_bond`)
pub fn apply_unbond(part: &mut EntityCommands, bond: &Bond) {
    match *bond {
        Bond::BodyRemoved { mass: Some(mass) } => {
            part.insert((RigidBody::Dynamic, mass));
        }
        Bond::BodyRemoved { mass: None } => {
            part.insert(RigidBody::Dynamic);
            part.remove::<AdditionalMassProperties>();
        }
        Bond::Kinematic => {
            part.insert(RigidBody::Dynamic);
        }
        Bond::Joint { target: JointTarget::Body(_), .. } => {
            part.remove::<(ImpulseJoint, JointLimits)>();
        }
        Bond::Joint { target: JointTarget::World, .. } => {
            part.remove::<JointLimits>();
            part.insert(RigidBody::Dynamic);
        }
    }
}
