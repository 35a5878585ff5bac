//! Part systems (per-frame драйвер state machine)
//!
//! # Порядок в frame (chain)
//! 1. `initialize_parts`: подписка на зоны, restore из save info
//! 2. `sync_part_enabled`: PartDisabled → suspend/resume поллеров
//! 3. `route_zone_events`: ZoneEntered/ZoneExited → подписанные части
//! 4. `poll_part_interactions`: шаг поллеров → AssembleRequest/DisassembleRequest
//! 5. `handle_joint_breaks`: JointBroken → forced DisassembleRequest
//! 6. `process_assemble_requests`: transform/зона/strategy bond/notification
//! 7. `process_disassemble_requests`: обратное
//! 8. `apply_zone_activation`: SetZoneActive
//! 9. `clear_interaction_input`: edge-triggered кнопки гаснут в конце frame
//!
//! Exit события роутятся ДО шага поллеров, поэтому выход из зоны в том же frame
//! всегда побеждает confirm.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{AdditionalMassProperties, RigidBody};

use crate::components::{Carried, InteractionInput, InteractionPrompt, LookedAt, Pickable, WorldLayer};
use crate::parts::components::{AttachPoint, Part, PartDisabled, PartError};
use crate::parts::events::*;
use crate::parts::state::{FrameInput, PartAction};
use crate::parts::strategy::{
    apply_bond, apply_unbond, plan_bond, select_joint_target, AssemblyStrategy, Bond, BodySnapshot,
    JointTarget,
};
use crate::{log, log_error, log_info, log_warning};

// ============================================================================
// Init
// ============================================================================

/// Init новых частей (аналог initPart)
///
/// 1. Валидация настроек (Joint без targets → warning, один раз)
/// 2. Подписка на события всех attach points (идемпотентно)
/// 3. Pickable + слой свободной части
/// 4. Installed в save → тихий assemble в сохранённую зону,
///    иначе (если разрешено) ставим сохранённую позу
pub fn initialize_parts(
    mut commands: Commands,
    mut parts: Query<(Entity, &mut Part)>,
    mut zones: Query<&mut AttachPoint>,
    mut assemble_requests: EventWriter<AssembleRequest>,
) {
    for (entity, mut part) in parts.iter_mut() {
        if part.initialized {
            continue;
        }
        part.initialized = true;

        validate_part(entity, &part);

        for &zone in part.zones() {
            match zones.get_mut(zone) {
                Ok(mut point) => {
                    point.subscribe(entity);
                }
                Err(_) => log_error(&format!(
                    "Part {:?}: attach point {:?} has no AttachPoint component",
                    entity, zone
                )),
            }
        }

        let layer = part.settings.layer_for(false);
        commands
            .entity(entity)
            .insert((Pickable, WorldLayer(layer), layer.collision_groups()));

        let save = part.pending_restore.take().unwrap_or_default();

        let restore_zone = match (save.installed, save.installed_point_index) {
            (true, Some(index)) => match part.zone_at(index) {
                Ok(zone) => Some(zone),
                Err(err) => {
                    log_warning(&format!("Part {:?}: saved install ignored ({})", entity, err));
                    None
                }
            },
            (true, None) => {
                log_warning(&format!("Part {:?}: saved as installed without attach point index", entity));
                None
            }
            _ => None,
        };

        match restore_zone {
            Some(zone) => {
                assemble_requests.write(AssembleRequest {
                    part: entity,
                    zone,
                    play_effect: false,
                });
            }
            None if part.settings.set_position_rotation_on_init => {
                commands.entity(entity).insert(save.to_transform());
            }
            None => {}
        }

        log(&format!("Part {:?} initialized ({} attach points)", entity, part.zones().len()));
    }
}

/// Configuration warnings (не фатальные)
fn validate_part(entity: Entity, part: &Part) {
    if let AssemblyStrategy::Joint(settings) = &part.settings.strategy {
        if settings.targets.is_empty() {
            log_warning(&format!(
                "Part {:?}: assembly strategy is Joint but no target bodies assigned, falling back to attach point parent body",
                entity
            ));
        }
    }
}

/// PartDisabled marker → suspend/resume поллеров
pub fn sync_part_enabled(mut parts: Query<(Entity, &mut Part, Has<PartDisabled>)>) {
    for (entity, mut part, disabled) in parts.iter_mut() {
        if disabled && !part.is_suspended() {
            part.suspend();
            log(&format!("Part {:?} disabled, pollers stopped", entity));
        } else if !disabled && part.is_suspended() {
            part.resume();
            log(&format!("Part {:?} enabled", entity));
        }
    }
}

// ============================================================================
// Zone events
// ============================================================================

/// Роутинг zone событий подписанным частям
///
/// Enter доставляется только из включенной (не занятой) зоны.
/// Exit: всегда.
pub fn route_zone_events(
    mut entered: EventReader<ZoneEntered>,
    mut exited: EventReader<ZoneExited>,
    zones: Query<&AttachPoint>,
    mut parts: Query<(&mut Part, Has<Carried>)>,
) {
    for event in entered.read() {
        let Ok(point) = zones.get(event.zone) else {
            continue;
        };
        if !point.enabled {
            continue;
        }

        for &listener in point.listeners() {
            let Ok((mut part, carried)) = parts.get_mut(listener) else {
                continue;
            };
            if part.on_zone_enter(listener, event.zone, event.other, carried) {
                log(&format!("Part {:?} entered attach point {:?}", listener, event.zone));
            }
        }
    }

    for event in exited.read() {
        let Ok(point) = zones.get(event.zone) else {
            continue;
        };

        for &listener in point.listeners() {
            if let Ok((mut part, _)) = parts.get_mut(listener) {
                part.on_zone_exit(event.zone);
            }
        }
    }
}

// ============================================================================
// Pollers
// ============================================================================

/// Шаг in-zone и installed поллеров всех активных частей
pub fn poll_part_interactions(
    mut parts: Query<(Entity, &mut Part, Has<Carried>, Has<LookedAt>), Without<PartDisabled>>,
    input: Res<InteractionInput>,
    mut prompt: ResMut<InteractionPrompt>,
    mut assemble_requests: EventWriter<AssembleRequest>,
    mut disassemble_requests: EventWriter<DisassembleRequest>,
) {
    let mut next_prompt = InteractionPrompt::default();

    for (entity, mut part, carried, looked_at) in parts.iter_mut() {
        let outcome = part.step(FrameInput {
            carried,
            looked_at,
            primary: input.primary,
            secondary: input.secondary,
        });

        next_prompt.assemble |= outcome.prompt_assemble;
        next_prompt.disassemble |= outcome.prompt_disassemble;

        match outcome.action {
            Some(PartAction::Assemble { zone }) => {
                assemble_requests.write(AssembleRequest::new(entity, zone));
            }
            Some(PartAction::Disassemble) => {
                disassemble_requests.write(DisassembleRequest::new(entity));
            }
            None => {}
        }
    }

    if *prompt != next_prompt {
        *prompt = next_prompt;
    }
}

/// Joint порвался → forced disassemble (игрок не участвует)
pub fn handle_joint_breaks(
    mut breaks: EventReader<JointBroken>,
    parts: Query<&Part>,
    mut disassemble_requests: EventWriter<DisassembleRequest>,
) {
    for event in breaks.read() {
        let Ok(part) = parts.get(event.part) else {
            continue;
        };

        let jointed = matches!(part.bond(), Some(Bond::Joint { .. }));
        if !part.installed() || !jointed {
            log(&format!("Part {:?}: joint break ignored (not jointed)", event.part));
            continue;
        }

        log_info(&format!("Part {:?}: joint broke (force {:.1})", event.part, event.force));
        disassemble_requests.write(DisassembleRequest {
            part: event.part,
            play_effect: true,
            cause: DisassembleCause::JointBroken,
        });
    }
}

// ============================================================================
// Assemble
// ============================================================================

/// Ближайшее тело-предок attach point
fn find_parent_body(
    zone: Entity,
    hierarchy: &Query<&ChildOf>,
    bodies: &Query<(), With<RigidBody>>,
) -> Option<Entity> {
    let mut current = zone;
    while let Ok(child_of) = hierarchy.get(current) {
        let parent = child_of.0;
        if bodies.contains(parent) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

/// Установка частей
///
/// Предусловия (иначе no-op + error log): зона своя, зона включена и не занята, часть не установлена.
pub fn process_assemble_requests(
    mut commands: Commands,
    mut requests: EventReader<AssembleRequest>,
    mut parts: Query<&mut Part>,
    mut zones: Query<&mut AttachPoint>,
    part_bodies: Query<(Has<RigidBody>, Option<&AdditionalMassProperties>)>,
    bodies: Query<(), With<RigidBody>>,
    hierarchy: Query<&ChildOf>,
    globals: Query<&GlobalTransform>,
    mut assembled: EventWriter<PartAssembled>,
    mut effects: EventWriter<EffectRequested>,
) {
    for request in requests.read() {
        let Ok(mut part) = parts.get_mut(request.part) else {
            log_error(&format!("AssembleRequest: entity {:?} is not a part", request.part));
            continue;
        };

        if part.zone_index(request.zone).is_none() {
            log_error(&format!(
                "Part {:?}: assemble rejected ({})",
                request.part,
                PartError::ZoneNotOwned { zone: request.zone }
            ));
            continue;
        }

        let Ok(mut point) = zones.get_mut(request.zone) else {
            log_error(&format!("Part {:?}: attach point {:?} missing", request.part, request.zone));
            continue;
        };
        if !point.enabled || point.is_occupied() {
            log_error(&format!(
                "Part {:?}: assemble rejected ({})",
                request.part,
                PartError::ZoneOccupied { zone: request.zone }
            ));
            continue;
        }

        let index = match part.begin_assemble(request.zone) {
            Ok(index) => index,
            Err(err) => {
                log_error(&format!("Part {:?}: assemble rejected ({})", request.part, err));
                continue;
            }
        };
        point.occupy(request.part);

        // Strategy bond
        let body = match part_bodies.get(request.part) {
            Ok((has_body, mass)) => BodySnapshot {
                has_body,
                mass: mass.copied(),
            },
            Err(_) => BodySnapshot {
                has_body: false,
                mass: None,
            },
        };
        let parent_body = find_parent_body(request.zone, &hierarchy, &bodies);
        let anchor = match &part.settings.strategy {
            AssemblyStrategy::Joint(settings) => match select_joint_target(settings, index, parent_body) {
                JointTarget::Body(target) => joint_anchor(&globals, target, request.zone),
                JointTarget::World => Vec3::ZERO,
            },
            _ => Vec3::ZERO,
        };
        let bond = plan_bond(&part.settings.strategy, index, body, parent_body, anchor);

        let layer = part.settings.layer_for(true);
        let mut part_commands = commands.entity(request.part);
        part_commands
            .insert((
                ChildOf(request.zone),
                Transform::IDENTITY,
                WorldLayer(layer),
                layer.collision_groups(),
            ))
            // Установленную часть игрок больше не держит
            .remove::<(Pickable, Carried)>();
        if let Some(bond) = &bond {
            apply_bond(&mut part_commands, bond);
        }
        part.set_bond(bond);

        if request.play_effect {
            effects.write(EffectRequested {
                at: request.part,
                name: EFFECT_CAR_BUILDING,
                variation: VARIATION_ASSEMBLE,
            });
        }

        assembled.write(PartAssembled {
            part: request.part,
            zone: request.zone,
            index,
        });

        log_info(&format!(
            "✅ Part {:?} assembled to attach point {} ({:?})",
            request.part, index, request.zone
        ));
    }
}

/// Позиция attach point в локальных координатах целевого тела
fn joint_anchor(globals: &Query<&GlobalTransform>, target: Entity, zone: Entity) -> Vec3 {
    match (globals.get(target), globals.get(zone)) {
        (Ok(target_global), Ok(zone_global)) => target_global
            .affine()
            .inverse()
            .transform_point3(zone_global.translation()),
        _ => Vec3::ZERO,
    }
}

// ============================================================================
// Disassemble
// ============================================================================

/// Снятие частей
///
/// Снятие не установленной части: no-op + error log.
pub fn process_disassemble_requests(
    mut commands: Commands,
    mut requests: EventReader<DisassembleRequest>,
    mut parts: Query<&mut Part>,
    mut zones: Query<&mut AttachPoint>,
    globals: Query<&GlobalTransform>,
    mut disassembled: EventWriter<PartDisassembled>,
    mut effects: EventWriter<EffectRequested>,
) {
    for request in requests.read() {
        let Ok(mut part) = parts.get_mut(request.part) else {
            log_error(&format!("DisassembleRequest: entity {:?} is not a part", request.part));
            continue;
        };

        let index = match part.begin_disassemble() {
            Ok(index) => index,
            // Joint порвался в тот же frame когда игрок снял часть
            Err(err) if request.cause == DisassembleCause::JointBroken => {
                log(&format!("Part {:?}: joint break after disassemble ignored ({})", request.part, err));
                continue;
            }
            Err(err) => {
                log_error(&format!("Part {:?}: disassemble rejected ({})", request.part, err));
                continue;
            }
        };

        let Ok(zone) = part.zone_at(index) else {
            log_error(&format!("Part {:?}: installed index {} has no zone", request.part, index));
            continue;
        };
        if let Ok(mut point) = zones.get_mut(zone) {
            point.release();
        }

        // Часть стояла с нулевым offset → мировая поза = поза зоны
        let world_pose = globals
            .get(zone)
            .map(|global| global.compute_transform())
            .unwrap_or_default();

        let layer = part.settings.layer_for(false);
        let mut part_commands = commands.entity(request.part);
        part_commands.remove::<ChildOf>().insert((
            world_pose,
            Pickable,
            WorldLayer(layer),
            layer.collision_groups(),
        ));
        if let Some(bond) = part.take_bond() {
            apply_unbond(&mut part_commands, &bond);
        }

        if request.play_effect {
            effects.write(EffectRequested {
                at: request.part,
                name: EFFECT_CAR_BUILDING,
                variation: VARIATION_DISASSEMBLE,
            });
        }

        disassembled.write(PartDisassembled {
            part: request.part,
            zone,
            index,
            cause: request.cause,
        });

        log_info(&format!(
            "Part {:?} disassembled from attach point {} ({:?})",
            request.part, index, request.cause
        ));
    }
}

// ============================================================================
// Zone activation
// ============================================================================

/// Включить/выключить attach points части
///
/// Занятая зона остаётся выключенной до disassemble. Возвращает сколько зон затронуто.
pub fn set_zones_active(
    part: &Part,
    selector: ZoneSelector,
    active: bool,
    zones: &mut Query<&mut AttachPoint>,
) -> Result<usize, PartError> {
    let targets: Vec<Entity> = match selector {
        ZoneSelector::All => part.zones().to_vec(),
        ZoneSelector::Index(index) => vec![part.zone_at(index)?],
        ZoneSelector::Attached => vec![part.installed_zone().ok_or(PartError::NotInstalled)?],
    };

    let mut touched = 0;
    for zone in targets {
        let Ok(mut point) = zones.get_mut(zone) else {
            continue;
        };
        if active && point.is_occupied() {
            continue;
        }
        point.enabled = active;
        touched += 1;
    }
    Ok(touched)
}

pub fn apply_zone_activation(
    mut events: EventReader<SetZoneActive>,
    parts: Query<&Part>,
    mut zones: Query<&mut AttachPoint>,
) {
    for event in events.read() {
        let Ok(part) = parts.get(event.part) else {
            continue;
        };
        if let Err(err) = set_zones_active(part, event.selector, event.active, &mut zones) {
            log_error(&format!("Part {:?}: {:?} activation failed ({})", event.part, event.selector, err));
        }
    }
}

/// Edge-triggered кнопки живут один frame
pub fn clear_interaction_input(mut input: ResMut<InteractionInput>) {
    if *input != InteractionInput::default() {
        *input = InteractionInput::default();
    }
}
