//! Parts module: прикрепляемые части (pick up → carry → install → fasten)
//!
//! ECS ответственность:
//! - Part state machine (Idle / CarriedNearZone / Installed / InstalledInteracting)
//! - AttachPoint зоны (observer list, occupied flag)
//! - Assembly strategies (DeleteBody / Kinematic / Joint)
//! - Save info snapshot
//!
//! Хост ответственность:
//! - Trigger detection (ZoneEntered / ZoneExited или RapierZoneBridgePlugin)
//! - Carried / LookedAt markers, InteractionInput
//! - Звук по EffectRequested

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod persistence;
pub mod spawn;
pub mod state;
pub mod strategy;
pub mod systems;
pub mod task;


// Re-exports
pub use components::*;
pub use events::*;
pub use persistence::{collect_part_saves, SaveRequested, SavedParts};
pub use spawn::*;
pub use state::{FrameInput, PartAction, StepOutcome};
pub use strategy::{AssemblyStrategy, Bond, JointLimits, JointSettings, JointTarget};
pub use systems::*;
pub use task::{PollTask, TaskToken};

use crate::components::{InteractionInput, InteractionPrompt};

/// Все системы частей (внешние системы ставятся `.before(PartSystems)`)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartSystems;

/// Parts Plugin
///
/// Регистрирует системы в Update (frame-stepped, один шаг поллеров на frame).
pub struct PartsPlugin;

impl Plugin for PartsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ZoneEntered>()
            .add_event::<ZoneExited>()
            .add_event::<AssembleRequest>()
            .add_event::<DisassembleRequest>()
            .add_event::<JointBroken>()
            .add_event::<SetZoneActive>()
            .add_event::<PartAssembled>()
            .add_event::<PartDisassembled>()
            .add_event::<EffectRequested>()
            .add_event::<SaveRequested>()
            .init_resource::<InteractionInput>()
            .init_resource::<InteractionPrompt>()
            .init_resource::<SavedParts>();

        app.add_systems(
            Update,
            (
                initialize_parts,
                sync_part_enabled,
                route_zone_events,
                poll_part_interactions,
                handle_joint_breaks,
                process_assemble_requests,
                process_disassemble_requests,
                apply_zone_activation,
                collect_part_saves,
                clear_interaction_input,
            )
                .chain() // Последовательное выполнение (exit до confirm, assemble до disassemble)
                .in_set(PartSystems),
        );
    }
}
