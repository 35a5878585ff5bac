//! Ratchet Simulation Core
//!
//! ECS-механика прикрепляемых частей для симулятора механика (Bevy 0.16, headless).
//!
//! Домены:
//! - parts: pick up → carry → install → fasten (state machine + assembly strategies)
//! - fasteners: болты/гайки, затяжка, совместимость с инструментом
//! - physics: мосты к физическому хосту (joint load, rapier sensor events)
//!
//! Рендер, физика, ввод, звук и save-файлы: на стороне хоста (events/markers/resources).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod fasteners;
pub mod logger;
pub mod parts;
pub mod physics;

// Re-export базовых типов для удобства
pub use components::*;
pub use fasteners::{Fastener, FastenerPlugin, FastenerSettings, FastenerSize, ToolContext};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter, MemoryLogger,
};
pub use parts::{
    AssemblyStrategy, AttachPoint, Part, PartDisabled, PartError, PartKey, PartSaveInfo, PartSettings,
    PartState, PartSystems, PartsPlugin,
};
pub use physics::{JointLoad, JointMonitorPlugin, RapierZoneBridgePlugin};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// RapierZoneBridgePlugin не входит: его подключает хост вместе с RapierPhysicsPlugin.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PartsPlugin, FastenerPlugin, JointMonitorPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot состояния всех частей (для сравнения детерминизма)
///
/// Строки отсортированы по Entity index.
pub fn parts_snapshot(world: &mut World) -> Vec<String> {
    let mut query = world.query::<(Entity, &Part, &Transform)>();
    let mut rows: Vec<_> = query
        .iter(world)
        .map(|(entity, part, transform)| {
            (
                entity.index(),
                format!(
                    "{}:{:?}:{:?}:{:?}",
                    entity.index(),
                    part.state(),
                    part.save_info(transform),
                    part.bond()
                ),
            )
        })
        .collect();

    rows.sort_by_key(|(index, _)| *index);
    rows.into_iter().map(|(_, row)| row).collect()
}
