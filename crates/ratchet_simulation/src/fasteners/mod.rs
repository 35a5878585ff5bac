//! Fasteners module: болты/гайки с затяжкой
//!
//! ECS ответственность:
//! - Fastener state (размер, затяжка, гайка)
//! - Tool compatibility: `!free_hand && tool_size == size`
//! - Hover highlight только с подходящим ключом
//! - Staged поза для alignment/debug инструмента
//!
//! Хост ответственность:
//! - Pointer events, материалы подсветки
//! - Математика затяжки (через `Fastener::set_tightness`)

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod inspection;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod fastener_tests;

// Re-exports
pub use components::*;
pub use events::*;
pub use inspection::{apply_fastener_alignment, sync_fastener_inspection, FastenerInspection};
pub use systems::*;

/// Fastener Plugin
pub struct FastenerPlugin;

impl Plugin for FastenerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FastenerPointerEntered>()
            .add_event::<FastenerPointerExited>()
            .add_event::<FastenerHoverStarted>()
            .add_event::<FastenerHoverEnded>()
            .add_event::<InspectFastener>()
            .add_event::<ApplyFastenerAlignment>()
            .init_resource::<ToolContext>()
            .init_resource::<FastenerInspection>()
            .add_systems(
                Update,
                (
                    drop_stale_highlights,
                    handle_fastener_hover,
                    sync_fastener_inspection,
                    apply_fastener_alignment,
                )
                    .chain(),
            );
    }
}
