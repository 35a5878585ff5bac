//! Fastener systems: hover highlight

use bevy::prelude::*;

use crate::fasteners::components::{Fastener, FastenerHighlighted, ToolContext};
use crate::fasteners::events::*;

/// Система: pointer enter/exit → подсветка + hover notifications
///
/// Enter учитывается только с подходящим инструментом.
/// Exit снимает подсветку и уведомляет всегда.
pub fn handle_fastener_hover(
    mut commands: Commands,
    mut entered: EventReader<FastenerPointerEntered>,
    mut exited: EventReader<FastenerPointerExited>,
    fasteners: Query<&Fastener>,
    tool: Res<ToolContext>,
    mut hover_started: EventWriter<FastenerHoverStarted>,
    mut hover_ended: EventWriter<FastenerHoverEnded>,
) {
    for event in entered.read() {
        let Ok(fastener) = fasteners.get(event.fastener) else {
            continue;
        };
        if !fastener.tool_compatible(&tool) {
            continue;
        }

        commands.entity(event.fastener).insert(FastenerHighlighted);
        hover_started.write(FastenerHoverStarted { fastener: event.fastener });
    }

    for event in exited.read() {
        if !fasteners.contains(event.fastener) {
            continue;
        }

        commands.entity(event.fastener).remove::<FastenerHighlighted>();
        hover_ended.write(FastenerHoverEnded { fastener: event.fastener });
    }
}

/// Система: инструмент сменили → подсветка с неподходящих крепежей снимается
pub fn drop_stale_highlights(
    mut commands: Commands,
    tool: Res<ToolContext>,
    highlighted: Query<(Entity, &Fastener), With<FastenerHighlighted>>,
) {
    if !tool.is_changed() {
        return;
    }

    for (entity, fastener) in highlighted.iter() {
        if !fastener.tool_compatible(&tool) {
            commands.entity(entity).remove::<FastenerHighlighted>();
        }
    }
}
