//! Fastener integration test
//!
//! Hover highlight зависит от инструмента, inspection переносит staged позу в болт и гайку.

use bevy::prelude::*;
use ratchet_simulation::fasteners::*;
use ratchet_simulation::*;

fn create_fastener_app(tool: ToolContext) -> App {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(tool);
    app
}

fn spawn_fastener(app: &mut App, settings: FastenerSettings) -> Entity {
    app.world_mut()
        .spawn((Fastener::new(settings, None), Transform::default()))
        .id()
}

fn hover_started(app: &App) -> usize {
    app.world()
        .resource::<Events<FastenerHoverStarted>>()
        .iter_current_update_events()
        .count()
}

fn hover_ended(app: &App) -> usize {
    app.world()
        .resource::<Events<FastenerHoverEnded>>()
        .iter_current_update_events()
        .count()
}

fn is_highlighted(app: &App, fastener: Entity) -> bool {
    app.world().get::<FastenerHighlighted>(fastener).is_some()
}

#[test]
fn test_hover_with_matching_wrench_highlights() {
    let mut app = create_fastener_app(ToolContext::wrench(FastenerSize::Mm10));
    let bolt = spawn_fastener(&mut app, FastenerSettings::sized(FastenerSize::Mm10));

    app.world_mut().send_event(FastenerPointerEntered { fastener: bolt });
    app.update();

    assert!(is_highlighted(&app, bolt));
    assert_eq!(hover_started(&app), 1);

    app.world_mut().send_event(FastenerPointerExited { fastener: bolt });
    app.update();

    assert!(!is_highlighted(&app, bolt));
    assert_eq!(hover_ended(&app), 1);
}

#[test]
fn test_hover_with_wrong_tool_ignored() {
    for tool in [
        ToolContext::wrench(FastenerSize::Mm13),
        ToolContext::free_hand(),
        ToolContext::default(),
    ] {
        let mut app = create_fastener_app(tool);
        let bolt = spawn_fastener(&mut app, FastenerSettings::sized(FastenerSize::Mm10));

        app.world_mut().send_event(FastenerPointerEntered { fastener: bolt });
        app.update();

        assert!(!is_highlighted(&app, bolt), "tool {:?} не должен подсвечивать", tool);
        assert_eq!(hover_started(&app), 0);
    }
}

#[test]
fn test_exit_always_notifies() {
    let mut app = create_fastener_app(ToolContext::free_hand());
    let bolt = spawn_fastener(&mut app, FastenerSettings::sized(FastenerSize::Mm8));

    app.world_mut().send_event(FastenerPointerExited { fastener: bolt });
    app.update();

    assert_eq!(hover_ended(&app), 1);
}

#[test]
fn test_tool_switch_drops_stale_highlight() {
    let mut app = create_fastener_app(ToolContext::wrench(FastenerSize::Mm10));
    let bolt = spawn_fastener(&mut app, FastenerSettings::sized(FastenerSize::Mm10));

    app.world_mut().send_event(FastenerPointerEntered { fastener: bolt });
    app.update();
    assert!(is_highlighted(&app, bolt));

    app.insert_resource(ToolContext::free_hand());
    app.update();

    assert!(!is_highlighted(&app, bolt));
}

#[test]
fn test_inspection_applies_staged_pose_to_bolt_and_nut() {
    let mut app = create_fastener_app(ToolContext::default());
    let nut = app.world_mut().spawn(Transform::default()).id();

    let mut settings = FastenerSettings::sized(FastenerSize::Mm12).with_nut(FastenerSize::Mm12, 0.02);
    if let Some(nut_settings) = settings.nut.as_mut() {
        nut_settings.entity = Some(nut);
    }
    let bolt = app
        .world_mut()
        .spawn((
            Fastener::new(settings, None).with_start_pose(Vec3::new(0.0, 0.1, 0.0), Vec3::ZERO),
            Transform::default(),
        ))
        .id();

    app.world_mut().send_event(InspectFastener { fastener: Some(bolt) });
    app.update();

    {
        let inspection = app.world().resource::<FastenerInspection>();
        assert_eq!(inspection.target(), Some(bolt));
        assert!(inspection.is_loaded());
        assert_eq!(inspection.staged_position, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(inspection.staged_nut_offset, 0.02);
    }

    {
        let mut inspection = app.world_mut().resource_mut::<FastenerInspection>();
        inspection.staged_position = Vec3::new(0.0, 0.2, 0.0);
        inspection.staged_nut_offset = 0.05;
    }
    app.world_mut().send_event(ApplyFastenerAlignment);
    app.update();

    let world = app.world();
    let bolt_transform = world.get::<Transform>(bolt).expect("bolt transform");
    assert!((bolt_transform.translation - Vec3::new(0.0, 0.2, 0.0)).length() < 1e-6);

    // pos_direction по умолчанию -Z
    let nut_transform = world.get::<Transform>(nut).expect("nut transform");
    assert!((nut_transform.translation - Vec3::new(0.0, 0.2, -0.05)).length() < 1e-6);

    let fastener = world.get::<Fastener>(bolt).expect("fastener");
    assert_eq!(fastener.start_position, Vec3::new(0.0, 0.2, 0.0));
}

#[test]
fn test_inspection_of_non_fastener_resets_target() {
    let mut app = create_fastener_app(ToolContext::default());
    let stranger = app.world_mut().spawn(Transform::default()).id();

    app.world_mut().send_event(InspectFastener { fastener: Some(stranger) });
    app.update();

    assert_eq!(app.world().resource::<FastenerInspection>().target(), None);
}
