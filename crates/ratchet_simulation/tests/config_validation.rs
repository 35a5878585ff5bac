//! Config validation test
//!
//! Отдельный бинарник: глобальный logger подменяется на MemoryLogger.

use bevy::prelude::*;
use ratchet_simulation::parts::{attach_point_bundle, part_bundle};
use ratchet_simulation::*;

const NO_TARGETS_WARNING: &str = "no target bodies assigned";

#[test]
fn test_joint_without_targets_warns_once() {
    let logger = MemoryLogger::new();
    set_logger(Box::new(logger.clone()));
    set_log_level(LogLevel::Debug);

    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);

    let zone = app.world_mut().spawn(attach_point_bundle(Transform::default())).id();
    let body = app.world_mut().spawn(Transform::default()).id();
    app.world_mut().spawn(part_bundle(
        PartSettings::with_strategy(AssemblyStrategy::joint(100.0, vec![])),
        vec![zone],
        None,
        1.0,
    ));
    app.world_mut().spawn(part_bundle(
        PartSettings::with_strategy(AssemblyStrategy::joint(100.0, vec![body])),
        vec![zone],
        None,
        1.0,
    ));
    app.world_mut().spawn(part_bundle(
        PartSettings::with_strategy(AssemblyStrategy::DeleteBody),
        vec![zone],
        None,
        1.0,
    ));

    for _ in 0..10 {
        app.update();
    }

    assert_eq!(logger.count_matching(LogLevel::Warning, NO_TARGETS_WARNING), 1);
    assert!(logger.count_matching(LogLevel::Debug, "initialized") >= 3);
}
