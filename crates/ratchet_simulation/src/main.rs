//! Headless симуляция Ratchet
//!
//! Крутит одну часть с двумя attach points: игрок случайно (seeded) берёт часть,
//! заносит в зону, ставит и снимает её. Печатает переходы.

use bevy::prelude::*;
use rand::Rng;
use ratchet_simulation::parts::{
    attach_point_bundle, part_bundle, PartAssembled, PartDisassembled, ZoneEntered, ZoneExited,
};
use ratchet_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting Ratchet headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let engine_bay = app
        .world_mut()
        .spawn((Transform::default(), GlobalTransform::default(), bevy_rapier3d::prelude::RigidBody::Fixed))
        .id();
    let zones: Vec<Entity> = (0..2)
        .map(|i| {
            let transform = Transform::from_xyz(i as f32, 1.0, 0.0);
            app.world_mut()
                .spawn((attach_point_bundle(transform), ChildOf(engine_bay)))
                .id()
        })
        .collect();
    let part = app
        .world_mut()
        .spawn(part_bundle(
            PartSettings::with_strategy(AssemblyStrategy::joint(500.0, vec![])),
            zones.clone(),
            None,
            3.5,
        ))
        .id();

    let mut assembled = 0;
    let mut disassembled = 0;

    for tick in 0..1000 {
        let (carry, zone_index, primary, look, secondary) = {
            let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
            (
                rng.rng.gen_bool(0.5),
                rng.rng.gen_range(0..zones.len()),
                rng.rng.gen_bool(0.2),
                rng.rng.gen_bool(0.5),
                rng.rng.gen_bool(0.1),
            )
        };

        {
            let world = app.world_mut();
            let installed = world.get::<Part>(part).map(|p| p.installed()).unwrap_or(false);
            let mut entity = world.entity_mut(part);
            if carry && !installed {
                entity.insert(Carried);
            } else {
                entity.remove::<Carried>();
            }
            if look {
                entity.insert(LookedAt);
            } else {
                entity.remove::<LookedAt>();
            }
        }

        if tick % 7 == 0 {
            app.world_mut().send_event(ZoneEntered { zone: zones[zone_index], other: part });
        }
        if tick % 11 == 0 {
            app.world_mut().send_event(ZoneExited { zone: zones[zone_index], other: part });
        }
        app.insert_resource(InteractionInput { primary, secondary });

        app.update();

        let world = app.world();
        assembled += world.resource::<Events<PartAssembled>>().iter_current_update_events().count();
        disassembled += world
            .resource::<Events<PartDisassembled>>()
            .iter_current_update_events()
            .count();

        if tick % 100 == 0 {
            let state = world.get::<Part>(part).map(|p| p.state());
            println!("Tick {}: {:?}", tick, state);
        }
    }

    println!(
        "Simulation complete! assembled {} times, disassembled {} times",
        assembled, disassembled
    );
}
