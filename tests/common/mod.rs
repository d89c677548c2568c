//! Shared fixture for integration tests
//!
//! Sol(1) - Alpha(2) - Beta(5) are joined by starlanes; Far(6) is not.
//! Empire 1 is at peace with empire 3 and at war with empire 2.

#![allow(dead_code)]

use std::cell::RefCell;

use stellar_conditions::condition::ObjectSet;
use stellar_conditions::core::{seeded_rng, DesignId, EmpireId, EvalRng, ObjectId};
use stellar_conditions::universe::*;

/// Install a test subscriber; `RUST_LOG` selects what is shown
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rng() -> RefCell<EvalRng> {
    RefCell::new(seeded_rng())
}

pub fn system(id: i32, name: &str, star: StarType, x: f64, y: f64) -> UniverseObject {
    UniverseObject::new(ObjectId(id), name, ObjectKind::System(SystemData::new(star))).at(x, y)
}

pub fn planet(id: i32, name: &str, planet_type: PlanetType, system: i32, x: f64) -> UniverseObject {
    UniverseObject::new(
        ObjectId(id),
        name,
        ObjectKind::Planet(PlanetData::new(planet_type, PlanetSize::Medium)),
    )
    .in_system(ObjectId(system))
    .at(x, 0.0)
}

pub fn galaxy() -> Universe {
    init_tracing();
    let mut u = Universe::new(5);

    u.empires.insert(Empire::new(EmpireId(1), "Terrans"));
    u.empires.insert(Empire::new(EmpireId(2), "Klingons"));
    u.empires.insert(Empire::new(EmpireId(3), "Vulcans"));
    u.empires.set_status(EmpireId(1), EmpireId(3), DiplomaticStatus::Peace);

    u.designs
        .insert_part(PartType::new("SR_WEAPON_1_1", ShipPartClass::ShortRange, 18.0));
    u.designs.insert_design(ShipDesign::new(
        DesignId(100),
        "Warship",
        "SH_BASIC_MEDIUM",
        &["SR_WEAPON_1_1"],
    ));

    for obj in [
        system(1, "Sol", StarType::Yellow, 0.0, 0.0),
        system(2, "Alpha", StarType::Red, 10.0, 0.0),
        system(5, "Beta", StarType::Blue, 20.0, 0.0),
        system(6, "Far", StarType::White, 100.0, 100.0),
    ] {
        u.insert(obj).unwrap();
    }
    u.add_starlane(ObjectId(1), ObjectId(2)).unwrap();
    u.add_starlane(ObjectId(2), ObjectId(5)).unwrap();

    u.insert(planet(3, "Mercury", PlanetType::Barren, 1, 0.0)).unwrap();
    u.insert(
        planet(7, "Earth", PlanetType::Terran, 1, 0.0)
            .owned_by(EmpireId(1))
            .with_meter(MeterType::Industry, Meter { initial: 20.0, current: 25.0 }),
    )
    .unwrap();
    u.insert(
        planet(8, "Kronos", PlanetType::Inferno, 5, 20.0)
            .owned_by(EmpireId(2))
            .with_meter(MeterType::Industry, Meter::new(15.0)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(9),
            "Shipyard",
            ObjectKind::Building(BuildingData::new("BLD_SHIPYARD_BASE", ObjectId(7))),
        )
        .in_system(ObjectId(1))
        .owned_by(EmpireId(1)),
    )
    .unwrap();

    u.insert(
        UniverseObject::new(ObjectId(20), "Home Fleet", ObjectKind::Fleet(FleetData::default()))
            .in_system(ObjectId(1))
            .owned_by(EmpireId(1)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(21),
            "Warship",
            ObjectKind::Ship(ShipData::new(ObjectId(20), DesignId(100))),
        )
        .in_system(ObjectId(1))
        .owned_by(EmpireId(1)),
    )
    .unwrap();

    u.insert(
        UniverseObject::new(
            ObjectId(30),
            "Raiders",
            ObjectKind::Fleet(FleetData {
                prev_system: ObjectId(1),
                next_system: ObjectId(2),
                ..Default::default()
            }),
        )
        .at(5.0, 0.0)
        .owned_by(EmpireId(2)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(31),
            "Bird of Prey",
            ObjectKind::Ship(ShipData::new(ObjectId(30), DesignId(100))),
        )
        .at(5.0, 0.0)
        .owned_by(EmpireId(2)),
    )
    .unwrap();

    u.insert(
        UniverseObject::new(
            ObjectId(40),
            "Envoys",
            ObjectKind::Fleet(FleetData {
                prev_system: ObjectId(2),
                next_system: ObjectId(5),
                ..Default::default()
            }),
        )
        .in_system(ObjectId(2))
        .at(10.0, 0.0)
        .owned_by(EmpireId(3)),
    )
    .unwrap();

    u
}

pub fn ids(set: &ObjectSet<'_>) -> Vec<i32> {
    let mut ids: Vec<i32> = set.iter().map(|o| o.id.0).collect();
    ids.sort();
    ids
}

pub fn all_objects(universe: &Universe) -> ObjectSet<'_> {
    universe.objects().iter().collect()
}
