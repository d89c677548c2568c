//! Fixture universe shared by condition unit tests
//!
//! Sol(1) - Alpha(2) - Kronos(3) are joined by starlanes; Isolated(4) is not.
//! Empire 1 is at war with empire 2 and at peace with empire 3.

use std::cell::RefCell;

use super::{Condition, ObjectSet, ScriptingContext};
use crate::core::config::{seeded_rng, EvalRng};
use crate::core::types::{DesignId, EmpireId, ObjectId};
use crate::universe::*;

pub fn fixture() -> Universe {
    let mut u = Universe::new(10);

    let mut terrans = Empire::new(EmpireId(1), "Terrans");
    terrans.capital_id = ObjectId(11);
    terrans.techs.insert("SHP_WEAPON_1_1".into());
    terrans.explored_systems.extend([ObjectId(1), ObjectId(2)]);
    terrans.fleet_supplyable_systems.extend([ObjectId(1), ObjectId(2)]);
    terrans.resource_supply_groups = vec![[ObjectId(1), ObjectId(2)].into_iter().collect()];
    terrans.production_queue = vec![
        ProductionItem::building("BLD_MILITARY_COMMAND", ObjectId(11)),
        ProductionItem::ship(DesignId(100), ObjectId(11), 2),
        ProductionItem::ship(DesignId(101), ObjectId(11), 1),
    ];
    terrans.stockpiles.insert(ResourceType::Industry, 40.0);
    terrans
        .meters
        .insert("MILITARY_STRENGTH".into(), Meter { initial: 8.0, current: 12.0 });
    terrans.available_building_types.insert("BLD_MILITARY_COMMAND".into());
    terrans.available_designs.insert(DesignId(100));
    let mut klingons = Empire::new(EmpireId(2), "Klingons");
    klingons.capital_id = ObjectId(21);
    klingons.resource_supply_groups = vec![[ObjectId(3)].into_iter().collect()];
    klingons.meters.insert("MILITARY_STRENGTH".into(), Meter::new(3.0));
    klingons.available_designs.insert(DesignId(101));
    u.empires.insert(terrans);
    u.empires.insert(klingons);
    u.empires.insert(Empire::new(EmpireId(3), "Vulcans"));
    u.empires.set_status(EmpireId(1), EmpireId(3), DiplomaticStatus::Peace);

    let mut human = Species::new("SP_HUMAN");
    human.homeworlds.insert(ObjectId(11));
    human.environments.insert(PlanetType::Terran, PlanetEnvironment::Good);
    human.environments.insert(PlanetType::Ocean, PlanetEnvironment::Adequate);
    let mut klingon = Species::new("SP_KLINGON");
    klingon.homeworlds.insert(ObjectId(21));
    klingon.environments.insert(PlanetType::Inferno, PlanetEnvironment::Good);
    klingon.can_colonize = false;
    u.species.insert(human);
    u.species.insert(klingon);

    u.designs.insert_part(PartType::new("SR_WEAPON_1_1", ShipPartClass::ShortRange, 18.0));
    u.designs.insert_part(PartType::new("AR_STD_PLATE", ShipPartClass::Armour, 24.0));
    u.designs.insert_part(PartType::new("DT_DETECTOR_1", ShipPartClass::Detector, 25.0));
    u.designs.insert_design(ShipDesign::new(
        DesignId(100),
        "Warship",
        "SH_BASIC_MEDIUM",
        &["SR_WEAPON_1_1", "SR_WEAPON_1_1", "AR_STD_PLATE"],
    ));
    u.designs.insert_design(ShipDesign::new(
        DesignId(101),
        "Scout",
        "SH_BASIC_SMALL",
        &["DT_DETECTOR_1", ""],
    ));
    let mut kraken = ShipDesign::new(DesignId(102), "SM_KRAKEN_1", "SH_KRAKEN_BODY", &[]);
    kraken.monster = true;
    kraken.premade = true;
    u.designs.insert_design(kraken);

    let system = |id: i32, name: &str, star: StarType, x: f64, y: f64| {
        UniverseObject::new(ObjectId(id), name, ObjectKind::System(SystemData::new(star))).at(x, y)
    };
    for obj in [
        system(1, "Sol", StarType::Yellow, 0.0, 0.0),
        system(2, "Alpha", StarType::Red, 10.0, 0.0),
        system(3, "Kronos", StarType::Blue, 20.0, 0.0),
        system(4, "Isolated", StarType::White, 100.0, 100.0),
    ] {
        u.insert(obj).unwrap();
    }
    u.add_starlane(ObjectId(1), ObjectId(2)).unwrap();
    u.add_starlane(ObjectId(2), ObjectId(3)).unwrap();

    let planet = |id: i32, name: &str, data: PlanetData, system: i32, x: f64| {
        UniverseObject::new(ObjectId(id), name, ObjectKind::Planet(data))
            .in_system(ObjectId(system))
            .at(x, 0.0)
    };
    u.insert(
        planet(
            11,
            "Earth",
            PlanetData::new(PlanetType::Terran, PlanetSize::Medium)
                .with_species("SP_HUMAN")
                .with_focus("FOCUS_INDUSTRY"),
            1,
            0.0,
        )
        .owned_by(EmpireId(1))
        .with_meter(MeterType::Industry, Meter { initial: 20.0, current: 25.0 })
        .with_special("MINERALS_SPECIAL", 3)
        .visible_to(EmpireId(1), Visibility::Full)
        .visible_to(EmpireId(2), Visibility::Basic),
    )
    .unwrap();
    u.insert(
        planet(12, "Mars", PlanetData::new(PlanetType::Desert, PlanetSize::Small), 1, 0.0)
            .with_meter(MeterType::Industry, Meter::new(5.0))
            .with_tag("DUSTY")
            .created_on(4),
    )
    .unwrap();
    u.insert(
        planet(
            21,
            "Qo'noS",
            PlanetData::new(PlanetType::Inferno, PlanetSize::Large)
                .with_species("SP_KLINGON")
                .with_focus("FOCUS_RESEARCH"),
            3,
            20.0,
        )
        .owned_by(EmpireId(2))
        .with_meter(MeterType::Industry, Meter::new(15.0)),
    )
    .unwrap();
    u.insert(
        planet(
            31,
            "Vulcan",
            PlanetData::new(PlanetType::Ocean, PlanetSize::Medium).with_species("SP_VULCAN"),
            2,
            10.0,
        )
        .owned_by(EmpireId(3))
        .with_meter(MeterType::Industry, Meter::new(20.0)),
    )
    .unwrap();

    let mut shipyard = BuildingData::new("BLD_SHIPYARD_BASE", ObjectId(11));
    shipyard.produced_by = Some(EmpireId(1));
    u.insert(
        UniverseObject::new(ObjectId(13), "Shipyard", ObjectKind::Building(shipyard))
            .in_system(ObjectId(1))
            .owned_by(EmpireId(1))
            .created_on(6),
    )
    .unwrap();

    u.insert(
        UniverseObject::new(ObjectId(40), "Home Fleet", ObjectKind::Fleet(FleetData::default()))
            .in_system(ObjectId(1))
            .owned_by(EmpireId(1)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(50),
            "Monster Fleet",
            ObjectKind::Fleet(FleetData {
                prev_system: ObjectId(2),
                next_system: ObjectId(3),
                ..Default::default()
            }),
        )
        .at(15.0, 0.0),
    )
    .unwrap();

    let mut warship = ShipData::new(ObjectId(40), DesignId(100));
    warship.species = Some("SP_HUMAN".into());
    warship.produced_by = Some(EmpireId(1));
    warship.ordered_bombarded = ObjectId(12);
    warship
        .part_meters
        .insert(("SR_WEAPON_1_1".into(), MeterType::Capacity), Meter::new(18.0));
    u.insert(
        UniverseObject::new(ObjectId(41), "Warship", ObjectKind::Ship(warship))
            .in_system(ObjectId(1))
            .owned_by(EmpireId(1)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(42),
            "Scout",
            ObjectKind::Ship(ShipData::new(ObjectId(40), DesignId(101))),
        )
        .in_system(ObjectId(1))
        .owned_by(EmpireId(1)),
    )
    .unwrap();
    u.insert(
        UniverseObject::new(
            ObjectId(51),
            "Kraken",
            ObjectKind::Ship(ShipData::new(ObjectId(50), DesignId(102))),
        )
        .at(15.0, 0.0),
    )
    .unwrap();

    u.insert(UniverseObject::new(ObjectId(60), "Ion Storm", ObjectKind::Field).at(5.0, 5.0))
        .unwrap();

    u
}

pub fn rng() -> RefCell<EvalRng> {
    RefCell::new(seeded_rng())
}

pub fn ids(set: &ObjectSet<'_>) -> Vec<i32> {
    let mut ids: Vec<i32> = set.iter().map(|o| o.id.0).collect();
    ids.sort();
    ids
}

/// Sorted ids of everything the condition matches over the whole universe
pub fn matching_ids(condition: &dyn Condition, ctx: &ScriptingContext<'_>) -> Vec<i32> {
    let mut non_matches: ObjectSet = ctx.universe.objects().iter().collect();
    let mut matches = Vec::new();
    condition.eval(ctx, &mut matches, &mut non_matches, super::SearchDomain::NonMatches);
    ids(&matches)
}

pub fn object(universe: &Universe, id: i32) -> &UniverseObject {
    universe.object(ObjectId(id)).unwrap()
}
