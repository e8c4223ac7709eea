//! Whole-season runs through the farm engine.
//!
//! Exercises: planting -> daily care -> device costs -> harvest, with the
//! ledger reconciling against cash, and save/load mid-season.

use growhouse_core::prelude::*;
use growhouse_logic::environment::{EnvironmentReading, Preferences};
use growhouse_logic::equipment::SpendingCategory;
use growhouse_logic::plant::Stage;

// ── Helpers ────────────────────────────────────────────────────────────

fn ideal_farm(seed: u64) -> Farm {
    Farm::new(FarmConfig {
        base_environment: EnvironmentReading::optimal_for(&Preferences::default()),
        player_level: 3,
        seed: Some(seed),
        ..FarmConfig::default()
    })
}

fn tend_all(farm: &mut Farm) {
    let slots: Vec<GridPos> = farm
        .plants
        .values()
        .filter(|p| !p.is_dead)
        .map(|p| p.pos)
        .collect();
    for pos in slots {
        farm.water(pos).unwrap();
        farm.feed(pos).unwrap();
    }
}

fn assert_books_balance(farm: &Farm) {
    let expected = farm.config.starting_cash + farm.ledger.net();
    assert!(
        (farm.cash - expected).abs() < 1e-6,
        "cash {} vs ledger {}",
        farm.cash,
        expected
    );
}

// ── Seasons ────────────────────────────────────────────────────────────

#[test]
fn tended_season_ends_in_harvest() {
    let mut farm = ideal_farm(5);
    for x in 0..3 {
        let pos = GridPos::new(x, 0);
        farm.plant_seed(pos, "basic").unwrap();
        farm.plants.get_mut(&pos).unwrap().disease_resistance = 1.0;
    }

    for _ in 0..40 {
        tend_all(&mut farm);
        farm.tick();
    }

    assert!(farm.plants.values().all(|p| p.stage == Stage::Ready));
    let revenue = farm.harvest_all();
    assert!(revenue > 0.0);
    assert!(farm.plants.is_empty());
    assert_eq!(farm.ledger.total_revenue, revenue);
    assert_books_balance(&farm);
}

#[test]
fn equipment_costs_accrue_daily() {
    let mut farm = ideal_farm(9);
    farm.install_device(DeviceKind::LedLight, GridPos::new(0, 0))
        .unwrap();
    farm.install_device(DeviceKind::VentilationFan, GridPos::new(1, 0))
        .unwrap();
    farm.install_device(DeviceKind::HpsLight, GridPos::new(2, 0))
        .unwrap();

    farm.run_days(10);

    let lighting = farm.ledger.category(SpendingCategory::Lighting);
    assert_eq!(lighting.install, 350.0);
    assert_eq!(lighting.operating, 400.0);
    assert_eq!(farm.ledger.category(SpendingCategory::Air).operating, 20.0);
    // 575 W is 13.8 kWh: 1.20 + 3.8 * 0.144 = 1.7472 -> 1.75 a day
    assert!((farm.ledger.total_electricity - 17.5).abs() < 1e-9);
    assert_eq!(farm.current_day(), 11);
    assert_books_balance(&farm);
}

#[test]
fn mixed_season_books_balance() {
    let mut farm = ideal_farm(21);
    farm.plant_seed(GridPos::new(0, 0), "basic").unwrap();
    farm.plant_seed(GridPos::new(1, 1), "basic").unwrap();
    farm.install_device(DeviceKind::LedLight, GridPos::new(0, 1))
        .unwrap();
    farm.install_device(DeviceKind::Heater, GridPos::new(5, 5))
        .unwrap();

    for day in 0..30 {
        if day % 2 == 0 {
            tend_all(&mut farm);
        }
        if day == 10 {
            farm.maintain(GridPos::new(0, 1)).unwrap();
            farm.upgrade(GridPos::new(0, 1)).unwrap();
        }
        if day == 20 {
            farm.remove_device(GridPos::new(5, 5)).unwrap();
        }
        farm.tick();
        assert_books_balance(&farm);
    }
    farm.harvest_all();
    assert_books_balance(&farm);
}

// ── Persistence mid-season ─────────────────────────────────────────────

#[test]
fn reloaded_farms_continue_identically() {
    let mut farm = ideal_farm(33);
    farm.plant_seed(GridPos::new(2, 2), "basic").unwrap();
    farm.install_device(DeviceKind::LedLight, GridPos::new(2, 3))
        .unwrap();
    for _ in 0..8 {
        tend_all(&mut farm);
        farm.tick();
    }

    let mut buf = Vec::new();
    farm.save(&mut buf).unwrap();
    let mut a = Farm::load(&buf[..]).unwrap();
    let mut b = Farm::load(&buf[..]).unwrap();
    assert_eq!(a.summary(), farm.summary());

    for _ in 0..12 {
        tend_all(&mut a);
        tend_all(&mut b);
        a.tick();
        b.tick();
    }
    assert_eq!(a.plants, b.plants);
    assert_eq!(a.cash, b.cash);
    assert_eq!(a.devices, b.devices);
}
