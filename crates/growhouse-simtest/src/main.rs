//! Growhouse Headless Season Harness
//!
//! Validates plant growth, equipment, and power pricing end to end.
//! Runs entirely in-process: no save files on disk, no rendering.
//!
//! Usage:
//!   cargo run -p growhouse-simtest
//!   cargo run -p growhouse-simtest -- --verbose
//!   cargo run -p growhouse-simtest -- --config farm.json

use growhouse_core::prelude::*;
use growhouse_logic::config::validate_config;
use growhouse_logic::effects::{coverage_weight, EffectKey};
use growhouse_logic::environment::{EnvironmentReading, Preferences};
use growhouse_logic::equipment::{shop_inventory, Device};
use growhouse_logic::plant::{Plant, Stage};
use growhouse_logic::power::{daily_power_cost, PowerTariff};
use growhouse_logic::registry::DeviceRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Length of the full-farm run.
const FULL_FARM_DAYS: u32 = 30;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1));

    println!("=== Growhouse Season Harness ===\n");

    let config = match config_path {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => FarmConfig::default(),
    };

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_configuration(&config, verbose));

    // 2. Optimal growth
    results.extend(validate_growth(verbose));

    // 3. Neglect
    results.extend(validate_neglect(verbose));

    // 4. Device wear
    results.extend(validate_wear(verbose));

    // 5. Coverage weighting
    results.extend(validate_coverage(verbose));

    // 6. Tariff
    results.extend(validate_tariff(&config, verbose));

    // 7 + 8 + 9. Full farm, its photosynthesis report, then save/load
    let (farm_results, farm) = validate_full_farm(&config, verbose);
    results.extend(farm_results);
    results.extend(validate_photosynthesis(&farm, verbose));
    results.extend(validate_save_load(&farm, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(path: &str) -> Result<FarmConfig, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

fn ideal() -> EnvironmentReading {
    EnvironmentReading::optimal_for(&Preferences::default())
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &FarmConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let errors = validate_config(config);
    if verbose {
        println!(
            "  {}x{} farm, cash {:.0}, level {}, {} ticks/day",
            config.width, config.height, config.starting_cash, config.player_level, config.ticks_per_day
        );
    }
    vec![TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "no problems found".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    }]
}

// ── 2. Growth ───────────────────────────────────────────────────────────

fn validate_growth(verbose: bool) -> Vec<TestResult> {
    println!("--- Growth ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut plant = Plant::new(GridPos::ORIGIN, "basic", 0.0, &mut rng);
    plant.disease_resistance = 1.0;

    let mut timeline = Vec::new();
    for day in 1..=40 {
        let before = plant.stage;
        let _ = plant.water();
        let _ = plant.feed();
        plant.advance(&ideal(), day as f64, &mut rng);
        if plant.stage != before {
            timeline.push((day, plant.stage));
        }
        if day == 21 {
            results.push(TestResult {
                name: "growth_mature_by_day_21".into(),
                passed: plant.stage >= Stage::Mature,
                detail: format!("stage {} after 21 days", plant.stage.name()),
            });
        }
    }

    results.push(TestResult {
        name: "growth_reaches_ready".into(),
        passed: plant.stage == Stage::Ready && plant.is_harvestable,
        detail: format!("stage {}, value {:.1}", plant.stage.name(), plant.value),
    });

    let stages_in_order = timeline.windows(2).all(|w| w[0].1 < w[1].1);
    results.push(TestResult {
        name: "growth_stages_in_order".into(),
        passed: stages_in_order && timeline.len() == Stage::ALL.len() - 1,
        detail: format!("{} transitions", timeline.len()),
    });

    if verbose {
        for (day, stage) in &timeline {
            println!("  day {:>2}: {}", day, stage.name());
        }
    }

    results
}

// ── 3. Neglect ──────────────────────────────────────────────────────────

fn validate_neglect(_verbose: bool) -> Vec<TestResult> {
    println!("--- Neglect ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mut plant = Plant::new(GridPos::ORIGIN, "basic", 0.0, &mut rng);

    let mut died_on = None;
    for day in 1..=60 {
        plant.advance(&ideal(), day as f64, &mut rng);
        if plant.is_dead && died_on.is_none() {
            died_on = Some(day);
        }
    }

    results.push(TestResult {
        name: "neglect_kills".into(),
        passed: died_on.is_some(),
        detail: match died_on {
            Some(d) => format!("died on day {}", d),
            None => format!("still alive with health {:.1}", plant.health),
        },
    });

    let stays_dead = plant.is_dead
        && plant.health == 0.0
        && plant.water().is_err()
        && plant.feed().is_err()
        && plant.harvest().is_err();
    results.push(TestResult {
        name: "neglect_stays_dead".into(),
        passed: stays_dead,
        detail: "care and harvest refused after death".into(),
    });

    results
}

// ── 4. Wear ─────────────────────────────────────────────────────────────

fn validate_wear(_verbose: bool) -> Vec<TestResult> {
    println!("--- Device Wear ---");
    let mut results = Vec::new();

    let mut fan = Device::new(DeviceKind::VentilationFan, GridPos::ORIGIN);
    for day in 1..=10 {
        fan.advance_day(day);
    }
    results.push(TestResult {
        name: "wear_rated_device".into(),
        passed: fan.durability == 95.0,
        detail: format!("durability {} after 10 days", fan.durability),
    });

    let mut idle = Device::new(DeviceKind::LedLight, GridPos::ORIGIN);
    idle.set_active(false);
    let usage = idle.advance_day(1);
    results.push(TestResult {
        name: "wear_inactive_free".into(),
        passed: idle.durability == 100.0 && usage.operating_cost == 0.0,
        detail: format!("durability {}, cost {}", idle.durability, usage.operating_cost),
    });

    results
}

// ── 5. Coverage ─────────────────────────────────────────────────────────

fn validate_coverage(_verbose: bool) -> Vec<TestResult> {
    println!("--- Coverage ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "coverage_weight_half".into(),
        passed: coverage_weight(3.0, 6.0) == Some(0.5),
        detail: format!("{:?} at d=3 of 6", coverage_weight(3.0, 6.0)),
    });

    let mut registry = DeviceRegistry::new();
    let installed = registry.install(DeviceKind::Humidifier, GridPos::ORIGIN, 2);
    let mid = registry.effects_near((3.0, 0.0), None).numeric(EffectKey::Humidity);
    let far = registry.effects_near((10.0, 0.0), None).numeric(EffectKey::Humidity);
    results.push(TestResult {
        name: "coverage_registry_weighting".into(),
        passed: installed.is_ok() && (mid - 10.0).abs() < 1e-9 && far == 0.0,
        detail: format!("humidity +{:.2} at d=3, +{:.2} at d=10", mid, far),
    });

    let wide = registry
        .effects_near((3.0, 0.0), Some(5000.0))
        .numeric(EffectKey::Humidity);
    results.push(TestResult {
        name: "coverage_ignores_query_radius".into(),
        passed: wide == mid,
        detail: format!("humidity +{:.2} with radius 5000", wide),
    });

    results
}

// ── 6. Tariff ───────────────────────────────────────────────────────────

fn validate_tariff(config: &FarmConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Tariff ---");
    let mut results = Vec::new();
    let default = PowerTariff::default();

    results.push(TestResult {
        name: "tariff_zero_free".into(),
        passed: daily_power_cost(0.0) == 0.0,
        detail: format!("{}", daily_power_cost(0.0)),
    });
    results.push(TestResult {
        name: "tariff_first_tier".into(),
        passed: default.cost_for_kwh(10.0) == 1.2,
        detail: format!("10 kWh costs {}", default.cost_for_kwh(10.0)),
    });

    let mut last = 0.0;
    let mut monotone = true;
    for w in (0..5000).step_by(50) {
        let cost = config.tariff.daily_cost(w as f64);
        monotone &= cost >= last;
        last = cost;
    }
    results.push(TestResult {
        name: "tariff_non_decreasing".into(),
        passed: monotone,
        detail: format!("up to 5 kW costs {:.2}/day", last),
    });

    if verbose {
        for w in [100.0, 500.0, 1000.0, 2000.0] {
            println!("  {:>5} W -> {:.2}/day", w, config.tariff.daily_cost(w));
        }
    }

    results
}

// ── 7. Full farm ────────────────────────────────────────────────────────

fn validate_full_farm(config: &FarmConfig, verbose: bool) -> (Vec<TestResult>, Farm) {
    println!("--- Full Farm ---");
    let mut results = Vec::new();
    let mut farm = Farm::new(config.clone());
    let start_day = farm.current_day();

    let variety = config
        .unlocked_varieties
        .first()
        .cloned()
        .unwrap_or_else(|| "basic".to_string());
    let planted = (0..config.width.min(4) as i32)
        .filter(|&x| farm.plant_seed(GridPos::new(x, 0), &variety).is_ok())
        .count();
    let installed = shop_inventory(farm.player_level)
        .iter()
        .take(3)
        .enumerate()
        .filter(|(i, spec)| {
            farm.install_device(spec.kind, GridPos::new(*i as i32, 1))
                .is_ok()
        })
        .count();

    results.push(TestResult {
        name: "farm_planted".into(),
        passed: planted > 0,
        detail: format!("{} {} plants, {} devices", planted, variety, installed),
    });

    let mut harvested = 0.0;
    let mut balanced = true;
    for _ in 0..FULL_FARM_DAYS {
        let slots: Vec<GridPos> = farm
            .plants
            .values()
            .filter(|p| !p.is_dead)
            .map(|p| p.pos)
            .collect();
        for pos in slots {
            let _ = farm.water(pos);
            let _ = farm.feed(pos);
        }
        farm.run_days(1);
        harvested += farm.harvest_all();
        balanced &= (farm.cash - (config.starting_cash + farm.ledger.net())).abs() < 1e-6;
        if verbose {
            let s = farm.summary();
            println!(
                "  day {:>2}: cash {:>9.2}, plants {}, profit {:>7.2}",
                s.day, s.cash, s.plants, s.daily_profit
            );
        }
    }

    results.push(TestResult {
        name: "farm_clock".into(),
        passed: farm.current_day() == start_day + FULL_FARM_DAYS,
        detail: format!("day {} -> {}", start_day, farm.current_day()),
    });
    results.push(TestResult {
        name: "farm_cash_conserved".into(),
        passed: balanced,
        detail: format!(
            "cash {:.2}, revenue {:.2}, costs {:.2}, harvested {:.0}",
            farm.cash,
            farm.ledger.total_revenue,
            farm.ledger.total_costs(),
            harvested
        ),
    });

    (results, farm)
}

// ── 8. Photosynthesis ───────────────────────────────────────────────────

fn validate_photosynthesis(farm: &Farm, verbose: bool) -> Vec<TestResult> {
    println!("--- Photosynthesis ---");
    let mut results = Vec::new();
    let report = farm.photosynthesis_summary();

    if verbose {
        for e in &report.efficiencies {
            println!("  {:?}: {:.2}", e.factor, e.efficiency);
        }
    }

    let lowest = report
        .efficiencies
        .iter()
        .map(|e| e.efficiency)
        .fold(f64::INFINITY, f64::min);
    results.push(TestResult {
        name: "photosynthesis_limiting_factor".into(),
        passed: report.efficiency(report.limiting_factor) == lowest,
        detail: format!("{:?} at {:.2}", report.limiting_factor, lowest),
    });

    let booked: f64 = report.spending.iter().map(|c| c.total).sum();
    let spent: f64 = farm.ledger.spending.values().map(|c| c.total()).sum();
    results.push(TestResult {
        name: "photosynthesis_spending_rows".into(),
        passed: report.spending.len() == 7 && (booked - spent).abs() <= 7.0,
        detail: format!("{:.0} booked across categories", booked),
    });

    results
}

// ── 9. Save / load ──────────────────────────────────────────────────────

fn validate_save_load(farm: &Farm, _verbose: bool) -> Vec<TestResult> {
    println!("--- Save/Load ---");
    let mut buf = Vec::new();
    if let Err(e) = farm.save(&mut buf) {
        return vec![TestResult {
            name: "save".into(),
            passed: false,
            detail: e.to_string(),
        }];
    }

    match Farm::load(&buf[..]) {
        Ok(loaded) => vec![TestResult {
            name: "save_load_roundtrip".into(),
            passed: loaded.summary() == farm.summary()
                && loaded.plants == farm.plants
                && loaded.devices == farm.devices,
            detail: format!("{} bytes", buf.len()),
        }],
        Err(e) => vec![TestResult {
            name: "load".into(),
            passed: false,
            detail: e.to_string(),
        }],
    }
}
