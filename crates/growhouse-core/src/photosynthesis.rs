//! Photosynthesis report for the whole room.
//!
//! Scores the room climate against a reference plant's preferences, names
//! the factor holding growth back, and lines each spending category up with
//! the efficiency it is meant to improve.

use serde::Serialize;

use growhouse_logic::environment::{factor_efficiency, Factor, Preferences};
use growhouse_logic::equipment::SpendingCategory;

use crate::engine::Farm;

/// Order in which factors are scored; ties for the limiting factor go to
/// the earliest.
pub const EFFICIENCY_ORDER: [Factor; 4] = [
    Factor::LightIntensity,
    Factor::Temperature,
    Factor::Humidity,
    Factor::Co2Level,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorEfficiency {
    pub factor: Factor,
    pub efficiency: f64,
}

/// Money spent in one category next to what it buys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryEffectiveness {
    pub category: SpendingCategory,
    pub install: f64,
    pub operating: f64,
    pub total: f64,
    /// `None` for categories with no measurable growth factor.
    pub related_efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotosynthesisSummary {
    pub plant_count: usize,
    /// Mean of whole-number health gauges, rounded.
    pub avg_health: f64,
    /// Mean stage progress, rounded.
    pub avg_growth: f64,
    pub efficiencies: Vec<FactorEfficiency>,
    pub limiting_factor: Factor,
    pub spending: Vec<CategoryEffectiveness>,
}

impl PhotosynthesisSummary {
    pub fn efficiency(&self, factor: Factor) -> f64 {
        self.efficiencies
            .iter()
            .find(|e| e.factor == factor)
            .map_or(0.0, |e| e.efficiency)
    }

    pub fn category(&self, category: SpendingCategory) -> Option<&CategoryEffectiveness> {
        self.spending.iter().find(|c| c.category == category)
    }
}

/// The growth factor a category's equipment shifts, if any.
fn related_factor(category: SpendingCategory) -> Option<Factor> {
    match category {
        SpendingCategory::Lighting => Some(Factor::LightIntensity),
        SpendingCategory::Climate => Some(Factor::Temperature),
        SpendingCategory::Air => Some(Factor::Humidity),
        SpendingCategory::Co2 => Some(Factor::Co2Level),
        SpendingCategory::Nutrient | SpendingCategory::Automation | SpendingCategory::Security => {
            None
        }
    }
}

pub fn summarize(farm: &Farm) -> PhotosynthesisSummary {
    let room = farm.room_environment();
    let preferences = farm
        .plants
        .values()
        .next()
        .map(|p| p.preferences)
        .unwrap_or_default();

    let snapshots: Vec<_> = farm.plants.values().map(|p| p.snapshot()).collect();
    let plant_count = snapshots.len();
    let mean = |sum: u32| {
        if plant_count == 0 {
            0.0
        } else {
            (f64::from(sum) / plant_count as f64).round()
        }
    };
    let avg_health = mean(snapshots.iter().map(|s| s.health).sum());
    let avg_growth = mean(snapshots.iter().map(|s| s.progress).sum());

    let efficiencies = score(&preferences, |f| room.get(f));
    let mut limiting = efficiencies[0];
    for e in &efficiencies[1..] {
        if e.efficiency < limiting.efficiency {
            limiting = *e;
        }
    }

    let spending = SpendingCategory::ALL
        .iter()
        .map(|&category| {
            let spend = farm.ledger.category(category);
            let related_efficiency = match (category, related_factor(category)) {
                (_, Some(factor)) => efficiencies
                    .iter()
                    .find(|e| e.factor == factor)
                    .map(|e| e.efficiency),
                (SpendingCategory::Nutrient, None) => Some(avg_growth / 100.0),
                _ => None,
            };
            CategoryEffectiveness {
                category,
                install: spend.install.round(),
                operating: spend.operating.round(),
                total: spend.total().round(),
                related_efficiency,
            }
        })
        .collect();

    log::debug!(
        "photosynthesis: {} plants, limiting {:?} at {:.2}",
        plant_count,
        limiting.factor,
        limiting.efficiency
    );

    PhotosynthesisSummary {
        plant_count,
        avg_health,
        avg_growth,
        efficiencies,
        limiting_factor: limiting.factor,
        spending,
    }
}

fn score(preferences: &Preferences, reading: impl Fn(Factor) -> f64) -> Vec<FactorEfficiency> {
    EFFICIENCY_ORDER
        .iter()
        .map(|&factor| FactorEfficiency {
            factor,
            efficiency: factor_efficiency(reading(factor), preferences.get(factor)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use growhouse_logic::config::FarmConfig;
    use growhouse_logic::environment::EnvironmentReading;
    use growhouse_logic::equipment::DeviceKind;
    use growhouse_logic::grid::GridPos;

    fn farm_with(base: EnvironmentReading) -> Farm {
        Farm::new(FarmConfig {
            base_environment: base,
            seed: Some(42),
            ..FarmConfig::default()
        })
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // ── Efficiencies ────────────────────────────────────────────────────

    #[test]
    fn test_default_room_limited_by_co2() {
        let s = farm_with(EnvironmentReading::default()).photosynthesis_summary();
        assert_eq!(s.plant_count, 0);
        assert_eq!(s.avg_health, 0.0);
        let order: Vec<_> = s.efficiencies.iter().map(|e| e.factor).collect();
        assert_eq!(order, EFFICIENCY_ORDER.to_vec());
        assert!(close(s.efficiency(Factor::LightIntensity), 0.76));
        assert!(close(s.efficiency(Factor::Temperature), 0.4 + 0.6 * 4.0 / 7.0));
        assert!(close(s.efficiency(Factor::Humidity), 0.6));
        assert!(close(s.efficiency(Factor::Co2Level), 0.4 + 0.6 * 50.0 / 850.0));
        assert_eq!(s.limiting_factor, Factor::Co2Level);
    }

    #[test]
    fn test_dim_room_limited_by_light() {
        let s = farm_with(EnvironmentReading {
            light_intensity: 10.0,
            ..EnvironmentReading::default()
        })
        .photosynthesis_summary();
        assert_eq!(s.efficiency(Factor::LightIntensity), 0.2);
        assert_eq!(s.limiting_factor, Factor::LightIntensity);
    }

    #[test]
    fn test_tie_goes_to_first_factor() {
        let prefs = Preferences::default();
        let s = farm_with(EnvironmentReading::optimal_for(&prefs)).photosynthesis_summary();
        assert!(s.efficiencies.iter().all(|e| e.efficiency == 1.0));
        assert_eq!(s.limiting_factor, Factor::LightIntensity);
    }

    // ── Spending ────────────────────────────────────────────────────────

    #[test]
    fn test_lighting_spend_lines_up_with_light_efficiency() {
        let mut farm = farm_with(EnvironmentReading::default());
        farm.install_device(DeviceKind::LedLight, GridPos::new(0, 1))
            .unwrap();
        farm.run_days(1);
        let s = farm.photosynthesis_summary();
        let lighting = s.category(SpendingCategory::Lighting).unwrap();
        assert_eq!(lighting.install, 200.0);
        assert_eq!(lighting.operating, 15.0);
        assert_eq!(lighting.total, 215.0);
        assert_eq!(
            lighting.related_efficiency,
            Some(s.efficiency(Factor::LightIntensity))
        );
        // The lamp lifts the room reading, so light is no longer at 0.76
        assert!(!close(s.efficiency(Factor::LightIntensity), 0.76));
        assert_eq!(s.spending.len(), SpendingCategory::ALL.len());
        assert_eq!(
            s.category(SpendingCategory::Security).unwrap().related_efficiency,
            None
        );
        assert_eq!(
            s.category(SpendingCategory::Automation).unwrap().related_efficiency,
            None
        );
    }

    #[test]
    fn test_nutrient_row_tracks_growth() {
        let mut farm = farm_with(EnvironmentReading::optimal_for(&Preferences::default()));
        let empty = farm.photosynthesis_summary();
        assert_eq!(
            empty.category(SpendingCategory::Nutrient).unwrap().related_efficiency,
            Some(0.0)
        );

        let pos = GridPos::new(2, 2);
        farm.plant_seed(pos, "basic").unwrap();
        farm.water(pos).unwrap();
        farm.feed(pos).unwrap();
        farm.tick();
        let s = farm.photosynthesis_summary();
        assert_eq!(s.plant_count, 1);
        assert!(s.avg_growth > 0.0);
        let snap = farm.plant_at(pos).unwrap().snapshot();
        assert_eq!(s.avg_growth, f64::from(snap.progress));
        assert_eq!(s.avg_health, f64::from(snap.health));
        assert_eq!(
            s.category(SpendingCategory::Nutrient).unwrap().related_efficiency,
            Some(s.avg_growth / 100.0)
        );
    }

    #[test]
    fn test_summary_serializes() {
        let s = farm_with(EnvironmentReading::default()).photosynthesis_summary();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["limiting_factor"], "Co2Level");
        assert_eq!(json["spending"].as_array().unwrap().len(), 7);
    }
}
