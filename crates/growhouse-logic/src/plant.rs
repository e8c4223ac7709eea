//! Per-plant growth, stress, health, and valuation.
//!
//! A [`Plant`] is advanced once per simulation tick with the ambient
//! [`EnvironmentReading`] at its slot. Each tick runs, in order:
//!
//! 1. **Stress**: per-factor distance from preference (capped at 50 each)
//!    plus neglect stress for overdue watering and feeding.
//! 2. **Depletion**: water and nutrients drain; nutrient drain is divided
//!    by the equipment-supplied nutrient efficiency.
//! 3. **Growth**: stage progress accumulates at a rate driven by
//!    resources, stress, and health.
//! 4. **Health**: recovery or decline, plus a rare disease hit. Health
//!    reaching zero kills the plant for good.
//! 5. **Valuation**: stage and quality multipliers over the base yield.
//! 6. **Stage transition**: a full progress bar moves the plant to the
//!    next stage; reaching `Ready` makes it harvestable.
//!
//! ```
//! use growhouse_logic::environment::{EnvironmentReading, Preferences};
//! use growhouse_logic::grid::GridPos;
//! use growhouse_logic::plant::{Plant, Stage};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut plant = Plant::new(GridPos::new(0, 0), "basic", 0.0, &mut rng);
//! let ideal = EnvironmentReading::optimal_for(&Preferences::default());
//! plant.water().unwrap();
//! plant.feed().unwrap();
//! plant.advance(&ideal, 1.0, &mut rng);
//! assert_eq!(plant.stage, Stage::Seedling);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::effects::EffectDelta;
use crate::environment::{factor_stress, EnvironmentReading, Factor, Preferences};
use crate::error::ActionError;
use crate::grid::GridPos;
use crate::variety;

/// Per-factor stress cap before factors are summed.
pub const FACTOR_STRESS_CAP: f64 = 50.0;

/// Water added by one watering, and what it costs.
pub const WATER_AMOUNT: f64 = 40.0;
pub const WATER_COST: f64 = 5.0;
/// Nutrients added by one feeding, and what it costs.
pub const FEED_AMOUNT: f64 = 50.0;
pub const FEED_COST: f64 = 10.0;

/// Per-tick disease chance for a plant with zero resistance.
pub const DISEASE_BASE_CHANCE: f64 = 0.002;
/// Health lost to a disease event.
pub const DISEASE_DAMAGE: f64 = 15.0;

/// Growth phases, in order. `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Seed,
    Seedling,
    Young,
    Mature,
    Flowering,
    Ready,
}

/// Duration and minimum resource levels for a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRequirement {
    pub duration_days: f64,
    pub min_water: f64,
    pub min_nutrients: f64,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Seed,
        Stage::Seedling,
        Stage::Young,
        Stage::Mature,
        Stage::Flowering,
        Stage::Ready,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Ready
    }

    pub fn requirement(self) -> StageRequirement {
        let (duration_days, min_water, min_nutrients) = match self {
            Stage::Seed => (1.0, 70.0, 20.0),
            Stage::Seedling => (7.0, 60.0, 30.0),
            Stage::Young => (14.0, 50.0, 40.0),
            Stage::Mature => (21.0, 45.0, 60.0),
            Stage::Flowering => (28.0, 40.0, 80.0),
            Stage::Ready => (f64::INFINITY, 0.0, 0.0),
        };
        StageRequirement {
            duration_days,
            min_water,
            min_nutrients,
        }
    }

    /// Fraction of the base yield a plant at this stage is worth.
    pub fn value_multiplier(self) -> f64 {
        match self {
            Stage::Seed => 0.0,
            Stage::Seedling => 0.1,
            Stage::Young => 0.3,
            Stage::Mature => 0.6,
            Stage::Flowering => 0.9,
            Stage::Ready => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Seed => "seed",
            Stage::Seedling => "seedling",
            Stage::Young => "young",
            Stage::Mature => "mature",
            Stage::Flowering => "flowering",
            Stage::Ready => "ready",
        }
    }
}

/// Harvest grade, bucketed by quality multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    Low,
    Average,
    Good,
    High,
    Premium,
}

impl QualityGrade {
    pub fn from_multiplier(q: f64) -> Self {
        if q >= 1.4 {
            Self::Premium
        } else if q >= 1.1 {
            Self::High
        } else if q >= 0.9 {
            Self::Good
        } else if q >= 0.6 {
            Self::Average
        } else {
            Self::Low
        }
    }
}

/// Coarse health bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Danger,
}

/// Local equipment influence routed into a plant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBonus {
    pub temperature: f64,
    pub humidity: f64,
    pub light_intensity: f64,
    pub co2_level: f64,
    /// Divides nutrient drain; above 1.0 slows depletion.
    pub nutrient_efficiency: f64,
}

impl Default for EquipmentBonus {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            humidity: 0.0,
            light_intensity: 0.0,
            co2_level: 0.0,
            nutrient_efficiency: 1.0,
        }
    }
}

impl EquipmentBonus {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Temperature => self.temperature,
            Factor::Humidity => self.humidity,
            Factor::LightIntensity => self.light_intensity,
            Factor::Co2Level => self.co2_level,
        }
    }

    pub fn from_delta(delta: &EffectDelta) -> Self {
        let shift = |f: Factor| delta.numeric(f.effect_key());
        Self {
            temperature: shift(Factor::Temperature),
            humidity: shift(Factor::Humidity),
            light_intensity: shift(Factor::LightIntensity),
            co2_level: shift(Factor::Co2Level),
            nutrient_efficiency: delta.nutrient_efficiency(),
        }
    }
}

/// Cost report for a care action. The caller debits `cost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CareReceipt {
    pub cost: f64,
    pub added: f64,
}

/// Result of a successful harvest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    pub revenue: f64,
    pub grade: QualityGrade,
    pub weight: f64,
}

/// Read-only view of a plant for display and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    pub stage: Stage,
    pub age: f64,
    pub health: u32,
    pub water: u32,
    pub nutrients: u32,
    pub stress: u32,
    pub progress: u32,
    pub value: u32,
    pub quality: QualityGrade,
    pub is_harvestable: bool,
    pub is_dead: bool,
}

/// A single cultivated plant.
///
/// Every field is plain data so a save file can restore any valid state
/// directly; deserializing never re-samples `base_yield` or
/// `disease_resistance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub pos: GridPos,
    pub variety: String,

    pub stage: Stage,
    /// Progress through the current stage, 0–100.
    pub stage_progress: f64,
    /// Days, taken from the simulation clock.
    pub age: f64,

    pub health: f64,
    pub stress: f64,
    /// Yield multiplier.
    pub size: f64,

    pub water: f64,
    pub nutrients: f64,
    pub last_watered: f64,
    pub last_fed: f64,

    pub base_yield: f64,
    pub quality_multiplier: f64,
    pub value: f64,
    pub disease_resistance: f64,

    pub is_dead: bool,
    pub is_harvestable: bool,
    pub harvested: bool,

    pub preferences: Preferences,
    pub equipment: EquipmentBonus,
}

impl Plant {
    /// Plant a seed at `pos` on `planted_day`.
    ///
    /// Base yield and disease resistance are drawn once here and never again.
    pub fn new(pos: GridPos, variety_name: &str, planted_day: f64, rng: &mut impl Rng) -> Self {
        let base_yield = variety::sample_base_yield(variety_name, rng);
        let disease_resistance = rng.gen_range(0.7..=1.0);
        Self {
            pos,
            variety: variety_name.to_string(),
            stage: Stage::Seed,
            stage_progress: 0.0,
            age: planted_day,
            health: 100.0,
            stress: 0.0,
            size: 1.0,
            water: 50.0,
            nutrients: 50.0,
            last_watered: planted_day,
            last_fed: planted_day,
            base_yield,
            quality_multiplier: 1.0,
            value: 0.0,
            disease_resistance,
            is_dead: false,
            is_harvestable: false,
            harvested: false,
            preferences: Preferences::default(),
            equipment: EquipmentBonus::default(),
        }
    }

    /// Route the aggregated device effect at this plant's slot.
    pub fn apply_equipment_effects(&mut self, delta: &EffectDelta) {
        self.equipment = EquipmentBonus::from_delta(delta);
    }

    /// Advance one tick. No-op once the plant is dead.
    pub fn advance(&mut self, reading: &EnvironmentReading, day: f64, rng: &mut impl Rng) {
        if self.is_dead {
            return;
        }
        self.age = self.age.max(day);

        self.stress = self.score_stress(reading);
        self.deplete_resources();
        self.accumulate_growth();
        self.update_health(rng);
        self.update_value();
        if !self.is_dead {
            self.check_stage_transition();
        }
    }

    fn score_stress(&self, reading: &EnvironmentReading) -> f64 {
        let environmental: f64 = Factor::ALL
            .iter()
            .map(|&f| {
                let effective = reading.get(f) + self.equipment.get(f);
                factor_stress(effective, self.preferences.get(f)).min(FACTOR_STRESS_CAP)
            })
            .sum();

        let mut neglect: f64 = 0.0;
        let since_water = self.age - self.last_watered;
        let since_fed = self.age - self.last_fed;
        if since_water > 2.0 {
            neglect += (since_water - 2.0) * 10.0;
        }
        if since_fed > 3.0 {
            neglect += (since_fed - 3.0) * 8.0;
        }

        (environmental + neglect).clamp(0.0, 100.0)
    }

    fn deplete_resources(&mut self) {
        let water_rate = 8.0 + self.stress * 0.1;
        self.water = (self.water - water_rate).clamp(0.0, 100.0);

        let flowering = if self.stage == Stage::Flowering { 5.0 } else { 0.0 };
        let efficiency = if self.equipment.nutrient_efficiency > 0.0 {
            self.equipment.nutrient_efficiency
        } else {
            1.0
        };
        let nutrient_rate = (5.0 + self.size * 2.0 + flowering) / efficiency;
        self.nutrients = (self.nutrients - nutrient_rate).clamp(0.0, 100.0);
    }

    /// Growth-rate multiplier for the current stage, floored at 0.1.
    pub fn growth_multiplier(&self) -> f64 {
        let req = self.stage.requirement();
        let mut rate: f64 = 1.0;

        if self.water > req.min_water {
            rate += 0.5;
        }
        if self.nutrients > req.min_nutrients {
            rate += 0.5;
        }
        if self.stress < 20.0 {
            rate += 0.3;
        }
        if self.health > 80.0 {
            rate += 0.2;
        }

        if self.stress > 50.0 {
            rate -= 0.4;
        }
        if self.health < 50.0 {
            rate -= 0.3;
        }
        if self.water < req.min_water * 0.5 {
            rate -= 0.5;
        }
        if self.nutrients < req.min_nutrients * 0.5 {
            rate -= 0.3;
        }

        rate.max(0.1)
    }

    fn accumulate_growth(&mut self) {
        let daily_target = 100.0 / self.stage.requirement().duration_days;
        self.stage_progress =
            (self.stage_progress + daily_target * self.growth_multiplier()).min(100.0);
    }

    fn update_health(&mut self, rng: &mut impl Rng) {
        let req = self.stage.requirement();
        let mut change: f64 = 0.0;

        if self.stress < 20.0 {
            change += 2.0;
        } else if self.stress > 60.0 {
            change -= 3.0;
        }
        if self.water < req.min_water {
            change -= 4.0;
        }
        if self.nutrients < req.min_nutrients {
            change -= 2.0;
        }
        if rng.gen::<f64>() < DISEASE_BASE_CHANCE * (1.0 - self.disease_resistance) {
            log::debug!("plant at {} caught a disease", self.pos);
            change -= DISEASE_DAMAGE;
        }

        self.health = (self.health + change).clamp(0.0, 100.0);
        if self.health <= 0.0 {
            self.is_dead = true;
            self.is_harvestable = false;
            log::info!(
                "plant at {} died at {} stage (day {:.1})",
                self.pos,
                self.stage.name(),
                self.age
            );
        }
    }

    fn update_value(&mut self) {
        let mut quality = 1.0;
        if self.health > 90.0 {
            quality += 0.3;
        } else if self.health < 50.0 {
            quality -= 0.4;
        }
        if self.stress < 10.0 {
            quality += 0.2;
        } else if self.stress > 70.0 {
            quality -= 0.5;
        }
        self.quality_multiplier = f64::max(quality, 0.2);

        self.value =
            self.base_yield * self.stage.value_multiplier() * self.quality_multiplier * self.size;
    }

    fn check_stage_transition(&mut self) {
        if self.stage_progress < 100.0 {
            return;
        }
        let Some(next) = self.stage.next() else {
            return;
        };
        log::debug!(
            "plant at {}: {} -> {}",
            self.pos,
            self.stage.name(),
            next.name()
        );
        self.stage = next;
        self.stage_progress = 0.0;
        if next.is_terminal() {
            self.is_harvestable = true;
            log::info!("plant at {} is ready for harvest", self.pos);
        }
    }

    /// Top up water. The caller pays [`WATER_COST`] on success.
    pub fn water(&mut self) -> Result<CareReceipt, ActionError> {
        if self.is_dead {
            return Err(ActionError::PlantDead);
        }
        self.water = (self.water + WATER_AMOUNT).min(100.0);
        self.last_watered = self.age;
        Ok(CareReceipt {
            cost: WATER_COST,
            added: WATER_AMOUNT,
        })
    }

    /// Top up nutrients. The caller pays [`FEED_COST`] on success.
    pub fn feed(&mut self) -> Result<CareReceipt, ActionError> {
        if self.is_dead {
            return Err(ActionError::PlantDead);
        }
        self.nutrients = (self.nutrients + FEED_AMOUNT).min(100.0);
        self.last_fed = self.age;
        Ok(CareReceipt {
            cost: FEED_COST,
            added: FEED_AMOUNT,
        })
    }

    /// Harvest a Ready plant once. Removing it from the farm is the caller's job.
    pub fn harvest(&mut self) -> Result<HarvestOutcome, ActionError> {
        if self.harvested {
            return Err(ActionError::AlreadyHarvested);
        }
        if self.is_dead {
            return Err(ActionError::PlantDead);
        }
        if !self.is_harvestable {
            return Err(ActionError::NotHarvestable);
        }
        self.harvested = true;
        Ok(HarvestOutcome {
            revenue: self.value.floor(),
            grade: self.quality_grade(),
            weight: (self.base_yield * self.quality_multiplier).round() / 10.0,
        })
    }

    pub fn quality_grade(&self) -> QualityGrade {
        QualityGrade::from_multiplier(self.quality_multiplier)
    }

    pub fn health_status(&self) -> HealthStatus {
        if self.health > 80.0 {
            HealthStatus::Healthy
        } else if self.health > 50.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Danger
        }
    }

    pub fn snapshot(&self) -> PlantSnapshot {
        let gauge = |v: f64| v.max(0.0).floor() as u32;
        PlantSnapshot {
            stage: self.stage,
            age: self.age,
            health: gauge(self.health),
            water: gauge(self.water),
            nutrients: gauge(self.nutrients),
            stress: gauge(self.stress),
            progress: gauge(self.stage_progress),
            value: gauge(self.value),
            quality: self.quality_grade(),
            is_harvestable: self.is_harvestable,
            is_dead: self.is_dead,
        }
    }
}
