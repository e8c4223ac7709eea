//! Grow-room equipment: catalog, effect scaling, wear, and upkeep.
//!
//! The catalog is fixed, read-only data looked up by [`DeviceKind`]. A
//! [`Device`] carries only its mutable operating state, so persisting a
//! device means persisting its kind, slot, and wear; the spec is looked up
//! again on load.
//!
//! Effect output scales with durability (linear, 0–100%) and level
//! (+15% per level above 1). An inactive or broken device emits nothing.

use serde::{Deserialize, Serialize};

use crate::effects::{EffectKey, EffectValue, EffectVector, GLOBAL_COVERAGE};
use crate::error::ActionError;
use crate::grid::GridPos;

use EffectKey as K;
use EffectValue::Numeric as N;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;
pub const MAX_DURABILITY: f64 = 100.0;

/// Durability restored by maintenance.
pub const MAINTENANCE_RESTORE: f64 = 20.0;
/// Durability restored by an upgrade.
pub const UPGRADE_RESTORE: f64 = 10.0;
/// Devices rated above this wear at the slow rate.
pub const SLOW_WEAR_RATING: f64 = 80.0;
/// Durability below this shows as poor condition.
pub const POOR_CONDITION: f64 = 30.0;

/// Every installable device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    LedLight,
    HpsLight,
    Heater,
    AirConditioner,
    Humidifier,
    Dehumidifier,
    VentilationFan,
    Co2Generator,
    HydroponicSystem,
    PhController,
    SecurityCamera,
    TimerSystem,
}

/// Spending bucket a device's install and operating costs are booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpendingCategory {
    Lighting,
    Climate,
    Air,
    Co2,
    Nutrient,
    Automation,
    Security,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 7] = [
        SpendingCategory::Lighting,
        SpendingCategory::Climate,
        SpendingCategory::Air,
        SpendingCategory::Co2,
        SpendingCategory::Nutrient,
        SpendingCategory::Automation,
        SpendingCategory::Security,
    ];
}

/// Immutable catalog entry for a device kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSpec {
    pub kind: DeviceKind,
    pub id: &'static str,
    pub name: &'static str,
    pub install_cost: f64,
    pub operating_cost: f64,
    /// Draw in watts while active.
    pub power_watts: f64,
    /// Radius in grid units, or [`GLOBAL_COVERAGE`] for farm-wide devices.
    pub coverage: f64,
    pub effects: &'static [(EffectKey, EffectValue)],
    /// Build-quality rating; above [`SLOW_WEAR_RATING`] wears at half speed.
    pub durability_rating: f64,
    pub maintenance_interval_days: u32,
    pub unlock_level: u32,
    pub category: SpendingCategory,
    pub description: &'static str,
}

impl DeviceSpec {
    pub fn is_global(&self) -> bool {
        self.coverage >= GLOBAL_COVERAGE
    }

    /// Durability lost per active day.
    pub fn wear_per_day(&self) -> f64 {
        if self.durability_rating > SLOW_WEAR_RATING {
            0.5
        } else {
            1.0
        }
    }
}

static CATALOG: [DeviceSpec; 12] = [
    DeviceSpec {
        kind: DeviceKind::LedLight,
        id: "led_light",
        name: "LED Grow Light",
        install_cost: 200.0,
        operating_cost: 15.0,
        power_watts: 100.0,
        coverage: 4.0,
        effects: &[(K::LightIntensity, N(40.0)), (K::Temperature, N(2.0))],
        durability_rating: 90.0,
        maintenance_interval_days: 30,
        unlock_level: 1,
        category: SpendingCategory::Lighting,
        description: "High-efficiency LED lighting system for optimal plant growth",
    },
    DeviceSpec {
        kind: DeviceKind::HpsLight,
        id: "hps_light",
        name: "HPS Grow Light",
        install_cost: 150.0,
        operating_cost: 25.0,
        power_watts: 400.0,
        coverage: 6.0,
        effects: &[(K::LightIntensity, N(50.0)), (K::Temperature, N(8.0))],
        durability_rating: 60.0,
        maintenance_interval_days: 20,
        unlock_level: 3,
        category: SpendingCategory::Lighting,
        description: "Traditional high-pressure sodium lighting with high heat output",
    },
    DeviceSpec {
        kind: DeviceKind::Heater,
        id: "heater",
        name: "Space Heater",
        install_cost: 100.0,
        operating_cost: 8.0,
        power_watts: 500.0,
        coverage: 8.0,
        effects: &[(K::Temperature, N(10.0))],
        durability_rating: 85.0,
        maintenance_interval_days: 45,
        unlock_level: 2,
        category: SpendingCategory::Climate,
        description: "Maintains optimal temperature for plant growth",
    },
    DeviceSpec {
        kind: DeviceKind::AirConditioner,
        id: "air_conditioner",
        name: "Air Conditioner",
        install_cost: 350.0,
        operating_cost: 12.0,
        power_watts: 800.0,
        coverage: 12.0,
        effects: &[(K::Temperature, N(-15.0)), (K::Humidity, N(-10.0))],
        durability_rating: 80.0,
        maintenance_interval_days: 60,
        unlock_level: 4,
        category: SpendingCategory::Climate,
        description: "Cools and dehumidifies growing environment",
    },
    DeviceSpec {
        kind: DeviceKind::Humidifier,
        id: "humidifier",
        name: "Humidifier",
        install_cost: 80.0,
        operating_cost: 3.0,
        power_watts: 50.0,
        coverage: 6.0,
        effects: &[(K::Humidity, N(20.0))],
        durability_rating: 70.0,
        maintenance_interval_days: 15,
        unlock_level: 2,
        category: SpendingCategory::Air,
        description: "Increases humidity levels for optimal growing conditions",
    },
    DeviceSpec {
        kind: DeviceKind::Dehumidifier,
        id: "dehumidifier",
        name: "Dehumidifier",
        install_cost: 120.0,
        operating_cost: 5.0,
        power_watts: 200.0,
        coverage: 8.0,
        effects: &[(K::Humidity, N(-25.0))],
        durability_rating: 75.0,
        maintenance_interval_days: 20,
        unlock_level: 3,
        category: SpendingCategory::Air,
        description: "Reduces humidity to prevent mold and pests",
    },
    DeviceSpec {
        kind: DeviceKind::VentilationFan,
        id: "ventilation_fan",
        name: "Ventilation Fan",
        install_cost: 60.0,
        operating_cost: 2.0,
        power_watts: 75.0,
        coverage: 10.0,
        effects: &[
            (K::Temperature, N(-3.0)),
            (K::Humidity, N(-5.0)),
            (K::AirCirculation, N(30.0)),
        ],
        durability_rating: 90.0,
        maintenance_interval_days: 30,
        unlock_level: 1,
        category: SpendingCategory::Air,
        description: "Improves air circulation and prevents stagnation",
    },
    DeviceSpec {
        kind: DeviceKind::Co2Generator,
        id: "co2_generator",
        name: "CO₂ Generator",
        install_cost: 300.0,
        operating_cost: 20.0,
        power_watts: 150.0,
        coverage: 15.0,
        effects: &[(K::Co2Level, N(600.0)), (K::Temperature, N(3.0))],
        durability_rating: 85.0,
        maintenance_interval_days: 25,
        unlock_level: 4,
        category: SpendingCategory::Co2,
        description: "Increases CO₂ levels to boost photosynthesis",
    },
    DeviceSpec {
        kind: DeviceKind::HydroponicSystem,
        id: "hydroponic_system",
        name: "Hydroponic System",
        install_cost: 500.0,
        operating_cost: 10.0,
        power_watts: 100.0,
        coverage: 6.0,
        effects: &[
            (K::NutrientEfficiency, N(2.0)),
            (K::WaterEfficiency, N(1.5)),
            (K::Growth, N(25.0)),
        ],
        durability_rating: 95.0,
        maintenance_interval_days: 40,
        unlock_level: 5,
        category: SpendingCategory::Nutrient,
        description: "Automated nutrient delivery system for faster growth",
    },
    DeviceSpec {
        kind: DeviceKind::PhController,
        id: "ph_controller",
        name: "pH Controller",
        install_cost: 180.0,
        operating_cost: 3.0,
        power_watts: 25.0,
        coverage: 8.0,
        effects: &[(K::PhStability, N(95.0)), (K::NutrientUptake, N(20.0))],
        durability_rating: 80.0,
        maintenance_interval_days: 35,
        unlock_level: 5,
        category: SpendingCategory::Nutrient,
        description: "Automatically maintains optimal pH levels",
    },
    DeviceSpec {
        kind: DeviceKind::SecurityCamera,
        id: "security_camera",
        name: "Security Camera",
        install_cost: 150.0,
        operating_cost: 1.0,
        power_watts: 20.0,
        coverage: 20.0,
        effects: &[(K::Security, N(80.0)), (K::Monitoring, N(100.0))],
        durability_rating: 95.0,
        maintenance_interval_days: 90,
        unlock_level: 6,
        category: SpendingCategory::Security,
        description: "Monitors your farm and deters theft",
    },
    DeviceSpec {
        kind: DeviceKind::TimerSystem,
        id: "timer_system",
        name: "Automated Timer",
        install_cost: 75.0,
        operating_cost: 0.5,
        power_watts: 5.0,
        coverage: GLOBAL_COVERAGE,
        effects: &[(K::Automation, N(50.0)), (K::Efficiency, N(15.0))],
        durability_rating: 100.0,
        maintenance_interval_days: 180,
        unlock_level: 7,
        category: SpendingCategory::Automation,
        description: "Automates equipment schedules for optimal efficiency",
    },
];

impl DeviceKind {
    pub const ALL: [DeviceKind; 12] = [
        DeviceKind::LedLight,
        DeviceKind::HpsLight,
        DeviceKind::Heater,
        DeviceKind::AirConditioner,
        DeviceKind::Humidifier,
        DeviceKind::Dehumidifier,
        DeviceKind::VentilationFan,
        DeviceKind::Co2Generator,
        DeviceKind::HydroponicSystem,
        DeviceKind::PhController,
        DeviceKind::SecurityCamera,
        DeviceKind::TimerSystem,
    ];

    pub fn spec(self) -> &'static DeviceSpec {
        &CATALOG[self as usize]
    }

    /// Parse a catalog id such as `"led_light"`.
    pub fn from_id(id: &str) -> Option<DeviceKind> {
        CATALOG.iter().find(|s| s.id == id).map(|s| s.kind)
    }
}

/// Catalog entries a player of `player_level` may install, in unlock order.
pub fn shop_inventory(player_level: u32) -> Vec<&'static DeviceSpec> {
    let mut items: Vec<_> = CATALOG
        .iter()
        .filter(|s| player_level >= s.unlock_level)
        .collect();
    items.sort_by_key(|s| s.unlock_level);
    items
}

/// Operating state summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Operational,
    Broken,
    MaintenanceRequired,
    PoorCondition,
    Inactive,
}

/// What a device cost to run for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyUsage {
    pub operating_cost: f64,
    pub power_watts: f64,
}

/// Charge for maintenance or an upgrade. The caller debits `cost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpkeepReceipt {
    pub cost: f64,
    pub level: u8,
    pub durability: f64,
}

/// An installed device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub kind: DeviceKind,
    pub pos: GridPos,
    pub active: bool,
    pub level: u8,
    pub durability: f64,
    pub total_operating_hours: f64,
    pub maintenance_due: bool,
    pub last_maintenance_day: u32,
}

impl Device {
    /// A freshly installed device: active, level 1, full durability.
    pub fn new(kind: DeviceKind, pos: GridPos) -> Self {
        Self {
            kind,
            pos,
            active: true,
            level: MIN_LEVEL,
            durability: MAX_DURABILITY,
            total_operating_hours: 0.0,
            maintenance_due: false,
            last_maintenance_day: 0,
        }
    }

    pub fn spec(&self) -> &'static DeviceSpec {
        self.kind.spec()
    }

    /// Effect multiplier from upgrades.
    pub fn level_factor(&self) -> f64 {
        1.0 + (self.level.clamp(MIN_LEVEL, MAX_LEVEL) - 1) as f64 * 0.15
    }

    /// Current effect output. Empty when inactive or broken.
    ///
    /// Numeric entries are scaled by durability and level; categorical
    /// entries pass through unchanged.
    pub fn effective_output(&self) -> EffectVector {
        if !self.active || self.durability <= 0.0 {
            return Vec::new();
        }
        let scale = (self.durability / MAX_DURABILITY) * self.level_factor();
        self.spec()
            .effects
            .iter()
            .map(|&(key, value)| match value {
                EffectValue::Numeric(v) => (key, EffectValue::Numeric(v * scale)),
                other => (key, other),
            })
            .collect()
    }

    /// Age the device by one day. Inactive devices neither wear nor cost.
    pub fn advance_day(&mut self, day: u32) -> DailyUsage {
        if !self.active {
            return DailyUsage::default();
        }
        let spec = self.spec();

        self.total_operating_hours += 24.0;
        let was_working = self.durability > 0.0;
        self.durability = (self.durability - spec.wear_per_day()).max(0.0);
        if was_working && self.durability <= 0.0 {
            log::warn!("{} at {} has broken down", spec.name, self.pos);
        }

        if day.saturating_sub(self.last_maintenance_day) >= spec.maintenance_interval_days {
            self.maintenance_due = true;
        }

        DailyUsage {
            operating_cost: spec.operating_cost,
            power_watts: spec.power_watts,
        }
    }

    /// 10% of the install price, rounded down.
    pub fn maintenance_cost(&self) -> f64 {
        (self.spec().install_cost * 0.1).floor()
    }

    /// Price of the next upgrade, or `None` at max level.
    /// Scales with the level being left.
    pub fn upgrade_cost(&self) -> Option<f64> {
        (self.level < MAX_LEVEL)
            .then(|| (self.spec().install_cost * self.level as f64 * 0.5).floor())
    }

    /// Service the device on `day`.
    pub fn perform_maintenance(&mut self, day: u32) -> UpkeepReceipt {
        self.durability = (self.durability + MAINTENANCE_RESTORE).min(MAX_DURABILITY);
        self.maintenance_due = false;
        self.last_maintenance_day = day;
        UpkeepReceipt {
            cost: self.maintenance_cost(),
            level: self.level,
            durability: self.durability,
        }
    }

    /// Raise the level by one.
    pub fn upgrade(&mut self) -> Result<UpkeepReceipt, ActionError> {
        let cost = self.upgrade_cost().ok_or(ActionError::MaxLevel)?;
        self.level += 1;
        self.durability = (self.durability + UPGRADE_RESTORE).min(MAX_DURABILITY);
        Ok(UpkeepReceipt {
            cost,
            level: self.level,
            durability: self.durability,
        })
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Flip power and return the new state.
    pub fn toggle_power(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Refund paid out when the device is removed.
    pub fn removal_refund(&self) -> f64 {
        (self.spec().install_cost * 0.3 * (self.durability / MAX_DURABILITY)).floor()
    }

    pub fn status(&self) -> DeviceStatus {
        if self.durability <= 0.0 {
            DeviceStatus::Broken
        } else if self.maintenance_due {
            DeviceStatus::MaintenanceRequired
        } else if self.durability < POOR_CONDITION {
            DeviceStatus::PoorCondition
        } else if !self.active {
            DeviceStatus::Inactive
        } else {
            DeviceStatus::Operational
        }
    }
}
