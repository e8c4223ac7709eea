//! Device effect vectors and their spatial aggregation.
//!
//! Each device emits a small vector of named effects. Most entries are
//! numeric deltas (`+40` light, `-15` temperature); an entry may instead
//! carry a categorical value. When the registry aggregates the effects of
//! every device covering a point, numeric entries are weighted by distance
//! and **summed**, while a categorical entry **overwrites** whatever the key
//! held before. Only the keys in [`EffectKey::AGGREGATED`] take part;
//! everything else a device emits (security, automation, ...) is ignored
//! by aggregation.
//!
//! ```
//! use growhouse_logic::effects::{aggregate, EffectKey, EffectValue};
//!
//! let lamp = [(EffectKey::LightIntensity, EffectValue::Numeric(40.0))];
//! let delta = aggregate([(0.5, &lamp[..]), (1.0, &lamp[..])]);
//! assert_eq!(delta.numeric(EffectKey::LightIntensity), 60.0);
//! ```

use std::collections::BTreeMap;

/// Coverage at or above this value means the device affects the whole farm.
pub const GLOBAL_COVERAGE: f64 = 999.0;

/// Radius-limited devices never fall below this fraction of full strength.
pub const MIN_DISTANCE_WEIGHT: f64 = 0.3;

/// Every effect a device in the catalog can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectKey {
    LightIntensity,
    Temperature,
    Humidity,
    Co2Level,
    NutrientEfficiency,
    WaterEfficiency,
    AirCirculation,
    Growth,
    PhStability,
    NutrientUptake,
    Security,
    Monitoring,
    Automation,
    Efficiency,
}

impl EffectKey {
    /// Keys that aggregation tracks. Anything else is dropped.
    pub const AGGREGATED: [EffectKey; 6] = [
        EffectKey::LightIntensity,
        EffectKey::Temperature,
        EffectKey::Humidity,
        EffectKey::Co2Level,
        EffectKey::NutrientEfficiency,
        EffectKey::WaterEfficiency,
    ];

    pub fn is_aggregated(self) -> bool {
        Self::AGGREGATED.contains(&self)
    }

    /// Value a key holds before any device contributes.
    /// Efficiencies are multipliers and start at 1.0; everything else is a delta.
    pub fn baseline(self) -> f64 {
        match self {
            EffectKey::NutrientEfficiency | EffectKey::WaterEfficiency => 1.0,
            _ => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKey::LightIntensity => "lightIntensity",
            EffectKey::Temperature => "temperature",
            EffectKey::Humidity => "humidity",
            EffectKey::Co2Level => "co2Level",
            EffectKey::NutrientEfficiency => "nutrientEfficiency",
            EffectKey::WaterEfficiency => "waterEfficiency",
            EffectKey::AirCirculation => "airCirculation",
            EffectKey::Growth => "growth",
            EffectKey::PhStability => "phStability",
            EffectKey::NutrientUptake => "nutrientUptake",
            EffectKey::Security => "security",
            EffectKey::Monitoring => "monitoring",
            EffectKey::Automation => "automation",
            EffectKey::Efficiency => "efficiency",
        }
    }
}

/// One entry of an effect vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectValue {
    /// A delta that is scaled by wear/level and summed across devices.
    Numeric(f64),
    /// A setting that is passed through unscaled and overwrites on aggregation.
    Categorical(&'static str),
}

impl EffectValue {
    pub fn as_numeric(self) -> Option<f64> {
        match self {
            EffectValue::Numeric(v) => Some(v),
            EffectValue::Categorical(_) => None,
        }
    }
}

/// A device's effect output.
pub type EffectVector = Vec<(EffectKey, EffectValue)>;

/// Composite effect at a point, one entry per aggregated key.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDelta {
    values: BTreeMap<EffectKey, EffectValue>,
}

impl Default for EffectDelta {
    fn default() -> Self {
        let values = EffectKey::AGGREGATED
            .iter()
            .map(|&k| (k, EffectValue::Numeric(k.baseline())))
            .collect();
        Self { values }
    }
}

impl EffectDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: EffectKey) -> Option<EffectValue> {
        self.values.get(&key).copied()
    }

    /// Numeric value of a key. Categorical entries read as the key's baseline.
    pub fn numeric(&self, key: EffectKey) -> f64 {
        self.get(key)
            .and_then(EffectValue::as_numeric)
            .unwrap_or_else(|| key.baseline())
    }

    pub fn nutrient_efficiency(&self) -> f64 {
        self.numeric(EffectKey::NutrientEfficiency)
    }

    pub fn water_efficiency(&self) -> f64 {
        self.numeric(EffectKey::WaterEfficiency)
    }

    /// Fold one device's output into the delta at the given weight.
    ///
    /// A numeric contribution landing on a categorical entry restarts the
    /// sum from that contribution.
    pub fn accumulate(&mut self, weight: f64, effects: &[(EffectKey, EffectValue)]) {
        for &(key, value) in effects {
            let Some(slot) = self.values.get_mut(&key) else {
                continue;
            };
            *slot = match (value, *slot) {
                (EffectValue::Numeric(v), EffectValue::Numeric(cur)) => {
                    EffectValue::Numeric(cur + v * weight)
                }
                (EffectValue::Numeric(v), EffectValue::Categorical(_)) => {
                    EffectValue::Numeric(v * weight)
                }
                (categorical, _) => categorical,
            };
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKey, EffectValue)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }
}

/// Distance weight for a device at `distance` with the given coverage.
///
/// Global devices apply at full strength anywhere; radius-limited devices
/// fall off linearly but never below [`MIN_DISTANCE_WEIGHT`]. Returns
/// `None` when the point lies outside coverage.
pub fn coverage_weight(distance: f64, coverage: f64) -> Option<f64> {
    if coverage >= GLOBAL_COVERAGE {
        return Some(1.0);
    }
    if distance > coverage {
        return None;
    }
    if coverage <= 0.0 {
        return Some(1.0);
    }
    Some((1.0 - distance / coverage).max(MIN_DISTANCE_WEIGHT))
}

/// Aggregate weighted effect vectors into a single delta.
pub fn aggregate<'a, I>(contributions: I) -> EffectDelta
where
    I: IntoIterator<Item = (f64, &'a [(EffectKey, EffectValue)])>,
{
    let mut delta = EffectDelta::new();
    for (weight, effects) in contributions {
        delta.accumulate(weight, effects);
    }
    delta
}
