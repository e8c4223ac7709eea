//! Ambient conditions and how far a plant is from liking them.
//!
//! An [`EnvironmentReading`] is a plain snapshot: the farm's base climate,
//! optionally shifted by an [`EffectDelta`] from nearby equipment. Plants
//! score each [`Factor`] against their [`FactorPreference`] with
//! [`factor_stress`].

use serde::{Deserialize, Serialize};

use crate::effects::{EffectDelta, EffectKey};

/// Snapshot of ambient conditions at a point or farm-wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    /// Air temperature in °F.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Light intensity, percent of full sun.
    pub light_intensity: f64,
    /// CO₂ concentration in ppm.
    pub co2_level: f64,
    /// Root-zone acidity.
    pub ph: f64,
}

impl Default for EnvironmentReading {
    fn default() -> Self {
        Self {
            temperature: 72.0,
            humidity: 45.0,
            light_intensity: 60.0,
            co2_level: 400.0,
            ph: 6.5,
        }
    }
}

impl EnvironmentReading {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Temperature => self.temperature,
            Factor::Humidity => self.humidity,
            Factor::LightIntensity => self.light_intensity,
            Factor::Co2Level => self.co2_level,
        }
    }

    /// Reading shifted by the numeric environmental entries of `delta`.
    /// Efficiency multipliers and categorical entries do not touch the reading.
    pub fn with_delta(&self, delta: &EffectDelta) -> Self {
        let mut out = *self;
        for factor in Factor::ALL {
            let shift = delta
                .get(factor.effect_key())
                .and_then(|v| v.as_numeric())
                .unwrap_or(0.0);
            match factor {
                Factor::Temperature => out.temperature += shift,
                Factor::Humidity => out.humidity += shift,
                Factor::LightIntensity => out.light_intensity += shift,
                Factor::Co2Level => out.co2_level += shift,
            }
        }
        out
    }

    /// Reading where every scored factor sits exactly at the preferred optimum.
    pub fn optimal_for(prefs: &Preferences) -> Self {
        Self {
            temperature: prefs.temperature.optimal,
            humidity: prefs.humidity.optimal,
            light_intensity: prefs.light_intensity.optimal,
            co2_level: prefs.co2_level.optimal,
            ph: prefs.ph.optimal,
        }
    }
}

/// The four factors that contribute to environmental stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    Temperature,
    Humidity,
    LightIntensity,
    Co2Level,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::Temperature,
        Factor::Humidity,
        Factor::LightIntensity,
        Factor::Co2Level,
    ];

    /// Effect key that devices use to shift this factor.
    pub fn effect_key(self) -> EffectKey {
        match self {
            Factor::Temperature => EffectKey::Temperature,
            Factor::Humidity => EffectKey::Humidity,
            Factor::LightIntensity => EffectKey::LightIntensity,
            Factor::Co2Level => EffectKey::Co2Level,
        }
    }
}

/// Tolerated range and sweet spot for one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorPreference {
    pub min: f64,
    pub optimal: f64,
    pub max: f64,
}

impl FactorPreference {
    pub const fn new(min: f64, optimal: f64, max: f64) -> Self {
        Self { min, optimal, max }
    }
}

/// Per-factor preferences, fixed when a plant is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub temperature: FactorPreference,
    pub humidity: FactorPreference,
    pub light_intensity: FactorPreference,
    pub co2_level: FactorPreference,
    /// Carried for display; acidity is not scored.
    pub ph: FactorPreference,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            temperature: FactorPreference::new(68.0, 75.0, 85.0),
            humidity: FactorPreference::new(40.0, 55.0, 70.0),
            light_intensity: FactorPreference::new(30.0, 80.0, 100.0),
            co2_level: FactorPreference::new(350.0, 1200.0, 1500.0),
            ph: FactorPreference::new(6.0, 6.5, 7.0),
        }
    }
}

impl Preferences {
    pub fn get(&self, factor: Factor) -> &FactorPreference {
        match factor {
            Factor::Temperature => &self.temperature,
            Factor::Humidity => &self.humidity,
            Factor::LightIntensity => &self.light_intensity,
            Factor::Co2Level => &self.co2_level,
        }
    }
}

/// Slope applied inside the tolerated range (per unit of relative distance).
const IN_RANGE_SLOPE: f64 = 20.0;
/// Slope applied outside the tolerated range.
const OUT_OF_RANGE_SLOPE: f64 = 100.0;

/// Stress contributed by a single factor, before capping.
///
/// Outside `[min, max]` the distance past the violated boundary is taken
/// relative to that boundary's value. Inside, the distance from the optimum
/// is taken relative to the gap between the optimum and the nearer bound,
/// on a much gentler slope.
///
/// A negative boundary flips the sign of the ratio, and the result is then
/// floored at zero. A zero boundary yields infinite stress, which the plant's
/// per-factor cap turns into the maximum penalty.
pub fn factor_stress(value: f64, pref: &FactorPreference) -> f64 {
    let stress = if value < pref.min {
        relative(pref.min - value, pref.min) * OUT_OF_RANGE_SLOPE
    } else if value > pref.max {
        relative(value - pref.max, pref.max) * OUT_OF_RANGE_SLOPE
    } else if value < pref.optimal {
        relative(pref.optimal - value, pref.optimal - pref.min) * IN_RANGE_SLOPE
    } else if value > pref.optimal {
        relative(value - pref.optimal, pref.max - pref.optimal) * IN_RANGE_SLOPE
    } else {
        0.0
    };
    stress.max(0.0)
}

/// `distance` is always positive here.
fn relative(distance: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::INFINITY
    } else {
        distance / denominator
    }
}

/// Efficiency floor for a reading outside the tolerated range.
pub const OUT_OF_RANGE_EFFICIENCY: f64 = 0.2;
/// Efficiency at either tolerated bound; rises linearly to 1 at the optimum.
pub const BOUND_EFFICIENCY: f64 = 0.4;

/// How well a single reading supports photosynthesis, in `[0.2, 1]`.
pub fn factor_efficiency(value: f64, pref: &FactorPreference) -> f64 {
    if value < pref.min || value > pref.max {
        return OUT_OF_RANGE_EFFICIENCY;
    }
    let closeness = if value < pref.optimal {
        (value - pref.min) / (pref.optimal - pref.min)
    } else if value > pref.optimal {
        (pref.max - value) / (pref.max - pref.optimal)
    } else {
        return 1.0;
    };
    BOUND_EFFICIENCY + (1.0 - BOUND_EFFICIENCY) * closeness
}
