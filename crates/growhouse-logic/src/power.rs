//! Electricity pricing for aggregate equipment draw.
//!
//! Daily consumption is priced on a progressive schedule: each tier covers
//! the kWh up to its ceiling at `base_rate × multiplier`, and the last tier
//! is open-ended. The default schedule charges R for the first 10 kWh,
//! 1.2R up to 25 kWh, and 1.5R beyond, with R = 0.12.
//!
//! ```
//! use growhouse_logic::power::daily_power_cost;
//!
//! assert_eq!(daily_power_cost(0.0), 0.0);
//! // 1250 W all day is 30 kWh: 1.20 + 2.16 + 0.90
//! assert_eq!(daily_power_cost(1250.0), 4.26);
//! ```

use serde::{Deserialize, Serialize};

/// Base electricity rate in currency per kWh.
pub const BASE_RATE: f64 = 0.12;

/// One step of a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffTier {
    /// Upper bound of this tier in kWh per day; `None` is unbounded.
    pub up_to_kwh: Option<f64>,
    pub multiplier: f64,
}

/// Progressive per-kWh pricing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerTariff {
    pub base_rate: f64,
    pub tiers: Vec<TariffTier>,
}

impl Default for PowerTariff {
    fn default() -> Self {
        Self {
            base_rate: BASE_RATE,
            tiers: vec![
                TariffTier {
                    up_to_kwh: Some(10.0),
                    multiplier: 1.0,
                },
                TariffTier {
                    up_to_kwh: Some(25.0),
                    multiplier: 1.2,
                },
                TariffTier {
                    up_to_kwh: None,
                    multiplier: 1.5,
                },
            ],
        }
    }
}

/// Continuous draw in watts converted to kWh per day.
pub fn daily_kwh(watts: f64) -> f64 {
    watts * 24.0 / 1000.0
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl PowerTariff {
    /// Cost of `kwh` consumed in one day, rounded to the nearest cent.
    ///
    /// Consumption beyond the last bounded tier is billed at the last
    /// tier's multiplier.
    pub fn cost_for_kwh(&self, kwh: f64) -> f64 {
        let kwh = kwh.max(0.0);
        let mut cost = 0.0;
        let mut floor = 0.0;
        let mut last_multiplier = 1.0;

        for tier in &self.tiers {
            last_multiplier = tier.multiplier;
            let ceiling = tier.up_to_kwh.unwrap_or(f64::INFINITY);
            if kwh > floor {
                cost += (kwh.min(ceiling) - floor) * self.base_rate * tier.multiplier;
            }
            floor = ceiling;
            if kwh <= floor {
                break;
            }
        }
        if kwh > floor {
            cost += (kwh - floor) * self.base_rate * last_multiplier;
        }

        round_to_cents(cost)
    }

    /// Daily cost of a continuous draw of `watts`.
    pub fn daily_cost(&self, watts: f64) -> f64 {
        self.cost_for_kwh(daily_kwh(watts))
    }

    /// Whether tier ceilings strictly increase and only the last is open.
    pub fn is_well_formed(&self) -> bool {
        if self.tiers.is_empty() || self.base_rate < 0.0 {
            return false;
        }
        let mut prev = 0.0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.multiplier < 0.0 {
                return false;
            }
            match tier.up_to_kwh {
                Some(ceiling) if ceiling > prev => prev = ceiling,
                None if i + 1 == self.tiers.len() => {}
                _ => return false,
            }
        }
        true
    }
}

/// Daily cost of `total_watts` on the default tariff.
pub fn daily_power_cost(total_watts: f64) -> f64 {
    PowerTariff::default().daily_cost(total_watts)
}
