//! Installed equipment, keyed by farm slot.
//!
//! The registry holds at most one device per [`GridPos`]; `install` refuses
//! an occupied slot rather than replacing what is there. It answers two
//! questions for the controller: what composite effect reaches a point
//! ([`DeviceRegistry::effects_near`]), and what running everything cost
//! today ([`DeviceRegistry::advance_day`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::{coverage_weight, EffectDelta};
use crate::equipment::{Device, DeviceKind, SpendingCategory};
use crate::error::ActionError;
use crate::grid::GridPos;

/// One device's share of a day's operating cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceCost {
    pub kind: DeviceKind,
    pub pos: GridPos,
    pub category: SpendingCategory,
    pub cost: f64,
}

/// Totals for one simulated day across every device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub operating_cost: f64,
    pub power_watts: f64,
    pub breakdown: Vec<DeviceCost>,
}

/// All installed devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Device>", into = "Vec<Device>")]
pub struct DeviceRegistry {
    devices: BTreeMap<GridPos, Device>,
}

impl From<Vec<Device>> for DeviceRegistry {
    fn from(devices: Vec<Device>) -> Self {
        let mut registry = Self::new();
        for device in devices {
            if registry.devices.contains_key(&device.pos) {
                log::warn!("dropping duplicate device at {}", device.pos);
                continue;
            }
            registry.devices.insert(device.pos, device);
        }
        registry
    }
}

impl From<DeviceRegistry> for Vec<Device> {
    fn from(registry: DeviceRegistry) -> Self {
        registry.devices.into_values().collect()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.devices.contains_key(&pos)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Device> {
        self.devices.get(&pos)
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Device> {
        self.devices.get_mut(&pos)
    }

    /// Every device, ordered by slot.
    pub fn list_all(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Whether `kind` could be installed at `pos` right now. Changes nothing.
    pub fn check_install(
        &self,
        kind: DeviceKind,
        pos: GridPos,
        player_level: u32,
    ) -> Result<(), ActionError> {
        if self.devices.contains_key(&pos) {
            return Err(ActionError::SlotOccupied(pos));
        }
        let spec = kind.spec();
        if player_level < spec.unlock_level {
            return Err(ActionError::NotUnlocked {
                required: spec.unlock_level,
                current: player_level,
            });
        }
        Ok(())
    }

    /// Install a new device at `pos`. Returns the install price for the caller to debit.
    pub fn install(
        &mut self,
        kind: DeviceKind,
        pos: GridPos,
        player_level: u32,
    ) -> Result<f64, ActionError> {
        self.check_install(kind, pos, player_level)?;
        let spec = kind.spec();
        self.devices.insert(pos, Device::new(kind, pos));
        log::info!("installed {} at {}", spec.name, pos);
        Ok(spec.install_cost)
    }

    /// Remove the device at `pos`. Returns the wear-adjusted refund.
    pub fn remove(&mut self, pos: GridPos) -> Result<f64, ActionError> {
        let device = self
            .devices
            .remove(&pos)
            .ok_or(ActionError::NoDeviceAt(pos))?;
        let refund = device.removal_refund();
        log::info!(
            "removed {} from {} (refund {:.0})",
            device.spec().name,
            pos,
            refund
        );
        Ok(refund)
    }

    /// Composite device effect at `point`.
    ///
    /// Each device contributes when the point lies within its coverage, or
    /// anywhere if it covers the whole farm. Radius-limited devices are
    /// weighted by distance; farm-wide devices apply at full strength.
    ///
    /// `_radius` is accepted for callers that pass a query radius but does
    /// not narrow or widen anything; coverage is always the device's own.
    pub fn effects_near(&self, point: (f64, f64), _radius: Option<f64>) -> EffectDelta {
        let mut delta = EffectDelta::new();
        for device in self.devices.values() {
            let distance = device.pos.distance_to(point);
            if let Some(weight) = coverage_weight(distance, device.spec().coverage) {
                delta.accumulate(weight, &device.effective_output());
            }
        }
        delta
    }

    /// Effect of farm-wide devices only.
    pub fn global_effects(&self) -> EffectDelta {
        let mut delta = EffectDelta::new();
        for device in self.devices.values().filter(|d| d.spec().is_global()) {
            delta.accumulate(1.0, &device.effective_output());
        }
        delta
    }

    /// Current draw of every active device, in watts.
    pub fn total_power_draw(&self) -> f64 {
        self.devices
            .values()
            .filter(|d| d.active)
            .map(|d| d.spec().power_watts)
            .sum()
    }

    /// Age every device by one day and total what they cost to run.
    pub fn advance_day(&mut self, day: u32) -> DailyReport {
        let mut report = DailyReport::default();
        for device in self.devices.values_mut() {
            let usage = device.advance_day(day);
            report.operating_cost += usage.operating_cost;
            report.power_watts += usage.power_watts;
            report.breakdown.push(DeviceCost {
                kind: device.kind,
                pos: device.pos,
                category: device.spec().category,
                cost: usage.operating_cost,
            });
        }
        log::debug!(
            "day {}: {} devices, operating {:.2}, draw {:.0} W",
            day,
            self.devices.len(),
            report.operating_cost,
            report.power_watts
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKey;

    fn registry_with(kind: DeviceKind, pos: GridPos) -> DeviceRegistry {
        let mut r = DeviceRegistry::new();
        r.install(kind, pos, 10).unwrap();
        r
    }

    // ── Install / remove ────────────────────────────────────────────────

    #[test]
    fn test_install_returns_cost() {
        let mut r = DeviceRegistry::new();
        let cost = r.install(DeviceKind::LedLight, GridPos::new(1, 1), 1).unwrap();
        assert_eq!(cost, 200.0);
        let d = r.get(GridPos::new(1, 1)).unwrap();
        assert_eq!(d.level, 1);
        assert_eq!(d.durability, 100.0);
        assert!(d.active);
    }

    #[test]
    fn test_install_occupied_slot_fails_without_change() {
        let mut r = registry_with(DeviceKind::LedLight, GridPos::new(1, 1));
        let before = r.clone();
        assert_eq!(
            r.install(DeviceKind::VentilationFan, GridPos::new(1, 1), 10),
            Err(ActionError::SlotOccupied(GridPos::new(1, 1)))
        );
        assert_eq!(r, before);
    }

    #[test]
    fn test_install_requires_unlock() {
        let mut r = DeviceRegistry::new();
        assert_eq!(
            r.install(DeviceKind::Co2Generator, GridPos::new(0, 0), 3),
            Err(ActionError::NotUnlocked {
                required: 4,
                current: 3
            })
        );
        assert!(r.is_empty());
        assert!(r.check_install(DeviceKind::Co2Generator, GridPos::new(0, 0), 4).is_ok());
        assert!(r.is_empty());
        assert!(r.install(DeviceKind::Co2Generator, GridPos::new(0, 0), 4).is_ok());
    }

    #[test]
    fn test_remove_refund_and_empty_slot() {
        let mut r = registry_with(DeviceKind::LedLight, GridPos::new(3, 3));
        r.get_mut(GridPos::new(3, 3)).unwrap().durability = 50.0;
        assert_eq!(r.remove(GridPos::new(3, 3)), Ok(30.0));
        assert_eq!(
            r.remove(GridPos::new(3, 3)),
            Err(ActionError::NoDeviceAt(GridPos::new(3, 3)))
        );
    }

    // ── Aggregation ─────────────────────────────────────────────────────

    #[test]
    fn test_half_weight_at_half_coverage() {
        // Humidifier: coverage 6, +20 humidity
        let r = registry_with(DeviceKind::Humidifier, GridPos::new(0, 0));
        let d = r.effects_near((3.0, 0.0), None);
        assert!((d.numeric(EffectKey::Humidity) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_outside_coverage_contributes_nothing() {
        let r = registry_with(DeviceKind::Humidifier, GridPos::new(0, 0));
        let d = r.effects_near((10.0, 0.0), None);
        assert_eq!(d, EffectDelta::new());
    }

    #[test]
    fn test_contributions_sum_across_devices() {
        let mut r = DeviceRegistry::new();
        r.install(DeviceKind::Heater, GridPos::new(0, 0), 10).unwrap(); // +10, cov 8
        r.install(DeviceKind::LedLight, GridPos::new(4, 0), 10).unwrap(); // +2, cov 4
        let d = r.effects_near((4.0, 0.0), None);
        // Heater at d=4: weight 0.5 -> 5; lamp at d=0 -> 2
        assert!((d.numeric(EffectKey::Temperature) - 7.0).abs() < 1e-9);
        assert!((d.numeric(EffectKey::LightIntensity) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_inactive_devices_contribute_nothing() {
        let mut r = registry_with(DeviceKind::Heater, GridPos::new(0, 0));
        r.get_mut(GridPos::new(0, 0)).unwrap().set_active(false);
        assert_eq!(r.effects_near((0.0, 0.0), None), EffectDelta::new());
    }

    #[test]
    fn test_global_device_full_strength_everywhere() {
        let mut r = DeviceRegistry::new();
        r.install(DeviceKind::TimerSystem, GridPos::new(0, 0), 7).unwrap();
        r.install(DeviceKind::Heater, GridPos::new(0, 0), 7).unwrap_err();
        r.install(DeviceKind::Heater, GridPos::new(1, 0), 7).unwrap();
        // Timer effects are outside the aggregated set, so only coverage matters
        let far = r.effects_near((500.0, 500.0), None);
        assert_eq!(far, EffectDelta::new());
        let global = r.global_effects();
        assert_eq!(global.numeric(EffectKey::Temperature), 0.0);
        let near = r.effects_near((1.0, 0.0), None);
        assert_eq!(near.numeric(EffectKey::Temperature), 10.0);
    }

    #[test]
    fn test_query_radius_does_not_change_result() {
        let mut r = registry_with(DeviceKind::Humidifier, GridPos::new(0, 0));
        r.install(DeviceKind::Heater, GridPos::new(20, 0), 10).unwrap();
        let point = (3.0, 0.0);
        let baseline = r.effects_near(point, None);
        assert!((baseline.numeric(EffectKey::Humidity) - 10.0).abs() < 1e-9);
        assert_eq!(baseline.numeric(EffectKey::Temperature), 0.0);
        for radius in [0.0, 2.0, 999.0, 5000.0] {
            assert_eq!(r.effects_near(point, Some(radius)), baseline, "radius {radius}");
        }
    }

    #[test]
    fn test_global_effects_skip_radius_limited_devices() {
        let mut r = registry_with(DeviceKind::Heater, GridPos::new(0, 0));
        assert_eq!(r.global_effects(), EffectDelta::new());
        r.install(DeviceKind::TimerSystem, GridPos::new(9, 9), 10).unwrap();
        assert_eq!(r.global_effects().numeric(EffectKey::Temperature), 0.0);
    }

    #[test]
    fn test_hydroponics_raises_nutrient_efficiency() {
        let r = registry_with(DeviceKind::HydroponicSystem, GridPos::new(2, 2));
        let d = r.effects_near((2.0, 2.0), None);
        assert!((d.nutrient_efficiency() - 3.0).abs() < 1e-9);
        assert!((d.water_efficiency() - 2.5).abs() < 1e-9);
    }

    // ── Daily accounting ────────────────────────────────────────────────

    #[test]
    fn test_advance_day_totals() {
        let mut r = DeviceRegistry::new();
        r.install(DeviceKind::LedLight, GridPos::new(0, 0), 10).unwrap();
        r.install(DeviceKind::Heater, GridPos::new(1, 0), 10).unwrap();
        r.install(DeviceKind::Humidifier, GridPos::new(2, 0), 10).unwrap();
        r.get_mut(GridPos::new(2, 0)).unwrap().set_active(false);

        assert_eq!(r.total_power_draw(), 600.0);
        let report = r.advance_day(1);
        assert_eq!(report.operating_cost, 23.0);
        assert_eq!(report.power_watts, 600.0);
        assert_eq!(report.breakdown.len(), 3);
        let humid = report
            .breakdown
            .iter()
            .find(|c| c.kind == DeviceKind::Humidifier)
            .unwrap();
        assert_eq!(humid.cost, 0.0);
        assert_eq!(humid.category, SpendingCategory::Air);
        assert_eq!(r.get(GridPos::new(2, 0)).unwrap().durability, 100.0);
        assert_eq!(r.get(GridPos::new(0, 0)).unwrap().durability, 99.5);
    }

    #[test]
    fn test_list_all_ordered_by_slot() {
        let mut r = DeviceRegistry::new();
        r.install(DeviceKind::LedLight, GridPos::new(2, 0), 10).unwrap();
        r.install(DeviceKind::LedLight, GridPos::new(0, 5), 10).unwrap();
        let slots: Vec<_> = r.list_all().map(|d| d.pos).collect();
        assert_eq!(slots, vec![GridPos::new(0, 5), GridPos::new(2, 0)]);
    }
}
