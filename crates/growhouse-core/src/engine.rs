//! Farm engine - main entry point for running a grow room

use std::collections::BTreeMap;
use std::io::{Read, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use growhouse_logic::config::FarmConfig;
use growhouse_logic::environment::EnvironmentReading;
use growhouse_logic::equipment::{Device, DeviceKind, UpkeepReceipt};
use growhouse_logic::error::ActionError;
use growhouse_logic::grid::GridPos;
use growhouse_logic::plant::{CareReceipt, HarvestOutcome, Plant};
use growhouse_logic::registry::DeviceRegistry;
use growhouse_logic::variety;

use crate::ledger::Ledger;
use crate::persistence::{self, SaveData, SaveError};
use crate::photosynthesis::{self, PhotosynthesisSummary};

/// The clock reads this on a new farm.
pub const START_DAY: u32 = 1;

/// Per-tick chance that a dead plant is cleared from its slot.
pub const DEAD_PLANT_CLEAR_CHANCE: f64 = 0.1;

/// Point-in-time overview of a farm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmSummary {
    pub day: u32,
    pub cash: f64,
    pub plants: usize,
    pub dead_plants: usize,
    pub harvestable: usize,
    pub devices: usize,
    pub power_watts: f64,
    pub daily_profit: f64,
    pub total_revenue: f64,
    pub total_costs: f64,
}

/// A single grow room: plants, equipment, and cash.
pub struct Farm {
    pub config: FarmConfig,
    pub cash: f64,
    pub player_level: u32,
    pub unlocked_varieties: Vec<String>,
    pub plants: BTreeMap<GridPos, Plant>,
    pub devices: DeviceRegistry,
    pub ledger: Ledger,
    /// Ticks elapsed since the farm opened.
    pub ticks: u64,
    rng: StdRng,
}

impl Farm {
    /// Open a new farm from `config`.
    pub fn new(config: FarmConfig) -> Self {
        let rng = seeded_rng(config.seed, 0);
        Self {
            cash: config.starting_cash,
            player_level: config.player_level,
            unlocked_varieties: config.unlocked_varieties.clone(),
            plants: BTreeMap::new(),
            devices: DeviceRegistry::new(),
            ledger: Ledger::new(),
            ticks: 0,
            rng,
            config,
        }
    }

    /// Reassemble a farm from a save. The RNG is reseeded from the
    /// config seed and tick count.
    pub(crate) fn from_save(save: SaveData) -> Self {
        let rng = seeded_rng(save.config.seed, save.ticks);
        Self {
            cash: save.cash,
            player_level: save.player_level,
            unlocked_varieties: save.unlocked_varieties,
            plants: save.plants.into_iter().map(|p| (p.pos, p)).collect(),
            devices: save.devices,
            ledger: save.ledger,
            ticks: save.ticks,
            rng,
            config: save.config,
        }
    }

    // ── Clock ──────────────────────────────────────────────────────────

    fn ticks_per_day(&self) -> u64 {
        self.config.ticks_per_day.max(1) as u64
    }

    /// Simulation clock in days, fractional within a day.
    pub fn day(&self) -> f64 {
        START_DAY as f64 + self.ticks as f64 / self.ticks_per_day() as f64
    }

    /// Whole day the clock is on.
    pub fn current_day(&self) -> u32 {
        START_DAY + (self.ticks / self.ticks_per_day()) as u32
    }

    /// Advance the farm by one tick.
    ///
    /// Every plant is advanced with the base climate plus whatever its
    /// nearby devices contribute. When the tick completes a day, devices
    /// age and the day's running costs and electricity are charged.
    pub fn tick(&mut self) {
        self.ticks += 1;
        let day = self.day();
        let base = self.config.base_environment;

        let mut cleared = Vec::new();
        for (pos, plant) in self.plants.iter_mut() {
            let delta = self.devices.effects_near(pos.as_point(), None);
            plant.apply_equipment_effects(&delta);
            plant.advance(&base, day, &mut self.rng);
            if plant.is_dead && self.rng.gen_bool(DEAD_PLANT_CLEAR_CHANCE) {
                cleared.push(*pos);
            }
        }
        for pos in cleared {
            self.plants.remove(&pos);
            log::debug!("cleared dead plant at {}", pos);
        }

        if self.ticks % self.ticks_per_day() == 0 {
            self.end_of_day();
        }
    }

    /// Advance whole days.
    pub fn run_days(&mut self, days: u32) {
        for _ in 0..days as u64 * self.ticks_per_day() {
            self.tick();
        }
    }

    fn end_of_day(&mut self) {
        let day = self.current_day();
        self.ledger.close_day();

        let report = self.devices.advance_day(day);
        let electricity = self.config.tariff.daily_cost(report.power_watts);
        self.cash -= report.operating_cost + electricity;
        self.ledger.record_operating(&report, electricity);

        log::debug!(
            "day {} closed: operating {:.2}, electricity {:.2}, cash {:.2}",
            day,
            report.operating_cost,
            electricity,
            self.cash
        );
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn plant_at(&self, pos: GridPos) -> Option<&Plant> {
        self.plants.get(&pos)
    }

    pub fn device_at(&self, pos: GridPos) -> Option<&Device> {
        self.devices.get(pos)
    }

    /// Whether a plant or a device occupies `pos`.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.plants.contains_key(&pos) || self.devices.is_occupied(pos)
    }

    /// Base climate with the device effect at `pos` added.
    pub fn local_environment(&self, pos: GridPos) -> EnvironmentReading {
        self.config
            .base_environment
            .with_delta(&self.devices.effects_near(pos.as_point(), None))
    }

    /// Room climate as read from the origin slot, every device's coverage applied.
    pub fn room_environment(&self) -> EnvironmentReading {
        self.local_environment(GridPos::ORIGIN)
    }

    /// Factor efficiencies and category spend for the whole room.
    pub fn photosynthesis_summary(&self) -> PhotosynthesisSummary {
        photosynthesis::summarize(self)
    }

    pub fn summary(&self) -> FarmSummary {
        FarmSummary {
            day: self.current_day(),
            cash: self.cash,
            plants: self.plants.len(),
            dead_plants: self.plants.values().filter(|p| p.is_dead).count(),
            harvestable: self.plants.values().filter(|p| p.is_harvestable).count(),
            devices: self.devices.len(),
            power_watts: self.devices.total_power_draw(),
            daily_profit: self.ledger.daily_profit(),
            total_revenue: self.ledger.total_revenue,
            total_costs: self.ledger.total_costs(),
        }
    }

    // ── Plant actions ──────────────────────────────────────────────────

    fn check_bounds(&self, pos: GridPos) -> Result<(), ActionError> {
        if pos.in_bounds(self.config.width, self.config.height) {
            Ok(())
        } else {
            Err(ActionError::OutOfBounds(pos))
        }
    }

    fn ensure_funds(&self, needed: f64) -> Result<(), ActionError> {
        if self.cash >= needed {
            Ok(())
        } else {
            Err(ActionError::InsufficientFunds {
                needed,
                available: self.cash,
            })
        }
    }

    fn plant_mut(&mut self, pos: GridPos) -> Result<&mut Plant, ActionError> {
        self.plants.get_mut(&pos).ok_or(ActionError::NoPlantAt(pos))
    }

    /// Sow `variety` at `pos`. Returns the seed cost charged.
    pub fn plant_seed(&mut self, pos: GridPos, variety_name: &str) -> Result<f64, ActionError> {
        self.check_bounds(pos)?;
        if self.is_occupied(pos) {
            return Err(ActionError::SlotOccupied(pos));
        }
        if !self.unlocked_varieties.iter().any(|v| v == variety_name) {
            return Err(ActionError::VarietyLocked(variety_name.to_string()));
        }
        let cost = variety::seed_cost(variety_name);
        self.ensure_funds(cost)?;

        let plant = Plant::new(pos, variety_name, self.day(), &mut self.rng);
        self.plants.insert(pos, plant);
        self.cash -= cost;
        self.ledger.record_supplies(cost);
        log::debug!("planted {} at {}", variety_name, pos);
        Ok(cost)
    }

    pub fn water(&mut self, pos: GridPos) -> Result<CareReceipt, ActionError> {
        self.ensure_funds(growhouse_logic::plant::WATER_COST)?;
        let receipt = self.plant_mut(pos)?.water()?;
        self.cash -= receipt.cost;
        self.ledger.record_supplies(receipt.cost);
        Ok(receipt)
    }

    pub fn feed(&mut self, pos: GridPos) -> Result<CareReceipt, ActionError> {
        self.ensure_funds(growhouse_logic::plant::FEED_COST)?;
        let receipt = self.plant_mut(pos)?.feed()?;
        self.cash -= receipt.cost;
        self.ledger.record_supplies(receipt.cost);
        Ok(receipt)
    }

    /// Harvest the plant at `pos`, bank the revenue, and free the slot.
    pub fn harvest(&mut self, pos: GridPos) -> Result<HarvestOutcome, ActionError> {
        let outcome = self.plant_mut(pos)?.harvest()?;
        self.plants.remove(&pos);
        self.cash += outcome.revenue;
        self.ledger.record_revenue(outcome.revenue);
        log::info!(
            "harvested plant at {}: {:.0} ({:?}, {} kg)",
            pos,
            outcome.revenue,
            outcome.grade,
            outcome.weight
        );
        Ok(outcome)
    }

    /// Harvest every Ready plant. Returns the total revenue.
    pub fn harvest_all(&mut self) -> f64 {
        let ready: Vec<GridPos> = self
            .plants
            .values()
            .filter(|p| p.is_harvestable)
            .map(|p| p.pos)
            .collect();
        ready
            .into_iter()
            .filter_map(|pos| self.harvest(pos).ok())
            .map(|o| o.revenue)
            .sum()
    }

    // ── Device actions ─────────────────────────────────────────────────

    /// Buy and install `kind` at `pos`. Returns the price paid.
    pub fn install_device(&mut self, kind: DeviceKind, pos: GridPos) -> Result<f64, ActionError> {
        self.check_bounds(pos)?;
        if self.plants.contains_key(&pos) {
            return Err(ActionError::SlotOccupied(pos));
        }
        self.devices.check_install(kind, pos, self.player_level)?;
        if let Err(e) = self.ensure_funds(kind.spec().install_cost) {
            log::warn!("cannot afford {} at {}", kind.spec().name, pos);
            return Err(e);
        }
        let cost = self.devices.install(kind, pos, self.player_level)?;
        self.cash -= cost;
        self.ledger.record_install(kind.spec().category, cost);
        Ok(cost)
    }

    /// Uninstall the device at `pos`. Returns the refund credited.
    pub fn remove_device(&mut self, pos: GridPos) -> Result<f64, ActionError> {
        let refund = self.devices.remove(pos)?;
        self.cash += refund;
        self.ledger.record_refund(refund);
        Ok(refund)
    }

    pub fn maintain(&mut self, pos: GridPos) -> Result<UpkeepReceipt, ActionError> {
        let day = self.current_day();
        let device = self.devices.get(pos).ok_or(ActionError::NoDeviceAt(pos))?;
        self.ensure_funds(device.maintenance_cost())?;
        let device = self
            .devices
            .get_mut(pos)
            .ok_or(ActionError::NoDeviceAt(pos))?;
        let receipt = device.perform_maintenance(day);
        let category = device.spec().category;
        self.cash -= receipt.cost;
        self.ledger.record_install(category, receipt.cost);
        Ok(receipt)
    }

    pub fn upgrade(&mut self, pos: GridPos) -> Result<UpkeepReceipt, ActionError> {
        let device = self.devices.get(pos).ok_or(ActionError::NoDeviceAt(pos))?;
        let cost = device.upgrade_cost().ok_or(ActionError::MaxLevel)?;
        self.ensure_funds(cost)?;
        let device = self
            .devices
            .get_mut(pos)
            .ok_or(ActionError::NoDeviceAt(pos))?;
        let receipt = device.upgrade()?;
        let category = device.spec().category;
        self.cash -= receipt.cost;
        self.ledger.record_install(category, receipt.cost);
        log::debug!("upgraded device at {} to level {}", pos, receipt.level);
        Ok(receipt)
    }

    /// Flip the device at `pos` on or off. Returns the new state.
    pub fn toggle_device(&mut self, pos: GridPos) -> Result<bool, ActionError> {
        let device = self
            .devices
            .get_mut(pos)
            .ok_or(ActionError::NoDeviceAt(pos))?;
        Ok(device.toggle_power())
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Save the farm to a writer.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_farm(writer, self)
    }

    /// Load a farm from a reader.
    pub fn load<R: Read>(reader: R) -> Result<Self, SaveError> {
        persistence::load_farm(reader)
    }
}

fn seeded_rng(seed: Option<u64>, ticks: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(ticks)),
        None => StdRng::from_entropy(),
    }
}
