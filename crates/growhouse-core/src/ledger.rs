//! Money in and out of the farm.
//!
//! The ledger only records; the engine decides whether a charge is
//! affordable and moves cash. Totals are cumulative since the farm was
//! created, and a snapshot taken at each day boundary gives the running
//! profit for the current day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use growhouse_logic::equipment::SpendingCategory;
use growhouse_logic::registry::DailyReport;

/// Spend booked against one equipment category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    /// Purchases, upgrades, and maintenance.
    pub install: f64,
    /// Daily running costs.
    pub operating: f64,
}

impl CategorySpend {
    pub fn total(&self) -> f64 {
        self.install + self.operating
    }
}

/// Cumulative totals at a day boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct DayTotals {
    revenue: f64,
    costs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub total_revenue: f64,
    pub total_electricity: f64,
    /// Equipment purchases, upkeep, and operating costs.
    pub total_equipment: f64,
    /// Seeds, water, and nutrients.
    pub total_supplies: f64,
    /// Credited back for removed devices.
    pub total_refunds: f64,
    pub spending: BTreeMap<SpendingCategory, CategorySpend>,
    previous: DayTotals,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_revenue(&mut self, amount: f64) {
        self.total_revenue += amount;
    }

    pub fn record_supplies(&mut self, cost: f64) {
        self.total_supplies += cost;
    }

    pub fn record_refund(&mut self, amount: f64) {
        self.total_refunds += amount;
    }

    /// A purchase, upgrade, or service charge for one device.
    pub fn record_install(&mut self, category: SpendingCategory, cost: f64) {
        self.total_equipment += cost;
        self.spending.entry(category).or_default().install += cost;
    }

    /// Book one day of running costs and the electricity bill.
    pub fn record_operating(&mut self, report: &DailyReport, electricity: f64) {
        for line in &report.breakdown {
            self.spending.entry(line.category).or_default().operating += line.cost;
        }
        self.total_equipment += report.operating_cost;
        self.total_electricity += electricity;
    }

    pub fn category(&self, category: SpendingCategory) -> CategorySpend {
        self.spending.get(&category).copied().unwrap_or_default()
    }

    pub fn total_costs(&self) -> f64 {
        self.total_electricity + self.total_equipment + self.total_supplies
    }

    /// Everything credited minus everything charged since the farm opened.
    pub fn net(&self) -> f64 {
        self.total_revenue + self.total_refunds - self.total_costs()
    }

    /// Mark a day boundary. [`Ledger::daily_profit`] counts from here.
    pub fn close_day(&mut self) {
        self.previous = DayTotals {
            revenue: self.total_revenue,
            costs: self.total_costs(),
        };
    }

    /// Profit booked since the last day boundary.
    pub fn daily_profit(&self) -> f64 {
        (self.total_revenue - self.previous.revenue) - (self.total_costs() - self.previous.costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growhouse_logic::equipment::DeviceKind;
    use growhouse_logic::grid::GridPos;
    use growhouse_logic::registry::DeviceCost;

    fn report(lines: &[(SpendingCategory, f64)]) -> DailyReport {
        DailyReport {
            operating_cost: lines.iter().map(|(_, c)| c).sum(),
            power_watts: 0.0,
            breakdown: lines
                .iter()
                .map(|&(category, cost)| DeviceCost {
                    kind: DeviceKind::LedLight,
                    pos: GridPos::ORIGIN,
                    category,
                    cost,
                })
                .collect(),
        }
    }

    #[test]
    fn test_install_books_by_category() {
        let mut l = Ledger::new();
        l.record_install(SpendingCategory::Lighting, 200.0);
        l.record_install(SpendingCategory::Lighting, 150.0);
        l.record_install(SpendingCategory::Air, 60.0);
        assert_eq!(l.category(SpendingCategory::Lighting).install, 350.0);
        assert_eq!(l.category(SpendingCategory::Air).total(), 60.0);
        assert_eq!(l.category(SpendingCategory::Security), CategorySpend::default());
        assert_eq!(l.total_equipment, 410.0);
    }

    #[test]
    fn test_operating_splits_by_category() {
        let mut l = Ledger::new();
        l.record_operating(
            &report(&[
                (SpendingCategory::Lighting, 15.0),
                (SpendingCategory::Climate, 8.0),
                (SpendingCategory::Lighting, 25.0),
            ]),
            1.5,
        );
        assert_eq!(l.category(SpendingCategory::Lighting).operating, 40.0);
        assert_eq!(l.category(SpendingCategory::Climate).operating, 8.0);
        assert_eq!(l.total_equipment, 48.0);
        assert_eq!(l.total_electricity, 1.5);
        assert_eq!(l.total_costs(), 49.5);
    }

    #[test]
    fn test_daily_profit_resets_at_close() {
        let mut l = Ledger::new();
        l.record_supplies(50.0);
        l.record_revenue(120.0);
        assert_eq!(l.daily_profit(), 70.0);
        l.close_day();
        assert_eq!(l.daily_profit(), 0.0);
        l.record_supplies(5.0);
        assert_eq!(l.daily_profit(), -5.0);
        l.record_refund(60.0);
        assert_eq!(l.daily_profit(), -5.0);
        assert_eq!(l.net(), 125.0);
    }
}
