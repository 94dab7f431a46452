//! Estimate session: holds one job's inputs, recomputes the takeoff and
//! pricing on edit, and carries the revenue/margin lock state the desktop
//! shell binds its fields to.

use crate::catalog::Catalog;
use crate::error::EstimateError;
use crate::financial;
use crate::model::{AreaRule, JobCost, JobInputs, JobOutputs, LineItem, TradeCost};
use crate::pricing;
use crate::quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which financial field is held fixed while the others derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostLock {
    /// Target gross margin is fixed; revenue derives from COGS.
    GrossMargin,
    /// Revenue is fixed; gross margin derives from COGS.
    Revenue,
}

/// Derived margins clamp here so a fat-fingered revenue cannot push the
/// commission schedule past 95%.
fn derived_gm_cap() -> Decimal {
    Decimal::new(95, 2)
}

/// Per-item qty and unit cost as first computed, kept so later edits can be
/// diffed against where the estimate started.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baselines {
    pub items: BTreeMap<String, BaselineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub qty: f64,
    pub unit_cost: Decimal,
}

impl Baselines {
    /// Rebuild from persisted line items; keyed by item, first row wins so
    /// split rows (per-color coil) keep a single baseline.
    pub fn from_line_items(items: &[LineItem]) -> Baselines {
        let mut map = BTreeMap::new();
        for li in items {
            map.entry(li.item.clone()).or_insert(BaselineEntry {
                qty: li.qty,
                unit_cost: li.unit_cost,
            });
        }
        Baselines { items: map }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One job's live estimate state.
pub struct EstimateSession {
    pub inputs: JobInputs,
    pub area_rule: AreaRule,
    lock: CostLock,
    target_gm: Decimal,
    locked_revenue: Decimal,
    overhead_rate: Option<Decimal>,
    labor_override: Option<Decimal>,
    outputs: Option<JobOutputs>,
    trade: Option<TradeCost>,
    cost: Option<JobCost>,
    baselines: Baselines,
    recomputing: bool,
}

impl EstimateSession {
    pub fn new(inputs: JobInputs, area_rule: AreaRule, target_gm: Decimal) -> EstimateSession {
        EstimateSession {
            inputs,
            area_rule,
            lock: CostLock::GrossMargin,
            target_gm,
            locked_revenue: Decimal::ZERO,
            overhead_rate: None,
            labor_override: None,
            outputs: None,
            trade: None,
            cost: None,
            baselines: Baselines::default(),
            recomputing: false,
        }
    }

    pub fn lock(&self) -> CostLock {
        self.lock
    }

    pub fn target_gm(&self) -> Decimal {
        self.target_gm
    }

    pub fn outputs(&self) -> Option<&JobOutputs> {
        self.outputs.as_ref()
    }

    pub fn trade_cost(&self) -> Option<&TradeCost> {
        self.trade.as_ref()
    }

    pub fn cost(&self) -> Option<&JobCost> {
        self.cost.as_ref()
    }

    pub fn baselines(&self) -> &Baselines {
        &self.baselines
    }

    /// Restore baselines from a persisted snapshot's line items.
    pub fn restore_baselines(&mut self, items: &[LineItem]) {
        self.baselines = Baselines::from_line_items(items);
    }

    pub fn set_overhead_rate(&mut self, rate: Decimal) {
        self.overhead_rate = Some(rate);
    }

    /// Replace the computed labor cost with a quoted figure; `None` returns
    /// to the formula.
    pub fn set_labor_override(&mut self, labor: Option<Decimal>) {
        self.labor_override = labor;
    }

    /// Editing the margin flips the lock back to margin-driven revenue.
    pub fn set_target_gm(&mut self, gm: Decimal) {
        self.target_gm = gm;
        self.lock = CostLock::GrossMargin;
    }

    /// Pinning revenue flips the lock; margin derives on the next recompute.
    pub fn set_revenue(&mut self, revenue: Decimal) {
        self.locked_revenue = revenue;
        self.lock = CostLock::Revenue;
    }

    /// Pin revenue so the job pays the requested commission dollars.
    pub fn set_commission_target(&mut self, commission: Decimal) -> Result<(), EstimateError> {
        let cogs = self.current_cogs()?;
        let revenue = financial::solve_revenue_from_commission(cogs, commission)?;
        self.set_revenue(revenue);
        Ok(())
    }

    /// Pin revenue so the job clears the requested profit dollars.
    pub fn set_profit_target(
        &mut self,
        profit: Decimal,
        catalog: &Catalog,
    ) -> Result<(), EstimateError> {
        let cogs = self.current_cogs()?;
        let rate = self
            .overhead_rate
            .unwrap_or_else(|| catalog.overhead_rate_default());
        let revenue = financial::solve_revenue_from_profit(cogs, rate, profit)?;
        self.set_revenue(revenue);
        Ok(())
    }

    fn current_cogs(&self) -> Result<Decimal, EstimateError> {
        self.trade
            .as_ref()
            .map(TradeCost::cogs)
            .ok_or_else(|| EstimateError::Compute("no priced estimate to solve against".into()))
    }

    /// Recompute takeoff, pricing, and the financial rollup.
    ///
    /// Single-slot guard: a recompute triggered while one is already running
    /// (field-change callbacks firing mid-update) is dropped, not queued, and
    /// reports `Ok(None)`.
    pub fn recompute(&mut self, catalog: &Catalog) -> Result<Option<JobCost>, EstimateError> {
        if self.recomputing {
            tracing::debug!("recompute already in progress, dropping nested call");
            return Ok(None);
        }
        self.recomputing = true;
        let result = self.recompute_inner(catalog);
        self.recomputing = false;
        match result {
            Ok(cost) => Ok(Some(cost)),
            Err(err) => {
                tracing::error!(%err, "recompute failed");
                Err(err)
            }
        }
    }

    fn recompute_inner(&mut self, catalog: &Catalog) -> Result<JobCost, EstimateError> {
        let mut outputs = quantity::compute(&self.inputs, self.area_rule, catalog)?;
        if let Some(labor) = self.labor_override {
            outputs.labor_cost = labor.round_dp(2);
        }
        let trade = pricing::price_trade(&self.inputs, &outputs, catalog)?;
        let overhead_rate = self
            .overhead_rate
            .unwrap_or_else(|| catalog.overhead_rate_default());

        let cost = match self.lock {
            CostLock::GrossMargin => {
                financial::summarize(&trade, overhead_rate, self.target_gm, catalog.version())?
            }
            CostLock::Revenue => {
                let gm = derived_gm(trade.cogs(), self.locked_revenue);
                self.target_gm = gm;
                let revenue = self.locked_revenue;
                let overhead = revenue * overhead_rate;
                let commission = financial::commission_dollars(revenue, gm);
                let profit = revenue - trade.cogs() - overhead - commission;
                JobCost {
                    trade: trade.trade.clone(),
                    material_cost: trade.material_cost.round_dp(2),
                    labor_cost: trade.labor_cost.round_dp(2),
                    cogs: trade.cogs().round_dp(2),
                    overhead_rate,
                    target_gm: gm,
                    revenue_target: revenue.round_dp(2),
                    overhead_dollars: overhead.round_dp(2),
                    projected_profit: profit.round_dp(2),
                    gm_band: financial::gm_band(gm),
                    commission_total: commission.round_dp(2),
                    catalog_version: catalog.version().to_string(),
                }
            }
        };

        if self.baselines.is_empty() {
            self.baselines = Baselines::from_line_items(&trade.line_items);
        }
        self.outputs = Some(outputs);
        self.trade = Some(trade);
        self.cost = Some(cost.clone());
        Ok(cost)
    }
}

/// Gross margin implied by a pinned revenue, clamped to a sane range.
fn derived_gm(cogs: Decimal, revenue: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (Decimal::ONE - cogs / revenue)
        .max(Decimal::ZERO)
        .min(derived_gm_cap())
}
