//! Job snapshots: the persisted form of one estimate.
//!
//! A snapshot carries everything needed to reopen a job offline (inputs,
//! derived quantities, priced rows, financial summary) and enough to
//! regenerate costs against a newer catalog.

use crate::catalog::Catalog;
use crate::error::EstimateError;
use crate::financial;
use crate::model::{AreaRule, JobCost, JobInputs, JobOutputs, LineItem};
use crate::pricing;
use crate::quantity;
use crate::session::{Baselines, EstimateSession};
use serde::{Deserialize, Serialize};

/// Financial summary plus the priced rows it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostsBlock {
    #[serde(flatten)]
    pub summary: JobCost,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub inputs: JobInputs,
    pub outputs: JobOutputs,
    pub costs: CostsBlock,
    pub area_rule: AreaRule,
}

impl JobSnapshot {
    /// Capture a session that has a completed recompute.
    pub fn capture(session: &EstimateSession) -> Result<JobSnapshot, EstimateError> {
        let outputs = session
            .outputs()
            .ok_or_else(|| EstimateError::Compute("session has no computed outputs".into()))?;
        let trade = session
            .trade_cost()
            .ok_or_else(|| EstimateError::Compute("session has no priced trade".into()))?;
        let summary = session
            .cost()
            .ok_or_else(|| EstimateError::Compute("session has no cost summary".into()))?;
        Ok(JobSnapshot {
            inputs: session.inputs.clone(),
            outputs: outputs.clone(),
            costs: CostsBlock {
                summary: summary.clone(),
                line_items: trade.line_items.clone(),
            },
            area_rule: session.area_rule,
        })
    }

    pub fn to_json(&self) -> Result<String, EstimateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<JobSnapshot, EstimateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Re-derive outputs and costs from the stored inputs against the given
    /// catalog, keeping the stored overhead rate and target margin. Used when
    /// a catalog update should reprice an old job.
    pub fn regenerate_costs(&mut self, catalog: &Catalog) -> Result<(), EstimateError> {
        let outputs = quantity::compute(&self.inputs, self.area_rule, catalog)?;
        let trade = pricing::price_trade(&self.inputs, &outputs, catalog)?;
        let summary = financial::summarize(
            &trade,
            self.costs.summary.overhead_rate,
            self.costs.summary.target_gm,
            catalog.version(),
        )?;
        self.outputs = outputs;
        self.costs = CostsBlock {
            summary,
            line_items: trade.line_items,
        };
        Ok(())
    }

    /// Baselines rebuilt from the persisted rows.
    pub fn rebuild_baselines(&self) -> Baselines {
        Baselines::from_line_items(&self.costs.line_items)
    }

    /// Reopen the snapshot as a live session with baselines restored.
    pub fn into_session(self) -> EstimateSession {
        let mut session =
            EstimateSession::new(self.inputs, self.area_rule, self.costs.summary.target_gm);
        session.set_overhead_rate(self.costs.summary.overhead_rate);
        session.restore_baselines(&self.costs.line_items);
        session
    }
}
