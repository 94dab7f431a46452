//! Siding-bid estimating core: measurement-report parsing, quantity
//! takeoff, catalog pricing, and the financial model behind a bid.
//!
//! The pipeline runs text → [`model::ParsedReport`] → [`model::JobInputs`] →
//! [`model::JobOutputs`] → [`model::TradeCost`] → [`model::JobCost`]. Each
//! stage is callable on its own; [`estimate_text`] runs the whole thing.

pub mod catalog;
pub mod error;
pub mod extraction;
pub mod financial;
pub mod model;
pub mod parsing;
pub mod pricing;
pub mod quantity;
pub mod region;
pub mod session;
pub mod snapshot;

pub use error::EstimateError;

use catalog::Catalog;
use model::{
    AreaRule, Complexity, Finish, JobCost, JobInputs, JobOutputs, ParsedReport, SidingType,
    Substrate, TradeCost,
};
use rust_decimal::Decimal;
use std::path::Path;

/// Job parameters not present in the report text.
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub area_rule: AreaRule,
    pub siding_type: SidingType,
    pub finish: Finish,
    pub complexity: Complexity,
    pub substrate: Substrate,
    pub demo_required: bool,
    pub extra_layers: u32,
    pub body_color: String,
    pub trim_color: String,
    pub fascia_width_in: u32,
    pub lap_reveal_in: Option<f64>,
    pub soffit_depth_gt_24: bool,
    pub soffit_enabled: bool,
    pub osb_selected: bool,
    pub osb_area_override_sf: Option<f64>,
    /// Overrides ZIP-based region resolution when set.
    pub region_hint: Option<String>,
    pub target_gm: Option<Decimal>,
    pub overhead_rate: Option<Decimal>,
}

impl Default for EstimateConfig {
    fn default() -> EstimateConfig {
        let base = JobInputs::default();
        EstimateConfig {
            area_rule: AreaRule::Max,
            siding_type: base.siding_type,
            finish: base.finish,
            complexity: base.complexity,
            substrate: base.substrate,
            demo_required: base.demo_required,
            extra_layers: base.extra_layers,
            body_color: base.body_color,
            trim_color: base.trim_color,
            fascia_width_in: base.fascia_width_in,
            lap_reveal_in: base.lap_reveal_in,
            soffit_depth_gt_24: base.soffit_depth_gt_24,
            soffit_enabled: base.soffit_enabled,
            osb_selected: base.osb_selected,
            osb_area_override_sf: base.osb_area_override_sf,
            region_hint: None,
            target_gm: None,
            overhead_rate: None,
        }
    }
}

/// Full result of one estimating run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Estimate {
    pub report: ParsedReport,
    pub inputs: JobInputs,
    pub outputs: JobOutputs,
    pub trade: TradeCost,
    pub cost: JobCost,
}

/// Read a report's text: PDFs go through the extractor chain, plain-text
/// files pass through unchanged (fixtures, pre-extracted exports).
pub fn read_report_text(path: &Path) -> Result<String, EstimateError> {
    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_text {
        return Ok(std::fs::read_to_string(path)?);
    }
    Ok(extraction::ExtractorChain::default().extract_text(path, extraction::DEFAULT_MAX_PAGES))
}

/// Parse report text into identity and measurement totals. Never fails.
pub fn parse_report(text: &str) -> ParsedReport {
    parsing::parse(text)
}

/// Combine a parsed report with job configuration into estimate inputs.
pub fn build_inputs(report: &ParsedReport, config: &EstimateConfig) -> JobInputs {
    let region = region::resolve(config.region_hint.as_deref(), &report.identity.zip);
    JobInputs {
        customer_name: report.identity.name.clone(),
        street: report.identity.street.clone(),
        city_state_zip: report.identity.city_state_zip.clone(),
        region,
        siding_type: config.siding_type,
        finish: config.finish,
        body_color: config.body_color.clone(),
        trim_color: config.trim_color.clone(),
        complexity: config.complexity,
        demo_required: config.demo_required,
        extra_layers: config.extra_layers,
        substrate: config.substrate,
        facade_sf: report.totals.facade_sf,
        trim_sf: report.totals.trim_sf,
        eave_fascia_lf: report.totals.eave_fascia_lf,
        rake_fascia_lf: report.totals.rake_fascia_lf,
        openings_perimeter_lf: report.totals.openings_perimeter_lf,
        outside_corners_lf: report.totals.outside_corners_lf,
        inside_corners_lf: report.totals.inside_corners_lf,
        fascia_width_in: config.fascia_width_in,
        soffit_depth_gt_24: config.soffit_depth_gt_24,
        soffit_enabled: config.soffit_enabled,
        osb_selected: config.osb_selected,
        osb_area_override_sf: config.osb_area_override_sf,
        lap_reveal_in: config.lap_reveal_in,
    }
}

/// Run the whole pipeline over already-extracted text.
pub fn estimate_text(
    text: &str,
    config: &EstimateConfig,
    catalog: &Catalog,
) -> Result<Estimate, EstimateError> {
    let report = parse_report(text);
    if report.totals.parse_warning {
        tracing::warn!("no siding area found in report text");
    }
    let inputs = build_inputs(&report, config);
    tracing::info!(
        customer = %inputs.customer_name,
        region = %inputs.region,
        total_sf = inputs.facade_sf.max(inputs.trim_sf),
        "estimating job"
    );
    let outputs = quantity::compute(&inputs, config.area_rule, catalog)?;
    let trade = pricing::price_trade(&inputs, &outputs, catalog)?;
    let cost = financial::summarize(
        &trade,
        config.overhead_rate.unwrap_or_else(|| catalog.overhead_rate_default()),
        config.target_gm.unwrap_or_else(|| catalog.target_gm_default()),
        catalog.version(),
    )?;
    Ok(Estimate {
        report,
        inputs,
        outputs,
        trade,
        cost,
    })
}

/// Extract, parse, and estimate a report file.
pub fn estimate_file(
    path: &Path,
    config: &EstimateConfig,
    catalog: &Catalog,
) -> Result<Estimate, EstimateError> {
    let text = read_report_text(path)?;
    estimate_text(&text, config, catalog)
}
