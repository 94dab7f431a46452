use std::path::PathBuf;

use crate::output;
use bidline_core::catalog::Catalog;
use bidline_core::error::EstimateError;
use bidline_core::model::{AreaRule, Complexity, Finish, SidingType};
use bidline_core::session::EstimateSession;
use bidline_core::snapshot::JobSnapshot;
use bidline_core::EstimateConfig;
use rust_decimal::Decimal;

pub struct Args {
    pub input_file: PathBuf,
    pub catalog: Option<PathBuf>,
    pub siding: String,
    pub finish: String,
    pub complexity: String,
    pub region: Option<String>,
    pub area_rule: String,
    pub gm: Option<String>,
    pub reveal: Option<f64>,
    pub body_color: String,
    pub trim_color: String,
    pub output: String,
    pub out: Option<PathBuf>,
}

fn bad_arg(what: &str, value: &str) -> EstimateError {
    EstimateError::Compute(format!("unrecognized {what} '{value}'"))
}

pub fn run(args: Args) -> Result<(), EstimateError> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    let config = EstimateConfig {
        siding_type: SidingType::from_str_loose(&args.siding)
            .ok_or_else(|| bad_arg("siding type", &args.siding))?,
        finish: Finish::from_str_loose(&args.finish)
            .ok_or_else(|| bad_arg("finish", &args.finish))?,
        complexity: Complexity::from_str_loose(&args.complexity)
            .ok_or_else(|| bad_arg("complexity", &args.complexity))?,
        area_rule: AreaRule::from_str_loose(&args.area_rule)
            .ok_or_else(|| bad_arg("area rule", &args.area_rule))?,
        region_hint: args.region.clone(),
        target_gm: args
            .gm
            .as_deref()
            .map(|s| {
                s.parse::<Decimal>()
                    .map_err(|_| bad_arg("gross margin", s))
            })
            .transpose()?,
        lap_reveal_in: args.reveal,
        body_color: args.body_color.clone(),
        trim_color: args.trim_color.clone(),
        ..EstimateConfig::default()
    };

    let estimate = bidline_core::estimate_file(&args.input_file, &config, &catalog)?;

    let output_str = match args.output.as_str() {
        "json" => output::json::format_estimate(&estimate)?,
        _ => output::table::format_estimate(&estimate),
    };
    println!("{output_str}");

    if let Some(path) = args.out {
        // The saved artifact is the reopenable snapshot, not the display form.
        let mut session = EstimateSession::new(
            estimate.inputs.clone(),
            config.area_rule,
            estimate.cost.target_gm,
        );
        session.set_overhead_rate(estimate.cost.overhead_rate);
        session.recompute(&catalog)?;
        let snapshot = JobSnapshot::capture(&session)?;
        std::fs::write(&path, snapshot.to_json()?)?;
        eprintln!("Snapshot written to {}", path.display());
    }

    if estimate.report.totals.parse_warning {
        eprintln!("warning: no siding area found in report");
    }
    if estimate.report.totals.corner_warning {
        eprintln!("warning: corners referenced but no lengths found");
    }

    Ok(())
}
