use bidline_core::error::EstimateError;
use bidline_core::Estimate;

pub fn format_estimate(estimate: &Estimate) -> Result<String, EstimateError> {
    Ok(serde_json::to_string_pretty(estimate)?)
}
