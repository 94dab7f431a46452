use std::path::PathBuf;

use crate::output;
use bidline_core::error::EstimateError;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), EstimateError> {
    let text = bidline_core::read_report_text(&input_file)?;
    let report = bidline_core::parse_report(&text);

    let output_str = match output_format {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => output::table::format_parsed(&report),
    };

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(&path, json)?;
            eprintln!("Parsed report written to {}", path.display());
            if report.totals.parse_warning {
                eprintln!("  warning: no siding area found in report");
            }
            if report.totals.corner_warning {
                eprintln!("  warning: corners referenced but no lengths found");
            }
        }
        None => {
            println!("{output_str}");
        }
    }

    Ok(())
}
