mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bidline",
    version,
    about = "Siding bid estimator: measurement reports in, priced bids out"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a measurement report (PDF or extracted text) without pricing
    Parse {
        /// Path to PDF or .txt file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Produce a full estimate from a measurement report
    Estimate {
        /// Path to PDF or .txt file
        input_file: PathBuf,

        /// Custom catalog JSON file (default: builtin catalog)
        #[arg(short, long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Siding type: lap, board-and-batten, shake
        #[arg(long, default_value = "lap")]
        siding: String,

        /// Finish: colorplus, primed, woodtone
        #[arg(long, default_value = "colorplus")]
        finish: String,

        /// Job complexity: low, med, high
        #[arg(long, default_value = "low")]
        complexity: String,

        /// Region override (metro, north co, mountains); default: from ZIP
        #[arg(long)]
        region: Option<String>,

        /// How facade and trim SF combine: max (default) or sum
        #[arg(long, default_value = "max")]
        area_rule: String,

        /// Target gross margin, e.g. 0.35 (default: catalog)
        #[arg(long)]
        gm: Option<String>,

        /// Lap reveal in inches (snapped to stocked reveals)
        #[arg(long)]
        reveal: Option<f64>,

        /// Body color name for factory-color coil rows
        #[arg(long, default_value = "")]
        body_color: String,

        /// Trim color name for factory-color coil rows
        #[arg(long, default_value = "")]
        trim_color: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the full job snapshot to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect and validate pricing catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Summarize a catalog (version, item and assembly counts)
    Show {
        /// Catalog JSON file (default: builtin catalog)
        file: Option<PathBuf>,
    },
    /// Validate a catalog file
    Validate {
        /// Path to catalog JSON file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
        } => commands::parse::run(input_file, &output, out),
        Commands::Estimate {
            input_file,
            catalog,
            siding,
            finish,
            complexity,
            region,
            area_rule,
            gm,
            reveal,
            body_color,
            trim_color,
            output,
            out,
        } => commands::estimate::run(commands::estimate::Args {
            input_file,
            catalog,
            siding,
            finish,
            complexity,
            region,
            area_rule,
            gm,
            reveal,
            body_color,
            trim_color,
            output,
            out,
        }),
        Commands::Catalog { action } => match action {
            CatalogAction::Show { file } => commands::catalog::show(file),
            CatalogAction::Validate { file } => commands::catalog::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
