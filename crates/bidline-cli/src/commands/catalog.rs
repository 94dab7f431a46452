use std::path::{Path, PathBuf};

use bidline_core::catalog::Catalog;
use bidline_core::error::EstimateError;
use bidline_core::model::{Region, SidingType};

pub fn show(file: Option<PathBuf>) -> Result<(), EstimateError> {
    let (catalog, source) = match file {
        Some(path) => (Catalog::load(&path)?, path.display().to_string()),
        None => (Catalog::builtin(), "builtin".to_string()),
    };

    println!("Catalog: {source}");
    println!("  version:        {}", catalog.version());
    println!("  overhead rate:  {}", catalog.overhead_rate_default());
    println!("  target GM:      {}", catalog.target_gm_default());
    println!();
    println!("Labor rates ($/SF):");
    for siding in [SidingType::Lap, SidingType::BoardAndBatten, SidingType::Shake] {
        let mut parts = Vec::new();
        for region in [Region::Metro, Region::NorthCo, Region::Mountains] {
            let rate = catalog.labor_rate_for(siding, region)?;
            parts.push(format!("{region}: {rate}"));
        }
        println!("  {:<16} {}", siding.to_string(), parts.join("  "));
    }
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), EstimateError> {
    match Catalog::load(file) {
        Ok(catalog) => {
            println!(
                "{} is valid (version {})",
                file.display(),
                catalog.version()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} is INVALID:", file.display());
            println!("  {e}");
            std::process::exit(1);
        }
    }
}
