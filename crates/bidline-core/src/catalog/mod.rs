//! Pricing catalog: items, regional costs, labor rates, and assemblies.
//!
//! Catalogs are JSON documents validated on load. A builtin catalog ships in
//! the binary so the tool works before anyone writes a custom one.

pub mod schema;
mod service;

pub use schema::{AssemblyDef, CatalogDef, CostEntry, IncludeDef, ItemDef, QuantityDefaults};
pub use service::{CatalogService, FsModTime, ModTimeSource};

use crate::error::EstimateError;
use crate::model::{Finish, JobOutputs, Region, SidingType};
use rust_decimal::Decimal;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../../../catalogs/default.json");

/// Fascia width tiers run w4 through w12; requests outside that range clamp.
const FASCIA_WIDTH_MIN: u32 = 4;
const FASCIA_WIDTH_MAX: u32 = 12;

pub fn region_key(region: Region) -> &'static str {
    match region {
        Region::Metro => "Metro",
        Region::NorthCo => "NorthCo",
        Region::Mountains => "Mountains",
    }
}

pub fn siding_key(siding: SidingType) -> &'static str {
    match siding {
        SidingType::Lap => "Lap",
        SidingType::BoardAndBatten => "BoardAndBatten",
        SidingType::Shake => "Shake",
    }
}

/// Tier lookups carried into a unit-cost request.
#[derive(Debug, Clone, Copy)]
pub struct PriceContext<'a> {
    pub finish: Finish,
    pub fascia_width_in: u32,
    pub surface: &'a str,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    def: CatalogDef,
}

impl Catalog {
    pub fn parse(json: &str) -> Result<Catalog, EstimateError> {
        let def: CatalogDef = serde_json::from_str(json)
            .map_err(|e| EstimateError::CatalogInvalid(e.to_string()))?;
        let catalog = Catalog { def };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Catalog, EstimateError> {
        let json = std::fs::read_to_string(path).map_err(|e| EstimateError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Catalog::parse(&json).map_err(|e| EstimateError::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Catalog {
        Catalog::parse(BUILTIN_CATALOG).expect("builtin catalog must be valid")
    }

    fn validate(&self) -> Result<(), EstimateError> {
        if self.def.version.trim().is_empty() {
            return Err(EstimateError::CatalogInvalid("version is empty".into()));
        }
        if self.def.items.is_empty() {
            return Err(EstimateError::CatalogInvalid("no items defined".into()));
        }
        for siding in [SidingType::Lap, SidingType::BoardAndBatten, SidingType::Shake] {
            let by_region = self.def.labor_rates.get(siding_key(siding)).ok_or_else(|| {
                EstimateError::CatalogInvalid(format!(
                    "labor_rates missing siding type '{}'",
                    siding_key(siding)
                ))
            })?;
            for region in [Region::Metro, Region::NorthCo, Region::Mountains] {
                if !by_region.contains_key(region_key(region)) {
                    return Err(EstimateError::CatalogInvalid(format!(
                        "labor_rates['{}'] missing region '{}'",
                        siding_key(siding),
                        region_key(region)
                    )));
                }
            }
        }
        let probe = JobOutputs::default();
        for (name, assembly) in &self.def.assemblies {
            for inc in assembly.includes.iter().chain(&assembly.colorplus_extras) {
                if !self.def.items.contains_key(&inc.item) {
                    return Err(EstimateError::CatalogInvalid(format!(
                        "assembly '{}' references unknown item '{}'",
                        name, inc.item
                    )));
                }
                if let Some(field) = inc.qty.strip_prefix("outputs.") {
                    if probe.quantity_field(field).is_none() {
                        return Err(EstimateError::CatalogInvalid(format!(
                            "assembly '{}' item '{}' references unknown output '{}'",
                            name, inc.item, field
                        )));
                    }
                } else if inc.qty.trim().parse::<f64>().is_err() {
                    return Err(EstimateError::CatalogInvalid(format!(
                        "assembly '{}' item '{}' has invalid qty '{}'",
                        name, inc.item, inc.qty
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.def.version
    }

    pub fn overhead_rate_default(&self) -> Decimal {
        self.def.overhead_rate_default
    }

    pub fn target_gm_default(&self) -> Decimal {
        self.def.target_gm_default
    }

    pub fn trim_default_surface(&self) -> &str {
        &self.def.trim_default_surface
    }

    pub fn quantity_defaults(&self) -> &QuantityDefaults {
        &self.def.quantity_defaults
    }

    pub fn item(&self, key: &str) -> Option<&ItemDef> {
        self.def.items.get(key)
    }

    pub fn assembly(&self, name: &str) -> Result<&AssemblyDef, EstimateError> {
        self.def
            .assemblies
            .get(name)
            .ok_or_else(|| EstimateError::UnknownAssembly(name.to_string()))
    }

    pub fn labor_rate_for(
        &self,
        siding: SidingType,
        region: Region,
    ) -> Result<Decimal, EstimateError> {
        self.def
            .labor_rates
            .get(siding_key(siding))
            .and_then(|m| m.get(region_key(region)))
            .copied()
            .ok_or_else(|| {
                EstimateError::Compute(format!(
                    "no labor rate for {} in {}",
                    siding_key(siding),
                    region
                ))
            })
    }

    /// Display name with `{w}` expanded to the fascia width.
    pub fn display_name(&self, key: &str, fascia_width_in: u32) -> String {
        match self.item(key) {
            Some(item) => item
                .name
                .replace("{w}", &clamp_width(fascia_width_in).to_string()),
            None => key.to_string(),
        }
    }

    /// Resolve a unit cost. Tier tables resolve fascia-width key first, then
    /// finish, then surface. A missing price is a hard error naming the item,
    /// region, and tier context so the catalog can be fixed.
    pub fn unit_cost(
        &self,
        key: &str,
        region: Region,
        ctx: PriceContext<'_>,
    ) -> Result<Decimal, EstimateError> {
        let missing = |variant: String| EstimateError::MissingPrice {
            item: key.to_string(),
            region,
            variant,
        };
        let item = self.item(key).ok_or_else(|| missing(String::new()))?;
        let entry = item
            .cost
            .get(region_key(region))
            .ok_or_else(|| missing(String::new()))?;
        match entry {
            CostEntry::Flat(cost) => Ok(*cost),
            CostEntry::Tiered(tiers) => {
                let width_key = format!("w{}", clamp_width(ctx.fascia_width_in));
                if let Some(cost) = tiers.get(&width_key) {
                    return Ok(*cost);
                }
                if let Some(cost) = tiers.get(&ctx.finish.to_string()) {
                    return Ok(*cost);
                }
                if let Some(cost) = tiers.get(ctx.surface) {
                    return Ok(*cost);
                }
                Err(missing(format!(
                    " (finish={}, surface={}, width={})",
                    ctx.finish, ctx.surface, width_key
                )))
            }
        }
    }
}

fn clamp_width(width_in: u32) -> u32 {
    width_in.clamp(FASCIA_WIDTH_MIN, FASCIA_WIDTH_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    fn ctx() -> PriceContext<'static> {
        PriceContext {
            finish: Finish::ColorPlus,
            fascia_width_in: 6,
            surface: "Rustic",
        }
    }

    #[test]
    fn test_builtin_parses_and_validates() {
        let cat = catalog();
        assert!(!cat.version().is_empty());
        assert!(cat.item("siding_sf").is_some());
        assert!(cat.assembly("Siding").is_ok());
    }

    #[test]
    fn test_labor_rates_complete() {
        let cat = catalog();
        assert_eq!(
            cat.labor_rate_for(SidingType::Lap, Region::Metro).unwrap(),
            dec!(3.35)
        );
        assert_eq!(
            cat.labor_rate_for(SidingType::Shake, Region::Mountains).unwrap(),
            dec!(4.00)
        );
    }

    #[test]
    fn test_finish_tier_lookup() {
        let cat = catalog();
        let cp = cat.unit_cost("plank_8_25", Region::Metro, ctx()).unwrap();
        let primed = cat
            .unit_cost(
                "plank_8_25",
                Region::Metro,
                PriceContext {
                    finish: Finish::Primed,
                    ..ctx()
                },
            )
            .unwrap();
        assert!(cp > primed);
    }

    #[test]
    fn test_width_tier_clamps() {
        let cat = catalog();
        let w12 = cat
            .unit_cost(
                "fascia_12ft",
                Region::Metro,
                PriceContext {
                    fascia_width_in: 12,
                    ..ctx()
                },
            )
            .unwrap();
        let w14 = cat
            .unit_cost(
                "fascia_12ft",
                Region::Metro,
                PriceContext {
                    fascia_width_in: 14,
                    ..ctx()
                },
            )
            .unwrap();
        assert_eq!(w12, w14);
    }

    #[test]
    fn test_missing_price_is_hard_error() {
        let cat = catalog();
        let err = cat.unit_cost("no_such_item", Region::Metro, ctx()).unwrap_err();
        match err {
            EstimateError::MissingPrice { item, .. } => assert_eq!(item, "no_such_item"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_assembly() {
        let err = catalog().assembly("Roofing").unwrap_err();
        assert!(matches!(err, EstimateError::UnknownAssembly(_)));
    }

    #[test]
    fn test_invalid_assembly_reference_rejected() {
        let json = r#"{
            "version": "t1",
            "overhead_rate_default": "0.10",
            "target_gm_default": "0.35",
            "labor_rates": {
                "Lap": {"Metro": "3.35", "NorthCo": "3.50", "Mountains": "3.75"},
                "BoardAndBatten": {"Metro": "3.10", "NorthCo": "3.35", "Mountains": "3.50"},
                "Shake": {"Metro": "4.00", "NorthCo": "4.00", "Mountains": "4.00"}
            },
            "items": {"wrap_roll": {"name": "Wrap", "uom": "RL", "cost": {"Metro": "165.50"}}},
            "assemblies": {"Siding": {"includes": [{"item": "ghost", "qty": "1"}]}}
        }"#;
        let err = Catalog::parse(json).unwrap_err();
        assert!(matches!(err, EstimateError::CatalogInvalid(_)));
    }

    #[test]
    fn test_display_name_width_substitution() {
        let cat = catalog();
        let name = cat.display_name("trim44_6_12ft", 6);
        assert!(name.contains('6'), "got {name}");
    }
}
