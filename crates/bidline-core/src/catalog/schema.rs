use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk catalog document. Costs are JSON strings to keep exact decimal
/// values through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub version: String,
    pub overhead_rate_default: Decimal,
    pub target_gm_default: Decimal,
    /// Tier key used for surface-keyed trim items when the job does not
    /// specify one.
    #[serde(default = "default_trim_surface")]
    pub trim_default_surface: String,
    /// Labor $/SF keyed by siding type then region.
    pub labor_rates: BTreeMap<String, BTreeMap<String, Decimal>>,
    #[serde(default)]
    pub quantity_defaults: QuantityDefaults,
    pub items: BTreeMap<String, ItemDef>,
    pub assemblies: BTreeMap<String, AssemblyDef>,
}

fn default_trim_surface() -> String {
    "Rustic".to_string()
}

/// Named takeoff constants. Every value has a working default so catalogs
/// only list the ones they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityDefaults {
    /// Base waste fraction before complexity add-ons.
    pub base_waste: f64,
    /// Coverage of one house-wrap roll before waste, SF.
    pub wrap_roll_sf: f64,
    /// Nails per SF of siding at 1" exposure equivalent.
    pub nails_per_sf: f64,
    pub nails_per_box: u32,
    pub nail_waste: f64,
    /// Fraction of the raw coil count actually ordered.
    pub coil_reduction: f64,
    /// Coverage of one soffit panel, SF.
    pub soffit_panel_sf: f64,
    pub soffit_waste: f64,
    /// Coverage of one board-and-batten panel, SF.
    pub bb_panel_sf: f64,
    pub battens_per_panel: u32,
    /// Stock lengths for fascia and trim boards, feet.
    pub fascia_piece_len_ft: f64,
    pub trim_piece_len_ft: f64,
}

impl Default for QuantityDefaults {
    fn default() -> QuantityDefaults {
        QuantityDefaults {
            base_waste: 0.20,
            wrap_roll_sf: 1350.0,
            nails_per_sf: 10.0,
            nails_per_box: 2500,
            nail_waste: 0.10,
            coil_reduction: 0.5,
            soffit_panel_sf: 40.0,
            soffit_waste: 0.10,
            bb_panel_sf: 40.0,
            battens_per_panel: 3,
            fascia_piece_len_ft: 12.0,
            trim_piece_len_ft: 12.0,
        }
    }
}

/// One priced material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    /// Display name; `{w}` expands to the fascia width in inches.
    pub name: String,
    pub uom: String,
    /// Cost per region. A region maps to a flat cost or a tier table keyed
    /// by finish, surface, or fascia width (`w4`..`w12`).
    pub cost: BTreeMap<String, CostEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostEntry {
    Flat(Decimal),
    Tiered(BTreeMap<String, Decimal>),
}

/// A bill-of-materials template walked by the pricer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyDef {
    pub includes: Vec<IncludeDef>,
    /// Extra rows added only for factory-color finishes.
    #[serde(default)]
    pub colorplus_extras: Vec<IncludeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeDef {
    pub item: String,
    /// Either a literal number or `outputs.<field>` referencing a computed
    /// quantity.
    pub qty: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_entry_untagged() {
        let flat: CostEntry = serde_json::from_str("\"18.50\"").unwrap();
        assert!(matches!(flat, CostEntry::Flat(_)));

        let tiered: CostEntry =
            serde_json::from_str(r#"{"ColorPlus": "21.00", "Primed": "14.25"}"#).unwrap();
        match tiered {
            CostEntry::Tiered(map) => assert_eq!(map.len(), 2),
            CostEntry::Flat(_) => panic!("expected tier table"),
        }
    }

    #[test]
    fn test_quantity_defaults_partial_override() {
        let d: QuantityDefaults = serde_json::from_str(r#"{"base_waste": 0.25}"#).unwrap();
        assert_eq!(d.base_waste, 0.25);
        assert_eq!(d.nails_per_box, 2500);
        assert_eq!(d.coil_reduction, 0.5);
    }
}
