use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service region used for labor rates and catalog price tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Metro,
    NorthCo,
    Mountains,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Metro => write!(f, "Metro"),
            Region::NorthCo => write!(f, "North CO"),
            Region::Mountains => write!(f, "Mountains"),
        }
    }
}

impl Region {
    pub fn from_str_loose(s: &str) -> Option<Region> {
        match s.trim().to_lowercase().as_str() {
            "metro" | "main" | "denver" | "front range" => Some(Region::Metro),
            "north" | "north co" | "north colorado" | "noco" => Some(Region::NorthCo),
            "mountain" | "mountains" | "mt" => Some(Region::Mountains),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidingType {
    Lap,
    BoardAndBatten,
    Shake,
}

impl fmt::Display for SidingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SidingType::Lap => write!(f, "Lap"),
            SidingType::BoardAndBatten => write!(f, "Board & Batten"),
            SidingType::Shake => write!(f, "Shake"),
        }
    }
}

impl SidingType {
    pub fn from_str_loose(s: &str) -> Option<SidingType> {
        let lower = s.trim().to_lowercase();
        if lower.contains("board") && lower.contains("batten") {
            Some(SidingType::BoardAndBatten)
        } else if lower.contains("shake") || lower.contains("shingle") {
            Some(SidingType::Shake)
        } else if lower.contains("lap") {
            Some(SidingType::Lap)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finish {
    ColorPlus,
    Primed,
    Woodtone,
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finish::ColorPlus => write!(f, "ColorPlus"),
            Finish::Primed => write!(f, "Primed"),
            Finish::Woodtone => write!(f, "Woodtone"),
        }
    }
}

impl Finish {
    pub fn from_str_loose(s: &str) -> Option<Finish> {
        match s.trim().to_lowercase().as_str() {
            "colorplus" | "color plus" | "cp" => Some(Finish::ColorPlus),
            "primed" | "prime" => Some(Finish::Primed),
            "woodtone" | "wood tone" => Some(Finish::Woodtone),
            _ => None,
        }
    }

    /// Factory-colored finishes get per-color coil rows and no field paint.
    pub fn is_factory_color(self) -> bool {
        matches!(self, Finish::ColorPlus | Finish::Woodtone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Med,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "Low"),
            Complexity::Med => write!(f, "Med"),
            Complexity::High => write!(f, "High"),
        }
    }
}

impl Complexity {
    pub fn from_str_loose(s: &str) -> Option<Complexity> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Complexity::Low),
            "med" | "medium" => Some(Complexity::Med),
            "high" => Some(Complexity::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Substrate {
    Wood,
    Brick,
    Stucco,
}

impl Substrate {
    pub fn from_str_loose(s: &str) -> Option<Substrate> {
        match s.trim().to_lowercase().as_str() {
            "wood" | "osb" | "plywood" => Some(Substrate::Wood),
            "brick" => Some(Substrate::Brick),
            "stucco" => Some(Substrate::Stucco),
            _ => None,
        }
    }

    /// Brick and stucco substrates carry a labor add-on per square.
    pub fn is_masonry(self) -> bool {
        matches!(self, Substrate::Brick | Substrate::Stucco)
    }
}

/// How facade SF and trim SF compose into the siding area used downstream.
///
/// Explicit configuration; never inferred from report content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaRule {
    Max,
    Sum,
}

impl AreaRule {
    pub fn from_str_loose(s: &str) -> Option<AreaRule> {
        match s.trim().to_lowercase().as_str() {
            "max" => Some(AreaRule::Max),
            "sum" => Some(AreaRule::Sum),
            _ => None,
        }
    }

    pub fn apply(self, facade_sf: f64, trim_sf: f64) -> f64 {
        match self {
            AreaRule::Max => facade_sf.max(trim_sf),
            AreaRule::Sum => facade_sf + trim_sf,
        }
    }
}

/// Gross-margin band label for the costs summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GmBand {
    Low,
    Mid,
    High,
}

impl fmt::Display for GmBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GmBand::Low => write!(f, "LOW"),
            GmBand::Mid => write!(f, "MID"),
            GmBand::High => write!(f, "HIGH"),
        }
    }
}

/// Customer name and address extracted from the report header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub street: String,
    pub city_state_zip: String,
    pub zip: String,
}

impl CustomerIdentity {
    /// "NAME — Street, City ST ZIP" job title, appending the ZIP when the
    /// address line lacks one.
    pub fn display_title(&self) -> String {
        let mut addr = format!("{}, {}", self.street.trim(), self.city_state_zip.trim());
        let addr_trimmed = addr.trim_matches(|c: char| c == ',' || c.is_whitespace());
        addr = addr_trimmed.to_string();
        if !self.zip.is_empty() && !addr.contains(&self.zip) {
            addr = format!("{} {}", addr, self.zip).trim().to_string();
        }
        if addr.is_empty() {
            self.name.clone()
        } else {
            format!("{} — {}", self.name, addr)
        }
    }
}

/// Measurement totals extracted from the report text.
///
/// Missing metrics are zero, never absent; `parse_warning` flags a report
/// where the key metrics could not be located.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasuredTotals {
    pub facade_sf: f64,
    pub trim_sf: f64,
    pub eave_fascia_lf: f64,
    pub rake_fascia_lf: f64,
    pub openings_perimeter_lf: f64,
    pub outside_corners_lf: f64,
    pub inside_corners_lf: f64,
    /// Corner vocabulary was present in the text.
    pub corners_referenced: bool,
    /// Corners referenced but no usable length found for either type.
    pub corner_warning: bool,
    /// No usable siding area found anywhere in the report.
    pub parse_warning: bool,
}

/// Result of parsing one report's text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedReport {
    pub identity: CustomerIdentity,
    pub totals: MeasuredTotals,
}

/// All parameters of one estimate. Built once per job and read-only after;
/// edits produce a fresh `JobInputs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInputs {
    pub customer_name: String,
    pub street: String,
    pub city_state_zip: String,
    pub region: Region,
    pub siding_type: SidingType,
    pub finish: Finish,
    pub body_color: String,
    pub trim_color: String,
    pub complexity: Complexity,
    pub demo_required: bool,
    pub extra_layers: u32,
    pub substrate: Substrate,
    pub facade_sf: f64,
    pub trim_sf: f64,
    pub eave_fascia_lf: f64,
    pub rake_fascia_lf: f64,
    pub openings_perimeter_lf: f64,
    pub outside_corners_lf: f64,
    pub inside_corners_lf: f64,
    pub fascia_width_in: u32,
    pub soffit_depth_gt_24: bool,
    pub soffit_enabled: bool,
    pub osb_selected: bool,
    pub osb_area_override_sf: Option<f64>,
    pub lap_reveal_in: Option<f64>,
}

impl Default for JobInputs {
    fn default() -> Self {
        JobInputs {
            customer_name: String::new(),
            street: String::new(),
            city_state_zip: String::new(),
            region: Region::Metro,
            siding_type: SidingType::Lap,
            finish: Finish::ColorPlus,
            body_color: String::new(),
            trim_color: String::new(),
            complexity: Complexity::Low,
            demo_required: true,
            extra_layers: 0,
            substrate: Substrate::Wood,
            facade_sf: 0.0,
            trim_sf: 0.0,
            eave_fascia_lf: 0.0,
            rake_fascia_lf: 0.0,
            openings_perimeter_lf: 0.0,
            outside_corners_lf: 0.0,
            inside_corners_lf: 0.0,
            fascia_width_in: 6,
            soffit_depth_gt_24: false,
            soffit_enabled: true,
            osb_selected: false,
            osb_area_override_sf: None,
            lap_reveal_in: None,
        }
    }
}

/// Quantities and labor derived from `JobInputs` by the quantity engine.
/// Purely derived; never edited directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOutputs {
    pub total_sf: f64,
    pub total_squares: u32,
    pub boards: u32,
    pub wrap_rolls: u32,
    pub tape_rolls: u32,
    pub nail_boxes: u32,
    pub coil_rolls: u32,
    pub flash_tape_rolls: u32,
    pub soffit_panels: u32,
    pub fascia_pieces: u32,
    pub trim4_pieces: u32,
    pub trim6_pieces: u32,
    pub trim8_pieces: u32,
    pub trim12_pieces: u32,
    pub paint_quarts: u32,
    pub osb_sheets: u32,
    pub osb_fastener_boxes: u32,
    pub labor_rate_per_sf: Decimal,
    pub labor_per_square: Decimal,
    pub labor_cost: Decimal,
    /// Reveal actually used after snapping to the catalog table.
    pub lap_reveal_in: f64,
    pub lap_nominal_width_in: f64,
}

impl JobOutputs {
    /// Look up an output quantity by the field name used in catalog
    /// assembly quantity expressions (`outputs.<name>`).
    pub fn quantity_field(&self, name: &str) -> Option<f64> {
        let v = match name {
            "total_sf" => self.total_sf,
            "total_squares" => f64::from(self.total_squares),
            "boards" => f64::from(self.boards),
            "wrap_rolls" => f64::from(self.wrap_rolls),
            "tape_rolls" => f64::from(self.tape_rolls),
            "nail_boxes" => f64::from(self.nail_boxes),
            "coil_rolls" => f64::from(self.coil_rolls),
            "flash_tape_rolls" => f64::from(self.flash_tape_rolls),
            "soffit_panels" => f64::from(self.soffit_panels),
            "fascia_pieces" => f64::from(self.fascia_pieces),
            "trim4_pieces" => f64::from(self.trim4_pieces),
            "trim6_pieces" => f64::from(self.trim6_pieces),
            "trim8_pieces" => f64::from(self.trim8_pieces),
            "trim12_pieces" => f64::from(self.trim12_pieces),
            "paint_quarts" => f64::from(self.paint_quarts),
            "osb_sheets" => f64::from(self.osb_sheets),
            "osb_fastener_boxes" => f64::from(self.osb_fastener_boxes),
            _ => return None,
        };
        Some(v)
    }
}

/// One priced material row. The single line-item type used across parsing,
/// pricing, the session, and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog item key (stable identifier).
    pub item: String,
    /// Display name.
    pub name: String,
    pub qty: f64,
    pub uom: String,
    pub unit_cost: Decimal,
    pub ext_cost: Decimal,
}

impl LineItem {
    pub fn new(item: &str, name: &str, qty: f64, uom: &str, unit_cost: Decimal) -> LineItem {
        let ext = (unit_cost * Decimal::from_f64_retain(qty).unwrap_or_default()).round_dp(2);
        LineItem {
            item: item.to_string(),
            name: name.to_string(),
            qty,
            uom: uom.to_string(),
            unit_cost,
            ext_cost: ext,
        }
    }
}

/// Material + labor cost for one trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCost {
    pub trade: String,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub line_items: Vec<LineItem>,
}

impl TradeCost {
    pub fn cogs(&self) -> Decimal {
        self.material_cost + self.labor_cost
    }
}

/// Financial rollup for one job at a chosen target gross margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCost {
    pub trade: String,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub cogs: Decimal,
    pub overhead_rate: Decimal,
    pub target_gm: Decimal,
    pub revenue_target: Decimal,
    pub overhead_dollars: Decimal,
    pub projected_profit: Decimal,
    pub gm_band: GmBand,
    pub commission_total: Decimal,
    /// Catalog version the prices came from (determinism requirement).
    pub catalog_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_str_loose() {
        assert_eq!(Region::from_str_loose("Denver"), Some(Region::Metro));
        assert_eq!(Region::from_str_loose("noco"), Some(Region::NorthCo));
        assert_eq!(Region::from_str_loose("MOUNTAINS"), Some(Region::Mountains));
        assert_eq!(Region::from_str_loose("tundra"), None);
    }

    #[test]
    fn test_siding_type_from_str_loose() {
        assert_eq!(
            SidingType::from_str_loose("Board and Batten"),
            Some(SidingType::BoardAndBatten)
        );
        assert_eq!(SidingType::from_str_loose("lap"), Some(SidingType::Lap));
        assert_eq!(SidingType::from_str_loose("Shake"), Some(SidingType::Shake));
    }

    #[test]
    fn test_area_rule_apply() {
        assert_eq!(AreaRule::Max.apply(1000.0, 200.0), 1000.0);
        assert_eq!(AreaRule::Sum.apply(1000.0, 200.0), 1200.0);
    }

    #[test]
    fn test_display_title_appends_zip() {
        let id = CustomerIdentity {
            name: "JANE ROE".into(),
            street: "412 Alder Ct".into(),
            city_state_zip: "Golden, CO".into(),
            zip: "80401".into(),
        };
        assert_eq!(id.display_title(), "JANE ROE — 412 Alder Ct, Golden, CO 80401");
    }

    #[test]
    fn test_quantity_field_lookup() {
        let out = JobOutputs {
            wrap_rolls: 3,
            total_sf: 2150.25,
            ..JobOutputs::default()
        };
        assert_eq!(out.quantity_field("wrap_rolls"), Some(3.0));
        assert_eq!(out.quantity_field("total_sf"), Some(2150.25));
        assert_eq!(out.quantity_field("no_such_field"), None);
    }

    #[test]
    fn test_line_item_extends_cost() {
        let li = LineItem::new("wrap_roll", "House Wrap", 3.0, "RL", Decimal::new(16550, 2));
        assert_eq!(li.ext_cost, Decimal::new(49650, 2));
    }
}
