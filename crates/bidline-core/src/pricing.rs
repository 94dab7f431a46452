//! Assembly pricing: walk the catalog's bill-of-materials template, resolve
//! quantities from the takeoff, and substitute siding-specific SKUs.

use crate::catalog::{Catalog, IncludeDef, PriceContext};
use crate::error::EstimateError;
use crate::model::{JobInputs, JobOutputs, LineItem, SidingType, TradeCost};
use crate::quantity;
use rust_decimal::Decimal;

/// Assembly walked for the siding trade.
pub const SIDING_ASSEMBLY: &str = "Siding";

/// Factory-color coil is ordered per color; each color row carries a quarter
/// of the total, floored at one roll.
const COIL_COLOR_SPLIT_DIVISOR: f64 = 4.0;

/// Trim boards never drop below a two-stick minimum.
const TRIM_MIN_PIECES: u32 = 2;

/// Resolve an include's quantity expression against the takeoff.
fn qty_from_expr(expr: &str, outputs: &JobOutputs) -> Result<f64, EstimateError> {
    if let Some(field) = expr.strip_prefix("outputs.") {
        outputs
            .quantity_field(field)
            .ok_or_else(|| EstimateError::Compute(format!("unknown output field '{field}'")))
    } else {
        expr.trim()
            .parse::<f64>()
            .map_err(|_| EstimateError::Compute(format!("invalid quantity expression '{expr}'")))
    }
}

/// Catalog item key for a lap plank of the given nominal width.
fn plank_item_key(nominal_width_in: f64) -> String {
    if nominal_width_in.fract() == 0.0 {
        format!("plank_{}", nominal_width_in as u32)
    } else {
        format!("plank_{}", format!("{nominal_width_in:.2}").replace('.', "_"))
    }
}

/// Price the siding trade for one job.
pub fn price_trade(
    inputs: &JobInputs,
    outputs: &JobOutputs,
    catalog: &Catalog,
) -> Result<TradeCost, EstimateError> {
    let assembly = catalog.assembly(SIDING_ASSEMBLY)?;
    let ctx = PriceContext {
        finish: inputs.finish,
        fascia_width_in: inputs.fascia_width_in,
        surface: catalog.trim_default_surface(),
    };
    let mut items: Vec<LineItem> = Vec::new();

    for inc in &assembly.includes {
        price_include(inputs, outputs, catalog, ctx, inc, &mut items)?;
    }
    if inputs.finish == crate::model::Finish::ColorPlus {
        for inc in &assembly.colorplus_extras {
            price_include(inputs, outputs, catalog, ctx, inc, &mut items)?;
        }
    }

    let material: Decimal = items.iter().map(|li| li.ext_cost).sum();

    // Labor passes through from the takeoff; recompute only if it is absent
    // (outputs built by hand or restored from a partial snapshot).
    let labor_cost = if outputs.labor_cost > Decimal::ZERO || outputs.total_squares == 0 {
        outputs.labor_cost
    } else {
        let (_, _, labor) = quantity::labor_for(inputs, outputs.total_squares, catalog)?;
        labor
    };

    Ok(TradeCost {
        trade: SIDING_ASSEMBLY.to_string(),
        material_cost: material.round_dp(2),
        labor_cost,
        line_items: items,
    })
}

fn price_include(
    inputs: &JobInputs,
    outputs: &JobOutputs,
    catalog: &Catalog,
    ctx: PriceContext<'_>,
    inc: &IncludeDef,
    items: &mut Vec<LineItem>,
) -> Result<(), EstimateError> {
    let qty = qty_from_expr(&inc.qty, outputs)?;

    match inc.item.as_str() {
        // The generic siding row substitutes the real SKU per siding type.
        "siding_sf" => price_siding(inputs, outputs, catalog, ctx, items),
        "coil_roll" if inputs.finish.is_factory_color() => {
            price_color_coils(inputs, catalog, ctx, qty, items)
        }
        key if is_trim_item(key) => {
            let qty = (qty as u32).max(TRIM_MIN_PIECES);
            let key = remap_trim_for_siding(key, inputs.siding_type);
            push_item(catalog, ctx, inputs, &key, f64::from(qty), items)
        }
        key => {
            if qty > 0.0 {
                push_item(catalog, ctx, inputs, key, qty, items)?;
            }
            Ok(())
        }
    }
}

fn is_trim_item(key: &str) -> bool {
    matches!(key, "trim4_12ft" | "trim6_12ft" | "trim8_12ft" | "trim12_12ft")
}

/// Board-and-batten jobs use 4/4 trim stock in place of the standard trim
/// boards.
fn remap_trim_for_siding(key: &str, siding: SidingType) -> String {
    if siding != SidingType::BoardAndBatten {
        return key.to_string();
    }
    match key {
        "trim4_12ft" => "trim44_4_12ft",
        "trim6_12ft" => "trim44_6_12ft",
        "trim8_12ft" => "trim44_8_12ft",
        "trim12_12ft" => "trim44_12_12ft",
        other => other,
    }
    .to_string()
}

fn price_siding(
    inputs: &JobInputs,
    outputs: &JobOutputs,
    catalog: &Catalog,
    ctx: PriceContext<'_>,
    items: &mut Vec<LineItem>,
) -> Result<(), EstimateError> {
    let d = catalog.quantity_defaults();
    match inputs.siding_type {
        SidingType::Lap => {
            let key = plank_item_key(outputs.lap_nominal_width_in);
            push_item(catalog, ctx, inputs, &key, f64::from(outputs.boards), items)
        }
        SidingType::BoardAndBatten => {
            let waste = quantity::waste_fraction(d.base_waste, inputs.complexity);
            let panels =
                ((outputs.total_sf * (1.0 + waste)) / d.bb_panel_sf).ceil().max(0.0) as u32;
            push_item(catalog, ctx, inputs, "bb_panel_4x10", f64::from(panels), items)?;
            let battens = panels * d.battens_per_panel;
            push_item(catalog, ctx, inputs, "bb_batten_12ft", f64::from(battens), items)
        }
        SidingType::Shake => {
            // Shake is priced per SF including waste; no board substitution.
            let waste = quantity::waste_fraction(d.base_waste, inputs.complexity);
            let sf = (outputs.total_sf * (1.0 + waste)).ceil();
            push_item(catalog, ctx, inputs, "siding_sf", sf, items)
        }
    }
}

/// Factory-color coil splits into a body-color row and a trim-color row.
/// Identical color names get role suffixes so the rows stay tellable apart.
fn price_color_coils(
    inputs: &JobInputs,
    catalog: &Catalog,
    ctx: PriceContext<'_>,
    total_qty: f64,
    items: &mut Vec<LineItem>,
) -> Result<(), EstimateError> {
    if total_qty <= 0.0 {
        return Ok(());
    }
    let per_color = ((total_qty / COIL_COLOR_SPLIT_DIVISOR).ceil() as u32).max(1);
    let unit_cost = catalog.unit_cost("coil_roll", inputs.region, ctx)?;
    let uom = catalog
        .item("coil_roll")
        .map(|i| i.uom.clone())
        .unwrap_or_else(|| "RL".to_string());

    let mut body_name = coil_row_name(&inputs.body_color);
    let mut trim_name = coil_row_name(&inputs.trim_color);
    if body_name == trim_name {
        body_name.push_str(" (Body)");
        trim_name.push_str(" (Trim)");
    }

    items.push(LineItem::new(
        "coil_roll",
        &body_name,
        f64::from(per_color),
        &uom,
        unit_cost,
    ));
    items.push(LineItem::new(
        "coil_roll",
        &trim_name,
        f64::from(per_color),
        &uom,
        unit_cost,
    ));
    Ok(())
}

fn coil_row_name(color: &str) -> String {
    let color = color.trim();
    if color.is_empty() {
        "Trim Coil".to_string()
    } else {
        format!("{color} Trim Coil")
    }
}

fn push_item(
    catalog: &Catalog,
    ctx: PriceContext<'_>,
    inputs: &JobInputs,
    key: &str,
    qty: f64,
    items: &mut Vec<LineItem>,
) -> Result<(), EstimateError> {
    if qty <= 0.0 {
        return Ok(());
    }
    let unit_cost = catalog.unit_cost(key, inputs.region, ctx)?;
    let name = catalog.display_name(key, inputs.fascia_width_in);
    let uom = catalog
        .item(key)
        .map(|i| i.uom.clone())
        .unwrap_or_default();
    items.push(LineItem::new(key, &name, qty, &uom, unit_cost));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AreaRule, Complexity, Finish, Region, Substrate};

    fn inputs() -> JobInputs {
        JobInputs {
            region: Region::Metro,
            siding_type: SidingType::Lap,
            finish: Finish::ColorPlus,
            body_color: "Iron Gray".into(),
            trim_color: "Arctic White".into(),
            complexity: Complexity::Low,
            substrate: Substrate::Wood,
            facade_sf: 2150.0,
            trim_sf: 210.0,
            eave_fascia_lf: 113.5,
            rake_fascia_lf: 96.0,
            openings_perimeter_lf: 120.0,
            outside_corners_lf: 96.0,
            inside_corners_lf: 40.0,
            lap_reveal_in: Some(7.0),
            ..JobInputs::default()
        }
    }

    fn price(inputs: &JobInputs) -> TradeCost {
        let catalog = Catalog::builtin();
        let outputs = quantity::compute(inputs, AreaRule::Max, &catalog).unwrap();
        price_trade(inputs, &outputs, &catalog).unwrap()
    }

    fn find<'a>(tc: &'a TradeCost, item: &str) -> Vec<&'a LineItem> {
        tc.line_items.iter().filter(|li| li.item == item).collect()
    }

    #[test]
    fn test_plank_item_key() {
        assert_eq!(plank_item_key(8.25), "plank_8_25");
        assert_eq!(plank_item_key(5.25), "plank_5_25");
        assert_eq!(plank_item_key(12.0), "plank_12");
    }

    #[test]
    fn test_lap_substitutes_plank_by_width() {
        let tc = price(&inputs());
        let planks = find(&tc, "plank_8_25");
        assert_eq!(planks.len(), 1);
        assert_eq!(planks[0].qty, 369.0);
        assert!(find(&tc, "siding_sf").is_empty());
    }

    #[test]
    fn test_bb_substitutes_panels_and_battens() {
        let bb = JobInputs {
            siding_type: SidingType::BoardAndBatten,
            ..inputs()
        };
        let tc = price(&bb);
        let panels = find(&tc, "bb_panel_4x10");
        assert_eq!(panels.len(), 1);
        // ceil(2150 * 1.20 / 40) = 65 panels, three battens each.
        assert_eq!(panels[0].qty, 65.0);
        assert_eq!(find(&tc, "bb_batten_12ft")[0].qty, 195.0);
    }

    #[test]
    fn test_bb_remaps_trim_to_four_quarter() {
        let bb = JobInputs {
            siding_type: SidingType::BoardAndBatten,
            ..inputs()
        };
        let tc = price(&bb);
        assert!(!find(&tc, "trim44_4_12ft").is_empty());
        assert!(find(&tc, "trim4_12ft").is_empty());
    }

    #[test]
    fn test_trim_minimum_two_pieces() {
        let small = JobInputs {
            outside_corners_lf: 0.0,
            inside_corners_lf: 0.0,
            openings_perimeter_lf: 0.0,
            ..inputs()
        };
        let tc = price(&small);
        assert_eq!(find(&tc, "trim4_12ft")[0].qty, 2.0);
    }

    #[test]
    fn test_factory_color_coil_split() {
        let tc = price(&inputs());
        let coils = find(&tc, "coil_roll");
        assert_eq!(coils.len(), 2);
        // Takeoff yields 9 rolls; each color row carries ceil(9/4) = 3.
        assert_eq!(coils[0].qty, 3.0);
        assert_eq!(coils[0].name, "Iron Gray Trim Coil");
        assert_eq!(coils[1].name, "Arctic White Trim Coil");
    }

    #[test]
    fn test_coil_split_rounds_each_color_up() {
        let big = JobInputs {
            facade_sf: 3200.0,
            ..inputs()
        };
        let tc = price(&big);
        let coils = find(&tc, "coil_roll");
        assert_eq!(coils.len(), 2);
        // 32 squares yield 13 rolls total; each color carries ceil(13/4).
        assert_eq!(coils[0].qty, 4.0);
        assert_eq!(coils[1].qty, 4.0);
    }

    #[test]
    fn test_identical_colors_get_role_suffix() {
        let same = JobInputs {
            trim_color: "Iron Gray".into(),
            ..inputs()
        };
        let tc = price(&same);
        let coils = find(&tc, "coil_roll");
        assert_eq!(coils[0].name, "Iron Gray Trim Coil (Body)");
        assert_eq!(coils[1].name, "Iron Gray Trim Coil (Trim)");
    }

    #[test]
    fn test_primed_coil_single_row() {
        let primed = JobInputs {
            finish: Finish::Primed,
            ..inputs()
        };
        let tc = price(&primed);
        let coils = find(&tc, "coil_roll");
        assert_eq!(coils.len(), 1);
        assert_eq!(coils[0].qty, 3.0);
    }

    #[test]
    fn test_colorplus_extras_included_only_for_colorplus() {
        let tc = price(&inputs());
        assert!(!find(&tc, "touchup_kit").is_empty());

        let primed = JobInputs {
            finish: Finish::Primed,
            ..inputs()
        };
        let tc = price(&primed);
        assert!(find(&tc, "touchup_kit").is_empty());
    }

    #[test]
    fn test_material_cost_sums_rows() {
        let tc = price(&inputs());
        let sum: Decimal = tc.line_items.iter().map(|li| li.ext_cost).sum();
        assert_eq!(tc.material_cost, sum.round_dp(2));
        assert!(tc.labor_cost > Decimal::ZERO);
    }

    #[test]
    fn test_qty_from_expr() {
        let mut out = JobOutputs::default();
        out.wrap_rolls = 3;
        assert_eq!(qty_from_expr("outputs.wrap_rolls", &out).unwrap(), 3.0);
        assert_eq!(qty_from_expr("2", &out).unwrap(), 2.0);
        assert!(qty_from_expr("outputs.bogus", &out).is_err());
    }
}
