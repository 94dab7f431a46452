//! Quantity takeoff: measured totals in, material counts and labor out.
//!
//! All rounding is ceiling-to-whole-unit at the point a physical thing is
//! ordered; intermediate math stays fractional. Money uses `Decimal`.

use crate::catalog::Catalog;
use crate::error::EstimateError;
use crate::model::{AreaRule, Complexity, JobInputs, JobOutputs, SidingType};
use rust_decimal::Decimal;

/// Nominal plank width per reveal (exposure), inches. Keys are the reveals
/// the supplier actually stocks.
pub const LAP_REVEAL_TO_NOMINAL: &[(f64, f64)] = &[
    (4.0, 5.25),
    (5.0, 6.25),
    (6.0, 7.25),
    (7.0, 8.25),
    (8.0, 9.25),
    (10.75, 12.0),
];

/// Reveal used when the job does not specify one.
pub const DEFAULT_LAP_REVEAL_IN: f64 = 7.0;

/// Exposure used for nail counts on non-lap siding.
const NON_LAP_NAIL_EXPOSURE_IN: f64 = 7.0;

/// Soffit board depth used in deep (>24") panel mode, inches.
const SOFFIT_DEPTH_DEEP_IN: f64 = 30.0;

const OSB_SHEET_SF: f64 = 32.0;
const OSB_SF_PER_FASTENER_BOX: f64 = 1000.0;

/// Complexity add-on over the base waste fraction.
fn complexity_waste(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Low => 0.0,
        Complexity::Med => 0.03,
        Complexity::High => 0.07,
    }
}

/// Total waste fraction for a job.
pub fn waste_fraction(base_waste: f64, complexity: Complexity) -> f64 {
    base_waste + complexity_waste(complexity)
}

/// Snap a requested reveal to the nearest stocked reveal. Requests are
/// quantized to the quarter inch first so hand-entered values like 6.9 land
/// on a stock key.
pub fn snap_reveal(requested_in: f64) -> f64 {
    let quantized = (requested_in * 4.0).round() / 4.0;
    LAP_REVEAL_TO_NOMINAL
        .iter()
        .min_by(|a, b| {
            (a.0 - quantized)
                .abs()
                .total_cmp(&(b.0 - quantized).abs())
        })
        .map(|(reveal, _)| *reveal)
        .unwrap_or(DEFAULT_LAP_REVEAL_IN)
}

/// Nominal plank width for a stocked reveal.
pub fn nominal_width_for_reveal(reveal_in: f64) -> f64 {
    LAP_REVEAL_TO_NOMINAL
        .iter()
        .find(|(r, _)| (r - reveal_in).abs() < 0.125)
        .map(|(_, w)| *w)
        .unwrap_or(8.25)
}

fn ceil_u32(v: f64) -> u32 {
    if v <= 0.0 {
        0
    } else {
        v.ceil() as u32
    }
}

/// Measured values come from heuristic parsing; anything non-finite or
/// negative is treated as absent.
fn sane(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Derive all quantities and labor for one job.
pub fn compute(
    inputs: &JobInputs,
    area_rule: AreaRule,
    catalog: &Catalog,
) -> Result<JobOutputs, EstimateError> {
    let d = catalog.quantity_defaults();
    let mut out = JobOutputs::default();

    out.total_sf = area_rule.apply(sane(inputs.facade_sf), sane(inputs.trim_sf));
    let sf = out.total_sf;
    let squares = sf / 100.0;
    out.total_squares = ceil_u32(squares);

    let waste = waste_fraction(d.base_waste, inputs.complexity);

    // Lap planks: one 12' board covers reveal_in SF, so SF/reveal is the
    // zero-waste count.
    let reveal = snap_reveal(inputs.lap_reveal_in.unwrap_or(DEFAULT_LAP_REVEAL_IN));
    out.lap_reveal_in = reveal;
    out.lap_nominal_width_in = nominal_width_for_reveal(reveal);
    if inputs.siding_type == SidingType::Lap && sf > 0.0 {
        out.boards = ceil_u32((sf / reveal).round() * (1.0 + waste));
    }

    // Wrap coverage is derated by the base waste; tape runs two rolls per
    // wrap roll.
    if sf > 0.0 {
        let effective_roll = d.wrap_roll_sf / (1.0 + d.base_waste);
        out.wrap_rolls = ceil_u32(sf / effective_roll);
        out.tape_rolls = 2 * out.wrap_rolls;

        let exposure = match inputs.siding_type {
            SidingType::Lap => reveal,
            _ => NON_LAP_NAIL_EXPOSURE_IN,
        };
        let nails = (sf * d.nails_per_sf / exposure).round();
        out.nail_boxes =
            (ceil_u32(nails * (1.0 + d.nail_waste) / f64::from(d.nails_per_box))).max(1);
    }

    // Trim coil: primed jobs brake-form on site and need far less; factory
    // color ships body and trim color separately, hence the doubling.
    if sf > 0.0 {
        let raw = if inputs.finish.is_factory_color() {
            ceil_u32(squares / 2.5) * 2
        } else {
            ceil_u32(squares / 5.0)
        };
        out.coil_rolls = ceil_u32(f64::from(raw) * d.coil_reduction).max(1);
        out.flash_tape_rolls = ceil_u32(squares / 5.0);
    }

    let eave_lf = sane(inputs.eave_fascia_lf);
    let rake_lf = sane(inputs.rake_fascia_lf);
    // Shallow overhangs reuse ripped stock; panels are ordered only in deep
    // (>24") mode, and the enable flag zeroes them regardless of depth.
    if inputs.soffit_enabled && inputs.soffit_depth_gt_24 {
        let soffit_area = (eave_lf + rake_lf) * SOFFIT_DEPTH_DEEP_IN / 12.0;
        out.soffit_panels = ceil_u32(soffit_area * (1.0 + d.soffit_waste) / d.soffit_panel_sf);
    }
    out.fascia_pieces = ceil_u32((eave_lf + rake_lf) / d.fascia_piece_len_ft);

    // 4" trim wraps corners (outside corners take two legs) and openings.
    let trim4_lf = 2.0 * sane(inputs.outside_corners_lf)
        + sane(inputs.inside_corners_lf)
        + sane(inputs.openings_perimeter_lf);
    out.trim4_pieces = ceil_u32(trim4_lf / d.trim_piece_len_ft);
    out.trim6_pieces = 2;
    out.trim8_pieces = 2;
    out.trim12_pieces = 2;

    out.paint_quarts = if inputs.finish.is_factory_color() { 0 } else { 2 };

    if inputs.osb_selected {
        let osb_area = sane(inputs.osb_area_override_sf.unwrap_or(sf));
        out.osb_sheets = ceil_u32(osb_area / OSB_SHEET_SF);
        out.osb_fastener_boxes = ceil_u32(osb_area / OSB_SF_PER_FASTENER_BOX).max(1);
    }

    let (rate, per_square, labor) = labor_for(inputs, out.total_squares, catalog)?;
    out.labor_rate_per_sf = rate;
    out.labor_per_square = per_square;
    out.labor_cost = labor;

    Ok(out)
}

/// Labor model: per-square price derived from the regional $/SF rate with
/// flat adders. Returns (rate, $/square, total), total rounded to cents.
pub fn labor_for(
    inputs: &JobInputs,
    total_squares: u32,
    catalog: &Catalog,
) -> Result<(Decimal, Decimal, Decimal), EstimateError> {
    let rate = catalog.labor_rate_for(inputs.siding_type, inputs.region)?;
    let mut per_square = rate * Decimal::from(100u32);
    if !inputs.demo_required {
        per_square -= Decimal::from(30u32);
    }
    per_square += Decimal::from(60u32) * Decimal::from(inputs.extra_layers);
    if inputs.substrate.is_masonry() {
        per_square += Decimal::from(150u32);
    }
    let total = (per_square * Decimal::from(total_squares)).round_dp(2);
    Ok((rate, per_square, total))
}
