use bidline_core::model::ParsedReport;
use bidline_core::Estimate;
use std::fmt::Write;

pub fn format_parsed(report: &ParsedReport) -> String {
    let mut out = String::new();
    let id = &report.identity;
    let t = &report.totals;

    let _ = writeln!(out, "Customer");
    let _ = writeln!(out, "  name:     {}", blank(&id.name));
    let _ = writeln!(out, "  street:   {}", blank(&id.street));
    let _ = writeln!(out, "  city:     {}", blank(&id.city_state_zip));
    let _ = writeln!(out, "  zip:      {}", blank(&id.zip));
    let _ = writeln!(out);
    let _ = writeln!(out, "Measurements");
    let _ = writeln!(out, "  facades:            {:>10.1} SF", t.facade_sf);
    let _ = writeln!(out, "  trim/siding:        {:>10.1} SF", t.trim_sf);
    let _ = writeln!(out, "  eave fascia:        {:>10.1} LF", t.eave_fascia_lf);
    let _ = writeln!(out, "  rake fascia:        {:>10.1} LF", t.rake_fascia_lf);
    let _ = writeln!(
        out,
        "  openings perimeter: {:>10.1} LF",
        t.openings_perimeter_lf
    );
    let _ = writeln!(out, "  outside corners:    {:>10.1} LF", t.outside_corners_lf);
    let _ = writeln!(out, "  inside corners:     {:>10.1} LF", t.inside_corners_lf);

    if t.parse_warning {
        let _ = writeln!(out, "\n  warning: no siding area found in report");
    }
    if t.corner_warning {
        let _ = writeln!(out, "\n  warning: corners referenced but no lengths found");
    }
    out
}

pub fn format_estimate(estimate: &Estimate) -> String {
    let mut out = String::new();
    let inputs = &estimate.inputs;
    let o = &estimate.outputs;
    let cost = &estimate.cost;

    let _ = writeln!(out, "=== {} ===", title_line(estimate));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Job: {} / {} / {} complexity / {}",
        inputs.siding_type, inputs.finish, inputs.complexity, inputs.region
    );
    let _ = writeln!(
        out,
        "Area: {:.0} SF ({} squares)",
        o.total_sf, o.total_squares
    );
    if inputs.siding_type == bidline_core::model::SidingType::Lap {
        let _ = writeln!(
            out,
            "Lap: {}\" reveal ({}\" nominal), {} boards",
            o.lap_reveal_in, o.lap_nominal_width_in, o.boards
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Materials");
    let name_w = estimate
        .trade
        .line_items
        .iter()
        .map(|li| li.name.len())
        .max()
        .unwrap_or(10);
    for li in &estimate.trade.line_items {
        let _ = writeln!(
            out,
            "  {:<w$}  {:>8.1} {:<3} @ {:>9}  = {:>10}",
            li.name,
            li.qty,
            li.uom,
            li.unit_cost,
            li.ext_cost,
            w = name_w
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Costs");
    let _ = writeln!(out, "  material:    {:>12}", cost.material_cost);
    let _ = writeln!(out, "  labor:       {:>12}", cost.labor_cost);
    let _ = writeln!(out, "  COGS:        {:>12}", cost.cogs);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  revenue:     {:>12}  (GM {} / {})",
        cost.revenue_target, cost.target_gm, cost.gm_band
    );
    let _ = writeln!(out, "  overhead:    {:>12}", cost.overhead_dollars);
    let _ = writeln!(out, "  commission:  {:>12}", cost.commission_total);
    let _ = writeln!(out, "  profit:      {:>12}", cost.projected_profit);
    let _ = writeln!(out);
    let _ = writeln!(out, "Catalog version: {}", cost.catalog_version);
    out
}

fn title_line(estimate: &Estimate) -> String {
    let title = estimate.report.identity.display_title();
    if title.trim().is_empty() || title.trim() == "—" {
        "Unnamed job".to_string()
    } else {
        title
    }
}

fn blank(s: &str) -> &str {
    if s.is_empty() {
        "(not found)"
    } else {
        s
    }
}
