//! Financial model: piecewise commission schedule, revenue targeting, and
//! the inverse solvers used when a rep pins commission or profit instead of
//! margin. All math is `Decimal`; comparisons use a fixed epsilon so band
//! boundaries behave the same on every platform.

use crate::error::EstimateError;
use crate::model::{GmBand, JobCost, TradeCost};
use rust_decimal::Decimal;

/// Comparison tolerance for band boundaries, 1e-9.
fn eps() -> Decimal {
    Decimal::new(1, 9)
}

fn d(num: i64, scale: u32) -> Decimal {
    Decimal::new(num, scale)
}

/// Commission rate as a function of gross margin.
///
/// No commission at or below 20% GM; the excess over 20% pays out
/// dollar-for-dollar up to 30%; from 30% the rate jumps to a third of the
/// whole margin.
pub fn commission_rate(gm: Decimal) -> Decimal {
    let low = d(20, 2);
    let high = d(30, 2);
    if gm <= low + eps() {
        Decimal::ZERO
    } else if gm < high - eps() {
        gm - low
    } else {
        gm / Decimal::from(3)
    }
}

/// Commission dollars at a given revenue and gross margin.
pub fn commission_dollars(revenue: Decimal, gm: Decimal) -> Decimal {
    revenue * commission_rate(gm)
}

/// Revenue needed to hit a target gross margin over the given COGS.
pub fn revenue_for_margin(cogs: Decimal, gm: Decimal) -> Result<Decimal, EstimateError> {
    let denom = Decimal::ONE - gm;
    if denom <= eps() {
        return Err(EstimateError::Compute(format!(
            "target gross margin {gm} leaves no revenue denominator"
        )));
    }
    Ok(cogs / denom)
}

fn implied_gm(revenue: Decimal, cogs: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        Decimal::ONE - cogs / revenue
    }
}

/// Invert the commission schedule: find the revenue at which the job pays
/// the requested commission dollars.
///
/// Each branch of the schedule has a closed-form inverse; a candidate is
/// accepted only when its implied margin lands back in that branch's band.
/// Requests too small for the paying bands clamp to the 20% GM floor where
/// commission is zero.
pub fn solve_revenue_from_commission(
    cogs: Decimal,
    commission: Decimal,
) -> Result<Decimal, EstimateError> {
    if cogs <= Decimal::ZERO {
        return Err(EstimateError::Compute("COGS must be positive".into()));
    }

    // gm >= 0.30: commission = revenue*gm/3 = (revenue - cogs)/3.
    let rev3 = Decimal::from(3) * commission + cogs;
    if implied_gm(rev3, cogs) >= d(30, 2) - eps() {
        return Ok(rev3);
    }

    // 0.20 < gm < 0.30: commission = revenue*(gm - 0.20) = 0.80*revenue - cogs.
    let rev2 = (commission + cogs) / d(80, 2);
    let gm2 = implied_gm(rev2, cogs);
    if gm2 > d(20, 2) + eps() && gm2 < d(30, 2) - eps() {
        return Ok(rev2);
    }

    // Floor: 20% GM, zero commission.
    Ok(cogs / d(80, 2))
}

/// Invert the profit identity: find the revenue at which
/// `profit = revenue - cogs - overhead_rate*revenue - commission`.
pub fn solve_revenue_from_profit(
    cogs: Decimal,
    overhead_rate: Decimal,
    profit: Decimal,
) -> Result<Decimal, EstimateError> {
    if cogs <= Decimal::ZERO {
        return Err(EstimateError::Compute("COGS must be positive".into()));
    }
    let two_thirds = Decimal::from(2) / Decimal::from(3);

    // gm >= 0.30 branch.
    let denom3 = two_thirds - overhead_rate;
    if denom3 > eps() {
        let rev3 = (profit + two_thirds * cogs) / denom3;
        if implied_gm(rev3, cogs) >= d(30, 2) - eps() {
            return Ok(rev3);
        }
    }

    // 0.20 < gm < 0.30 branch: profit = revenue*(0.20 - overhead_rate).
    let denom2 = d(20, 2) - overhead_rate;
    if denom2 > eps() {
        let rev2 = profit / denom2;
        let gm2 = implied_gm(rev2, cogs);
        if gm2 > d(20, 2) + eps() && gm2 < d(30, 2) - eps() {
            return Ok(rev2);
        }
    }

    // gm <= 0.20 branch: no commission.
    let denom1 = Decimal::ONE - overhead_rate;
    if denom1 <= eps() {
        return Err(EstimateError::Compute(format!(
            "overhead rate {overhead_rate} consumes all revenue"
        )));
    }
    Ok((profit + cogs) / denom1)
}

/// Band label for a gross margin.
pub fn gm_band(gm: Decimal) -> GmBand {
    if gm < d(30, 2) - eps() {
        GmBand::Low
    } else if gm <= d(40, 2) + eps() {
        GmBand::Mid
    } else {
        GmBand::High
    }
}

/// Roll one trade's costs up to a full financial summary at the target
/// gross margin.
pub fn summarize(
    trade: &TradeCost,
    overhead_rate: Decimal,
    target_gm: Decimal,
    catalog_version: &str,
) -> Result<JobCost, EstimateError> {
    let cogs = trade.cogs();
    let revenue = revenue_for_margin(cogs, target_gm)?;
    let overhead = revenue * overhead_rate;
    let commission = commission_dollars(revenue, target_gm);
    let profit = revenue - cogs - overhead - commission;

    Ok(JobCost {
        trade: trade.trade.clone(),
        material_cost: trade.material_cost.round_dp(2),
        labor_cost: trade.labor_cost.round_dp(2),
        cogs: cogs.round_dp(2),
        overhead_rate,
        target_gm,
        revenue_target: revenue.round_dp(2),
        overhead_dollars: overhead.round_dp(2),
        projected_profit: profit.round_dp(2),
        gm_band: gm_band(target_gm),
        commission_total: commission.round_dp(2),
        catalog_version: catalog_version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_commission_rate_schedule() {
        assert_eq!(commission_rate(dec!(0.20)), dec!(0));
        assert_eq!(commission_rate(dec!(0.21)), dec!(0.01));
        assert_eq!(commission_rate(dec!(0.25)), dec!(0.05));
        assert_eq!(commission_rate(dec!(0.30)), dec!(0.10));
        assert_eq!(commission_rate(dec!(0.33)), dec!(0.11));
        assert_eq!(commission_rate(dec!(0.40)).round_dp(6), dec!(0.133333));
    }

    #[test]
    fn test_rate_continuous_at_knots() {
        // Both knots meet: g - 0.20 tends to 0.10 as g/3 picks up at 0.30.
        assert_eq!(commission_rate(dec!(0.299)), dec!(0.099));
        assert_eq!(commission_rate(dec!(0.30)), dec!(0.10));
        assert_eq!(commission_rate(dec!(0.200000001)).round_dp(6), dec!(0));
    }

    #[test]
    fn test_revenue_for_margin() {
        assert_eq!(revenue_for_margin(dec!(6500), dec!(0.35)).unwrap(), dec!(10000));
        assert!(revenue_for_margin(dec!(6500), dec!(1)).is_err());
    }

    #[test]
    fn test_commission_inversion_high_band() {
        let cogs = dec!(10000);
        let revenue = revenue_for_margin(cogs, dec!(0.35)).unwrap();
        let commission = commission_dollars(revenue, dec!(0.35));
        let solved = solve_revenue_from_commission(cogs, commission).unwrap();
        assert_eq!(solved.round_dp(2), revenue.round_dp(2));
    }

    #[test]
    fn test_commission_inversion_mid_band() {
        let cogs = dec!(10000);
        let revenue = revenue_for_margin(cogs, dec!(0.25)).unwrap();
        let commission = commission_dollars(revenue, dec!(0.25));
        let solved = solve_revenue_from_commission(cogs, commission).unwrap();
        assert_eq!(solved.round_dp(2), revenue.round_dp(2));
    }

    #[test]
    fn test_commission_inversion_clamps_low() {
        // Zero commission requests clamp to the 20% floor.
        let solved = solve_revenue_from_commission(dec!(8000), dec!(0)).unwrap();
        assert_eq!(solved, dec!(10000));
    }

    #[test]
    fn test_profit_inversion_high_band() {
        let cogs = dec!(10000);
        let r = dec!(0.10);
        let revenue = revenue_for_margin(cogs, dec!(0.35)).unwrap();
        let commission = commission_dollars(revenue, dec!(0.35));
        let profit = revenue - cogs - r * revenue - commission;
        let solved = solve_revenue_from_profit(cogs, r, profit).unwrap();
        assert_eq!(solved.round_dp(2), revenue.round_dp(2));
    }

    #[test]
    fn test_profit_inversion_mid_band() {
        let cogs = dec!(10000);
        let r = dec!(0.10);
        let revenue = revenue_for_margin(cogs, dec!(0.25)).unwrap();
        let commission = commission_dollars(revenue, dec!(0.25));
        let profit = revenue - cogs - r * revenue - commission;
        let solved = solve_revenue_from_profit(cogs, r, profit).unwrap();
        assert_eq!(solved.round_dp(2), revenue.round_dp(2));
    }

    #[test]
    fn test_profit_inversion_low_band() {
        let cogs = dec!(10000);
        let r = dec!(0.10);
        let revenue = dec!(12000); // gm = 1/6, below the commission floor
        let profit = revenue - cogs - r * revenue;
        let solved = solve_revenue_from_profit(cogs, r, profit).unwrap();
        assert_eq!(solved.round_dp(2), revenue.round_dp(2));
    }

    #[test]
    fn test_gm_band() {
        assert_eq!(gm_band(dec!(0.25)), GmBand::Low);
        assert_eq!(gm_band(dec!(0.30)), GmBand::Mid);
        assert_eq!(gm_band(dec!(0.40)), GmBand::Mid);
        assert_eq!(gm_band(dec!(0.41)), GmBand::High);
    }

    #[test]
    fn test_summarize() {
        let trade = TradeCost {
            trade: "Siding".into(),
            material_cost: dec!(4000),
            labor_cost: dec!(2500),
            line_items: vec![],
        };
        let cost = summarize(&trade, dec!(0.10), dec!(0.35), "2026.01").unwrap();
        assert_eq!(cost.cogs, dec!(6500));
        assert_eq!(cost.revenue_target, dec!(10000));
        assert_eq!(cost.overhead_dollars, dec!(1000));
        // Commission 10000 * 0.35/3.
        assert_eq!(cost.commission_total, dec!(1166.67));
        assert_eq!(cost.projected_profit, dec!(1333.33));
        assert_eq!(cost.gm_band, GmBand::Mid);
        assert_eq!(cost.catalog_version, "2026.01");
    }
}
