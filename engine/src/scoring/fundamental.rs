// Rule-band fundamental health score
use shared::models::FundamentalMetrics;

pub const BASE_SCORE: f64 = 50.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Points contributed by one metric band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub metric: &'static str,
    pub value: f64,
    pub points: f64,
}

/// Base 50 plus the per-metric adjustments, clamped to [0, 100].
pub fn fundamental_score(metrics: &FundamentalMetrics) -> f64 {
    let total: f64 = adjustments(metrics).iter().map(|a| a.points).sum();
    (BASE_SCORE + total).clamp(MIN_SCORE, MAX_SCORE)
}

/// Every metric's band contribution, including zero-point bands.
pub fn adjustments(metrics: &FundamentalMetrics) -> Vec<Adjustment> {
    let pe = finite_or_zero(metrics.pe_ratio);
    let peg = finite_or_zero(metrics.peg_ratio);
    let de = finite_or_zero(metrics.debt_to_equity);
    let roe = finite_or_zero(metrics.return_on_equity);
    let margin = finite_or_zero(metrics.profit_margin);
    let growth = finite_or_zero(metrics.revenue_growth);

    vec![
        Adjustment { metric: "pe_ratio", value: pe, points: pe_points(pe) },
        Adjustment { metric: "peg_ratio", value: peg, points: peg_points(peg) },
        Adjustment { metric: "debt_to_equity", value: de, points: debt_to_equity_points(de) },
        Adjustment { metric: "return_on_equity", value: roe, points: return_on_equity_points(roe) },
        Adjustment { metric: "profit_margin", value: margin, points: profit_margin_points(margin) },
        Adjustment { metric: "revenue_growth", value: growth, points: revenue_growth_points(growth) },
    ]
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// Non-positive valuation ratios mean "not reported" or losses; they add nothing.
fn pe_points(pe: f64) -> f64 {
    match pe {
        pe if pe <= 0.0 => 0.0,
        pe if pe < 30.0 => 15.0,
        pe if pe < 50.0 => 5.0,
        _ => -5.0,
    }
}

fn peg_points(peg: f64) -> f64 {
    match peg {
        peg if peg <= 0.0 => 0.0,
        peg if peg < 1.5 => 15.0,
        peg if peg < 2.5 => 8.0,
        _ => -5.0,
    }
}

fn debt_to_equity_points(de: f64) -> f64 {
    match de {
        de if de <= 0.0 => 0.0,
        de if de < 0.7 => 10.0,
        de if de < 1.2 => 5.0,
        _ => -5.0,
    }
}

fn return_on_equity_points(roe: f64) -> f64 {
    match roe {
        roe if roe > 12.0 => 10.0,
        roe if roe > 8.0 => 5.0,
        roe if roe < 3.0 => -3.0,
        _ => 0.0,
    }
}

fn profit_margin_points(margin: f64) -> f64 {
    match margin {
        m if m > 15.0 => 10.0,
        m if m > 8.0 => 5.0,
        m if m < 2.0 => -3.0,
        _ => 0.0,
    }
}

fn revenue_growth_points(growth: f64) -> f64 {
    match growth {
        g if g > 20.0 => 10.0,
        g if g > 10.0 => 5.0,
        _ => 0.0,
    }
}
