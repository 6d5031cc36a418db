//! Progressive individual income tax on a monthly salary.
//!
//! The monthly taxable amount is income less the 5000 basic allowance and
//! the deductions, floored at zero. The annualized amount selects a bracket;
//! tax is `annual * rate - quick_deduction`, spread evenly over twelve months.

use anyhow::{Result, bail};
use serde::Serialize;

pub const BASIC_ALLOWANCE: f64 = 5000.0;

/// `(annual upper bound, rate, quick deduction)`; the last bracket is open.
const BRACKETS: [(f64, f64, f64); 7] = [
    (36_000.0, 0.03, 0.0),
    (144_000.0, 0.10, 2_520.0),
    (300_000.0, 0.20, 16_920.0),
    (420_000.0, 0.25, 31_920.0),
    (660_000.0, 0.30, 52_920.0),
    (960_000.0, 0.35, 85_920.0),
    (f64::INFINITY, 0.45, 181_920.0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxInput {
    pub income: f64,
    pub insurance: f64,
    pub special: f64,
    pub other: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBreakdown {
    pub taxable_month: f64,
    pub taxable_year: f64,
    pub rate: f64,
    pub quick_deduction: f64,
    pub tax_year: f64,
    pub tax_month: f64,
    pub net_income: f64,
}

pub fn calculate(input: &TaxInput) -> Result<TaxBreakdown> {
    let fields = [input.income, input.insurance, input.special, input.other];
    if fields.iter().any(|value| !value.is_finite()) {
        bail!("Tax inputs must be finite numbers");
    }
    let taxable_month =
        (input.income - BASIC_ALLOWANCE - input.insurance - input.special - input.other).max(0.0);
    let taxable_year = taxable_month * 12.0;
    let (rate, quick_deduction) = BRACKETS
        .iter()
        .find(|(upper, _, _)| taxable_year <= *upper)
        .map(|(_, rate, deduction)| (*rate, *deduction))
        .unwrap_or((0.45, 181_920.0));
    let tax_year = taxable_year * rate - quick_deduction;
    let tax_month = tax_year / 12.0;
    Ok(TaxBreakdown {
        taxable_month,
        taxable_year,
        rate,
        quick_deduction,
        tax_year,
        tax_month,
        net_income: input.income - input.insurance - tax_month,
    })
}
