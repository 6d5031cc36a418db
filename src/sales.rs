use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::{frequency::OrderedMap, numeric::round2};

pub const SALES_2024: &str = "2024 年 Q1-Q4 各月销售额（元）：15800 23500 19200 28600 31200 27800 35400 42100 38900 45600 39800 51200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthValue {
    /// 1-based month.
    pub month: usize,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub raw_data: Vec<i64>,
    pub total: i64,
    pub quarter_avg: OrderedMap<f64>,
    pub max: MonthValue,
    pub min: MonthValue,
}

/// Parses the figures after the full-width colon of a series label.
pub fn parse_series(text: &str) -> Result<Vec<i64>> {
    let (_, figures) = text
        .split_once('：')
        .ok_or_else(|| anyhow!("Sales text has no '：' separator"))?;
    figures
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .with_context(|| format!("Parsing sales figure '{token}'"))
        })
        .collect()
}

pub fn summarize(sales: &[i64]) -> Result<SalesReport> {
    let max = extreme(sales, |candidate, best| candidate > best)
        .ok_or_else(|| anyhow!("Sales series is empty"))?;
    let min = extreme(sales, |candidate, best| candidate < best)
        .ok_or_else(|| anyhow!("Sales series is empty"))?;
    let quarter_avg = sales
        .chunks(3)
        .enumerate()
        .map(|(idx, quarter)| {
            let average = quarter.iter().sum::<i64>() as f64 / quarter.len() as f64;
            (format!("Q{}", idx + 1), round2(average))
        })
        .collect();
    Ok(SalesReport {
        raw_data: sales.to_vec(),
        total: sales.iter().sum(),
        quarter_avg: OrderedMap(quarter_avg),
        max,
        min,
    })
}

/// First month whose value beats every earlier one under `better`.
fn extreme(sales: &[i64], better: impl Fn(i64, i64) -> bool) -> Option<MonthValue> {
    sales
        .iter()
        .enumerate()
        .fold(None, |best: Option<MonthValue>, (idx, &value)| match best {
            Some(current) if !better(value, current.value) => Some(current),
            _ => Some(MonthValue {
                month: idx + 1,
                value,
            }),
        })
}

pub fn build_report() -> Result<SalesReport> {
    summarize(&parse_series(SALES_2024)?)
}
