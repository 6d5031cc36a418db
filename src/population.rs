use std::sync::OnceLock;

use log::info;
use regex::Regex;
use serde::Serialize;

use crate::{
    coerce::coerce_numeric,
    columns::normalize_columns,
    data::{Table, Value},
};

pub const YEAR_COLUMN: &str = "年份";
pub const URBAN_COLUMN: &str = "城镇人口";
pub const RURAL_COLUMN: &str = "乡村人口";
pub const TOTAL_COLUMN: &str = "年末总人口";
pub const MALE_COLUMN: &str = "男性人口";
pub const FEMALE_COLUMN: &str = "女性人口";

const TEN_THOUSAND: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationReport {
    pub years: Vec<Option<i64>>,
    pub urban: Vec<Option<f64>>,
    pub rural: Vec<Option<f64>>,
    pub total: Vec<Option<f64>>,
    /// Gender split of the most recent year.
    pub pie_2022: Vec<PieSlice>,
}

pub fn build_report(raw: &Table) -> PopulationReport {
    let table = normalize_columns(raw);
    let report = PopulationReport {
        years: table
            .column(YEAR_COLUMN)
            .map(|values| values.map(parse_year).collect())
            .unwrap_or_default(),
        urban: scaled_series(&table, URBAN_COLUMN),
        rural: scaled_series(&table, RURAL_COLUMN),
        total: scaled_series(&table, TOTAL_COLUMN),
        pie_2022: latest_gender_split(&table),
    };
    info!(
        "Built population series for {} year(s)",
        report.years.len()
    );
    report
}

/// Year from cells like `2022`, `2022.0` or `"2022年"`.
pub fn parse_year(value: &Value) -> Option<i64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    match value {
        Value::Integer(year) => Some(*year),
        Value::Float(year) if year.fract() == 0.0 => Some(*year as i64),
        Value::Text(text) => {
            let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid year pattern"));
            digits.find(text)?.as_str().parse().ok()
        }
        _ => None,
    }
}

fn scaled_series(table: &Table, column: &str) -> Vec<Option<f64>> {
    if !table.has_column(column) {
        return Vec::new();
    }
    coerce_numeric(table, column)
        .into_iter()
        .map(|value| value.map(|persons| persons / TEN_THOUSAND))
        .collect()
}

fn latest_gender_split(table: &Table) -> Vec<PieSlice> {
    let Some(last) = table.len().checked_sub(1) else {
        return Vec::new();
    };
    [("男", MALE_COLUMN), ("女", FEMALE_COLUMN)]
        .into_iter()
        .filter_map(|(name, column)| {
            let value = table.value(last, column)?.to_number()?;
            Some(PieSlice {
                name: name.to_string(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yearbook() -> Table {
        let columns = [
            "年份 ",
            URBAN_COLUMN,
            RURAL_COLUMN,
            TOTAL_COLUMN,
            MALE_COLUMN,
            FEMALE_COLUMN,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Table::from_rows(
            columns,
            vec![
                vec![
                    "2021年".into(),
                    Value::Integer(914_250_000),
                    Value::Integer(498_350_000),
                    Value::Integer(1_412_600_000),
                    Value::Integer(723_110_000),
                    Value::Integer(689_490_000),
                ],
                vec![
                    Value::Integer(2022),
                    Value::Integer(920_710_000),
                    "缺失".into(),
                    Value::Integer(1_411_750_000),
                    Value::Integer(722_060_000),
                    Value::Integer(689_690_000),
                ],
            ],
        )
    }

    #[test]
    fn builds_aligned_series_in_ten_thousands() {
        let report = build_report(&yearbook());
        assert_eq!(report.years, vec![Some(2021), Some(2022)]);
        assert_eq!(report.urban, vec![Some(91_425.0), Some(92_071.0)]);
        assert_eq!(report.rural, vec![Some(49_835.0), None]);
        assert_eq!(report.total.len(), 2);
        assert_eq!(
            report.pie_2022,
            vec![
                PieSlice {
                    name: "男".to_string(),
                    value: 722_060_000.0
                },
                PieSlice {
                    name: "女".to_string(),
                    value: 689_690_000.0
                },
            ]
        );
    }

    #[test]
    fn absent_columns_produce_empty_series() {
        let table = Table::from_rows(vec!["年份".to_string()], vec![vec![Value::Integer(2020)]]);
        let report = build_report(&table);
        assert_eq!(report.years, vec![Some(2020)]);
        assert!(report.urban.is_empty());
        assert!(report.pie_2022.is_empty());
    }

    #[test]
    fn parse_year_reads_labels() {
        assert_eq!(parse_year(&"2010年".into()), Some(2010));
        assert_eq!(parse_year(&Value::Float(2011.0)), Some(2011));
        assert_eq!(parse_year(&"未知".into()), None);
        assert_eq!(parse_year(&Value::Missing), None);
    }
}
