use std::collections::HashMap;

use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{
    data::Table,
    numeric::{format_percent, round2},
};

/// Insertion-ordered string-keyed map, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Counts of each distinct non-missing value in `column`, keyed by its
/// trimmed display form so `1`, `1.0` and `"1"` land in one bucket. Most
/// frequent first, ties broken by key. `None` when the column is absent.
pub fn value_counts(table: &Table, column: &str) -> Option<Vec<(String, usize)>> {
    let values = table.column(column)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_missing()) {
        *counts.entry(value.as_display().trim().to_string()).or_insert(0) += 1;
    }
    let mut items = counts.into_iter().collect::<Vec<_>>();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Some(items)
}

/// Value counts as an ordered map.
pub fn count_map(table: &Table, column: &str) -> OrderedMap<usize> {
    OrderedMap(value_counts(table, column).unwrap_or_default())
}

/// Share of rows whose `column` equals `target`, over all rows, formatted as
/// `"5.20%"`. An empty table reports `"0.00%"`; an absent column `None`.
pub fn leaver_ratio(table: &Table, column: &str, target: &str) -> Option<String> {
    let Some(values) = table.column(column) else {
        debug!("Status column '{column}' absent; leaver ratio unavailable");
        return None;
    };
    let matching = values.filter(|value| value.matches_literal(target)).count();
    Some(format_percent(matching, table.len()))
}

/// Percentage of each distinct non-missing value of `column`, rounded to two
/// decimals, most frequent first. Empty when the column is absent or holds
/// only missing values.
pub fn category_distribution(table: &Table, column: &str) -> OrderedMap<f64> {
    let counts = value_counts(table, column).unwrap_or_default();
    let total = counts.iter().map(|(_, count)| count).sum::<usize>();
    if total == 0 {
        return OrderedMap::default();
    }
    OrderedMap(
        counts
            .into_iter()
            .map(|(key, count)| {
                let percent = round2(count as f64 / total as f64 * 100.0);
                (key, percent)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use proptest::prelude::*;

    fn table(column: &str, cells: Vec<Value>) -> Table {
        Table::from_rows(
            vec![column.to_string()],
            cells.into_iter().map(|v| vec![v]).collect(),
        )
    }

    #[test]
    fn leaver_ratio_counts_target_over_all_rows() {
        let mut cells = vec![Value::from("在职"); 7];
        cells.push(Value::from("离职"));
        cells.push(Value::Missing);
        cells.push(Value::from(" 离职 "));
        let table = table("在职状态", cells);
        assert_eq!(
            leaver_ratio(&table, "在职状态", "离职").as_deref(),
            Some("20.00%")
        );
    }

    #[test]
    fn leaver_ratio_on_empty_table_is_zero() {
        let table = table("在职状态", Vec::new());
        assert_eq!(
            leaver_ratio(&table, "在职状态", "离职").as_deref(),
            Some("0.00%")
        );
    }

    #[test]
    fn leaver_ratio_without_status_column_is_none() {
        let table = table("学历", vec![Value::from("本科")]);
        assert_eq!(leaver_ratio(&table, "在职状态", "离职"), None);
    }

    #[test]
    fn distribution_orders_by_count_and_excludes_missing() {
        let table = table(
            "学历",
            vec![
                "本科".into(),
                "硕士".into(),
                "本科".into(),
                Value::Missing,
                "博士".into(),
            ],
        );
        let distribution = category_distribution(&table, "学历");
        assert_eq!(
            distribution.0,
            vec![
                ("本科".to_string(), 50.0),
                ("博士".to_string(), 25.0),
                ("硕士".to_string(), 25.0),
            ]
        );
        let json = serde_json::to_string(&distribution).expect("serialize");
        assert_eq!(json, r#"{"本科":50.0,"博士":25.0,"硕士":25.0}"#);
    }

    #[test]
    fn count_map_keys_by_display() {
        let table = table(
            "在职状态",
            vec!["在职".into(), "离职".into(), "在职".into()],
        );
        let counts = count_map(&table, "在职状态");
        assert_eq!(counts.get("在职"), Some(&2));
        assert_eq!(counts.get("离职"), Some(&1));
        assert!(count_map(&table, "性别").is_empty());
    }

    #[test]
    fn mixed_cell_types_share_one_bucket() {
        let table = table(
            "学历",
            vec![
                Value::Integer(1),
                Value::from("1"),
                Value::Float(1.0),
                "本科".into(),
                " 本科".into(),
                "本科".into(),
            ],
        );
        let distribution = category_distribution(&table, "学历");
        assert_eq!(
            distribution.0,
            vec![("1".to_string(), 50.0), ("本科".to_string(), 50.0)]
        );
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&distribution).expect("serialize"))
                .expect("parse");
        let total: f64 = json
            .as_object()
            .expect("object")
            .values()
            .filter_map(|v| v.as_f64())
            .sum();
        assert_eq!(total, 100.0);
        assert_eq!(count_map(&table, "学历").get("1"), Some(&3));
    }

    proptest! {
        #[test]
        fn distribution_sums_to_one_hundred(
            picks in prop::collection::vec(0usize..5, 1..200)
        ) {
            let labels = ["大专", "本科", "硕士", "博士", "高中"];
            let cells = picks.iter().map(|&i| Value::from(labels[i])).collect();
            let distribution = category_distribution(&table("学历", cells), "学历");
            let total: f64 = distribution.values().sum();
            // each entry is off by at most 0.005 after rounding
            prop_assert!((total - 100.0).abs() <= 0.005 * distribution.len() as f64 + 1e-9);
        }
    }
}
