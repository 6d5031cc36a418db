use std::cmp::Ordering;

use itertools::Itertools;
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{
    coerce::{coerce_numeric, valid_numbers},
    data::{Table, Value},
    numeric::{mean, round2},
};

/// Mean of the target column for one group key. Serializes as a flat record:
/// each group column with its key value, then the target column with the
/// rounded mean.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group_columns: Vec<String>,
    pub key: Vec<Value>,
    pub target: String,
    pub mean: f64,
    pub count: usize,
}

impl Serialize for GroupMean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.key.len() + 1))?;
        for (column, value) in self.group_columns.iter().zip(&self.key) {
            map.serialize_entry(column, value)?;
        }
        map.serialize_entry(&self.target, &self.mean)?;
        map.end()
    }
}

/// Groups rows by `group_by` and averages the coerced `target` column.
///
/// Rows with a missing target value or a missing key cell are skipped. An
/// absent group or target column produces an empty result.
pub fn grouped_mean(table: &Table, group_by: &[String], target: &str) -> Vec<GroupMean> {
    let Some(indices) = group_by
        .iter()
        .map(|column| table.column_index(column))
        .collect::<Option<Vec<_>>>()
    else {
        debug!("Group columns {group_by:?} not all present; skipping grouped mean");
        return Vec::new();
    };
    if !table.has_column(target) {
        debug!("Target column '{target}' absent; skipping grouped mean");
        return Vec::new();
    }

    let coerced = coerce_numeric(table, target);
    table
        .rows()
        .zip(coerced)
        .filter_map(|(row, value)| {
            let value = value?;
            let key = indices
                .iter()
                .map(|&idx| row.values()[idx].clone())
                .collect::<Vec<_>>();
            (!key.iter().any(Value::is_missing)).then_some((key, value))
        })
        .into_group_map()
        .into_iter()
        .filter_map(|(key, values)| {
            let average = mean(&values)?;
            Some(GroupMean {
                group_columns: group_by.to_vec(),
                key,
                target: target.to_string(),
                mean: round2(average),
                count: values.len(),
            })
        })
        .sorted_by(|a, b| compare_keys(&a.key, &b.key))
        .collect()
}

fn compare_keys(left: &[Value], right: &[Value]) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(a, b)| a.sort_cmp(b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremes {
    pub min: f64,
    pub max: f64,
}

/// Minimum and maximum of the valid values in `column`; `None` when there
/// are no valid values (including when the column is absent).
pub fn min_max(table: &Table, column: &str) -> Option<Extremes> {
    let coerced = coerce_numeric(table, column);
    valid_numbers(&coerced).fold(None, |acc, value| {
        Some(match acc {
            None => Extremes {
                min: value,
                max: value,
            },
            Some(current) => Extremes {
                min: current.min.min(value),
                max: current.max.max(value),
            },
        })
    })
}
