use std::collections::HashSet;

use crate::data::{Table, Value};

/// Number of rows that repeat an earlier row.
pub fn duplicate_count(table: &Table) -> usize {
    let mut seen: HashSet<&[Value]> = HashSet::with_capacity(table.len());
    table
        .rows()
        .filter(|row| !seen.insert(row.values()))
        .count()
}

/// Number of distinct rows.
pub fn distinct_count(table: &Table) -> usize {
    table.rows().map(|row| row.values()).collect::<HashSet<_>>().len()
}

/// A copy of `table` keeping only the first occurrence of each row.
pub fn deduplicate(table: &Table) -> Table {
    let mut seen: HashSet<&[Value]> = HashSet::with_capacity(table.len());
    let rows = table
        .rows()
        .filter(|row| seen.insert(row.values()))
        .map(|row| row.values().to_vec())
        .collect();
    Table::from_rows(table.columns().to_vec(), rows)
}
