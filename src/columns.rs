use std::collections::HashSet;

use log::debug;

use crate::data::Table;

/// Returns a copy of `table` whose column names are trimmed. Idempotent.
pub fn normalize_columns(table: &Table) -> Table {
    let mut normalized = table.clone();
    let trimmed = table
        .columns()
        .iter()
        .map(|name| name.trim().to_string())
        .collect::<Vec<_>>();
    let unique = dedupe_names(trimmed);
    if unique.as_slice() != table.columns() {
        debug!("Normalized column names {:?} -> {:?}", table.columns(), unique);
    }
    normalized.set_columns(unique);
    normalized
}

/// Makes header names unique: the first occurrence keeps its name, later
/// repeats get `.1`, `.2`, ... suffixes. Blank names become `Unnamed: <idx>`.
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut output = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        output.push(candidate);
    }
    output
}
