use log::{debug, info};
use serde::Serialize;

use crate::{
    config::{DeleteRule, SyntheticRow},
    data::{Row, Table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MutationLog {
    pub appended: usize,
    pub deleted: usize,
    pub final_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub table: Table,
    pub log: MutationLog,
}

/// Appends `row` to a copy of `table`, extending the column set as needed.
pub fn append_synthetic(table: &Table, row: &SyntheticRow) -> Table {
    let mut appended = table.clone();
    appended.append_record(row.fields());
    appended
}

/// Removes every row matching all three conditions of `rule`. Returns the
/// filtered copy and the number of rows removed; when any rule column is
/// absent nothing is removed.
pub fn delete_matching(table: &Table, rule: &DeleteRule) -> (Table, usize) {
    if let Some(missing) = rule.columns().into_iter().find(|c| !table.has_column(c)) {
        debug!("Delete rule column '{missing}' absent; no rows removed");
        return (table.clone(), 0);
    }
    let mut kept = table.clone();
    kept.retain_rows(|row| !rule_matches(rule, row));
    let deleted = table.len() - kept.len();
    (kept, deleted)
}

fn rule_matches(rule: &DeleteRule, row: Row<'_>) -> bool {
    let over_age = row
        .get(&rule.age_column)
        .and_then(|value| value.to_number())
        .is_some_and(|age| age > rule.age_threshold);
    over_age
        && row
            .get(&rule.status_column)
            .is_some_and(|value| value.matches_literal(&rule.status_value))
        && row
            .get(&rule.gender_column)
            .is_some_and(|value| value.matches_literal(&rule.gender_value))
}

/// Append, then delete. `final_count == table.len() + 1 - deleted`.
pub fn apply(table: &Table, row: &SyntheticRow, rule: &DeleteRule) -> Mutation {
    let appended = append_synthetic(table, row);
    let (table_after, deleted) = delete_matching(&appended, rule);
    let log = MutationLog {
        appended: 1,
        deleted,
        final_count: table_after.len(),
    };
    info!(
        "Appended {} row(s), removed {} row(s) matching '{}', {} remain",
        log.appended,
        log.deleted,
        rule.describe(),
        log.final_count
    );
    Mutation {
        table: table_after,
        log,
    }
}
