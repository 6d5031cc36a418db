use serde::Serialize;

use crate::{
    config::SyntheticRow,
    data::Table,
    frequency::OrderedMap,
    stats::GroupMean,
};

/// `[rows, columns]`
pub type Shape = [usize; 2];

pub fn shape_of(table: &Table) -> Shape {
    let (rows, columns) = table.shape();
    [rows, columns]
}

/// Everything the HR dashboard panel shows. Fields whose source column is
/// missing hold an empty or `null` value rather than failing the report.
#[derive(Debug, Clone, Serialize)]
pub struct HrReport {
    pub shape: Shape,
    pub columns: Vec<String>,
    pub head: Table,
    pub tail: Table,
    pub groupby_salary: Vec<GroupMean>,
    pub duplicates_count: usize,
    pub shape_after_dedup: Shape,
    pub leaver_ratio: Option<String>,
    pub status_counts: OrderedMap<usize>,
    pub salary_max: Option<f64>,
    pub salary_min: Option<f64>,
    pub edu_ratio: OrderedMap<f64>,
    pub added_employee: SyntheticRow,
    pub delete_condition: String,
    pub delete_count: usize,
    pub final_count: usize,
    pub final_head: Table,
    pub final_tail: Table,
}
