use log::{debug, info};

use crate::{
    columns::normalize_columns,
    config::HrConfig,
    data::Table,
    dedup::{deduplicate, duplicate_count},
    frequency::{category_distribution, count_map, leaver_ratio},
    mutate,
    report::{HrReport, shape_of},
    stats::{grouped_mean, min_max},
};

/// The report plus the final, mutated table.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: HrReport,
    pub table: Table,
}

pub fn run_hr(raw: &Table, config: &HrConfig) -> PipelineOutput {
    let table = normalize_columns(raw);
    info!(
        "Running HR pipeline over {} row(s) x {} column(s)",
        table.len(),
        table.width()
    );

    // Group means use the pre-dedup rows; every other statistic uses the
    // deduplicated table.
    let groupby_salary = grouped_mean(&table, &config.group_by, &config.numeric_column);
    let duplicates_count = duplicate_count(&table);
    let deduped = deduplicate(&table);
    debug!(
        "{} duplicate row(s); {} row(s) after dedup",
        duplicates_count,
        deduped.len()
    );

    let extremes = min_max(&deduped, &config.numeric_column);
    let mutation = mutate::apply(&deduped, &config.append_row, &config.delete_rule);

    let report = HrReport {
        shape: shape_of(&table),
        columns: table.columns().to_vec(),
        head: table.head(config.head_rows),
        tail: table.tail(config.tail_rows),
        groupby_salary,
        duplicates_count,
        shape_after_dedup: shape_of(&deduped),
        leaver_ratio: leaver_ratio(&deduped, &config.status_column, &config.status_target),
        status_counts: count_map(&deduped, &config.status_column),
        salary_max: extremes.map(|e| e.max),
        salary_min: extremes.map(|e| e.min),
        edu_ratio: category_distribution(&deduped, &config.category_column),
        added_employee: config.append_row.clone(),
        delete_condition: config.delete_rule.describe(),
        delete_count: mutation.log.deleted,
        final_count: mutation.log.final_count,
        final_head: mutation.table.head(config.head_rows),
        final_tail: mutation.table.tail(config.tail_rows),
    };

    PipelineOutput {
        report,
        table: mutation.table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        Table::from_rows(
            columns(&[" 工号", "性别 ", "学历", "应发工资", "在职状态", "年龄"]),
            vec![
                vec!["GH001".into(), "男".into(), "本科".into(), Value::Integer(8000), "在职".into(), Value::Integer(30)],
                vec!["GH001".into(), "男".into(), "本科".into(), Value::Integer(8000), "在职".into(), Value::Integer(30)],
                vec!["GH002".into(), "男".into(), "硕士".into(), Value::Integer(12000), "离职".into(), Value::Integer(58)],
                vec!["GH003".into(), "女".into(), "本科".into(), "待定".into(), "离职".into(), Value::Integer(40)],
            ],
        )
    }

    #[test]
    fn report_covers_every_stage() {
        let output = run_hr(&sample(), &HrConfig::default());
        let report = &output.report;
        assert_eq!(report.shape, [4, 6]);
        assert_eq!(report.columns[0], "工号");
        assert_eq!(report.duplicates_count, 1);
        assert_eq!(report.shape_after_dedup, [3, 6]);
        assert_eq!(report.leaver_ratio.as_deref(), Some("66.67%"));
        assert_eq!(report.salary_max, Some(12000.0));
        assert_eq!(report.salary_min, Some(8000.0));
        assert_eq!(report.edu_ratio.get("本科"), Some(&66.67));
        assert_eq!(report.edu_ratio.get("硕士"), Some(&33.33));
        assert_eq!(report.delete_count, 1);
        assert_eq!(report.final_count, 3 + 1 - 1);
        assert_eq!(output.table.len(), report.final_count);
        assert_eq!(report.head.len(), 4);
        assert_eq!(report.final_tail.len(), 3);
    }

    #[test]
    fn group_means_use_pre_dedup_rows() {
        let output = run_hr(&sample(), &HrConfig::default());
        let groups = &output.report.groupby_salary;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, vec![Value::from("本科"), Value::from("男")]);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn missing_columns_degrade_instead_of_failing() {
        let table = Table::from_rows(
            columns(&["姓名"]),
            vec![vec!["张三".into()], vec!["张三".into()]],
        );
        let report = run_hr(&table, &HrConfig::default()).report;
        assert_eq!(report.duplicates_count, 1);
        assert!(report.groupby_salary.is_empty());
        assert_eq!(report.leaver_ratio, None);
        assert_eq!(report.salary_max, None);
        assert!(report.edu_ratio.is_empty());
        assert_eq!(report.delete_count, 0);
        assert_eq!(report.final_count, 2);
        // the synthetic record widens the final table
        assert!(output_columns_contain(&report.final_tail, "工号"));
    }

    fn output_columns_contain(table: &Table, column: &str) -> bool {
        table.columns().iter().any(|c| c == column)
    }

    #[test]
    fn report_serializes_nulls_for_absent_statistics() {
        let table = Table::from_rows(columns(&["姓名"]), Vec::new());
        let report = run_hr(&table, &HrConfig::default()).report;
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["salary_max"].is_null());
        assert!(json["leaver_ratio"].is_null());
        assert_eq!(json["final_count"], 1);
        assert_eq!(json["added_employee"]["工号"], "GH993");
    }
}
