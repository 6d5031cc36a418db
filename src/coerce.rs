use crate::data::{Table, Value};

/// One entry per row: the numeric value of `column`, or `None` when the cell
/// cannot be read as a finite number. An absent column yields all `None`.
pub fn coerce_numeric(table: &Table, column: &str) -> Vec<Option<f64>> {
    match table.column(column) {
        Some(values) => values.map(Value::to_number).collect(),
        None => vec![None; table.len()],
    }
}

/// The present values of a coerced column, in row order.
pub fn valid_numbers(coerced: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    coerced.iter().filter_map(|value| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary_table(cells: &[Value]) -> Table {
        Table::from_rows(
            vec!["应发工资".to_string()],
            cells.iter().map(|v| vec![v.clone()]).collect(),
        )
    }

    #[test]
    fn unparsable_text_becomes_missing() {
        let table = salary_table(&["5000".into(), "abc".into(), "7000".into()]);
        let coerced = coerce_numeric(&table, "应发工资");
        assert_eq!(coerced, vec![Some(5000.0), None, Some(7000.0)]);
        let valid = valid_numbers(&coerced).collect::<Vec<_>>();
        assert_eq!(valid.iter().sum::<f64>() / valid.len() as f64, 6000.0);
    }

    #[test]
    fn absent_column_is_all_missing() {
        let table = salary_table(&[Value::Integer(1), Value::Integer(2)]);
        assert_eq!(coerce_numeric(&table, "年龄"), vec![None, None]);
    }

    #[test]
    fn native_numbers_pass_through() {
        let table = salary_table(&[Value::Integer(3), Value::Float(2.5), Value::Missing]);
        assert_eq!(
            coerce_numeric(&table, "应发工资"),
            vec![Some(3.0), Some(2.5), None]
        );
    }
}
