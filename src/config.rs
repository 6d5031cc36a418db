//! Pipeline configuration.
//!
//! Defaults describe the HR workbook the dashboard ships with; any field can
//! be overridden from a YAML file passed with `--config`:
//!
//! ```yaml
//! numeric_column: 应发工资
//! group_by: [学历, 性别]
//! head_rows: 10
//! delete_rule:
//!   age_threshold: 60
//! append_row:
//!   工号: GH994
//!   姓名: 王五
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{data::Value, yaml_provider};

pub const HR_KEYWORD: &str = "4-1";
pub const POPULATION_KEYWORD: &str = "5-1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    /// Substring used to discover the data file in the data directory.
    pub keyword: String,
    /// Zero-based row holding the header; earlier rows are skipped.
    pub header_row: usize,
    pub numeric_column: String,
    pub group_by: Vec<String>,
    pub status_column: String,
    pub status_target: String,
    pub category_column: String,
    pub head_rows: usize,
    pub tail_rows: usize,
    pub delete_rule: DeleteRule,
    pub append_row: SyntheticRow,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            keyword: HR_KEYWORD.to_string(),
            header_row: 0,
            numeric_column: "应发工资".to_string(),
            group_by: vec!["学历".to_string(), "性别".to_string()],
            status_column: "在职状态".to_string(),
            status_target: "离职".to_string(),
            category_column: "学历".to_string(),
            head_rows: 5,
            tail_rows: 5,
            delete_rule: DeleteRule::default(),
            append_row: SyntheticRow::default(),
        }
    }
}

impl HrConfig {
    pub fn load(path: &Path) -> Result<Self> {
        yaml_provider::load_from_path(path)
            .with_context(|| format!("Loading pipeline config from {path:?}"))
    }
}

/// Rows matching all three conditions are removed by the scripted delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteRule {
    pub age_column: String,
    pub age_threshold: f64,
    pub status_column: String,
    pub status_value: String,
    pub gender_column: String,
    pub gender_value: String,
}

impl Default for DeleteRule {
    fn default() -> Self {
        Self {
            age_column: "年龄".to_string(),
            age_threshold: 55.0,
            status_column: "在职状态".to_string(),
            status_value: "离职".to_string(),
            gender_column: "性别".to_string(),
            gender_value: "男".to_string(),
        }
    }
}

impl DeleteRule {
    pub fn columns(&self) -> [&str; 3] {
        [
            self.age_column.as_str(),
            self.status_column.as_str(),
            self.gender_column.as_str(),
        ]
    }

    /// Human-readable rule, e.g. `年龄>55 且 在职状态=离职 且 性别=男`.
    pub fn describe(&self) -> String {
        format!(
            "{}>{} 且 {}={} 且 {}={}",
            self.age_column,
            Value::Float(self.age_threshold),
            self.status_column,
            self.status_value,
            self.gender_column,
            self.gender_value
        )
    }
}

/// The literal record appended by the scripted mutation, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow(pub Vec<(String, Value)>);

impl SyntheticRow {
    pub fn fields(&self) -> &[(String, Value)] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }
}

impl Default for SyntheticRow {
    fn default() -> Self {
        let fields: [(&str, Value); 12] = [
            ("工号", "GH993".into()),
            ("姓名", "张子涵".into()),
            ("性别", "男".into()),
            ("应发工资", Value::Integer(12000)),
            ("学历", "硕士".into()),
            ("在职状态", "在职".into()),
            ("手机号", "187XXXXX537".into()),
            ("出生年月", Value::Integer(19950512)),
            ("入职日期", Value::Integer(20250718)),
            ("年龄", Value::Integer(30)),
            ("工龄", Value::Integer(0)),
            ("籍贯", "陕西".into()),
        ];
        Self(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

impl Serialize for SyntheticRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SyntheticRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = SyntheticRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SyntheticRow, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    fields.push((name, value));
                }
                Ok(SyntheticRow(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
