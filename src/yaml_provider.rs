use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use serde_yaml::Value as YamlValue;

pub fn load_from_path<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Opening YAML file {path:?}"))?;
    parse_str(&raw).with_context(|| format!("Parsing YAML file {path:?}"))
}

pub fn parse_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    // An empty document means "all defaults".
    if input.trim().is_empty() {
        return Ok(serde_yaml::from_value(YamlValue::Mapping(Default::default()))?);
    }
    Ok(serde_yaml::from_str(input)?)
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HrConfig;

    #[test]
    fn empty_document_yields_defaults() {
        let config: HrConfig = parse_str("  \n").expect("parse");
        assert_eq!(config, HrConfig::default());
    }

    #[test]
    fn dumped_config_round_trips() {
        let config = HrConfig::default();
        let yaml = to_string(&config).expect("dump");
        assert!(yaml.contains("numeric_column:"));
        let parsed: HrConfig = parse_str(&yaml).expect("parse");
        assert_eq!(parsed, config);
    }
}
