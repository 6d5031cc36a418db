use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::LoadError;

/// `{"status": "success", "data": ...}` or `{"status": "error", "msg": "..."}`.
///
/// Reports are serialized straight into the envelope so map and record key
/// order survives to the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error { msg: String },
}

impl<T: Serialize> Envelope<T> {
    pub fn error(msg: impl Into<String>) -> Self {
        Envelope::Error { msg: msg.into() }
    }

    /// Maps any failure to an error envelope, distinguishing a missing data
    /// source from one that exists but could not be read.
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<LoadError>() {
            Some(load) if load.is_not_found() => Envelope::error(format!("未找到数据文件: {load}")),
            Some(load) => Envelope::error(format!("读取数据文件失败: {load}")),
            None => Envelope::error(format!("{err:#}")),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.context("Serializing response envelope")
    }
}
