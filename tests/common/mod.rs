#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use encoding_rs::GBK;
use serde_json::Value as JsonValue;
use tempfile::{TempDir, tempdir};

/// Employee roster with one exact duplicate, one unparsable salary, and one
/// row matching the default delete rule (GH002).
pub const HR_CSV: &str = "\
工号,姓名,性别,应发工资,学历,在职状态,年龄
GH001,张三,男,8000,本科,在职,30
GH001,张三,男,8000,本科,在职,30
GH002,李四,男,12000,硕士,离职,58
GH003,王芳,女,abc,本科,离职,40
GH004,赵六,女,9500,大专,在职,26
";

pub const POPULATION_CSV: &str = "\
年份,年末总人口,城镇人口,乡村人口,男性人口,女性人口
2020年,141212,90220,50992,72357,68855
2021年,141260,91425,49835,72311,68949
2022年,141175,92071,49104,72206,68969
";

/// Absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Positions of `"key":` inside the first JSON object that follows `anchor`
/// in raw command output, in the order `keys` are given.
pub fn key_positions(stdout: &str, anchor: &str, keys: &[&str]) -> Vec<usize> {
    let start = stdout.find(anchor).expect("anchor present") + anchor.len();
    let end = start + stdout[start..].find('}').expect("object closes");
    let object = &stdout[start..end];
    keys.iter()
        .map(|key| {
            object
                .find(&format!("\"{key}\":"))
                .unwrap_or_else(|| panic!("key {key} missing from {object}"))
        })
        .collect()
}

/// Scratch directory laid out like the dashboard's `data/` folder.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` as UTF-8 under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Writes `contents` encoded as GBK.
    pub fn write_gbk(&self, name: &str, contents: &str) -> PathBuf {
        let (encoded, _, had_errors) = GBK.encode(contents);
        assert!(!had_errors, "fixture must be representable in GBK");
        self.write_bytes(name, &encoded)
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }
}

pub fn command() -> Command {
    let mut cmd = Command::cargo_bin("sheet-analytics").expect("binary exists");
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Parses the JSON envelope printed on stdout.
pub fn envelope(stdout: &[u8]) -> JsonValue {
    serde_json::from_slice(stdout).expect("stdout is a JSON envelope")
}
