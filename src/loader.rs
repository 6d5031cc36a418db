//! Locating and reading the source table.
//!
//! A data file is found by keyword inside the data directory, then handed to
//! an ordered list of [`LoaderStrategy`] implementations: the spreadsheet
//! reader first, then CSV as UTF-8, then CSV as GBK. The first strategy that
//! succeeds wins; if none do, the collected failures become
//! [`LoadError::Unreadable`].

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, GBK, UTF_8};
use log::{debug, info, warn};

use crate::{
    columns::dedupe_names,
    data::{Table, Value, is_na_token},
    error::LoadError,
    io_utils,
};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// An explicit file path.
    File(PathBuf),
    /// The first file in `dir` (by name) whose name contains `keyword`.
    Discover { dir: PathBuf, keyword: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Zero-based row holding the header; rows above it are skipped.
    pub header_row: usize,
    /// CSV delimiter; resolved from the file extension when `None`.
    pub delimiter: Option<u8>,
}

pub trait LoaderStrategy {
    fn name(&self) -> String;
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Table>;
}

/// Reads the first worksheet of an Excel or OpenDocument workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetLoader;

impl LoaderStrategy for SpreadsheetLoader {
    fn name(&self) -> String {
        "spreadsheet".to_string()
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto(path).context("Opening workbook")?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook has no worksheets"))?;
        let range = workbook
            .worksheet_range(&sheet)
            .with_context(|| format!("Reading worksheet '{sheet}'"))?;
        let mut rows = range.rows().skip(options.header_row);
        let header = rows
            .next()
            .ok_or_else(|| anyhow!("Worksheet '{sheet}' has no header row"))?
            .iter()
            .map(cell_to_header)
            .collect::<Vec<_>>();
        let body = rows
            .map(|row| row.iter().map(cell_to_value).collect::<Vec<_>>())
            .filter(|row| !row.iter().all(Value::is_missing))
            .collect::<Vec<_>>();
        Ok(build_table(header, body))
    }
}

/// Reads delimited text in a fixed encoding; any undecodable byte fails.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    pub encoding: &'static Encoding,
}

impl LoaderStrategy for CsvLoader {
    fn name(&self) -> String {
        format!("csv ({})", self.encoding.name())
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Table> {
        if has_spreadsheet_extension(path) {
            bail!("Not a delimited text file");
        }
        let bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        let mut reader = io_utils::open_csv_reader(Cursor::new(bytes), delimiter);
        let mut records = reader.byte_records().skip(options.header_row);
        let mut header = match records.next() {
            Some(record) => {
                let record = record.context("Reading header row")?;
                io_utils::decode_record(&record, self.encoding).context("Decoding header row")?
            }
            None => bail!("File has no header row"),
        };
        if options.header_row == 0 {
            io_utils::strip_utf8_bom(&mut header, self.encoding);
        }
        let mut body = Vec::new();
        for (idx, record) in records.enumerate() {
            let line = options.header_row + idx + 2;
            let record = record.with_context(|| format!("Reading row {line}"))?;
            let decoded = io_utils::decode_record(&record, self.encoding)
                .with_context(|| format!("Decoding row {line}"))?;
            body.push(decoded.iter().map(|cell| Value::parse_cell(cell)).collect());
        }
        Ok(build_table(header, body))
    }
}

/// Spreadsheet, then CSV as UTF-8, then CSV as GBK.
pub fn default_strategies() -> Vec<Box<dyn LoaderStrategy>> {
    vec![
        Box::new(SpreadsheetLoader),
        Box::new(CsvLoader { encoding: UTF_8 }),
        Box::new(CsvLoader { encoding: GBK }),
    ]
}

/// Spreadsheet, then CSV in one caller-chosen encoding.
pub fn strategies_for_encoding(encoding: &'static Encoding) -> Vec<Box<dyn LoaderStrategy>> {
    vec![Box::new(SpreadsheetLoader), Box::new(CsvLoader { encoding })]
}

pub fn discover(dir: &Path, keyword: &str) -> Result<PathBuf, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryMissing(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| LoadError::ListDirectory {
        dir: dir.to_path_buf(),
        source,
    })?;
    let mut candidates = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(keyword))
        })
        .collect::<Vec<_>>();
    candidates.sort();
    debug!("Files matching '{keyword}' in {dir:?}: {candidates:?}");
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::NoMatch {
            keyword: keyword.to_string(),
            dir: dir.to_path_buf(),
        })
}

pub fn resolve_source(source: &DataSource) -> Result<PathBuf, LoadError> {
    match source {
        DataSource::File(path) if path.is_file() => Ok(path.clone()),
        DataSource::File(path) => Err(LoadError::FileMissing(path.clone())),
        DataSource::Discover { dir, keyword } => discover(dir, keyword),
    }
}

/// Tries each strategy in order and returns the first table read.
pub fn load_with(
    path: &Path,
    options: &LoadOptions,
    strategies: &[Box<dyn LoaderStrategy>],
) -> Result<Table, LoadError> {
    let mut attempts = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        match strategy.load(path, options) {
            Ok(table) => {
                info!(
                    "Loaded {} row(s) x {} column(s) from {:?} via {}",
                    table.len(),
                    table.width(),
                    path,
                    strategy.name()
                );
                return Ok(table);
            }
            Err(err) => {
                debug!("{} could not read {:?}: {:#}", strategy.name(), path, err);
                attempts.push(format!("{}: {:#}", strategy.name(), err));
            }
        }
    }
    warn!("No loader strategy could read {path:?}");
    Err(LoadError::Unreadable {
        path: path.to_path_buf(),
        attempts,
    })
}

pub fn load_table(
    source: &DataSource,
    options: &LoadOptions,
    strategies: &[Box<dyn LoaderStrategy>],
) -> Result<Table, LoadError> {
    let path = resolve_source(source)?;
    load_with(&path, options, strategies)
}

fn has_spreadsheet_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn build_table(header: Vec<String>, body: Vec<Vec<Value>>) -> Table {
    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let mut names = header;
    names.resize(width, String::new());
    Table::from_rows(dedupe_names(names), body)
}

fn cell_to_header(cell: &Data) -> String {
    match cell_to_value(cell) {
        Value::Missing => String::new(),
        value => value.as_display(),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                Value::Integer(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::String(s) if is_na_token(s) => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(stamp) if stamp.time() == chrono::NaiveTime::MIN => {
                Value::Text(stamp.format("%Y-%m-%d").to_string())
            }
            Some(stamp) => Value::Text(stamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}
