//! Delimiter and encoding resolution plus strict CSV decoding and writing.
//!
//! Fields are decoded one at a time so a single malformed byte fails the
//! whole read; the loader relies on that to fall back from UTF-8 to GBK.

use std::{fs, io::Read, path::Path};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::data::Table;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Header handling is left to the caller so title rows above the header can
/// be skipped; records may have differing lengths.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Decodes exactly as `encoding`: no byte-order-mark sniffing and no
/// replacement characters, so any malformed sequence is an error.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| anyhow!("Failed to decode text with encoding {}", encoding.name()))
}

/// Drops a leading UTF-8 byte-order mark from the first header field.
pub fn strip_utf8_bom(header: &mut [String], encoding: &'static Encoding) {
    if encoding != UTF_8 {
        return;
    }
    if let Some(first) = header.first_mut() {
        if first.starts_with('\u{feff}') {
            first.remove(0);
        }
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Writes `table` as CSV (header plus display values) in `encoding`.
pub fn write_table_csv(
    path: &Path,
    table: &Table,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("Writing output headers")?;
    for (idx, row) in table.display_rows().into_iter().enumerate() {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|err| anyhow!("Flushing CSV buffer: {}", err.error()))?;
    let text = String::from_utf8(buffer).context("CSV output is not valid UTF-8")?;
    let (encoded, _, had_errors) = encoding.encode(&text);
    if had_errors {
        return Err(anyhow!(
            "Failed to encode output using {}",
            encoding.name()
        ));
    }
    fs::write(path, encoded.as_ref()).with_context(|| format!("Creating output file {path:?}"))
}
