use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::HR_KEYWORD;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Analyze HR and population spreadsheets into dashboard JSON",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HR analytics pipeline over the employee roster
    Hr(HrArgs),
    /// Build the population trend series from the yearly population table
    Population(PopulationArgs),
    /// Summarize the fixed 2024 monthly sales series
    Sales(OutputArgs),
    /// Summarize the fixed personal ledger
    Finance(OutputArgs),
    /// Compute monthly individual income tax
    Tax(TaxArgs),
    /// Preview the first few rows of a data file in a formatted table
    Preview(PreviewArgs),
    /// Print the effective HR pipeline configuration as YAML
    Config(ConfigArgs),
}

/// Where to find the input table and how to read it.
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Directory searched for a file whose name contains the dataset keyword
    #[arg(long = "data-dir", default_value = "data")]
    pub data_dir: PathBuf,
    /// Explicit input file; skips keyword discovery
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Zero-based row holding the column headers; earlier rows are skipped
    #[arg(long = "header-row")]
    pub header_row: Option<usize>,
    /// Read CSV input only in this encoding instead of trying utf-8 then gbk
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Write the JSON response to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct HrArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// YAML pipeline configuration overriding the built-in defaults
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Rows shown in the head previews
    #[arg(long)]
    pub head: Option<usize>,
    /// Rows shown in the tail previews
    #[arg(long)]
    pub tail: Option<usize>,
    /// Also write the final (mutated) table to this CSV file
    #[arg(long = "final-csv")]
    pub final_csv: Option<PathBuf>,
    /// Character encoding of the final CSV file (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PopulationArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct TaxArgs {
    /// Gross monthly income
    #[arg(long, allow_negative_numbers = true)]
    pub income: f64,
    /// Monthly social insurance and housing fund contributions
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub insurance: f64,
    /// Monthly special additional deductions
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub special: f64,
    /// Other monthly deductions
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub other: f64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub data: DataArgs,
    /// Keyword used to discover the data file
    #[arg(short = 'k', long, default_value = HR_KEYWORD)]
    pub keyword: String,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// YAML file to merge over the defaults before printing
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_characters() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("，").is_err());
    }

    #[test]
    fn hr_arguments_parse_with_defaults() {
        let cli = Cli::try_parse_from(["sheet-analytics", "hr", "--head", "3", "--pretty"])
            .expect("parse");
        match cli.command {
            Commands::Hr(args) => {
                assert_eq!(args.data.data_dir, PathBuf::from("data"));
                assert_eq!(args.head, Some(3));
                assert!(args.output.pretty);
                assert!(args.data.input.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
