pub mod cli;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod data;
pub mod dedup;
pub mod error;
pub mod finance;
pub mod frequency;
pub mod io_utils;
pub mod loader;
pub mod mutate;
pub mod numeric;
pub mod pipeline;
pub mod population;
pub mod preview;
pub mod report;
pub mod response;
pub mod sales;
pub mod stats;
pub mod table;
pub mod tax;
pub mod yaml_provider;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};
use serde::Serialize;

use crate::{
    cli::{Cli, Commands, DataArgs, OutputArgs},
    config::{HrConfig, POPULATION_KEYWORD},
    data::Table,
    io_utils::DEFAULT_CSV_DELIMITER,
    loader::{DataSource, LoadOptions, LoaderStrategy},
    population::PopulationReport,
    report::HrReport,
    response::Envelope,
    tax::{TaxBreakdown, TaxInput},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_analytics", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Hr(args) => respond(&args.output, || handle_hr(&args)),
        Commands::Population(args) => respond(&args.output, || handle_population(&args)),
        Commands::Sales(output) => respond(&output, sales::build_report),
        Commands::Finance(output) => respond(&output, || Ok(finance::build_report())),
        Commands::Tax(args) => respond(&args.output, || handle_tax(&args)),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

/// Runs a report builder and emits its envelope. A failed report still
/// prints an error envelope before the error is returned to `main`.
fn respond<T, F>(output: &OutputArgs, build: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> Result<T>,
{
    match build() {
        Ok(data) => emit(output, &Envelope::Success { data }),
        Err(err) => {
            emit(output, &Envelope::<T>::from_error(&err))?;
            Err(err)
        }
    }
}

fn emit<T: Serialize>(output: &OutputArgs, envelope: &Envelope<T>) -> Result<()> {
    let json = envelope.to_json(output.pretty)?;
    match &output.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Writing response to {path:?}"))?;
            info!("Response written to {path:?}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_hr(args: &cli::HrArgs) -> Result<HrReport> {
    let mut config = match &args.config {
        Some(path) => HrConfig::load(path)?,
        None => HrConfig::default(),
    };
    if let Some(head) = args.head {
        config.head_rows = head;
    }
    if let Some(tail) = args.tail {
        config.tail_rows = tail;
    }
    if let Some(header_row) = args.data.header_row {
        config.header_row = header_row;
    }
    debug!("HR pipeline config: {config:?}");

    let raw = load_dataset(&args.data, &config.keyword, config.header_row)?;
    let output = pipeline::run_hr(&raw, &config);
    debug!(
        "Report shape {:?} -> {:?}, {} group(s)",
        output.report.shape,
        output.report.shape_after_dedup,
        output.report.groupby_salary.len()
    );

    if let Some(path) = &args.final_csv {
        let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
        let delimiter = args.data.delimiter.unwrap_or(DEFAULT_CSV_DELIMITER);
        info!(
            "Writing final table to {:?} using delimiter '{}'",
            path,
            printable_delimiter(delimiter)
        );
        io_utils::write_table_csv(path, &output.table, delimiter, encoding)
            .with_context(|| format!("Writing final table to {path:?}"))?;
    }
    Ok(output.report)
}

fn handle_population(args: &cli::PopulationArgs) -> Result<PopulationReport> {
    let raw = load_dataset(&args.data, POPULATION_KEYWORD, args.data.header_row.unwrap_or(0))?;
    let report = population::build_report(&raw);
    info!("Population series covers {} year(s)", report.years.len());
    Ok(report)
}

fn handle_tax(args: &cli::TaxArgs) -> Result<TaxBreakdown> {
    let input = TaxInput {
        income: args.income,
        insurance: args.insurance,
        special: args.special,
        other: args.other,
    };
    let breakdown = tax::calculate(&input)?;
    info!(
        "Taxable income {:.2}/month at {:.0}%",
        breakdown.taxable_month,
        breakdown.rate * 100.0
    );
    Ok(breakdown)
}

fn handle_config(args: &cli::ConfigArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => HrConfig::load(path)?,
        None => HrConfig::default(),
    };
    print!("{}", yaml_provider::to_string(&config)?);
    Ok(())
}

/// Resolves the data source from the CLI flags and loads it with the
/// configured strategies.
pub(crate) fn load_dataset(args: &DataArgs, keyword: &str, header_row: usize) -> Result<Table> {
    let source = match &args.input {
        Some(path) => DataSource::File(path.clone()),
        None => DataSource::Discover {
            dir: args.data_dir.clone(),
            keyword: keyword.to_string(),
        },
    };
    let options = LoadOptions {
        header_row,
        delimiter: args.delimiter,
    };
    let strategies: Vec<Box<dyn LoaderStrategy>> = match args.input_encoding.as_deref() {
        Some(label) => loader::strategies_for_encoding(io_utils::resolve_encoding(Some(label))?),
        None => loader::default_strategies(),
    };
    if let Some(delimiter) = args.delimiter {
        debug!("Using delimiter '{}'", printable_delimiter(delimiter));
    }
    Ok(loader::load_table(&source, &options, &strategies)?)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
