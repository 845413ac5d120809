// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ldc_core::report::{render, OutputFormat};
use ldc_core::request::{
    AircraftModel, ApproachCategory, FlapSetting, RunwayCode, SlopeDirection, WindDirection,
};
use ldc_core::settings::{Settings, SettingsManager};
use ldc_core::table::validator::{TableValidator, ValidationSeverity};
use ldc_core::table::TableKey;
use ldc_core::{compute, ConfigTable, LandingRequest};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the landing distance table (JSON)
    #[arg(short, long, env = "LDC_TABLE", global = true)]
    table: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a landing distance
    Compute {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format: text, json or csv
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Compute every request in a JSON array file
    Batch {
        file: PathBuf,
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// List the configurations and runway codes in the table
    List,
    /// Check the table for data-integrity problems
    Check,
    /// Remember a table path as the default
    SetTable { path: PathBuf },
}

#[derive(Args)]
struct RequestArgs {
    #[arg(long, default_value = "EMB145")]
    model: AircraftModel,
    /// Thrust reversers installed
    #[arg(long)]
    reversers: bool,
    #[arg(long, default_value = "45")]
    flaps: FlapSetting,
    /// Icing conditions
    #[arg(long)]
    icing: bool,
    #[arg(long, default_value = "CAT1")]
    category: ApproachCategory,
    /// Runway condition code (0-6)
    #[arg(long)]
    rwycc: RunwayCode,
    /// Landing weight in kg
    #[arg(long)]
    weight: f64,
    /// Pressure altitude in ft
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    altitude: f64,
    /// Temperature deviation from ISA in °C
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    isa_dev: f64,
    /// Wind speed in kt
    #[arg(long, default_value_t = 0.0)]
    wind: f64,
    #[arg(long, default_value = "headwind")]
    wind_dir: WindDirection,
    /// Runway slope in percent
    #[arg(long, default_value_t = 0.0)]
    slope: f64,
    #[arg(long, default_value = "uphill")]
    slope_dir: SlopeDirection,
    /// Speed additive to VREF in kt
    #[arg(long, default_value_t = 0.0)]
    vref_add: f64,
    /// Number of inoperative reversers
    #[arg(long, default_value_t = 0)]
    reversers_inop: u32,
}

impl RequestArgs {
    fn to_request(&self) -> LandingRequest {
        LandingRequest::new(
            self.model,
            self.reversers,
            self.flaps,
            self.icing,
            self.category,
            self.rwycc,
            self.weight,
        )
        .with_altitude(self.altitude)
        .with_isa_deviation(self.isa_dev)
        .with_wind(self.wind, self.wind_dir)
        .with_slope(self.slope, self.slope_dir)
        .with_vref_additive(self.vref_add)
        .with_reversers_inop(self.reversers_inop)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_table(cli_table: Option<&Path>, settings: &Settings) -> Result<ConfigTable> {
    let path = cli_table
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.resolved_table_path());
    ConfigTable::load_file(&path).with_context(|| {
        format!(
            "Could not load landing table {:?}. Specify one with --table or `ldc set-table`.",
            path
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings_manager = SettingsManager::new();
    let mut settings = settings_manager.load()?;

    let table_arg = cli.table.as_deref();

    match &cli.command {
        Commands::SetTable { path } => {
            let path = path
                .canonicalize()
                .with_context(|| format!("Table not found: {:?}", path))?;
            // Refuse to remember a table that would not load.
            ConfigTable::load_file(&path)?;
            settings.table_path = Some(path.clone());
            settings_manager.save(&settings)?;
            println!("Default table set to {:?}", path);
        }
        Commands::Compute { request, format } => {
            let table = load_table(table_arg, &settings)?;
            let request = request.to_request();
            if !request.reverser_installed && request.reversers_inop > 0 {
                log::info!("Ignoring --reversers-inop: no reversers installed");
            }
            let result = compute(&request, &table)?;
            let format = format.unwrap_or(settings.default_format);
            print!("{}", render(&result, format)?);
        }
        Commands::Batch { file, format } => {
            let table = load_table(table_arg, &settings)?;
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read request file {:?}", file))?;
            let requests: Vec<LandingRequest> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse request file {:?}", file))?;
            let format = format.unwrap_or(settings.default_format);
            let mut failed = 0;
            for (i, request) in requests.iter().enumerate() {
                match compute(request, &table) {
                    Ok(result) => {
                        println!("# Request {}", i + 1);
                        print!("{}", render(&result, format)?);
                        println!();
                    }
                    Err(e) => {
                        eprintln!("Request {}: {}", i + 1, e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} requests failed", failed, requests.len());
            }
        }
        Commands::List => {
            let table = load_table(table_arg, &settings)?;
            for (key, entry) in table.iter() {
                let codes: Vec<String> = entry.rwycc.keys().map(|c| c.to_string()).collect();
                let description = TableKey::parse(key)
                    .map(|parts| parts.to_string())
                    .unwrap_or_else(|| "unrecognised key".to_string());
                println!("{}", key);
                println!("    {}", description);
                println!("    RWYCC: {}", codes.join(", "));
                if let Some(overweight) = entry.overweight_coefficient {
                    println!("    Overweight: {} m per 1000 kg", overweight);
                }
            }
        }
        Commands::Check => {
            let table = load_table(table_arg, &settings)?;
            let report = TableValidator::validate(&table);
            if report.issues.is_empty() {
                println!("Table OK: {} configurations", table.len());
            }
            for issue in &report.issues {
                let tag = match issue.severity {
                    ValidationSeverity::Info => "[i]",
                    ValidationSeverity::Warning => "[W]",
                    ValidationSeverity::Critical => "[!]",
                };
                println!("{} {}: {}", tag, issue.config_key, issue.message);
            }
            if report.has_critical() {
                anyhow::bail!("Table has critical data-integrity issues");
            }
        }
    }

    Ok(())
}
