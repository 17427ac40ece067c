use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{AppConfig, BIND_ENV, DEFAULT_BIND_ADDR, DUNGEONS_ENV, ULTRAS_ENV};
use crate::data::dungeon::DEFAULT_DUNGEONS_PATH;
use crate::data::record::Keyed;
use crate::data::ultra::DEFAULT_ULTRAS_PATH;
use crate::data::validate::{validate_registry, ValidationSeverity};
use crate::data::{DataPaths, DataRegistry};
use crate::estimator::{
    parse_dice_bonus, DropRateEstimator, EstimateOutcome, Selection, DISCLAIMER,
};
use crate::server;

#[derive(Debug, Parser)]
#[command(name = "ultradrop", version, about = "Expected dungeon runs to obtain an ultra drop")]
pub struct Cli {
    /// Dungeon table: JSON file path or http(s) URL
    #[arg(long, global = true, env = DUNGEONS_ENV, default_value = DEFAULT_DUNGEONS_PATH)]
    pub dungeons: String,

    /// Ultra table: JSON file path or http(s) URL
    #[arg(long, global = true, env = ULTRAS_ENV, default_value = DEFAULT_ULTRAS_PATH)]
    pub ultras: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Average runs of a dungeon needed for one drop of an ultra
    Estimate {
        /// Dungeon name or id
        #[arg(long)]
        dungeon: String,

        /// Ultra name or id
        #[arg(long)]
        ultra: String,

        /// Luck stat (clamped to 0-25)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        luck: i64,

        /// Dice bonus multiplier (e.g. 0, 0.5, 1)
        #[arg(long, default_value = "0")]
        dice: String,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the dungeons an ultra can drop in
    Locations {
        /// Ultra name or id
        #[arg(required = true, num_args = 1..)]
        ultra: Vec<String>,
    },

    /// List the records of one table
    List {
        #[arg(value_enum)]
        table: Table,
    },

    /// Check both tables for records that cannot be used in a calculation
    Validate,

    /// Serve the picker page and JSON API
    Serve {
        #[arg(long, env = BIND_ENV, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Dungeons,
    Ultras,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 2 } else { 0 };
        }
    };

    let bind = match &cli.command {
        Command::Serve { bind } => bind.as_str(),
        _ => DEFAULT_BIND_ADDR,
    };
    let config = AppConfig::new(&cli.dungeons, &cli.ultras, bind);

    let outcome = match cli.command {
        Command::Estimate {
            dungeon,
            ultra,
            luck,
            dice,
            json,
        } => {
            let selection = Selection::new(&dungeon, &ultra, luck, parse_dice_bonus(&dice));
            handle_estimate(&config.data, selection, json)
        }
        Command::Locations { ultra } => handle_locations(&config.data, &ultra.join(" ")),
        Command::List { table } => handle_list(&config.data, table),
        Command::Validate => handle_validate(&config.data),
        Command::Serve { .. } => handle_serve(&config),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn load(paths: &DataPaths) -> Result<Arc<DataRegistry>> {
    DataRegistry::load(paths).context("could not load dungeon and ultra tables")
}

fn handle_estimate(paths: &DataPaths, selection: Selection, as_json: bool) -> Result<i32> {
    let registry = load(paths)?;
    let outcome = DropRateEstimator::new(&registry).estimate(&selection)?;

    if as_json {
        let payload = serde_json::json!({ "result": outcome, "disclaimer": DISCLAIMER });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(0);
    }

    match &outcome {
        EstimateOutcome::Runs(estimate) => {
            println!("{}: {}", estimate.ultra, estimate.dungeon);
            println!("{}", outcome.headline());
            println!(
                "  drop chance {:.4}% per run (luck {}, dice x{}, effective luck {})",
                estimate.drop_chance_percent,
                estimate.luck,
                estimate.dice_bonus,
                estimate.effective_luck
            );
        }
        EstimateOutcome::Impossible(_) => println!("{}", outcome.headline()),
    }
    println!("{DISCLAIMER}");
    Ok(0)
}

fn handle_locations(paths: &DataPaths, ultra: &str) -> Result<i32> {
    let registry = load(paths)?;
    let eligibility = DropRateEstimator::new(&registry).locations(ultra)?;

    println!("{ultra} {}", eligibility.description);
    for dungeon in &eligibility.dungeons {
        println!("  {:<30} {:>10}", dungeon.display_key(), format_tickets(dungeon.tickets));
    }
    Ok(0)
}

fn handle_list(paths: &DataPaths, table: Table) -> Result<i32> {
    let registry = load(paths)?;

    match table {
        Table::Dungeons => {
            println!("Known dungeons ({}):\n", registry.dungeons().len());
            for dungeon in registry.dungeons() {
                println!("  {:<30} {:>10}", dungeon.display_key(), format_tickets(dungeon.tickets));
            }
        }
        Table::Ultras => {
            println!("Known ultras ({}):\n", registry.ultras().len());
            for ultra in registry.ultras() {
                let drops_in = ultra
                    .drops_in
                    .as_deref()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or("all");
                println!(
                    "  {:<30} {:>10}  {}",
                    ultra.display_key(),
                    format_tickets(ultra.tickets),
                    drops_in
                );
            }
        }
    }
    Ok(0)
}

fn handle_validate(paths: &DataPaths) -> Result<i32> {
    let registry = load(paths)?;
    let report = validate_registry(&registry);

    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s), {} warning(s)",
            report.count(ValidationSeverity::Error),
            report.count(ValidationSeverity::Warning)
        );
        return Ok(1);
    }
    println!(
        "validation passed: {} dungeons, {} ultras, {} warning(s)",
        registry.dungeons().len(),
        registry.ultras().len(),
        report.count(ValidationSeverity::Warning)
    );
    Ok(0)
}

fn handle_serve(config: &AppConfig) -> Result<i32> {
    server::run_server(&config.bind_addr, config.data.clone())
        .with_context(|| format!("server error on {}", config.bind_addr))?;
    Ok(0)
}

fn format_tickets(tickets: Option<f64>) -> String {
    tickets.map_or_else(|| "-".to_string(), |t| t.to_string())
}
