mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::commercial::MultifamilyArgs;
use commands::pricing::SuggestPriceArgs;
use commands::residential::{CostsArgs, FlipArgs, RefinanceArgs};
use commands::wholesale::WholesaleArgs;

/// Real estate investment deal analysis
#[derive(Parser)]
#[command(
    name = "reic",
    version,
    about = "Real estate investment deal analysis",
    long_about = "A CLI for analyzing real estate investment deals with decimal \
                  precision. Supports rental purchase cost modelling, BRRRR \
                  refinancing, flips, commercial multi-family acquisitions, \
                  wholesale assignments, and purchase price suggestions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze purchase cost basis for a rental property
    Costs(CostsArgs),
    /// Analyze the refinance leg of a BRRRR deal
    Refinance(RefinanceArgs),
    /// Analyze flip profitability (buy, hold, sell)
    Flip(FlipArgs),
    /// Analyze a commercial multi-family acquisition
    Multifamily(MultifamilyArgs),
    /// Price a wholesale assignment (70% rule)
    Wholesale(WholesaleArgs),
    /// Solve for the purchase price that hits a cashflow target
    SuggestPrice(SuggestPriceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Costs(args) => commands::residential::run_costs(args),
        Commands::Refinance(args) => commands::residential::run_refinance(args),
        Commands::Flip(args) => commands::residential::run_flip(args),
        Commands::Multifamily(args) => commands::commercial::run_multifamily(args),
        Commands::Wholesale(args) => commands::wholesale::run_wholesale(args),
        Commands::SuggestPrice(args) => commands::pricing::run_suggest_price(args),
        Commands::Version => {
            println!("reic {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
