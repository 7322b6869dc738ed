mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{CompareArgs, LoanArgs, RatesArgs};

/// Mortgage amortization schedules
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Mortgage amortization schedules",
    long_about = "Computes fixed-rate mortgage payments and amortization schedules \
                  with decimal precision. Quoted rates compound semi-annually; \
                  monthly, bi-weekly, weekly and accelerated frequencies are supported."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log derived rates and payments to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full amortization schedule
    Schedule(LoanArgs),
    /// Quote the periodic payment without the schedule
    Payment(LoanArgs),
    /// Convert a quoted rate to annual, monthly and periodic rates
    Rates(RatesArgs),
    /// Compare every payment frequency for the same loan
    Compare(CompareArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Rates(args) => commands::amortization::run_rates(args),
        Commands::Compare(args) => commands::amortization::run_compare(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
