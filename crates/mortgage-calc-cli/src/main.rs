mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use mortgage_calc_core::{CalculatorConfig, MortgageCalcError, TotalBasis};

use commands::mortgage::FormArgs;
use commands::session::SessionArgs;

/// Mortgage repayment calculator
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage repayment calculator",
    long_about = "Validates mortgage amount, term, rate and type, then computes the \
                  monthly repayment and the total repaid over the term with decimal \
                  precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// What the total figure reports
    #[arg(long, default_value = "cumulative", global = true)]
    total_basis: TotalBasisArg,

    /// Log validation and form transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the form and calculate monthly and total repayments
    Calculate(FormArgs),
    /// Validate the form without calculating
    Validate(FormArgs),
    /// Replay a sequence of form events (edit, submit, reset)
    Session(SessionArgs),
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TotalBasisArg {
    /// Monthly repayment × term × 12
    Cumulative,
    /// One year's instalment at the annual rate
    AnnualInstalment,
}

impl From<TotalBasisArg> for CalculatorConfig {
    fn from(arg: TotalBasisArg) -> Self {
        let total_basis = match arg {
            TotalBasisArg::Cumulative => TotalBasis::Cumulative,
            TotalBasisArg::AnnualInstalment => TotalBasis::AnnualInstalment,
        };
        CalculatorConfig { total_basis }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = CalculatorConfig::from(cli.total_basis);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::mortgage::run_calculate(args, &config),
        Commands::Validate(args) => commands::mortgage::run_validate(args),
        Commands::Session(args) => commands::session::run_session(args, &config),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<MortgageCalcError>() {
                Some(MortgageCalcError::Validation(errors)) => {
                    eprintln!("{}: invalid mortgage details", "error".red().bold());
                    for (field, err) in errors.iter() {
                        eprintln!("  {}: {}", field.as_str().red(), err.message);
                    }
                }
                _ => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}
