pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "salesrec",
    about = "Salesrec operator CLI",
    long_about = "Operate Salesrec migrations, demo catalog seeding, readiness checks, and ad-hoc recommendations.",
    after_help = "Examples:\n  salesrec migrate\n  salesrec seed\n  salesrec doctor --json\n  salesrec recommend --company Fowler --query Cleaner"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and verify it")]
    Seed,
    #[command(about = "Validate config, llm readiness, and DB connectivity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run one recommendation request against the local catalog")]
    Recommend {
        #[arg(long, help = "Company the request is on behalf of")]
        company: String,
        #[arg(long, help = "Free-text product query")]
        query: String,
        #[arg(long, help = "Number of recommendations to return (1-10)")]
        count: Option<usize>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Recommend { company, query, count } => {
            commands::recommend::run(&company, &query, count)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
