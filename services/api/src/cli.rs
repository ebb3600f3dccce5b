use crate::commands::{run_classify, run_missing_rules, ClassifyArgs, RulesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use bodyplan::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Body Program Planner",
    about = "Assign fitness programs from body measurements, over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify one set of measurements and print the resolved program
    Classify(ClassifyArgs),
    /// Inspect the active rule set
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// List realistic combinations that currently have no active rule
    Missing(RulesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Rule override CSV applied on top of the seeded rules
    #[arg(long)]
    pub(crate) rules_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Classify(args) => run_classify(args),
        Command::Rules {
            command: RulesCommand::Missing(args),
        } => run_missing_rules(args),
    }
}
