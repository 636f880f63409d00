pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "autoflow",
    about = "AutoFlow operator CLI",
    long_about = "Check inventory sheet readiness, inspect effective config, and replay chat messages \
                  through the reply engine.",
    after_help = "Examples:\n  autoflow doctor --json\n  autoflow config\n  autoflow simulate \"price of red lipstick\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config, inventory header readability, and the orders tab")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Run one message through the reply engine and print the captured reply")]
    Simulate {
        #[arg(help = "Message text as a customer would send it")]
        message: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Simulate { message } => commands::simulate::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
