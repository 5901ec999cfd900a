pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "gemhook",
    about = "Gemhook operator CLI",
    long_about = "Inspect configuration, validate catalog readiness, and run catalog maintenance for the gemstone webhook service.",
    after_help = "Examples:\n  gemhook doctor --json\n  gemhook stone-types\n  gemhook rewrite-urls --from-host pctez9-jr.myshopify.com --to-base https://rezagemcollection.ca --write"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and catalog loadability and report counts")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List the distinct stone types in the catalog")]
    StoneTypes,
    #[command(about = "Rewrite product URLs from an old storefront host to the site domain")]
    RewriteUrls {
        #[arg(long, help = "Host fragment identifying product URLs to rewrite")]
        from_host: String,
        #[arg(long, help = "Base URL of the destination site")]
        to_base: String,
        #[arg(long, help = "Write the rewritten catalog back to disk (dry run otherwise)")]
        write: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::StoneTypes => commands::stone_types::run(),
        Command::RewriteUrls { from_host, to_base, write } => {
            commands::rewrite_urls::run(&from_host, &to_base, write)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
