//! ApproveX CLI
//!
//! Maintenance commands for approval files: find where a test's snapshot
//! lives, list candidates waiting for review, and approve them.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "approvex")]
#[command(about = "ApproveX - approval file maintenance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the approval file paths for a test
    Locate(commands::locate::LocateArgs),
    /// List not-approved files waiting for review
    Pending(commands::pending::PendingArgs),
    /// Rename a not-approved file to its approved name
    Approve(commands::approve::ApproveArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Locate(args) => commands::locate::execute(args),
        Commands::Pending(args) => commands::pending::execute(args),
        Commands::Approve(args) => commands::approve::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
