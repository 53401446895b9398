use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "tether", about = "A line-oriented terminal tethered to a remote backend")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the terminal UI to a backend
    Connect(commands::connect::ConnectArgs),
    /// Run the backend server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Connect(args) => commands::connect::run(args, cli.verbose).await,
        Commands::Serve(args) => commands::serve::run(args, cli.verbose).await,
    }
}
