use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "taskgrove-cli", version, about = "Taskgrove CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Tree management
    Tree {
        #[command(subcommand)]
        action: commands::tree::TreeAction,
    },
    /// Health scoring and forecasts
    Health {
        #[command(subcommand)]
        action: commands::health::HealthAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Tree { action } => commands::tree::run(action),
        Commands::Health { action } => commands::health::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
