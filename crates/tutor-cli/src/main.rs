//! `tutor` -- CLI binary for the homework tutor pipeline.
//!
//! Provides the following subcommands:
//!
//! - `tutor ask` -- Run one question for one student through the pipeline.
//! - `tutor students list` -- Show the student table.
//! - `tutor students init` -- Create the student table and seed the demo rows.

use clap::{Parser, Subcommand};

mod commands;

/// Homework tutor CLI.
#[derive(Parser)]
#[command(name = "tutor", about = "Homework tutor CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Ask a homework question on behalf of a student.
    Ask(commands::ask::AskArgs),

    /// Inspect or seed the student table.
    Students {
        #[command(subcommand)]
        action: StudentsCmd,
    },
}

/// Subcommands for `tutor students`.
#[derive(Subcommand)]
enum StudentsCmd {
    /// List all registered students.
    List {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Create the table and insert the demo students.
    Init {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args).await?,
        Commands::Students { action } => match action {
            StudentsCmd::List { config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::students::students_list(&cfg).await?;
            }
            StudentsCmd::Init { config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::students::students_init(&cfg).await?;
            }
        },
    }

    Ok(())
}
