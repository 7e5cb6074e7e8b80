//! Quick MD Helper CLI: the main entry point.
//!
//! Commands:
//! - `onboard`   : Write a default config file
//! - `tasks`     : List the clinical tasks
//! - `templates` : List the case templates
//! - `ask`       : Run one task (or all) on a case and print the result
//! - `chat`      : Interactive session with history
//! - `serve`     : Start the web form and HTTP API

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quickmd",
    about = "Quick MD Helper — guideline-aligned clinical summaries",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config directory and a default config file
    Onboard,

    /// List the available tasks
    Tasks,

    /// List the case templates
    Templates,

    /// Run a task on a case and print the formatted answer
    Ask {
        /// Task id or label (default: treatment)
        #[arg(short, long, conflicts_with = "all")]
        task: Option<String>,

        /// Run all three tasks
        #[arg(short, long)]
        all: bool,

        /// Patient presentation text
        #[arg(short, long, conflicts_with = "template")]
        case: Option<String>,

        /// Use a case template by label
        #[arg(long)]
        template: Option<String>,
    },

    /// Interactive session: edit a case, run tasks, review history
    Chat,

    /// Start the HTTP gateway and web form
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Tasks => commands::tasks::run().await?,
        Commands::Templates => commands::templates::run().await?,
        Commands::Ask {
            task,
            all,
            case,
            template,
        } => commands::ask::run(task, all, case, template).await?,
        Commands::Chat => commands::chat::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
    }

    Ok(())
}
