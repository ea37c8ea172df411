//! Nexthara CRM command-line client
//!
//! Main entry point for the `nexthara` CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, call, config, endpoints, link, upload};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Nexthara - command-line client for the loan-application CRM
#[derive(Parser)]
#[command(name = "nexthara")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (default: from the current context, else http://localhost:4000)
    #[arg(long, global = true, env = "NEXTHARA_SERVER_URL")]
    pub server: Option<String>,

    /// Context to use instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login(auth::LoginArgs),

    /// Drop the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Call any backend endpoint by key
    Call(call::CallArgs),

    /// Upload a document to an application or lead
    Upload(upload::UploadArgs),

    /// Print file and export URLs
    Link(link::LinkArgs),

    /// List known backend endpoints
    Endpoints(endpoints::EndpointsArgs),

    /// Context and configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "nexthara=debug,nexthara_client=debug,nexthara_config=debug,info"
    } else {
        "nexthara=info,nexthara_client=warn,nexthara_config=warn,warn"
    };

    let log_dir = nexthara_config::logs_dir().unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "nexthara.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "nexthara=trace,nexthara_client=trace,nexthara_config=trace,info",
                )),
        )
        .init();

    // Config commands manage contexts themselves; everything else needs one resolved.
    let ctx = commands::Context::resolve(
        cli.server,
        cli.context,
        cli.json,
        cli.verbose,
        matches!(cli.command, Commands::Config(_)),
    )?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Login(args) => auth::login(args, &ctx).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::Call(args) => call::run(args, &ctx).await,
        Commands::Upload(args) => upload::run(args, &ctx).await,
        Commands::Link(args) => link::run(args, &ctx),
        Commands::Endpoints(args) => endpoints::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
