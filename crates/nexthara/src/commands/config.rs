//! Config command - client context management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{style, Style};
use nexthara_config::{ClientConfig, Context as ClientContext};
use serde_json::json;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the config file, contexts and the resolved connection
    Show,

    /// Create or update a context
    SetContext {
        /// Context name (letters, digits, '-' or '_')
        name: String,

        /// Server URL (e.g., http://localhost:4000)
        #[arg(long = "url", alias = "server-url")]
        url: Option<String>,

        /// Default login email for this context
        #[arg(long)]
        email: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::SetContext {
            name,
            url,
            email,
            timeout,
        } => cmd_set_context(&name, url, email, timeout),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::DeleteContext { name } => cmd_delete_context(&name),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let config = nexthara_config::load_client_config()?;
    let path = nexthara_config::client_config_path();

    if ctx.json_output {
        let output = json!({
            "path": path.as_ref().map(|p| p.display().to_string()),
            "current_context": config.current_context,
            "contexts": config.contexts.iter().map(|c| json!({
                "name": c.name,
                "server": c.server,
                "email": c.email,
                "timeout": config.timeout_secs(&c.name),
            })).collect::<Vec<_>>(),
            "resolved": {
                "context": ctx.context_name,
                "server": ctx.server_url,
                "timeout": ctx.timeout.as_secs(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();

    println!("{}", style("# Nexthara Client Configuration").bold());
    println!();
    match &path {
        Some(p) if p.exists() => println!("Config file: {}", p.display()),
        Some(p) => println!("Config file: {} {}", p.display(), dim.apply_to("(not created yet)")),
        None => println!("Config file: {}", dim.apply_to("no config directory")),
    }
    println!();

    print_contexts(&config);
    println!();

    println!("Resolved:");
    println!("  {:<9} {}", dim.apply_to("context:"), ctx.context_name);
    println!("  {:<9} {}", dim.apply_to("server:"), ctx.server_url);
    println!("  {:<9} {}s", dim.apply_to("timeout:"), ctx.timeout.as_secs());

    Ok(())
}

fn print_contexts(config: &ClientConfig) {
    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!();
        println!("Create one with:");
        println!("  nexthara config set-context local --url=http://localhost:4000");
        return;
    }

    let current = config.current_context.as_deref();

    println!("CURRENT   NAME            SERVER");
    for ctx in &config.contexts {
        let marker = if current == Some(ctx.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{}         {:<15} {}", marker, ctx.name, ctx.server);
    }
}

fn cmd_set_context(
    name: &str,
    url: Option<String>,
    email: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let mut config = nexthara_config::load_client_config()?;

    let context = match config.get_context(name) {
        Some(existing) => {
            let mut updated = existing.clone();
            if let Some(url) = url {
                updated.server = url;
            }
            if email.is_some() {
                updated.email = email;
            }
            if timeout.is_some() {
                updated.timeout = timeout;
            }
            println!("Context \"{}\" modified.", name);
            updated
        }
        None => {
            // Creating new context: server is required
            let server_url = url
                .ok_or_else(|| anyhow::anyhow!("--url is required when creating a new context"))?;
            let mut created = ClientContext::new(name, server_url);
            created.email = email;
            created.timeout = timeout;
            println!("Context \"{}\" created.", name);
            created
        }
    };

    config.set_context(context)?;

    // If this is the first context, make it current
    if config.current_context.is_none() && config.contexts.len() == 1 {
        config.current_context = Some(name.to_string());
        println!("Context \"{}\" set as current context.", name);
    }

    nexthara_config::save_client_config(&config)?;
    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = nexthara_config::load_client_config()?;

    config.use_context(name)?;
    nexthara_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);

    Ok(())
}

fn cmd_delete_context(name: &str) -> Result<()> {
    let mut config = nexthara_config::load_client_config()?;

    match config.remove_context(name) {
        Some(_) => {
            nexthara_config::save_client_config(&config)?;
            println!("Context \"{}\" deleted.", name);
            if config.current_context.is_none() {
                println!(
                    "Note: No current context. Use 'nexthara config use-context <name>' to set one."
                );
            }
        }
        None => {
            anyhow::bail!("Context \"{}\" not found.", name);
        }
    }

    Ok(())
}
