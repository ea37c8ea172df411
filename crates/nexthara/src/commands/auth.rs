//! Auth commands - login, logout and whoami.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use console::{style, Style};
use serde_json::{json, Value};

use super::Context;

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (default: the context's email, else prompted)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (prompted without echo when omitted)
    #[arg(long, env = "NEXTHARA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Sign in and persist the token for the active context.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = match args.email.or_else(|| ctx.default_email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        anyhow::bail!("No email provided");
    }

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let client = ctx.client()?;
    let response = client.auth().login(&email, &password).await?;

    if ctx.json_output {
        let output = json!({
            "context": ctx.context_name,
            "server": ctx.server_url,
            "user": response.user,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let green = Style::new().green();
        println!(
            "{} Logged in to {} as {}",
            green.apply_to("✓"),
            ctx.server_url,
            display_name(response.user.as_ref()).unwrap_or(&email)
        );
    }

    Ok(())
}

/// Drop the stored token. Local only; nothing is sent to the server.
pub fn logout(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let had_token = session.has_token();
    session.logout()?;

    if ctx.json_output {
        println!("{}", json!({ "context": ctx.context_name, "logged_out": had_token }));
    } else if had_token {
        println!("Logged out of context \"{}\".", ctx.context_name);
    } else {
        println!("No stored session for context \"{}\".", ctx.context_name);
    }

    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    if !client.session().has_token() {
        anyhow::bail!("Not logged in. Run 'nexthara login' first.");
    }

    let user = client.auth().me().await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Signed in").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    for field in ["name", "email", "role", "tenant_id"] {
        if let Some(value) = user.get(field).filter(|v| !v.is_null()) {
            println!("  {:<10} {}", dim.apply_to(format!("{field}:")), plain(value));
        }
    }
    println!("  {:<10} {}", dim.apply_to("server:"), ctx.server_url);
    println!("  {:<10} {}", dim.apply_to("context:"), ctx.context_name);
    println!();

    Ok(())
}

fn display_name(user: Option<&Value>) -> Option<&str> {
    let user = user?;
    user.get("name")
        .or_else(|| user.get("email"))
        .and_then(Value::as_str)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
