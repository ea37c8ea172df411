//! Endpoints command - list the backend endpoint table.

use anyhow::Result;
use clap::Args;
use console::Style;
use nexthara_client::{Access, BodyKind, Endpoint, Namespace, ENDPOINTS};
use serde_json::{json, Value};

use super::Context;

/// Arguments for the endpoints command.
#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Only show one namespace (e.g. applications, co-applicants)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

/// Run the endpoints command.
pub fn run(args: EndpointsArgs, ctx: &Context) -> Result<()> {
    let namespace = match args.namespace.as_deref() {
        Some(name) => Some(Namespace::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = Namespace::ALL.iter().map(|ns| ns.name()).collect();
            anyhow::anyhow!("Unknown namespace '{}'. Known: {}", name, known.join(", "))
        })?),
        None => None,
    };

    let rows: Vec<&Endpoint> = ENDPOINTS
        .iter()
        .filter(|ep| namespace.is_none_or(|ns| ep.namespace == ns))
        .collect();

    if ctx.json_output {
        let output: Vec<Value> = rows.iter().map(|ep| to_json(ep)).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{:<32} {:<7} {:<52} {}", "KEY", "METHOD", "PATH", "NOTES");
    for ep in rows {
        println!(
            "{:<32} {:<7} {:<52} {}",
            ep.key(),
            ep.method.as_str(),
            ep.path,
            dim.apply_to(notes(ep))
        );
    }

    Ok(())
}

fn to_json(ep: &Endpoint) -> Value {
    json!({
        "key": ep.key(),
        "method": ep.method.as_str(),
        "path": ep.path,
        "access": access_name(ep.access),
        "body": body_name(ep.body),
        "params": ep.path_params().collect::<Vec<_>>(),
    })
}

fn notes(ep: &Endpoint) -> String {
    let mut notes = Vec::new();
    match ep.access {
        Access::Session => {}
        Access::Public => notes.push("public"),
        Access::Link => notes.push("link"),
    }
    match ep.body {
        BodyKind::NoBody => {}
        BodyKind::Json => notes.push("json body"),
        BodyKind::EmptyObject => notes.push("{}"),
        BodyKind::Multipart => notes.push("multipart"),
    }
    notes.join(", ")
}

fn access_name(access: Access) -> &'static str {
    match access {
        Access::Session => "session",
        Access::Public => "public",
        Access::Link => "link",
    }
}

fn body_name(body: BodyKind) -> &'static str {
    match body {
        BodyKind::NoBody => "none",
        BodyKind::Json => "json",
        BodyKind::EmptyObject => "empty-object",
        BodyKind::Multipart => "multipart",
    }
}
