//! Call command - invoke any endpoint from the table by key.

use std::io::Read;

use anyhow::{Context as _, Result};
use clap::Args;
use nexthara_client::{CallArgs as RequestArgs, QueryParams};
use serde_json::Value;

use super::{parse_key_val, Context};

/// Arguments for the call command.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Endpoint key, e.g. applications.list (see `nexthara endpoints`)
    pub key: String,

    /// Path parameter, repeatable (e.g. -p id=APP-1)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Query parameter, repeatable (e.g. -q status=OPEN)
    #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// JSON request body; `@file.json` reads a file, `-` reads stdin
    #[arg(short = 'd', long)]
    pub data: Option<String>,
}

/// Run the call command.
pub async fn run(args: CallArgs, ctx: &Context) -> Result<()> {
    let request = build_request(args.params, args.query, args.data.as_deref())?;
    let client = ctx.client()?;
    let body = client.call(&args.key, request).await?;
    ctx.print_value(&body)
}

/// Assemble call arguments from parsed flags.
pub(crate) fn build_request(
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    data: Option<&str>,
) -> Result<RequestArgs> {
    let mut request = RequestArgs::new();
    for (name, value) in params {
        request = request.param(name, value);
    }

    if !query.is_empty() {
        let mut pairs = QueryParams::new();
        for (key, value) in query {
            pairs.push(key, value);
        }
        request = request.query_params(pairs);
    }

    if let Some(data) = data {
        request = request.json(read_body(data)?);
    }

    Ok(request)
}

fn read_body(data: &str) -> Result<Value> {
    let text = if data == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read body from stdin")?;
        buf
    } else if let Some(path) = data.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
    } else {
        data.to_string()
    };
    serde_json::from_str(&text).context("Request body is not valid JSON")
}
