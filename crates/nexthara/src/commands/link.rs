//! Link command - print document and export URLs without fetching them.

use anyhow::Result;
use clap::{Args, Subcommand};
use nexthara_client::LinkMode;
use serde_json::json;

use super::call::build_request;
use super::{parse_key_val, Context};

/// Arguments for the link command.
#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// URL of an application document's file
    Document {
        /// Application ID
        application_id: String,

        /// Document ID
        doc_id: String,

        /// Ask the server to send it as an attachment
        #[arg(long)]
        download: bool,
    },

    /// URL of a CSV export or any other link endpoint
    Export {
        /// Endpoint key, e.g. leads.export
        key: String,

        /// Path parameter, repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Query filter, repeatable (e.g. -q status=OPEN)
        #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,
    },
}

/// Run the link command.
pub fn run(args: LinkArgs, ctx: &Context) -> Result<()> {
    let links = ctx.client()?.links();

    let url = match args.command {
        LinkCommand::Document {
            application_id,
            doc_id,
            download,
        } => {
            let mode = if download {
                LinkMode::Download
            } else {
                LinkMode::View
            };
            links.document(&application_id, &doc_id, mode)?
        }
        LinkCommand::Export { key, params, query } => {
            links.link(&key, build_request(params, query, None)?)?
        }
    };

    if ctx.json_output {
        println!("{}", json!({ "url": url.as_str() }));
    } else {
        println!("{url}");
    }

    Ok(())
}
