//! Command-line surface: one-shot search, health check, and the interactive session.

mod interactive;

use std::error::Error;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use tracing::{error, info};

use crate::config::Settings;
use crate::search::{Filters, SearchController, SearchMode, SortOrder};
use crate::service::ServiceClient;
use crate::view::format::render;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "pubscout",
    about = "Search PubMed literature through a semantic search service",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Search service root URL (overrides PUBSCOUT_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output as JSON instead of Markdown
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and print the results
    Search(SearchArgs),
    /// Check that the search service is reachable
    Health,
    /// Read queries and commands from stdin (`:help` lists commands)
    Interactive {
        /// Initial search mode
        #[arg(long, value_enum, default_value_t = SearchMode::Semantic)]
        mode: SearchMode,
        /// Start with MeSH query expansion disabled
        #[arg(long)]
        no_mesh: bool,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query; multiple words are joined with spaces
    pub query: Vec<String>,

    /// How the service matches the query
    #[arg(long, value_enum, default_value_t = SearchMode::Semantic)]
    pub mode: SearchMode,

    /// Disable MeSH query expansion
    #[arg(long)]
    pub no_mesh: bool,

    /// Publication year of interest (shown with results, not sent to the service)
    #[arg(long)]
    pub year: Option<i32>,

    /// Journal of interest (shown with results, not sent to the service)
    #[arg(long)]
    pub journal: Option<String>,

    /// Preferred ordering (shown with results; server order is kept)
    #[arg(long, value_enum, default_value_t = SortOrder::Relevance)]
    pub sort: SortOrder,

    /// Show the full abstract of this result id (repeatable)
    #[arg(long = "expand", value_name = "ID")]
    pub expand: Vec<usize>,

    /// Show full abstracts for every result
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env(cli.base_url.as_deref())?;
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(settings.request_timeout)
        .build()?;
    let client = ServiceClient::new(http, settings.base_url);
    info!(base_url = %client.base_url(), "search service configured");

    match cli.command {
        Commands::Search(args) => run_search(&client, args, cli.json).await,
        Commands::Health => run_health(&client, cli.json).await,
        Commands::Interactive { mode, no_mesh } => {
            interactive::run(client, SearchController::new(mode, !no_mesh)).await?;
            Ok(())
        }
    }
}

async fn run_search(
    client: &ServiceClient,
    args: SearchArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut controller = SearchController::new(args.mode, !args.no_mesh);
    *controller.filters_mut() = Filters {
        year: args.year,
        journal: args.journal,
        sort: args.sort,
    };

    let query = args.query.join(" ");
    if controller.submit(client, &query).await.is_none() {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(controller.outcome())?);
        return Ok(());
    }

    let ids: Vec<usize> = if args.expand_all {
        controller.outcome().results.iter().map(|r| r.id).collect()
    } else {
        args.expand
    };
    for id in ids {
        if !controller.expanded().contains(id) {
            controller.toggle_expanded(id);
        }
    }

    print!("{}", render(&controller.render_context()));
    Ok(())
}

async fn run_health(client: &ServiceClient, json: bool) -> Result<(), Box<dyn Error>> {
    let check = client
        .health()
        .await
        .inspect_err(|e| error!("search service unreachable at {}: {e}", client.base_url()))?;

    let latency_ms = check.latency.as_millis();
    if json {
        let body = serde_json::json!({
            "base_url": client.base_url().as_str(),
            "status": check.status,
            "latency_ms": latency_ms,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}: {} ({latency_ms}ms)", client.base_url(), check.status);
    }
    Ok(())
}
