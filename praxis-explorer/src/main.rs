//! CLI for the Praxis explorer: search agents, show one agent, trigger an
//! index refresh, and resolve IPFS agent cards.
//!
//! API base URL and timeouts come from `PRAXIS_*` env vars (a `.env` file is
//! loaded first); flags override them. Results go to stdout, logs to stderr
//! and the log file.

mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use praxis_sdk::{candidate_urls, ExplorerConfig, RefreshRequest, SearchQuery};
use tracing::debug;

#[derive(Parser)]
#[command(name = "praxis-explorer")]
#[command(about = "Browse and search ERC-8004 agent identities indexed by a Praxis explorer")]
struct Args {
    /// Explorer API base URL (overrides PRAXIS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Per-gateway timeout for IPFS fetches, in seconds (overrides PRAXIS_IPFS_TIMEOUT_SECS)
    #[arg(long, global = true)]
    ipfs_timeout_secs: Option<u64>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Directory for the log file
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search agents
    Search {
        /// Free-text query
        #[arg(long, short)]
        q: Option<String>,
        #[arg(long)]
        network: Option<String>,
        #[arg(long)]
        capability: Option<String>,
        #[arg(long)]
        skill: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// feedback, reputation, economic or hybrid
        #[arg(long)]
        trust_model: Option<String>,
        /// Continuation token printed by a previous search
        #[arg(long)]
        cursor: Option<String>,
        /// Page size
        #[arg(long, short, default_value = "12")]
        limit: u32,
        /// Follow the cursor for up to this many pages
        #[arg(long, default_value = "1")]
        pages: usize,
    },
    /// Show one agent
    Agent { chain_id: String, agent_id: String },
    /// Ask the indexer to re-read an agent
    Refresh {
        chain_id: String,
        domain: String,
        agent_id: u64,
        #[arg(long)]
        registry_addr: Option<String>,
    },
    /// Fetch an agent card from IPFS through the public gateways
    Card { uri: String },
    /// List the gateway URLs that would be tried for an IPFS URI
    Gateways { uri: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let _log_guard = praxis_sdk::log::init_logger(args.log_dir.clone());

    let mut cfg = ExplorerConfig::from_env().context("reading PRAXIS_* environment")?;
    if let Some(url) = &args.api_url {
        cfg.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = args.ipfs_timeout_secs {
        cfg.ipfs_attempt_timeout = Duration::from_secs(secs);
    }
    debug!(api = %cfg.api_base_url, ipfs_timeout = ?cfg.ipfs_attempt_timeout, "resolved config");

    run(args.command, &cfg, args.json).await
}

async fn run(command: Command, cfg: &ExplorerConfig, json: bool) -> Result<()> {
    match command {
        Command::Search {
            q,
            network,
            capability,
            skill,
            tag,
            trust_model,
            cursor,
            limit,
            pages,
        } => {
            let query = SearchQuery {
                text: q,
                network,
                capability,
                skill,
                tag,
                trust_model,
                cursor,
                limit: Some(limit),
            };
            let client = cfg.client()?;
            let page = client
                .search_all(&query, pages.max(1))
                .await
                .context("search failed")?;
            if json {
                output::print_json(&output::page_json(&page))?;
            } else {
                output::print_page(&page, chrono::Utc::now());
            }
        }
        Command::Agent { chain_id, agent_id } => {
            let client = cfg.client()?;
            let agent = client
                .get_agent(&chain_id, &agent_id)
                .await
                .with_context(|| format!("fetching agent {}/{}", chain_id, agent_id))?;
            if json {
                output::print_json(&serde_json::to_value(&agent)?)?;
            } else {
                output::print_agent(&agent, chrono::Utc::now());
            }
        }
        Command::Refresh {
            chain_id,
            domain,
            agent_id,
            registry_addr,
        } => {
            let mut request = RefreshRequest::new(chain_id, domain, agent_id);
            request.registry_addr = registry_addr;
            let result = cfg
                .client()?
                .request_refresh(&request)
                .await
                .context("refresh failed")?;
            output::print_json(&result)?;
        }
        Command::Card { uri } => {
            let card = cfg
                .ipfs_fetcher()
                .fetch(&uri)
                .await
                .with_context(|| format!("fetching agent card {}", uri))?;
            output::print_json(&card)?;
        }
        Command::Gateways { uri } => {
            let urls = candidate_urls(&uri);
            if urls.is_empty() {
                anyhow::bail!("{} is not an ipfs:// URI", uri);
            }
            for url in urls {
                println!("{}", url);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_requests_twelve_agents_per_page_by_default() {
        let args = Args::try_parse_from(["praxis-explorer", "search", "-q", "weather"]).unwrap();
        match args.command {
            Command::Search { q, limit, pages, .. } => {
                assert_eq!(q.as_deref(), Some("weather"));
                assert_eq!(limit, 12);
                assert_eq!(pages, 1);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn search_limit_can_be_overridden() {
        let args = Args::try_parse_from(["praxis-explorer", "search", "--limit", "50"]).unwrap();
        assert!(matches!(args.command, Command::Search { limit: 50, .. }));
    }
}
