//! Agent directory API for the Praxis explorer.
//!
//! Search agents, fetch a single agent, and trigger an index refresh.
//! Reads are best-effort: a malformed search response degrades to an empty
//! page instead of failing the caller.

mod display;
mod types;

use crate::client::{ensure_success, Client};
use crate::request::RequestBuilderExt;
use crate::Error;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use display::{
    chain_name, format_relative, is_online, skill_name, skill_tags, trust_model_color,
    truncate_address, ONLINE_WINDOW_MINUTES,
};
pub use types::{AgentRecord, RefreshRequest, SearchPage, SearchQuery};

/// Builds a page from a raw `/agents` body.
///
/// Non-JSON bodies and non-array `items` give an empty list; `nextCursor`
/// is kept only when it is a string. Items that do not decode are skipped.
pub(crate) fn parse_search_page(body: &str) -> SearchPage {
    let data: Value = serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));
    let items = match data.get("items") {
        Some(Value::Array(raw)) => raw
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                serde_json::from_value::<AgentRecord>(item.clone())
                    .map_err(|e| warn!(index, error = %e, "skipping undecodable agent item"))
                    .ok()
            })
            .collect(),
        _ => Vec::new(),
    };
    let next_cursor = data
        .get("nextCursor")
        .and_then(Value::as_str)
        .map(str::to_string);
    SearchPage { items, next_cursor }
}

/// Parses a single-resource body; `null` and unparseable bodies are [`Error::EmptyResponse`].
fn parse_required(body: &str) -> Result<Value, Error> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) | Err(_) => Err(Error::EmptyResponse),
        Ok(v) => Ok(v),
    }
}

impl Client {
    /// `{base}/agents/{chainId}/{agentId}` with both ids percent-encoded as
    /// single path segments.
    pub(crate) fn agent_url(&self, chain_id: &str, agent_id: &str) -> Result<Url, Error> {
        let invalid = || Error::InvalidConfig(format!("base url {:?} cannot take a path", self.base_url()));
        let mut url = Url::parse(self.base_url()).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("agents")
            .push(chain_id)
            .push(agent_id);
        Ok(url)
    }

    /// Searches indexed agents.
    ///
    /// `GET /agents?q=&network=&capability=&skill=&tag=&trustModel=&cursor=&limit=`
    ///
    /// # Errors
    ///
    /// [`Error::RemoteApi`] on a non-2xx status, [`Error::Http`] when the request
    /// cannot be sent. A 2xx response never fails.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, Error> {
        let url = format!("{}/agents", self.base_url());
        let pairs = query.to_query_pairs();
        debug!(params = ?pairs, "searching agents");

        let response = self
            .http()
            .get(&url)
            .json_content()
            .query(&pairs)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.text().await.unwrap_or_default();
        let page = parse_search_page(&body);
        info!(
            count = page.items.len(),
            has_more = page.has_more(),
            "received agent page"
        );
        Ok(page)
    }

    /// Follows `nextCursor` from `query` for up to `max_pages` pages and
    /// returns the concatenated items.
    ///
    /// The returned `next_cursor` is set when the listing was cut short by
    /// `max_pages`; with `max_pages == 0` it is the cursor of `query`.
    /// Results may shift between pages if the index changes.
    pub async fn search_all(
        &self,
        query: &SearchQuery,
        max_pages: usize,
    ) -> Result<SearchPage, Error> {
        let mut acc = SearchPage {
            items: Vec::new(),
            next_cursor: query.cursor.clone(),
        };
        let mut current = query.clone();
        for page_index in 0..max_pages {
            let page = self.search(&current).await?;
            acc.items.extend(page.items);
            acc.next_cursor = page.next_cursor;
            debug!(page_index, total = acc.items.len(), "accumulated agent page");
            match &acc.next_cursor {
                Some(cursor) => current = current.with_cursor(Some(cursor.clone())),
                None => break,
            }
        }
        Ok(acc)
    }

    /// Fetches a single agent.
    ///
    /// `GET /agents/{chainId}/{agentId}`
    ///
    /// # Errors
    ///
    /// [`Error::RemoteApi`] on a non-2xx status, [`Error::EmptyResponse`] when
    /// the body is `null` or not JSON, [`Error::Json`] when it is not an agent.
    pub async fn get_agent(&self, chain_id: &str, agent_id: &str) -> Result<AgentRecord, Error> {
        let url = self.agent_url(chain_id, agent_id)?;
        debug!(chain_id, agent_id, "fetching agent");

        let response = self.http().get(url).json_content().send().await?;
        let response = ensure_success(response).await?;
        let body = response.text().await.unwrap_or_default();
        let value = parse_required(&body)?;
        let agent: AgentRecord = serde_json::from_value(value)?;
        info!(chain_id, agent_id = agent.agent_id, domain = %agent.domain, "received agent");
        Ok(agent)
    }

    /// Asks the indexer to re-read one agent. No retry.
    ///
    /// `POST /admin/refresh`
    ///
    /// # Errors
    ///
    /// Same as [`get_agent`](Self::get_agent), minus the agent decoding.
    pub async fn request_refresh(&self, request: &RefreshRequest) -> Result<Value, Error> {
        let url = format!("{}/admin/refresh", self.base_url());
        debug!(
            chain_id = %request.chain_id,
            domain = %request.domain,
            agent_id = request.agent_id,
            "requesting agent refresh"
        );

        let response = self
            .http()
            .post(&url)
            .json_content()
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body = response.text().await.unwrap_or_default();
        let value = parse_required(&body)?;
        info!(chain_id = %request.chain_id, agent_id = request.agent_id, "refresh accepted");
        Ok(value)
    }
}
