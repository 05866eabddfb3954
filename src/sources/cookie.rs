// =============================================================================
// Cookie API Client — agent discovery
// =============================================================================
//
// Serves agent records ordered by mindshare.  Every endpoint wraps its
// payload in a `{ ok, success, error }` envelope and authenticates with an
// `x-api-key` header.  The key is never logged or serialized.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::ranking::agent::AgentRecord;

/// Page size used when walking the full agent list.  25 is the API maximum,
/// minimising the number of round trips.
const FULL_SCAN_PAGE_SIZE: u32 = 25;

/// Response envelope shared by all Cookie endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: Option<T>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// One page of the agent list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentsPage {
    #[serde(default)]
    pub data: Vec<AgentRecord>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

/// HTTP client for the Cookie agent API.
#[derive(Clone)]
pub struct CookieClient {
    base_url: String,
    client: reqwest::Client,
}

impl CookieClient {
    /// Create a new client.  `api_key` is sent as the `x-api-key` header on
    /// every request.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();

        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Ok(val) = HeaderValue::from_str(&api_key) {
            default_headers.insert("x-api-key", val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!("CookieClient initialised (base_url=https://api.cookie.fun)");

        Self {
            base_url: "https://api.cookie.fun".to_string(),
            client,
        }
    }

    /// GET /v2/agents/agentsPaged — one page of agent records for the given
    /// stats `interval` (e.g. `_3Days`, `_7Days`), ordered by mindshare
    /// descending.
    #[instrument(skip(self), name = "cookie::get_agents_paged")]
    pub async fn get_agents_paged(
        &self,
        interval: &str,
        page: u32,
        page_size: u32,
    ) -> Result<AgentsPage> {
        let url = format!(
            "{}/v2/agents/agentsPaged?interval={}&page={}&pageSize={}",
            self.base_url, interval, page, page_size
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET agentsPaged request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Cookie GET agentsPaged returned {status}: {body}");
        }

        let envelope: Envelope<AgentsPage> = resp
            .json()
            .await
            .context("failed to parse agentsPaged response")?;

        if !envelope.success {
            anyhow::bail!(
                "Cookie agentsPaged unsuccessful: {}",
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        let page_data = envelope
            .ok
            .context("agentsPaged envelope missing 'ok' payload")?;

        debug!(
            page = page_data.current_page,
            total_pages = page_data.total_pages,
            count = page_data.data.len(),
            "agents page fetched"
        );
        Ok(page_data)
    }

    /// Walk every page of the agent list and return the consolidated records.
    ///
    /// Stops at the last page, on an empty page, or as soon as a page leads
    /// with zero mindshare — the list is mindshare-ordered, so everything
    /// after that point carries no signal.
    #[instrument(skip(self), name = "cookie::get_all_agents")]
    pub async fn get_all_agents(&self, interval: &str) -> Result<Vec<AgentRecord>> {
        let mut all_agents = Vec::new();
        let mut page = 1;

        loop {
            let page_data = self
                .get_agents_paged(interval, page, FULL_SCAN_PAGE_SIZE)
                .await?;

            let total_pages = page_data.total_pages;
            let leading_mindshare = page_data.data.first().map(|a| a.mindshare);
            let empty = page_data.data.is_empty();

            all_agents.extend(page_data.data);

            if page >= total_pages || empty {
                break;
            }
            if leading_mindshare == Some(0.0) {
                warn!(page, "page leads with zero mindshare — stopping scan early");
                break;
            }
            page += 1;
        }

        debug!(count = all_agents.len(), "full agent scan complete");
        Ok(all_agents)
    }
}

impl std::fmt::Debug for CookieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
