// src/app/catalog.rs
use std::sync::mpsc::Sender;
use std::sync::Arc;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{CatalogMsg, MovieSummary, QueryKind, QueryRequest};
use crate::config::AppConfig;
use crate::error::CatalogError;

const DISCOVER_SORT: &str = "popularity.desc";
const FIRST_PAGE: &str = "1";

/// Read-only movie catalog. Calls block; run them off the UI thread.
pub trait Catalog: Send + Sync {
    fn fetch(&self, kind: &QueryKind) -> Result<Vec<MovieSummary>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct MoviePage {
    #[serde(default)]
    page: u32,
    results: Vec<MovieSummary>,
    #[serde(default)]
    total_results: u32,
}

pub fn parse_page(body: &[u8]) -> Result<Vec<MovieSummary>, CatalogError> {
    let page: MoviePage = serde_json::from_slice(body)?;
    debug!(
        "catalog page {} with {} results ({} total)",
        page.page,
        page.results.len(),
        page.total_results
    );
    Ok(page.results)
}

/// TMDB v3 REST client (`/movie/popular`, `/search/movie`, `/discover/movie`).
pub struct TmdbCatalog {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbCatalog {
    pub fn new(cfg: &AppConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("movierec/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.http_timeout())
            .build()
            .map_err(CatalogError::Client)?;
        Ok(Self {
            client,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone().unwrap_or_default(),
            language: cfg.language.clone(),
        })
    }

    const fn endpoint(kind: &QueryKind) -> &'static str {
        match kind {
            QueryKind::Popular => "/movie/popular",
            QueryKind::Search(_) => "/search/movie",
            QueryKind::Discover(_) => "/discover/movie",
        }
    }

    /// Full request URL, parameters in the provider's documented order.
    pub fn request_url(&self, kind: &QueryKind) -> String {
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        match kind {
            QueryKind::Popular => {}
            QueryKind::Search(text) => params.push(("query", text.as_str())),
            QueryKind::Discover(ids) => {
                params.push(("sort_by", DISCOVER_SORT));
                params.push(("with_genres", ids.as_str()));
            }
        }
        params.push(("page", FIRST_PAGE));

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{}", self.base_url, Self::endpoint(kind), query)
    }
}

impl Catalog for TmdbCatalog {
    fn fetch(&self, kind: &QueryKind) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.request_url(kind);
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }
        let body = resp.bytes()?;
        parse_page(&body)
    }
}

/// Stand-in used when the HTTP client could not be built; every fetch fails.
pub struct OfflineCatalog {
    reason: String,
}

impl OfflineCatalog {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Catalog for OfflineCatalog {
    fn fetch(&self, _kind: &QueryKind) -> Result<Vec<MovieSummary>, CatalogError> {
        Err(CatalogError::Unavailable(self.reason.clone()))
    }
}

/// Run one request on a detached worker; the reply comes back tagged with its epoch.
pub fn spawn_fetch(catalog: Arc<dyn Catalog>, request: QueryRequest, tx: Sender<CatalogMsg>) {
    std::thread::spawn(move || {
        let QueryRequest { seq, kind } = request;
        let result = catalog.fetch(&kind);
        match &result {
            Ok(list) => debug!("#{seq} {} -> {} movies", kind.label(), list.len()),
            Err(err) => warn!("#{seq} {} failed: {err}", kind.label()),
        }
        // receiver gone means the window closed
        let _ = tx.send(CatalogMsg { seq, result });
    });
}
