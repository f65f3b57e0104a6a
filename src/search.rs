use anyhow::Result;
use thiserror::Error;

use crate::config::Config;
use crate::data_models::{ApiErrorBody, Article, EverythingResponse, SearchOutcome};
use crate::transport::{EverythingRequest, HttpTransport, NewsTransport, RawResponse, TransportError};

pub const LANGUAGE: &str = "en";
pub const SORT_BY: &str = "publishedAt";
pub const PAGE_SIZE: u32 = 20;

/// Everything that can go wrong in a search. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing NewsAPI key. Set NEWS_API_KEY in the environment or .env file.")]
    MissingApiKey,

    #[error("Network error: {}", or_hint(&.0.to_string(), "check your connection"))]
    Transport(#[from] TransportError),

    #[error("Invalid query. Please refine your keyword and try again.")]
    BadRequest,

    #[error("Unauthorized response from NewsAPI. Check that your API key is valid.")]
    Unauthorized,

    #[error("NewsAPI plan upgrade required for this request.")]
    UpgradeRequired,

    #[error("Rate limit reached. Please wait a minute and retry.")]
    RateLimited,

    #[error("NewsAPI error {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Unexpected error: {}", or_hint(&.0.to_string(), "please try again"))]
    Decode(#[from] serde_json::Error),
}

fn or_hint(reason: &str, hint: &str) -> String {
    if reason.trim().is_empty() {
        hint.to_string()
    } else {
        reason.to_string()
    }
}

impl SearchError {
    /// Classify a non-2xx response.
    pub fn from_response(response: &RawResponse) -> Self {
        match response.status {
            400 => SearchError::BadRequest,
            401 => SearchError::Unauthorized,
            426 => SearchError::UpgradeRequired,
            429 => SearchError::RateLimited,
            code => {
                let message = serde_json::from_str::<ApiErrorBody>(&response.body)
                    .ok()
                    .and_then(|body| body.message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| response.reason.clone());
                SearchError::Status { code, message }
            }
        }
    }
}

/// Issues queries against the news index and folds every failure into a
/// [`SearchOutcome::Failure`]. One attempt per call, no retries.
pub struct SearchService<T> {
    transport: T,
    api_key: String,
}

impl SearchService<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.news_api_base_url, config.request_timeout)?;
        Ok(Self::new(transport, config.news_api_key.clone()))
    }
}

impl<T: NewsTransport> SearchService<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `query` verbatim against `/everything`.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        match self.try_search(query).await {
            Ok(articles) => {
                tracing::info!(query, results = articles.len(), "search succeeded");
                SearchOutcome::Success(articles)
            }
            Err(e) => {
                tracing::warn!(query, error = ?e, "search failed");
                SearchOutcome::Failure(e.to_string())
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Article>, SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let request = EverythingRequest {
            query: query.to_string(),
            language: LANGUAGE,
            sort_by: SORT_BY,
            page_size: PAGE_SIZE,
            api_key: self.api_key.clone(),
        };
        let response = self.transport.get_everything(&request).await?;

        if !response.is_success() {
            return Err(SearchError::from_response(&response));
        }
        parse_articles(&response.body)
    }
}

/// Decode a 2xx body and keep only articles that can be displayed.
pub fn parse_articles(body: &str) -> Result<Vec<Article>, SearchError> {
    // no body means no articles
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: EverythingResponse = serde_json::from_str(body)?;
    Ok(parsed
        .articles
        .unwrap_or_default()
        .into_iter()
        .map(Article::from)
        .filter(Article::is_displayable)
        .collect())
}
