use anyhow::Result;

use crate::config::Config;
use crate::data_models::SearchOutcome;
use crate::ledger::RecentQueryLedger;
use crate::search::SearchService;
use crate::store::{KeyValueStore, PreferenceStore};
use crate::transport::{HttpTransport, NewsTransport};

/// Glue between a search screen and the core: searches, and remembers the
/// queries that succeeded.
pub struct SearchSession<T, S> {
    service: SearchService<T>,
    ledger: RecentQueryLedger<S>,
}

impl SearchSession<HttpTransport, PreferenceStore> {
    /// Live HTTP transport plus a history kept in MongoDB when `mongo_uri`
    /// is set, or in region files under `data_dir` otherwise.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let service = SearchService::from_config(config)?;
        let store = PreferenceStore::from_config(config).await?;
        Ok(Self::new(service, RecentQueryLedger::new(store)))
    }
}

impl<T: NewsTransport, S: KeyValueStore> SearchSession<T, S> {
    pub fn new(service: SearchService<T>, ledger: RecentQueryLedger<S>) -> Self {
        Self { service, ledger }
    }

    pub fn service(&self) -> &SearchService<T> {
        &self.service
    }

    pub fn ledger(&self) -> &RecentQueryLedger<S> {
        &self.ledger
    }

    /// `None` when the query is blank; nothing is sent in that case.
    /// A success, even an empty one, records the trimmed query.
    pub async fn search(&self, query: &str) -> Option<SearchOutcome> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        let outcome = self.service.search(trimmed).await;
        if outcome.is_success() {
            self.ledger.record(trimmed).await;
        }
        Some(outcome)
    }

    pub async fn recent(&self) -> Vec<String> {
        self.ledger.list().await
    }

    pub async fn clear_recent(&self) {
        self.ledger.clear().await
    }
}
