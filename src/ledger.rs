use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::store::KeyValueStore;

pub const REGION: &str = "recent_searches_prefs";
pub const KEY: &str = "recents";
pub const MAX_ENTRIES: usize = 10;

/// Most-recent-first history of successful queries.
///
/// Entries are unique under case-insensitive comparison and there are never
/// more than [`MAX_ENTRIES`]. Storage failures are logged and never reach the
/// caller: anything unreadable is treated as an empty history.
pub struct RecentQueryLedger<S> {
    store: S,
    // serializes read-modify-write cycles so concurrent records can't drop entries
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> RecentQueryLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list(&self) -> Vec<String> {
        self.load().await.into()
    }

    /// Move `query` (trimmed) to the front. Blank input is ignored.
    pub async fn record(&self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await;
        entries.retain(|existing| !eq_ignore_case(existing, trimmed));
        entries.push_front(trimmed.to_string());
        entries.truncate(MAX_ENTRIES);

        let encoded = match serde_json::to_string(&entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::error!("failed to encode recent queries: {e}");
                return;
            }
        };
        if let Err(e) = self.store.put(REGION, KEY, &encoded).await {
            log::warn!("failed to persist recent queries: {e}");
        }
    }

    pub async fn clear(&self) {
        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.store.remove(REGION, KEY).await {
            log::warn!("failed to clear recent queries: {e}");
        }
    }

    async fn load(&self) -> VecDeque<String> {
        match self.store.get(REGION, KEY).await {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => VecDeque::new(),
            Err(e) => {
                log::debug!("recent queries unreadable, treating as empty: {e}");
                VecDeque::new()
            }
        }
    }
}

/// Per-character comparison, so context-sensitive lowercasing (final sigma)
/// can't split two spellings of the same word.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Parse the stored array, skipping anything that isn't a non-blank string.
fn decode(raw: &str) -> VecDeque<String> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            log::debug!("recent queries corrupted, treating as empty: {e}");
            return VecDeque::new();
        }
    };
    values
        .iter()
        .filter_map(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .take(MAX_ENTRIES)
        .collect()
}
