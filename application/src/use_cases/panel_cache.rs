//! Panel cache store
//!
//! Durable per-article cache of finished panel discussions. The whole
//! table lives under one key of a [`KeyValueStore`] as a JSON object
//! mapping article id to [`CachedPanel`], and every operation does a
//! read-modify-write of that table.
//!
//! The cache is an optimization only: storage failures and corrupt data
//! are logged and treated as "nothing cached", never surfaced.

use crate::config::CacheParams;
use crate::ports::clock::Clock;
use crate::ports::key_value_store::{KeyValueStore, StorageError};
use crate::ports::locale::LocaleProvider;
use chrono::SubsecRound;
use panel_domain::{
    ArticleId, CachedPanel, CachedPanelSummary, ConsensusSummary, MarketData, PanelOpinion,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

type PanelTable = BTreeMap<String, CachedPanel>;

/// Failures inside a cache operation; logged, never returned to callers
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Store of cached panel discussions, one entry per article.
///
/// Constructed once at startup and shared by reference with whatever
/// needs it.
pub struct PanelCacheStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    locale: Arc<dyn LocaleProvider>,
    params: CacheParams,
}

impl PanelCacheStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        Self {
            store,
            clock,
            locale,
            params: CacheParams::default(),
        }
    }

    pub fn with_params(mut self, params: CacheParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &CacheParams {
        &self.params
    }

    /// Look up the cached panel for an article.
    ///
    /// Returns `None` when the entry is missing, expired or generated in
    /// a language other than the active one. Expired entries are deleted;
    /// entries in another language are kept.
    pub fn get_panel(&self, article_id: &ArticleId) -> Option<CachedPanel> {
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(e) => {
                warn!("Panel cache unreadable, treating as empty: {}", e);
                return None;
            }
        };

        let expired = table
            .get(article_id.as_str())?
            .is_expired(self.clock.now(), self.params.ttl);

        if expired {
            debug!("Cached panel for {} expired, removing", article_id);
            table.remove(article_id.as_str());
            if let Err(e) = self.write_table(&table) {
                warn!("Failed to remove expired panel for {}: {}", article_id, e);
            }
            return None;
        }

        let entry = table.remove(article_id.as_str())?;
        let active = self.locale.active_language();
        if entry.language != active {
            debug!(
                "Cached panel for {} is in {}, active language is {}",
                article_id, entry.language, active
            );
            return None;
        }

        debug!("Panel cache hit for {}", article_id);
        Some(entry)
    }

    /// Whether a valid panel is cached for the article
    pub fn has_panel(&self, article_id: &ArticleId) -> bool {
        self.get_panel(article_id).is_some()
    }

    /// Cache a finished discussion under the active language and current time.
    ///
    /// Replaces any previous entry for the article, then keeps only the
    /// `capacity` most recent entries. Failures are logged and swallowed.
    pub fn save_panel(
        &self,
        article_id: &ArticleId,
        opinions: Vec<PanelOpinion>,
        consensus: Option<ConsensusSummary>,
        market_data: Option<MarketData>,
    ) {
        let entry = CachedPanel {
            article_id: article_id.clone(),
            opinions,
            consensus,
            market_data,
            timestamp: self.clock.now().trunc_subsecs(3),
            language: self.locale.active_language(),
        };

        match self.upsert(entry) {
            Ok(evicted) => {
                debug!("Cached panel for {}", article_id);
                for id in evicted {
                    debug!("Evicted cached panel for {}", id);
                }
            }
            Err(e) => warn!("Failed to cache panel for {}: {}", article_id, e),
        }
    }

    /// Delete the entry for an article; a missing entry is a no-op.
    pub fn remove_panel(&self, article_id: &ArticleId) {
        let result = self.read_table().and_then(|mut table| {
            if table.remove(article_id.as_str()).is_some() {
                self.write_table(&table)?;
            }
            Ok(())
        });
        if let Err(e) = result {
            warn!("Failed to remove cached panel for {}: {}", article_id, e);
        }
    }

    /// Delete the whole table
    pub fn clear_cache(&self) {
        if let Err(e) = self.store.remove(&self.params.namespace) {
            warn!("Failed to clear panel cache: {}", e);
        }
    }

    /// Summaries of every stored entry, newest first.
    ///
    /// Includes expired entries and entries in other languages.
    pub fn list_panels(&self) -> Vec<CachedPanelSummary> {
        match self.read_table() {
            Ok(table) => {
                let mut summaries: Vec<_> = table.values().map(CachedPanel::summary).collect();
                summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                summaries
            }
            Err(e) => {
                warn!("Panel cache unreadable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Insert the entry and trim the table; returns the evicted article ids.
    fn upsert(&self, entry: CachedPanel) -> Result<Vec<String>, CacheError> {
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(CacheError::Serialization(e)) => {
                warn!("Panel cache corrupt, starting a new table: {}", e);
                PanelTable::new()
            }
            Err(e) => return Err(e),
        };

        let new_key = entry.article_id.to_string();
        table.insert(new_key.clone(), entry);

        let mut entries: Vec<CachedPanel> = table.into_values().collect();
        // Newest first; on equal timestamps the entry just written wins.
        entries.sort_by(|a, b| {
            b.timestamp.cmp(&a.timestamp).then_with(|| {
                let a_new = a.article_id.as_str() == new_key;
                let b_new = b.article_id.as_str() == new_key;
                b_new.cmp(&a_new)
            })
        });

        let evicted: Vec<String> = entries
            .iter()
            .skip(self.params.capacity)
            .map(|p| p.article_id.to_string())
            .collect();
        entries.truncate(self.params.capacity);

        let table: PanelTable = entries
            .into_iter()
            .map(|p| (p.article_id.to_string(), p))
            .collect();
        self.write_table(&table)?;
        Ok(evicted)
    }

    fn read_table(&self) -> Result<PanelTable, CacheError> {
        match self.store.get(&self.params.namespace)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(PanelTable::new()),
        }
    }

    fn write_table(&self, table: &PanelTable) -> Result<(), CacheError> {
        let raw = serde_json::to_string(table)?;
        self.store.set(&self.params.namespace, &raw)?;
        Ok(())
    }
}
