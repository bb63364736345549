//! Shared cache of the current term list.

use crate::TermSource;
use brevity_core::{Term, TermId};
use brevity_error::{BrevityResult, StoreError, StoreErrorKind};
use brevity_store::{KeyValueStore, Keys};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Holds the current list of terms.
///
/// Readers get a cheap [`Arc`] snapshot; a refresh swaps in a new list
/// wholesale. The list is also written to the store with an expiry, so a
/// restart within the refresh interval skips the scrape.
pub struct TermCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    source: Arc<dyn TermSource>,
    ttl: Duration,
    terms: RwLock<Arc<Vec<Term>>>,
}

impl TermCache {
    /// Creates an empty cache.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: &Keys,
        source: Arc<dyn TermSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            key: keys.terms(),
            source,
            ttl,
            terms: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Warms the cache from the store, scraping the source when nothing usable is stored.
    ///
    /// Returns the number of cached terms.
    #[instrument(skip(self))]
    pub async fn load(&self) -> BrevityResult<usize> {
        match self.load_stored().await {
            Ok(Some(terms)) if !terms.is_empty() => {
                let count = terms.len();
                self.replace(terms);
                info!(count, "Loaded cached terms from store");
                return Ok(count);
            }
            Ok(_) => debug!("No stored term list, fetching from source"),
            Err(e) => warn!(error = %e, "Stored term list unusable, fetching from source"),
        }
        self.refresh().await
    }

    async fn load_stored(&self) -> BrevityResult<Option<Vec<Term>>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let terms = serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(StoreErrorKind::Serialization {
                key: self.key.clone(),
                reason: e.to_string(),
            })
        })?;
        Ok(Some(terms))
    }

    /// Fetches a fresh list and replaces the cached one.
    ///
    /// On failure the existing list is kept and the error returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> BrevityResult<usize> {
        let terms = match self.source.fetch().await {
            Ok(terms) => terms,
            Err(e) => {
                warn!(error = %e, cached = self.len(), "Term refresh failed, keeping existing terms");
                return Err(e);
            }
        };

        match serde_json::to_string(&terms) {
            Ok(raw) => {
                if let Err(e) = self.store.set_with_expiry(&self.key, &raw, self.ttl).await {
                    warn!(error = %e, "Failed to persist term list");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode term list"),
        }

        let count = terms.len();
        self.replace(terms);
        info!(count, "Term cache refreshed");
        Ok(count)
    }

    /// Swaps in a new list.
    pub fn replace(&self, terms: Vec<Term>) {
        *self.terms.write() = Arc::new(terms);
    }

    /// Snapshot of the current list.
    pub fn terms(&self) -> Arc<Vec<Term>> {
        Arc::clone(&self.terms.read())
    }

    /// Number of cached terms.
    pub fn len(&self) -> usize {
        self.terms.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.terms.read().is_empty()
    }

    /// Term with the given identifier.
    pub fn get(&self, id: &TermId) -> Option<Term> {
        self.terms.read().iter().find(|t| t.id() == id).cloned()
    }

    /// Looks a term up by what a user typed.
    ///
    /// Tries an exact identifier or case-insensitive name match first, then
    /// the first name starting with the query, then the first containing it.
    pub fn find(&self, query: &str) -> Option<Term> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let id = TermId::from_name(&needle);
        let terms = self.terms();

        let lowered: Vec<(String, &Term)> =
            terms.iter().map(|t| (t.name().to_lowercase(), t)).collect();

        lowered
            .iter()
            .find(|(name, t)| *name == needle || *t.id() == id)
            .or_else(|| lowered.iter().find(|(name, _)| name.starts_with(&needle)))
            .or_else(|| lowered.iter().find(|(name, _)| name.contains(&needle)))
            .map(|(_, t)| Term::clone(t))
    }
}
