//! Non-repeating term rotation per guild.

use crate::{RetryConfig, with_retry};
use brevity_core::{GuildId, Term, TermId};
use brevity_error::{BrevityResult, TermsError, TermsErrorKind};
use brevity_store::GuildRepository;
use brevity_terms::TermCache;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Picks a term whose identifier is not in `used` and marks it used.
///
/// Identifiers that are no longer in `terms` are dropped from `used` first,
/// so a shrunken term list still exhausts. When every current term has been
/// used, `used` is cleared and the pick is made from the full list.
/// Returns `None` only when `terms` is empty.
pub fn choose_unused<'a, R>(
    terms: &'a [Term],
    used: &mut HashSet<TermId>,
    rng: &mut R,
) -> Option<&'a Term>
where
    R: Rng + ?Sized,
{
    if terms.is_empty() {
        return None;
    }

    let current: HashSet<&TermId> = terms.iter().map(Term::id).collect();
    used.retain(|id| current.contains(id));

    let mut candidates: Vec<&Term> = terms.iter().filter(|t| !used.contains(t.id())).collect();
    if candidates.is_empty() {
        used.clear();
        candidates = terms.iter().collect();
    }

    let chosen = *candidates.choose(rng)?;
    used.insert(chosen.id().clone());
    Some(chosen)
}

/// Selects each guild's next term from the shared cache.
///
/// Clones share one lock per guild, so scheduled and manual picks for the
/// same guild never interleave their load and save.
#[derive(Clone)]
pub struct RotationTracker {
    repo: GuildRepository,
    cache: Arc<TermCache>,
    retry: RetryConfig,
    locks: Arc<parking_lot::Mutex<HashMap<GuildId, Arc<Mutex<()>>>>>,
}

impl RotationTracker {
    /// Creates a tracker over `cache`, persisting through `repo`.
    pub fn new(repo: GuildRepository, cache: Arc<TermCache>) -> Self {
        Self {
            repo,
            cache,
            retry: RetryConfig::default(),
            locks: Arc::default(),
        }
    }

    /// Uses `retry` for the used-term reads and writes.
    pub fn with_store_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn guild_lock(&self, guild: GuildId) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(guild).or_default())
    }

    /// Term cache the rotation draws from.
    pub fn cache(&self) -> &Arc<TermCache> {
        &self.cache
    }

    /// Picks the guild's next unused term and records it as used.
    ///
    /// # Errors
    ///
    /// `NoTermsAvailable` when the cache is empty, or a store error.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn next_term(&self, guild: GuildId) -> BrevityResult<Term> {
        let terms = self.cache.terms();
        if terms.is_empty() {
            return Err(TermsError::new(TermsErrorKind::NoTermsAvailable).into());
        }

        let lock = self.guild_lock(guild);
        let _guard = lock.lock().await;

        let mut used = with_retry(&self.retry, || self.repo.used_terms(guild)).await?;
        if terms.iter().all(|t| used.contains(t.id())) {
            info!(terms = terms.len(), "Rotation exhausted, starting over");
        }
        let term = {
            let mut rng = rand::thread_rng();
            choose_unused(&terms, &mut used, &mut rng)
                .cloned()
                .ok_or_else(|| TermsError::new(TermsErrorKind::NoTermsAvailable))?
        };

        with_retry(&self.retry, || self.repo.save_used_terms(guild, &used)).await?;
        debug!(term = %term.id(), used = used.len(), "Selected term");
        Ok(term)
    }
}
