//! Favorites store
//!
//! The id list is the source of truth and is persisted on every mutation.
//! Full records are resolved on demand, one independent lookup per id.

use futures::future::join_all;

use super::LoadingState;
use crate::api::TmdbClient;
use crate::models::{FailedLookup, MovieDetail, PartialResults};
use crate::storage::{read_json, write_json, SharedStore, FAVORITES_KEY};

/// Handle for one in-flight resolution batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub generation: u64,
    pub ids: Vec<u64>,
}

pub struct FavoritesStore {
    ids: Vec<u64>,
    resolved: Vec<MovieDetail>,
    failed: Vec<FailedLookup>,
    status: LoadingState,
    generation: u64,
    storage: SharedStore,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("ids", &self.ids)
            .field("resolved", &self.resolved.len())
            .field("failed", &self.failed)
            .field("status", &self.status)
            .finish()
    }
}

impl FavoritesStore {
    /// Read persisted ids; missing or malformed data yields an empty set
    pub fn load(storage: SharedStore) -> Self {
        let stored: Vec<u64> = read_json(storage.as_ref(), FAVORITES_KEY).unwrap_or_default();

        let mut ids = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Self {
            ids,
            resolved: Vec::new(),
            failed: Vec::new(),
            status: LoadingState::Idle,
            generation: 0,
            storage,
        }
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Resolved records, in favorite order
    pub fn resolved(&self) -> &[MovieDetail] {
        &self.resolved
    }

    /// Lookups that failed during the last resolution
    pub fn failed(&self) -> &[FailedLookup] {
        &self.failed
    }

    pub fn status(&self) -> &LoadingState {
        &self.status
    }

    /// Append `id` unless already present
    pub fn add(&mut self, id: u64) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        tracing::info!(movie_id = id, "Added to favorites");
        self.persist();
        true
    }

    /// Remove `id` from the set and from resolved records
    pub fn remove(&mut self, id: u64) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.ids.retain(|&x| x != id);
        self.resolved.retain(|m| m.id != id);
        self.failed.retain(|f| f.id != id);
        tracing::info!(movie_id = id, "Removed from favorites");
        self.persist();
        true
    }

    /// Add or remove; returns whether `id` is a favorite afterwards
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.resolved.clear();
        self.failed.clear();
        self.generation += 1;
        self.status = LoadingState::Idle;
        tracing::info!("Cleared favorites");
        self.persist();
    }

    /// Start resolving the current ids; supersedes any batch in flight
    pub fn begin_resolve(&mut self) -> ResolveTicket {
        self.generation += 1;
        self.status = LoadingState::Loading(Some("Loading your favorites...".into()));
        ResolveTicket {
            generation: self.generation,
            ids: self.ids.clone(),
        }
    }

    /// Apply a finished batch; returns false for a superseded ticket
    pub fn complete_resolve(
        &mut self,
        ticket: &ResolveTicket,
        results: PartialResults<MovieDetail>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(generation = ticket.generation, "Discarding stale favorites batch");
            return false;
        }

        let ids = &self.ids;
        let mut resolved: Vec<MovieDetail> = results
            .succeeded
            .into_iter()
            .filter(|m| ids.contains(&m.id))
            .collect();
        resolved.sort_by_key(|m| ids.iter().position(|&id| id == m.id));

        self.failed = results
            .failed
            .into_iter()
            .filter(|f| ids.contains(&f.id))
            .collect();
        if !self.failed.is_empty() {
            tracing::warn!(count = self.failed.len(), "Some favorites could not be resolved");
        }

        self.resolved = resolved;
        self.status = LoadingState::Idle;
        true
    }

    /// Abandon any batch in flight
    pub fn cancel(&mut self) {
        self.generation += 1;
        if self.status.is_loading() {
            self.status = LoadingState::Idle;
        }
    }

    fn persist(&self) {
        if let Err(e) = write_json(self.storage.as_ref(), FAVORITES_KEY, &self.ids) {
            tracing::warn!(error = %e, "Failed to persist favorites");
        }
    }
}

/// Fetch details for every id concurrently; failures are collected, not raised
pub async fn resolve_all(client: &TmdbClient, ids: &[u64]) -> PartialResults<MovieDetail> {
    let lookups = ids.iter().map(|&id| async move { (id, client.movie_detail(id).await) });

    let mut results = PartialResults::default();
    for (id, outcome) in join_all(lookups).await {
        match outcome {
            Ok(detail) => results.succeeded.push(detail),
            Err(e) => {
                tracing::debug!(movie_id = id, error = %e, "Favorite lookup failed");
                results.failed.push(FailedLookup {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn detail(id: u64) -> MovieDetail {
        MovieDetail {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            release_date: None,
            vote_average: None,
            overview: String::new(),
            runtime: None,
            genres: Vec::new(),
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        assert!(favs.add(42));
        assert!(!favs.add(42));
        assert_eq!(favs.ids(), &[42]);
    }

    #[test]
    fn test_remove_non_member_is_noop() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        favs.add(1);
        assert!(!favs.remove(99));
        assert_eq!(favs.ids(), &[1]);
    }

    #[test]
    fn test_persisted_on_mutation() {
        let storage = MemoryStore::shared();
        let mut favs = FavoritesStore::load(storage.clone());
        favs.add(42);
        favs.add(7);
        favs.remove(42);

        assert_eq!(storage.get(FAVORITES_KEY).as_deref(), Some("[7]"));
    }

    #[test]
    fn test_reload_yields_single_entry() {
        let storage = MemoryStore::shared();
        {
            let mut favs = FavoritesStore::load(storage.clone());
            favs.add(42);
            favs.add(42);
        }
        let reloaded = FavoritesStore::load(storage);
        assert_eq!(reloaded.ids(), &[42]);
    }

    #[test]
    fn test_load_drops_duplicates() {
        let storage = MemoryStore::shared();
        storage.set(FAVORITES_KEY, "[3, 1, 3, 2, 1]").unwrap();
        let favs = FavoritesStore::load(storage);
        assert_eq!(favs.ids(), &[3, 1, 2]);
    }

    #[test]
    fn test_toggle_and_clear() {
        let storage = MemoryStore::shared();
        let mut favs = FavoritesStore::load(storage.clone());
        assert!(favs.toggle(5));
        assert!(favs.contains(5));
        assert!(!favs.toggle(5));
        assert!(!favs.contains(5));

        favs.add(1);
        favs.add(2);
        favs.clear();
        assert!(favs.is_empty());
        assert_eq!(storage.get(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_complete_resolve_orders_and_records_failures() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        favs.add(3);
        favs.add(1);
        favs.add(2);

        let ticket = favs.begin_resolve();
        assert!(favs.status().is_loading());

        let results = PartialResults {
            succeeded: vec![detail(1), detail(3)],
            failed: vec![FailedLookup {
                id: 2,
                reason: "Resource not found (404)".into(),
            }],
        };
        assert!(favs.complete_resolve(&ticket, results));

        let ids: Vec<u64> = favs.resolved().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(favs.failed().len(), 1);
        assert!(!favs.status().is_loading());
    }

    #[test]
    fn test_stale_resolve_discarded() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        favs.add(1);
        let stale = favs.begin_resolve();
        let fresh = favs.begin_resolve();

        let results = PartialResults {
            succeeded: vec![detail(1)],
            failed: vec![],
        };
        assert!(!favs.complete_resolve(&stale, results.clone()));
        assert!(favs.resolved().is_empty());
        assert!(favs.complete_resolve(&fresh, results));
        assert_eq!(favs.resolved().len(), 1);
    }

    #[test]
    fn test_removed_during_resolve_is_not_resurrected() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        favs.add(1);
        favs.add(2);
        let ticket = favs.begin_resolve();
        favs.remove(2);

        let results = PartialResults {
            succeeded: vec![detail(1), detail(2)],
            failed: vec![],
        };
        favs.complete_resolve(&ticket, results);
        let ids: Vec<u64> = favs.resolved().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_remove_drops_resolved_record() {
        let mut favs = FavoritesStore::load(MemoryStore::shared());
        favs.add(1);
        let ticket = favs.begin_resolve();
        favs.complete_resolve(
            &ticket,
            PartialResults {
                succeeded: vec![detail(1)],
                failed: vec![],
            },
        );
        favs.remove(1);
        assert!(favs.resolved().is_empty());
    }
}
