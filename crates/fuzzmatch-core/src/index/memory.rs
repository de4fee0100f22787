//! In-memory entity index
//!
//! Profiles live in an id map. Every name is also indexed by its canonical
//! form (exact lookups) and by the phonetic code of that form (candidate
//! retrieval). A single `RwLock` guards all three maps.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::{AHashMap, AHasher};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MatchError, Result};
use crate::index::profile::EntityProfile;
use crate::index::traits::EntityIndex;
use crate::name::CanonicalName;
use crate::normalize::Normalizer;
use crate::phonetic::{PhoneticAlgorithm, PhoneticCode, PhoneticEncoder};

/// Default cap on profiles returned per candidate lookup
pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub entities: usize,
    pub names_indexed: usize,
    pub phonetic_buckets: usize,
}

#[derive(Debug, Default)]
struct IndexState {
    profiles: AHashMap<String, Arc<EntityProfile>>,
    by_name: AHashMap<CanonicalName, BTreeSet<String>>,
    by_code: AHashMap<PhoneticCode, BTreeSet<String>>,
}

/// Keys a profile is reachable under, besides its id
struct NameKey {
    name: CanonicalName,
    code: PhoneticCode,
}

impl IndexState {
    fn link(&mut self, id: &str, keys: &[NameKey]) {
        for key in keys {
            self.by_name
                .entry(key.name.clone())
                .or_default()
                .insert(id.to_string());
            if !key.code.is_empty() {
                self.by_code
                    .entry(key.code.clone())
                    .or_default()
                    .insert(id.to_string());
            }
        }
    }

    fn unlink(&mut self, id: &str, keys: &[NameKey]) {
        for key in keys {
            remove_member(&mut self.by_name, &key.name, id);
            remove_member(&mut self.by_code, &key.code, id);
        }
    }

    fn resolve_ids<'a>(&self, ids: impl Iterator<Item = &'a String>) -> Vec<Arc<EntityProfile>> {
        ids.filter_map(|id| self.profiles.get(id).cloned()).collect()
    }
}

/// Remove `id` from the bucket under `key`, dropping the bucket once empty
fn remove_member<K: Hash + Eq>(map: &mut AHashMap<K, BTreeSet<String>>, key: &K, id: &str) {
    if let Some(members) = map.get_mut(key) {
        members.remove(id);
        if members.is_empty() {
            map.remove(key);
        }
    }
}

/// Thread-safe in-memory [`EntityIndex`]
#[derive(Debug)]
pub struct MemoryIndex {
    normalizer: Normalizer,
    encoder: PhoneticAlgorithm,
    candidate_limit: usize,
    state: RwLock<IndexState>,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new(Normalizer::default(), PhoneticAlgorithm::default())
    }
}

impl MemoryIndex {
    pub fn new(normalizer: Normalizer, encoder: PhoneticAlgorithm) -> Self {
        Self {
            normalizer,
            encoder,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Cap the number of profiles a candidate lookup returns
    pub fn with_candidate_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(MatchError::config("candidate_limit must be positive"));
        }
        self.candidate_limit = limit;
        Ok(self)
    }

    pub fn encoder(&self) -> PhoneticAlgorithm {
        self.encoder
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Canonical names and codes for every non-empty name of `profile`
    fn keys_for(&self, profile: &EntityProfile) -> Vec<NameKey> {
        profile
            .names()
            .map(|raw| self.normalizer.normalize(raw))
            .filter(|name| !name.is_empty())
            .map(|name| NameKey {
                code: self.encoder.encode(name.as_str()),
                name,
            })
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            entities: state.profiles.len(),
            names_indexed: state.by_name.len(),
            phonetic_buckets: state.by_code.len(),
        }
    }

    /// Profile ids in the bucket for `code`, sorted
    pub fn bucket(&self, code: &PhoneticCode) -> Vec<String> {
        self.state
            .read()
            .by_code
            .get(code)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every phonetic code currently holding at least one profile
    pub fn codes(&self) -> Vec<PhoneticCode> {
        let mut codes: Vec<PhoneticCode> = self.state.read().by_code.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Hash over ids and names, for change detection
    pub fn index_hash(&self) -> String {
        let state = self.state.read();
        let mut ids: Vec<&String> = state.profiles.keys().collect();
        ids.sort();

        let mut hasher = AHasher::default();
        for id in ids {
            id.hash(&mut hasher);
            if let Some(profile) = state.profiles.get(id) {
                for name in profile.names() {
                    name.hash(&mut hasher);
                }
            }
        }
        format!("{:016x}", hasher.finish())
    }
}

impl EntityIndex for MemoryIndex {
    fn save(&self, profile: EntityProfile) -> Result<()> {
        if profile.id.trim().is_empty() {
            return Err(MatchError::InvalidEntity(
                "entity id must not be empty".to_string(),
            ));
        }

        // Normalize outside the lock
        let keys = self.keys_for(&profile);
        let id = profile.id.clone();

        let mut state = self.state.write();
        let replaced = match state.profiles.remove(&id) {
            Some(previous) => {
                let stale = self.keys_for(&previous);
                state.unlink(&id, &stale);
                true
            }
            None => false,
        };
        state.link(&id, &keys);
        state.profiles.insert(id.clone(), Arc::new(profile));

        info!(entity_id = %id, names = keys.len(), replaced, "Saved entity profile");
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Option<Arc<EntityProfile>> {
        self.state.read().profiles.get(id).cloned()
    }

    fn find_candidates_by_name(&self, name: &CanonicalName) -> Vec<Arc<EntityProfile>> {
        let code = self.encoder.encode(name.as_str());
        if code.is_empty() {
            return Vec::new();
        }

        let state = self.state.read();
        let candidates = match state.by_code.get(&code) {
            Some(ids) => state.resolve_ids(ids.iter().take(self.candidate_limit)),
            None => Vec::new(),
        };
        debug!(
            code = %code,
            encoder = self.encoder.name(),
            candidates = candidates.len(),
            "Phonetic candidate lookup"
        );
        candidates
    }

    fn find_by_canonical_name(&self, name: &CanonicalName) -> Option<Arc<EntityProfile>> {
        let state = self.state.read();
        state
            .by_name
            .get(name)
            .and_then(|ids| ids.iter().next())
            .and_then(|id| state.profiles.get(id).cloned())
    }

    fn delete(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let Some(previous) = state.profiles.remove(id) else {
            return false;
        };
        let stale = self.keys_for(&previous);
        state.unlink(id, &stale);
        info!(entity_id = %id, "Deleted entity profile");
        true
    }

    fn all_profiles(&self) -> Vec<Arc<EntityProfile>> {
        let state = self.state.read();
        let mut ids: Vec<&String> = state.profiles.keys().collect();
        ids.sort();
        state.resolve_ids(ids.into_iter())
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.read().profiles.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn len(&self) -> usize {
        self.state.read().profiles.len()
    }

    fn clear(&self) {
        let mut state = self.state.write();
        let removed = state.profiles.len();
        *state = IndexState::default();
        info!(removed, "Cleared entity index");
    }
}
