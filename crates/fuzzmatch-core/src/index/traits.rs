//! Entity index trait definitions

use std::sync::Arc;

use crate::error::Result;
use crate::index::profile::EntityProfile;
use crate::name::CanonicalName;

/// Shared, internally synchronized entity store with name-based candidate retrieval.
///
/// Implementations must keep every saved profile reachable by its id and by
/// the phonetic code of each of its names. Writers are serialized with
/// respect to each other and to readers.
pub trait EntityIndex: Send + Sync {
    /// Store a profile, replacing any profile with the same id.
    ///
    /// Replacing re-indexes every name and drops the previous version's keys.
    /// Returns `MatchError::InvalidEntity` for an empty id.
    fn save(&self, profile: EntityProfile) -> Result<()>;

    /// Retrieve a profile by id.
    fn find_by_id(&self, id: &str) -> Option<Arc<EntityProfile>>;

    /// Profiles sharing the phonetic code of `name`.
    ///
    /// Returns an empty list, never the whole index, when no bucket matches.
    fn find_candidates_by_name(&self, name: &CanonicalName) -> Vec<Arc<EntityProfile>>;

    /// Profile with a primary or alternate name normalizing exactly to `name`.
    fn find_by_canonical_name(&self, name: &CanonicalName) -> Option<Arc<EntityProfile>>;

    /// Delete a profile by id.
    ///
    /// Returns `true` if the profile was deleted, `false` if it didn't exist.
    fn delete(&self, id: &str) -> bool;

    /// Every stored profile, ordered by id.
    fn all_profiles(&self) -> Vec<Arc<EntityProfile>>;

    /// All profile ids, sorted.
    fn ids(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every profile.
    fn clear(&self);
}
