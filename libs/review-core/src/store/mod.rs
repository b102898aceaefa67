//! Collaborator interfaces for review and mistake persistence.
//!
//! The engine talks to its datastore only through these traits. Both
//! carry an atomic upsert that applies a merge function to the current
//! record, which is what closes the get-or-create-then-update race a
//! naive check-then-act sequence would leave open. Hosts back these
//! with whatever document store they use; [`memory`] provides the
//! in-process implementation used by tests and standalone embedding.

pub mod memory;

use crate::error::{Result, StoreError};
use crate::types::{CardReview, MistakePattern};

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence boundary for per-(card, user) review records.
pub trait ReviewStore: Send + Sync {
    fn get(&self, card_id: &str, user_id: &str) -> StoreResult<Option<CardReview>>;

    fn create(&self, review: CardReview) -> StoreResult<CardReview>;

    fn update(&self, card_id: &str, user_id: &str, review: CardReview) -> StoreResult<CardReview>;

    fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<CardReview>>;

    /// Atomically apply `merge` to the current record (or `None` when
    /// the pair has never been reviewed) and persist what it returns.
    /// The merge may reject malformed stored state, so it is fallible.
    fn upsert(
        &self,
        card_id: &str,
        user_id: &str,
        merge: &dyn Fn(Option<&CardReview>) -> Result<CardReview>,
    ) -> Result<CardReview>;
}

/// Persistence boundary for per-(user, concept) mistake patterns.
pub trait MistakeStore: Send + Sync {
    fn get(&self, user_id: &str, concept_id: &str) -> StoreResult<Option<MistakePattern>>;

    fn create(&self, pattern: MistakePattern) -> StoreResult<MistakePattern>;

    fn update(
        &self,
        user_id: &str,
        concept_id: &str,
        pattern: MistakePattern,
    ) -> StoreResult<MistakePattern>;

    fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<MistakePattern>>;

    /// Atomically apply `merge` to the current pattern (or `None` on
    /// first mistake) and persist what it returns.
    fn upsert(
        &self,
        user_id: &str,
        concept_id: &str,
        merge: &dyn Fn(Option<&MistakePattern>) -> MistakePattern,
    ) -> StoreResult<MistakePattern>;
}
