//! In-memory store implementations.
//!
//! Used by tests and by hosts that embed the engine without a remote
//! document store. Upserts run under the map lock, so the merge is
//! atomic with respect to other callers of the same store.

use super::{MistakeStore, ReviewStore, StoreResult};
use crate::error::{Result, StoreError};
use crate::types::{CardReview, MistakePattern};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// In-memory [`ReviewStore`] keyed by (card_id, user_id).
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    records: Mutex<HashMap<(String, String), CardReview>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<(String, String), CardReview>>> {
        self.records.lock().map_err(poisoned)
    }
}

impl ReviewStore for MemoryReviewStore {
    fn get(&self, card_id: &str, user_id: &str) -> StoreResult<Option<CardReview>> {
        let records = self.lock()?;
        Ok(records.get(&(card_id.to_string(), user_id.to_string())).cloned())
    }

    fn create(&self, review: CardReview) -> StoreResult<CardReview> {
        let mut records = self.lock()?;
        let key = (review.card_id.clone(), review.user_id.clone());
        if records.contains_key(&key) {
            return Err(StoreError::Conflict(format!("{}/{}", key.0, key.1)));
        }
        records.insert(key, review.clone());
        Ok(review)
    }

    fn update(&self, card_id: &str, user_id: &str, review: CardReview) -> StoreResult<CardReview> {
        let mut records = self.lock()?;
        let key = (card_id.to_string(), user_id.to_string());
        if !records.contains_key(&key) {
            return Err(StoreError::NotFound(format!("{card_id}/{user_id}")));
        }
        records.insert(key, review.clone());
        Ok(review)
    }

    fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<CardReview>> {
        let records = self.lock()?;
        let mut reviews: Vec<CardReview> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        Ok(reviews)
    }

    fn upsert(
        &self,
        card_id: &str,
        user_id: &str,
        merge: &dyn Fn(Option<&CardReview>) -> Result<CardReview>,
    ) -> Result<CardReview> {
        let mut records = self.lock()?;
        let key = (card_id.to_string(), user_id.to_string());
        let merged = merge(records.get(&key))?;
        records.insert(key, merged.clone());
        Ok(merged)
    }
}

/// In-memory [`MistakeStore`] keyed by (user_id, concept_id).
#[derive(Debug, Default)]
pub struct MemoryMistakeStore {
    patterns: Mutex<HashMap<(String, String), MistakePattern>>,
}

impl MemoryMistakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<(String, String), MistakePattern>>> {
        self.patterns.lock().map_err(poisoned)
    }
}

impl MistakeStore for MemoryMistakeStore {
    fn get(&self, user_id: &str, concept_id: &str) -> StoreResult<Option<MistakePattern>> {
        let patterns = self.lock()?;
        Ok(patterns.get(&(user_id.to_string(), concept_id.to_string())).cloned())
    }

    fn create(&self, pattern: MistakePattern) -> StoreResult<MistakePattern> {
        let mut patterns = self.lock()?;
        let key = (pattern.user_id.clone(), pattern.concept_id.clone());
        if patterns.contains_key(&key) {
            return Err(StoreError::Conflict(format!("{}/{}", key.0, key.1)));
        }
        patterns.insert(key, pattern.clone());
        Ok(pattern)
    }

    fn update(
        &self,
        user_id: &str,
        concept_id: &str,
        pattern: MistakePattern,
    ) -> StoreResult<MistakePattern> {
        let mut patterns = self.lock()?;
        let key = (user_id.to_string(), concept_id.to_string());
        if !patterns.contains_key(&key) {
            return Err(StoreError::NotFound(format!("{user_id}/{concept_id}")));
        }
        patterns.insert(key, pattern.clone());
        Ok(pattern)
    }

    fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<MistakePattern>> {
        let patterns = self.lock()?;
        let mut result: Vec<MistakePattern> = patterns
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.concept_id.cmp(&b.concept_id));
        Ok(result)
    }

    fn upsert(
        &self,
        user_id: &str,
        concept_id: &str,
        merge: &dyn Fn(Option<&MistakePattern>) -> MistakePattern,
    ) -> StoreResult<MistakePattern> {
        let mut patterns = self.lock()?;
        let key = (user_id.to_string(), concept_id.to_string());
        let merged = merge(patterns.get(&key));
        patterns.insert(key, merged.clone());
        Ok(merged)
    }
}

/// Stand-in for a mistake store that has not been provisioned yet.
///
/// Every operation reports [`StoreError::NotConfigured`], which the
/// aggregator's read path degrades to an empty result.
#[derive(Debug, Default)]
pub struct UnprovisionedMistakeStore;

impl MistakeStore for UnprovisionedMistakeStore {
    fn get(&self, _user_id: &str, _concept_id: &str) -> StoreResult<Option<MistakePattern>> {
        Err(StoreError::NotConfigured)
    }

    fn create(&self, _pattern: MistakePattern) -> StoreResult<MistakePattern> {
        Err(StoreError::NotConfigured)
    }

    fn update(
        &self,
        _user_id: &str,
        _concept_id: &str,
        _pattern: MistakePattern,
    ) -> StoreResult<MistakePattern> {
        Err(StoreError::NotConfigured)
    }

    fn list_by_user(&self, _user_id: &str) -> StoreResult<Vec<MistakePattern>> {
        Err(StoreError::NotConfigured)
    }

    fn upsert(
        &self,
        _user_id: &str,
        _concept_id: &str,
        _merge: &dyn Fn(Option<&MistakePattern>) -> MistakePattern,
    ) -> StoreResult<MistakePattern> {
        Err(StoreError::NotConfigured)
    }
}
