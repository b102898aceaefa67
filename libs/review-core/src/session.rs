//! Review submission workflow.
//!
//! Glue between the pure scheduler and the review store: one submitted
//! rating becomes one atomic get-or-create-and-update against the
//! (card, user) record.

use crate::error::Result;
use crate::scheduler::Sm2;
use crate::store::ReviewStore;
use crate::types::{CardReview, Quality};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Apply one quality rating to a (card, user) pair.
///
/// The record is created lazily on first submission. Scheduling is
/// recomputed inside the store's merge so a concurrent writer cannot
/// be silently overwritten with stale state.
pub fn submit_review(
    store: &dyn ReviewStore,
    algorithm: &Sm2,
    card_id: &str,
    user_id: &str,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<CardReview> {
    let review = store.upsert(card_id, user_id, &|current| {
        let prior = match current {
            Some(existing) => existing.clone(),
            None => algorithm.initial_state(card_id, user_id, now),
        };
        let outcome = algorithm.schedule(&prior, quality, now)?;
        Ok(CardReview {
            ease_factor: outcome.ease_factor,
            interval_days: outcome.interval_days,
            repetitions: outcome.repetitions,
            next_review_date: outcome.next_review_date,
            last_review_date: Some(now),
            updated_at: now,
            ..prior
        })
    })?;

    debug!(
        card_id,
        user_id,
        quality = quality.to_value(),
        interval_days = review.interval_days,
        repetitions = review.repetitions,
        "review submitted"
    );
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReviewError;
    use crate::store::memory::MemoryReviewStore;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn first_submission_creates_the_record() {
        let store = MemoryReviewStore::new();
        let sm2 = Sm2::default();

        let review = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, now()).unwrap();
        assert_eq!(review.repetitions, 1);
        assert_eq!(review.interval_days, 1);
        assert_eq!(review.last_review_date, Some(now()));
        assert_eq!(review.created_at, now());

        let stored = store.get("card-1", "user-1").unwrap().unwrap();
        assert_eq!(stored, review);
    }

    #[test]
    fn repeated_submissions_walk_the_interval_ladder() {
        let store = MemoryReviewStore::new();
        let sm2 = Sm2::default();
        let mut at = now();

        let first = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, at).unwrap();
        assert_eq!(first.interval_days, 1);

        at += Duration::days(1);
        let second = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, at).unwrap();
        assert_eq!(second.interval_days, 6);
        assert_eq!(second.repetitions, 2);

        at += Duration::days(6);
        let third = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, at).unwrap();
        assert_eq!(third.interval_days, 15);
        assert_eq!(third.repetitions, 3);
        assert_eq!(third.next_review_date, at + Duration::days(15));
    }

    #[test]
    fn failure_resets_a_mature_card() {
        let store = MemoryReviewStore::new();
        let sm2 = Sm2::default();
        let mut at = now();
        for _ in 0..4 {
            submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, at).unwrap();
            at += Duration::days(1);
        }

        let review = submit_review(&store, &sm2, "card-1", "user-1", Quality::Wrong, at).unwrap();
        assert_eq!(review.repetitions, 0);
        assert_eq!(review.interval_days, 1);
    }

    #[test]
    fn created_at_survives_updates() {
        let store = MemoryReviewStore::new();
        let sm2 = Sm2::default();

        submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, now()).unwrap();
        let later = now() + Duration::days(1);
        let review = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, later).unwrap();
        assert_eq!(review.created_at, now());
        assert_eq!(review.updated_at, later);
    }

    #[test]
    fn corrupt_stored_state_surfaces_validation_error() {
        let store = MemoryReviewStore::new();
        let sm2 = Sm2::default();
        let mut bad = sm2.initial_state("card-1", "user-1", now());
        bad.ease_factor = 0.5;
        store.create(bad).unwrap();

        let result = submit_review(&store, &sm2, "card-1", "user-1", Quality::Good, now());
        assert!(matches!(result, Err(ReviewError::Validation(_))));
    }
}
