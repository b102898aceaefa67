//! Mistake aggregation into per-concept weakness patterns.

use crate::error::StoreError;
use crate::store::{MistakeStore, StoreResult};
use crate::types::{MistakePattern, WrongAnswer};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Outcome of folding one wrong-answer batch into the store.
///
/// Items are upserted independently and sequentially; a failure on one
/// item never drops the rest. The caller can retry just the failed
/// subset.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Concept ids recorded, in input order (repeats preserved).
    pub recorded: Vec<String>,
    pub failed: Vec<FailedMistake>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One wrong-answer item that could not be upserted.
#[derive(Debug)]
pub struct FailedMistake {
    /// Index of the item in the submitted batch.
    pub index: usize,
    pub concept_id: String,
    pub error: StoreError,
}

/// Folds wrong answers into per-(user, concept) patterns.
pub struct MistakeAggregator<'a> {
    store: &'a dyn MistakeStore,
}

impl<'a> MistakeAggregator<'a> {
    pub fn new(store: &'a dyn MistakeStore) -> Self {
        Self { store }
    }

    /// Record every wrong answer from one completed quiz attempt.
    ///
    /// `mistake_count` increments once per item even when two items in
    /// the batch share a concept; only `related_questions` dedupes.
    pub fn record_mistakes(
        &self,
        user_id: &str,
        wrong_answers: &[WrongAnswer],
        now: DateTime<Utc>,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, answer) in wrong_answers.iter().enumerate() {
            match self.record_one(user_id, answer, now) {
                Ok(pattern) => report.recorded.push(pattern.concept_id),
                Err(error) => {
                    warn!(
                        user_id,
                        concept_id = answer.concept_id.as_str(),
                        index,
                        %error,
                        "failed to record mistake"
                    );
                    report.failed.push(FailedMistake {
                        index,
                        concept_id: answer.concept_id.clone(),
                        error,
                    });
                }
            }
        }
        debug!(
            user_id,
            recorded = report.recorded.len(),
            failed = report.failed.len(),
            "mistake batch processed"
        );
        report
    }

    fn record_one(
        &self,
        user_id: &str,
        answer: &WrongAnswer,
        now: DateTime<Utc>,
    ) -> StoreResult<MistakePattern> {
        self.store
            .upsert(user_id, &answer.concept_id, &|current| match current {
                Some(existing) => {
                    let mut next = existing.clone();
                    next.record(&answer.question_id, now);
                    next
                }
                None => MistakePattern::first_occurrence(
                    user_id,
                    &answer.concept_id,
                    &answer.question_id,
                    now,
                ),
            })
    }

    /// Manual mastery signal on an existing pattern: decrement the
    /// count by one, floored at zero.
    pub fn mark_reviewed(&self, user_id: &str, concept_id: &str) -> StoreResult<MistakePattern> {
        let mut pattern = self
            .store
            .get(user_id, concept_id)?
            .ok_or_else(|| StoreError::NotFound(format!("{user_id}/{concept_id}")))?;
        pattern.mark_reviewed();
        self.store.update(user_id, concept_id, pattern)
    }

    /// Weak concepts for a user, most-missed first.
    ///
    /// An unprovisioned store degrades to an empty list; a transient
    /// failure still propagates so the caller can alert.
    pub fn weak_concepts(&self, user_id: &str) -> StoreResult<Vec<MistakePattern>> {
        match self.store.list_by_user(user_id) {
            Ok(mut patterns) => {
                patterns.sort_by(|a, b| {
                    b.mistake_count
                        .cmp(&a.mistake_count)
                        .then_with(|| a.concept_id.cmp(&b.concept_id))
                });
                Ok(patterns)
            }
            Err(StoreError::NotConfigured) => Ok(Vec::new()),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryMistakeStore, UnprovisionedMistakeStore};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap()
    }

    fn wrong(question_id: &str, concept_id: &str) -> WrongAnswer {
        WrongAnswer {
            question_id: question_id.to_string(),
            label_id: format!("label-{question_id}"),
            user_answer: "wrong".to_string(),
            correct_answer: "right".to_string(),
            concept_id: concept_id.to_string(),
        }
    }

    /// A mistake store that fails every operation, simulating an
    /// outage rather than a missing collaborator.
    struct FlakyMistakeStore;

    impl MistakeStore for FlakyMistakeStore {
        fn get(&self, _: &str, _: &str) -> StoreResult<Option<MistakePattern>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        fn create(&self, _: MistakePattern) -> StoreResult<MistakePattern> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        fn update(&self, _: &str, _: &str, _: MistakePattern) -> StoreResult<MistakePattern> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        fn list_by_user(&self, _: &str) -> StoreResult<Vec<MistakePattern>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        fn upsert(
            &self,
            _: &str,
            _: &str,
            _: &dyn Fn(Option<&MistakePattern>) -> MistakePattern,
        ) -> StoreResult<MistakePattern> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn first_mistake_creates_pattern() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);

        let report = aggregator.record_mistakes(
            "user-1",
            &[wrong("q1", "biology.cell_biology.mitochondria")],
            now(),
        );
        assert!(report.is_complete());
        assert_eq!(report.recorded, vec!["biology.cell_biology.mitochondria"]);

        let pattern = store
            .get("user-1", "biology.cell_biology.mitochondria")
            .unwrap()
            .unwrap();
        assert_eq!(pattern.mistake_count, 1);
        assert_eq!(pattern.subject, "biology");
        assert_eq!(pattern.topic, "cell_biology");
        assert_eq!(pattern.last_occurrence, now());
    }

    #[test]
    fn same_question_across_batches_counts_twice_but_dedupes_the_set() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);
        let concept = "biology.genetics.dna";

        aggregator.record_mistakes("user-1", &[wrong("q1", concept)], now());
        aggregator.record_mistakes("user-1", &[wrong("q1", concept)], now());

        let pattern = store.get("user-1", concept).unwrap().unwrap();
        assert_eq!(pattern.mistake_count, 2);
        assert_eq!(pattern.related_questions.len(), 1);
    }

    #[test]
    fn repeated_concept_within_one_batch_counts_per_item() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);
        let concept = "physics.mechanics.momentum";

        let report = aggregator.record_mistakes(
            "user-1",
            &[wrong("q1", concept), wrong("q2", concept)],
            now(),
        );
        assert_eq!(report.recorded.len(), 2);

        let pattern = store.get("user-1", concept).unwrap().unwrap();
        assert_eq!(pattern.mistake_count, 2);
        assert_eq!(pattern.related_questions.len(), 2);
    }

    #[test]
    fn mark_reviewed_decrements_and_floors() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);
        let concept = "chemistry.reactions.catalyst";

        aggregator.record_mistakes("user-1", &[wrong("q1", concept)], now());

        let pattern = aggregator.mark_reviewed("user-1", concept).unwrap();
        assert_eq!(pattern.mistake_count, 0);
        assert_eq!(pattern.related_questions.len(), 1);
        assert_eq!(pattern.last_occurrence, now());

        let pattern = aggregator.mark_reviewed("user-1", concept).unwrap();
        assert_eq!(pattern.mistake_count, 0);
    }

    #[test]
    fn mark_reviewed_on_missing_pattern_is_not_found() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);
        let result = aggregator.mark_reviewed("user-1", "biology.genetics.dna");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn weak_concepts_sorted_by_count_descending() {
        let store = MemoryMistakeStore::new();
        let aggregator = MistakeAggregator::new(&store);

        aggregator.record_mistakes(
            "user-1",
            &[
                wrong("q1", "biology.genetics.dna"),
                wrong("q2", "physics.optics.lens"),
                wrong("q3", "physics.optics.lens"),
            ],
            now(),
        );

        let patterns = aggregator.weak_concepts("user-1").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].concept_id, "physics.optics.lens");
        assert_eq!(patterns[0].mistake_count, 2);
        assert_eq!(patterns[1].concept_id, "biology.genetics.dna");
    }

    #[test]
    fn unprovisioned_store_degrades_to_empty_weak_concepts() {
        let store = UnprovisionedMistakeStore;
        let aggregator = MistakeAggregator::new(&store);
        assert_eq!(aggregator.weak_concepts("user-1").unwrap(), Vec::new());
    }

    #[test]
    fn transient_failure_still_propagates_from_weak_concepts() {
        let store = FlakyMistakeStore;
        let aggregator = MistakeAggregator::new(&store);
        assert!(matches!(
            aggregator.weak_concepts("user-1"),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn failed_items_are_reported_not_dropped() {
        let store = FlakyMistakeStore;
        let aggregator = MistakeAggregator::new(&store);

        let report = aggregator.record_mistakes(
            "user-1",
            &[
                wrong("q1", "biology.genetics.dna"),
                wrong("q2", "physics.optics.lens"),
            ],
            now(),
        );
        assert!(!report.is_complete());
        assert_eq!(report.recorded.len(), 0);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].index, 0);
        assert_eq!(report.failed[1].concept_id, "physics.optics.lens");
        assert!(matches!(report.failed[0].error, StoreError::Unavailable(_)));
    }
}
