//! SM-2 spaced repetition scheduling.
//!
//! Pure state machine: prior review state + quality rating in, next
//! review state out. The calling workflow owns persistence.

use crate::error::{ReviewError, Result};
use crate::types::{CardReview, Quality, ReviewStatus};
use chrono::{DateTime, Duration, Utc};

/// SM-2 variant with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval after the first successful review (and after a lapse).
    pub first_interval: u32,
    /// Interval after the second consecutive successful review.
    pub second_interval: u32,
    pub max_interval_days: u32,
    /// Thresholds for the derived `Mastered` status.
    pub mastered_ease: f64,
    pub mastered_interval_days: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            max_interval_days: 365,
            mastered_ease: 2.5,
            mastered_interval_days: 21,
        }
    }
}

/// Next review state produced by [`Sm2::schedule`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    pub status: ReviewStatus,
}

impl Sm2 {
    /// State for a card the user has never reviewed, due immediately.
    pub fn initial_state(&self, card_id: &str, user_id: &str, now: DateTime<Utc>) -> CardReview {
        CardReview {
            card_id: card_id.to_string(),
            user_id: user_id.to_string(),
            ease_factor: self.initial_ease,
            interval_days: 0,
            repetitions: 0,
            next_review_date: now,
            last_review_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Compute the next review state from a prior state and a rating.
    ///
    /// The ease update runs unconditionally, failure included; only the
    /// computed ease is clamped to the floor. Malformed prior state
    /// from a collaborator is rejected, not repaired.
    pub fn schedule(
        &self,
        prior: &CardReview,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome> {
        self.validate(prior)?;

        let shortfall = f64::from(5 - quality.to_value());
        let ease_factor =
            (prior.ease_factor + (0.1 - shortfall * (0.08 + shortfall * 0.02))).max(self.minimum_ease);

        let (repetitions, interval_days) = if quality.is_pass() {
            let interval = match prior.interval_days {
                0 => self.first_interval,
                1 => self.second_interval,
                days => (f64::from(days) * ease_factor).round() as u32,
            };
            (prior.repetitions + 1, interval)
        } else {
            // Hard reset regardless of how long the interval had grown.
            (0, self.first_interval)
        };

        let interval_days = interval_days.min(self.max_interval_days);
        let status = self.status_of(repetitions, ease_factor, interval_days);

        Ok(ScheduleOutcome {
            ease_factor,
            interval_days,
            repetitions,
            next_review_date: now + Duration::days(i64::from(interval_days)),
            status,
        })
    }

    /// Derive the learning status from scheduling parameters.
    pub fn status_of(&self, repetitions: u32, ease_factor: f64, interval_days: u32) -> ReviewStatus {
        if repetitions == 0 {
            ReviewStatus::New
        } else if repetitions < 3 {
            ReviewStatus::Learning
        } else if ease_factor >= self.mastered_ease && interval_days >= self.mastered_interval_days {
            ReviewStatus::Mastered
        } else {
            ReviewStatus::Review
        }
    }

    /// Status of a stored review record.
    pub fn status(&self, review: &CardReview) -> ReviewStatus {
        self.status_of(review.repetitions, review.ease_factor, review.interval_days)
    }

    fn validate(&self, prior: &CardReview) -> Result<()> {
        if prior.ease_factor < self.minimum_ease {
            return Err(ReviewError::Validation(format!(
                "ease factor {} below minimum {}",
                prior.ease_factor, self.minimum_ease
            )));
        }
        if prior.interval_days > self.max_interval_days {
            return Err(ReviewError::Validation(format!(
                "interval {} exceeds maximum {} days",
                prior.interval_days, self.max_interval_days
            )));
        }
        Ok(())
    }
}
