//! Core types for the review engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Derived learning status of a card.
///
/// Never stored; computed from `repetitions`, `ease_factor` and
/// `interval_days` at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Quality rating for one review, on the 0-5 SM-2 scale.
///
/// 0-2 are failing grades at increasing severity, 3-5 are passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Blackout,
    Wrong,
    Almost,
    Hesitant,
    Good,
    Perfect,
}

impl Quality {
    /// Convert to the 0-5 numeric value.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Blackout => 0,
            Self::Wrong => 1,
            Self::Almost => 2,
            Self::Hesitant => 3,
            Self::Good => 4,
            Self::Perfect => 5,
        }
    }

    /// Create from a 0-5 numeric value.
    ///
    /// This is the validation boundary for caller-supplied ratings:
    /// out-of-range values are rejected here, never clamped.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blackout),
            1 => Some(Self::Wrong),
            2 => Some(Self::Almost),
            3 => Some(Self::Hesitant),
            4 => Some(Self::Good),
            5 => Some(Self::Perfect),
            _ => None,
        }
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_pass(self) -> bool {
        self.to_value() >= 3
    }
}

/// Per-(card, user) scheduling state.
///
/// Created lazily on first review submission, mutated on every
/// subsequent one. Deletion is a collaborator concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReview {
    pub card_id: String,
    pub user_id: String,
    /// Interval growth multiplier, floored at 1.3.
    pub ease_factor: f64,
    /// Days until the next review, capped at 365.
    pub interval_days: u32,
    /// Consecutive passing reviews since the last failure.
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One incorrect answer from a completed quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrongAnswer {
    pub question_id: String,
    pub label_id: String,
    pub user_answer: String,
    pub correct_answer: String,
    /// Dotted `subject.topic.slug` clustering key, usually produced by
    /// the classifier.
    pub concept_id: String,
}

/// Aggregated weak-concept record, one per (user, concept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakePattern {
    pub user_id: String,
    pub subject: String,
    pub topic: String,
    pub concept_id: String,
    pub mistake_count: u32,
    pub last_occurrence: DateTime<Utc>,
    /// Distinct question ids that contributed to this pattern.
    /// `mistake_count` increments once per wrong answer, so it can
    /// exceed the size of this set.
    pub related_questions: BTreeSet<String>,
}

impl MistakePattern {
    /// First mistake for a (user, concept) pair.
    pub fn first_occurrence(
        user_id: &str,
        concept_id: &str,
        question_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let (subject, topic) = crate::classify::split_concept(concept_id);
        Self {
            user_id: user_id.to_string(),
            subject,
            topic,
            concept_id: concept_id.to_string(),
            mistake_count: 1,
            last_occurrence: now,
            related_questions: BTreeSet::from([question_id.to_string()]),
        }
    }

    /// Fold one more wrong answer into this pattern.
    pub fn record(&mut self, question_id: &str, now: DateTime<Utc>) {
        self.mistake_count += 1;
        self.last_occurrence = now;
        self.related_questions.insert(question_id.to_string());
    }

    /// Manual mastery signal: decrement the count by one, floored at
    /// zero. Leaves `related_questions` and `last_occurrence` alone.
    pub fn mark_reviewed(&mut self) {
        self.mistake_count = self.mistake_count.saturating_sub(1);
    }
}

/// Review-count forecast windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForecast {
    /// Cards due in the 24h window starting one day from now.
    pub tomorrow: usize,
    /// Cards due after that window, up to seven days from now.
    pub next_week: usize,
}

/// Dashboard summary over one user's review records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSessionStats {
    pub total_due: usize,
    pub reviewed_today: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub mastered_cards: usize,
    /// Binary flag: 1 if any review happened today, else 0. Not a
    /// consecutive-day counter.
    pub streak_days: u32,
    pub forecast: ReviewForecast,
}
