//! Adaptive review and weakness-tracking core.
//!
//! Provides:
//! - SM-2 spaced repetition scheduling (`scheduler`)
//! - Concept classification of quiz labels (`classify`)
//! - Mistake aggregation into weak-concept patterns (`mistakes`)
//! - Due/forecast/streak summaries over review records (`stats`)
//! - Store traits for the host's persistence layer (`store`)
//!
//! The crate is consumed in-process: the host owns persistence,
//! transport and UI, and hands the engine explicit state plus the
//! current time.

pub mod cache;
pub mod classify;
pub mod error;
pub mod mistakes;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

pub use cache::TtlCache;
pub use classify::{classify, classify_with_rules, split_concept, ClassificationRule, DEFAULT_RULES};
pub use error::{ReviewError, Result, StoreError};
pub use mistakes::{BatchReport, FailedMistake, MistakeAggregator};
pub use scheduler::{ScheduleOutcome, Sm2};
pub use session::submit_review;
pub use stats::{compute_stats, due_card_ids};
pub use store::{MistakeStore, ReviewStore, StoreResult};
pub use types::{
    CardReview, MistakePattern, Quality, ReviewForecast, ReviewSessionStats, ReviewStatus,
    WrongAnswer,
};
