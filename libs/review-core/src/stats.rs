//! Read-only summarization of review records.
//!
//! Operates on one in-memory snapshot fetched by the caller in a
//! single batch, so computing a dashboard never costs a query per
//! record.

use crate::types::{CardReview, ReviewForecast, ReviewSessionStats};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::collections::HashSet;

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Whether a review is due by the end of the current day.
fn is_due(review: &CardReview, now: DateTime<Utc>) -> bool {
    review.next_review_date < start_of_day(now) + Duration::days(1)
}

/// Summarize one user's review records.
pub fn compute_stats(reviews: &[CardReview], now: DateTime<Utc>) -> ReviewSessionStats {
    let today_start = start_of_day(now);
    let today_end = today_start + Duration::days(1);
    let tomorrow_start = now + Duration::days(1);
    let tomorrow_end = now + Duration::days(2);
    let week_end = now + Duration::days(7);

    let reviewed_today = reviews
        .iter()
        .filter(|r| {
            r.last_review_date
                .is_some_and(|at| at >= today_start && at < today_end)
        })
        .count();

    ReviewSessionStats {
        total_due: reviews.iter().filter(|r| is_due(r, now)).count(),
        reviewed_today,
        new_cards: reviews.iter().filter(|r| r.repetitions == 0).count(),
        learning_cards: reviews
            .iter()
            .filter(|r| r.repetitions > 0 && r.repetitions < 3)
            .count(),
        review_cards: reviews
            .iter()
            .filter(|r| r.repetitions >= 3 && r.ease_factor < 2.5)
            .count(),
        mastered_cards: reviews
            .iter()
            .filter(|r| r.repetitions >= 3 && r.ease_factor >= 2.5 && r.interval_days >= 21)
            .count(),
        // Binary by design: reviewed-at-least-once-today, not a
        // consecutive-day counter.
        streak_days: u32::from(reviewed_today > 0),
        forecast: ReviewForecast {
            tomorrow: reviews
                .iter()
                .filter(|r| r.next_review_date >= tomorrow_start && r.next_review_date < tomorrow_end)
                .count(),
            next_week: reviews
                .iter()
                .filter(|r| r.next_review_date >= tomorrow_end && r.next_review_date <= week_end)
                .count(),
        },
    }
}

/// Card ids due by end of today, optionally restricted to the cards of
/// one deck. Deck membership comes from the caller; this engine only
/// intersects.
pub fn due_card_ids(
    reviews: &[CardReview],
    now: DateTime<Utc>,
    deck_cards: Option<&HashSet<String>>,
) -> Vec<String> {
    reviews
        .iter()
        .filter(|r| is_due(r, now))
        .filter(|r| deck_cards.map_or(true, |deck| deck.contains(&r.card_id)))
        .map(|r| r.card_id.clone())
        .collect()
}
