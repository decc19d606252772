//! Review Processor
//!
//! Applies one graded review to an item: timestamps, counters, ease, schedule
//! and mastery stage. The caller supplies `now`; nothing in here reads the
//! clock.

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SchedulerError;
use crate::interval::{compute_next_interval, IntervalResult};
use crate::mastery::next_stage;
use crate::sanitize::validate_item;
use crate::types::{Grade, Item, MasteryStage};

/// What a single review changed, for logging and persistence by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub identifier: String,
    pub grade: Grade,
    pub previous_stage: MasteryStage,
    pub stage: MasteryStage,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
    pub is_correct: bool,
}

impl ReviewOutcome {
    pub fn was_demoted(&self) -> bool {
        self.stage < self.previous_stage
    }

    pub fn was_promoted(&self) -> bool {
        self.stage > self.previous_stage
    }
}

/// Interval previews for the four grading buttons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPreview {
    pub again: IntervalResult,
    pub hard: IntervalResult,
    pub good: IntervalResult,
    pub easy: IntervalResult,
}

impl IntervalPreview {
    pub fn get(&self, grade: Grade) -> IntervalResult {
        match grade {
            Grade::Again => self.again,
            Grade::Hard => self.hard,
            Grade::Good => self.good,
            Grade::Easy => self.easy,
        }
    }
}

/// Apply a graded review to `item` at `now`.
///
/// The next review lands `interval_days` calendar days after `now` in `now`'s
/// own time zone, so a review at 09:00 local stays at 09:00 local across DST
/// changes. The record is validated first and left untouched if it is corrupt.
pub fn process_review<Tz: TimeZone>(
    item: &mut Item,
    grade: Grade,
    now: DateTime<Tz>,
) -> Result<ReviewOutcome, SchedulerError> {
    if let Err(err) = validate_item(item) {
        warn!(identifier = %item.identifier, error = %err, "rejecting corrupt item record");
        return Err(err);
    }

    let previous_stage = item.mastery_stage;
    let result = compute_next_interval(
        item.ease_factor,
        item.current_interval_days(),
        grade,
        previous_stage,
    );

    let reviewed_at = now.with_timezone(&Utc);
    let next_review_at = add_calendar_days(&now, result.interval_days);

    item.last_reviewed_at = Some(reviewed_at);
    item.review_count = item.review_count.saturating_add(1);
    if grade.is_correct() {
        item.correct_count = item.correct_count.saturating_add(1);
    }
    item.ease_factor = result.ease_factor;
    item.next_review_at = Some(next_review_at);
    item.mastery_stage = next_stage(
        previous_stage,
        grade,
        item.review_count,
        item.correct_count,
    );

    let outcome = ReviewOutcome {
        identifier: item.identifier.clone(),
        grade,
        previous_stage,
        stage: item.mastery_stage,
        interval_days: result.interval_days,
        ease_factor: result.ease_factor,
        reviewed_at,
        next_review_at,
        is_correct: grade.is_correct(),
    };

    if outcome.was_demoted() {
        info!(
            identifier = %outcome.identifier,
            from = %previous_stage,
            to = %outcome.stage,
            "item demoted"
        );
    }
    debug!(
        identifier = %outcome.identifier,
        grade = %grade,
        stage = %outcome.stage,
        interval_days = outcome.interval_days,
        ease_factor = outcome.ease_factor,
        "review processed"
    );

    Ok(outcome)
}

/// Interval the item would get for `grade`, without touching it.
pub fn preview_interval(item: &Item, grade: Grade) -> IntervalResult {
    compute_next_interval(
        item.ease_factor,
        item.current_interval_days(),
        grade,
        item.mastery_stage,
    )
}

pub fn preview_all(item: &Item) -> IntervalPreview {
    IntervalPreview {
        again: preview_interval(item, Grade::Again),
        hard: preview_interval(item, Grade::Hard),
        good: preview_interval(item, Grade::Good),
        easy: preview_interval(item, Grade::Easy),
    }
}

fn add_calendar_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> DateTime<Utc> {
    let utc_now = now.with_timezone(&Utc);
    // Falls back to exact 24h days when the local wall-clock time does not
    // exist on the target date (spring-forward gap) or the date overflows.
    now.clone()
        .checked_add_days(Days::new(u64::from(days)))
        .map(|local| local.with_timezone(&Utc))
        .or_else(|| utc_now.checked_add_signed(Duration::days(i64::from(days))))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::America::New_York;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn reviewing_item(interval_days: i64, ease_factor: f64) -> Item {
        let last = t0() - Duration::days(interval_days);
        Item {
            mastery_stage: MasteryStage::Reviewing,
            last_reviewed_at: Some(last),
            next_review_at: Some(t0()),
            ease_factor,
            review_count: 5,
            correct_count: 4,
            ..Item::new("review")
        }
    }

    #[test]
    fn test_first_review_good() {
        let mut item = Item::new("犬");
        let outcome = process_review(&mut item, Grade::Good, t0()).unwrap();

        assert_eq!(outcome.interval_days, 1);
        assert_eq!(item.last_reviewed_at, Some(t0()));
        assert_eq!(item.next_review_at, Some(t0() + Duration::days(1)));
        assert_eq!(item.mastery_stage, MasteryStage::Learning);
        assert_eq!(item.review_count, 1);
        assert_eq!(item.correct_count, 1);
        assert_eq!(item.ease_factor, 2.5);
        assert!(outcome.was_promoted());
    }

    #[test]
    fn test_new_item_again_is_due_immediately() {
        let mut item = Item::new("猫");
        let outcome = process_review(&mut item, Grade::Again, t0()).unwrap();

        assert_eq!(outcome.interval_days, 0);
        assert_eq!(item.mastery_stage, MasteryStage::New);
        assert_eq!(item.next_review_at, Some(t0()));
        assert!(item.is_due(t0()));
        assert_eq!(item.review_count, 1);
        assert_eq!(item.correct_count, 0);
        assert!(!item.is_unseen());
    }

    #[test]
    fn test_reviewing_easy_uses_derived_interval() {
        let mut item = reviewing_item(10, 2.0);
        let outcome = process_review(&mut item, Grade::Easy, t0()).unwrap();

        assert_eq!(outcome.interval_days, 26);
        assert!((item.ease_factor - 2.15).abs() < 1e-9);
        assert_eq!(item.next_review_at, Some(t0() + Duration::days(26)));
        assert_eq!(item.current_interval_days(), 26);
    }

    #[test]
    fn test_learning_promotion_on_third_review() {
        let mut item = Item {
            mastery_stage: MasteryStage::Learning,
            last_reviewed_at: Some(t0() - Duration::days(1)),
            next_review_at: Some(t0()),
            review_count: 2,
            correct_count: 2,
            ..Item::new("promote")
        };
        let outcome = process_review(&mut item, Grade::Good, t0()).unwrap();

        assert_eq!(outcome.previous_stage, MasteryStage::Learning);
        assert_eq!(outcome.stage, MasteryStage::Reviewing);
        assert_eq!(outcome.interval_days, 6);
    }

    #[test]
    fn test_mastered_again_demotes_in_one_call() {
        let mut item = Item {
            mastery_stage: MasteryStage::Mastered,
            review_count: 30,
            correct_count: 29,
            ..reviewing_item(40, 2.8)
        };
        let outcome = process_review(&mut item, Grade::Again, t0()).unwrap();

        assert_eq!(item.mastery_stage, MasteryStage::Learning);
        assert!(outcome.was_demoted());
        assert_eq!(outcome.interval_days, 0);
    }

    #[test]
    fn test_ease_never_below_floor_after_repeated_again() {
        let mut item = reviewing_item(10, 2.5);
        for i in 0..20 {
            let now = t0() + Duration::minutes(i);
            process_review(&mut item, Grade::Again, now).unwrap();
            assert!(item.ease_factor >= crate::types::MIN_EASE_FACTOR);
        }
        assert_eq!(item.ease_factor, crate::types::MIN_EASE_FACTOR);
    }

    #[test]
    fn test_corrupt_item_rejected_untouched() {
        let mut item = Item {
            review_count: 1,
            correct_count: 2,
            ..Item::new("corrupt")
        };
        let before = item.clone();
        let result = process_review(&mut item, Grade::Good, t0());

        assert!(matches!(result, Err(SchedulerError::CorrectExceedsReviews { .. })));
        assert_eq!(item, before);
    }

    #[test]
    fn test_local_time_zone_keeps_wall_clock() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tokyo.with_ymd_and_hms(2026, 1, 31, 23, 30, 0).unwrap();
        let mut item = Item::new("月");
        process_review(&mut item, Grade::Easy, now).unwrap();

        let next = item.next_review_at.unwrap().with_timezone(&tokyo);
        assert_eq!(next, tokyo.with_ymd_and_hms(2026, 2, 4, 23, 30, 0).unwrap());
        assert_eq!(item.last_reviewed_at, Some(now.with_timezone(&Utc)));
    }

    #[test]
    fn test_spring_forward_day_keeps_wall_clock() {
        // 2026-03-08 is 23 hours long in New York
        let now = New_York.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();
        let mut item = Item::new("春");
        let outcome = process_review(&mut item, Grade::Good, now.clone()).unwrap();

        assert_eq!(outcome.interval_days, 1);
        let next = item.next_review_at.unwrap();
        assert_eq!(
            next.with_timezone(&New_York),
            New_York.with_ymd_and_hms(2026, 3, 8, 9, 0, 0).unwrap()
        );
        assert_eq!(next - now.with_timezone(&Utc), Duration::hours(23));
        assert_eq!(item.current_interval_days(), 1);
    }

    #[test]
    fn test_nonexistent_local_time_falls_back_to_exact_days() {
        // 02:30 is skipped on 2026-03-08 in New York
        let now = New_York.with_ymd_and_hms(2026, 3, 7, 2, 30, 0).unwrap();
        let mut item = Item::new("夜");
        process_review(&mut item, Grade::Good, now.clone()).unwrap();

        let next = item.next_review_at.unwrap();
        assert_eq!(next - now.with_timezone(&Utc), Duration::hours(24));
        assert_eq!(
            next.with_timezone(&New_York),
            New_York.with_ymd_and_hms(2026, 3, 8, 3, 30, 0).unwrap()
        );
        assert_eq!(item.current_interval_days(), 1);
    }

    #[test]
    fn test_preview_matches_process() {
        let item = reviewing_item(12, 2.4);
        for grade in Grade::ALL {
            let preview = preview_interval(&item, grade);
            let mut copy = item.clone();
            let outcome = process_review(&mut copy, grade, t0()).unwrap();
            assert_eq!(preview.interval_days, outcome.interval_days, "grade {grade}");
            assert_eq!(preview.ease_factor, outcome.ease_factor);
        }
    }

    #[test]
    fn test_preview_is_idempotent_and_pure() {
        let item = reviewing_item(7, 2.1);
        let before = item.clone();
        let first = preview_interval(&item, Grade::Easy);
        let second = preview_interval(&item, Grade::Easy);
        assert_eq!(first, second);
        assert_eq!(item, before);
    }

    #[test]
    fn test_preview_all_for_new_item() {
        let preview = preview_all(&Item::new("新"));
        assert_eq!(preview.again.interval_days, 0);
        assert_eq!(preview.hard.interval_days, 1);
        assert_eq!(preview.good.interval_days, 1);
        assert_eq!(preview.easy.interval_days, 4);
        assert_eq!(preview.get(Grade::Easy), preview.easy);
    }

    #[test]
    fn test_add_calendar_days_overflow_saturates() {
        let far = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(add_calendar_days(&far, u32::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
