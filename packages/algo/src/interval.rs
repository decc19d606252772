//! Interval Calculator
//!
//! Pure SM-2 style interval computation over the four-button grade scale.
//!
//! | grade | new | learning | reviewing / mastered          | ease    |
//! |-------|-----|----------|-------------------------------|---------|
//! | again | 0   | 0        | 0                             | -0.20   |
//! | hard  | 1   | 1        | max(1, ⌊I × 1.2⌋)             | -0.15   |
//! | good  | 1   | 6        | max(1, ⌊I × EF⌋)              | ±0      |
//! | easy  | 4   | 10       | max(1, ⌊I × EF × 1.3⌋)        | +0.15   |
//!
//! Ease never drops below [`MIN_EASE_FACTOR`]; there is no ceiling.

use serde::{Deserialize, Serialize};

use crate::types::{Grade, MasteryStage, EPSILON, MIN_EASE_FACTOR};

// ==================== Constants ====================

pub const AGAIN_EASE_PENALTY: f64 = 0.2;
pub const HARD_EASE_PENALTY: f64 = 0.15;
pub const EASY_EASE_BONUS: f64 = 0.15;

pub const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;
pub const EASY_INTERVAL_MULTIPLIER: f64 = 1.3;

/// Interval for "hard" while the item is still new or learning
pub const HARD_LEARNING_INTERVAL_DAYS: u32 = 1;
pub const GOOD_NEW_INTERVAL_DAYS: u32 = 1;
pub const GOOD_LEARNING_INTERVAL_DAYS: u32 = 6;
pub const EASY_NEW_INTERVAL_DAYS: u32 = 4;
pub const EASY_LEARNING_INTERVAL_DAYS: u32 = 10;

/// Outcome of one interval computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalResult {
    /// Days until the next review; 0 means "again, right away"
    pub interval_days: u32,
    pub ease_factor: f64,
}

/// Compute the next interval and ease factor.
///
/// `current_interval_days` is the whole-day length of the item's current
/// schedule (0 for never-reviewed items).
pub fn compute_next_interval(
    ease_factor: f64,
    current_interval_days: u32,
    grade: Grade,
    stage: MasteryStage,
) -> IntervalResult {
    let current = f64::from(current_interval_days);
    let in_learning = matches!(stage, MasteryStage::New | MasteryStage::Learning);

    match grade {
        Grade::Again => IntervalResult {
            interval_days: 0,
            ease_factor: floor_ease(ease_factor - AGAIN_EASE_PENALTY),
        },
        Grade::Hard => IntervalResult {
            interval_days: if in_learning {
                HARD_LEARNING_INTERVAL_DAYS
            } else {
                scaled_interval(current * HARD_INTERVAL_MULTIPLIER)
            },
            ease_factor: floor_ease(ease_factor - HARD_EASE_PENALTY),
        },
        Grade::Good => IntervalResult {
            interval_days: match stage {
                MasteryStage::New => GOOD_NEW_INTERVAL_DAYS,
                MasteryStage::Learning => GOOD_LEARNING_INTERVAL_DAYS,
                MasteryStage::Reviewing | MasteryStage::Mastered => {
                    scaled_interval(current * ease_factor)
                }
            },
            ease_factor,
        },
        Grade::Easy => IntervalResult {
            interval_days: match stage {
                MasteryStage::New => EASY_NEW_INTERVAL_DAYS,
                MasteryStage::Learning => EASY_LEARNING_INTERVAL_DAYS,
                MasteryStage::Reviewing | MasteryStage::Mastered => {
                    scaled_interval(current * ease_factor * EASY_INTERVAL_MULTIPLIER)
                }
            },
            ease_factor: ease_factor + EASY_EASE_BONUS,
        },
    }
}

fn floor_ease(ease_factor: f64) -> f64 {
    ease_factor.max(MIN_EASE_FACTOR)
}

/// Truncate toward zero with a minimum of one day.
///
/// The epsilon keeps products such as `10 × 2.3` (22.999…96 in binary) on the
/// intended whole day. `as` saturates at `u32::MAX` and maps NaN to 0.
fn scaled_interval(raw_days: f64) -> u32 {
    let days = (raw_days + EPSILON).trunc() as u32;
    days.max(1)
}
