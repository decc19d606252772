//! Record Sanitization
//!
//! Fail-fast validation of item records handed over by the storage layer.
//!
//! Checks:
//! - Ease factor is finite and not below the floor
//! - Correct count never exceeds review count
//! - Next review is never scheduled before the last review
//! - Only `New` items may be unscheduled

use crate::error::SchedulerError;
use crate::types::{Item, MasteryStage, MIN_EASE_FACTOR};

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 校验条目记录，发现数据损坏时立即报错
pub fn validate_item(item: &Item) -> Result<(), SchedulerError> {
    if has_invalid_values(&[item.ease_factor]) || item.ease_factor < MIN_EASE_FACTOR {
        return Err(SchedulerError::InvalidEaseFactor {
            identifier: item.identifier.clone(),
            ease_factor: item.ease_factor,
        });
    }

    if item.correct_count > item.review_count {
        return Err(SchedulerError::CorrectExceedsReviews {
            identifier: item.identifier.clone(),
            review_count: item.review_count,
            correct_count: item.correct_count,
        });
    }

    if let (Some(last), Some(next)) = (item.last_reviewed_at, item.next_review_at) {
        if next < last {
            return Err(SchedulerError::ScheduleBeforeLastReview {
                identifier: item.identifier.clone(),
            });
        }
    }

    if item.next_review_at.is_none() && item.mastery_stage != MasteryStage::New {
        return Err(SchedulerError::UnscheduledReviewedItem {
            identifier: item.identifier.clone(),
            stage: item.mastery_stage.to_string(),
        });
    }

    Ok(())
}

/// 校验一批条目，返回第一个错误
pub fn validate_items(items: &[Item]) -> Result<(), SchedulerError> {
    items.iter().try_for_each(validate_item)
}
