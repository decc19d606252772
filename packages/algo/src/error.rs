use thiserror::Error;

/// Contract violations raised by the scheduler.
///
/// None of these are recoverable runtime conditions: each one means the caller
/// handed over a record or an input that the storage/import layer should never
/// have produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("unrecognized grade: {0:?}")]
    InvalidGrade(String),
    #[error("unrecognized mastery stage: {0:?}")]
    InvalidStage(String),
    #[error("item {identifier}: correct count {correct_count} exceeds review count {review_count}")]
    CorrectExceedsReviews {
        identifier: String,
        review_count: u32,
        correct_count: u32,
    },
    #[error("item {identifier}: ease factor {ease_factor} is not a finite value >= 1.3")]
    InvalidEaseFactor { identifier: String, ease_factor: f64 },
    #[error("item {identifier}: next review is scheduled before the last review")]
    ScheduleBeforeLastReview { identifier: String },
    #[error("item {identifier}: stage {stage} requires a scheduled next review")]
    UnscheduledReviewedItem { identifier: String, stage: String },
    #[error("queue entry points at item {index} but only {len} items were supplied")]
    ItemIndexOutOfRange { index: usize, len: usize },
    #[error("study queue is exhausted")]
    QueueExhausted,
    #[error("invalid scheduler config: {0}")]
    InvalidConfig(String),
}
