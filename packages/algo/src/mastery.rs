//! Mastery State Machine
//!
//! ```text
//!            hard/good/easy          good/easy, n>=3, acc>=0.70
//!   NEW ───────────────────▶ LEARNING ──────────────────────────▶ REVIEWING
//!    ▲ again                   ▲  ▲            again               │    │
//!    └─┘                       │  └────────────────────────────────┘    │
//!                              │ again        good/easy, n>=10, acc>=0.85
//!                              └──────────── MASTERED ◀─────────────────┘
//! ```
//!
//! Counters are the post-review values: the review processor applies the
//! current grade to `review_count`/`correct_count` before asking for a stage.

use crate::types::{Grade, MasteryStage};

pub const REVIEWING_MIN_REVIEWS: u32 = 3;
pub const REVIEWING_MIN_ACCURACY: f64 = 0.70;
pub const MASTERED_MIN_REVIEWS: u32 = 10;
pub const MASTERED_MIN_ACCURACY: f64 = 0.85;

/// Share of correct reviews, 0 when nothing has been reviewed.
pub fn accuracy(review_count: u32, correct_count: u32) -> f64 {
    if review_count == 0 {
        return 0.0;
    }
    f64::from(correct_count) / f64::from(review_count)
}

pub fn next_stage(
    stage: MasteryStage,
    grade: Grade,
    review_count: u32,
    correct_count: u32,
) -> MasteryStage {
    let acc = accuracy(review_count, correct_count);

    match (stage, grade) {
        (MasteryStage::New, Grade::Again) => MasteryStage::New,
        (MasteryStage::New, _) => MasteryStage::Learning,

        (MasteryStage::Learning, Grade::Good | Grade::Easy)
            if review_count >= REVIEWING_MIN_REVIEWS && acc >= REVIEWING_MIN_ACCURACY =>
        {
            MasteryStage::Reviewing
        }
        (MasteryStage::Learning, _) => MasteryStage::Learning,

        (MasteryStage::Reviewing, Grade::Again) => MasteryStage::Learning,
        (MasteryStage::Reviewing, Grade::Good | Grade::Easy)
            if review_count >= MASTERED_MIN_REVIEWS && acc >= MASTERED_MIN_ACCURACY =>
        {
            MasteryStage::Mastered
        }
        (MasteryStage::Reviewing, _) => MasteryStage::Reviewing,

        (MasteryStage::Mastered, Grade::Again) => MasteryStage::Learning,
        (MasteryStage::Mastered, _) => MasteryStage::Mastered,
    }
}
