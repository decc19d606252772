//! Common Types and Constants
//!
//! Shared data structures used across all scheduling modules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

// ==================== Constants ====================

/// Ease factor assigned to untouched items
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Ease factor floor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Tolerance for float-to-day truncation
pub const EPSILON: f64 = 1e-9;

const SECONDS_PER_HOUR: i64 = 3600;
const HOURS_PER_DAY: i64 = 24;
const DST_SHORTFALL_HOURS: i64 = 1;

// ==================== Grade ====================

/// Learner's self-assessed recall quality for one review, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// "Good or better" counts as a correct recall.
    pub fn is_correct(self) -> bool {
        self >= Grade::Good
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    pub fn to_index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Grade {
    type Error = SchedulerError;

    /// Maps the 1-4 button rating used by the review screen.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            other => Err(SchedulerError::InvalidGrade(other.to_string())),
        }
    }
}

impl FromStr for Grade {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => Err(SchedulerError::InvalidGrade(s.to_string())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Mastery Stage ====================

/// Coarse progress bucket gating interval formulas and promotion thresholds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasteryStage {
    #[default]
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl MasteryStage {
    pub const ALL: [MasteryStage; 4] = [
        MasteryStage::New,
        MasteryStage::Learning,
        MasteryStage::Reviewing,
        MasteryStage::Mastered,
    ];

    /// Storage label, matching the `state` column of word learning records.
    pub const fn as_str(self) -> &'static str {
        match self {
            MasteryStage::New => "NEW",
            MasteryStage::Learning => "LEARNING",
            MasteryStage::Reviewing => "REVIEWING",
            MasteryStage::Mastered => "MASTERED",
        }
    }
}

impl FromStr for MasteryStage {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(MasteryStage::New),
            "LEARNING" => Ok(MasteryStage::Learning),
            "REVIEWING" => Ok(MasteryStage::Reviewing),
            "MASTERED" => Ok(MasteryStage::Mastered),
            _ => Err(SchedulerError::InvalidStage(s.to_string())),
        }
    }
}

impl fmt::Display for MasteryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Item ====================

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

/// Scheduling record for one vocabulary item.
///
/// The caller owns storage: it loads these records, hands them to the
/// scheduler by reference and persists whatever the review processor mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub identifier: String,
    #[serde(default)]
    pub mastery_stage: MasteryStage,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// `None` means not yet scheduled, only valid while the stage is `New`
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
}

impl Item {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            mastery_stage: MasteryStage::New,
            last_reviewed_at: None,
            next_review_at: None,
            ease_factor: DEFAULT_EASE_FACTOR,
            review_count: 0,
            correct_count: 0,
        }
    }

    /// Never reviewed and still in the `New` stage.
    pub fn is_unseen(&self) -> bool {
        self.mastery_stage == MasteryStage::New && self.review_count == 0
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|due_at| due_at <= now)
    }

    /// Interval of the current schedule in whole days.
    ///
    /// Derived from the gap between the last review and the next review, so it
    /// is 0 whenever either timestamp is missing. The gap is truncated to whole
    /// days, allowing the one-hour shortfall of a calendar day that crossed a
    /// spring-forward DST change (23 hours still reads as one day).
    pub fn current_interval_days(&self) -> u32 {
        let (Some(last), Some(next)) = (self.last_reviewed_at, self.next_review_at) else {
            return 0;
        };
        let hours = (next - last).num_seconds() / SECONDS_PER_HOUR;
        if hours <= 0 {
            return 0;
        }
        u32::try_from((hours + DST_SHORTFALL_HOURS) / HOURS_PER_DAY).unwrap_or(u32::MAX)
    }

    pub fn accuracy(&self) -> f64 {
        crate::mastery::accuracy(self.review_count, self.correct_count)
    }
}

// ==================== Tests ====================
