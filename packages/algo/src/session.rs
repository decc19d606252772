//! Session Aggregator
//!
//! Per-session grade tallies plus a thin driver that walks a [`StudyQueue`],
//! runs each grade through the review processor and re-queues "again" cards.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SchedulerError;
use crate::queue::{QueueEntry, StudyQueue};
use crate::review::{process_review, ReviewOutcome};
use crate::types::{Grade, Item};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl GradeCounts {
    pub fn get(&self, grade: Grade) -> u32 {
        match grade {
            Grade::Again => self.again,
            Grade::Hard => self.hard,
            Grade::Good => self.good,
            Grade::Easy => self.easy,
        }
    }

    fn increment(&mut self, grade: Grade) {
        let slot = match grade {
            Grade::Again => &mut self.again,
            Grade::Hard => &mut self.hard,
            Grade::Good => &mut self.good,
            Grade::Easy => &mut self.easy,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Counts for one sitting; re-queued repeats are counted every time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub cards_reviewed: u32,
    pub correct_count: u32,
    pub grade_counts: GradeCounts,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, grade: Grade) {
        self.cards_reviewed = self.cards_reviewed.saturating_add(1);
        if grade.is_correct() {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.grade_counts.increment(grade);
    }

    pub fn count(&self, grade: Grade) -> u32 {
        self.grade_counts.get(grade)
    }

    pub fn accuracy(&self) -> f64 {
        crate::mastery::accuracy(self.cards_reviewed, self.correct_count)
    }
}

/// One study sitting: a queue consumed front to back and its running stats.
#[derive(Debug, Clone, Default)]
pub struct StudySession {
    queue: StudyQueue,
    stats: SessionStats,
}

impl StudySession {
    pub fn new(queue: StudyQueue) -> Self {
        Self {
            queue,
            stats: SessionStats::default(),
        }
    }

    /// Entry to present next.
    pub fn current(&self) -> Option<QueueEntry> {
        self.queue.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn queue(&self) -> &StudyQueue {
        &self.queue
    }

    /// Grade the current entry.
    ///
    /// `items` must be the slice the queue was built from. On error the entry
    /// stays at the front and nothing is recorded.
    pub fn grade<Tz: TimeZone>(
        &mut self,
        items: &mut [Item],
        grade: Grade,
        now: DateTime<Tz>,
    ) -> Result<ReviewOutcome, SchedulerError> {
        let entry = self.current().ok_or(SchedulerError::QueueExhausted)?;
        let len = items.len();
        let item = items
            .get_mut(entry.index)
            .ok_or(SchedulerError::ItemIndexOutOfRange {
                index: entry.index,
                len,
            })?;

        let outcome = process_review(item, grade, now)?;

        self.queue.pop_front();
        self.stats.record(grade);
        if grade == Grade::Again {
            self.queue.requeue(entry.index);
            debug!(identifier = %outcome.identifier, remaining = self.queue.len(), "requeued for this session");
        }

        Ok(outcome)
    }

    pub fn finish(self) -> SessionStats {
        self.stats
    }
}
