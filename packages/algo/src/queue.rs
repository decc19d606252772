//! Queue Builder
//!
//! Assembles one session's study queue from the caller's item set:
//!
//! 1. Due reviews (`next_review_at <= now`), earliest first, ties kept in
//!    input order, optionally capped at `review_limit` (the latest-due are
//!    dropped).
//! 2. Unseen items (`New`, zero reviews), shuffled, capped at `new_card_limit`.
//!
//! Reviews always precede new cards. Queue entries are indices into the slice
//! passed to [`QueueBuilder::build`], so the caller can keep mutating its own
//! records while the queue is alive.

use std::collections::VecDeque;

use chrono::{DateTime, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Item;

/// Default daily new-card allowance
pub const DEFAULT_NEW_CARD_LIMIT: usize = 20;

// ==================== Options ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOptions {
    pub new_card_limit: usize,
    /// `None` keeps every due review
    pub review_limit: Option<usize>,
    /// Fixed seed for a reproducible new-card shuffle
    pub seed: Option<u64>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            new_card_limit: DEFAULT_NEW_CARD_LIMIT,
            review_limit: None,
            seed: None,
        }
    }
}

// ==================== Study Queue ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Scheduled review that has come due
    Review,
    /// Never-seen item
    New,
    /// Graded "again" earlier in this session
    Requeued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Position in the item slice the queue was built from
    pub index: usize,
    pub kind: EntryKind,
}

/// Session-scoped, front-to-back queue of items to present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyQueue {
    entries: VecDeque<QueueEntry>,
}

impl StudyQueue {
    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    /// Append an item to the end of this session's queue for re-practice.
    pub fn requeue(&mut self, index: usize) {
        self.entries.push_back(QueueEntry {
            index,
            kind: EntryKind::Requeued,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.index).collect()
    }

    pub fn review_count(&self) -> usize {
        self.count_kind(EntryKind::Review)
    }

    pub fn new_count(&self) -> usize {
        self.count_kind(EntryKind::New)
    }

    fn count_kind(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }
}

// ==================== Builder ====================

/// Stateless apart from the RNG used for the new-card shuffle.
#[derive(Debug, Clone)]
pub struct QueueBuilder {
    new_card_limit: usize,
    review_limit: Option<usize>,
    rng: ChaCha8Rng,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            new_card_limit: options.new_card_limit,
            review_limit: options.review_limit,
            rng,
        }
    }

    /// Default limits with a fixed shuffle seed (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self::with_options(QueueOptions {
            seed: Some(seed),
            ..QueueOptions::default()
        })
    }

    pub fn new_card_limit(&self) -> usize {
        self.new_card_limit
    }

    pub fn review_limit(&self) -> Option<usize> {
        self.review_limit
    }

    pub fn build<Tz: TimeZone>(&mut self, items: &[Item], now: DateTime<Tz>) -> StudyQueue {
        let now = now.with_timezone(&Utc);

        let mut due = due_items(items, now);
        let due_total = due.len();
        if let Some(limit) = self.review_limit {
            due.truncate(limit);
        }

        // An unseen item that already carries a due date belongs to the review
        // subset; it is never offered twice.
        let mut fresh: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_unseen() && !item.is_due(now))
            .map(|(index, _)| index)
            .collect();
        let fresh_total = fresh.len();
        fresh.shuffle(&mut self.rng);
        fresh.truncate(self.new_card_limit);

        debug!(
            items = items.len(),
            due_total,
            due_selected = due.len(),
            new_total = fresh_total,
            new_selected = fresh.len(),
            "study queue built"
        );

        let entries = due
            .into_iter()
            .map(|index| QueueEntry {
                index,
                kind: EntryKind::Review,
            })
            .chain(fresh.into_iter().map(|index| QueueEntry {
                index,
                kind: EntryKind::New,
            }))
            .collect();

        StudyQueue { entries }
    }
}

/// Indices of items due at `now`, earliest-due first, stable for ties.
pub fn due_items(items: &[Item], now: DateTime<Utc>) -> Vec<usize> {
    let mut due: Vec<(usize, DateTime<Utc>)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.next_review_at
                .filter(|due_at| *due_at <= now)
                .map(|due_at| (index, due_at))
        })
        .collect();
    due.sort_by_key(|&(_, due_at)| due_at);
    due.into_iter().map(|(index, _)| index).collect()
}
