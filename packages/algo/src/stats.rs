//! Deck-level counts for dashboards: items per stage, due now, unseen.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Item, MasteryStage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_items: usize,
    pub new_items: usize,
    pub learning_items: usize,
    pub reviewing_items: usize,
    pub mastered_items: usize,
    pub due_now: usize,
    /// Unseen items the queue builder could draw as new cards
    pub new_available: usize,
}

impl DeckStats {
    pub fn collect<Tz: TimeZone>(items: &[Item], now: DateTime<Tz>) -> Self {
        let now = now.with_timezone(&Utc);
        items.iter().fold(Self::default(), |mut stats, item| {
            stats.total_items += 1;
            match item.mastery_stage {
                MasteryStage::New => stats.new_items += 1,
                MasteryStage::Learning => stats.learning_items += 1,
                MasteryStage::Reviewing => stats.reviewing_items += 1,
                MasteryStage::Mastered => stats.mastered_items += 1,
            }
            if item.is_due(now) {
                stats.due_now += 1;
            } else if item.is_unseen() {
                stats.new_available += 1;
            }
            stats
        })
    }

    pub fn count(&self, stage: MasteryStage) -> usize {
        match stage {
            MasteryStage::New => self.new_items,
            MasteryStage::Learning => self.learning_items,
            MasteryStage::Reviewing => self.reviewing_items,
            MasteryStage::Mastered => self.mastered_items,
        }
    }
}
