use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::queue::{QueueOptions, DEFAULT_NEW_CARD_LIMIT};

/// Per-learner study settings that feed the queue builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub new_card_limit: usize,
    pub review_limit: Option<usize>,
    pub shuffle_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            new_card_limit: DEFAULT_NEW_CARD_LIMIT,
            review_limit: None,
            shuffle_seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn from_json(raw: &str) -> Result<Self, SchedulerError> {
        serde_json::from_str(raw).map_err(|err| SchedulerError::InvalidConfig(err.to_string()))
    }

    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            new_card_limit: self.new_card_limit,
            review_limit: self.review_limit,
            seed: self.shuffle_seed,
        }
    }
}
