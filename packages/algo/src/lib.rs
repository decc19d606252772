//! # jouzu-algo - 词汇学习间隔重复调度核心
//!
//! 本 crate 提供纯 Rust 实现的复习调度引擎:
//!
//! - **Interval Calculator** - 根据评分与掌握阶段计算下次间隔与难度系数
//! - **Mastery State Machine** - NEW / LEARNING / REVIEWING / MASTERED 阶段迁移
//! - **Review Processor** - 对单个条目应用一次评分
//! - **Queue Builder** - 组装到期复习与新词的学习队列
//! - **Session Aggregator** - 统计单次学习的评分分布与正确率
//!
//! ## 设计理念
//!
//! - **无状态** - 引擎不持有条目，也不做持久化；存储层负责读写被修改的字段
//! - **显式时间** - 所有与时间相关的调用都由调用方传入 `now`
//! - **快速失败** - 损坏的记录返回 [`SchedulerError`]，不做静默修正
//!
//! ## 模块结构
//!
//! - [`interval`] - 间隔计算 (SM-2 变体)
//! - [`mastery`] - 掌握阶段状态机
//! - [`review`] - 评分处理与间隔预览
//! - [`queue`] - 学习队列构建
//! - [`session`] - 学习会话统计
//! - [`stats`] - 词库阶段统计
//! - [`config`] - 队列配置
//! - [`sanitize`] - 记录校验
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use chrono::Utc;
//! use jouzu_algo::{Grade, Item, QueueBuilder, StudySession};
//!
//! let mut items = vec![Item::new("食べる"), Item::new("飲む")];
//! let now = Utc::now();
//!
//! let queue = QueueBuilder::with_seed(42).build(&items, now);
//! let mut session = StudySession::new(queue);
//!
//! while !session.is_finished() {
//!     session.grade(&mut items, Grade::Good, now).unwrap();
//! }
//!
//! assert_eq!(session.stats().cards_reviewed, 2);
//! assert!(items.iter().all(|item| item.review_count == 1));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod config;
pub mod error;
pub mod interval;
pub mod mastery;
pub mod queue;
pub mod review;
pub mod sanitize;
pub mod session;
pub mod stats;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use config::SchedulerConfig;
pub use error::SchedulerError;

/// 重新导出间隔计算
pub use interval::{compute_next_interval, IntervalResult};

/// 重新导出掌握阶段状态机
pub use mastery::{accuracy, next_stage};

/// 重新导出评分处理
pub use review::{preview_all, preview_interval, process_review, IntervalPreview, ReviewOutcome};

/// 重新导出队列构建
pub use queue::{due_items, EntryKind, QueueBuilder, QueueEntry, QueueOptions, StudyQueue};

/// 重新导出会话统计
pub use session::{GradeCounts, SessionStats, StudySession};

pub use stats::DeckStats;
