//! Quest System Module
//!
//! Quest progression engine: eligibility, staged objective tracking and
//! reward lookup over an immutable catalog of TOML-defined quests.

pub mod catalog;
pub mod definition;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod events;
pub mod reward;
pub mod state;
pub mod tracker;

pub use catalog::QuestCatalog;
pub use definition::{ItemReward, Objective, ObjectiveType, Quest, Reward, Stage};
pub use engine::{ActiveQuestSummary, ObjectiveSummary, QuestEngine};
pub use error::{CatalogError, QuestError, QuestResult};
pub use events::QuestEvent;
pub use state::{PlayerQuestState, Progress};
pub use tracker::{ProgressTracker, TargetMatch};
