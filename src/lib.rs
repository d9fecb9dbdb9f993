//! Quest progression engine for text-based multiplayer games.
//!
//! The engine decides whether a player may begin a quest, tracks staged
//! objective progress as game events arrive, and reports completion and the
//! reward descriptor. It never touches inventory, currency or world state.

pub mod config;
pub mod quest;

pub use config::{ConfigError, EngineConfig};
pub use quest::{
    ActiveQuestSummary, CatalogError, ObjectiveType, PlayerQuestState, QuestCatalog, QuestEngine,
    QuestError, QuestEvent, QuestResult, Reward, TargetMatch,
};
