//! Quest Error Types
//!
//! `QuestError` displays as the reason shown to the player; `CatalogError`
//! covers definitions that fail to load.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from quest operations on a player's state
#[derive(Debug, Error)]
pub enum QuestError {
    /// Unknown quest id
    #[error("Quest not found.")]
    QuestNotFound(String),

    #[error("You are already on this quest.")]
    AlreadyActive(String),

    /// Completed before and not repeatable
    #[error("You have already completed this quest.")]
    AlreadyCompleted(String),

    #[error("You are not experienced enough for this quest (requires level {required}).")]
    LevelTooLow { required: i32, actual: i32 },

    /// Carries the display name of the first missing prerequisite
    #[error("You must first complete: {0}.")]
    PrerequisiteMissing(String),

    #[error("You are not on this quest.")]
    QuestNotActive(String),

    #[error("Quest state snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl QuestError {
    /// Player-facing reason string
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Errors raised while building the quest catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid objective type '{value}' for objective '{objective_id}' in quest '{quest_id}'")]
    InvalidObjectiveType {
        quest_id: String,
        objective_id: String,
        value: String,
    },

    #[error("Duplicate quest id '{0}'")]
    DuplicateQuest(String),

    #[error("Objective id '{objective_id}' is used more than once in quest '{quest_id}'")]
    DuplicateObjective { quest_id: String, objective_id: String },

    #[error("Stage '{stage_id}' of quest '{quest_id}' has no objectives")]
    EmptyStage { quest_id: String, stage_id: String },

    #[error("Objective '{objective_id}' of quest '{quest_id}' requires a count of zero")]
    ZeroRequiredCount { quest_id: String, objective_id: String },

    #[error("Stage '{stage_id}' of quest '{quest_id}' has an objective without an id")]
    MissingObjectiveId { quest_id: String, stage_id: String },

    /// An empty target would match every event of its type
    #[error("Objective '{objective_id}' of quest '{quest_id}' has an empty target")]
    EmptyTarget { quest_id: String, objective_id: String },
}

pub type QuestResult<T> = Result<T, QuestError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
