//! Quest State Tracking
//!
//! Per-player records of active quest instances and completed history.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::definition::Quest;

/// Progress of one active quest instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub quest_id: String,
    /// Index into the quest's stages; never decreases
    pub current_stage: usize,
    /// Accumulated count per objective id; never decreases
    pub objective_counts: BTreeMap<String, u32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Fresh progress at stage 0 with every objective count zeroed
    pub fn new(quest: &Quest) -> Self {
        let objective_counts = quest
            .stages
            .iter()
            .flat_map(|s| s.objectives.iter())
            .map(|o| (o.id.clone(), 0))
            .collect();

        Self {
            quest_id: quest.id.clone(),
            current_stage: 0,
            objective_counts,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn count(&self, objective_id: &str) -> u32 {
        self.objective_counts.get(objective_id).copied().unwrap_or(0)
    }

    /// Add to an objective's count and return the new total
    pub fn add_count(&mut self, objective_id: &str, amount: u32) -> u32 {
        let count = self.objective_counts.entry(objective_id.to_string()).or_insert(0);
        *count = count.saturating_add(amount);
        *count
    }

    /// Mark as finished
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

}

/// All quest state for a single player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerQuestState {
    /// Active quests (quest_id -> progress), ordered by quest id
    pub active: BTreeMap<String, Progress>,
    /// Completed quest IDs in completion order; repeats allowed for repeatable quests
    pub completed: Vec<String>,
}

impl PlayerQuestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh instance of a quest, discarding any active one
    pub fn start_quest(&mut self, quest: &Quest) {
        self.active.insert(quest.id.clone(), Progress::new(quest));
    }

    pub fn get_quest(&self, quest_id: &str) -> Option<&Progress> {
        self.active.get(quest_id)
    }

    pub fn get_quest_mut(&mut self, quest_id: &str) -> Option<&mut Progress> {
        self.active.get_mut(quest_id)
    }

    /// Move an active quest into the completed history
    pub fn complete_quest(&mut self, quest_id: &str) -> Option<Progress> {
        let mut progress = self.active.remove(quest_id)?;
        progress.complete();
        self.completed.push(quest_id.to_string());
        Some(progress)
    }

    /// Record a completion for a quest that never became active
    pub fn record_completion(&mut self, quest_id: &str) {
        self.completed.push(quest_id.to_string());
    }

    /// Drop an active quest without recording completion
    pub fn abandon_quest(&mut self, quest_id: &str) -> Option<Progress> {
        self.active.remove(quest_id)
    }

    pub fn is_quest_completed(&self, quest_id: &str) -> bool {
        self.completed.iter().any(|id| id == quest_id)
    }

    pub fn is_quest_active(&self, quest_id: &str) -> bool {
        self.active.contains_key(quest_id)
    }

    /// Number of times a quest has been completed
    pub fn completion_count(&self, quest_id: &str) -> usize {
        self.completed.iter().filter(|id| *id == quest_id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
