//! Quest Progress Tracker
//!
//! Applies game events to a player's active quests. Only the current stage of
//! each quest is examined; a stage advances once every one of its objectives
//! has reached its required count, and finishing the last stage completes the
//! quest on the spot.

use std::sync::Arc;
use serde::Deserialize;
use tracing::debug;

use super::catalog::QuestCatalog;
use super::definition::{ObjectiveType, Quest};
use super::error::{QuestError, QuestResult};
use super::events::QuestEvent;
use super::state::PlayerQuestState;

/// How an event target is compared with an objective target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMatch {
    /// Equal, or the event target contains the objective target
    #[default]
    Substring,
    /// Equal only
    Exact,
}

impl TargetMatch {
    pub fn matches(&self, objective_target: &str, event_target: &str) -> bool {
        match self {
            TargetMatch::Exact => objective_target == event_target,
            TargetMatch::Substring => {
                objective_target == event_target || event_target.contains(objective_target)
            }
        }
    }
}

/// Advances quest stages in response to events
pub struct ProgressTracker {
    catalog: Arc<QuestCatalog>,
    target_match: TargetMatch,
}

impl ProgressTracker {
    pub fn new(catalog: Arc<QuestCatalog>, target_match: TargetMatch) -> Self {
        Self {
            catalog,
            target_match,
        }
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    /// Start tracking a quest and return the text to show the player
    ///
    /// Eligibility is not re-checked here. Starting a quest that is already
    /// active replaces it with a fresh instance at stage 0. A quest with no
    /// stages completes immediately.
    pub fn start_quest(&self, state: &mut PlayerQuestState, quest_id: &str) -> QuestResult<String> {
        let quest = self
            .catalog
            .get(quest_id)
            .ok_or_else(|| QuestError::QuestNotFound(quest_id.to_string()))?;

        if quest.stages.is_empty() {
            state.record_completion(quest_id);
            debug!("Quest {} has no stages, completed on start", quest_id);
            return Ok(quest.description.clone());
        }

        state.start_quest(quest);
        let text = quest
            .stage(0)
            .map(|s| s.entry_text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(quest.description.as_str());

        Ok(text.to_string())
    }

    /// Apply a typed game event
    pub fn apply_event(&self, state: &mut PlayerQuestState, event: &QuestEvent) -> Vec<String> {
        self.apply(state, event.objective_type(), event.target(), event.amount())
    }

    /// Apply an event to every active quest, in quest id order
    pub fn apply(
        &self,
        state: &mut PlayerQuestState,
        event_type: ObjectiveType,
        target: &str,
        amount: u32,
    ) -> Vec<String> {
        let mut messages = Vec::new();
        if amount == 0 {
            return messages;
        }

        let quest_ids: Vec<String> = state.active.keys().cloned().collect();
        for quest_id in quest_ids {
            let Some(quest) = self.catalog.get(&quest_id) else {
                debug!("Active quest {} is missing from the catalog", quest_id);
                continue;
            };
            if self.advance(state, quest, event_type, target, amount, &mut messages) {
                debug!("Quest {} completed", quest_id);
            }
        }

        messages
    }

    /// Update one quest's current stage. Returns true if the quest completed.
    fn advance(
        &self,
        state: &mut PlayerQuestState,
        quest: &Quest,
        event_type: ObjectiveType,
        target: &str,
        amount: u32,
        messages: &mut Vec<String>,
    ) -> bool {
        let Some(progress) = state.get_quest_mut(&quest.id) else {
            return false;
        };
        let Some(stage) = quest.stage(progress.current_stage) else {
            return false;
        };

        let mut matched = false;
        for objective in &stage.objectives {
            if objective.objective_type == event_type
                && self.target_match.matches(&objective.target, target)
            {
                let count = progress.add_count(&objective.id, amount);
                debug!(
                    "Quest {} objective {}: {}/{}",
                    quest.id, objective.id, count, objective.required_count
                );
                matched = true;
            }
        }

        if !matched {
            return false;
        }

        let satisfied = stage
            .objectives
            .iter()
            .all(|o| progress.count(&o.id) >= o.required_count);
        if !satisfied {
            return false;
        }

        if !stage.completion_text.is_empty() {
            messages.push(stage.completion_text.clone());
        }
        progress.current_stage += 1;
        debug!(
            "Quest {} advanced to stage {}/{}",
            quest.id,
            progress.current_stage,
            quest.stages.len()
        );

        match quest.stage(progress.current_stage) {
            Some(next) => {
                messages.push(format!("New Objective: {}", next.name));
                if !next.entry_text.is_empty() {
                    messages.push(next.entry_text.clone());
                }
                false
            }
            None => {
                state.complete_quest(&quest.id);
                messages.push(format!("Quest Complete: {}", quest.name));
                true
            }
        }
    }
}
