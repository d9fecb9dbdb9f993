//! Quest Engine
//!
//! Owns the catalog and every player's quest state. One lock guards the whole
//! player table: mutations hold the write lock for their full duration and
//! inspections take the read lock. Nothing here blocks on I/O.

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::QuestCatalog;
use super::definition::{ObjectiveType, Reward};
use super::eligibility;
use super::error::{QuestError, QuestResult};
use super::events::QuestEvent;
use super::reward;
use super::state::PlayerQuestState;
use super::tracker::{ProgressTracker, TargetMatch};

/// Objective line for the quest log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveSummary {
    pub id: String,
    pub description: String,
    pub current: u32,
    pub required: u32,
}

/// Display data for one active quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveQuestSummary {
    pub quest_id: String,
    pub quest_name: String,
    pub stage_name: String,
    pub stage_index: usize,
    pub stage_count: usize,
    pub objectives: Vec<ObjectiveSummary>,
}

/// Quest progression for every connected player
pub struct QuestEngine {
    tracker: ProgressTracker,
    /// Per-player quest state, created on first mutation
    players: RwLock<HashMap<String, PlayerQuestState>>,
}

impl QuestEngine {
    pub fn new(catalog: Arc<QuestCatalog>, target_match: TargetMatch) -> Self {
        info!(
            "Quest engine ready with {} quests ({:?} target matching)",
            catalog.len(),
            target_match
        );
        Self {
            tracker: ProgressTracker::new(catalog, target_match),
            players: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &QuestCatalog {
        self.tracker.catalog()
    }

    /// Check if a player may start a quest
    pub fn can_start(&self, player_id: &str, quest_id: &str, player_level: i32) -> QuestResult<()> {
        let players = self.players.read();
        let empty = PlayerQuestState::default();
        let state = players.get(player_id).unwrap_or(&empty);
        eligibility::can_start(self.catalog(), state, quest_id, player_level)
    }

    /// Start a quest without re-checking eligibility
    pub fn start_quest(&self, player_id: &str, quest_id: &str) -> QuestResult<String> {
        if !self.catalog().contains(quest_id) {
            return Err(QuestError::QuestNotFound(quest_id.to_string()));
        }

        let mut players = self.players.write();
        let state = players.entry(player_id.to_string()).or_default();
        let text = self.tracker.start_quest(state, quest_id)?;
        info!("Player {} started quest {}", player_id, quest_id);
        Ok(text)
    }

    /// Apply a game event to all of a player's active quests
    pub fn apply(
        &self,
        player_id: &str,
        event_type: ObjectiveType,
        target: &str,
        amount: u32,
    ) -> Vec<String> {
        let mut players = self.players.write();
        let Some(state) = players.get_mut(player_id) else {
            return Vec::new();
        };

        let messages = self.tracker.apply(state, event_type, target, amount);
        if !messages.is_empty() {
            debug!(
                "Player {} {} '{}' x{} produced {} quest message(s)",
                player_id,
                event_type.as_str(),
                target,
                amount,
                messages.len()
            );
        }
        messages
    }

    /// Apply a typed game event to the player it names
    pub fn apply_event(&self, event: &QuestEvent) -> Vec<String> {
        self.apply(
            event.player_id(),
            event.objective_type(),
            event.target(),
            event.amount(),
        )
    }

    /// Drop an active quest without completing it
    pub fn abandon_quest(&self, player_id: &str, quest_id: &str) -> QuestResult<()> {
        let mut players = self.players.write();
        players
            .get_mut(player_id)
            .and_then(|state| state.abandon_quest(quest_id))
            .ok_or_else(|| QuestError::QuestNotActive(quest_id.to_string()))?;
        info!("Player {} abandoned quest {}", player_id, quest_id);
        Ok(())
    }

    pub fn get_reward(&self, quest_id: &str) -> QuestResult<&Reward> {
        reward::get_reward(self.catalog(), quest_id)
    }

    /// Summaries of a player's active quests, ordered by quest id
    pub fn active_quests(&self, player_id: &str) -> Vec<ActiveQuestSummary> {
        let players = self.players.read();
        let Some(state) = players.get(player_id) else {
            return Vec::new();
        };

        state
            .active
            .values()
            .filter_map(|progress| {
                let quest = self.catalog().get(&progress.quest_id)?;
                let stage = quest.stage(progress.current_stage)?;
                Some(ActiveQuestSummary {
                    quest_id: quest.id.clone(),
                    quest_name: quest.name.clone(),
                    stage_name: stage.name.clone(),
                    stage_index: progress.current_stage,
                    stage_count: quest.stages.len(),
                    objectives: stage
                        .objectives
                        .iter()
                        .map(|o| ObjectiveSummary {
                            id: o.id.clone(),
                            description: o.description.clone(),
                            current: progress.count(&o.id),
                            required: o.required_count,
                        })
                        .collect(),
                })
            })
            .collect()
    }

    /// Names of completed quests in completion order
    pub fn completed_quest_names(&self, player_id: &str) -> Vec<String> {
        let players = self.players.read();
        players
            .get(player_id)
            .map(|state| {
                state
                    .completed
                    .iter()
                    .map(|id| self.catalog().display_name(id).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copy of a player's state, if the player has any
    pub fn player_state(&self, player_id: &str) -> Option<PlayerQuestState> {
        self.players.read().get(player_id).cloned()
    }

    /// Serialize a player's state for the save collaborator
    pub fn snapshot_player(&self, player_id: &str) -> QuestResult<Option<String>> {
        let players = self.players.read();
        players
            .get(player_id)
            .map(serde_json::to_string)
            .transpose()
            .map_err(QuestError::from)
    }

    /// Replace a player's state with a previously saved snapshot
    ///
    /// Active entries whose quest is no longer in the catalog, or whose stage
    /// index is past the quest's last stage, are dropped with a warning.
    /// Completed history is kept as saved.
    pub fn restore_player(&self, player_id: &str, json: &str) -> QuestResult<()> {
        let mut state: PlayerQuestState = serde_json::from_str(json)?;
        state.active.retain(|quest_id, progress| {
            let stage_count = self.catalog().get(quest_id).map(|q| q.stages.len());
            match stage_count {
                Some(count) if progress.current_stage < count => true,
                Some(count) => {
                    warn!(
                        "Dropping quest {} for player {}: stage {} of {}",
                        quest_id, player_id, progress.current_stage, count
                    );
                    false
                }
                None => {
                    warn!(
                        "Dropping unknown quest {} from snapshot for player {}",
                        quest_id, player_id
                    );
                    false
                }
            }
        });
        debug!(
            "Restored quest state for player {} ({} active, {} completed)",
            player_id,
            state.active.len(),
            state.completed.len()
        );
        self.players.write().insert(player_id.to_string(), state);
        Ok(())
    }

    /// Forget a player's state (e.g. on disconnect after saving)
    pub fn remove_player(&self, player_id: &str) -> Option<PlayerQuestState> {
        self.players.write().remove(player_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::definition::{Objective, Quest, Stage};

    fn engine() -> QuestEngine {
        let catalog = QuestCatalog::new(vec![
            Quest::new("courier", "Courier")
                .with_stage(
                    Stage::new("pickup", "Pick Up")
                        .with_objective(
                            Objective::new("package", ObjectiveType::Collect, "package", 1)
                                .with_description("Pick up the package"),
                        ),
                )
                .with_stage(
                    Stage::new("drop", "Drop Off")
                        .with_objective(Objective::new("dropoff", ObjectiveType::Deliver, "package", 1)),
                ),
            Quest::new("cleanup", "Cleanup").with_stage(
                Stage::new("clean", "Clean Up")
                    .with_objective(Objective::new("thugs", ObjectiveType::Kill, "thug", 2)),
            ),
        ])
        .unwrap();
        QuestEngine::new(Arc::new(catalog), TargetMatch::Substring)
    }

    #[test]
    fn test_unknown_player_is_noop() {
        let engine = engine();
        assert!(engine.apply("ghost", ObjectiveType::Kill, "thug", 1).is_empty());
        assert!(engine.active_quests("ghost").is_empty());
        assert!(engine.completed_quest_names("ghost").is_empty());
        assert_eq!(engine.player_count(), 0);
    }

    #[test]
    fn test_start_unknown_quest_creates_no_state() {
        let engine = engine();
        assert!(matches!(
            engine.start_quest("neo", "missing"),
            Err(QuestError::QuestNotFound(_))
        ));
        assert_eq!(engine.player_count(), 0);
    }

    #[test]
    fn test_active_summary_tracks_current_stage() {
        let engine = engine();
        engine.start_quest("neo", "courier").unwrap();
        engine.start_quest("neo", "cleanup").unwrap();
        engine.apply("neo", ObjectiveType::Kill, "thug", 1);

        let summaries = engine.active_quests("neo");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].quest_id, "cleanup");
        assert_eq!(summaries[0].objectives[0].current, 1);
        assert_eq!(summaries[0].objectives[0].required, 2);
        assert_eq!(summaries[1].stage_name, "Pick Up");
        assert_eq!(summaries[1].objectives[0].description, "Pick up the package");

        engine.apply("neo", ObjectiveType::Collect, "package", 1);
        let summaries = engine.active_quests("neo");
        assert_eq!(summaries[1].stage_index, 1);
        assert_eq!(summaries[1].stage_count, 2);
    }

    #[test]
    fn test_apply_event_routes_to_player() {
        let engine = engine();
        engine.start_quest("neo", "cleanup").unwrap();
        engine.start_quest("trinity", "cleanup").unwrap();

        let messages = engine.apply_event(&QuestEvent::Killed {
            player_id: "trinity".to_string(),
            entity_type: "thug".to_string(),
            count: 2,
        });
        assert_eq!(messages, vec!["Quest Complete: Cleanup".to_string()]);
        assert_eq!(engine.completed_quest_names("trinity"), vec!["Cleanup".to_string()]);
        assert!(engine.completed_quest_names("neo").is_empty());
    }

    #[test]
    fn test_abandon_quest() {
        let engine = engine();
        engine.start_quest("neo", "cleanup").unwrap();

        engine.abandon_quest("neo", "cleanup").unwrap();
        assert!(engine.active_quests("neo").is_empty());
        assert!(matches!(
            engine.abandon_quest("neo", "cleanup"),
            Err(QuestError::QuestNotActive(_))
        ));
        assert!(engine.can_start("neo", "cleanup", 1).is_ok());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let engine = engine();
        engine.start_quest("neo", "courier").unwrap();
        engine.apply("neo", ObjectiveType::Collect, "package", 1);
        let json = engine.snapshot_player("neo").unwrap().unwrap();
        let saved = engine.remove_player("neo").unwrap();

        assert!(engine.snapshot_player("neo").unwrap().is_none());
        engine.restore_player("neo", &json).unwrap();
        assert_eq!(engine.player_state("neo").unwrap(), saved);

        assert!(matches!(
            engine.restore_player("neo", "not json"),
            Err(QuestError::Snapshot(_))
        ));
    }

    #[test]
    fn test_restore_drops_entries_missing_from_catalog() {
        let engine = engine();
        engine.start_quest("neo", "courier").unwrap();
        engine.start_quest("neo", "cleanup").unwrap();
        let mut state = engine.player_state("neo").unwrap();

        let mut retired = state.active["courier"].clone();
        retired.quest_id = "retired".to_string();
        state.active.insert("retired".to_string(), retired);
        state.active.get_mut("cleanup").unwrap().current_stage = 1;
        state.completed.push("retired".to_string());
        let json = serde_json::to_string(&state).unwrap();

        engine.restore_player("trinity", &json).unwrap();
        let restored = engine.player_state("trinity").unwrap();
        assert_eq!(restored.active.keys().collect::<Vec<_>>(), vec!["courier"]);
        assert_eq!(restored.completed, vec!["retired".to_string()]);
        assert_eq!(engine.active_quests("trinity").len(), 1);
    }
}
