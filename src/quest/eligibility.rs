//! Quest Eligibility
//!
//! Decides whether a player may begin a quest. Checks run in a fixed order and
//! the first failure wins.

use super::catalog::QuestCatalog;
use super::error::{QuestError, QuestResult};
use super::state::PlayerQuestState;

/// Check if a player can start a quest
///
/// Order: unknown quest, already active, already completed (non-repeatable),
/// level requirement, then prerequisites in declared order. Only the first
/// missing prerequisite is reported, by display name.
pub fn can_start(
    catalog: &QuestCatalog,
    state: &PlayerQuestState,
    quest_id: &str,
    player_level: i32,
) -> QuestResult<()> {
    let quest = catalog
        .get(quest_id)
        .ok_or_else(|| QuestError::QuestNotFound(quest_id.to_string()))?;

    if state.is_quest_active(quest_id) {
        return Err(QuestError::AlreadyActive(quest_id.to_string()));
    }

    if state.is_quest_completed(quest_id) && !quest.repeatable {
        return Err(QuestError::AlreadyCompleted(quest_id.to_string()));
    }

    if player_level < quest.min_level {
        return Err(QuestError::LevelTooLow {
            required: quest.min_level,
            actual: player_level,
        });
    }

    if let Some(missing) = quest
        .prerequisites
        .iter()
        .find(|prereq| !state.is_quest_completed(prereq))
    {
        return Err(QuestError::PrerequisiteMissing(
            catalog.display_name(missing).to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::definition::Quest;

    fn catalog() -> QuestCatalog {
        QuestCatalog::new(vec![
            Quest::new("intro", "Introduction"),
            Quest::new("trial", "The Trial"),
            Quest::new("finale", "Finale")
                .with_prerequisite("intro")
                .with_prerequisite("trial")
                .with_prerequisite("lost_chapter")
                .with_min_level(5),
            Quest::new("daily", "Daily Errand").repeatable(),
        ])
        .unwrap()
    }

    #[test]
    fn test_unknown_quest() {
        let err = can_start(&catalog(), &PlayerQuestState::new(), "nope", 99).unwrap_err();
        assert!(matches!(err, QuestError::QuestNotFound(_)));
        assert_eq!(err.reason(), "Quest not found.");
    }

    #[test]
    fn test_active_checked_before_completed() {
        let catalog = catalog();
        let mut state = PlayerQuestState::new();
        state.record_completion("intro");
        state.start_quest(catalog.get("intro").unwrap());

        let err = can_start(&catalog, &state, "intro", 1).unwrap_err();
        assert!(matches!(err, QuestError::AlreadyActive(_)));
    }

    #[test]
    fn test_repeatable_quest_can_restart() {
        let catalog = catalog();
        let mut state = PlayerQuestState::new();
        state.record_completion("daily");
        state.record_completion("intro");

        assert!(can_start(&catalog, &state, "daily", 1).is_ok());
        assert!(matches!(
            can_start(&catalog, &state, "intro", 1),
            Err(QuestError::AlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_level_checked_before_prerequisites() {
        let err = can_start(&catalog(), &PlayerQuestState::new(), "finale", 1).unwrap_err();
        assert!(matches!(err, QuestError::LevelTooLow { required: 5, actual: 1 }));
    }

    #[test]
    fn test_first_missing_prerequisite_reported() {
        let catalog = catalog();
        let mut state = PlayerQuestState::new();

        let err = can_start(&catalog, &state, "finale", 10).unwrap_err();
        assert_eq!(err.reason(), "You must first complete: Introduction.");

        state.record_completion("intro");
        let err = can_start(&catalog, &state, "finale", 10).unwrap_err();
        assert_eq!(err.reason(), "You must first complete: The Trial.");

        state.record_completion("trial");
        let err = can_start(&catalog, &state, "finale", 10).unwrap_err();
        assert!(matches!(err, QuestError::PrerequisiteMissing(name) if name == "lost_chapter"));
    }
}
