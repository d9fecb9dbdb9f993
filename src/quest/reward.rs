//! Quest Reward Lookup
//!
//! Read-only access to reward descriptors. Crediting XP, money, titles and
//! items is left to the reward-application service.

use super::catalog::QuestCatalog;
use super::definition::Reward;
use super::error::{QuestError, QuestResult};

/// Get the reward descriptor for a quest
pub fn get_reward<'a>(catalog: &'a QuestCatalog, quest_id: &str) -> QuestResult<&'a Reward> {
    catalog
        .reward(quest_id)
        .ok_or_else(|| QuestError::QuestNotFound(quest_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::definition::{ItemReward, Quest};

    #[test]
    fn test_get_reward() {
        let reward = Reward {
            xp: 40,
            money: 10,
            title: None,
            items: vec![ItemReward {
                item_id: "red_pill".to_string(),
                count: 1,
            }],
        };
        let catalog = QuestCatalog::new(vec![Quest::new("q", "Q").with_reward(reward.clone())]).unwrap();

        assert_eq!(get_reward(&catalog, "q").unwrap(), &reward);
        assert!(matches!(get_reward(&catalog, "nope"), Err(QuestError::QuestNotFound(_))));
    }
}
