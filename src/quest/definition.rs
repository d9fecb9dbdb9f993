//! Quest Definition Structures
//!
//! Raw structures are deserialized from TOML quest files and resolved into
//! the immutable `Quest` / `Stage` / `Objective` types held by the catalog.

use std::str::FromStr;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// A quest definition file as it appears on disk
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    pub quest: RawQuest,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub giver: String,
    #[serde(default)]
    pub min_level: i32,
    #[serde(default)]
    pub repeatable: bool,
    /// Quest ids that must be completed first, checked in this order
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub stages: Vec<RawStage>,
    #[serde(default)]
    pub reward: Option<RawReward>,
}

/// Raw stage as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawStage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub entry_text: String,
    #[serde(default)]
    pub completion_text: String,
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    pub id: String,
    #[serde(rename = "type")]
    pub objective_type: String,
    pub target: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub description: String,
}

fn default_count() -> u32 {
    1
}

/// Raw reward as it appears in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReward {
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub money: i32,
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<RawItemReward>,
}

/// Item reward entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawItemReward {
    pub id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

// ============================================================================
// Resolved Quest Structures (after parsing)
// ============================================================================

/// Kinds of game event an objective can wait on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Kill,
    Collect,
    Deliver,
    Visit,
    Talk,
    Use,
    Choice,
}

impl FromStr for ObjectiveType {
    type Err = String;

    /// Case-insensitive, with the long-form aliases used by older quest files
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kill" | "kill_monster" => Ok(ObjectiveType::Kill),
            "collect" | "collect_item" => Ok(ObjectiveType::Collect),
            "deliver" | "deliver_item" => Ok(ObjectiveType::Deliver),
            "visit" | "reach" | "reach_location" | "location" => Ok(ObjectiveType::Visit),
            "talk" | "talk_to" => Ok(ObjectiveType::Talk),
            "use" | "use_item" => Ok(ObjectiveType::Use),
            "choice" | "choose" => Ok(ObjectiveType::Choice),
            _ => Err(s.to_string()),
        }
    }
}

impl ObjectiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveType::Kill => "kill",
            ObjectiveType::Collect => "collect",
            ObjectiveType::Deliver => "deliver",
            ObjectiveType::Visit => "visit",
            ObjectiveType::Talk => "talk",
            ObjectiveType::Use => "use",
            ObjectiveType::Choice => "choice",
        }
    }
}

/// A single measurable condition within a stage
#[derive(Debug, Clone, Serialize)]
pub struct Objective {
    pub id: String,
    pub objective_type: ObjectiveType,
    /// Target entity/item/npc/room ID
    pub target: String,
    /// Accumulated count needed to satisfy the objective
    pub required_count: u32,
    pub description: String,
}

impl Objective {
    pub fn new(id: &str, objective_type: ObjectiveType, target: &str, required_count: u32) -> Self {
        Self {
            id: id.to_string(),
            objective_type,
            target: target.to_string(),
            required_count,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn from_raw(quest_id: &str, raw: &RawObjective) -> Result<Self, CatalogError> {
        let objective_type = raw.objective_type.parse::<ObjectiveType>().map_err(|value| {
            CatalogError::InvalidObjectiveType {
                quest_id: quest_id.to_string(),
                objective_id: raw.id.clone(),
                value,
            }
        })?;
        Ok(Self {
            id: raw.id.clone(),
            objective_type,
            target: raw.target.clone(),
            required_count: raw.count,
            description: raw.description.clone(),
        })
    }
}

/// An ordered step within a quest
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub objectives: Vec<Objective>,
    /// Shown when the stage becomes current
    pub entry_text: String,
    /// Shown when every objective of the stage is met
    pub completion_text: String,
}

impl Stage {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            objectives: Vec::new(),
            entry_text: String::new(),
            completion_text: String::new(),
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_entry_text(mut self, text: &str) -> Self {
        self.entry_text = text.to_string();
        self
    }

    pub fn with_completion_text(mut self, text: &str) -> Self {
        self.completion_text = text.to_string();
        self
    }

    fn from_raw(quest_id: &str, raw: &RawStage) -> Result<Self, CatalogError> {
        let objectives = raw
            .objectives
            .iter()
            .map(|o| Objective::from_raw(quest_id, o))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            objectives,
            entry_text: raw.entry_text.clone(),
            completion_text: raw.completion_text.clone(),
        })
    }
}

/// Item reward entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReward {
    pub item_id: String,
    pub count: u32,
}

/// Reward descriptor handed to the reward-application service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub xp: i32,
    pub money: i32,
    pub title: Option<String>,
    pub items: Vec<ItemReward>,
}

impl Reward {
    pub fn from_raw(raw: &RawReward) -> Self {
        Self {
            xp: raw.xp,
            money: raw.money,
            title: raw.title.clone(),
            items: raw
                .items
                .iter()
                .map(|i| ItemReward {
                    item_id: i.id.clone(),
                    count: i.count,
                })
                .collect(),
        }
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    /// NPC that offers this quest
    pub giver: String,
    /// Quest ids that must be in the player's completed history
    pub prerequisites: Vec<String>,
    /// Strictly sequential; no skipping, no branching
    pub stages: Vec<Stage>,
    pub reward: Reward,
    pub repeatable: bool,
    pub min_level: i32,
}

impl Quest {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            giver: String::new(),
            prerequisites: Vec::new(),
            stages: Vec::new(),
            reward: Reward::default(),
            repeatable: false,
            min_level: 0,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_giver(mut self, giver: &str) -> Self {
        self.giver = giver.to_string();
        self
    }

    pub fn with_prerequisite(mut self, quest_id: &str) -> Self {
        self.prerequisites.push(quest_id.to_string());
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_min_level(mut self, level: i32) -> Self {
        self.min_level = level;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Create a Quest from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, CatalogError> {
        let stages = raw
            .stages
            .iter()
            .map(|s| Stage::from_raw(&raw.id, s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            giver: raw.giver.clone(),
            prerequisites: raw.prerequisites.clone(),
            stages,
            reward: raw.reward.as_ref().map(Reward::from_raw).unwrap_or_default(),
            repeatable: raw.repeatable,
            min_level: raw.min_level,
        })
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Check the definition for entries that would break progression
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen: Vec<&str> = Vec::new();
        for stage in &self.stages {
            if stage.objectives.is_empty() {
                return Err(CatalogError::EmptyStage {
                    quest_id: self.id.clone(),
                    stage_id: stage.id.clone(),
                });
            }
            for objective in &stage.objectives {
                if objective.id.is_empty() {
                    return Err(CatalogError::MissingObjectiveId {
                        quest_id: self.id.clone(),
                        stage_id: stage.id.clone(),
                    });
                }
                if objective.target.is_empty() {
                    return Err(CatalogError::EmptyTarget {
                        quest_id: self.id.clone(),
                        objective_id: objective.id.clone(),
                    });
                }
                if objective.required_count == 0 {
                    return Err(CatalogError::ZeroRequiredCount {
                        quest_id: self.id.clone(),
                        objective_id: objective.id.clone(),
                    });
                }
                if seen.contains(&objective.id.as_str()) {
                    return Err(CatalogError::DuplicateObjective {
                        quest_id: self.id.clone(),
                        objective_id: objective.id.clone(),
                    });
                }
                seen.push(&objective.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_type_parsing() {
        assert_eq!("kill".parse::<ObjectiveType>(), Ok(ObjectiveType::Kill));
        assert_eq!("kill_monster".parse::<ObjectiveType>(), Ok(ObjectiveType::Kill));
        assert_eq!("Collect".parse::<ObjectiveType>(), Ok(ObjectiveType::Collect));
        assert_eq!("reach_location".parse::<ObjectiveType>(), Ok(ObjectiveType::Visit));
        assert_eq!("talk_to".parse::<ObjectiveType>(), Ok(ObjectiveType::Talk));
        assert_eq!("choice".parse::<ObjectiveType>(), Ok(ObjectiveType::Choice));
        assert_eq!("invalid".parse::<ObjectiveType>(), Err("invalid".to_string()));
    }

    #[test]
    fn test_quest_from_raw() {
        let toml_str = r#"
[quest]
id = "free_your_mind"
name = "Free Your Mind"
giver = "morpheus"
min_level = 1

[[quest.stages]]
id = "train"
name = "Enter the Dojo"
entry_text = "Morpheus waits in the dojo."

[[quest.stages.objectives]]
id = "visit_dojo"
type = "visit"
target = "dojo"
description = "Go to the dojo"

[quest.reward]
xp = 100
money = 50
title = "Awakened"
"#;
        let raw: RawQuestFile = toml::from_str(toml_str).unwrap();
        let quest = Quest::from_raw(&raw.quest).unwrap();

        assert_eq!(quest.stages.len(), 1);
        assert_eq!(quest.stages[0].objectives[0].objective_type, ObjectiveType::Visit);
        assert_eq!(quest.stages[0].objectives[0].required_count, 1);
        assert_eq!(quest.reward.title.as_deref(), Some("Awakened"));
        assert!(!quest.repeatable);
    }

    #[test]
    fn test_invalid_objective_type_is_rejected() {
        let toml_str = r#"
[quest]
id = "broken"
name = "Broken"

[[quest.stages]]
id = "s1"
name = "Stage"

[[quest.stages.objectives]]
id = "o1"
type = "dance"
target = "floor"
"#;
        let raw: RawQuestFile = toml::from_str(toml_str).unwrap();
        let err = Quest::from_raw(&raw.quest).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidObjectiveType { .. }));
    }

    #[test]
    fn test_validate_rejects_reused_objective_id() {
        let quest = Quest::new("q", "Q")
            .with_stage(Stage::new("a", "A").with_objective(Objective::new("o", ObjectiveType::Kill, "x", 1)))
            .with_stage(Stage::new("b", "B").with_objective(Objective::new("o", ObjectiveType::Kill, "y", 1)));
        assert!(matches!(quest.validate(), Err(CatalogError::DuplicateObjective { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_stage_and_zero_count() {
        let empty = Quest::new("q", "Q").with_stage(Stage::new("a", "A"));
        assert!(matches!(empty.validate(), Err(CatalogError::EmptyStage { .. })));

        let zero = Quest::new("q", "Q")
            .with_stage(Stage::new("a", "A").with_objective(Objective::new("o", ObjectiveType::Use, "x", 0)));
        assert!(matches!(zero.validate(), Err(CatalogError::ZeroRequiredCount { .. })));
    }

    #[test]
    fn test_validate_rejects_blank_objective_fields() {
        let no_target = Quest::new("q", "Q")
            .with_stage(Stage::new("a", "A").with_objective(Objective::new("o", ObjectiveType::Kill, "", 1)));
        assert!(matches!(
            no_target.validate(),
            Err(CatalogError::EmptyTarget { objective_id, .. }) if objective_id == "o"
        ));

        let no_id = Quest::new("q", "Q")
            .with_stage(Stage::new("a", "A").with_objective(Objective::new("", ObjectiveType::Kill, "x", 1)));
        assert!(matches!(
            no_id.validate(),
            Err(CatalogError::MissingObjectiveId { stage_id, .. }) if stage_id == "a"
        ));
    }
}
