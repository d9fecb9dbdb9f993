//! Quest Event Types
//!
//! Events produced by combat, movement and inventory code that can advance
//! quest objectives.

use serde::{Deserialize, Serialize};

use super::definition::ObjectiveType;

/// Events that can trigger quest progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEvent {
    /// Player killed something
    Killed {
        player_id: String,
        /// Entity prototype ID (e.g., "riot_cop", "agent")
        entity_type: String,
        count: u32,
    },

    /// Player picked up items
    Collected {
        player_id: String,
        item_id: String,
        count: u32,
    },

    /// Player handed items to an NPC
    Delivered {
        player_id: String,
        item_id: String,
        count: u32,
    },

    /// Player entered a room
    Visited {
        player_id: String,
        room_id: String,
    },

    /// Player talked to an NPC
    TalkedTo {
        player_id: String,
        npc_id: String,
    },

    /// Player used an item or object
    Used {
        player_id: String,
        item_id: String,
    },

    /// Player made a choice
    Chose {
        player_id: String,
        choice_id: String,
    },
}

impl QuestEvent {
    /// Get the player ID associated with this event
    pub fn player_id(&self) -> &str {
        match self {
            QuestEvent::Killed { player_id, .. } => player_id,
            QuestEvent::Collected { player_id, .. } => player_id,
            QuestEvent::Delivered { player_id, .. } => player_id,
            QuestEvent::Visited { player_id, .. } => player_id,
            QuestEvent::TalkedTo { player_id, .. } => player_id,
            QuestEvent::Used { player_id, .. } => player_id,
            QuestEvent::Chose { player_id, .. } => player_id,
        }
    }

    /// Objective type this event can advance
    pub fn objective_type(&self) -> ObjectiveType {
        match self {
            QuestEvent::Killed { .. } => ObjectiveType::Kill,
            QuestEvent::Collected { .. } => ObjectiveType::Collect,
            QuestEvent::Delivered { .. } => ObjectiveType::Deliver,
            QuestEvent::Visited { .. } => ObjectiveType::Visit,
            QuestEvent::TalkedTo { .. } => ObjectiveType::Talk,
            QuestEvent::Used { .. } => ObjectiveType::Use,
            QuestEvent::Chose { .. } => ObjectiveType::Choice,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            QuestEvent::Killed { entity_type, .. } => entity_type,
            QuestEvent::Collected { item_id, .. } => item_id,
            QuestEvent::Delivered { item_id, .. } => item_id,
            QuestEvent::Visited { room_id, .. } => room_id,
            QuestEvent::TalkedTo { npc_id, .. } => npc_id,
            QuestEvent::Used { item_id, .. } => item_id,
            QuestEvent::Chose { choice_id, .. } => choice_id,
        }
    }

    /// Single-occurrence events count as 1
    pub fn amount(&self) -> u32 {
        match self {
            QuestEvent::Killed { count, .. }
            | QuestEvent::Collected { count, .. }
            | QuestEvent::Delivered { count, .. } => *count,
            _ => 1,
        }
    }
}
