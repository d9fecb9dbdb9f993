//! Quest Catalog
//!
//! Loads and holds quest definitions. The catalog is frozen once built and is
//! shared behind an `Arc` without any locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::definition::{Quest, RawQuestFile, Reward};
use super::error::{CatalogError, CatalogResult};

/// Immutable store of quest definitions keyed by quest id
#[derive(Debug, Default)]
pub struct QuestCatalog {
    quests: HashMap<String, Quest>,
}

impl QuestCatalog {
    /// Build a catalog from already-resolved definitions
    pub fn new(quests: Vec<Quest>) -> CatalogResult<Self> {
        let mut map = HashMap::with_capacity(quests.len());
        for quest in quests {
            quest.validate()?;
            if map.contains_key(&quest.id) {
                return Err(CatalogError::DuplicateQuest(quest.id));
            }
            map.insert(quest.id.clone(), quest);
        }

        let catalog = Self { quests: map };
        catalog.validate_prerequisites();
        Ok(catalog)
    }

    /// Load every quest file under `<data_dir>/quests`
    pub fn load_from_directory(data_dir: &Path) -> CatalogResult<Self> {
        let quests_dir = data_dir.join("quests");
        info!("Loading quests from {:?}", quests_dir);

        if !quests_dir.exists() {
            warn!("Quest directory does not exist: {:?}", quests_dir);
            return Ok(Self::default());
        }

        let mut paths = Vec::new();
        collect_toml_files(&quests_dir, &mut paths)?;
        paths.sort();

        let mut quests = Vec::with_capacity(paths.len());
        for path in &paths {
            let quest = load_quest_file(path)?;
            info!("Loaded quest: {} ({})", quest.name, quest.id);
            quests.push(quest);
        }

        let catalog = Self::new(quests)?;
        info!("Loaded {} quest definitions", catalog.len());
        Ok(catalog)
    }

    /// Warn about prerequisites naming quests that were never loaded
    fn validate_prerequisites(&self) {
        for quest in self.quests.values() {
            for prereq in &quest.prerequisites {
                if !self.quests.contains_key(prereq) {
                    warn!(
                        "Quest '{}' references non-existent prerequisite quest '{}'",
                        quest.id, prereq
                    );
                }
            }
        }
    }

    /// Get a quest by ID
    pub fn get(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.get(quest_id)
    }

    /// Reward descriptor for a quest, if the quest exists
    pub fn reward(&self, quest_id: &str) -> Option<&Reward> {
        self.get(quest_id).map(|q| &q.reward)
    }

    /// Display name of a quest, falling back to the id itself
    pub fn display_name<'a>(&'a self, quest_id: &'a str) -> &'a str {
        self.get(quest_id).map_or(quest_id, |q| q.name.as_str())
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    /// All quest IDs, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.quests.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Quests offered by a specific NPC, sorted by id
    pub fn quests_for_giver(&self, giver: &str) -> Vec<&Quest> {
        let mut quests: Vec<&Quest> = self.quests.values().filter(|q| q.giver == giver).collect();
        quests.sort_by(|a, b| a.id.cmp(&b.id));
        quests
    }

    /// Quests without prerequisites, sorted by id
    pub fn starting_quests(&self) -> Vec<&Quest> {
        let mut quests: Vec<&Quest> = self
            .quests
            .values()
            .filter(|q| q.prerequisites.is_empty())
            .collect();
        quests.sort_by(|a, b| a.id.cmp(&b.id));
        quests
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> CatalogResult<()> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}

fn load_quest_file(path: &Path) -> CatalogResult<Quest> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: RawQuestFile = toml::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Quest::from_raw(&raw.quest)
}
