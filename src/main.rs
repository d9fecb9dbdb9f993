use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use quest_engine::config::{EngineConfig, DEFAULT_CONFIG_PATH};
use quest_engine::quest::{ObjectiveType, QuestCatalog, QuestEngine};

// ============================================================================
// Commands
// ============================================================================

/// A console command, one per input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start { player: String, quest: String },
    CanStart { player: String, quest: String, level: i32 },
    Event { player: String, event_type: ObjectiveType, target: String, amount: u32 },
    Abandon { player: String, quest: String },
    Reward { quest: String },
    Status { player: String },
    Quit,
}

const USAGE: &str = "Commands: start <player> <quest> | can <player> <quest> <level> | \
event <player> <type> <target> [amount] | abandon <player> <quest> | reward <quest> | \
status <player> | quit";

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let arg = |i: usize| -> Result<String, String> {
            parts
                .get(i)
                .map(|s| s.to_string())
                .ok_or_else(|| USAGE.to_string())
        };

        match parts.first().copied() {
            Some("start") => Ok(Command::Start { player: arg(1)?, quest: arg(2)? }),
            Some("can") => {
                let level = arg(3)?
                    .parse()
                    .map_err(|_| format!("Invalid level '{}'", parts[3]))?;
                Ok(Command::CanStart { player: arg(1)?, quest: arg(2)?, level })
            }
            Some("event") => {
                let type_name = arg(2)?;
                let event_type: ObjectiveType = type_name
                    .parse()
                    .map_err(|_| format!("Unknown event type '{}'", type_name))?;
                let amount = match parts.get(4) {
                    Some(s) => s.parse().map_err(|_| format!("Invalid amount '{}'", s))?,
                    None => 1,
                };
                Ok(Command::Event { player: arg(1)?, event_type, target: arg(3)?, amount })
            }
            Some("abandon") => Ok(Command::Abandon { player: arg(1)?, quest: arg(2)? }),
            Some("reward") => Ok(Command::Reward { quest: arg(1)? }),
            Some("status") => Ok(Command::Status { player: arg(1)? }),
            Some("quit") | Some("exit") => Ok(Command::Quit),
            _ => Err(USAGE.to_string()),
        }
    }
}

/// Run a command against the engine and return the lines to print
fn execute(engine: &QuestEngine, command: Command) -> Vec<String> {
    match command {
        Command::Start { player, quest } => match engine.start_quest(&player, &quest) {
            Ok(text) => vec![text],
            Err(e) => vec![e.reason()],
        },
        Command::CanStart { player, quest, level } => {
            match engine.can_start(&player, &quest, level) {
                Ok(()) => vec![format!("{} may start {}.", player, engine.catalog().display_name(&quest))],
                Err(e) => vec![e.reason()],
            }
        }
        Command::Event { player, event_type, target, amount } => {
            engine.apply(&player, event_type, &target, amount)
        }
        Command::Abandon { player, quest } => match engine.abandon_quest(&player, &quest) {
            Ok(()) => vec![format!("Abandoned {}.", engine.catalog().display_name(&quest))],
            Err(e) => vec![e.reason()],
        },
        Command::Reward { quest } => match engine.get_reward(&quest) {
            Ok(reward) => {
                let mut line = format!("XP: {}, Money: {}", reward.xp, reward.money);
                if let Some(title) = &reward.title {
                    line.push_str(&format!(", Title: {}", title));
                }
                for item in &reward.items {
                    line.push_str(&format!(", {} x{}", item.item_id, item.count));
                }
                vec![line]
            }
            Err(e) => vec![e.reason()],
        },
        Command::Status { player } => {
            let mut lines = Vec::new();
            for summary in engine.active_quests(&player) {
                lines.push(format!(
                    "{} - {} ({}/{})",
                    summary.quest_name,
                    summary.stage_name,
                    summary.stage_index + 1,
                    summary.stage_count
                ));
                for objective in summary.objectives {
                    lines.push(format!(
                        "  {} [{}/{}]",
                        objective.description, objective.current, objective.required
                    ));
                }
            }
            let completed = engine.completed_quest_names(&player);
            if !completed.is_empty() {
                lines.push(format!("Completed: {}", completed.join(", ")));
            }
            if lines.is_empty() {
                lines.push("No quests.".to_string());
            }
            lines
        }
        Command::Quit => Vec::new(),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = EngineConfig::load(&config_path)?;

    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    match config.log_filter.parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log filter '{}': {}", config.log_filter, e),
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = QuestCatalog::load_from_directory(&config.data_dir)?;
    if catalog.is_empty() {
        warn!("No quests loaded from {:?}", config.data_dir);
    }
    let engine = QuestEngine::new(Arc::new(catalog), config.target_match);

    info!("Reading commands from stdin");
    println!("{}", USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                for output in execute(&engine, command) {
                    println!("{}", output);
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    info!("Shutting down with {} tracked player(s)", engine.player_count());
    Ok(())
}
