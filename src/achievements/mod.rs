//! Achievement definitions, unlock checks, and the popup pause flow.
//!
//! Unlocks are permanent per profile. Each unlock queues a popup; a
//! non-empty queue pauses the simulation until every popup is confirmed
//! away, one at a time.

use bevy::prelude::*;

use crate::shared::*;

pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "survivor_3",
        name: "Three Dawns",
        description: "Survive 3 days",
    },
    AchievementDef {
        id: "survivor_7",
        name: "First Week",
        description: "Survive 7 days",
    },
    AchievementDef {
        id: "survivor_15",
        name: "Old Hand",
        description: "Survive 15 days",
    },
    AchievementDef {
        id: "lumberjack",
        name: "Lumberjack",
        description: "Collect 100 wood",
    },
    AchievementDef {
        id: "quarryman",
        name: "Quarryman",
        description: "Collect 50 stone",
    },
    AchievementDef {
        id: "prospector",
        name: "Prospector",
        description: "Collect 10 gold",
    },
    AchievementDef {
        id: "hunter",
        name: "Hunter",
        description: "Slay 10 creatures",
    },
    AchievementDef {
        id: "moonbreaker",
        name: "Moonbreaker",
        description: "Fell a blood moon boss",
    },
    AchievementDef {
        id: "hearthkeeper",
        name: "Hearthkeeper",
        description: "Build 5 campfires",
    },
    AchievementDef {
        id: "warden",
        name: "Warden",
        description: "Raise 3 watchtowers",
    },
    AchievementDef {
        id: "forester",
        name: "Forester",
        description: "Plant 10 trees",
    },
    AchievementDef {
        id: "provider",
        name: "Provider",
        description: "Gather 20 meat",
    },
];

/// One condition per id. Unknown ids never fire.
pub fn evaluate_condition(achievement_id: &str, stats: &PlayStats) -> bool {
    match achievement_id {
        "survivor_3" => stats.days_survived >= 3,
        "survivor_7" => stats.days_survived >= 7,
        "survivor_15" => stats.days_survived >= 15,
        "lumberjack" => stats.wood_collected >= 100,
        "quarryman" => stats.stone_collected >= 50,
        "prospector" => stats.gold_collected >= 10,
        "hunter" => stats.kills >= 10,
        "moonbreaker" => stats.bosses_slain >= 1,
        "hearthkeeper" => stats.campfires_built >= 5,
        "warden" => stats.towers_built >= 3,
        "forester" => stats.trees_planted >= 10,
        "provider" => stats.meat_collected >= 20,
        _ => false,
    }
}

pub struct AchievementsPlugin;

impl Plugin for AchievementsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (check_achievements, open_popup)
                .chain()
                .in_set(SimSet::Meta)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            dismiss_popup
                .in_set(SimSet::Meta)
                .run_if(in_state(GameState::Paused)),
        );
    }
}

fn check_achievements(
    stats: Res<PlayStats>,
    mut achievements: ResMut<Achievements>,
    mut popups: ResMut<AchievementPopups>,
    mut unlocked_events: EventWriter<AchievementUnlockedEvent>,
) {
    let mut newly_unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        if achievements.unlocked.iter().any(|id| id == def.id) {
            continue;
        }
        if evaluate_condition(def.id, &stats) {
            newly_unlocked.push(def);
        }
    }

    for def in newly_unlocked {
        achievements.unlocked.push(def.id.to_string());
        popups.queue.push(AchievementPopup {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
        });
        unlocked_events.send(AchievementUnlockedEvent {
            achievement_id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
        });
        info!("[Achievements] Unlocked: {}", def.name);
    }
}

/// A pending popup freezes the world until it is read.
fn open_popup(popups: Res<AchievementPopups>, mut next_state: ResMut<NextState<GameState>>) {
    if !popups.queue.is_empty() {
        next_state.set(GameState::Paused);
    }
}

fn dismiss_popup(
    input: Res<PlayerInput>,
    mut popups: ResMut<AchievementPopups>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if popups.queue.is_empty() {
        next_state.set(GameState::Playing);
        return;
    }
    if input.confirm {
        popups.queue.remove(0);
        if popups.queue.is_empty() {
            next_state.set(GameState::Playing);
        }
    }
}
