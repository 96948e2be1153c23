//! Single-slot persistence and run lifecycle.
//!
//! The world lives in one `world.json` next to the executable. Writes go
//! through a temp file and a rename so a crash mid-save never corrupts
//! the previous snapshot. A missing or malformed file on load falls back
//! to a fresh world rather than failing the session.

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;
pub const SAVE_FILE: &str = "world.json";

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_save_request, handle_load_request).run_if(
                in_state(GameState::Playing).or(in_state(GameState::Paused)),
            ),
        )
        // Restarting has to work from the end screen, so no state gate.
        .add_systems(Update, handle_new_run)
        .add_systems(
            Update,
            autosave_on_day_end.run_if(in_state(GameState::Playing)),
        )
        .add_systems(OnEnter(GameState::GameOver), finish_run);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

fn save_path() -> PathBuf {
    saves_directory().join(SAVE_FILE)
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE / LOAD LOGIC
// ═══════════════════════════════════════════════════════════════════════

pub fn write_save_to(path: &Path, data: &SaveData) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| format!("Could not create saves directory: {}", e))?;
    }

    let json =
        serde_json::to_string_pretty(data).map_err(|e| format!("Serialization failed: {}", e))?;

    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(())
}

pub fn read_save_from(path: &Path) -> Result<SaveData, String> {
    if !path.exists() {
        return Err(format!("No save at {}", path.display()));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let data: SaveData =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))?;

    // Version check — future versions can add migration here
    if data.version != SAVE_VERSION {
        warn!(
            "Save has version {} but current version is {}. Attempting to load anyway.",
            data.version, SAVE_VERSION
        );
    }

    Ok(data)
}

fn clear_save() {
    let path = save_path();
    if path.exists() {
        if let Err(e) = fs::remove_file(&path) {
            warn!("[Save] Could not clear save file: {}", e);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

#[allow(clippy::too_many_arguments)]
fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    clock: Res<WorldClock>,
    weather: Res<WeatherState>,
    blood_moon: Res<BloodMoon>,
    player: Res<PlayerState>,
    inventory: Res<Inventory>,
    tools: Res<ToolSet>,
    entities: Res<WorldEntities>,
    grid: Res<WorldGrid>,
    chunks: Res<ChunkRegistry>,
    stats: Res<PlayStats>,
    achievements: Res<Achievements>,
) {
    for _ in save_events.read() {
        let data = SaveData {
            version: SAVE_VERSION,
            clock: clock.clone(),
            weather: weather.clone(),
            blood_moon: *blood_moon,
            player: player.clone(),
            inventory: inventory.clone(),
            tools: tools.clone(),
            entities: entities.clone(),
            grid: grid.clone(),
            chunks: chunks.clone(),
            stats: stats.clone(),
            achievements: achievements.clone(),
        };

        match write_save_to(&save_path(), &data) {
            Ok(()) => {
                info!("[Save] World saved (day {})", clock.day);
                complete_events.send(SaveCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save FAILED: {}", e);
                complete_events.send(SaveCompleteEvent {
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut clock: ResMut<WorldClock>,
    mut weather: ResMut<WeatherState>,
    mut blood_moon: ResMut<BloodMoon>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut tools: ResMut<ToolSet>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut chunks: ResMut<ChunkRegistry>,
    mut stats: ResMut<PlayStats>,
    mut achievements: ResMut<Achievements>,
    mut outcome: ResMut<RunOutcome>,
) {
    for _ in load_events.read() {
        match read_save_from(&save_path()) {
            Ok(data) => {
                *clock = data.clock;
                *weather = data.weather;
                *blood_moon = data.blood_moon;
                *player = data.player;
                *inventory = data.inventory;
                *tools = data.tools;
                *entities = data.entities;
                *grid = data.grid;
                *chunks = data.chunks;
                *stats = data.stats;
                *achievements = data.achievements;
                *outcome = RunOutcome::Alive;

                info!("[Save] World restored (day {})", clock.day);
                complete_events.send(LoadCompleteEvent {
                    success: true,
                    restored: true,
                });
            }
            Err(e) => {
                warn!("[Save] Load failed, starting fresh: {}", e);
                *clock = WorldClock::default();
                *weather = WeatherState::default();
                *blood_moon = BloodMoon::default();
                *player = PlayerState::default();
                *inventory = Inventory::default();
                *tools = ToolSet::default();
                *entities = WorldEntities::default();
                *grid = WorldGrid::default();
                *chunks = ChunkRegistry::default();
                *stats = PlayStats::default();
                *achievements = Achievements::default();
                *outcome = RunOutcome::Alive;

                complete_events.send(LoadCompleteEvent {
                    success: false,
                    restored: false,
                });
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_new_run(
    mut new_run_events: EventReader<NewRunEvent>,
    mut clock: ResMut<WorldClock>,
    mut weather: ResMut<WeatherState>,
    mut blood_moon: ResMut<BloodMoon>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut tools: ResMut<ToolSet>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut chunks: ResMut<ChunkRegistry>,
    mut stats: ResMut<PlayStats>,
    mut achievements: ResMut<Achievements>,
    mut outcome: ResMut<RunOutcome>,
    mut popups: ResMut<AchievementPopups>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for _ in new_run_events.read() {
        *clock = WorldClock::default();
        *weather = WeatherState::default();
        *blood_moon = BloodMoon::default();
        *player = PlayerState::default();
        *inventory = Inventory::default();
        *tools = ToolSet::default();
        *entities = WorldEntities::default();
        *grid = WorldGrid::default();
        *chunks = ChunkRegistry::default();
        *stats = PlayStats::default();
        *achievements = Achievements::default();
        *outcome = RunOutcome::Alive;
        popups.queue.clear();
        next_state.set(GameState::Playing);

        clear_save();
        info!("[Save] New run initialized");
    }
}

/// Every survived day is a checkpoint.
fn autosave_on_day_end(
    mut day_end_events: EventReader<DayEndEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    for ev in day_end_events.read() {
        info!("[Save] Autosaving at dawn of day {}", ev.new_day);
        save_writer.send(SaveRequestEvent);
    }
}

/// A finished run consumes its save. The summary goes to the log; the
/// renderer draws its own end screen from RunOutcome and PlayStats.
fn finish_run(outcome: Res<RunOutcome>, stats: Res<PlayStats>) {
    clear_save();
    match *outcome {
        RunOutcome::Dead { day } => {
            info!(
                "[Save] Run over: died on day {}. Kills {}, best streak {} days.",
                day, stats.kills, stats.best_days
            );
        }
        RunOutcome::Lost { day } => {
            info!(
                "[Save] Run over: wandered without a home until day {}.",
                day
            );
        }
        RunOutcome::Alive => {}
    }
}
