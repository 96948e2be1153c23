//! Spawn directors: blood moon, nightly trickle spawns, daily respawn.

use bevy::prelude::*;
use rand::Rng;

use super::WorldRng;
use crate::shared::*;

/// Distance from the player at which the blood-moon boss appears.
pub const BOSS_SPAWN_RADIUS: f32 = 400.0;
/// Nightlings materialize somewhere on this ring around the player.
pub const NIGHTLING_RING: (f32, f32) = (450.0, 550.0);

/// Daily respawn targets: (kind, target, hard cap).
pub const RESPAWN_TABLE: &[(EntityKind, usize, usize)] = &[
    (EntityKind::Tree, 80, 120),
    (EntityKind::Rock, 50, 80),
    (EntityKind::Bush, 40, 60),
    (EntityKind::GrassTuft, 70, 100),
    (EntityKind::Flint, 40, 60),
    (EntityKind::Stick, 50, 80),
    (EntityKind::Rabbit, 15, 25),
];

/// Nightling population cap for the given day.
pub fn nightling_cap(day: u32) -> usize {
    ((1 + day / 4) as usize).min(5)
}

/// Per-tick nightling spawn chance for the given day.
pub fn nightling_chance(day: u32) -> f64 {
    (0.005 + day as f64 * 0.0015).min(0.02)
}

/// Rise and set the blood moon, spawning exactly one boss per event.
///
/// The moon rises on the first night tick of every fifth day; the boss
/// spawns in the same call. The risen flag remembers which day it rose,
/// so a restored save that is still on that night keeps its event, while
/// a flag carried over from some other day reads as stale and resets.
pub fn blood_moon_director(
    clock: Res<WorldClock>,
    player: Res<PlayerState>,
    mut moon: ResMut<BloodMoon>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
    mut notices: EventWriter<NoticeEvent>,
) {
    let due = clock.day % 5 == 0 && clock.is_night();

    match *moon {
        BloodMoon::Waiting if due => {
            *moon = BloodMoon::Risen { day: clock.day };
            let angle = world_rng.rng.gen_range(0.0..std::f32::consts::TAU);
            let x = player.x + angle.cos() * BOSS_SPAWN_RADIUS;
            let y = player.y + angle.sin() * BOSS_SPAWN_RADIUS;
            try_spawn(
                EntityKind::BossWolf,
                Some((x, y)),
                &mut entities,
                &mut grid,
                &mut world_rng.rng,
                player.x,
                player.y,
            );
            warn!("[World] Blood moon rises on day {} — the boss wolf hunts", clock.day);
            notices.send(NoticeEvent {
                message: "The moon turns red. Something enormous is coming.".to_string(),
            });
        }
        BloodMoon::Risen { day } if !clock.is_night() || day != clock.day => {
            *moon = BloodMoon::Waiting;
            info!("[World] The blood moon sets");
        }
        _ => {}
    }
}

/// Trickle-spawn nightlings while it is night, up to the day's cap.
pub fn night_spawns(
    clock: Res<WorldClock>,
    player: Res<PlayerState>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
) {
    if !clock.is_night() {
        return;
    }
    if entities.count_of(EntityKind::Nightling) >= nightling_cap(clock.day) {
        return;
    }
    if !world_rng.rng.gen_bool(nightling_chance(clock.day)) {
        return;
    }

    let angle = world_rng.rng.gen_range(0.0..std::f32::consts::TAU);
    let dist = world_rng.rng.gen_range(NIGHTLING_RING.0..NIGHTLING_RING.1);
    let x = player.x + angle.cos() * dist;
    let y = player.y + angle.sin() * dist;
    try_spawn(
        EntityKind::Nightling,
        Some((x, y)),
        &mut entities,
        &mut grid,
        &mut world_rng.rng,
        player.x,
        player.y,
    );
}

/// On every day rollover, refresh depleted resources near the player:
/// 30% of each kind's deficit toward its target, never past the hard cap.
pub fn daily_respawn(
    mut day_end: EventReader<DayEndEvent>,
    player: Res<PlayerState>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
) {
    for ev in day_end.read() {
        let mut refreshed = 0;
        for &(kind, target, cap) in RESPAWN_TABLE {
            let count = entities.count_of(kind);
            if count >= target {
                continue;
            }
            let deficit = target - count;
            let budget = ((deficit as f32 * 0.3).ceil() as usize).min(cap - count);
            for _ in 0..budget {
                if try_spawn(
                    kind,
                    None,
                    &mut entities,
                    &mut grid,
                    &mut world_rng.rng,
                    player.x,
                    player.y,
                ) {
                    refreshed += 1;
                }
            }
        }
        info!(
            "[World] Day {} respawn pass refreshed {} entities",
            ev.new_day, refreshed
        );
    }
}
