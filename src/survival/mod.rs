//! Hunger, sanity, poison, darkness exposure, and death.
//!
//! Runs after combat resolution so the tick's damage and food are already
//! applied when the passive drains land.

use bevy::prelude::*;

use crate::shared::*;

pub const HUNGER_DRAIN_MOVING: f32 = 0.015;
pub const HUNGER_DRAIN_IDLE: f32 = 0.005;
pub const NIGHT_UNLIT_SANITY_DRAIN: f32 = 0.05;
pub const DUSK_UNLIT_SANITY_DRAIN: f32 = 0.01;
pub const POISON_SANITY_DRAIN: f32 = 0.05;
pub const HOMESICK_SANITY_DRAIN: f32 = 0.01;
pub const SANITY_REGEN: f32 = 0.08;
pub const STARVATION_DAMAGE: f32 = 0.03;
pub const MADNESS_DAMAGE: f32 = 0.04;
/// How close a bed or beacon must be to count as standing at home.
pub const NEAR_BASE_RADIUS: f32 = 150.0;

pub struct SurvivalPlugin;

impl Plugin for SurvivalPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (tick_survival, check_death)
                .chain()
                .in_set(SimSet::Survival)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Whether any light source covers the player's position.
pub fn player_is_lit(entities: &WorldEntities, player: &PlayerState) -> bool {
    entities.entities.iter().any(|e| {
        e.light_radius()
            .is_some_and(|r| e.distance_to(player.x, player.y) <= r)
    })
}

/// Distance to the closest bed or beacon, if any exists.
pub fn nearest_base_distance(entities: &WorldEntities, player: &PlayerState) -> Option<f32> {
    entities
        .entities
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Bed | EntityKind::Beacon))
        .map(|e| e.distance_to(player.x, player.y))
        .min_by(f32::total_cmp)
}

/// Net sanity delta for one tick. Positive only when resting somewhere
/// safe outside the night.
pub fn sanity_delta(
    cycle: Cycle,
    weather: &WeatherState,
    lit: bool,
    base_distance: Option<f32>,
    base_established: bool,
    poisoned: bool,
) -> f32 {
    let at_home = base_distance.is_some_and(|d| d <= NEAR_BASE_RADIUS);
    let mut delta = -weather.sanity_drain();
    if poisoned {
        delta -= POISON_SANITY_DRAIN;
    }
    match cycle {
        Cycle::Night if !lit => delta -= NIGHT_UNLIT_SANITY_DRAIN,
        Cycle::Dusk if !lit && !at_home => delta -= DUSK_UNLIT_SANITY_DRAIN,
        _ => {}
    }
    if base_established && base_distance.is_none_or(|d| d > BASE_COMFORT_RADIUS) {
        delta -= HOMESICK_SANITY_DRAIN;
    }
    if (lit || at_home) && cycle != Cycle::Night {
        delta += SANITY_REGEN;
    }
    delta
}

fn tick_survival(
    clock: Res<WorldClock>,
    weather: Res<WeatherState>,
    entities: Res<WorldEntities>,
    mut player: ResMut<PlayerState>,
    mut notices: EventWriter<NoticeEvent>,
) {
    player.hunger -= if player.moved_this_tick {
        HUNGER_DRAIN_MOVING
    } else {
        HUNGER_DRAIN_IDLE
    };

    let lit = player_is_lit(&entities, &player);
    let base_distance = nearest_base_distance(&entities, &player);
    let poisoned = player.poison_ticks > 0;
    player.sanity += sanity_delta(
        clock.cycle(),
        &weather,
        lit,
        base_distance,
        player.base_established,
        poisoned,
    );
    if poisoned {
        player.poison_ticks -= 1;
        if player.poison_ticks == 0 {
            notices.send(NoticeEvent {
                message: "The venom has run its course.".to_string(),
            });
        }
    }

    if player.hunger <= 0.0 {
        player.health -= STARVATION_DAMAGE;
    }
    if player.sanity <= 0.0 {
        player.health -= MADNESS_DAMAGE;
    }

    // Standing in full night darkness is survivable only in short bursts.
    if clock.is_night() && !lit {
        player.dark_ticks += 1;
        if player.dark_ticks > DARKNESS_LIMIT {
            player.health -= DARKNESS_DAMAGE;
            player.dark_ticks = 0;
            notices.send(NoticeEvent {
                message: "Something brushed past you in the dark.".to_string(),
            });
        }
    } else {
        player.dark_ticks = 0;
    }

    player.clamp_stats();
}

fn check_death(
    clock: Res<WorldClock>,
    player: Res<PlayerState>,
    mut outcome: ResMut<RunOutcome>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if player.health > 0.0 || *outcome != RunOutcome::Alive {
        return;
    }
    *outcome = RunOutcome::Dead { day: clock.day };
    next_state.set(GameState::GameOver);
    info!("[Survival] The wilds claimed you on day {}", clock.day);
}
