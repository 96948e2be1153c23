//! Weather state machine.
//!
//! Weather is only re-rolled when the current spell expires; nothing else
//! may change the kind mid-spell. The roll table depends on the cycle
//! (storms are a night phenomenon, fog loves dusk) and on a cold spell
//! near the end of every ten-day stretch.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

pub struct WeatherPlugin;

impl Plugin for WeatherPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            tick_weather
                .in_set(SimSet::Weather)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Roll the next weather spell: kind, intensity, and duration in ticks.
pub fn roll_weather(cycle: Cycle, day: u32, rng: &mut impl Rng) -> (WeatherKind, f32, u32) {
    // Cold spell: the last three days of every ten lean heavily to snow.
    if day % 10 >= 7 && rng.gen::<f32>() < 0.40 {
        return (
            WeatherKind::Snow,
            rng.gen_range(0.3..0.8),
            rng.gen_range(DAY_LENGTH / 4..DAY_LENGTH / 2),
        );
    }

    let roll: f32 = rng.gen();
    match cycle {
        Cycle::Day => {
            if roll < 0.20 {
                (
                    WeatherKind::Rain,
                    rng.gen_range(0.3..0.9),
                    rng.gen_range(DAY_LENGTH / 4..DAY_LENGTH / 2),
                )
            } else if roll < 0.35 {
                (
                    WeatherKind::Fog,
                    rng.gen_range(0.4..1.0),
                    rng.gen_range(DAY_LENGTH / 6..DAY_LENGTH / 3),
                )
            } else {
                clear_spell(rng)
            }
        }
        Cycle::Dusk => {
            if roll < 0.25 {
                (
                    WeatherKind::Fog,
                    rng.gen_range(0.4..1.0),
                    rng.gen_range(DAY_LENGTH / 6..DAY_LENGTH / 3),
                )
            } else {
                clear_spell(rng)
            }
        }
        Cycle::Night => {
            if roll < 0.15 {
                (
                    WeatherKind::Thunderstorm,
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(DAY_LENGTH / 8..DAY_LENGTH / 4),
                )
            } else if roll < 0.30 {
                (
                    WeatherKind::Fog,
                    rng.gen_range(0.4..1.0),
                    rng.gen_range(DAY_LENGTH / 6..DAY_LENGTH / 3),
                )
            } else {
                clear_spell(rng)
            }
        }
    }
}

fn clear_spell(rng: &mut impl Rng) -> (WeatherKind, f32, u32) {
    (
        WeatherKind::Clear,
        0.0,
        rng.gen_range(DAY_LENGTH / 2..DAY_LENGTH),
    )
}

fn tick_weather(
    clock: Res<WorldClock>,
    mut weather: ResMut<WeatherState>,
    mut notices: EventWriter<NoticeEvent>,
) {
    if weather.remaining > 0 {
        weather.remaining -= 1;
        return;
    }

    let mut rng = rand::thread_rng();
    let (kind, intensity, duration) = roll_weather(clock.cycle(), clock.day, &mut rng);
    let changed = kind != weather.kind;
    weather.kind = kind;
    weather.intensity = intensity;
    weather.remaining = duration;

    if changed {
        // Renderer re-seeds its ambient particles from this count.
        weather.particle_seeds = if kind == WeatherKind::Clear {
            0
        } else {
            ((120.0 * intensity) as u32).max(60)
        };
        info!(
            "[Weather] {:?} rolls in (intensity {:.2}, {} ticks)",
            kind, intensity, duration
        );
        notices.send(NoticeEvent {
            message: match kind {
                WeatherKind::Clear => "The sky clears.".to_string(),
                WeatherKind::Rain => "Rain begins to fall.".to_string(),
                WeatherKind::Fog => "A fog rolls in.".to_string(),
                WeatherKind::Snow => "Snow drifts down.".to_string(),
                WeatherKind::Thunderstorm => "A storm breaks overhead!".to_string(),
            },
        });
    }
}
