//! Read-only projection of the world for an external renderer.
//!
//! The simulation never draws. Once per tick the host builds a snapshot
//! from the resources and hands it to whatever presents the game; nothing
//! in here can mutate state.

use crate::shared::*;

#[derive(Debug, Clone)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub dir: f32,
    /// 0.0..=1.0 of max life; drives damage tint and fire size.
    pub life_fraction: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct LightView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub dir: f32,
    pub health: f32,
    pub hunger: f32,
    pub sanity: f32,
    pub armor: Option<u32>,
    pub dashing: bool,
}

#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    /// World coordinate of the view's top-left corner, player-centered.
    pub camera_x: f32,
    pub camera_y: f32,
    pub day: u32,
    pub day_fraction: f32,
    pub cycle: Cycle,
    pub weather: WeatherKind,
    pub weather_intensity: f32,
    pub particle_seeds: u32,
    pub blood_moon: bool,
    pub entities: Vec<EntityView>,
    pub lights: Vec<LightView>,
    pub player: PlayerView,
    /// Frontmost pending achievement popup, if the game is paused on one.
    pub popup: Option<AchievementPopup>,
}

pub fn build_snapshot(
    clock: &WorldClock,
    weather: &WeatherState,
    blood_moon: &BloodMoon,
    entities: &WorldEntities,
    player: &PlayerState,
    popups: &AchievementPopups,
) -> RenderSnapshot {
    let entity_views = entities
        .entities
        .iter()
        .map(|e| EntityView {
            id: e.id,
            kind: e.kind,
            x: e.x,
            y: e.y,
            dir: e.dir,
            life_fraction: if e.max_life > 0.0 {
                (e.life / e.max_life).clamp(0.0, 1.0)
            } else {
                1.0
            },
        })
        .collect();

    let lights = entities
        .entities
        .iter()
        .filter_map(|e| {
            e.light_radius().map(|radius| LightView {
                x: e.x,
                y: e.y,
                radius,
            })
        })
        .collect();

    RenderSnapshot {
        camera_x: player.x - VIEW_WIDTH / 2.0,
        camera_y: player.y - VIEW_HEIGHT / 2.0,
        day: clock.day,
        day_fraction: clock.fraction(),
        cycle: clock.cycle(),
        weather: weather.kind,
        weather_intensity: weather.intensity,
        particle_seeds: weather.particle_seeds,
        blood_moon: matches!(blood_moon, BloodMoon::Risen { .. }),
        entities: entity_views,
        lights,
        player: PlayerView {
            x: player.x,
            y: player.y,
            dir: player.dir,
            health: player.health,
            hunger: player.hunger,
            sanity: player.sanity,
            armor: player.armor,
            dashing: matches!(player.dash, DashState::Dashing { .. }),
        },
        popup: popups.queue.first().cloned(),
    }
}
