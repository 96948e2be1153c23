//! Player movement, dashing, and aimed spear throws.

use bevy::prelude::*;

use crate::shared::*;

/// Damage carried by a thrown spear's projectile.
pub const SPEAR_THROW_DAMAGE: f32 = 30.0;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_movement, throw_spear)
                .chain()
                .in_set(SimSet::Player)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Effective speed for this tick: weather-scaled, low sanity drags.
pub fn effective_speed(weather: &WeatherState, player: &PlayerState) -> f32 {
    let mut speed = PLAYER_BASE_SPEED * weather.movement_multiplier();
    if player.sanity < SANITY_THRESHOLD {
        speed *= 0.8;
    }
    speed
}

/// Advance the dash state machine by one tick. Returns the player's new
/// position while dashing, or None when movement input applies.
pub fn tick_dash(player: &mut PlayerState, dash_pressed: bool) -> Option<(f32, f32)> {
    match player.dash {
        DashState::Dashing {
            progress,
            from_x,
            from_y,
            to_x,
            to_y,
        } => {
            let progress = progress + 1;
            let t = progress as f32 / DASH_TICKS as f32;
            let pos = (from_x + (to_x - from_x) * t, from_y + (to_y - from_y) * t);
            player.dash = if progress >= DASH_TICKS {
                DashState::Cooling {
                    ticks: DASH_COOLDOWN,
                }
            } else {
                DashState::Dashing {
                    progress,
                    from_x,
                    from_y,
                    to_x,
                    to_y,
                }
            };
            Some(pos)
        }
        DashState::Cooling { ticks } => {
            player.dash = if ticks <= 1 {
                DashState::Ready
            } else {
                DashState::Cooling { ticks: ticks - 1 }
            };
            None
        }
        DashState::Ready => {
            if dash_pressed {
                let to_x = player.x + player.dir.cos() * DASH_DISTANCE;
                let to_y = player.y + player.dir.sin() * DASH_DISTANCE;
                player.dash = DashState::Dashing {
                    progress: 0,
                    from_x: player.x,
                    from_y: player.y,
                    to_x,
                    to_y,
                };
            }
            None
        }
    }
}

fn apply_movement(
    input: Res<PlayerInput>,
    weather: Res<WeatherState>,
    mut player: ResMut<PlayerState>,
) {
    let (old_x, old_y) = (player.x, player.y);

    // Facing tracks movement intent even while the dash carries us.
    if input.move_x != 0.0 || input.move_y != 0.0 {
        player.dir = input.move_y.atan2(input.move_x);
    }

    if let Some((x, y)) = tick_dash(&mut player, input.dash) {
        player.x = x;
        player.y = y;
    } else if input.move_x != 0.0 || input.move_y != 0.0 {
        let len = (input.move_x * input.move_x + input.move_y * input.move_y).sqrt();
        let speed = effective_speed(&weather, &player);
        player.x += input.move_x / len * speed;
        player.y += input.move_y / len * speed;
    }

    player.moved_this_tick = player.x != old_x || player.y != old_y;
}

/// An aimed shot throws the equipped spear: one durability per throw.
fn throw_spear(
    input: Res<PlayerInput>,
    mut player: ResMut<PlayerState>,
    mut tools: ResMut<ToolSet>,
    mut entities: ResMut<WorldEntities>,
    mut notices: EventWriter<NoticeEvent>,
) {
    let Some((tx, ty)) = input.shoot_at else {
        return;
    };
    if !tools.has(ToolKind::Spear) {
        notices.send(NoticeEvent {
            message: "You need a spear to throw.".to_string(),
        });
        return;
    }

    let dx = tx - player.x;
    let dy = ty - player.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return;
    }
    player.dir = dy.atan2(dx);

    let id = entities.alloc_id();
    let (px, py, dir) = (player.x, player.y, player.dir);
    entities.entities.push(WorldEntity {
        id,
        kind: EntityKind::Arrow,
        x: px,
        y: py,
        life: 1.0,
        max_life: 1.0,
        dir,
        payload: EntityPayload::Arrow {
            vx: dx / len * ARROW_SPEED,
            vy: dy / len * ARROW_SPEED,
            ttl: ARROW_TTL,
            damage: SPEAR_THROW_DAMAGE,
            source: ArrowSource::Player,
        },
    });

    if tools.consume(ToolKind::Spear, 1) {
        notices.send(NoticeEvent {
            message: "Your spear splinters as it leaves your hand.".to_string(),
        });
    }
}
