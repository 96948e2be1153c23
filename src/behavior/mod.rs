//! Per-tick entity behavior.
//!
//! One pass over the registry, dispatched by an exhaustive match on the
//! entity kind. The pass captures the entry count up front, pushes new
//! projectiles at the tail, and applies removals afterward, so appending
//! and removing mid-scan can never skip or double-process an entry.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

pub const TOWER_RANGE: f32 = 320.0;
pub const TOWER_POWER: f32 = 35.0;
pub const TOWER_COOLDOWN: u32 = 25;

/// Flee trigger distance for skittish creatures.
pub const FLEE_RADIUS: f32 = 150.0;
/// Distance inside which a neutral wolf drifts away from the player.
pub const WOLF_PERSONAL_SPACE: f32 = 120.0;

struct AttackProfile {
    speed: f32,
    range: f32,
    cooldown: u32,
    damage: f32,
    poisons: bool,
}

fn attack_profile(kind: EntityKind) -> AttackProfile {
    match kind {
        EntityKind::BossWolf => AttackProfile {
            speed: 1.8,
            range: 60.0,
            cooldown: 60,
            damage: 25.0,
            poisons: false,
        },
        EntityKind::Nightling => AttackProfile {
            speed: 2.6,
            range: 55.0,
            cooldown: 50,
            damage: 8.0,
            poisons: false,
        },
        EntityKind::Wolf => AttackProfile {
            speed: 2.2,
            range: 55.0,
            cooldown: 55,
            damage: 12.0,
            poisons: false,
        },
        EntityKind::Spider => AttackProfile {
            speed: 2.0,
            range: 50.0,
            cooldown: 50,
            damage: 6.0,
            poisons: true,
        },
        _ => AttackProfile {
            speed: 0.0,
            range: 0.0,
            cooldown: u32::MAX,
            damage: 0.0,
            poisons: false,
        },
    }
}

/// Armor halves the blow and wears by one per absorbed hit.
pub fn strike_player(player: &mut PlayerState, damage: f32, poisons: bool) {
    let dealt = match player.armor {
        Some(dur) => {
            player.armor = if dur <= 1 { None } else { Some(dur - 1) };
            damage * 0.5
        }
        None => damage,
    };
    player.health -= dealt;
    if poisons {
        player.poison_ticks = POISON_TICKS;
    }
    player.clamp_stats();
}

pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            tick_entities
                .in_set(SimSet::Behavior)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn tick_entities(
    clock: Res<WorldClock>,
    weather: Res<WeatherState>,
    mut player: ResMut<PlayerState>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut kills: EventWriter<EntityKilledEvent>,
    mut notices: EventWriter<NoticeEvent>,
) {
    let mut rng = rand::thread_rng();
    let night = clock.is_night();
    let move_mult = weather.movement_multiplier();
    // Rough weather drags on animal activity.
    let activity = match weather.kind {
        WeatherKind::Rain | WeatherKind::Snow | WeatherKind::Thunderstorm => 0.3,
        WeatherKind::Fog => 0.7,
        WeatherKind::Clear => 1.0,
    };

    let initial_len = entities.entities.len();
    let mut removals: Vec<EntityId> = Vec::new();
    let mut new_arrows: Vec<WorldEntity> = Vec::new();
    // (arrow id, target id, damage, source)
    let mut arrow_hits: Vec<(EntityId, EntityId, f32, ArrowSource)> = Vec::new();
    // (sapling id, grid cell)
    let mut ripe_saplings: Vec<(EntityId, i32, i32)> = Vec::new();
    // Saplings that became trees: their cell now belongs to the tree and
    // must not be freed by the generic removal sweep.
    let mut transformed: Vec<EntityId> = Vec::new();

    for i in 0..initial_len {
        let mut e = entities.entities[i].clone();
        match e.kind {
            EntityKind::Rabbit | EntityKind::Sheep => {
                wander_or_flee(&mut e, &player, &mut rng, 3.5 * move_mult, activity);
            }
            EntityKind::Wolf => {
                let hostility = creature_hostility(&e);
                if hostility == Hostility::Provoked {
                    pursue_and_strike(&mut e, &mut player, move_mult);
                } else {
                    let dist = e.distance_to(player.x, player.y);
                    if dist < WOLF_PERSONAL_SPACE && dist > 0.0 {
                        // Gives ground without fleeing outright.
                        let dx = e.x - player.x;
                        let dy = e.y - player.y;
                        e.x += dx / dist * 0.8 * move_mult;
                        e.y += dy / dist * 0.8 * move_mult;
                        e.dir = dy.atan2(dx);
                    } else {
                        wander_or_flee(&mut e, &player, &mut rng, 0.0, activity);
                    }
                }
            }
            EntityKind::Spider => {
                if creature_hostility(&e) == Hostility::Provoked {
                    pursue_and_strike(&mut e, &mut player, move_mult);
                } else {
                    wander_or_flee(&mut e, &player, &mut rng, 2.0 * move_mult, activity);
                }
            }
            EntityKind::Nightling | EntityKind::BossWolf => {
                if night {
                    pursue_and_strike(&mut e, &mut player, move_mult);
                } else {
                    // Creatures of the dark do not survive the dawn.
                    removals.push(e.id);
                }
            }
            EntityKind::Campfire => {
                let protected = matches!(
                    e.payload,
                    EntityPayload::Campfire {
                        protection: CampfireProtection::Protected { .. }
                    }
                );
                e.life -= CAMPFIRE_DECAY * weather.campfire_decay_multiplier(protected);
                if let EntityPayload::Campfire {
                    protection: CampfireProtection::Protected { ticks },
                } = e.payload
                {
                    e.payload = EntityPayload::Campfire {
                        protection: if ticks <= 1 {
                            CampfireProtection::Unprotected
                        } else {
                            CampfireProtection::Protected { ticks: ticks - 1 }
                        },
                    };
                }
                if e.life <= 0.0 {
                    removals.push(e.id);
                    notices.send(NoticeEvent {
                        message: "A campfire gutters out.".to_string(),
                    });
                }
            }
            EntityKind::Tower => {
                if let EntityPayload::Tower { cooldown } = e.payload {
                    if cooldown > 0 {
                        e.payload = EntityPayload::Tower {
                            cooldown: cooldown - 1,
                        };
                    } else if let Some(arrow) = tower_fire(&e, &entities, &weather) {
                        new_arrows.push(arrow);
                        e.payload = EntityPayload::Tower {
                            cooldown: TOWER_COOLDOWN,
                        };
                    }
                }
            }
            EntityKind::Arrow => {
                if let EntityPayload::Arrow {
                    vx,
                    vy,
                    ttl,
                    damage,
                    source,
                } = e.payload
                {
                    e.x += vx;
                    e.y += vy;
                    if ttl <= 1 {
                        removals.push(e.id);
                    } else {
                        e.payload = EntityPayload::Arrow {
                            vx,
                            vy,
                            ttl: ttl - 1,
                            damage,
                            source,
                        };
                        if let Some(target) = arrow_target(&e, &entities) {
                            arrow_hits.push((e.id, target, damage, source));
                        }
                    }
                }
            }
            EntityKind::Sapling => {
                if let EntityPayload::Sapling { growth } = e.payload {
                    let growth = (growth + 1).min(SAPLING_GROWTH_TICKS);
                    e.payload = EntityPayload::Sapling { growth };
                    if growth >= SAPLING_GROWTH_TICKS {
                        let (gx, gy) = world_to_grid(e.x, e.y);
                        ripe_saplings.push((e.id, gx, gy));
                    }
                }
            }
            // Static nodes and structures with no per-tick behavior.
            EntityKind::Tree
            | EntityKind::Rock
            | EntityKind::Bush
            | EntityKind::GrassTuft
            | EntityKind::Flint
            | EntityKind::Stick
            | EntityKind::Bed
            | EntityKind::Beacon => {}
        }
        entities.entities[i] = e;
    }

    // Arrow impacts: consume the arrow, wound the target, credit kills.
    // A target downed earlier this tick is still in the list, so the kill
    // fires only on the hit that crossed zero.
    for (arrow_id, target_id, damage, source) in arrow_hits {
        removals.push(arrow_id);
        if let Some(target) = entities.get_mut(target_id) {
            let was_alive = target.life > 0.0;
            target.life -= damage;
            target.provoke();
            if was_alive && target.life <= 0.0 {
                kills.send(EntityKilledEvent {
                    kind: target.kind,
                    x: target.x,
                    y: target.y,
                    source: match source {
                        ArrowSource::Player => KillSource::PlayerArrow,
                        ArrowSource::Tower => KillSource::TowerArrow,
                    },
                });
                removals.push(target_id);
            }
        }
    }

    // A ripe sapling becomes a tree the first tick its grown footprint
    // fits; until then it stays ripe and retries.
    for (sapling_id, gx, gy) in ripe_saplings {
        grid.free_area(gx, gy, 1, 1);
        if grid.is_area_occupied(gx, gy, 2, 2) {
            grid.occupy_area(gx, gy, 1, 1);
            continue;
        }
        grid.occupy_area(gx, gy, 2, 2);
        removals.push(sapling_id);
        transformed.push(sapling_id);
        let id = entities.alloc_id();
        entities.entities.push(WorldEntity {
            id,
            kind: EntityKind::Tree,
            x: gx as f32 * TILE_SIZE + TILE_SIZE,
            y: gy as f32 * TILE_SIZE + TILE_SIZE,
            life: EntityKind::Tree.initial_life(),
            max_life: EntityKind::Tree.initial_life(),
            dir: 0.0,
            payload: EntityPayload::Inert,
        });
    }

    for mut arrow in new_arrows {
        arrow.id = entities.alloc_id();
        entities.entities.push(arrow);
    }

    // Free grid cells for grid-bound removals, then drop them all.
    for id in &removals {
        if transformed.contains(id) {
            continue;
        }
        if let Some(e) = entities.get(*id) {
            if let Some((w, h)) = e.kind.footprint() {
                let (gx, gy) = world_to_grid(e.x - w as f32 * TILE_SIZE / 2.0 + 1.0,
                                             e.y - h as f32 * TILE_SIZE / 2.0 + 1.0);
                grid.free_area(gx, gy, w, h);
            }
        }
    }
    entities.remove_ids(&removals);
}

fn creature_hostility(e: &WorldEntity) -> Hostility {
    match e.payload {
        EntityPayload::Creature { hostility, .. } => hostility,
        _ => Hostility::Passive,
    }
}

fn wander_or_flee(
    e: &mut WorldEntity,
    player: &PlayerState,
    rng: &mut impl Rng,
    flee_speed: f32,
    activity: f32,
) {
    let EntityPayload::Creature {
        mut vx,
        mut vy,
        attack_timer,
        hostility,
    } = e.payload
    else {
        return;
    };

    let dist = e.distance_to(player.x, player.y);
    if flee_speed > 0.0 && dist < FLEE_RADIUS && dist > 0.0 {
        vx = (e.x - player.x) / dist * flee_speed;
        vy = (e.y - player.y) / dist * flee_speed;
    } else {
        if rng.gen::<f32>() < 0.02 * activity {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            vx = angle.cos() * 1.2;
            vy = angle.sin() * 1.2;
        }
        if rng.gen::<f32>() < 0.05 {
            vx = 0.0;
            vy = 0.0;
        }
    }

    e.x += vx;
    e.y += vy;
    if vx != 0.0 || vy != 0.0 {
        e.dir = vy.atan2(vx);
    }
    e.payload = EntityPayload::Creature {
        vx,
        vy,
        attack_timer,
        hostility,
    };
}

fn pursue_and_strike(e: &mut WorldEntity, player: &mut PlayerState, move_mult: f32) {
    let profile = attack_profile(e.kind);
    let EntityPayload::Creature {
        mut attack_timer,
        hostility,
        ..
    } = e.payload
    else {
        return;
    };

    let dist = e.distance_to(player.x, player.y);
    let (mut vx, mut vy) = (0.0, 0.0);
    if dist > profile.range && dist > 0.0 {
        vx = (player.x - e.x) / dist * profile.speed * move_mult;
        vy = (player.y - e.y) / dist * profile.speed * move_mult;
        e.x += vx;
        e.y += vy;
    }
    e.dir = (player.y - e.y).atan2(player.x - e.x);

    if attack_timer > 0 {
        attack_timer -= 1;
    } else if dist <= profile.range {
        strike_player(player, profile.damage, profile.poisons);
        attack_timer = profile.cooldown;
    }

    e.payload = EntityPayload::Creature {
        vx,
        vy,
        attack_timer,
        hostility,
    };
}

/// Pick the nearest provoked creature in (fog-shortened) range and lead
/// the shot. Neutral wolves and unbothered spiders get to walk past.
fn tower_fire(
    tower: &WorldEntity,
    entities: &WorldEntities,
    weather: &WeatherState,
) -> Option<WorldEntity> {
    let range = match weather.kind {
        WeatherKind::Fog => TOWER_RANGE * (0.7 + 0.3 * (1.0 - weather.intensity)),
        _ => TOWER_RANGE,
    };

    let target = entities
        .entities
        .iter()
        .filter(|e| creature_hostility(e) == Hostility::Provoked)
        .map(|e| (e, e.distance_to(tower.x, tower.y)))
        .filter(|(_, d)| *d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let (e, dist) = target;
    let (tvx, tvy) = match e.payload {
        EntityPayload::Creature { vx, vy, .. } => (vx, vy),
        _ => (0.0, 0.0),
    };
    // Half linear prediction keeps fast runners catchable without
    // overshooting ones that turn.
    let lead = dist / ARROW_SPEED * 0.5;
    let aim_x = e.x + tvx * lead;
    let aim_y = e.y + tvy * lead;
    let dx = aim_x - tower.x;
    let dy = aim_y - tower.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }

    Some(WorldEntity {
        id: 0,
        kind: EntityKind::Arrow,
        x: tower.x,
        y: tower.y,
        life: 1.0,
        max_life: 1.0,
        dir: dy.atan2(dx),
        payload: EntityPayload::Arrow {
            vx: dx / len * ARROW_SPEED,
            vy: dy / len * ARROW_SPEED,
            ttl: ARROW_TTL,
            damage: TOWER_POWER,
            source: ArrowSource::Tower,
        },
    })
}

/// First valid overlap wins; player arrows also take small game.
fn arrow_target(arrow: &WorldEntity, entities: &WorldEntities) -> Option<EntityId> {
    let player_thrown = matches!(
        arrow.payload,
        EntityPayload::Arrow {
            source: ArrowSource::Player,
            ..
        }
    );
    entities
        .entities
        .iter()
        .filter(|e| {
            e.kind.is_hostile()
                || (player_thrown && matches!(e.kind, EntityKind::Rabbit | EntityKind::Sheep))
        })
        .find(|e| e.distance_to(arrow.x, arrow.y) < ARROW_HIT_RADIUS)
        .map(|e| e.id)
}
