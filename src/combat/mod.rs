//! Combat and gathering resolution.
//!
//! - The interact action strikes or harvests the nearest entity at the
//!   aimed point, within the player's reach.
//! - Resource nodes gate on their tool category; creatures take damage
//!   from the best usable weapon.
//! - Kills are settled through `EntityKilledEvent`: loot, stat counters,
//!   and the sanity price of taking a life, which depends on how it was
//!   delivered.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

/// How far from the player an interaction can land.
pub const REACH: f32 = 140.0;
/// How close to the aimed point an entity must be to count as targeted.
pub const AIM_SLOP: f32 = 48.0;

/// Axe damage per swing against a tree.
pub const TREE_CHOP_DAMAGE: f32 = 25.0;
/// Pickaxe damage per swing against a rock.
pub const ROCK_MINE_DAMAGE: f32 = 25.0;
/// Durability a node swing costs its tool.
pub const NODE_SWING_DURABILITY: u32 = 2;

/// Melee damage by weapon. Bare hands hurt, barely.
pub fn melee_damage(weapon: Option<ToolKind>) -> f32 {
    match weapon {
        Some(ToolKind::Spear) => 30.0,
        Some(ToolKind::Axe) => 10.0,
        Some(ToolKind::Pickaxe) => 10.0,
        None => 5.0,
    }
}

/// Sanity price of a kill, by delivery. Automated kills are free.
pub fn kill_sanity_cost(source: KillSource) -> f32 {
    match source {
        KillSource::BareHands => 8.0,
        KillSource::MeleeTool(_) => 4.0,
        KillSource::PlayerArrow => 2.0,
        KillSource::TowerArrow => 0.0,
    }
}

/// Felled-tree loot: wood, a pinecone, and sometimes a twig.
pub fn tree_loot(rng: &mut impl Rng) -> Vec<(ItemKind, u32)> {
    let mut loot = vec![(ItemKind::Wood, 3), (ItemKind::Pinecone, 1)];
    if rng.gen::<f32>() < 0.40 {
        loot.push((ItemKind::Twig, 1));
    }
    loot
}

/// Shattered-rock loot: stone, flint, and sometimes gold.
pub fn rock_loot(rng: &mut impl Rng) -> Vec<(ItemKind, u32)> {
    let mut loot = vec![(ItemKind::Stone, 2), (ItemKind::Flint, 1)];
    if rng.gen::<f32>() < 0.30 {
        loot.push((ItemKind::Gold, 1));
    }
    loot
}

/// Hand-pickable node yields.
pub fn pick_yield(kind: EntityKind) -> Option<(ItemKind, u32)> {
    match kind {
        EntityKind::Bush => Some((ItemKind::Berry, 2)),
        EntityKind::GrassTuft => Some((ItemKind::Grass, 2)),
        EntityKind::Stick => Some((ItemKind::Twig, 1)),
        EntityKind::Flint => Some((ItemKind::Flint, 1)),
        _ => None,
    }
}

/// Kill rewards by creature.
pub fn kill_loot(kind: EntityKind) -> Vec<(ItemKind, u32)> {
    match kind {
        EntityKind::BossWolf => vec![(ItemKind::BigMeat, 1), (ItemKind::Gold, 2)],
        EntityKind::Wolf => vec![(ItemKind::Meat, 2)],
        EntityKind::Nightling | EntityKind::Spider => vec![(ItemKind::Meat, 1)],
        EntityKind::Rabbit | EntityKind::Sheep => vec![(ItemKind::Meat, 1)],
        _ => Vec::new(),
    }
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_interact, settle_kills, apply_pickups)
                .chain()
                .in_set(SimSet::Resolve)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn handle_interact(
    input: Res<PlayerInput>,
    mut player: ResMut<PlayerState>,
    mut tools: ResMut<ToolSet>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut inventory: ResMut<Inventory>,
    mut kills: EventWriter<EntityKilledEvent>,
    mut pickups: EventWriter<ItemPickupEvent>,
    mut notices: EventWriter<NoticeEvent>,
) {
    let Some((tx, ty)) = input.interact_at else {
        return;
    };
    if player.distance_to_point(tx, ty) > REACH {
        return;
    }
    player.dir = (ty - player.y).atan2(tx - player.x);

    let target = entities
        .entities
        .iter()
        .filter(|e| e.kind != EntityKind::Arrow)
        .map(|e| (e.id, e.distance_to(tx, ty)))
        .filter(|(_, d)| *d <= AIM_SLOP)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id);
    let Some(target_id) = target else {
        return;
    };

    let efficiency = player.sanity_efficiency();
    let mut rng = rand::thread_rng();
    let mut remove: Option<EntityId> = None;

    let Some(e) = entities.get_mut(target_id) else {
        return;
    };
    match e.kind {
        EntityKind::Tree => {
            if !tools.has(ToolKind::Axe) {
                notices.send(NoticeEvent {
                    message: "You need an axe to fell a tree.".to_string(),
                });
                return;
            }
            e.life -= TREE_CHOP_DAMAGE * efficiency;
            tools.consume(ToolKind::Axe, NODE_SWING_DURABILITY);
            if e.life <= 0.0 {
                for (item, qty) in tree_loot(&mut rng) {
                    pickups.send(ItemPickupEvent {
                        item,
                        quantity: scaled_yield(qty, efficiency),
                    });
                }
                remove = Some(target_id);
            }
        }
        EntityKind::Rock => {
            if !tools.has(ToolKind::Pickaxe) {
                notices.send(NoticeEvent {
                    message: "You need a pickaxe to break a rock.".to_string(),
                });
                return;
            }
            e.life -= ROCK_MINE_DAMAGE * efficiency;
            tools.consume(ToolKind::Pickaxe, NODE_SWING_DURABILITY);
            if e.life <= 0.0 {
                for (item, qty) in rock_loot(&mut rng) {
                    pickups.send(ItemPickupEvent {
                        item,
                        quantity: scaled_yield(qty, efficiency),
                    });
                }
                remove = Some(target_id);
            }
        }
        EntityKind::Bush | EntityKind::GrassTuft | EntityKind::Stick | EntityKind::Flint => {
            if let Some((item, qty)) = pick_yield(e.kind) {
                pickups.send(ItemPickupEvent {
                    item,
                    quantity: scaled_yield(qty, efficiency),
                });
            }
            remove = Some(target_id);
        }
        EntityKind::Campfire => {
            refuel_campfire(e, &mut inventory, &mut notices);
        }
        kind if kind.is_creature() => {
            let weapon = tools.best_weapon();
            e.life -= melee_damage(weapon) * efficiency;
            e.provoke();
            if let Some(tool) = weapon {
                tools.consume(tool, 1);
            }
            if e.life <= 0.0 {
                kills.send(EntityKilledEvent {
                    kind: e.kind,
                    x: e.x,
                    y: e.y,
                    source: match weapon {
                        Some(tool) => KillSource::MeleeTool(tool),
                        None => KillSource::BareHands,
                    },
                });
                remove = Some(target_id);
            }
        }
        // Beds, beacons, towers and saplings have no strike interaction.
        _ => {}
    }

    if let Some(id) = remove {
        if let Some(e) = entities.get(id) {
            if let Some((w, h)) = e.kind.footprint() {
                let (gx, gy) = world_to_grid(
                    e.x - w as f32 * TILE_SIZE / 2.0 + 1.0,
                    e.y - h as f32 * TILE_SIZE / 2.0 + 1.0,
                );
                grid.free_area(gx, gy, w, h);
            }
        }
        entities.remove_ids(&[id]);
    }
}

/// Refueling ranks fuels by heat: wood, then grass, then twigs.
fn refuel_campfire(
    fire: &mut WorldEntity,
    inventory: &mut Inventory,
    notices: &mut EventWriter<NoticeEvent>,
) {
    const FUELS: &[(ItemKind, f32)] = &[
        (ItemKind::Wood, 40.0),
        (ItemKind::Grass, 15.0),
        (ItemKind::Twig, 10.0),
    ];
    for &(item, heat) in FUELS {
        if inventory.try_remove(item, 1) {
            fire.life = (fire.life + heat).min(CAMPFIRE_MAX_FUEL);
            return;
        }
    }
    notices.send(NoticeEvent {
        message: "Nothing on hand will burn.".to_string(),
    });
}

fn scaled_yield(base: u32, efficiency: f32) -> u32 {
    ((base as f32 * efficiency).round() as u32).max(1)
}

fn settle_kills(
    mut kills: EventReader<EntityKilledEvent>,
    mut player: ResMut<PlayerState>,
    mut stats: ResMut<PlayStats>,
    mut pickups: EventWriter<ItemPickupEvent>,
) {
    for ev in kills.read() {
        for (item, quantity) in kill_loot(ev.kind) {
            pickups.send(ItemPickupEvent { item, quantity });
        }

        player.sanity -= kill_sanity_cost(ev.source);
        player.clamp_stats();

        stats.kills += 1;
        match ev.kind {
            EntityKind::Nightling => stats.nightlings_slain += 1,
            EntityKind::BossWolf => {
                stats.bosses_slain += 1;
                info!("[Combat] The boss wolf falls");
            }
            _ => {}
        }
    }
}

fn apply_pickups(
    mut pickups: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in pickups.read() {
        inventory.add(ev.item, ev.quantity);
        match ev.item {
            ItemKind::Wood => stats.wood_collected += ev.quantity,
            ItemKind::Stone => stats.stone_collected += ev.quantity,
            ItemKind::Gold => stats.gold_collected += ev.quantity,
            ItemKind::Meat | ItemKind::BigMeat => stats.meat_collected += ev.quantity,
            _ => {}
        }
    }
}
