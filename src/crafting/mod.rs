//! Crafting, building, eating and planting.
//!
//! Every request is transactional: validate materials, attempt the
//! placement or grant, and deduct only once the world has accepted it.
//! A failed placement leaves the inventory untouched.

use bevy::prelude::*;

use crate::world::WorldRng;
use crate::shared::*;

/// Material cost per recipe.
pub fn recipe_cost(recipe: RecipeKind) -> &'static [(ItemKind, u32)] {
    match recipe {
        RecipeKind::Axe => &[(ItemKind::Twig, 2), (ItemKind::Flint, 2)],
        RecipeKind::Pickaxe => &[(ItemKind::Twig, 2), (ItemKind::Flint, 2)],
        RecipeKind::Spear => &[(ItemKind::Wood, 1), (ItemKind::Gold, 1)],
        RecipeKind::Armor => &[(ItemKind::Grass, 10), (ItemKind::Twig, 2)],
        RecipeKind::Campfire => &[(ItemKind::Wood, 3), (ItemKind::Stone, 2)],
        RecipeKind::Tower => &[
            (ItemKind::Wood, 8),
            (ItemKind::Stone, 6),
            (ItemKind::Gold, 2),
        ],
        RecipeKind::Bed => &[(ItemKind::Wood, 6), (ItemKind::Grass, 8)],
        RecipeKind::Beacon => &[(ItemKind::Stone, 10), (ItemKind::Gold, 5)],
    }
}

/// Fresh durability for tool recipes.
pub fn tool_durability(recipe: RecipeKind) -> Option<(ToolKind, u32)> {
    match recipe {
        RecipeKind::Axe => Some((ToolKind::Axe, 30)),
        RecipeKind::Pickaxe => Some((ToolKind::Pickaxe, 30)),
        RecipeKind::Spear => Some((ToolKind::Spear, 100)),
        _ => None,
    }
}

/// The structure a building recipe places, if it is one.
pub fn structure_kind(recipe: RecipeKind) -> Option<EntityKind> {
    match recipe {
        RecipeKind::Campfire => Some(EntityKind::Campfire),
        RecipeKind::Tower => Some(EntityKind::Tower),
        RecipeKind::Bed => Some(EntityKind::Bed),
        RecipeKind::Beacon => Some(EntityKind::Beacon),
        _ => None,
    }
}

pub const ARMOR_DURABILITY: u32 = 50;
/// Stone cost of weatherproofing a campfire.
pub const PROTECT_COST: u32 = 2;

/// Hunger / health / sanity restored by an edible item.
pub fn food_value(item: ItemKind) -> Option<(f32, f32, f32)> {
    match item {
        ItemKind::Berry => Some((10.0, 2.0, 0.0)),
        ItemKind::Meat => Some((25.0, 5.0, 5.0)),
        ItemKind::BigMeat => Some((50.0, 50.0, 50.0)),
        _ => None,
    }
}

pub struct CraftingPlugin;

impl Plugin for CraftingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_craft_requests,
                handle_protect_requests,
                handle_eat_requests,
                handle_plant_requests,
            )
                .chain()
                .in_set(SimSet::Resolve)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn has_all(inventory: &Inventory, cost: &[(ItemKind, u32)]) -> bool {
    cost.iter().all(|&(item, qty)| inventory.has(item, qty))
}

fn deduct_all(inventory: &mut Inventory, cost: &[(ItemKind, u32)]) {
    for &(item, qty) in cost {
        inventory.try_remove(item, qty);
    }
}

/// Structures go down one tile ahead of where the player faces.
fn build_site(player: &PlayerState) -> (f32, f32) {
    (
        player.x + player.dir.cos() * TILE_SIZE * 1.5,
        player.y + player.dir.sin() * TILE_SIZE * 1.5,
    )
}

#[allow(clippy::too_many_arguments)]
fn handle_craft_requests(
    mut requests: EventReader<CraftRequestEvent>,
    mut inventory: ResMut<Inventory>,
    mut tools: ResMut<ToolSet>,
    mut player: ResMut<PlayerState>,
    mut stats: ResMut<PlayStats>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
    mut notices: EventWriter<NoticeEvent>,
) {
    for ev in requests.read() {
        let cost = recipe_cost(ev.recipe);
        if !has_all(&inventory, cost) {
            notices.send(NoticeEvent {
                message: "Not enough materials.".to_string(),
            });
            continue;
        }

        if let Some((tool, durability)) = tool_durability(ev.recipe) {
            deduct_all(&mut inventory, cost);
            tools.grant(tool, durability);
            info!("[Crafting] Crafted {:?}", tool);
            continue;
        }

        if ev.recipe == RecipeKind::Armor {
            deduct_all(&mut inventory, cost);
            player.armor = Some(ARMOR_DURABILITY);
            info!("[Crafting] Donned grass armor");
            continue;
        }

        let Some(kind) = structure_kind(ev.recipe) else {
            continue;
        };
        let site = build_site(&player);
        let placed = try_spawn(
            kind,
            Some(site),
            &mut entities,
            &mut grid,
            &mut world_rng.rng,
            player.x,
            player.y,
        );
        if !placed {
            notices.send(NoticeEvent {
                message: "No room to build here.".to_string(),
            });
            continue;
        }

        deduct_all(&mut inventory, cost);
        match kind {
            EntityKind::Campfire => stats.campfires_built += 1,
            EntityKind::Tower => stats.towers_built += 1,
            EntityKind::Bed | EntityKind::Beacon => {
                if !player.base_established {
                    player.base_established = true;
                    notices.send(NoticeEvent {
                        message: "This place feels like home now.".to_string(),
                    });
                }
            }
            _ => {}
        }
        info!("[Crafting] Built {:?}", kind);
    }
}

fn handle_protect_requests(
    mut requests: EventReader<ProtectRequestEvent>,
    player: Res<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut entities: ResMut<WorldEntities>,
    mut notices: EventWriter<NoticeEvent>,
) {
    for _ in requests.read() {
        let fire = entities
            .entities
            .iter_mut()
            .filter(|e| e.kind == EntityKind::Campfire)
            .map(|e| {
                let d = e.distance_to(player.x, player.y);
                (e, d)
            })
            .filter(|(_, d)| *d <= 140.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e);
        let Some(fire) = fire else {
            notices.send(NoticeEvent {
                message: "No campfire close enough.".to_string(),
            });
            continue;
        };

        if !inventory.try_remove(ItemKind::Stone, PROTECT_COST) {
            notices.send(NoticeEvent {
                message: "Not enough stone.".to_string(),
            });
            continue;
        }
        fire.payload = EntityPayload::Campfire {
            protection: CampfireProtection::Protected {
                ticks: CAMPFIRE_PROTECT_TICKS,
            },
        };
        info!("[Crafting] Campfire weatherproofed");
    }
}

fn handle_eat_requests(
    mut requests: EventReader<EatRequestEvent>,
    mut inventory: ResMut<Inventory>,
    mut player: ResMut<PlayerState>,
    mut notices: EventWriter<NoticeEvent>,
) {
    for ev in requests.read() {
        let Some((hunger, health, sanity)) = food_value(ev.item) else {
            notices.send(NoticeEvent {
                message: "You can't eat that.".to_string(),
            });
            continue;
        };
        if !inventory.try_remove(ev.item, 1) {
            continue;
        }
        player.hunger += hunger;
        player.health += health;
        player.sanity += sanity;
        player.clamp_stats();
    }
}

fn handle_plant_requests(
    mut requests: EventReader<PlantRequestEvent>,
    mut inventory: ResMut<Inventory>,
    player: Res<PlayerState>,
    mut stats: ResMut<PlayStats>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
    mut notices: EventWriter<NoticeEvent>,
) {
    for _ in requests.read() {
        if !inventory.has(ItemKind::Pinecone, 1) {
            notices.send(NoticeEvent {
                message: "No pinecone to plant.".to_string(),
            });
            continue;
        }
        let site = build_site(&player);
        let placed = try_spawn(
            EntityKind::Sapling,
            Some(site),
            &mut entities,
            &mut grid,
            &mut world_rng.rng,
            player.x,
            player.y,
        );
        if !placed {
            notices.send(NoticeEvent {
                message: "The ground here is taken.".to_string(),
            });
            continue;
        }
        inventory.try_remove(ItemKind::Pinecone, 1);
        stats.trees_planted += 1;
    }
}
