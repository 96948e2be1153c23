//! Headless integration tests for Emberwild.
//!
//! These tests drive the simulation without a window or GPU. They use
//! Bevy's `MinimalPlugins` to tick the app, register only the domain
//! plugins under test, and verify that the core loops work end to end.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use emberwild::shared::*;
use emberwild::world::WorldRng;
use emberwild::{achievements, behavior, clock, combat, crafting, input, player, save, survival, weather, world};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering or real input. Domain plugins are added per-test
/// depending on what's being exercised. The world RNG is seeded so chunk
/// generation is deterministic across runs.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<WorldClock>()
        .init_resource::<WeatherState>()
        .init_resource::<BloodMoon>()
        .init_resource::<WorldEntities>()
        .init_resource::<WorldGrid>()
        .init_resource::<ChunkRegistry>()
        .init_resource::<PlayerState>()
        .init_resource::<PlayerInput>()
        .init_resource::<Inventory>()
        .init_resource::<ToolSet>()
        .init_resource::<RunOutcome>()
        .init_resource::<PlayStats>()
        .init_resource::<Achievements>()
        .init_resource::<AchievementPopups>();
    app.insert_resource(WorldRng::seeded(0xE17B));

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<DayEndEvent>()
        .add_event::<NoticeEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<EntityKilledEvent>()
        .add_event::<CraftRequestEvent>()
        .add_event::<EatRequestEvent>()
        .add_event::<PlantRequestEvent>()
        .add_event::<ProtectRequestEvent>()
        .add_event::<AchievementUnlockedEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>()
        .add_event::<NewRunEvent>();

    // ── Simulation pass ordering (mirrors main.rs) ───────────────────────
    app.configure_sets(
        Update,
        (
            SimSet::Clock,
            SimSet::Weather,
            SimSet::World,
            SimSet::Player,
            SimSet::Behavior,
            SimSet::Resolve,
            SimSet::Survival,
            SimSet::Meta,
            SimSet::Flush,
        )
            .chain(),
    );

    app
}

fn tick(app: &mut App, n: u32) {
    for _ in 0..n {
        app.update();
    }
}

fn set_interact(app: &mut App, x: f32, y: f32) {
    app.world_mut()
        .resource_mut::<PlayerInput>()
        .interact_at = Some((x, y));
}

/// Pushes an entity directly, bypassing placement. Grid cells are the
/// caller's responsibility.
fn push_entity(app: &mut App, kind: EntityKind, x: f32, y: f32, life: f32) -> EntityId {
    let mut entities = app.world_mut().resource_mut::<WorldEntities>();
    let id = entities.alloc_id();
    entities.entities.push(WorldEntity {
        id,
        kind,
        x,
        y,
        life,
        max_life: kind.initial_life(),
        dir: 0.0,
        payload: EntityPayload::for_kind(kind),
    });
    id
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot smoke
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_smoke() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(weather::WeatherPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(behavior::BehaviorPlugin)
        .add_plugins(combat::CombatPlugin)
        .add_plugins(crafting::CraftingPlugin)
        .add_plugins(survival::SurvivalPlugin)
        .add_plugins(achievements::AchievementsPlugin);

    tick(&mut app, 120);

    assert_eq!(
        current_state(&app),
        GameState::Playing,
        "State should remain Playing after smoke ticks"
    );
    assert_eq!(
        app.world().resource::<WorldClock>().time,
        120,
        "Clock should advance one tick per update"
    );
    assert!(
        !app.world().resource::<WorldEntities>().entities.is_empty(),
        "Chunk streaming should have populated the world around the player"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Gathering: axe vs tree
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_axe_fells_tree_in_four_swings_and_breaks() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(combat::CombatPlugin);

    push_entity(&mut app, EntityKind::Tree, 100.0, 0.0, 100.0);
    app.world_mut()
        .resource_mut::<ToolSet>()
        .grant(ToolKind::Axe, 8);

    // 25 damage per swing, 2 durability per swing: four swings fell it
    // and spend the axe exactly.
    for _ in 0..4 {
        set_interact(&mut app, 100.0, 0.0);
        app.update();
    }

    let entities = app.world().resource::<WorldEntities>();
    assert_eq!(entities.count_of(EntityKind::Tree), 0, "Tree should fall");

    let inventory = app.world().resource::<Inventory>();
    assert_eq!(inventory.count(ItemKind::Wood), 3);
    assert_eq!(inventory.count(ItemKind::Pinecone), 1);

    let tools = app.world().resource::<ToolSet>();
    assert!(
        !tools.has(ToolKind::Axe),
        "Axe should break on the felling swing"
    );

    let stats = app.world().resource::<PlayStats>();
    assert_eq!(stats.wood_collected, 3);
}

#[test]
fn test_tree_ignores_bare_hands() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(combat::CombatPlugin);

    let id = push_entity(&mut app, EntityKind::Tree, 100.0, 0.0, 100.0);

    set_interact(&mut app, 100.0, 0.0);
    app.update();

    let entities = app.world().resource::<WorldEntities>();
    let tree = entities.get(id).unwrap();
    assert_eq!(tree.life, 100.0, "No axe, no damage");
}

#[test]
fn test_felled_tree_frees_its_footprint() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(combat::CombatPlugin);

    // Placement puts a 2x2 tree rooted at cell (0,0) with its center at
    // (50,50); mirror that here.
    push_entity(&mut app, EntityKind::Tree, 50.0, 50.0, 100.0);
    app.world_mut()
        .resource_mut::<WorldGrid>()
        .occupy_area(0, 0, 2, 2);
    app.world_mut()
        .resource_mut::<ToolSet>()
        .grant(ToolKind::Axe, 100);

    for _ in 0..4 {
        set_interact(&mut app, 50.0, 50.0);
        app.update();
    }

    let grid = app.world().resource::<WorldGrid>();
    assert!(
        !grid.is_area_occupied(0, 0, 2, 2),
        "Felling should release every cell of the footprint"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Survival: darkness exposure
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_darkness_exposure_penalty_and_reset() {
    let mut app = build_test_app();
    app.add_plugins(survival::SurvivalPlugin);

    // Freeze the clock mid-night; no light anywhere.
    app.world_mut().resource_mut::<WorldClock>().time = (DAY_LENGTH as f32 * 0.7) as u32;

    tick(&mut app, DARKNESS_LIMIT);
    {
        let player = app.world().resource::<PlayerState>();
        assert_eq!(player.dark_ticks, DARKNESS_LIMIT);
        assert_eq!(player.health, MAX_STAT, "No penalty until the limit passes");
    }

    tick(&mut app, 1);
    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.health, MAX_STAT - DARKNESS_DAMAGE);
    assert_eq!(player.dark_ticks, 0, "Counter resets after the penalty");
}

#[test]
fn test_campfire_light_shields_from_darkness() {
    let mut app = build_test_app();
    app.add_plugins(survival::SurvivalPlugin);

    app.world_mut().resource_mut::<WorldClock>().time = (DAY_LENGTH as f32 * 0.7) as u32;
    push_entity(&mut app, EntityKind::Campfire, 30.0, 0.0, 100.0);

    tick(&mut app, DARKNESS_LIMIT + 10);

    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.dark_ticks, 0, "Lit ground never accumulates exposure");
    assert_eq!(player.health, MAX_STAT);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock: the day-three rule
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_day_three_without_a_base_loses_the_run() {
    let mut app = build_test_app();
    app.add_plugins(clock::ClockPlugin);

    *app.world_mut().resource_mut::<WorldClock>() = WorldClock {
        time: DAY_LENGTH - 1,
        day: 2,
    };

    tick(&mut app, 2); // rollover, then apply the state transition

    assert_eq!(
        *app.world().resource::<RunOutcome>(),
        RunOutcome::Lost { day: 3 },
        "A homeless day three is Lost, not Dead"
    );
    assert_eq!(current_state(&app), GameState::GameOver);
}

#[test]
fn test_day_three_with_a_base_continues() {
    let mut app = build_test_app();
    app.add_plugins(clock::ClockPlugin);

    *app.world_mut().resource_mut::<WorldClock>() = WorldClock {
        time: DAY_LENGTH - 1,
        day: 2,
    };
    app.world_mut().resource_mut::<PlayerState>().base_established = true;

    tick(&mut app, 2);

    assert_eq!(*app.world().resource::<RunOutcome>(), RunOutcome::Alive);
    assert_eq!(current_state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<PlayStats>().days_survived, 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Blood moon
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_blood_moon_spawns_exactly_one_boss() {
    let mut app = build_test_app();
    app.add_plugins(world::WorldPlugin);

    // Fifth night, clock frozen (no ClockPlugin).
    *app.world_mut().resource_mut::<WorldClock>() = WorldClock {
        time: (DAY_LENGTH as f32 * 0.7) as u32,
        day: 5,
    };

    tick(&mut app, 10);

    assert_eq!(
        *app.world().resource::<BloodMoon>(),
        BloodMoon::Risen { day: 5 }
    );
    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::BossWolf),
        1,
        "One boss per blood moon, no matter how long the night runs"
    );

    // Dawn sets the moon.
    app.world_mut().resource_mut::<WorldClock>().time = 100;
    tick(&mut app, 1);
    assert_eq!(*app.world().resource::<BloodMoon>(), BloodMoon::Waiting);
    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::BossWolf),
        1,
        "Setting the moon does not respawn or duplicate the boss"
    );
}

#[test]
fn test_stale_blood_moon_yields_to_the_current_night() {
    let mut app = build_test_app();
    app.add_plugins(world::WorldPlugin);

    // A risen flag left over from a different day reads as stale: it
    // sets, and the current fifth night rises with its own boss.
    *app.world_mut().resource_mut::<WorldClock>() = WorldClock {
        time: (DAY_LENGTH as f32 * 0.7) as u32,
        day: 10,
    };
    *app.world_mut().resource_mut::<BloodMoon>() = BloodMoon::Risen { day: 5 };

    tick(&mut app, 3);

    assert_eq!(
        *app.world().resource::<BloodMoon>(),
        BloodMoon::Risen { day: 10 }
    );
    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::BossWolf),
        1
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Saplings: growing into a tree
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_grown_tree_keeps_its_full_footprint() {
    let mut app = build_test_app();
    app.add_plugins(behavior::BehaviorPlugin);

    // A ripe sapling in cell (0,0); the grown tree roots in the same
    // cell and claims the full 2x2.
    let id = push_entity(&mut app, EntityKind::Sapling, 25.0, 25.0, 100.0);
    {
        let mut entities = app.world_mut().resource_mut::<WorldEntities>();
        entities.get_mut(id).unwrap().payload = EntityPayload::Sapling {
            growth: SAPLING_GROWTH_TICKS,
        };
    }
    app.world_mut()
        .resource_mut::<WorldGrid>()
        .occupy_area(0, 0, 1, 1);

    tick(&mut app, 1);

    let entities = app.world().resource::<WorldEntities>();
    assert_eq!(entities.count_of(EntityKind::Sapling), 0);
    assert_eq!(entities.count_of(EntityKind::Tree), 1);

    let grid = app.world().resource::<WorldGrid>();
    for (gx, gy) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert!(
            grid.is_area_occupied(gx, gy, 1, 1),
            "Cell ({}, {}) should belong to the grown tree",
            gx,
            gy
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Crafting: transactional recipes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_crafting_without_materials_is_a_no_op() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    app.world_mut().send_event(CraftRequestEvent {
        recipe: RecipeKind::Axe,
    });
    app.update();

    assert!(!app.world().resource::<ToolSet>().has(ToolKind::Axe));
}

#[test]
fn test_crafting_an_axe_consumes_materials() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    {
        let mut inventory = app.world_mut().resource_mut::<Inventory>();
        inventory.add(ItemKind::Twig, 2);
        inventory.add(ItemKind::Flint, 2);
    }
    app.world_mut().send_event(CraftRequestEvent {
        recipe: RecipeKind::Axe,
    });
    app.update();

    let tools = app.world().resource::<ToolSet>();
    assert_eq!(tools.durability(ToolKind::Axe), 30);

    let inventory = app.world().resource::<Inventory>();
    assert_eq!(inventory.count(ItemKind::Twig), 0);
    assert_eq!(inventory.count(ItemKind::Flint), 0);
}

#[test]
fn test_blocked_build_site_keeps_the_materials() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    // Player faces +x from the origin; the build site lands in cell (1,0).
    app.world_mut()
        .resource_mut::<WorldGrid>()
        .occupy_area(1, 0, 1, 1);
    {
        let mut inventory = app.world_mut().resource_mut::<Inventory>();
        inventory.add(ItemKind::Wood, 3);
        inventory.add(ItemKind::Stone, 2);
    }
    app.world_mut().send_event(CraftRequestEvent {
        recipe: RecipeKind::Campfire,
    });
    app.update();

    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::Campfire),
        0
    );
    let inventory = app.world().resource::<Inventory>();
    assert_eq!(
        inventory.count(ItemKind::Wood),
        3,
        "Failed placement must not spend anything"
    );
}

#[test]
fn test_campfire_build_then_weatherproof() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    {
        let mut inventory = app.world_mut().resource_mut::<Inventory>();
        inventory.add(ItemKind::Wood, 3);
        inventory.add(ItemKind::Stone, 4);
    }
    app.world_mut().send_event(CraftRequestEvent {
        recipe: RecipeKind::Campfire,
    });
    app.update();

    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::Campfire),
        1
    );
    assert_eq!(app.world().resource::<PlayStats>().campfires_built, 1);

    app.world_mut().send_event(ProtectRequestEvent);
    app.update();

    let entities = app.world().resource::<WorldEntities>();
    let fire = entities
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Campfire)
        .unwrap();
    assert_eq!(
        fire.payload,
        EntityPayload::Campfire {
            protection: CampfireProtection::Protected {
                ticks: CAMPFIRE_PROTECT_TICKS
            }
        }
    );
    assert_eq!(app.world().resource::<Inventory>().count(ItemKind::Stone), 0);
}

#[test]
fn test_bed_establishes_the_base() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    {
        let mut inventory = app.world_mut().resource_mut::<Inventory>();
        inventory.add(ItemKind::Wood, 6);
        inventory.add(ItemKind::Grass, 8);
    }
    app.world_mut().send_event(CraftRequestEvent {
        recipe: RecipeKind::Bed,
    });
    app.update();

    let player = app.world().resource::<PlayerState>();
    assert!(player.base_established, "First bed marks home");
    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::Bed),
        1
    );
}

#[test]
fn test_eating_meat_restores_stats() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    {
        let mut player = app.world_mut().resource_mut::<PlayerState>();
        player.hunger = 40.0;
        player.health = 50.0;
    }
    app.world_mut()
        .resource_mut::<Inventory>()
        .add(ItemKind::Meat, 1);
    app.world_mut().send_event(EatRequestEvent {
        item: ItemKind::Meat,
    });
    app.update();

    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.hunger, 65.0);
    assert_eq!(player.health, 55.0);
    assert_eq!(player.sanity, MAX_STAT, "Sanity clamps at the cap");
    assert_eq!(app.world().resource::<Inventory>().count(ItemKind::Meat), 0);
}

#[test]
fn test_planting_a_pinecone() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(crafting::CraftingPlugin);

    app.world_mut()
        .resource_mut::<Inventory>()
        .add(ItemKind::Pinecone, 1);
    app.world_mut().send_event(PlantRequestEvent);
    app.update();

    assert_eq!(
        app.world().resource::<WorldEntities>().count_of(EntityKind::Sapling),
        1
    );
    assert_eq!(app.world().resource::<PlayStats>().trees_planted, 1);
    assert_eq!(
        app.world().resource::<Inventory>().count(ItemKind::Pinecone),
        0
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Achievements: unlock once, pause on popup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_achievement_unlocks_once_and_pauses_the_clock() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(achievements::AchievementsPlugin);

    app.world_mut().resource_mut::<PlayStats>().days_survived = 3;

    // Tick 1 unlocks and queues the popup; tick 2 applies the pause.
    tick(&mut app, 2);
    assert_eq!(current_state(&app), GameState::Paused);
    let frozen_time = app.world().resource::<WorldClock>().time;

    tick(&mut app, 5);
    assert_eq!(
        app.world().resource::<WorldClock>().time,
        frozen_time,
        "The clock must not advance while a popup is up"
    );

    // Confirm dismisses the popup and resumes play.
    app.world_mut().resource_mut::<PlayerInput>().confirm = true;
    tick(&mut app, 2);
    assert_eq!(current_state(&app), GameState::Playing);
    assert!(app.world().resource::<AchievementPopups>().queue.is_empty());

    // More ticks never re-unlock the same achievement.
    tick(&mut app, 10);
    let unlocked = &app.world().resource::<Achievements>().unlocked;
    assert_eq!(
        unlocked.iter().filter(|id| *id == "survivor_3").count(),
        1,
        "survivor_3 must unlock exactly once"
    );
    assert_eq!(current_state(&app), GameState::Playing);
}

// ─────────────────────────────────────────────────────────────────────────────
// Ranged combat: the thrown spear
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_thrown_spear_downs_a_nightling() {
    let mut app = build_test_app();
    app.add_plugins(input::InputPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(behavior::BehaviorPlugin)
        .add_plugins(combat::CombatPlugin);

    // Night, so the nightling holds its ground instead of dissolving.
    app.world_mut().resource_mut::<WorldClock>().time = (DAY_LENGTH as f32 * 0.7) as u32;
    push_entity(&mut app, EntityKind::Nightling, 120.0, 0.0, 30.0);
    app.world_mut()
        .resource_mut::<ToolSet>()
        .grant(ToolKind::Spear, 10);

    app.world_mut().resource_mut::<PlayerInput>().shoot_at = Some((120.0, 0.0));
    tick(&mut app, 15); // flight time plus settling

    let entities = app.world().resource::<WorldEntities>();
    assert_eq!(entities.count_of(EntityKind::Nightling), 0);
    assert_eq!(entities.count_of(EntityKind::Arrow), 0, "Projectile spent");

    let stats = app.world().resource::<PlayStats>();
    assert_eq!(stats.kills, 1);
    assert_eq!(stats.nightlings_slain, 1);

    assert_eq!(app.world().resource::<Inventory>().count(ItemKind::Meat), 1);
    let player = app.world().resource::<PlayerState>();
    assert_eq!(player.sanity, MAX_STAT - 2.0, "A ranged kill costs a little");

    let tools = app.world().resource::<ToolSet>();
    assert_eq!(
        tools.durability(ToolKind::Spear),
        9,
        "One durability per throw"
    );
}

#[test]
fn test_overlapping_arrows_credit_a_single_kill() {
    let mut app = build_test_app();
    app.add_plugins(behavior::BehaviorPlugin)
        .add_plugins(combat::CombatPlugin);

    app.world_mut().resource_mut::<WorldClock>().time = (DAY_LENGTH as f32 * 0.7) as u32;
    push_entity(&mut app, EntityKind::Nightling, 120.0, 0.0, 30.0);

    // Two spears in the air at once; both connect the same tick, but
    // only the one that drops the nightling counts.
    for _ in 0..2 {
        let id = push_entity(&mut app, EntityKind::Arrow, 110.0, 0.0, 1.0);
        let mut entities = app.world_mut().resource_mut::<WorldEntities>();
        entities.get_mut(id).unwrap().payload = EntityPayload::Arrow {
            vx: ARROW_SPEED,
            vy: 0.0,
            ttl: ARROW_TTL,
            damage: 30.0,
            source: ArrowSource::Player,
        };
    }

    tick(&mut app, 2);

    let entities = app.world().resource::<WorldEntities>();
    assert_eq!(entities.count_of(EntityKind::Nightling), 0);
    assert_eq!(entities.count_of(EntityKind::Arrow), 0, "Both spears spent");

    let stats = app.world().resource::<PlayStats>();
    assert_eq!(stats.kills, 1, "One nightling, one kill");
    assert_eq!(stats.nightlings_slain, 1);
    assert_eq!(app.world().resource::<Inventory>().count(ItemKind::Meat), 1);
    assert_eq!(
        app.world().resource::<PlayerState>().sanity,
        MAX_STAT - 2.0,
        "The kill toll is charged once"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Run lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_new_run_resets_the_world() {
    let mut app = build_test_app();
    app.add_plugins(save::SavePlugin);

    {
        let mut clock = app.world_mut().resource_mut::<WorldClock>();
        clock.day = 7;
        clock.time = 500;
    }
    app.world_mut()
        .resource_mut::<Inventory>()
        .add(ItemKind::Wood, 25);
    push_entity(&mut app, EntityKind::Wolf, 300.0, 0.0, 180.0);
    app.world_mut()
        .resource_mut::<Achievements>()
        .unlocked
        .push("survivor_3".to_string());

    app.world_mut().send_event(NewRunEvent);
    app.update();

    assert_eq!(app.world().resource::<WorldClock>().day, 1);
    assert_eq!(app.world().resource::<Inventory>().count(ItemKind::Wood), 0);
    assert!(app.world().resource::<WorldEntities>().entities.is_empty());
    assert!(app.world().resource::<Achievements>().unlocked.is_empty());
    assert_eq!(*app.world().resource::<RunOutcome>(), RunOutcome::Alive);
}

#[test]
fn test_new_run_restarts_from_the_end_screen() {
    let mut app = build_test_app();
    app.add_plugins(save::SavePlugin);

    *app.world_mut().resource_mut::<RunOutcome>() = RunOutcome::Dead { day: 4 };
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::GameOver);
    app.update();
    assert_eq!(current_state(&app), GameState::GameOver);

    app.world_mut().send_event(NewRunEvent);
    tick(&mut app, 2); // process the request, then apply the transition

    assert_eq!(current_state(&app), GameState::Playing);
    assert_eq!(*app.world().resource::<RunOutcome>(), RunOutcome::Alive);
    assert_eq!(app.world().resource::<WorldClock>().day, 1);
}
