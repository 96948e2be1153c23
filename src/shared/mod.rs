//! Shared components, resources, events, and states for Emberwild.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// Fixed ordering of the per-tick simulation pass. Configured once at app
/// build; every domain plugin slots its systems into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum SimSet {
    Clock,
    Weather,
    World,
    Player,
    Behavior,
    Resolve,
    Survival,
    Meta,
    /// End-of-tick cleanup. Unlike the rest, never gated on game state.
    Flush,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK & CYCLE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    Day,
    Dusk,
    Night,
}

impl Cycle {
    /// Derive the cycle from the fraction of the day elapsed.
    pub fn from_fraction(frac: f32) -> Self {
        if frac < 0.5 {
            Cycle::Day
        } else if frac < 0.65 {
            Cycle::Dusk
        } else {
            Cycle::Night
        }
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WorldClock {
    /// Tick within the current day, 0..DAY_LENGTH.
    pub time: u32,
    /// Day number, starting at 1.
    pub day: u32,
}

impl Default for WorldClock {
    fn default() -> Self {
        Self { time: 0, day: 1 }
    }
}

impl WorldClock {
    pub fn fraction(&self) -> f32 {
        self.time as f32 / DAY_LENGTH as f32
    }

    pub fn cycle(&self) -> Cycle {
        Cycle::from_fraction(self.fraction())
    }

    pub fn is_night(&self) -> bool {
        self.cycle() == Cycle::Night
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherKind {
    #[default]
    Clear,
    Rain,
    Fog,
    Snow,
    Thunderstorm,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    /// Ticks until the next weather roll.
    pub remaining: u32,
    /// 0.0..=1.0, rolled together with the kind.
    pub intensity: f32,
    /// Ambient particle population the renderer should maintain. Data only.
    pub particle_seeds: u32,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            kind: WeatherKind::Clear,
            remaining: 0,
            intensity: 0.0,
            particle_seeds: 0,
        }
    }
}

impl WeatherState {
    /// Movement speed multiplier applied to the player and creatures.
    pub fn movement_multiplier(&self) -> f32 {
        let i = self.intensity;
        match self.kind {
            WeatherKind::Clear => 1.0,
            WeatherKind::Rain => 0.85 - 0.1 * i,
            WeatherKind::Fog => 0.80 - 0.1 * i,
            WeatherKind::Snow => 0.65 - 0.1 * i,
            WeatherKind::Thunderstorm => 0.70 - 0.1 * i,
        }
    }

    /// Campfire fuel decay multiplier. Protection suppresses the rain and
    /// storm acceleration but not the base burn.
    pub fn campfire_decay_multiplier(&self, protected: bool) -> f32 {
        match self.kind {
            WeatherKind::Rain if !protected => 2.0 + self.intensity,
            WeatherKind::Thunderstorm if !protected => 2.5 + 1.5 * self.intensity,
            WeatherKind::Snow => 0.8,
            _ => 1.0,
        }
    }

    /// Per-tick sanity drain from active weather.
    pub fn sanity_drain(&self) -> f32 {
        let i = self.intensity;
        match self.kind {
            WeatherKind::Rain => 0.04 + 0.02 * i,
            WeatherKind::Fog => 0.03 + 0.02 * i,
            WeatherKind::Thunderstorm => 0.06 + 0.04 * i,
            _ => 0.0,
        }
    }
}

/// Blood moon rises on the first night tick of every fifth day and sets
/// with the night. The stored day guards against a second boss spawn
/// within the same event.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum BloodMoon {
    #[default]
    Waiting,
    Risen { day: u32 },
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS & TOOLS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Wood,
    Stone,
    Gold,
    Twig,
    Flint,
    Pinecone,
    Grass,
    Berry,
    Meat,
    BigMeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Axe,
    Pickaxe,
    Spear,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: HashMap<ItemKind, u32>,
}

impl Inventory {
    pub fn add(&mut self, kind: ItemKind, quantity: u32) {
        *self.items.entry(kind).or_insert(0) += quantity;
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: ItemKind, quantity: u32) -> bool {
        self.count(kind) >= quantity
    }

    /// All-or-nothing removal. Returns false (and removes nothing) when
    /// the inventory holds fewer than `quantity`.
    pub fn try_remove(&mut self, kind: ItemKind, quantity: u32) -> bool {
        let Some(held) = self.items.get_mut(&kind) else {
            return quantity == 0;
        };
        if *held < quantity {
            return false;
        }
        *held -= quantity;
        if *held == 0 {
            self.items.remove(&kind);
        }
        true
    }
}

/// Owned tools with remaining durability. Presence implies usable:
/// a tool that reaches zero durability is removed in the same operation.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSet {
    pub tools: HashMap<ToolKind, u32>,
}

impl ToolSet {
    pub fn has(&self, kind: ToolKind) -> bool {
        self.tools.contains_key(&kind)
    }

    pub fn durability(&self, kind: ToolKind) -> u32 {
        self.tools.get(&kind).copied().unwrap_or(0)
    }

    pub fn grant(&mut self, kind: ToolKind, durability: u32) {
        self.tools.insert(kind, durability);
    }

    /// Spend durability on a tool. Returns true if the tool broke and was
    /// unequipped by this use.
    pub fn consume(&mut self, kind: ToolKind, amount: u32) -> bool {
        let Some(dur) = self.tools.get_mut(&kind) else {
            return false;
        };
        *dur = dur.saturating_sub(amount);
        if *dur == 0 {
            self.tools.remove(&kind);
            return true;
        }
        false
    }

    /// Best usable weapon in fixed priority: spear, axe, pickaxe.
    pub fn best_weapon(&self) -> Option<ToolKind> {
        [ToolKind::Spear, ToolKind::Axe, ToolKind::Pickaxe]
            .into_iter()
            .find(|k| self.has(*k))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ENTITIES
// ═══════════════════════════════════════════════════════════════════════

pub type EntityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    // Resource nodes
    Tree,
    Rock,
    Bush,
    GrassTuft,
    Flint,
    Stick,
    // Creatures
    Rabbit,
    Sheep,
    Wolf,
    Spider,
    Nightling,
    BossWolf,
    // Structures
    Campfire,
    Tower,
    Bed,
    Beacon,
    Sapling,
    // Projectiles
    Arrow,
}

impl EntityKind {
    /// Grid footprint in tiles, or None for free-moving kinds.
    pub fn footprint(self) -> Option<(i32, i32)> {
        match self {
            EntityKind::Tree | EntityKind::Tower => Some((2, 2)),
            EntityKind::Rock
            | EntityKind::Bush
            | EntityKind::GrassTuft
            | EntityKind::Flint
            | EntityKind::Stick
            | EntityKind::Campfire
            | EntityKind::Bed
            | EntityKind::Beacon
            | EntityKind::Sapling => Some((1, 1)),
            _ => None,
        }
    }

    pub fn initial_life(self) -> f32 {
        match self {
            EntityKind::BossWolf => 1000.0,
            EntityKind::Tower => 350.0,
            EntityKind::Wolf => 180.0,
            EntityKind::Spider => 80.0,
            EntityKind::Nightling => 60.0,
            EntityKind::Rabbit | EntityKind::Sheep => 1.0,
            _ => 100.0,
        }
    }

    pub fn is_creature(self) -> bool {
        matches!(
            self,
            EntityKind::Rabbit
                | EntityKind::Sheep
                | EntityKind::Wolf
                | EntityKind::Spider
                | EntityKind::Nightling
                | EntityKind::BossWolf
        )
    }

    /// Kinds an arrow in flight can wound.
    pub fn is_hostile(self) -> bool {
        matches!(
            self,
            EntityKind::Wolf | EntityKind::Spider | EntityKind::Nightling | EntityKind::BossWolf
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Hostility {
    /// Flees or ignores the player. Rabbits, sheep, undamaged spiders.
    #[default]
    Passive,
    /// Keeps its distance until struck. Wolves.
    Neutral,
    /// Pursues the player. Permanent once entered.
    Provoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CampfireProtection {
    #[default]
    Unprotected,
    Protected { ticks: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowSource {
    Player,
    Tower,
}

/// Kind-specific live state. Matched exhaustively in the behavior pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum EntityPayload {
    #[default]
    Inert,
    Creature {
        vx: f32,
        vy: f32,
        attack_timer: u32,
        hostility: Hostility,
    },
    Campfire {
        protection: CampfireProtection,
    },
    Tower {
        cooldown: u32,
    },
    Arrow {
        vx: f32,
        vy: f32,
        ttl: u32,
        damage: f32,
        source: ArrowSource,
    },
    Sapling {
        growth: u32,
    },
}

impl EntityPayload {
    /// Fresh payload for a newly spawned entity of the given kind.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            k if k.is_creature() => {
                let hostility = match k {
                    EntityKind::Wolf => Hostility::Neutral,
                    EntityKind::Nightling | EntityKind::BossWolf => Hostility::Provoked,
                    _ => Hostility::Passive,
                };
                EntityPayload::Creature {
                    vx: 0.0,
                    vy: 0.0,
                    attack_timer: 0,
                    hostility,
                }
            }
            EntityKind::Campfire => EntityPayload::Campfire {
                protection: CampfireProtection::Unprotected,
            },
            EntityKind::Tower => EntityPayload::Tower { cooldown: 0 },
            EntityKind::Sapling => EntityPayload::Sapling { growth: 0 },
            _ => EntityPayload::Inert,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub life: f32,
    pub max_life: f32,
    /// Facing angle in radians. Render hint only.
    pub dir: f32,
    pub payload: EntityPayload,
}

impl WorldEntity {
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Flip a struck creature to Provoked. Permanent for the instance;
    /// only wolves and spiders carry a grudge.
    pub fn provoke(&mut self) {
        if let EntityPayload::Creature {
            ref mut hostility, ..
        } = self.payload
        {
            if matches!(self.kind, EntityKind::Wolf | EntityKind::Spider) {
                *hostility = Hostility::Provoked;
            }
        }
    }

    /// Light radius for structures that emit light, or None.
    pub fn light_radius(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Campfire => Some(self.life * 2.5),
            EntityKind::Tower => Some(TOWER_LIGHT_RADIUS),
            EntityKind::Beacon => Some(BEACON_LIGHT_RADIUS),
            _ => None,
        }
    }
}

/// Every live entity, structure and projectile in the world.
///
/// Behavior systems iterate this by index, push new entries at the tail,
/// and collect removals to apply after the pass — a single scan never
/// skips or double-processes an entry.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldEntities {
    pub entities: Vec<WorldEntity>,
    pub next_id: EntityId,
}

impl WorldEntities {
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut WorldEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn remove_ids(&mut self, ids: &[EntityId]) {
        if !ids.is_empty() {
            self.entities.retain(|e| !ids.contains(&e.id));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD GRID & CHUNKS
// ═══════════════════════════════════════════════════════════════════════

pub fn world_to_grid(x: f32, y: f32) -> (i32, i32) {
    (
        (x / TILE_SIZE).floor() as i32,
        (y / TILE_SIZE).floor() as i32,
    )
}

pub fn world_to_chunk(x: f32, y: f32) -> (i32, i32) {
    let (gx, gy) = world_to_grid(x, y);
    (gx.div_euclid(CHUNK_SIZE), gy.div_euclid(CHUNK_SIZE))
}

/// Occupied-cell set for everything grid-bound. Multi-tile footprints
/// claim every cell at spawn and release every cell at removal.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldGrid {
    pub occupied: HashSet<(i32, i32)>,
}

impl WorldGrid {
    pub fn is_area_occupied(&self, gx: i32, gy: i32, w: i32, h: i32) -> bool {
        for dx in 0..w {
            for dy in 0..h {
                if self.occupied.contains(&(gx + dx, gy + dy)) {
                    return true;
                }
            }
        }
        false
    }

    pub fn occupy_area(&mut self, gx: i32, gy: i32, w: i32, h: i32) {
        for dx in 0..w {
            for dy in 0..h {
                self.occupied.insert((gx + dx, gy + dy));
            }
        }
    }

    pub fn free_area(&mut self, gx: i32, gy: i32, w: i32, h: i32) {
        for dx in 0..w {
            for dy in 0..h {
                self.occupied.remove(&(gx + dx, gy + dy));
            }
        }
    }
}

/// Chunks that have already been generated. A chunk generates at most
/// once and never unloads.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkRegistry {
    pub generated: HashSet<(i32, i32)>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum DashState {
    #[default]
    Ready,
    /// Linear interpolation between two points over DASH_TICKS ticks.
    /// Progress persists across save/load; a dash is never aborted.
    Dashing {
        progress: u32,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
    },
    Cooling { ticks: u32 },
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians.
    pub dir: f32,
    pub health: f32,
    pub hunger: f32,
    pub sanity: f32,
    /// Remaining armor durability, if any is worn.
    pub armor: Option<u32>,
    pub dash: DashState,
    /// Spider venom: extra sanity drain while > 0.
    pub poison_ticks: u32,
    /// Uninterrupted ticks spent in unlit darkness.
    pub dark_ticks: u32,
    /// Set when the first bed or beacon is placed. Never cleared.
    pub base_established: bool,
    /// Whether the player covered ground this tick. Drives hunger drain.
    pub moved_this_tick: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dir: 0.0,
            health: MAX_STAT,
            hunger: MAX_STAT,
            sanity: MAX_STAT,
            armor: None,
            dash: DashState::Ready,
            poison_ticks: 0,
            dark_ticks: 0,
            base_established: false,
            moved_this_tick: false,
        }
    }
}

impl PlayerState {
    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn clamp_stats(&mut self) {
        self.health = self.health.clamp(0.0, MAX_STAT);
        self.hunger = self.hunger.clamp(0.0, MAX_STAT);
        self.sanity = self.sanity.clamp(0.0, MAX_STAT);
    }

    /// Low sanity scales damage dealt and gather yield down to a floor.
    pub fn sanity_efficiency(&self) -> f32 {
        if self.sanity >= SANITY_THRESHOLD {
            1.0
        } else {
            0.4 + 0.6 * self.sanity / SANITY_THRESHOLD
        }
    }
}

/// How the current run ended, if it has.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunOutcome {
    #[default]
    Alive,
    /// Health reached zero.
    Dead { day: u32 },
    /// Reached day three without ever establishing a base.
    Lost { day: u32 },
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT — written by the external decoder each tick
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Normalized movement intent, zero when idle.
    pub move_x: f32,
    pub move_y: f32,
    /// World point of a primary interaction (strike / gather / refuel).
    pub interact_at: Option<(f32, f32)>,
    /// World point of an aimed spear throw.
    pub shoot_at: Option<(f32, f32)>,
    pub dash: bool,
    /// Dismisses the frontmost achievement popup.
    pub confirm: bool,
}

impl PlayerInput {
    /// One-shot flags are consumed at the end of every tick.
    pub fn clear_actions(&mut self) {
        self.interact_at = None;
        self.shoot_at = None;
        self.dash = false;
        self.confirm = false;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CRAFTING
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeKind {
    Axe,
    Pickaxe,
    Spear,
    Armor,
    Campfire,
    Tower,
    Bed,
    Beacon,
}

// ═══════════════════════════════════════════════════════════════════════
// STATS & ACHIEVEMENTS
// ═══════════════════════════════════════════════════════════════════════

/// Monotonic run counters feeding the achievement conditions.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayStats {
    pub days_survived: u32,
    pub best_days: u32,
    pub wood_collected: u32,
    pub stone_collected: u32,
    pub gold_collected: u32,
    pub meat_collected: u32,
    pub kills: u32,
    pub nightlings_slain: u32,
    pub bosses_slain: u32,
    pub campfires_built: u32,
    pub towers_built: u32,
    pub trees_planted: u32,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Achievements {
    /// Ids unlocked this profile. Each id appears at most once, forever.
    pub unlocked: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AchievementPopup {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Pending unlock popups. A non-empty queue pauses the simulation;
/// popups are dismissed one at a time with the confirm action.
#[derive(Resource, Debug, Clone, Default)]
pub struct AchievementPopups {
    pub queue: Vec<AchievementPopup>,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub new_day: u32,
}

/// User-facing feedback line the HUD may display.
#[derive(Event, Debug, Clone)]
pub struct NoticeEvent {
    pub message: String,
}

#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item: ItemKind,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillSource {
    BareHands,
    MeleeTool(ToolKind),
    PlayerArrow,
    TowerArrow,
}

#[derive(Event, Debug, Clone)]
pub struct EntityKilledEvent {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub source: KillSource,
}

#[derive(Event, Debug, Clone)]
pub struct CraftRequestEvent {
    pub recipe: RecipeKind,
}

#[derive(Event, Debug, Clone)]
pub struct EatRequestEvent {
    pub item: ItemKind,
}

/// Plant a pinecone at the player's feet.
#[derive(Event, Debug, Clone)]
pub struct PlantRequestEvent;

/// Weatherproof the nearest campfire in reach.
#[derive(Event, Debug, Clone)]
pub struct ProtectRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct AchievementUnlockedEvent {
    pub achievement_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub success: bool,
    /// False when no (or a malformed) save existed and a fresh world was
    /// generated instead.
    pub restored: bool,
}

/// Reset every resource to defaults and generate a fresh world.
#[derive(Event, Debug, Clone)]
pub struct NewRunEvent;

// ═══════════════════════════════════════════════════════════════════════
// SAVE DATA
// ═══════════════════════════════════════════════════════════════════════

/// Single-slot snapshot. Every field defaults so an older save merges
/// field-by-field over a fresh state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub clock: WorldClock,
    #[serde(default)]
    pub weather: WeatherState,
    #[serde(default)]
    pub blood_moon: BloodMoon,
    #[serde(default)]
    pub player: PlayerState,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub tools: ToolSet,
    #[serde(default)]
    pub entities: WorldEntities,
    #[serde(default)]
    pub grid: WorldGrid,
    #[serde(default)]
    pub chunks: ChunkRegistry,
    #[serde(default)]
    pub stats: PlayStats,
    #[serde(default)]
    pub achievements: Achievements,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWNING — shared so world generation and building use one code path
// ═══════════════════════════════════════════════════════════════════════

/// Spawn an entity, transactionally.
///
/// Grid-bound kinds snap an explicit position to its footprint and fail
/// without mutating anything when any cell is taken. With no position, a
/// bounded random search runs near `(px, py)`; saturation is a silent
/// failure rather than an unbounded retry loop.
pub fn try_spawn<R: rand::Rng>(
    kind: EntityKind,
    position: Option<(f32, f32)>,
    entities: &mut WorldEntities,
    grid: &mut WorldGrid,
    rng: &mut R,
    px: f32,
    py: f32,
) -> bool {
    match kind.footprint() {
        Some((w, h)) => {
            let cell = match position {
                Some((x, y)) => {
                    let (gx, gy) = world_to_grid(x, y);
                    if grid.is_area_occupied(gx, gy, w, h) {
                        return false;
                    }
                    Some((gx, gy))
                }
                None => {
                    let (pcx, pcy) = world_to_chunk(px, py);
                    let span = CHUNK_SIZE * (2 * PLACEMENT_CHUNK_RANGE + 1);
                    let base_x = (pcx - PLACEMENT_CHUNK_RANGE) * CHUNK_SIZE;
                    let base_y = (pcy - PLACEMENT_CHUNK_RANGE) * CHUNK_SIZE;
                    let mut found = None;
                    for _ in 0..PLACEMENT_RETRIES {
                        let gx = base_x + rng.gen_range(0..span);
                        let gy = base_y + rng.gen_range(0..span);
                        if !grid.is_area_occupied(gx, gy, w, h) {
                            found = Some((gx, gy));
                            break;
                        }
                    }
                    found
                }
            };
            let Some((gx, gy)) = cell else {
                return false;
            };
            grid.occupy_area(gx, gy, w, h);
            let id = entities.alloc_id();
            entities.entities.push(WorldEntity {
                id,
                kind,
                x: gx as f32 * TILE_SIZE + w as f32 * TILE_SIZE / 2.0,
                y: gy as f32 * TILE_SIZE + h as f32 * TILE_SIZE / 2.0,
                life: kind.initial_life(),
                max_life: kind.initial_life(),
                dir: 0.0,
                payload: EntityPayload::for_kind(kind),
            });
            true
        }
        None => {
            let (x, y) = position.unwrap_or_else(|| {
                let range = PLACEMENT_CHUNK_RANGE as f32 * CHUNK_SIZE as f32 * TILE_SIZE;
                (
                    px + rng.gen_range(-range..range),
                    py + rng.gen_range(-range..range),
                )
            });
            let id = entities.alloc_id();
            entities.entities.push(WorldEntity {
                id,
                kind,
                x,
                y,
                life: kind.initial_life(),
                max_life: kind.initial_life(),
                dir: 0.0,
                payload: EntityPayload::for_kind(kind),
            });
            true
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 50.0;
pub const CHUNK_SIZE: i32 = 20;
/// Ticks per in-game day.
pub const DAY_LENGTH: u32 = 7200;
/// Chebyshev radius of chunks kept generated around the player.
pub const CHUNK_LOAD_RADIUS: i32 = 2;
/// Attempt bound for random grid placement before giving up.
pub const PLACEMENT_RETRIES: u32 = 200;
/// Random placement searches within this many chunks of the player.
pub const PLACEMENT_CHUNK_RANGE: i32 = 3;

pub const MAX_STAT: f32 = 100.0;
pub const SANITY_THRESHOLD: f32 = 30.0;
/// Unlit dark ticks before the darkness strikes.
pub const DARKNESS_LIMIT: u32 = 90;
pub const DARKNESS_DAMAGE: f32 = 10.0;

pub const PLAYER_BASE_SPEED: f32 = 5.0;
pub const DASH_TICKS: u32 = 10;
pub const DASH_DISTANCE: f32 = 180.0;
pub const DASH_COOLDOWN: u32 = 90;
pub const POISON_TICKS: u32 = 300;
/// Beyond this distance from the nearest bed or beacon, sanity drains.
pub const BASE_COMFORT_RADIUS: f32 = 2000.0;

pub const CAMPFIRE_MAX_FUEL: f32 = 100.0;
pub const CAMPFIRE_DECAY: f32 = 0.025;
pub const CAMPFIRE_PROTECT_TICKS: u32 = 3600;
pub const TOWER_LIGHT_RADIUS: f32 = 180.0;
pub const BEACON_LIGHT_RADIUS: f32 = 220.0;

pub const ARROW_SPEED: f32 = 12.0;
pub const ARROW_TTL: u32 = 120;
pub const ARROW_HIT_RADIUS: f32 = 16.0;
pub const SAPLING_GROWTH_TICKS: u32 = 1200;

/// Renderer viewport the camera offset is computed against.
pub const VIEW_WIDTH: f32 = 1280.0;
pub const VIEW_HEIGHT: f32 = 720.0;
