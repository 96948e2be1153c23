//! Chunk generation and streaming.
//!
//! The world is infinite: 20×20-tile chunks generate on demand as the
//! player approaches and are never torn down. Each chunk is seeded once
//! from a fixed bag of resource nodes plus a rabbit, with a small
//! independent chance of one rarer creature.

use bevy::prelude::*;
use rand::Rng;

use super::WorldRng;
use crate::shared::*;

/// Guaranteed placement attempts per fresh chunk: (kind, count).
pub const CHUNK_SEED_BAG: &[(EntityKind, u32)] = &[
    (EntityKind::Tree, 8),
    (EntityKind::Rock, 5),
    (EntityKind::Bush, 4),
    (EntityKind::GrassTuft, 6),
    (EntityKind::Flint, 3),
    (EntityKind::Stick, 5),
    (EntityKind::Rabbit, 1),
];

/// Rare creatures rolled once per chunk, independently.
pub const CHUNK_RARE_SPAWNS: &[(EntityKind, f64)] = &[
    (EntityKind::Sheep, 0.50),
    (EntityKind::Wolf, 0.40),
    (EntityKind::Spider, 0.35),
];

/// Populate one chunk. Idempotence is the caller's job via `ChunkRegistry`.
pub fn generate_chunk(
    cx: i32,
    cy: i32,
    entities: &mut WorldEntities,
    grid: &mut WorldGrid,
    rng: &mut impl Rng,
) {
    let base_gx = cx * CHUNK_SIZE;
    let base_gy = cy * CHUNK_SIZE;

    for &(kind, count) in CHUNK_SEED_BAG {
        for _ in 0..count {
            // A handful of tries per node; a crowded corner just ends up
            // sparser, which reads as natural variation.
            for _ in 0..8 {
                let gx = base_gx + rng.gen_range(0..CHUNK_SIZE);
                let gy = base_gy + rng.gen_range(0..CHUNK_SIZE);
                let x = gx as f32 * TILE_SIZE + TILE_SIZE / 2.0;
                let y = gy as f32 * TILE_SIZE + TILE_SIZE / 2.0;
                if try_spawn(kind, Some((x, y)), entities, grid, rng, x, y) {
                    break;
                }
            }
        }
    }

    for &(kind, chance) in CHUNK_RARE_SPAWNS {
        if rng.gen_bool(chance) {
            let x = (base_gx + rng.gen_range(0..CHUNK_SIZE)) as f32 * TILE_SIZE;
            let y = (base_gy + rng.gen_range(0..CHUNK_SIZE)) as f32 * TILE_SIZE;
            try_spawn(kind, Some((x, y)), entities, grid, rng, x, y);
        }
    }
}

/// Generate every ungenerated chunk within the load radius of the player.
pub fn stream_chunks(
    player: Res<PlayerState>,
    mut registry: ResMut<ChunkRegistry>,
    mut entities: ResMut<WorldEntities>,
    mut grid: ResMut<WorldGrid>,
    mut world_rng: ResMut<WorldRng>,
) {
    let (pcx, pcy) = world_to_chunk(player.x, player.y);
    for dx in -CHUNK_LOAD_RADIUS..=CHUNK_LOAD_RADIUS {
        for dy in -CHUNK_LOAD_RADIUS..=CHUNK_LOAD_RADIUS {
            let key = (pcx + dx, pcy + dy);
            if registry.generated.insert(key) {
                generate_chunk(key.0, key.1, &mut entities, &mut grid, &mut world_rng.rng);
                info!("[World] Generated chunk ({}, {})", key.0, key.1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn chunk_seeds_expected_node_mix() {
        let mut entities = WorldEntities::default();
        let mut grid = WorldGrid::default();
        let mut rng = StdRng::seed_from_u64(42);

        generate_chunk(0, 0, &mut entities, &mut grid, &mut rng);

        // Crowding can drop a node or two, never add extras.
        assert!(entities.count_of(EntityKind::Tree) <= 8);
        assert!(entities.count_of(EntityKind::Tree) >= 4);
        assert!(entities.count_of(EntityKind::Rock) <= 5);
        assert_eq!(entities.count_of(EntityKind::Rabbit), 1);
        assert!(!grid.occupied.is_empty());
    }

    #[test]
    fn same_seed_generates_identical_chunks() {
        let mut a = (WorldEntities::default(), WorldGrid::default());
        let mut b = (WorldEntities::default(), WorldGrid::default());
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);

        generate_chunk(3, -2, &mut a.0, &mut a.1, &mut rng_a);
        generate_chunk(3, -2, &mut b.0, &mut b.1, &mut rng_b);

        assert_eq!(a.0.entities, b.0.entities);
        assert_eq!(a.1.occupied, b.1.occupied);
    }

    #[test]
    fn generated_nodes_stay_inside_chunk_bounds() {
        let mut entities = WorldEntities::default();
        let mut grid = WorldGrid::default();
        let mut rng = StdRng::seed_from_u64(5);

        generate_chunk(2, 2, &mut entities, &mut grid, &mut rng);

        let lo = 2.0 * CHUNK_SIZE as f32 * TILE_SIZE;
        let hi = 3.0 * CHUNK_SIZE as f32 * TILE_SIZE;
        for e in &entities.entities {
            // Footprint centers can poke half a tile past a cell corner,
            // never past the chunk edge plus a footprint.
            assert!(e.x >= lo && e.x <= hi + 2.0 * TILE_SIZE, "{:?} at {}", e.kind, e.x);
            assert!(e.y >= lo && e.y <= hi + 2.0 * TILE_SIZE, "{:?} at {}", e.kind, e.y);
        }
    }
}
