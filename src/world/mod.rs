//! World generation: chunk streaming and entity spawning.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::shared::*;

pub mod chunks;
pub mod spawner;

/// All world-mutation randomness (chunk seeding, placement searches,
/// night spawns) flows through this one seedable generator so that
/// placement is reproducible under a fixed seed.
#[derive(Resource)]
pub struct WorldRng {
    pub rng: StdRng,
}

impl Default for WorldRng {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl WorldRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldRng>().add_systems(
            Update,
            (
                chunks::stream_chunks,
                spawner::blood_moon_director,
                spawner::night_spawns,
                spawner::daily_respawn,
            )
                .chain()
                .in_set(SimSet::World)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
