mod shared;
mod input;
mod clock;
mod weather;
mod world;
mod player;
mod behavior;
mod combat;
mod crafting;
mod survival;
mod achievements;
mod save;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shared::*;
use world::WorldRng;

/// Simulation rate. The external renderer interpolates between snapshots.
const TICK_RATE: f64 = 60.0;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICK_RATE,
            ))),
        )
        .add_plugins(bevy::log::LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<WorldClock>()
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
        .init_resource::<AchievementPopups>()
        .init_resource::<WorldRng>()
        // Events
        .add_event::<DayEndEvent>()
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
        .add_event::<NewRunEvent>()
        // One fixed pass per tick
        .configure_sets(
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
        )
        // Domain plugins
        .add_plugins(clock::ClockPlugin)
        .add_plugins(weather::WeatherPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(behavior::BehaviorPlugin)
        .add_plugins(combat::CombatPlugin)
        .add_plugins(crafting::CraftingPlugin)
        .add_plugins(survival::SurvivalPlugin)
        .add_plugins(achievements::AchievementsPlugin)
        .add_plugins(save::SavePlugin)
        .run();
}
