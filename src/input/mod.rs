//! Input boundary.
//!
//! Emberwild never touches the keyboard or pointer. The embedding layer
//! decodes raw input into the `PlayerInput` resource before each tick;
//! this plugin only guarantees that one-shot actions are consumed so a
//! single press never fires twice.

use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(Update, clear_player_input.in_set(SimSet::Flush));
    }
}

/// Runs unconditionally, after every consumer in any state.
fn clear_player_input(mut input: ResMut<PlayerInput>) {
    input.clear_actions();
}
