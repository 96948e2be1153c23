//! World clock: tick counter, day/dusk/night cycle, day rollover.
//!
//! One system call is one simulation tick. Day rollover bumps the day
//! counter, fires `DayEndEvent` for the respawn and autosave listeners,
//! and enforces the day-three rule: a run that reaches day 3 without an
//! established base ends in the Lost state.

use bevy::prelude::*;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            advance_clock
                .in_set(SimSet::Clock)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Advance one tick. Returns true when the day rolled over.
pub fn advance_one_tick(clock: &mut WorldClock) -> bool {
    clock.time += 1;
    if clock.time >= DAY_LENGTH {
        clock.time = 0;
        clock.day += 1;
        return true;
    }
    false
}

fn advance_clock(
    mut clock: ResMut<WorldClock>,
    mut stats: ResMut<PlayStats>,
    player: Res<PlayerState>,
    mut outcome: ResMut<RunOutcome>,
    mut next_state: ResMut<NextState<GameState>>,
    mut day_end: EventWriter<DayEndEvent>,
    mut notices: EventWriter<NoticeEvent>,
) {
    if !advance_one_tick(&mut clock) {
        return;
    }

    stats.days_survived = clock.day - 1;
    if stats.days_survived > stats.best_days {
        stats.best_days = stats.days_survived;
    }

    info!("[Clock] Day {} begins", clock.day);
    day_end.send(DayEndEvent { new_day: clock.day });

    // Without shelter, the wilds win on the third day. Distinct from death.
    if clock.day >= 3 && !player.base_established {
        warn!(
            "[Clock] Day {} reached with no base — run lost",
            clock.day
        );
        *outcome = RunOutcome::Lost { day: clock.day };
        notices.send(NoticeEvent {
            message: "You never built a shelter. The wilds have claimed you.".to_string(),
        });
        next_state.set(GameState::GameOver);
    }
}
