//! Emberwild library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the headless runner. This library crate
//! exposes the same modules so that `tests/` integration tests can drive
//! the simulation tick by tick.

pub mod shared;
pub mod input;
pub mod clock;
pub mod weather;
pub mod world;
pub mod player;
pub mod behavior;
pub mod combat;
pub mod crafting;
pub mod survival;
pub mod achievements;
pub mod save;
pub mod snapshot;
