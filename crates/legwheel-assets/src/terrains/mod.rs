//! Terrain presets.

pub mod drivable;

pub use drivable::drivable_terrains;
