//! Wheel-leg humanoid and drivable terrain descriptors.
//!
//! Two independent, immutable parameter tables for an external simulator:
//!
//! - [`ArticulationDescriptor`]: how to spawn and drive the robot
//!   ([`robots::wheel_leg_humanoid`]).
//! - [`TerrainGeneratorDescriptor`]: the envelope for procedural ground
//!   generation ([`terrains::drivable_terrains`]).
//!
//! Building either preset cannot fail. Both implement
//! [`Validate`](legwheel_core::config::Validate) for structural checks and
//! round-trip through TOML and JSON via [`legwheel_core::config`].
//!
//! # Example
//!
//! ```
//! use legwheel_assets::prelude::*;
//!
//! let robot = wheel_leg_humanoid();
//! robot.validate().unwrap();
//! assert!(robot.actuator("foot_wheel").unwrap().is_passive());
//!
//! let terrain = drivable_terrains();
//! assert_eq!(terrain.num_tiles(), 200);
//! ```

pub mod articulation;
pub mod plugin;
pub mod robots;
pub mod terrain;
pub mod terrains;

/// Root directory robot assets are resolved against.
pub const ASSETS_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use articulation::{
    ArticulationDescriptor, ArticulationRootProperties, InitialState, JointAssignment,
    JointDriveGains, RigidBodyProperties, UrdfSpawnConfig,
};
pub use plugin::LegwheelAssetsPlugin;
pub use terrain::{
    HfRandomUniformTerrain, MeshRandomGridTerrain, SubTerrainSpec, TerrainGeneratorDescriptor,
};

pub mod prelude {
    pub use crate::robots::{DriveEnvelope, wheel_leg_humanoid, wheel_leg_humanoid_in};
    pub use crate::terrains::drivable_terrains;
    pub use crate::{
        ArticulationDescriptor, InitialState, JointAssignment, LegwheelAssetsPlugin,
        SubTerrainSpec, TerrainGeneratorDescriptor, UrdfSpawnConfig,
    };
    pub use legwheel_actuator_core::prelude::*;
    pub use legwheel_core::prelude::*;
}
