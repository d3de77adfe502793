//! Robot presets.

pub mod wheel_leg_humanoid;

pub use wheel_leg_humanoid::{DriveEnvelope, wheel_leg_humanoid, wheel_leg_humanoid_in};
