//! Motor datasheet presets and pattern-keyed actuator groups.
//!
//! Pure data, no simulation. An [`ActuatorGroupSpec`](group::ActuatorGroupSpec)
//! names a class of joints by regex patterns and assigns them shared limits
//! and PD gains, with limits taken from a [`MotorSpec`](motor::MotorSpec).
//!
//! # Quick Start
//!
//! ```
//! use legwheel_actuator_core::prelude::*;
//!
//! let knee = ActuatorGroupSpec::from_motor([".*_calf"], &presets::AK80_64)
//!     .with_stiffness(JointParam::Uniform(200.0))
//!     .with_damping(JointParam::Uniform(5.0));
//!
//! let joint = knee.resolve("legs", "left_calf").unwrap().unwrap();
//! assert_eq!(joint.effort_limit, 120.0);
//! assert_eq!(joint.stiffness, Some(200.0));
//! ```

pub mod group;
pub mod motor;
pub mod pattern;
pub mod presets;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::group::{
        ActuatorGroupSpec, CompiledGroup, CompiledParam, JointParam, ResolvedJoint,
    };
    pub use crate::motor::MotorSpec;
    pub use crate::pattern::{CompiledPattern, JointPattern};
    pub use crate::presets;
}
