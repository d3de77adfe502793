//! Wheel-leg humanoid: a biped whose feet end in driven wheels, with passive
//! caster wheels under each foot.
//!
//! Actuators are grouped by role. Hip, knee, waist and wheel joints use
//! CubeMars AK80-64 limits, ankles use AK70-10 limits. The foot casters are
//! kept as a zero-effort group so the simulator still integrates them under
//! damping.

use std::path::Path;

use legwheel_actuator_core::prelude::*;
use legwheel_actuator_core::presets::{AK70_10, AK80_64};
use legwheel_core::ordered::OrderedMap;
use serde::Serialize;

use crate::ASSETS_DATA_DIR;
use crate::articulation::{
    ArticulationDescriptor, ArticulationRootProperties, InitialState, JointDriveGains,
    RigidBodyProperties, UrdfSpawnConfig,
};

/// URDF location relative to the assets data directory.
pub const URDF_PATH: &str = "Robots/wheel_leg_humanoid_description/urdf/wheel_leg_humanoid.urdf";

/// Drive wheel radius (m).
pub const WHEEL_RADIUS: f64 = 0.11;

/// Distance between the two drive wheels (m).
pub const TRACK_WIDTH: f64 = 0.54;

/// Base height at spawn (m).
pub const SPAWN_HEIGHT: f64 = 0.88;

/// Every joint of the robot, in kinematic order.
pub const JOINT_NAMES: [&str; 19] = [
    "waist",
    "right_pelvis_1",
    "right_pelvis_2",
    "left_pelvis_1",
    "left_pelvis_2",
    "right_thigh",
    "left_thigh",
    "right_calf",
    "left_calf",
    "right_ankle_1",
    "right_ankle_2",
    "left_ankle_1",
    "left_ankle_2",
    "right_wheel",
    "left_wheel",
    "right_foot_wheel_R",
    "right_foot_wheel_L",
    "left_foot_wheel_R",
    "left_foot_wheel_L",
];

/// Wheel-leg humanoid with the URDF under [`ASSETS_DATA_DIR`].
pub fn wheel_leg_humanoid() -> ArticulationDescriptor {
    wheel_leg_humanoid_in(ASSETS_DATA_DIR)
}

/// Wheel-leg humanoid with the URDF under `data_dir`. The path is not checked.
pub fn wheel_leg_humanoid_in(data_dir: impl AsRef<Path>) -> ArticulationDescriptor {
    let spawn = UrdfSpawnConfig {
        asset_path: data_dir.as_ref().join(URDF_PATH),
        fix_base: false,
        merge_fixed_joints: true,
        replace_cylinders_with_capsules: false,
        activate_contact_sensors: true,
        rigid_props: RigidBodyProperties {
            disable_gravity: false,
            retain_accelerations: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
            max_linear_velocity: 1000.0,
            max_angular_velocity: 1000.0,
            max_depenetration_velocity: 1.0,
        },
        articulation_props: ArticulationRootProperties {
            enabled_self_collisions: false,
            solver_position_iteration_count: 4,
            solver_velocity_iteration_count: 4,
        },
        joint_drive: JointDriveGains {
            stiffness: 0.0,
            damping: 0.0,
        },
    };

    let init_state = InitialState {
        pos: [0.0, 0.0, SPAWN_HEIGHT],
        joint_pos: JOINT_NAMES.iter().map(|name| (*name, 0.0)).collect(),
        joint_vel: OrderedMap::from([(".*", 0.0)]),
        ..InitialState::default()
    };

    ArticulationDescriptor::new(spawn)
        .with_init_state(init_state)
        .with_soft_joint_pos_limit_factor(0.9)
        .with_actuator(
            "waist",
            ActuatorGroupSpec::from_motor(["waist"], &AK80_64)
                .with_stiffness(JointParam::per_pattern([("waist", 200.0)]))
                .with_damping(JointParam::per_pattern([("waist", 5.0)]))
                .with_armature(JointParam::per_pattern([("waist", 0.01)])),
        )
        .with_actuator(
            "legs",
            ActuatorGroupSpec::from_motor(
                [".*_pelvis_1", ".*_pelvis_2", ".*_thigh", ".*_calf"],
                &AK80_64,
            )
            .with_stiffness(JointParam::per_pattern([
                (".*_pelvis_1", 200.0),
                (".*_pelvis_2", 150.0),
                (".*_thigh", 200.0),
                (".*_calf", 200.0),
            ]))
            .with_damping(JointParam::per_pattern([
                (".*_pelvis_1", 5.0),
                (".*_pelvis_2", 5.0),
                (".*_thigh", 5.0),
                (".*_calf", 5.0),
            ]))
            .with_armature(JointParam::per_pattern([
                (".*_pelvis_1", 0.01),
                (".*_pelvis_2", 0.01),
                (".*_thigh", 0.01),
                (".*_calf", 0.01),
            ])),
        )
        .with_actuator(
            "feet",
            ActuatorGroupSpec::from_motor([".*_ankle_1", ".*_ankle_2"], &AK70_10)
                .with_stiffness(JointParam::per_pattern([
                    (".*_ankle_1", 20.0),
                    (".*_ankle_2", 20.0),
                ]))
                .with_damping(JointParam::per_pattern([
                    (".*_ankle_1", 2.0),
                    (".*_ankle_2", 2.0),
                ]))
                .with_armature(JointParam::per_pattern([
                    (".*_ankle_1", 0.01),
                    (".*_ankle_2", 0.01),
                ])),
        )
        .with_actuator(
            "wheel",
            ActuatorGroupSpec::from_motor([".*_wheel"], &AK80_64)
                .with_stiffness(JointParam::per_pattern([(".*_wheel", 0.0)]))
                .with_damping(JointParam::per_pattern([(".*_wheel", 0.5)]))
                .with_armature(JointParam::per_pattern([(".*_wheel", 0.01)])),
        )
        .with_actuator(
            "foot_wheel",
            // passive casters: no torque, effectively unlimited speed
            ActuatorGroupSpec::new([".*_foot_wheel_.*"], 0.0, 1000.0)
                .with_stiffness(JointParam::Uniform(0.0))
                .with_damping(JointParam::Uniform(0.1))
                .with_armature(JointParam::Uniform(0.0)),
        )
}

// ---------------------------------------------------------------------------
// DriveEnvelope
// ---------------------------------------------------------------------------

/// Differential-drive speed limits implied by the wheel motors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DriveEnvelope {
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Distance between drive wheels (m).
    pub track_width: f64,
    pub wheel_motor: MotorSpec,
}

impl DriveEnvelope {
    /// Envelope of the wheel-leg humanoid.
    pub const fn wheel_leg_humanoid() -> Self {
        Self {
            wheel_radius: WHEEL_RADIUS,
            track_width: TRACK_WIDTH,
            wheel_motor: AK80_64,
        }
    }

    /// Forward speed at rated wheel speed (m/s).
    pub const fn max_linear_velocity(&self) -> f64 {
        self.wheel_radius * self.wheel_motor.rated_speed
    }

    /// Yaw rate when one wheel runs at rated speed (rad/s).
    pub const fn max_angular_velocity(&self) -> f64 {
        self.max_linear_velocity() / self.track_width
    }
}

impl Default for DriveEnvelope {
    fn default() -> Self {
        Self::wheel_leg_humanoid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn asset_path_under_data_dir() {
        let d = wheel_leg_humanoid_in("/opt/assets");
        assert_eq!(
            d.spawn.asset_path,
            Path::new("/opt/assets").join(URDF_PATH)
        );
        assert!(wheel_leg_humanoid().spawn.asset_path.starts_with(ASSETS_DATA_DIR));
    }

    #[test]
    fn spawn_flags() {
        let s = wheel_leg_humanoid().spawn;
        assert!(!s.fix_base);
        assert!(s.merge_fixed_joints);
        assert!(!s.replace_cylinders_with_capsules);
        assert!(s.activate_contact_sensors);
        assert!(!s.articulation_props.enabled_self_collisions);
        assert_eq!(s.articulation_props.solver_position_iteration_count, 4);
        assert_eq!(s.articulation_props.solver_velocity_iteration_count, 4);
        assert_relative_eq!(s.rigid_props.max_depenetration_velocity, 1.0);
    }

    #[test]
    fn joints_start_at_zero() {
        let d = wheel_leg_humanoid();
        assert_eq!(d.init_state.joint_pos.len(), JOINT_NAMES.len());
        assert!(d.init_state.joint_pos.values().all(|q| *q == 0.0));
        assert_eq!(d.joint_names().collect::<Vec<_>>(), JOINT_NAMES);
        assert_relative_eq!(d.init_state.pos[2], 0.88);
    }

    #[test]
    fn drive_envelope() {
        let e = DriveEnvelope::default();
        assert_relative_eq!(e.max_linear_velocity(), 0.11 * 5.026_548, epsilon = 1e-6);
        assert_relative_eq!(
            e.max_angular_velocity(),
            e.max_linear_velocity() / 0.54,
            epsilon = 1e-12
        );
    }
}
