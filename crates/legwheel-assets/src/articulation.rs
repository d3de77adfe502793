//! Articulated-robot descriptor.
//!
//! Everything the simulator needs to spawn and drive a robot from a URDF:
//! spawn flags, rigid-body and articulation-root properties, the initial
//! state, and actuator groups. Nothing here touches the URDF itself; the
//! asset path is resolved by the consumer.

use std::path::PathBuf;

use bevy::prelude::Resource;
use legwheel_actuator_core::prelude::*;
use legwheel_core::config::Validate;
use legwheel_core::{ConfigError, ordered::OrderedMap};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}
const fn default_max_velocity() -> f64 {
    1000.0
}
const fn default_max_depenetration_velocity() -> f64 {
    1.0
}
const fn default_position_iterations() -> u32 {
    4
}
const fn default_velocity_iterations() -> u32 {
    1
}
const fn default_rot() -> [f64; 4] {
    [1.0, 0.0, 0.0, 0.0]
}
const fn default_soft_limit_factor() -> f64 {
    1.0
}
fn default_joint_vel() -> OrderedMap<f64> {
    OrderedMap::from([(".*", 0.0)])
}

// ---------------------------------------------------------------------------
// RigidBodyProperties
// ---------------------------------------------------------------------------

/// Rigid-body simulation properties applied to every link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyProperties {
    #[serde(default)]
    pub disable_gravity: bool,
    #[serde(default)]
    pub retain_accelerations: bool,
    #[serde(default)]
    pub linear_damping: f64,
    #[serde(default)]
    pub angular_damping: f64,
    /// m/s.
    #[serde(default = "default_max_velocity")]
    pub max_linear_velocity: f64,
    /// rad/s.
    #[serde(default = "default_max_velocity")]
    pub max_angular_velocity: f64,
    /// m/s.
    #[serde(default = "default_max_depenetration_velocity")]
    pub max_depenetration_velocity: f64,
}

impl Default for RigidBodyProperties {
    fn default() -> Self {
        Self {
            disable_gravity: false,
            retain_accelerations: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
            max_linear_velocity: default_max_velocity(),
            max_angular_velocity: default_max_velocity(),
            max_depenetration_velocity: default_max_depenetration_velocity(),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticulationRootProperties
// ---------------------------------------------------------------------------

/// Solver settings of the articulation root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticulationRootProperties {
    #[serde(default = "default_true")]
    pub enabled_self_collisions: bool,
    #[serde(default = "default_position_iterations")]
    pub solver_position_iteration_count: u32,
    #[serde(default = "default_velocity_iterations")]
    pub solver_velocity_iteration_count: u32,
}

impl Default for ArticulationRootProperties {
    fn default() -> Self {
        Self {
            enabled_self_collisions: true,
            solver_position_iteration_count: default_position_iterations(),
            solver_velocity_iteration_count: default_velocity_iterations(),
        }
    }
}

// ---------------------------------------------------------------------------
// JointDriveGains
// ---------------------------------------------------------------------------

/// PD gains written into every joint drive at import, before actuator
/// groups override them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointDriveGains {
    #[serde(default)]
    pub stiffness: f64,
    #[serde(default)]
    pub damping: f64,
}

// ---------------------------------------------------------------------------
// UrdfSpawnConfig
// ---------------------------------------------------------------------------

/// How to import the robot from a URDF file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UrdfSpawnConfig {
    pub asset_path: PathBuf,
    #[serde(default)]
    pub fix_base: bool,
    #[serde(default = "default_true")]
    pub merge_fixed_joints: bool,
    #[serde(default)]
    pub replace_cylinders_with_capsules: bool,
    #[serde(default)]
    pub activate_contact_sensors: bool,
    #[serde(default)]
    pub rigid_props: RigidBodyProperties,
    #[serde(default)]
    pub articulation_props: ArticulationRootProperties,
    #[serde(default)]
    pub joint_drive: JointDriveGains,
}

impl UrdfSpawnConfig {
    pub fn new(asset_path: impl Into<PathBuf>) -> Self {
        Self {
            asset_path: asset_path.into(),
            fix_base: false,
            merge_fixed_joints: true,
            replace_cylinders_with_capsules: false,
            activate_contact_sensors: false,
            rigid_props: RigidBodyProperties::default(),
            articulation_props: ArticulationRootProperties::default(),
            joint_drive: JointDriveGains::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// InitialState
// ---------------------------------------------------------------------------

/// Root pose and joint state the robot is reset to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Root position (m).
    #[serde(default)]
    pub pos: [f64; 3],
    /// Root orientation quaternion (w, x, y, z).
    #[serde(default = "default_rot")]
    pub rot: [f64; 4],
    /// Root linear velocity (m/s).
    #[serde(default)]
    pub lin_vel: [f64; 3],
    /// Root angular velocity (rad/s).
    #[serde(default)]
    pub ang_vel: [f64; 3],
    /// Joint positions (rad) keyed by joint name.
    #[serde(default)]
    pub joint_pos: OrderedMap<f64>,
    /// Joint velocities (rad/s) keyed by joint-name pattern.
    #[serde(default = "default_joint_vel")]
    pub joint_vel: OrderedMap<f64>,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            rot: default_rot(),
            lin_vel: [0.0; 3],
            ang_vel: [0.0; 3],
            joint_pos: OrderedMap::new(),
            joint_vel: default_joint_vel(),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticulationDescriptor
// ---------------------------------------------------------------------------

/// Complete description of an articulated robot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Resource)]
pub struct ArticulationDescriptor {
    pub spawn: UrdfSpawnConfig,
    #[serde(default)]
    pub init_state: InitialState,
    /// Fraction of each joint's range enforced as a soft limit, in (0, 1].
    #[serde(default = "default_soft_limit_factor")]
    pub soft_joint_pos_limit_factor: f64,
    /// Actuator groups by name, in declaration order.
    #[serde(default)]
    pub actuators: OrderedMap<ActuatorGroupSpec>,
}

impl ArticulationDescriptor {
    pub fn new(spawn: UrdfSpawnConfig) -> Self {
        Self {
            spawn,
            init_state: InitialState::default(),
            soft_joint_pos_limit_factor: default_soft_limit_factor(),
            actuators: OrderedMap::new(),
        }
    }

    #[must_use]
    pub fn with_init_state(mut self, init_state: InitialState) -> Self {
        self.init_state = init_state;
        self
    }

    #[must_use]
    pub const fn with_soft_joint_pos_limit_factor(mut self, factor: f64) -> Self {
        self.soft_joint_pos_limit_factor = factor;
        self
    }

    #[must_use]
    pub fn with_actuator(mut self, name: impl Into<String>, group: ActuatorGroupSpec) -> Self {
        self.actuators.insert(name, group);
        self
    }

    pub fn actuator(&self, name: &str) -> Option<&ActuatorGroupSpec> {
        self.actuators.get(name)
    }

    /// Joints named in the initial state, in declaration order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.init_state.joint_pos.keys()
    }

    /// Assign each joint to the actuator group claiming it.
    ///
    /// A joint claimed by two groups is an error. Joints claimed by none are
    /// reported in [`JointAssignment::unclaimed`]; the simulator leaves them
    /// undriven.
    pub fn resolve_joints<'a>(
        &self,
        joint_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<JointAssignment, ConfigError> {
        let groups = self
            .actuators
            .iter()
            .map(|(name, spec)| -> Result<_, ConfigError> { Ok((name, spec.compile()?)) })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let mut hits: Vec<Vec<bool>> = groups
            .iter()
            .map(|(_, compiled)| vec![false; compiled.patterns().len()])
            .collect();

        let mut assignment = JointAssignment::default();
        for joint in joint_names {
            let mut owner: Option<usize> = None;
            for (gi, (group, compiled)) in groups.iter().enumerate() {
                let mut claimed = false;
                for (pi, pattern) in compiled.patterns().iter().enumerate() {
                    if pattern.is_match(joint) {
                        hits[gi][pi] = true;
                        claimed = true;
                    }
                }
                if !claimed {
                    continue;
                }
                if let Some(prev) = owner {
                    return Err(ConfigError::AmbiguousJoint {
                        joint: joint.to_owned(),
                        first: groups[prev].0.to_owned(),
                        second: (*group).to_owned(),
                    });
                }
                owner = Some(gi);
            }

            match owner {
                Some(gi) => {
                    let (group, compiled) = &groups[gi];
                    assignment.joints.push(compiled.resolve_claimed(group, joint));
                }
                None => {
                    tracing::warn!(joint, "joint is not claimed by any actuator group");
                    assignment.unclaimed.push(joint.to_owned());
                }
            }
        }

        for ((group, compiled), hits) in groups.iter().zip(&hits) {
            for (pattern, hit) in compiled.patterns().iter().zip(hits) {
                if !hit {
                    tracing::debug!(group, pattern = %pattern.source(), "pattern matched no joint");
                    assignment
                        .unmatched_patterns
                        .push(((*group).to_owned(), pattern.source().clone()));
                }
            }
        }

        tracing::debug!(
            driven = assignment.joints.len(),
            unclaimed = assignment.unclaimed.len(),
            "resolved actuator groups"
        );
        Ok(assignment)
    }

    /// [`resolve_joints`](Self::resolve_joints) over the initial-state joints.
    pub fn resolve_own_joints(&self) -> Result<JointAssignment, ConfigError> {
        self.resolve_joints(self.joint_names())
    }
}

impl Validate for ArticulationDescriptor {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn.asset_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("spawn.asset_path", "must not be empty"));
        }

        let factor = self.soft_joint_pos_limit_factor;
        if factor.is_nan() || factor <= 0.0 || factor > 1.0 {
            return Err(ConfigError::invalid(
                "soft_joint_pos_limit_factor",
                format!("{factor} is not in (0, 1]"),
            ));
        }

        for pattern in self.init_state.joint_vel.keys() {
            JointPattern::from(pattern).compile()?;
        }

        for (name, group) in self.actuators.iter() {
            group.check(name)?;
        }

        tracing::debug!(groups = self.actuators.len(), "articulation descriptor is valid");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JointAssignment
// ---------------------------------------------------------------------------

/// Outcome of [`ArticulationDescriptor::resolve_joints`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JointAssignment {
    /// Driven joints in the order they were given.
    pub joints: Vec<ResolvedJoint>,
    /// Joints no group claims.
    pub unclaimed: Vec<String>,
    /// `(group, pattern)` pairs that matched none of the given joints.
    pub unmatched_patterns: Vec<(String, JointPattern)>,
}

impl JointAssignment {
    pub fn get(&self, joint: &str) -> Option<&ResolvedJoint> {
        self.joints.iter().find(|j| j.joint == joint)
    }

    /// Joints driven by `group`.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ResolvedJoint> {
        self.joints.iter().filter(move |j| j.group == group)
    }

    /// Every given joint is claimed and every pattern matched something.
    pub fn is_exact(&self) -> bool {
        self.unclaimed.is_empty() && self.unmatched_patterns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
