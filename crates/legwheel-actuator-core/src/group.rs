//! Actuator groups: joints sharing limits and PD gains.
//!
//! Joints are grouped by functional role (waist, legs, feet...) and claimed
//! by name patterns. Per-joint gains are given either as one value for the
//! whole group or as a table keyed by the group's own patterns.

use legwheel_core::{ConfigError, ordered::OrderedMap};
use serde::{Deserialize, Serialize};

use crate::motor::MotorSpec;
use crate::pattern::{CompiledPattern, JointPattern};

// ---------------------------------------------------------------------------
// JointParam
// ---------------------------------------------------------------------------

/// A per-joint parameter: one value for every joint, or a pattern table.
///
/// Pattern tables resolve first-match-wins in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JointParam {
    Uniform(f64),
    PerPattern(OrderedMap<f64>),
}

impl Default for JointParam {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl JointParam {
    /// Build a pattern table from `(pattern, value)` pairs.
    pub fn per_pattern<K: Into<String>, const N: usize>(entries: [(K, f64); N]) -> Self {
        Self::PerPattern(OrderedMap::from(entries))
    }

    /// Pattern keys of a table; empty for a uniform value.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let table = match self {
            Self::PerPattern(table) => Some(table),
            Self::Uniform(_) => None,
        };
        table.into_iter().flat_map(|t| t.keys())
    }

    /// Compile the pattern keys of a table for repeated lookups.
    pub fn compile(&self) -> Result<CompiledParam, ConfigError> {
        Ok(match self {
            Self::Uniform(v) => CompiledParam::Uniform(*v),
            Self::PerPattern(table) => CompiledParam::PerPattern(
                table
                    .iter()
                    .map(|(pattern, value)| Ok((JointPattern::from(pattern).compile()?, *value)))
                    .collect::<Result<_, ConfigError>>()?,
            ),
        })
    }
}

impl From<f64> for JointParam {
    fn from(v: f64) -> Self {
        Self::Uniform(v)
    }
}

/// A [`JointParam`] with its table keys compiled.
#[derive(Clone, Debug)]
pub enum CompiledParam {
    Uniform(f64),
    PerPattern(Vec<(CompiledPattern, f64)>),
}

impl CompiledParam {
    /// Value applying to `joint_name`; the first matching entry wins.
    pub fn value_for(&self, joint_name: &str) -> Option<f64> {
        match self {
            Self::Uniform(v) => Some(*v),
            Self::PerPattern(table) => table
                .iter()
                .find(|(pattern, _)| pattern.is_match(joint_name))
                .map(|(_, value)| *value),
        }
    }
}

// ---------------------------------------------------------------------------
// ActuatorGroupSpec
// ---------------------------------------------------------------------------

/// Implicit (simulator-side PD) actuator group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActuatorGroupSpec {
    /// Patterns claiming joints for this group.
    pub joint_names_expr: Vec<JointPattern>,
    /// Torque limit (Nm). `0.0` marks a passive group.
    pub effort_limit: f64,
    /// Velocity limit (rad/s).
    pub velocity_limit: f64,
    /// Position gain (Nm/rad).
    pub stiffness: JointParam,
    /// Velocity gain (Nm·s/rad).
    pub damping: JointParam,
    /// Added reflected inertia (kg·m²).
    #[serde(default)]
    pub armature: JointParam,
    /// Joint friction coefficient.
    #[serde(default)]
    pub friction: f64,
}

impl ActuatorGroupSpec {
    /// Create a group with explicit limits and all gains at zero.
    pub fn new<P: Into<JointPattern>>(
        patterns: impl IntoIterator<Item = P>,
        effort_limit: f64,
        velocity_limit: f64,
    ) -> Self {
        Self {
            joint_names_expr: patterns.into_iter().map(Into::into).collect(),
            effort_limit,
            velocity_limit,
            stiffness: JointParam::default(),
            damping: JointParam::default(),
            armature: JointParam::default(),
            friction: 0.0,
        }
    }

    /// Create a group limited by a motor's peak torque and rated speed.
    pub fn from_motor<P: Into<JointPattern>>(
        patterns: impl IntoIterator<Item = P>,
        motor: &MotorSpec,
    ) -> Self {
        Self::new(patterns, motor.peak_torque, motor.rated_speed)
    }

    #[must_use]
    pub fn with_stiffness(mut self, stiffness: JointParam) -> Self {
        self.stiffness = stiffness;
        self
    }

    #[must_use]
    pub fn with_damping(mut self, damping: JointParam) -> Self {
        self.damping = damping;
        self
    }

    #[must_use]
    pub fn with_armature(mut self, armature: JointParam) -> Self {
        self.armature = armature;
        self
    }

    #[must_use]
    pub const fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// A group with no torque authority; the simulator only applies damping.
    #[allow(clippy::float_cmp)]
    pub fn is_passive(&self) -> bool {
        self.effort_limit == 0.0
    }

    /// Check the group is well-formed under the name `group`.
    ///
    /// Every pattern must compile and every gain-table key must be one of
    /// `joint_names_expr`.
    pub fn check(&self, group: &str) -> Result<(), ConfigError> {
        if self.joint_names_expr.is_empty() {
            return Err(ConfigError::invalid(
                format!("actuators.{group}.joint_names_expr"),
                "must name at least one joint pattern",
            ));
        }
        self.compile_patterns()?;

        for (param, table) in [
            ("stiffness", &self.stiffness),
            ("damping", &self.damping),
            ("armature", &self.armature),
        ] {
            if let Some(key) = table
                .keys()
                .find(|k| !self.joint_names_expr.iter().any(|p| p == k))
            {
                return Err(ConfigError::UnknownGainKey {
                    group: group.to_owned(),
                    param,
                    pattern: key.to_owned(),
                });
            }
        }
        tracing::debug!(
            group,
            patterns = self.joint_names_expr.len(),
            passive = self.is_passive(),
            "actuator group is valid"
        );
        Ok(())
    }

    pub fn compile_patterns(&self) -> Result<Vec<CompiledPattern>, ConfigError> {
        self.joint_names_expr.iter().map(JointPattern::compile).collect()
    }

    /// Compile patterns and gain tables once for resolving many joints.
    pub fn compile(&self) -> Result<CompiledGroup<'_>, ConfigError> {
        Ok(CompiledGroup {
            spec: self,
            patterns: self.compile_patterns()?,
            stiffness: self.stiffness.compile()?,
            damping: self.damping.compile()?,
            armature: self.armature.compile()?,
        })
    }

    /// Resolve `joint_name` against this group; `None` if not claimed.
    ///
    /// Compiles the group on every call. Use [`Self::compile`] when
    /// resolving a whole joint list.
    pub fn resolve(&self, group: &str, joint_name: &str) -> Result<Option<ResolvedJoint>, ConfigError> {
        let compiled = self.compile()?;
        Ok(compiled
            .claims(joint_name)
            .then(|| compiled.resolve_claimed(group, joint_name)))
    }
}

// ---------------------------------------------------------------------------
// CompiledGroup
// ---------------------------------------------------------------------------

/// An [`ActuatorGroupSpec`] with every regex compiled.
#[derive(Clone, Debug)]
pub struct CompiledGroup<'a> {
    spec: &'a ActuatorGroupSpec,
    patterns: Vec<CompiledPattern>,
    stiffness: CompiledParam,
    damping: CompiledParam,
    armature: CompiledParam,
}

impl CompiledGroup<'_> {
    pub const fn spec(&self) -> &ActuatorGroupSpec {
        self.spec
    }

    /// The group's `joint_names_expr`, compiled, in declaration order.
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Whether any of the group's patterns claims `joint_name`.
    pub fn claims(&self, joint_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(joint_name))
    }

    /// Limits and gains for a joint already known to be claimed.
    pub fn resolve_claimed(&self, group: &str, joint_name: &str) -> ResolvedJoint {
        ResolvedJoint {
            joint: joint_name.to_owned(),
            group: group.to_owned(),
            effort_limit: self.spec.effort_limit,
            velocity_limit: self.spec.velocity_limit,
            stiffness: self.stiffness.value_for(joint_name),
            damping: self.damping.value_for(joint_name),
            armature: self.armature.value_for(joint_name),
            friction: self.spec.friction,
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedJoint
// ---------------------------------------------------------------------------

/// Limits and gains one joint ends up with.
///
/// A `None` gain means no table entry matched; the simulator keeps the
/// asset's own value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedJoint {
    pub joint: String,
    pub group: String,
    pub effort_limit: f64,
    pub velocity_limit: f64,
    pub stiffness: Option<f64>,
    pub damping: Option<f64>,
    pub armature: Option<f64>,
    pub friction: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
