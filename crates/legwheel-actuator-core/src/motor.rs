//! Motor capability records.

use legwheel_core::units::{rad_per_s_to_rpm, rpm_to_rad_per_s};
use serde::{Deserialize, Serialize};

/// Torque and speed envelope of a physical actuator.
///
/// Values are transcribed from datasheets and trusted as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorSpec {
    /// Peak (short-duration) torque (Nm).
    pub peak_torque: f64,
    /// Continuous rated torque (Nm).
    pub rated_torque: f64,
    /// Rated output speed (rad/s).
    pub rated_speed: f64,
}

impl MotorSpec {
    /// Create a spec with the rated speed already in rad/s.
    pub const fn new(peak_torque: f64, rated_torque: f64, rated_speed: f64) -> Self {
        Self {
            peak_torque,
            rated_torque,
            rated_speed,
        }
    }

    /// Create a spec from a datasheet rated speed in RPM.
    pub const fn from_rpm(peak_torque: f64, rated_torque: f64, rated_rpm: f64) -> Self {
        Self::new(peak_torque, rated_torque, rpm_to_rad_per_s(rated_rpm))
    }

    /// Rated speed expressed in RPM.
    pub const fn rated_rpm(&self) -> f64 {
        rad_per_s_to_rpm(self.rated_speed)
    }

    /// Ratio of peak to rated torque.
    pub const fn overload_ratio(&self) -> f64 {
        self.peak_torque / self.rated_torque
    }
}
