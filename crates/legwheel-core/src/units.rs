//! Unit conversions.

use std::f64::consts::PI;

/// Convert a rotational speed from revolutions per minute to rad/s.
///
/// `rad_per_s = rpm * 2π / 60`
pub const fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

/// Convert a rotational speed from rad/s back to revolutions per minute.
pub const fn rad_per_s_to_rpm(rad_per_s: f64) -> f64 {
    rad_per_s * 60.0 / (2.0 * PI)
}
