//! Datasheet values for the motors fitted to the wheel-leg humanoid.
//!
//! The rated speed used by [`AK80_64`] and [`AK70_10`] is the 48 V figure.

use crate::motor::MotorSpec;

/// CubeMars AK80-64 at 48 V. Hip, knee, waist and drive wheels.
pub const AK80_64: MotorSpec = MotorSpec::from_rpm(120.0, 48.0, 48.0);

/// CubeMars AK70-10 at 48 V. Ankles.
pub const AK70_10: MotorSpec = MotorSpec::from_rpm(24.8, 8.3, 310.0);

/// Rated output speed at one supply voltage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RatedPoint {
    /// Supply voltage (V).
    pub voltage: f64,
    /// Rated output speed (RPM).
    pub rpm: f64,
}

/// Datasheet entry for a motor part.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Datasheet {
    pub manufacturer: &'static str,
    pub part_number: &'static str,
    /// Peak torque (Nm).
    pub peak_torque: f64,
    /// Rated torque (Nm).
    pub rated_torque: f64,
    /// Rated speed per supported supply voltage.
    pub rated_points: [RatedPoint; 2],
}

impl Datasheet {
    /// Spec at the given supply voltage, if the datasheet lists it.
    pub fn spec_at(&self, voltage: f64) -> Option<MotorSpec> {
        self.rated_points
            .iter()
            .find(|p| (p.voltage - voltage).abs() < f64::EPSILON)
            .map(|p| MotorSpec::from_rpm(self.peak_torque, self.rated_torque, p.rpm))
    }

    /// Spec at the highest listed supply voltage.
    pub fn spec(&self) -> MotorSpec {
        let [low, high] = self.rated_points;
        let top = if high.voltage >= low.voltage { high } else { low };
        MotorSpec::from_rpm(self.peak_torque, self.rated_torque, top.rpm)
    }
}

/// All known datasheets, keyed by part number.
pub static DATASHEETS: [Datasheet; 2] = [
    Datasheet {
        manufacturer: "CubeMars",
        part_number: "AK80-64",
        peak_torque: 120.0,
        rated_torque: 48.0,
        rated_points: [
            RatedPoint {
                voltage: 24.0,
                rpm: 23.0,
            },
            RatedPoint {
                voltage: 48.0,
                rpm: 48.0,
            },
        ],
    },
    Datasheet {
        manufacturer: "CubeMars",
        part_number: "AK70-10",
        peak_torque: 24.8,
        rated_torque: 8.3,
        rated_points: [
            RatedPoint {
                voltage: 24.0,
                rpm: 148.0,
            },
            RatedPoint {
                voltage: 48.0,
                rpm: 310.0,
            },
        ],
    },
];

/// Look up a datasheet by part number (e.g. `"AK80-64"`).
pub fn datasheet(part_number: &str) -> Option<&'static Datasheet> {
    DATASHEETS.iter().find(|d| d.part_number == part_number)
}

/// Look up the 48 V spec for a part number.
pub fn motor_spec(part_number: &str) -> Option<MotorSpec> {
    datasheet(part_number).map(Datasheet::spec)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
