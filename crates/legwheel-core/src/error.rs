use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading, saving, validating or resolving descriptors.
///
/// Building the preset descriptors never produces one of these; they only
/// surface at the I/O, validation and joint-resolution boundaries.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid joint pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Actuator group {group}: {param} key {pattern:?} is not one of its joint patterns")]
    UnknownGainKey {
        group: String,
        param: &'static str,
        pattern: String,
    },

    #[error("Sub-terrain proportions sum to {0} (must be <= 1)")]
    ProportionOverflow(f64),

    #[error("Joint {joint} is claimed by actuator groups {first} and {second}")]
    AmbiguousJoint {
        joint: String,
        first: String,
        second: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::invalid("soft_joint_pos_limit_factor", "must be in (0, 1]").to_string(),
            "Invalid value for soft_joint_pos_limit_factor: must be in (0, 1]"
        );
        assert_eq!(
            ConfigError::InvalidPattern {
                pattern: "(".into(),
                message: "unclosed group".into()
            }
            .to_string(),
            "Invalid joint pattern \"(\": unclosed group"
        );
        assert_eq!(
            ConfigError::UnknownGainKey {
                group: "legs".into(),
                param: "stiffness",
                pattern: ".*_knee".into()
            }
            .to_string(),
            "Actuator group legs: stiffness key \".*_knee\" is not one of its joint patterns"
        );
        assert_eq!(
            ConfigError::ProportionOverflow(1.5).to_string(),
            "Sub-terrain proportions sum to 1.5 (must be <= 1)"
        );
        assert_eq!(
            ConfigError::AmbiguousJoint {
                joint: "left_wheel".into(),
                first: "wheel".into(),
                second: "foot_wheel".into()
            }
            .to_string(),
            "Joint left_wheel is claimed by actuator groups wheel and foot_wheel"
        );
    }

    #[test]
    fn io_error_includes_path() {
        let e = ConfigError::Io {
            path: PathBuf::from("/tmp/robot.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/robot.toml"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let err = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let config_err: ConfigError = err.into();
        assert!(matches!(config_err, ConfigError::Toml(_)));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<ConfigError>();
    }
}
