//! Import and export of descriptors as TOML or JSON.
//!
//! Loading always runs [`Validate::validate`] before handing the value back,
//! the same way a scene file is checked before the simulator sees it. Saving
//! validates too, so an exported file can always be loaded again.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Structural checks a descriptor can run on itself.
///
/// Only shape is checked (keys that must line up, ratios that must lie in a
/// range). Physical plausibility of gains or noise amplitudes stays with the
/// simulator consuming the descriptor.
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Serialization format of a descriptor file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Toml,
    Json,
}

impl Format {
    /// Pick the format from a file extension. Unknown extensions yield `None`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Serialize `value` in this format.
    pub fn serialize<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        Ok(match self {
            Self::Toml => toml::to_string_pretty(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
        })
    }

    /// Deserialize and validate a value from `content`.
    pub fn parse<T: DeserializeOwned + Validate>(self, content: &str) -> Result<T, ConfigError> {
        let value: T = match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        };
        value.validate()?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Load and validate a descriptor. The format follows the file extension and
/// falls back to TOML.
pub fn load<T: DeserializeOwned + Validate>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = Format::from_path(path).unwrap_or_default();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = format.parse(&content)?;
    tracing::debug!(path = %path.display(), ?format, "loaded descriptor");
    Ok(value)
}

/// Validate and write a descriptor. The format follows the file extension and
/// falls back to TOML.
pub fn save<T: Serialize + Validate>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    save_as(value, path, Format::from_path(path).unwrap_or_default())
}

/// Validate and write a descriptor in `format`, whatever the extension.
pub fn save_as<T: Serialize + Validate>(
    value: &T,
    path: impl AsRef<Path>,
    format: Format,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    value.validate()?;
    let content = format.serialize(value)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?format, "saved descriptor");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ratio {
        value: f64,
    }

    impl Validate for Ratio {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.value > 0.0 && self.value <= 1.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid("value", "must be in (0, 1]"))
            }
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path("robot.toml"), Some(Format::Toml));
        assert_eq!(Format::from_path("dir/terrain.json"), Some(Format::Json));
        assert_eq!(Format::from_path("robot.yaml"), None);
        assert_eq!(Format::from_path("robot"), None);
    }

    #[test]
    fn parse_validates() {
        let ok: Ratio = Format::Toml.parse("value = 0.9").unwrap();
        assert_eq!(ok, Ratio { value: 0.9 });

        let err = Format::Json.parse::<Ratio>(r#"{"value": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn parse_reports_syntax_errors() {
        assert!(matches!(
            Format::Toml.parse::<Ratio>("value = ").unwrap_err(),
            ConfigError::Toml(_)
        ));
        assert!(matches!(
            Format::Json.parse::<Ratio>("{").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ratio.toml", "ratio.json", "ratio.cfg"] {
            let path = dir.path().join(name);
            save(&Ratio { value: 0.25 }, &path).unwrap();
            let loaded: Ratio = load(&path).unwrap();
            assert_eq!(loaded.value.to_bits(), 0.25_f64.to_bits());
        }
    }

    #[test]
    fn save_as_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratio.toml");
        save_as(&Ratio { value: 0.5 }, &path, Format::Json).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Ratio = Format::Json.parse(&content).unwrap();
        assert_eq!(parsed, Ratio { value: 0.5 });
        assert!(load::<Ratio>(&path).is_err());
    }

    #[test]
    fn save_refuses_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        assert!(save(&Ratio { value: 0.0 }, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load::<Ratio>("/nonexistent/ratio.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/ratio.toml"));
    }
}
