//! Joint-name patterns.
//!
//! Patterns are regular expressions matched against the *whole* joint name,
//! so `".*_wheel"` claims `left_wheel` but not `left_foot_wheel_R`.

use std::fmt;

use legwheel_core::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A joint-name regular expression, kept as its source string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointPattern(String);

impl JointPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compile into a full-match matcher.
    pub fn compile(&self) -> Result<CompiledPattern, ConfigError> {
        let regex = Regex::new(&format!("^(?:{})$", self.0)).map_err(|e| {
            ConfigError::InvalidPattern {
                pattern: self.0.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(CompiledPattern {
            source: self.clone(),
            regex,
        })
    }
}

impl fmt::Display for JointPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JointPattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JointPattern {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for JointPattern {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JointPattern {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A [`JointPattern`] ready for matching.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    source: JointPattern,
    regex: Regex,
}

impl CompiledPattern {
    pub const fn source(&self) -> &JointPattern {
        &self.source
    }

    /// Whether the pattern matches the whole joint name.
    pub fn is_match(&self, joint_name: &str) -> bool {
        self.regex.is_match(joint_name)
    }
}
