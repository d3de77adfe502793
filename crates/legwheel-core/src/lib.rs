//! Shared building blocks for the legwheel robot and terrain descriptors.
//!
//! - [`units`]: unit conversions used when transcribing motor datasheets.
//! - [`ordered`]: an insertion-ordered string-keyed map for pattern tables.
//! - [`config`]: TOML/JSON import and export with structural validation.
//! - [`error`]: the [`ConfigError`] type returned by every fallible operation.

pub mod config;
pub mod error;
pub mod ordered;
pub mod units;

pub use error::ConfigError;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{Format, Validate};
    pub use crate::error::ConfigError;
    pub use crate::ordered::OrderedMap;
    pub use crate::units::{rad_per_s_to_rpm, rpm_to_rad_per_s};
}
