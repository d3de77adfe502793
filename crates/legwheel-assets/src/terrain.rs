//! Procedural terrain generator descriptor.
//!
//! The terrain is a `num_rows` × `num_cols` grid of square tiles surrounded
//! by a flat border. Each tile is filled by one sub-terrain generator, picked
//! with probability given by its `proportion`.
//!
//! Proportions are kept exactly as declared. They are not required to sum to
//! one, and what the consuming generator does with unassigned mass is up to
//! it; [`TerrainGeneratorDescriptor::unassigned_proportion`] and
//! [`TerrainGeneratorDescriptor::normalized_proportions`] expose both readings.

use bevy::prelude::Resource;
use legwheel_core::config::Validate;
use legwheel_core::{ConfigError, ordered::OrderedMap};
use serde::{Deserialize, Serialize};

/// Slack allowed when checking that proportions sum to at most one.
const PROPORTION_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_platform_width() -> f64 {
    1.0
}
const fn default_difficulty_range() -> [f64; 2] {
    [0.0, 1.0]
}
const fn default_slope_threshold() -> f64 {
    0.75
}

// ---------------------------------------------------------------------------
// Sub-terrains
// ---------------------------------------------------------------------------

/// Mesh terrain made of a grid of boxes with random heights around a flat
/// spawn platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshRandomGridTerrain {
    pub proportion: f64,
    /// Edge length of each box (m).
    pub grid_width: f64,
    /// Box height range `[min, max]` (m).
    pub grid_height_range: [f64; 2],
    /// Width of the flat platform at the tile centre (m).
    #[serde(default = "default_platform_width")]
    pub platform_width: f64,
    /// Leave gaps instead of boxes below the sampled height.
    #[serde(default)]
    pub holes: bool,
}

/// Height-field terrain with uniformly sampled noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HfRandomUniformTerrain {
    pub proportion: f64,
    /// Noise height range `[min, max]` (m).
    pub noise_range: [f64; 2],
    /// Quantization step of sampled heights (m).
    pub noise_step: f64,
    /// Flat margin inside the tile edge (m).
    #[serde(default)]
    pub border_width: f64,
    /// Spacing at which noise is sampled before interpolation (m).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downsampled_scale: Option<f64>,
}

/// One sub-terrain generator and its selection weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubTerrainSpec {
    MeshRandomGrid(MeshRandomGridTerrain),
    HfRandomUniform(HfRandomUniformTerrain),
}

impl SubTerrainSpec {
    pub const fn proportion(&self) -> f64 {
        match self {
            Self::MeshRandomGrid(t) => t.proportion,
            Self::HfRandomUniform(t) => t.proportion,
        }
    }

    /// Generator kind, as written in the `type` tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MeshRandomGrid(_) => "mesh_random_grid",
            Self::HfRandomUniform(_) => "hf_random_uniform",
        }
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        let p = self.proportion();
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::invalid(
                format!("sub_terrains.{name}.proportion"),
                format!("{p} is not in [0, 1]"),
            ));
        }
        let (field, [low, high]) = match self {
            Self::MeshRandomGrid(t) => ("grid_height_range", t.grid_height_range),
            Self::HfRandomUniform(t) => ("noise_range", t.noise_range),
        };
        if low.is_nan() || high.is_nan() || low > high {
            return Err(ConfigError::invalid(
                format!("sub_terrains.{name}.{field}"),
                format!("[{low}, {high}] is not an ordered range"),
            ));
        }
        Ok(())
    }
}

impl From<MeshRandomGridTerrain> for SubTerrainSpec {
    fn from(t: MeshRandomGridTerrain) -> Self {
        Self::MeshRandomGrid(t)
    }
}

impl From<HfRandomUniformTerrain> for SubTerrainSpec {
    fn from(t: HfRandomUniformTerrain) -> Self {
        Self::HfRandomUniform(t)
    }
}

// ---------------------------------------------------------------------------
// TerrainGeneratorDescriptor
// ---------------------------------------------------------------------------

/// Parameters handed to the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Resource)]
pub struct TerrainGeneratorDescriptor {
    /// Tile size `[x, y]` (m).
    pub size: [f64; 2],
    /// Flat border around the whole grid (m).
    #[serde(default)]
    pub border_width: f64,
    pub num_rows: u32,
    pub num_cols: u32,
    /// Height-field cell size (m).
    pub horizontal_scale: f64,
    /// Height-field height unit (m).
    pub vertical_scale: f64,
    /// Slopes steeper than this are made vertical when meshing height fields.
    #[serde(default = "default_slope_threshold")]
    pub slope_threshold: f64,
    #[serde(default)]
    pub use_cache: bool,
    /// Increase difficulty with the row index instead of sampling it.
    #[serde(default)]
    pub curriculum: bool,
    #[serde(default = "default_difficulty_range")]
    pub difficulty_range: [f64; 2],
    /// Generator seed. 32 bits so it stays a valid TOML integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Sub-terrain generators by name, in declaration order.
    pub sub_terrains: OrderedMap<SubTerrainSpec>,
}

impl TerrainGeneratorDescriptor {
    pub fn sub_terrain(&self, name: &str) -> Option<&SubTerrainSpec> {
        self.sub_terrains.get(name)
    }

    pub const fn num_tiles(&self) -> u64 {
        self.num_rows as u64 * self.num_cols as u64
    }

    /// Extent of the generated ground `[x, y]` including the border (m).
    pub fn total_extent(&self) -> [f64; 2] {
        [
            f64::from(self.num_rows).mul_add(self.size[0], 2.0 * self.border_width),
            f64::from(self.num_cols).mul_add(self.size[1], 2.0 * self.border_width),
        ]
    }

    /// Sum of all declared proportions.
    pub fn total_proportion(&self) -> f64 {
        self.sub_terrains.values().map(SubTerrainSpec::proportion).sum()
    }

    /// Selection mass not assigned to any sub-terrain.
    pub fn unassigned_proportion(&self) -> f64 {
        (1.0 - self.total_proportion()).max(0.0)
    }

    /// Proportions rescaled to sum to one. All zero if nothing is assigned.
    ///
    /// This is one reading of partial allocation; the descriptor itself is
    /// never rewritten.
    pub fn normalized_proportions(&self) -> OrderedMap<f64> {
        let total = self.total_proportion();
        self.sub_terrains
            .iter()
            .map(|(name, spec)| {
                let share = if total > 0.0 {
                    spec.proportion() / total
                } else {
                    0.0
                };
                (name, share)
            })
            .collect()
    }
}

impl Validate for TerrainGeneratorDescriptor {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(ConfigError::invalid(
                "num_rows/num_cols",
                format!("{}x{} grid has no tiles", self.num_rows, self.num_cols),
            ));
        }
        if !self.size.iter().all(|s| *s > 0.0) {
            return Err(ConfigError::invalid(
                "size",
                format!("{:?} must be positive", self.size),
            ));
        }
        let [low, high] = self.difficulty_range;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(ConfigError::invalid(
                "difficulty_range",
                format!("[{low}, {high}] is not an ordered range within [0, 1]"),
            ));
        }

        for (name, spec) in self.sub_terrains.iter() {
            spec.check(name)?;
        }

        let total = self.total_proportion();
        if total > 1.0 + PROPORTION_TOLERANCE {
            return Err(ConfigError::ProportionOverflow(total));
        }
        if total < 1.0 - PROPORTION_TOLERANCE {
            tracing::warn!(
                total,
                unassigned = self.unassigned_proportion(),
                "sub-terrain proportions do not cover all tiles"
            );
        }
        tracing::debug!(sub_terrains = self.sub_terrains.len(), "terrain descriptor is valid");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use legwheel_core::config::Format;
    use approx::assert_relative_eq;

    fn grid(proportion: f64) -> SubTerrainSpec {
        MeshRandomGridTerrain {
            proportion,
            grid_width: 0.45,
            grid_height_range: [0.03, 0.05],
            platform_width: 2.0,
            holes: false,
        }
        .into()
    }

    fn rough(proportion: f64) -> SubTerrainSpec {
        HfRandomUniformTerrain {
            proportion,
            noise_range: [0.02, 0.06],
            noise_step: 0.02,
            border_width: 0.25,
            downsampled_scale: None,
        }
        .into()
    }

    fn descriptor(sub_terrains: OrderedMap<SubTerrainSpec>) -> TerrainGeneratorDescriptor {
        TerrainGeneratorDescriptor {
            size: [8.0, 8.0],
            border_width: 20.0,
            num_rows: 10,
            num_cols: 20,
            horizontal_scale: 0.1,
            vertical_scale: 0.005,
            slope_threshold: 0.75,
            use_cache: false,
            curriculum: false,
            difficulty_range: [0.0, 1.0],
            seed: None,
            sub_terrains,
        }
    }

    #[test]
    fn derived_geometry() {
        let d = descriptor(OrderedMap::new());
        assert_eq!(d.num_tiles(), 200);
        let [x, y] = d.total_extent();
        assert_relative_eq!(x, 120.0);
        assert_relative_eq!(y, 200.0);
    }

    #[test]
    fn partial_allocation_is_kept_raw() {
        let d = descriptor(OrderedMap::from([("boxes", grid(0.2)), ("rough", rough(0.2))]));
        assert_relative_eq!(d.total_proportion(), 0.4);
        assert_relative_eq!(d.unassigned_proportion(), 0.6);
        let n = d.normalized_proportions();
        assert_relative_eq!(*n.get("boxes").unwrap(), 0.5);
        assert_relative_eq!(*n.get("rough").unwrap(), 0.5);
        assert_relative_eq!(d.sub_terrain("boxes").unwrap().proportion(), 0.2);
        d.validate().unwrap();
    }

    #[test]
    fn normalized_with_no_mass() {
        let d = descriptor(OrderedMap::from([("boxes", grid(0.0))]));
        assert_eq!(d.normalized_proportions().get("boxes"), Some(&0.0));
        assert!(d.normalized_proportions().get("rough").is_none());
    }

    #[test]
    fn overflowing_proportions_rejected() {
        let d = descriptor(OrderedMap::from([("boxes", grid(0.7)), ("rough", rough(0.4))]));
        assert!(matches!(
            d.validate().unwrap_err(),
            ConfigError::ProportionOverflow(total) if (total - 1.1).abs() < 1e-9
        ));
    }

    #[test]
    fn full_allocation_accepted() {
        let d = descriptor(OrderedMap::from([
            ("a", grid(0.1)),
            ("b", rough(0.2)),
            ("c", grid(0.7)),
        ]));
        d.validate().unwrap();
        assert!(d.unassigned_proportion() < 1e-9);
    }

    #[test]
    fn malformed_values_rejected() {
        let mut d = descriptor(OrderedMap::from([("boxes", grid(-0.1))]));
        assert!(d.validate().is_err());

        d.sub_terrains = OrderedMap::from([("rough", rough(0.2))]);
        if let Some(SubTerrainSpec::HfRandomUniform(t)) = d.sub_terrains.get_mut("rough") {
            t.noise_range = [0.06, 0.02];
        }
        assert!(matches!(
            d.validate().unwrap_err(),
            ConfigError::InvalidValue { ref field, .. } if field == "sub_terrains.rough.noise_range"
        ));

        let mut d = descriptor(OrderedMap::new());
        d.num_cols = 0;
        assert!(d.validate().is_err());

        let mut d = descriptor(OrderedMap::new());
        d.size = [8.0, 0.0];
        assert!(d.validate().is_err());

        let mut d = descriptor(OrderedMap::new());
        d.difficulty_range = [0.8, 0.2];
        assert!(d.validate().is_err());
    }

    #[test]
    fn largest_seed_exports_as_toml() {
        let mut d = descriptor(OrderedMap::from([("boxes", grid(0.2))]));
        d.seed = Some(u32::MAX);
        let text = Format::Toml.serialize(&d).unwrap();
        assert!(text.contains("seed = 4294967295"));
        let back: TerrainGeneratorDescriptor = Format::Toml.parse(&text).unwrap();
        assert_eq!(back.seed, Some(u32::MAX));

        let err = Format::Toml
            .parse::<TerrainGeneratorDescriptor>(&text.replace("4294967295", "4294967296"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn kind_tags() {
        assert_eq!(grid(0.2).kind(), "mesh_random_grid");
        assert_eq!(rough(0.2).kind(), "hf_random_uniform");
        let json = serde_json::to_value(rough(0.2)).unwrap();
        assert_eq!(json["type"], "hf_random_uniform");
        assert!(json.get("downsampled_scale").is_none());
    }

    #[test]
    fn sub_terrain_json_defaults() {
        let spec: SubTerrainSpec = serde_json::from_str(
            r#"{"type": "mesh_random_grid", "proportion": 0.3, "grid_width": 0.5, "grid_height_range": [0.0, 0.1]}"#,
        )
        .unwrap();
        let SubTerrainSpec::MeshRandomGrid(t) = spec else {
            panic!("wrong variant");
        };
        assert_relative_eq!(t.platform_width, 1.0);
        assert!(!t.holes);
    }
}
