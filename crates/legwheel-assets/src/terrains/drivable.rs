//! Drivable terrain: low box grids and mild height-field noise a wheeled
//! biped can roll over.
//!
//! Only 0.4 of the tile-selection mass is assigned here. The remaining 0.6
//! is left open on purpose; see [`TerrainGeneratorDescriptor`] for how to read
//! partial allocation.

use legwheel_core::ordered::OrderedMap;

use crate::terrain::{
    HfRandomUniformTerrain, MeshRandomGridTerrain, SubTerrainSpec, TerrainGeneratorDescriptor,
};

/// 10 × 20 grid of 8 m tiles with a 20 m border.
pub fn drivable_terrains() -> TerrainGeneratorDescriptor {
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
        sub_terrains: OrderedMap::from([
            (
                "boxes",
                SubTerrainSpec::MeshRandomGrid(MeshRandomGridTerrain {
                    proportion: 0.2,
                    grid_width: 0.45,
                    grid_height_range: [0.03, 0.05],
                    platform_width: 2.0,
                    holes: false,
                }),
            ),
            (
                "random_rough",
                SubTerrainSpec::HfRandomUniform(HfRandomUniformTerrain {
                    proportion: 0.2,
                    noise_range: [0.02, 0.06],
                    noise_step: 0.02,
                    border_width: 0.25,
                    downsampled_scale: None,
                }),
            ),
        ]),
    }
}
