//! Integration test: the drivable terrain preset.

use approx::assert_relative_eq;
use legwheel_assets::prelude::*;
use legwheel_assets::{HfRandomUniformTerrain, MeshRandomGridTerrain};
use legwheel_core::config;

#[test]
fn grid_layout() {
    let t = drivable_terrains();
    assert_eq!(t.num_rows, 10);
    assert_eq!(t.num_cols, 20);
    assert_eq!(t.size, [8.0, 8.0]);
    assert_relative_eq!(t.border_width, 20.0);
    assert_relative_eq!(t.horizontal_scale, 0.1);
    assert_relative_eq!(t.vertical_scale, 0.005);
    assert_relative_eq!(t.slope_threshold, 0.75);
    assert!(!t.use_cache);
    assert!(!t.curriculum);
    assert!(t.seed.is_none());
}

#[test]
fn sub_terrains() {
    let t = drivable_terrains();
    assert_eq!(
        t.sub_terrains.keys().collect::<Vec<_>>(),
        ["boxes", "random_rough"]
    );

    let Some(SubTerrainSpec::MeshRandomGrid(boxes)) = t.sub_terrain("boxes") else {
        panic!("boxes should be a mesh random grid");
    };
    assert_eq!(
        *boxes,
        MeshRandomGridTerrain {
            proportion: 0.2,
            grid_width: 0.45,
            grid_height_range: [0.03, 0.05],
            platform_width: 2.0,
            holes: false,
        }
    );

    let Some(SubTerrainSpec::HfRandomUniform(rough)) = t.sub_terrain("random_rough") else {
        panic!("random_rough should be a uniform height field");
    };
    assert_eq!(
        *rough,
        HfRandomUniformTerrain {
            proportion: 0.2,
            noise_range: [0.02, 0.06],
            noise_step: 0.02,
            border_width: 0.25,
            downsampled_scale: None,
        }
    );
}

#[test]
fn proportions_are_partial() {
    let t = drivable_terrains();
    assert_relative_eq!(t.total_proportion(), 0.4, epsilon = 1e-12);
    assert!(t.total_proportion() <= 1.0);
    assert_relative_eq!(t.unassigned_proportion(), 0.6, epsilon = 1e-12);
    t.validate().unwrap();
}

fn assert_bitwise_eq(a: &TerrainGeneratorDescriptor, b: &TerrainGeneratorDescriptor) {
    assert_eq!(a.size.map(f64::to_bits), b.size.map(f64::to_bits));
    assert_eq!(a.border_width.to_bits(), b.border_width.to_bits());
    assert_eq!(a.horizontal_scale.to_bits(), b.horizontal_scale.to_bits());
    assert_eq!(a.vertical_scale.to_bits(), b.vertical_scale.to_bits());
    assert_eq!(a.slope_threshold.to_bits(), b.slope_threshold.to_bits());
    for ((na, sa), (nb, sb)) in a.sub_terrains.iter().zip(b.sub_terrains.iter()) {
        assert_eq!(na, nb);
        assert_eq!(sa.proportion().to_bits(), sb.proportion().to_bits());
    }
    assert_eq!(a, b);
}

#[test]
fn toml_round_trip_is_bitwise() {
    let t = drivable_terrains();
    let text = Format::Toml.serialize(&t).unwrap();
    let back: TerrainGeneratorDescriptor = Format::Toml.parse(&text).unwrap();
    assert_bitwise_eq(&t, &back);
}

#[test]
fn json_round_trip_is_bitwise() {
    let t = drivable_terrains();
    let text = Format::Json.serialize(&t).unwrap();
    let back: TerrainGeneratorDescriptor = Format::Json.parse(&text).unwrap();
    assert_bitwise_eq(&t, &back);
}

#[test]
fn hand_written_toml() {
    let text = r#"
        size = [8.0, 8.0]
        num_rows = 2
        num_cols = 3
        horizontal_scale = 0.1
        vertical_scale = 0.005

        [sub_terrains.boxes]
        type = "mesh_random_grid"
        proportion = 0.5
        grid_width = 0.45
        grid_height_range = [0.03, 0.05]

        [sub_terrains.flat_noise]
        type = "hf_random_uniform"
        proportion = 0.5
        noise_range = [0.0, 0.01]
        noise_step = 0.005
    "#;
    let t: TerrainGeneratorDescriptor = Format::Toml.parse(text).unwrap();
    assert_eq!(t.num_tiles(), 6);
    assert_relative_eq!(t.border_width, 0.0);
    assert_relative_eq!(t.slope_threshold, 0.75);
    assert_eq!(t.difficulty_range, [0.0, 1.0]);
    assert_relative_eq!(t.unassigned_proportion(), 0.0);
    assert_eq!(t.sub_terrain("flat_noise").unwrap().kind(), "hf_random_uniform");
}

#[test]
fn overfull_toml_is_rejected() {
    let text = Format::Toml
        .serialize(&drivable_terrains())
        .unwrap()
        .replace("proportion = 0.2", "proportion = 0.6");
    let err = Format::Toml
        .parse::<TerrainGeneratorDescriptor>(&text)
        .unwrap_err();
    assert!(matches!(err, ConfigError::ProportionOverflow(_)), "{err}");
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drivable.json");
    config::save(&drivable_terrains(), &path).unwrap();
    let back: TerrainGeneratorDescriptor = config::load(&path).unwrap();
    assert_eq!(back, drivable_terrains());
}
