//! Bevy integration: expose the descriptors as resources.

use bevy::prelude::*;

use crate::articulation::ArticulationDescriptor;
use crate::robots::wheel_leg_humanoid;
use crate::terrain::TerrainGeneratorDescriptor;
use crate::terrains::drivable_terrains;

/// Inserts an [`ArticulationDescriptor`] and a [`TerrainGeneratorDescriptor`]
/// as resources. Defaults to the wheel-leg humanoid on drivable terrain.
#[derive(Clone, Debug)]
pub struct LegwheelAssetsPlugin {
    pub robot: ArticulationDescriptor,
    pub terrain: TerrainGeneratorDescriptor,
}

impl Default for LegwheelAssetsPlugin {
    fn default() -> Self {
        Self {
            robot: wheel_leg_humanoid(),
            terrain: drivable_terrains(),
        }
    }
}

impl Plugin for LegwheelAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.robot.clone())
            .insert_resource(self.terrain.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_inserts_descriptors() {
        let mut app = App::new();
        app.add_plugins(LegwheelAssetsPlugin::default());

        let robot = app.world().resource::<ArticulationDescriptor>();
        assert_eq!(robot.actuators.len(), 5);
        let terrain = app.world().resource::<TerrainGeneratorDescriptor>();
        assert_eq!(terrain.num_rows, 10);
    }

    #[test]
    fn plugin_accepts_custom_terrain() {
        let mut terrain = drivable_terrains();
        terrain.seed = Some(7);
        let mut app = App::new();
        app.add_plugins(LegwheelAssetsPlugin {
            terrain,
            ..LegwheelAssetsPlugin::default()
        });
        assert_eq!(
            app.world().resource::<TerrainGeneratorDescriptor>().seed,
            Some(7)
        );
    }
}
