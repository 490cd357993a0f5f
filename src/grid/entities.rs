use bevy::prelude::*;

use super::GridGenerator;

/// Parent of every tile, tree and mask entity the generator spawns.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct HexGridRoot;

/// Marks a spawned hex tile.
#[derive(Component)]
pub struct HexTile;

/// Marks the water mask prism.
#[derive(Component)]
pub struct MaskTile;

/// Generator state plus the entities it currently owns.
#[derive(Resource, Default)]
pub struct GridState {
    /// Clear-and-rebuild generator keyed by entity.
    pub generator: GridGenerator<Entity, Entity>,
    /// Root entity all generated nodes are parented to.
    pub root: Option<Entity>,
}

/// Shared handles used while spawning tiles and trees.
#[derive(Resource)]
pub struct GridMaterials {
    /// One material per height band, in band order.
    pub bands: Vec<Handle<StandardMaterial>>,
    /// Translucent material for the mask tile.
    pub water: Handle<StandardMaterial>,
    /// Cone built from the configured tree prefab.
    pub tree_mesh: Handle<Mesh>,
    /// Prefab foliage colour.
    pub tree_material: Handle<StandardMaterial>,
}

/// Requests a fresh generation pass.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct RegenerateGrid;
