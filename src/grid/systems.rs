use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::entities::{GridMaterials, GridState, HexGridRoot, HexTile, MaskTile, RegenerateGrid};
use super::{GridConfig, MaterialSlot, NodeKind, PropPlacer, TerrainScene, TreePrefab};
use crate::hex_mesh::{PrismMesh, build_prism};
use crate::noise_sampler::PerlinSampler;
use crate::probe::PrismProbe;

/// Spawns the grid root and shared materials, then asks for the first pass.
pub fn setup_grid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: ResMut<GridState>,
    mut requests: MessageWriter<RegenerateGrid>,
    cfg: Res<GridConfig>,
) {
    let root = commands
        .spawn((
            HexGridRoot,
            Name::new("HexGrid"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();
    state.root = Some(root);

    commands.insert_resource(GridMaterials {
        bands: band_materials(&cfg, &mut materials),
        water: materials.add(StandardMaterial {
            base_color: cfg.mask.water_color,
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.1,
            ..default()
        }),
        tree_mesh: meshes.add(tree_cone(&cfg.trees.prefab)),
        tree_material: materials.add(tree_material(&cfg.trees.prefab)),
    });

    requests.write(RegenerateGrid);
}

/// Sends [`RegenerateGrid`] when R is pressed.
pub fn request_regeneration(
    keys: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<RegenerateGrid>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        info!("Regeneration requested");
        requests.write(RegenerateGrid);
    }
}

/// Runs a generation pass on request or whenever [`GridConfig`] changes.
#[allow(clippy::too_many_arguments)]
pub fn regenerate_grid(
    commands: Commands,
    prop_commands: Commands,
    mut requests: MessageReader<RegenerateGrid>,
    cfg: Res<GridConfig>,
    mut state: ResMut<GridState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    grid_materials: Option<ResMut<GridMaterials>>,
) {
    let requested = requests.read().count() > 0;
    if !requested && !cfg.is_changed() {
        return;
    }
    let Some(mut grid_materials) = grid_materials else {
        return;
    };
    let Some(root) = state.root else {
        warn!("Grid root missing, skipping regeneration");
        return;
    };

    grid_materials.bands = band_materials(&cfg, &mut materials);
    grid_materials.tree_mesh = meshes.add(tree_cone(&cfg.trees.prefab));
    grid_materials.tree_material = materials.add(tree_material(&cfg.trees.prefab));
    if let Some(water) = materials.get_mut(&grid_materials.water) {
        water.base_color = cfg.mask.water_color;
    }

    let noise = PerlinSampler::new(cfg.noise_seed);
    let probe = PrismProbe::new(&build_prism(&cfg.mask_spec()), cfg.mask_translation());

    let mut scene = BevyScene {
        commands,
        meshes: &mut meshes,
        materials: &grid_materials,
        root,
        transforms: HashMap::new(),
    };
    let mut props = BevyProps {
        commands: prop_commands,
        materials: &grid_materials,
        root,
    };

    if let Err(err) = state
        .generator
        .update_grid(&cfg, &mut scene, &mut props, &noise, &probe)
    {
        error!("Grid generation failed: {err}");
    }
}

fn band_materials(
    cfg: &GridConfig,
    materials: &mut Assets<StandardMaterial>,
) -> Vec<Handle<StandardMaterial>> {
    cfg.material_bands
        .iter()
        .map(|&color| {
            materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.8,
                ..default()
            })
        })
        .collect()
}

fn tree_cone(prefab: &TreePrefab) -> Cone {
    Cone::new(prefab.radius, prefab.height)
}

fn tree_material(prefab: &TreePrefab) -> StandardMaterial {
    StandardMaterial {
        base_color: prefab.color,
        perceptual_roughness: 0.9,
        ..default()
    }
}

/// Tile and mask nodes as child entities of the grid root.
struct BevyScene<'w, 's, 'a> {
    commands: Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a GridMaterials,
    root: Entity,
    /// Transforms written this pass, so translation and scale compose.
    transforms: HashMap<Entity, Transform>,
}

impl TerrainScene for BevyScene<'_, '_, '_> {
    type Node = Entity;

    fn create_node(&mut self, name: &str, kind: NodeKind) -> Entity {
        let mut node = self.commands.spawn((
            Name::new(name.to_string()),
            Transform::default(),
            Visibility::default(),
        ));
        match kind {
            NodeKind::Tile => node.insert(HexTile),
            NodeKind::Mask => node.insert(MaskTile),
        };
        let node = node.id();
        self.commands.entity(self.root).add_child(node);
        node
    }

    fn destroy_node(&mut self, node: Entity) {
        self.transforms.remove(&node);
        self.commands.entity(node).despawn();
    }

    fn set_translation(&mut self, node: Entity, translation: Vec3) {
        let transform = self.transforms.entry(node).or_default();
        transform.translation = translation;
        self.commands.entity(node).insert(*transform);
    }

    fn set_scale(&mut self, node: Entity, scale: Vec3) {
        let transform = self.transforms.entry(node).or_default();
        transform.scale = scale;
        self.commands.entity(node).insert(*transform);
    }

    fn upload_mesh(&mut self, node: Entity, mesh: &PrismMesh) {
        let handle = self.meshes.add(mesh.to_mesh());
        self.commands.entity(node).insert(Mesh3d(handle));
    }

    fn assign_material(&mut self, node: Entity, material: MaterialSlot) {
        let handle = match material {
            MaterialSlot::Band(index) => self.materials.bands.get(index).cloned(),
            MaterialSlot::Water => Some(self.materials.water.clone()),
        };
        match handle {
            Some(handle) => {
                self.commands.entity(node).insert(MeshMaterial3d(handle));
            }
            None => warn!("No material for {material:?}"),
        }
    }
}

/// Prefab cone trees parented to the grid root.
struct BevyProps<'w, 's, 'a> {
    commands: Commands<'w, 's>,
    materials: &'a GridMaterials,
    root: Entity,
}

impl PropPlacer for BevyProps<'_, '_, '_> {
    type Instance = Entity;

    fn place(&mut self, prefab: &TreePrefab, name: &str, position: Vec3) -> Entity {
        // Cone meshes are centred, so lift by half their height to sit on the tile.
        let centre = position + Vec3::Y * (prefab.height / 2.0);
        let tree = self
            .commands
            .spawn((
                Name::new(name.to_string()),
                Mesh3d(self.materials.tree_mesh.clone()),
                MeshMaterial3d(self.materials.tree_material.clone()),
                Transform::from_translation(centre),
            ))
            .id();
        self.commands.entity(self.root).add_child(tree);
        tree
    }

    fn remove(&mut self, instance: Entity) {
        self.commands.entity(instance).despawn();
    }
}
