//! Hex tile grid: layout, noise heights, material bands, island masking and
//! tree scattering.
//!
//! [`GridGenerator`] owns the generation pass and talks to the host through
//! three collaborator traits: [`TerrainScene`] for scene nodes and meshes,
//! [`PropPlacer`] for trees, and [`GroundProbe`](crate::probe::GroundProbe) for
//! mask inclusion. [`HexGridPlugin`] wires Bevy implementations of all three.

mod entities;
mod generator;
mod systems;

pub use entities::{GridMaterials, GridState, HexGridRoot, HexTile, MaskTile, RegenerateGrid};
pub use generator::{GenerationPhase, GridGenerator, GridReport, Tile};

use bevy::prelude::*;

use crate::hex_mesh::{HexSpec, PrismMesh};
use crate::layout::{GridCoord, HexLayout, Orientation};
use crate::math;

/// X/Z scale applied to the mask tile once every cell is placed.
pub const MASK_SCALE: Vec3 = Vec3::new(1.05, 1.0, 1.05);

/// Height above the water level from which mask probes start.
pub const PROBE_CLEARANCE: f32 = 1.0;

/// Everything one generation pass reads. Immutable for the duration of the pass.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct GridConfig {
    /// Number of columns (along `+X`).
    pub columns: u32,
    /// Number of rows (along `-Z`).
    pub rows: u32,
    /// Outer radius of every tile.
    pub outer_size: f32,
    /// Inner radius of every tile; `0` for solid tiles.
    pub inner_size: f32,
    /// Height of a tile whose noise sample is `1.0`.
    pub max_height: f32,
    /// Pointy-top or flat-top tiles.
    pub orientation: Orientation,
    /// Ordered band colours; normalized height `h` selects `floor(h · len)`.
    pub material_bands: Vec<Color>,
    /// Extra gap between adjacent tile centres.
    pub grid_offset: f32,
    /// Spatial divisor for noise sampling. Must be positive.
    pub noise_detail: f32,
    /// Seed for the height noise and the tree coin flips.
    pub noise_seed: u32,
    /// Island mask settings.
    pub mask: MaskSettings,
    /// Tree scattering settings.
    pub trees: TreeSettings,
}

/// Circular-island mask: cells whose probe misses the mask prism are dropped.
#[derive(Clone, Debug, Reflect)]
pub struct MaskSettings {
    /// Whether masking runs at all.
    pub enabled: bool,
    /// Outer radius of the mask prism; also the grid offset.
    pub radius: f32,
    /// Height of the mask prism (the water surface).
    pub water_level: f32,
    /// Colour of the water material.
    pub water_color: Color,
}

/// Height band within which trees are placed, one per qualifying tile.
#[derive(Clone, Debug, Reflect)]
pub struct TreeSettings {
    /// Lowest normalized height that gets a tree (inclusive).
    pub min_range: f32,
    /// Highest normalized height that gets a tree (inclusive).
    pub max_range: f32,
    /// Chance that a qualifying tile actually gets one.
    pub probability: f32,
    /// What gets instantiated on each qualifying tile.
    pub prefab: TreePrefab,
}

/// Cone tree instantiated by the [`PropPlacer`]; its base sits on the tile top.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct TreePrefab {
    /// Cone base radius.
    pub radius: f32,
    /// Cone height.
    pub height: f32,
    /// Foliage colour.
    pub color: Color,
}

impl Default for TreePrefab {
    fn default() -> Self {
        Self {
            radius: 0.2,
            height: 0.7,
            color: Color::srgb(0.13, 0.42, 0.16),
        }
    }
}

impl TreeSettings {
    /// Whether a normalized height lies within `[min_range, max_range]`.
    pub fn in_band(&self, normalized_height: f32) -> bool {
        normalized_height >= self.min_range && normalized_height <= self.max_range
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 24,
            rows: 28,
            outer_size: 1.0,
            inner_size: 0.0,
            max_height: 4.0,
            orientation: Orientation::PointyTop,
            material_bands: vec![
                Color::srgb(0.86, 0.78, 0.55),
                Color::srgb(0.36, 0.62, 0.27),
                Color::srgb(0.20, 0.45, 0.20),
                Color::srgb(0.48, 0.45, 0.42),
                Color::srgb(0.95, 0.95, 0.97),
            ],
            grid_offset: 0.0,
            noise_detail: 6.0,
            noise_seed: 42,
            mask: MaskSettings {
                enabled: false,
                radius: 20.0,
                water_level: 0.5,
                water_color: Color::srgba(0.12, 0.35, 0.65, 0.85),
            },
            trees: TreeSettings {
                min_range: 0.3,
                max_range: 0.8,
                probability: 1.0,
                prefab: TreePrefab::default(),
            },
        }
    }
}

impl GridConfig {
    /// Rejects configurations that would only fail, or silently misbehave, mid-pass.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.material_bands.is_empty() {
            return Err(GridError::EmptyMaterialBands);
        }
        if self.noise_detail <= 0.0 || self.noise_detail.is_nan() {
            return Err(GridError::NonPositiveNoiseDetail(self.noise_detail));
        }
        for radius in [self.inner_size, self.outer_size] {
            if radius < 0.0 {
                return Err(GridError::NegativeRadius(radius));
            }
        }
        if self.inner_size > self.outer_size {
            return Err(GridError::InvertedRadii {
                inner: self.inner_size,
                outer: self.outer_size,
            });
        }
        if self.mask.radius < 0.0 {
            return Err(GridError::NegativeMaskRadius(self.mask.radius));
        }
        if !(0.0..=1.0).contains(&self.trees.probability) {
            return Err(GridError::InvalidTreeProbability(self.trees.probability));
        }
        Ok(())
    }

    /// Layout used to place cell centres.
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.orientation, self.outer_size + self.grid_offset)
    }

    /// Shift applied to every cell so the grid sits under the mask.
    pub fn grid_shift(&self) -> Vec3 {
        Vec3::new(-self.mask.radius, 0.0, self.mask.radius)
    }

    /// World position of a cell centre, shift included, at `y = 0`.
    pub fn cell_position(&self, coord: GridCoord) -> Vec3 {
        self.layout().world_position(coord) + self.grid_shift()
    }

    /// Centre of the shifted grid's bounding box, where the mask tile sits.
    ///
    /// Not the grid root origin: an origin-anchored mask only covers the grid
    /// when it spans about `2 · mask.radius`, so smaller grids would lose most cells.
    pub fn mask_translation(&self) -> Vec3 {
        let centre = self
            .layout()
            .bounds(self.columns, self.rows)
            .map_or(Vec2::ZERO, |rect| rect.center());
        Vec3::new(centre.x, 0.0, centre.y) + self.grid_shift()
    }

    /// Prism of the mask tile: solid, `mask.radius` wide, `water_level` tall.
    pub fn mask_spec(&self) -> HexSpec {
        HexSpec::new(0.0, self.mask.radius, self.mask.water_level, self.orientation)
    }

    /// Prism of a grid tile at `height`.
    pub fn tile_spec(&self, height: f32) -> HexSpec {
        HexSpec::new(self.inner_size, self.outer_size, height, self.orientation)
    }
}

/// Configuration problems surfaced to the caller instead of being clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// No material bands to choose from.
    #[error("material band list is empty")]
    EmptyMaterialBands,
    /// Noise detail must be strictly positive.
    #[error("noise detail must be positive, got {0}")]
    NonPositiveNoiseDetail(f32),
    /// Inner radius larger than outer radius.
    #[error("inner size {inner} exceeds outer size {outer}")]
    InvertedRadii {
        /// Configured inner radius.
        inner: f32,
        /// Configured outer radius.
        outer: f32,
    },
    /// A tile radius below zero.
    #[error("tile radius must not be negative, got {0}")]
    NegativeRadius(f32),
    /// Mask radius below zero.
    #[error("mask radius must not be negative, got {0}")]
    NegativeMaskRadius(f32),
    /// Tree probability outside `[0, 1]`.
    #[error("tree probability must lie in [0, 1], got {0}")]
    InvalidTreeProbability(f32),
    /// Height sampler returned a value outside `[0, 1]` (or NaN).
    #[error("normalized height {0} outside [0, 1]")]
    HeightOutOfRange(f32),
    /// Normalized height mapped past the end of the band list.
    #[error("material band index {index} out of range for {bands} band(s)")]
    MaterialBandOutOfRange {
        /// Computed band index.
        index: usize,
        /// Length of the band list.
        bands: usize,
    },
}

/// Band selected by `floor(lerp(0, bands, normalized_height))`.
///
/// A height of exactly `1.0` maps one past the last band and is reported, not clamped.
/// Heights outside `[0, 1]`, NaN included, are rejected.
pub fn band_index(normalized_height: f32, bands: usize) -> Result<usize, GridError> {
    if !(0.0..=1.0).contains(&normalized_height) {
        return Err(GridError::HeightOutOfRange(normalized_height));
    }
    let index = math::lerp(0.0, bands as f32, normalized_height).floor() as usize;
    if index >= bands {
        return Err(GridError::MaterialBandOutOfRange { index, bands });
    }
    Ok(index)
}

/// Material a scene node should render with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    /// Index into [`GridConfig::material_bands`].
    Band(usize),
    /// The mask's water material.
    Water,
}

/// Role of a scene node, so hosts can tag tiles and the mask differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A grid tile.
    Tile,
    /// The water mask prism.
    Mask,
}

/// Host scene operations the generator needs. Nodes are created under the grid root.
pub trait TerrainScene {
    /// Handle to a scene node.
    type Node: Copy;

    /// Creates an empty node able to hold a mesh and a material.
    fn create_node(&mut self, name: &str, kind: NodeKind) -> Self::Node;
    /// Removes a node; immediate or deferred is up to the host.
    fn destroy_node(&mut self, node: Self::Node);
    /// Sets the node's position relative to the grid root.
    fn set_translation(&mut self, node: Self::Node, translation: Vec3);
    /// Sets the node's scale.
    fn set_scale(&mut self, node: Self::Node, scale: Vec3);
    /// Uploads vertex, index, UV and normal buffers to the node.
    fn upload_mesh(&mut self, node: Self::Node, mesh: &PrismMesh);
    /// Assigns a material to the node's renderer.
    fn assign_material(&mut self, node: Self::Node, material: MaterialSlot);
}

/// Host-side tree instantiation.
pub trait PropPlacer {
    /// Handle to a placed prop.
    type Instance: Copy;

    /// Instantiates `prefab` at `position` (world space, on top of its tile).
    fn place(&mut self, prefab: &TreePrefab, name: &str, position: Vec3) -> Self::Instance;
    /// Removes a previously placed prop.
    fn remove(&mut self, instance: Self::Instance);
}

/// Hex grid generation with Bevy scene, prop and probe collaborators.
pub struct HexGridPlugin(pub GridConfig);

impl Plugin for HexGridPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GridConfig>()
            .register_type::<HexGridRoot>()
            .insert_resource(self.0.clone())
            .init_resource::<GridState>()
            .add_message::<RegenerateGrid>()
            .add_systems(Startup, systems::setup_grid)
            .add_systems(Update, systems::request_regeneration)
            .add_systems(
                Update,
                systems::regenerate_grid.after(systems::request_regeneration),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GridConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_bands_rejected() {
        let cfg = GridConfig {
            material_bands: vec![],
            ..default()
        };
        assert_eq!(cfg.validate(), Err(GridError::EmptyMaterialBands));
    }

    #[test]
    fn zero_noise_detail_rejected() {
        let cfg = GridConfig {
            noise_detail: 0.0,
            ..default()
        };
        assert_eq!(cfg.validate(), Err(GridError::NonPositiveNoiseDetail(0.0)));
    }

    #[test]
    fn inverted_radii_rejected() {
        let cfg = GridConfig {
            inner_size: 2.0,
            outer_size: 1.0,
            ..default()
        };
        assert_eq!(
            cfg.validate(),
            Err(GridError::InvertedRadii {
                inner: 2.0,
                outer: 1.0
            })
        );
    }

    #[test]
    fn negative_radii_rejected() {
        let cfg = GridConfig {
            inner_size: -0.5,
            ..default()
        };
        assert_eq!(cfg.validate(), Err(GridError::NegativeRadius(-0.5)));

        let mut cfg = GridConfig::default();
        cfg.mask.radius = -1.0;
        assert_eq!(cfg.validate(), Err(GridError::NegativeMaskRadius(-1.0)));
    }

    #[test]
    fn tree_probability_outside_unit_interval_rejected() {
        let mut cfg = GridConfig::default();
        cfg.trees.probability = 1.5;
        assert_eq!(
            cfg.validate(),
            Err(GridError::InvalidTreeProbability(1.5))
        );
    }

    #[test]
    fn band_index_splits_unit_interval_evenly() {
        assert_eq!(band_index(0.0, 4), Ok(0));
        assert_eq!(band_index(0.24, 4), Ok(0));
        assert_eq!(band_index(0.25, 4), Ok(1));
        assert_eq!(band_index(0.99, 4), Ok(3));
    }

    #[test]
    fn band_index_at_full_height_is_reported() {
        assert_eq!(
            band_index(1.0, 3),
            Err(GridError::MaterialBandOutOfRange { index: 3, bands: 3 })
        );
    }

    #[test]
    fn band_index_rejects_heights_outside_unit_interval() {
        assert_eq!(
            band_index(-0.3, 3),
            Err(GridError::HeightOutOfRange(-0.3))
        );
        assert_eq!(band_index(1.2, 3), Err(GridError::HeightOutOfRange(1.2)));
        assert!(matches!(
            band_index(f32::NAN, 3),
            Err(GridError::HeightOutOfRange(h)) if h.is_nan()
        ));
    }

    #[test]
    fn tree_band_is_inclusive() {
        let trees = TreeSettings {
            min_range: 0.3,
            max_range: 0.8,
            probability: 1.0,
            prefab: TreePrefab::default(),
        };
        assert!(trees.in_band(0.3));
        assert!(trees.in_band(0.8));
        assert!(!trees.in_band(0.29));
        assert!(!trees.in_band(0.81));
    }

    #[test]
    fn cells_are_shifted_by_mask_radius() {
        let mut cfg = GridConfig::default();
        cfg.mask.radius = 5.0;
        let coord = GridCoord::new(2, 3);
        let unshifted = cfg.layout().world_position(coord);
        assert_eq!(cfg.cell_position(coord), unshifted + Vec3::new(-5.0, 0.0, 5.0));
    }

    #[test]
    fn grid_offset_widens_spacing_only() {
        let cfg = GridConfig {
            grid_offset: 0.5,
            ..default()
        };
        assert!((cfg.layout().size - 1.5).abs() < 1e-6);
        assert_eq!(cfg.tile_spec(2.0).outer_radius, 1.0);
    }

    #[test]
    fn mask_sits_at_grid_centre() {
        let cfg = GridConfig {
            columns: 3,
            rows: 3,
            ..default()
        };
        let centre = cfg.mask_translation();
        // Leftmost cell sits on the unshifted odd row, rightmost on an even row.
        let left = cfg.cell_position(GridCoord::new(0, 1));
        let right = cfg.cell_position(GridCoord::new(2, 0));
        let top = cfg.cell_position(GridCoord::new(0, 0));
        let bottom = cfg.cell_position(GridCoord::new(0, 2));
        let expected = Vec3::new((left.x + right.x) / 2.0, 0.0, (top.z + bottom.z) / 2.0);
        assert!(
            (centre - expected).length() < 1e-4,
            "centre {centre:?}, expected {expected:?}"
        );
    }

    #[test]
    fn mask_spec_is_solid_water_prism() {
        let cfg = GridConfig::default();
        let spec = cfg.mask_spec();
        assert_eq!(spec.inner_radius, 0.0);
        assert_eq!(spec.outer_radius, cfg.mask.radius);
        assert_eq!(spec.height, cfg.mask.water_level);
    }

    #[test]
    fn error_messages_are_readable() {
        let err = GridError::MaterialBandOutOfRange { index: 2, bands: 2 };
        assert_eq!(
            err.to_string(),
            "material band index 2 out of range for 2 band(s)"
        );
    }
}
