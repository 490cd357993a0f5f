use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    GridConfig, GridError, MASK_SCALE, MaterialSlot, NodeKind, PROBE_CLEARANCE, PropPlacer,
    TerrainScene, band_index,
};
use crate::hex_mesh::{HexSpec, PrismMesh, build_prism};
use crate::layout::GridCoord;
use crate::noise_sampler::HeightSampler;
use crate::probe::GroundProbe;

/// Where a generation pass currently is.
///
/// `Idle → Clearing → MaskBuilding (mask enabled only) → Placing → Finalizing → Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerationPhase {
    /// No pass running.
    #[default]
    Idle,
    /// Destroying the previous pass's tiles, mask and props.
    Clearing,
    /// Creating the mask prism.
    MaskBuilding,
    /// Visiting grid cells.
    Placing,
    /// Scaling the mask to its final size.
    Finalizing,
}

/// One materialized grid cell.
#[derive(Clone, Debug)]
pub struct Tile<N> {
    /// Cell address.
    pub coord: GridCoord,
    /// World position of the tile's base centre.
    pub position: Vec3,
    /// Prism parameters.
    pub spec: HexSpec,
    /// Noise sample in `[0, 1]`.
    pub normalized_height: f32,
    /// Index into the material band list.
    pub band: usize,
    /// Generated buffers, as uploaded.
    pub mesh: PrismMesh,
    /// Scene node holding the mesh.
    pub node: N,
}

/// Outcome of a successful pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridReport {
    /// Tiles created.
    pub tiles: usize,
    /// Props placed.
    pub props: usize,
    /// Cells dropped by the mask.
    pub discarded: usize,
}

/// Clear-and-rebuild tile generator.
///
/// Every [`update_grid`](Self::update_grid) call first destroys everything the
/// previous call built, so the resulting tile set depends only on the config
/// and the noise source.
pub struct GridGenerator<N, P> {
    phase: GenerationPhase,
    tiles: Vec<Tile<N>>,
    props: Vec<P>,
    mask: Option<N>,
}

impl<N, P> Default for GridGenerator<N, P> {
    fn default() -> Self {
        Self {
            phase: GenerationPhase::Idle,
            tiles: Vec::new(),
            props: Vec::new(),
            mask: None,
        }
    }
}

impl<N: Copy, P: Copy> GridGenerator<N, P> {
    /// Creates an idle generator with nothing built.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase; [`GenerationPhase::Idle`] between passes.
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Tiles from the last successful pass, in row-major order.
    pub fn tiles(&self) -> &[Tile<N>] {
        &self.tiles
    }

    /// Props from the last successful pass.
    pub fn props(&self) -> &[P] {
        &self.props
    }

    /// Mask node, when masking was enabled.
    pub fn mask(&self) -> Option<N> {
        self.mask
    }

    /// Runs one full pass: validate, clear, optionally build the mask, place
    /// every surviving cell, then scale the mask.
    ///
    /// An invalid config is rejected before anything is touched. An error
    /// while placing destroys everything built so far, leaving the grid empty.
    pub fn update_grid<S, R>(
        &mut self,
        cfg: &GridConfig,
        scene: &mut S,
        placer: &mut R,
        noise: &impl HeightSampler,
        probe: &impl GroundProbe,
    ) -> Result<GridReport, GridError>
    where
        S: TerrainScene<Node = N>,
        R: PropPlacer<Instance = P>,
    {
        cfg.validate()?;

        self.enter(GenerationPhase::Clearing);
        self.clear(scene, placer);

        match self.build(cfg, scene, placer, noise, probe) {
            Ok(report) => {
                self.enter(GenerationPhase::Idle);
                info!(
                    "Grid {}x{}: {} tiles, {} props, {} cells masked out",
                    cfg.columns, cfg.rows, report.tiles, report.props, report.discarded
                );
                Ok(report)
            }
            Err(err) => {
                self.clear(scene, placer);
                self.enter(GenerationPhase::Idle);
                Err(err)
            }
        }
    }

    /// Destroys all props, tiles and the mask.
    pub fn clear<S, R>(&mut self, scene: &mut S, placer: &mut R)
    where
        S: TerrainScene<Node = N>,
        R: PropPlacer<Instance = P>,
    {
        for prop in self.props.drain(..) {
            placer.remove(prop);
        }
        for tile in self.tiles.drain(..) {
            scene.destroy_node(tile.node);
        }
        if let Some(mask) = self.mask.take() {
            scene.destroy_node(mask);
        }
    }

    fn enter(&mut self, phase: GenerationPhase) {
        debug!("Grid generation: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn build<S, R>(
        &mut self,
        cfg: &GridConfig,
        scene: &mut S,
        placer: &mut R,
        noise: &impl HeightSampler,
        probe: &impl GroundProbe,
    ) -> Result<GridReport, GridError>
    where
        S: TerrainScene<Node = N>,
        R: PropPlacer<Instance = P>,
    {
        let mut report = GridReport::default();

        if cfg.mask.enabled {
            self.enter(GenerationPhase::MaskBuilding);
            let mask = scene.create_node("Mask", NodeKind::Mask);
            scene.set_translation(mask, cfg.mask_translation());
            scene.upload_mesh(mask, &build_prism(&cfg.mask_spec()));
            scene.assign_material(mask, MaterialSlot::Water);
            self.mask = Some(mask);
        }

        self.enter(GenerationPhase::Placing);
        let mut coin = (cfg.trees.probability < 1.0)
            .then(|| StdRng::seed_from_u64(u64::from(cfg.noise_seed)));

        for row in 0..cfg.rows {
            for column in 0..cfg.columns {
                let coord = GridCoord::new(column, row);
                let position = cfg.cell_position(coord);

                if cfg.mask.enabled && !inside_mask(cfg, probe, position) {
                    report.discarded += 1;
                    continue;
                }

                let normalized_height = noise.sample(
                    column as f32 + position.x,
                    row as f32 + position.y,
                    cfg.noise_detail,
                );
                let height = normalized_height * cfg.max_height;
                let band = band_index(normalized_height, cfg.material_bands.len())?;

                if cfg.trees.in_band(normalized_height)
                    && coin
                        .as_mut()
                        .is_none_or(|rng| rng.gen_bool(f64::from(cfg.trees.probability)))
                {
                    let tree_pos = Vec3::new(position.x, position.y + height, position.z);
                    let name = format!("Tree {coord}");
                    self.props
                        .push(placer.place(&cfg.trees.prefab, &name, tree_pos));
                }

                let spec = cfg.tile_spec(height);
                let mesh = build_prism(&spec);
                let node = scene.create_node(&format!("Hex {coord}"), NodeKind::Tile);
                scene.set_translation(node, position);
                scene.upload_mesh(node, &mesh);
                scene.assign_material(node, MaterialSlot::Band(band));
                debug!("Placed hex {coord} at height {height:.3} with band {band}");

                self.tiles.push(Tile {
                    coord,
                    position,
                    spec,
                    normalized_height,
                    band,
                    mesh,
                    node,
                });
            }
        }

        self.enter(GenerationPhase::Finalizing);
        if let Some(mask) = self.mask {
            scene.set_scale(mask, MASK_SCALE);
        }

        report.tiles = self.tiles.len();
        report.props = self.props.len();
        Ok(report)
    }
}

/// Casts a probe straight down from just above the water level at `position`.
///
/// An unavailable probe counts as a miss.
fn inside_mask(cfg: &GridConfig, probe: &impl GroundProbe, position: Vec3) -> bool {
    let origin = Vec3::new(
        position.x,
        cfg.mask.water_level + PROBE_CLEARANCE,
        position.z,
    );
    match probe.probe(origin, Vec3::NEG_Y) {
        Ok(hit) => hit,
        Err(err) => {
            warn!("{err}; excluding cell at ({:.2}, {:.2})", position.x, position.z);
            false
        }
    }
}
