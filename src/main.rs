#![warn(missing_docs)]
//! Hex world viewer.
//!
//! Generates a noise-driven hex-tile terrain and lets you tweak its
//! [`GridConfig`] live. R regenerates, Tab toggles the inspector, Esc quits.

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use hex_world::grid::{GridConfig, HexGridPlugin};

/// Viewer state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum AppState {
    /// Looking at the terrain.
    #[default]
    Viewing,
    /// Config inspector visible (Tab to toggle).
    Inspecting,
}

/// Command-line overrides for the default [`GridConfig`].
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(name = "hex-world", version, about = "Procedural hex-tile terrain viewer")]
struct Cli {
    /// Number of tile columns
    #[arg(long)]
    columns: Option<u32>,

    /// Number of tile rows
    #[arg(long)]
    rows: Option<u32>,

    /// Noise and tree seed
    #[arg(long)]
    seed: Option<u32>,

    /// Use flat-top tiles instead of pointy-top
    #[arg(long)]
    flat_top: bool,

    /// Clip the grid to a hexagonal island
    #[arg(long)]
    mask: bool,

    /// Island radius (implies --mask)
    #[arg(long)]
    mask_radius: Option<f32>,

    /// Noise divisor; larger gives smoother terrain
    #[arg(long)]
    noise_detail: Option<f32>,

    /// Height of a tile at full noise
    #[arg(long)]
    max_height: Option<f32>,
}

#[cfg(feature = "native")]
impl Cli {
    fn apply(self, cfg: &mut GridConfig) {
        if let Some(columns) = self.columns {
            cfg.columns = columns;
        }
        if let Some(rows) = self.rows {
            cfg.rows = rows;
        }
        if let Some(seed) = self.seed {
            cfg.noise_seed = seed;
        }
        if self.flat_top {
            cfg.orientation = hex_world::layout::Orientation::FlatTop;
        }
        if let Some(radius) = self.mask_radius {
            cfg.mask.radius = radius;
            cfg.mask.enabled = true;
        }
        if self.mask {
            cfg.mask.enabled = true;
        }
        if let Some(detail) = self.noise_detail {
            cfg.noise_detail = detail;
        }
        if let Some(height) = self.max_height {
            cfg.max_height = height;
        }
    }
}

#[cfg(feature = "native")]
fn load_config() -> GridConfig {
    use clap::Parser;

    let mut cfg = GridConfig::default();
    Cli::parse().apply(&mut cfg);
    cfg
}

#[cfg(not(feature = "native"))]
fn load_config() -> GridConfig {
    GridConfig::default()
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex World".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<AppState>()
    .init_state::<AppState>()
    .insert_resource(ClearColor(Color::srgb(0.55, 0.72, 0.86)))
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(HexGridPlugin(load_config()))
    .add_systems(Startup, spawn_camera_and_light)
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(
        ResourceInspectorPlugin::<GridConfig>::new().run_if(in_state(AppState::Inspecting)),
    );

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

/// Frames the whole grid from above and to the south.
fn spawn_camera_and_light(mut commands: Commands, cfg: Res<GridConfig>) {
    let centre = cfg.mask_translation();
    let span = cfg
        .layout()
        .bounds(cfg.columns, cfg.rows)
        .map_or(10.0, |rect| rect.size().max_element())
        .max(4.0);

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_translation(centre + Vec3::new(0.0, span * 0.8, span * 0.9))
            .looking_at(centre, Vec3::Y),
    ));
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-1.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            AppState::Viewing => AppState::Inspecting,
            AppState::Inspecting => AppState::Viewing,
        };
        info!("Switching to {new_state:?}");
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
