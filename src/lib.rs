#![warn(missing_docs)]
//! Procedural hex-tile terrain.
//!
//! Builds a rectangular grid of hexagonal prisms whose heights come from
//! coherent noise, colours each tile by height band, optionally clips the
//! grid to a hexagonal island and scatters trees on mid-height tiles.
//!
//! The geometry, layout and noise modules are plain functions over `bevy`
//! math types; [`grid::HexGridPlugin`] turns a [`grid::GridConfig`] into
//! entities.

pub mod grid;
pub mod hex_mesh;
pub mod layout;
pub mod math;
pub mod noise_sampler;
pub mod probe;
