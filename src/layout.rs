//! Offset-grid placement for the two hexagon orientations.
//!
//! Grid cells are addressed by `(column, row)`. Rows run towards `-Z`, columns
//! towards `+X`. Every even row (pointy-top) or even column (flat-top) is
//! shifted by half a step along the other axis so that the cells interlock.

use bevy::prelude::*;

use crate::math::SQRT_3;

/// Which way the hexagons point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum Orientation {
    /// Corners at the top and bottom; rows interlock.
    #[default]
    PointyTop,
    /// Flat edges at the top and bottom; columns interlock.
    FlatTop,
}

/// Axis along which alternate lines of cells are shifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaggerAxis {
    /// Even rows move by half a horizontal step.
    Rows,
    /// Even columns move by half a vertical step.
    Columns,
}

/// Per-orientation constants shared by the layout and the mesh builder.
///
/// Keeping them in one record ties the corner phase to the spacing formulas:
/// the two only tile correctly as a pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationConstants {
    /// Angle of ring point 0, in degrees.
    pub corner_phase_deg: f32,
    /// Hex width divided by its outer radius.
    pub width_factor: f32,
    /// Hex height (along Z) divided by its outer radius.
    pub height_factor: f32,
    /// Column step as a fraction of the width.
    pub column_step: f32,
    /// Row step as a fraction of the height.
    pub row_step: f32,
    /// Which lines get the half-step offset.
    pub stagger: StaggerAxis,
}

const POINTY_TOP: OrientationConstants = OrientationConstants {
    corner_phase_deg: -30.0,
    width_factor: SQRT_3,
    height_factor: 2.0,
    column_step: 1.0,
    row_step: 0.75,
    stagger: StaggerAxis::Rows,
};

const FLAT_TOP: OrientationConstants = OrientationConstants {
    corner_phase_deg: 0.0,
    width_factor: 2.0,
    height_factor: SQRT_3,
    column_step: 0.75,
    row_step: 1.0,
    stagger: StaggerAxis::Columns,
};

impl Orientation {
    /// The constant record for this orientation.
    pub const fn constants(self) -> &'static OrientationConstants {
        match self {
            Self::PointyTop => &POINTY_TOP,
            Self::FlatTop => &FLAT_TOP,
        }
    }

    /// Angle in radians of ring point `index` (0..6), `60·i` plus the corner phase.
    pub fn corner_angle(self, index: usize) -> f32 {
        (60.0 * index as f32 + self.constants().corner_phase_deg).to_radians()
    }
}

/// A cell address in the rectangular offset grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct GridCoord {
    /// Index along `+X`.
    pub column: u32,
    /// Index along `-Z`.
    pub row: u32,
}

impl GridCoord {
    /// Creates a coordinate from column and row.
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

/// Projects offset grid coordinates to world space for one orientation and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    /// Pointy-top or flat-top.
    pub orientation: Orientation,
    /// Outer radius used for spacing.
    pub size: f32,
}

impl HexLayout {
    /// Creates a layout spaced for hexes of outer radius `size`.
    pub fn new(orientation: Orientation, size: f32) -> Self {
        Self { orientation, size }
    }

    /// Full hex width along X.
    pub fn width(&self) -> f32 {
        self.orientation.constants().width_factor * self.size
    }

    /// Full hex height along Z.
    pub fn height(&self) -> f32 {
        self.orientation.constants().height_factor * self.size
    }

    /// Distance between adjacent column centres.
    pub fn horizontal_spacing(&self) -> f32 {
        self.width() * self.orientation.constants().column_step
    }

    /// Distance between adjacent row centres.
    pub fn vertical_spacing(&self) -> f32 {
        self.height() * self.orientation.constants().row_step
    }

    /// World-space `(x, z)` of a cell centre. The returned `Vec2` stores `z` in `.y`.
    ///
    /// Even rows (pointy-top) or even columns (flat-top) carry the half-step offset.
    pub fn position(&self, coord: GridCoord) -> Vec2 {
        let column = coord.column as f32;
        let row = coord.row as f32;
        match self.orientation.constants().stagger {
            StaggerAxis::Rows => {
                let offset = if coord.row % 2 == 0 {
                    self.width() / 2.0
                } else {
                    0.0
                };
                Vec2::new(
                    column * self.horizontal_spacing() + offset,
                    -(row * self.vertical_spacing()),
                )
            }
            StaggerAxis::Columns => {
                let offset = if coord.column % 2 == 0 {
                    self.height() / 2.0
                } else {
                    0.0
                };
                Vec2::new(
                    column * self.horizontal_spacing(),
                    -(row * self.vertical_spacing() - offset),
                )
            }
        }
    }

    /// [`Self::position`] lifted to 3D at `y = 0`.
    pub fn world_position(&self, coord: GridCoord) -> Vec3 {
        let p = self.position(coord);
        Vec3::new(p.x, 0.0, p.y)
    }

    /// Bounding rectangle of all cell centres in a `columns × rows` grid, in `(x, z)`.
    ///
    /// `None` when either dimension is zero.
    pub fn bounds(&self, columns: u32, rows: u32) -> Option<Rect> {
        if columns == 0 || rows == 0 {
            return None;
        }
        // Staggering only reaches the extremes through the first two lines.
        let probe_columns = [0, 1.min(columns - 1), columns - 1];
        let probe_rows = [0, 1.min(rows - 1), rows - 1];
        let mut rect = Rect::from_center_size(self.position(GridCoord::new(0, 0)), Vec2::ZERO);
        for &column in &probe_columns {
            for &row in &probe_rows {
                let p = self.position(GridCoord::new(column, row));
                rect = rect.union_point(p);
            }
        }
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < EPS,
            "got {actual:?}, expected {expected:?}"
        );
    }

    #[test]
    fn pointy_top_spacing_constants() {
        let layout = HexLayout::new(Orientation::PointyTop, 1.0);
        assert!((layout.width() - SQRT_3).abs() < EPS);
        assert!((layout.height() - 2.0).abs() < EPS);
        assert!((layout.horizontal_spacing() - SQRT_3).abs() < EPS);
        assert!((layout.vertical_spacing() - 1.5).abs() < EPS);
    }

    #[test]
    fn flat_top_spacing_constants() {
        let layout = HexLayout::new(Orientation::FlatTop, 1.0);
        assert!((layout.width() - 2.0).abs() < EPS);
        assert!((layout.height() - SQRT_3).abs() < EPS);
        assert!((layout.horizontal_spacing() - 1.5).abs() < EPS);
        assert!((layout.vertical_spacing() - SQRT_3).abs() < EPS);
    }

    #[test]
    fn pointy_top_even_rows_are_offset() {
        let layout = HexLayout::new(Orientation::PointyTop, 1.0);
        assert_close(layout.position(GridCoord::new(0, 0)), Vec2::new(SQRT_3 / 2.0, 0.0));
        assert_close(layout.position(GridCoord::new(0, 1)), Vec2::new(0.0, -1.5));
        assert_close(
            layout.position(GridCoord::new(0, 2)),
            Vec2::new(SQRT_3 / 2.0, -3.0),
        );
    }

    #[test]
    fn pointy_top_adjacent_column_step() {
        let layout = HexLayout::new(Orientation::PointyTop, 1.0);
        let a = layout.position(GridCoord::new(0, 0));
        let b = layout.position(GridCoord::new(1, 0));
        assert_close(b - a, Vec2::new(1.732, 0.0));
    }

    #[test]
    fn flat_top_even_columns_are_offset() {
        let layout = HexLayout::new(Orientation::FlatTop, 1.0);
        assert_close(layout.position(GridCoord::new(0, 0)), Vec2::new(0.0, SQRT_3 / 2.0));
        assert_close(layout.position(GridCoord::new(1, 0)), Vec2::new(1.5, 0.0));
        assert_close(
            layout.position(GridCoord::new(0, 1)),
            Vec2::new(0.0, SQRT_3 / 2.0 - SQRT_3),
        );
    }

    #[test]
    fn neighbours_are_one_apothem_pair_apart() {
        // Interlocked neighbours sit exactly √3·size apart in both orientations.
        for orientation in [Orientation::PointyTop, Orientation::FlatTop] {
            let layout = HexLayout::new(orientation, 2.0);
            let a = layout.position(GridCoord::new(1, 1));
            for n in [GridCoord::new(2, 1), GridCoord::new(1, 2)] {
                let d = (layout.position(n) - a).length();
                assert!(
                    (d - SQRT_3 * 2.0).abs() < EPS,
                    "{orientation:?}: neighbour {n} at distance {d}"
                );
            }
        }
    }

    #[test]
    fn world_position_has_zero_y() {
        let layout = HexLayout::new(Orientation::FlatTop, 3.0);
        let p = layout.world_position(GridCoord::new(4, 7));
        assert_eq!(p.y, 0.0);
        let flat = layout.position(GridCoord::new(4, 7));
        assert_eq!((p.x, p.z), (flat.x, flat.y));
    }

    #[test]
    fn corner_angles_differ_by_thirty_degrees() {
        let pointy = Orientation::PointyTop.corner_angle(0);
        let flat = Orientation::FlatTop.corner_angle(0);
        assert!((flat - pointy - 30f32.to_radians()).abs() < 1e-6);
        assert!((Orientation::FlatTop.corner_angle(3) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn bounds_cover_every_cell() {
        for orientation in [Orientation::PointyTop, Orientation::FlatTop] {
            let layout = HexLayout::new(orientation, 1.0);
            let rect = layout.bounds(5, 4).unwrap();
            for column in 0..5 {
                for row in 0..4 {
                    let p = layout.position(GridCoord::new(column, row));
                    assert!(
                        p.x >= rect.min.x - EPS
                            && p.x <= rect.max.x + EPS
                            && p.y >= rect.min.y - EPS
                            && p.y <= rect.max.y + EPS,
                        "{orientation:?}: cell {column},{row} at {p:?} outside {rect:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn bounds_of_empty_grid_is_none() {
        let layout = HexLayout::new(Orientation::PointyTop, 1.0);
        assert!(layout.bounds(0, 3).is_none());
        assert!(layout.bounds(3, 0).is_none());
    }
}
