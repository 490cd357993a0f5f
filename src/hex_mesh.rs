//! Closed hexagonal prism meshes.
//!
//! A prism is built from 24 independent quads: six on the top cap, six on the
//! bottom cap, six on the outer wall and six on the inner wall. Quads never
//! share vertices, so every face shades flat. With an inner radius of zero the
//! inner wall collapses to zero-area triangles, which is harmless.
//!
//! Normals are not supplied analytically. They are recomputed from the final
//! triangle winding, so the per-group reversal flag alone decides which way
//! each face points.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use crate::layout::Orientation;
use crate::math;

/// Number of points around a hexagon ring.
pub const RING_POINTS: usize = 6;

/// Index pattern of one quad: two triangles sharing the `0–2` diagonal.
pub const QUAD_TRIANGLES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Unit-square UVs assigned to every quad regardless of its size.
pub const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Immutable description of one tile's prism.
///
/// Precondition: `0 <= inner_radius <= outer_radius`. Inverted radii produce
/// self-intersecting walls and are not checked here. A negative `height`
/// extends the prism below `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct HexSpec {
    /// Radius of the bored-out centre; `0` for a solid tile.
    pub inner_radius: f32,
    /// Radius of the outer ring.
    pub outer_radius: f32,
    /// Y of the top cap; the bottom cap sits at `y = 0`.
    pub height: f32,
    /// Corner phase of the ring points.
    pub orientation: Orientation,
}

impl HexSpec {
    /// Creates a spec from radii, height and orientation.
    pub fn new(inner_radius: f32, outer_radius: f32, height: f32, orientation: Orientation) -> Self {
        Self {
            inner_radius,
            outer_radius,
            height,
            orientation,
        }
    }
}

/// The four quad groups of a prism, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceGroup {
    /// Annulus at `y = height`, facing up.
    Top,
    /// Annulus at `y = 0`, facing down.
    Bottom,
    /// Outer ring wall, facing away from the centre.
    Outer,
    /// Inner ring wall, facing the centre.
    Inner,
}

impl FaceGroup {
    /// All groups in the order they are concatenated.
    pub const ALL: [FaceGroup; 4] = [
        FaceGroup::Top,
        FaceGroup::Bottom,
        FaceGroup::Outer,
        FaceGroup::Inner,
    ];

    /// Whether the group's vertex order is reversed.
    pub fn reversed(self) -> bool {
        matches!(self, FaceGroup::Bottom | FaceGroup::Outer)
    }

    /// Group owning face `face_index` of a prism built by [`build_prism`].
    pub fn of_face(face_index: usize) -> FaceGroup {
        Self::ALL[(face_index / RING_POINTS) % Self::ALL.len()]
    }

    /// `(inner radius, outer radius, top y, bottom y)` used to emit this group's quads.
    fn extents(self, spec: &HexSpec) -> (f32, f32, f32, f32) {
        match self {
            FaceGroup::Top => (spec.inner_radius, spec.outer_radius, spec.height, spec.height),
            FaceGroup::Bottom => (spec.inner_radius, spec.outer_radius, 0.0, 0.0),
            FaceGroup::Outer => (spec.outer_radius, spec.outer_radius, spec.height, 0.0),
            FaceGroup::Inner => (spec.inner_radius, spec.inner_radius, spec.height, 0.0),
        }
    }
}

/// One quad: four vertices, their UVs, and whether the order was reversed.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    /// Quad corners in triangulation order.
    pub vertices: [Vec3; 4],
    /// Unit-square UVs, never reversed.
    pub uvs: [Vec2; 4],
    /// Whether `vertices` were reversed.
    pub reversed: bool,
}

impl Face {
    /// Builds the quad between ring point `point` and the next one (wrapping 5 → 0).
    ///
    /// Corners `a`, `b` lie on the `inner_radius` ring at `y_b`; `c`, `d` on the
    /// `outer_radius` ring at `y_a`.
    pub fn new(
        orientation: Orientation,
        (inner_radius, outer_radius): (f32, f32),
        (y_a, y_b): (f32, f32),
        point: usize,
        reverse: bool,
    ) -> Self {
        let next = (point + 1) % RING_POINTS;
        let a = ring_point(orientation, inner_radius, y_b, point);
        let b = ring_point(orientation, inner_radius, y_b, next);
        let c = ring_point(orientation, outer_radius, y_a, next);
        let d = ring_point(orientation, outer_radius, y_a, point);

        let mut vertices = [a, b, c, d];
        if reverse {
            vertices.reverse();
        }
        Self {
            vertices,
            uvs: QUAD_UVS,
            reversed: reverse,
        }
    }

    /// Unit normal of the quad's first triangle; zero when it is degenerate.
    pub fn first_triangle_normal(&self) -> Vec3 {
        let [i0, i1, i2, ..] = QUAD_TRIANGLES;
        math::compute_normal(
            self.vertices[i0 as usize],
            self.vertices[i1 as usize],
            self.vertices[i2 as usize],
        )
    }
}

/// Position of ring point `index` at distance `radius` and height `y`.
pub fn ring_point(orientation: Orientation, radius: f32, y: f32, index: usize) -> Vec3 {
    let angle = orientation.corner_angle(index);
    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

/// The 24 quads of a prism, grouped top, bottom, outer, inner.
pub fn prism_faces(spec: &HexSpec) -> Vec<Face> {
    let mut faces = Vec::with_capacity(FaceGroup::ALL.len() * RING_POINTS);
    for group in FaceGroup::ALL {
        let (inner, outer, y_a, y_b) = group.extents(spec);
        for point in 0..RING_POINTS {
            faces.push(Face::new(
                spec.orientation,
                (inner, outer),
                (y_a, y_b),
                point,
                group.reversed(),
            ));
        }
    }
    faces
}

/// Combined triangle-list buffers for one tile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrismMesh {
    /// Four unwelded vertices per quad.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals recomputed from winding.
    pub normals: Vec<Vec3>,
    /// Per-vertex UVs.
    pub uvs: Vec<Vec2>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u16>,
}

impl PrismMesh {
    /// Concatenates quads, offsetting each quad's indices by `4 × face index`,
    /// then recomputes normals.
    pub fn from_faces(faces: &[Face]) -> Self {
        let mut mesh = Self {
            positions: Vec::with_capacity(faces.len() * 4),
            normals: Vec::new(),
            uvs: Vec::with_capacity(faces.len() * 4),
            indices: Vec::with_capacity(faces.len() * QUAD_TRIANGLES.len()),
        };

        for (i, face) in faces.iter().enumerate() {
            let offset = (4 * i) as u16;
            mesh.positions.extend_from_slice(&face.vertices);
            mesh.uvs.extend_from_slice(&face.uvs);
            mesh.indices
                .extend(QUAD_TRIANGLES.iter().map(|&index| index + offset));
        }

        mesh.recalculate_normals();
        mesh
    }

    /// Rebuilds `normals` from the triangle winding.
    ///
    /// Each triangle adds its area-weighted normal to its three vertices; the
    /// sums are then normalized. Vertices touched only by degenerate triangles
    /// end up with a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let n = math::area_normal(self.positions[i0], self.positions[i1], self.positions[i2]);
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex-position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Converts to a Bevy triangle-list [`Mesh`].
    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|v| v.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|v| v.to_array()).collect();
        let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|v| v.to_array()).collect();

        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U16(self.indices.clone()))
    }
}

/// Builds the closed prism mesh for `spec`.
pub fn build_prism(spec: &HexSpec) -> PrismMesh {
    PrismMesh::from_faces(&prism_faces(spec))
}
