//! Vertical "is there ground here" queries used to mask the grid.

use bevy::prelude::*;

use crate::hex_mesh::PrismMesh;

/// The probe's backing environment could not answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    /// No collision world to query.
    #[error("ground probe unavailable: {0}")]
    Unavailable(String),
}

/// Answers whether a ray from `origin` along `direction` hits solid ground.
pub trait GroundProbe {
    /// `Ok(true)` on a hit, `Ok(false)` on a miss.
    fn probe(&self, origin: Vec3, direction: Vec3) -> Result<bool, ProbeError>;
}

/// Ray caster over a single prism mesh placed in world space.
///
/// Only front faces count, so a downward ray hits the top cap and ignores the
/// bottom cap seen from inside.
#[derive(Clone, Debug, Default)]
pub struct PrismProbe {
    triangles: Vec<[Vec3; 3]>,
}

impl PrismProbe {
    /// Collects `mesh`'s triangles translated by `translation`.
    pub fn new(mesh: &PrismMesh, translation: Vec3) -> Self {
        let triangles = mesh
            .triangles()
            .map(|[a, b, c]| [a + translation, b + translation, c + translation])
            .collect();
        Self { triangles }
    }

    /// Number of triangles the probe tests against.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl GroundProbe for PrismProbe {
    fn probe(&self, origin: Vec3, direction: Vec3) -> Result<bool, ProbeError> {
        Ok(self
            .triangles
            .iter()
            .any(|tri| ray_hits_front_face(origin, direction, tri)))
    }
}

/// Lets rays through shared edges and the cap centre hit at least one triangle.
const BARYCENTRIC_SLACK: f32 = 1e-5;

/// Möller–Trumbore ray-triangle intersection, culling back faces and degenerate triangles.
fn ray_hits_front_face(origin: Vec3, dir: Vec3, tri: &[Vec3; 3]) -> bool {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let h = dir.cross(edge2);
    let a = edge1.dot(h);

    // a > 0 exactly when the ray opposes the face normal.
    if a < 1e-8 {
        return false;
    }

    let f = 1.0 / a;
    let s = origin - tri[0];
    let u = f * s.dot(h);
    if !(-BARYCENTRIC_SLACK..=1.0 + BARYCENTRIC_SLACK).contains(&u) {
        return false;
    }

    let q = s.cross(edge1);
    let v = f * dir.dot(q);
    if v < -BARYCENTRIC_SLACK || u + v > 1.0 + BARYCENTRIC_SLACK {
        return false;
    }

    f * edge2.dot(q) > 1e-4
}
