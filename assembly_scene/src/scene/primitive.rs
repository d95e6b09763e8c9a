/// Geometry primitives: leaf shape records referenced by id from assembly nodes.

use glam::Vec3;
use super::aabb::AABB;

/// Primitive shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PrimitiveKind {
    /// Rectangular box
    Box = 0,
    /// Cylinder
    Cylinder = 1,
    /// Sphere
    Sphere = 2,
    /// Cone or truncated cone
    Cone = 3,
    /// Flat plate with thickness
    Plate = 4,
    /// Hollow pipe
    Pipe = 5,
    /// Arbitrary triangle mesh
    Mesh = 6,
}

impl PrimitiveKind {
    /// All kinds, in tag order
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Box,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Sphere,
        PrimitiveKind::Cone,
        PrimitiveKind::Plate,
        PrimitiveKind::Pipe,
        PrimitiveKind::Mesh,
    ];

    /// Tag value as stored in GPU instance records
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Parse a tag value
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// A leaf shape record: raw vertices plus the bound derived from them.
///
/// The bound is recomputed whenever the vertices are replaced, never
/// patched in place.
#[derive(Debug, Clone)]
pub struct GeometryPrimitive {
    id: i32,
    kind: PrimitiveKind,
    vertices: Vec<Vec3>,
    bound: AABB,
}

impl GeometryPrimitive {
    /// Create a primitive and derive its bound from `vertices`
    pub fn new(id: i32, kind: PrimitiveKind, vertices: Vec<Vec3>) -> Self {
        let bound = AABB::from_points(&vertices);
        Self { id, kind, vertices, bound }
    }

    /// Axis-aligned box primitive spanning `min..max` (8 corner vertices)
    pub fn cuboid(id: i32, min: Vec3, max: Vec3) -> Self {
        let corners = (0..8)
            .map(|i| Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            ))
            .collect();
        Self::new(id, PrimitiveKind::Box, corners)
    }

    /// Primitive id (unique within a model)
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Shape tag
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Raw vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Bound derived from the vertices (EMPTY when there are none)
    pub fn bound(&self) -> AABB {
        self.bound
    }

    /// Replace the vertices and recompute the bound
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.bound = AABB::from_points(&vertices);
        self.vertices = vertices;
    }
}

#[cfg(test)]
#[path = "primitive_tests.rs"]
mod tests;
