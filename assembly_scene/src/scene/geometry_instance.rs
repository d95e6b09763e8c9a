/// GeometryInstance: the fixed-size per-instance record uploaded to the GPU.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use super::primitive::PrimitiveKind;

bitflags! {
    /// Render layers an instance is drawn in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderLayers: u32 {
        /// Solid model geometry
        const GEOMETRY = 1 << 0;
        /// Edges and wireframe overlays
        const EDGES = 1 << 1;
        /// Labels, dimensions and other annotations
        const ANNOTATION = 1 << 2;
        /// Selection / hover highlight pass
        const HIGHLIGHT = 1 << 3;
    }
}

impl Default for RenderLayers {
    fn default() -> Self {
        RenderLayers::GEOMETRY
    }
}

/// Interaction state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum SelectionState {
    #[default]
    None = 0,
    Hovered = 1,
    Selected = 2,
}

impl SelectionState {
    /// Parse a stored tag, unknown values fall back to `None`
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => SelectionState::Hovered,
            2 => SelectionState::Selected,
            _ => SelectionState::None,
        }
    }
}

/// Per-instance GPU record (104 bytes, no padding)
///
/// Equality is conjunctive over geometry id, assembly id, primitive kind and
/// transform. Color, selection, mesh id and layers do not take part: two
/// records for the same placed primitive compare equal while highlighted
/// differently.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GeometryInstance {
    /// Column-major model transform
    pub transform: [[f32; 4]; 4],
    /// RGBA color
    pub color: [f32; 4],
    /// `SelectionState` tag
    pub selection: u32,
    /// Owning assembly node id
    pub assembly_id: i32,
    /// Geometry primitive id
    pub geometry_id: i32,
    /// Shared mesh id (-1 when the primitive is not mesh-backed)
    pub mesh_id: i32,
    /// `PrimitiveKind` tag
    pub kind: u32,
    /// `RenderLayers` bits
    pub layers: u32,
}

const _: () = assert!(std::mem::size_of::<GeometryInstance>() == GeometryInstance::SIZE);

impl GeometryInstance {
    /// Record size in bytes
    pub const SIZE: usize = 104;

    /// Mesh id used when no shared mesh backs the instance
    pub const NO_MESH: i32 = -1;

    /// Create an unselected, white instance on the geometry layer
    pub fn new(geometry_id: i32, assembly_id: i32, kind: PrimitiveKind, transform: Mat4) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
            selection: SelectionState::None as u32,
            assembly_id,
            geometry_id,
            mesh_id: Self::NO_MESH,
            kind: kind.as_u32(),
            layers: RenderLayers::GEOMETRY.bits(),
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection as u32;
        self
    }

    pub fn with_mesh(mut self, mesh_id: i32) -> Self {
        self.mesh_id = mesh_id;
        self
    }

    pub fn with_layers(mut self, layers: RenderLayers) -> Self {
        self.layers = layers.bits();
        self
    }

    /// Transform as a glam matrix
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }

    /// Primitive kind (None if the tag is unknown)
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_u32(self.kind)
    }

    pub fn selection_state(&self) -> SelectionState {
        SelectionState::from_u32(self.selection)
    }

    /// Render layers (unknown bits dropped)
    pub fn render_layers(&self) -> RenderLayers {
        RenderLayers::from_bits_truncate(self.layers)
    }
}

impl PartialEq for GeometryInstance {
    fn eq(&self, other: &Self) -> bool {
        self.geometry_id == other.geometry_id
            && self.assembly_id == other.assembly_id
            && self.kind == other.kind
            && self.transform == other.transform
    }
}

#[cfg(test)]
#[path = "geometry_instance_tests.rs"]
mod tests;
