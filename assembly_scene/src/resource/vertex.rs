/// Vertex and instance record types and the layouts they describe.
///
/// A record type lists its attributes as `(format, byte offset)` pairs in
/// shader location order. Vertex attributes start at location 0 on
/// binding 0; instance attributes continue after them on binding 1.

use bytemuck::{Pod, Zeroable};
use crate::graphics_device::{
    BufferFormat, VertexAttribute, VertexBinding, VertexInputRate, VertexLayout,
};
use crate::scene::GeometryInstance;

/// Binding index of per-vertex records
pub const VERTEX_BINDING: u32 = 0;

/// Binding index of per-instance records
pub const INSTANCE_BINDING: u32 = 1;

// ===== RECORD TRAITS =====

/// A per-vertex record uploaded verbatim to a vertex buffer
pub trait VertexRecord: Pod + Send + Sync + 'static {
    /// Attribute formats and offsets, in location order
    const ATTRIBUTES: &'static [(BufferFormat, u32)];
}

/// A per-instance record uploaded verbatim to an instance buffer.
///
/// `()` is the "no instances" record: it has no attributes and geometries
/// using it never create an instance buffer.
pub trait InstanceRecord: Pod + Send + Sync + 'static {
    /// Attribute formats and offsets, in location order
    const ATTRIBUTES: &'static [(BufferFormat, u32)];
}

impl InstanceRecord for () {
    const ATTRIBUTES: &'static [(BufferFormat, u32)] = &[];
}

/// Whether `I` carries any per-instance data
pub fn has_instance_data<I: InstanceRecord>() -> bool {
    std::mem::size_of::<I>() > 0 && !I::ATTRIBUTES.is_empty()
}

// ===== BUILT-IN RECORDS =====

/// Position-only vertex (12 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl VertexRecord for PositionVertex {
    const ATTRIBUTES: &'static [(BufferFormat, u32)] = &[
        (BufferFormat::R32G32B32_SFLOAT, 0),
    ];
}

/// Position + normal vertex (24 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PositionNormalVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl PositionNormalVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

impl VertexRecord for PositionNormalVertex {
    const ATTRIBUTES: &'static [(BufferFormat, u32)] = &[
        (BufferFormat::R32G32B32_SFLOAT, 0),
        (BufferFormat::R32G32B32_SFLOAT, 12),
    ];
}

impl InstanceRecord for GeometryInstance {
    // mat4 as four vec4 columns, then color and the integer tags
    const ATTRIBUTES: &'static [(BufferFormat, u32)] = &[
        (BufferFormat::R32G32B32A32_SFLOAT, 0),
        (BufferFormat::R32G32B32A32_SFLOAT, 16),
        (BufferFormat::R32G32B32A32_SFLOAT, 32),
        (BufferFormat::R32G32B32A32_SFLOAT, 48),
        (BufferFormat::R32G32B32A32_SFLOAT, 64),
        (BufferFormat::R32_UINT, 80),
        (BufferFormat::R32_SINT, 84),
        (BufferFormat::R32_SINT, 88),
        (BufferFormat::R32_SINT, 92),
        (BufferFormat::R32_UINT, 96),
        (BufferFormat::R32_UINT, 100),
    ];
}

// ===== LAYOUT =====

/// Build the vertex layout for records `V`, plus `I` when `instanced`
pub fn record_layout<V: VertexRecord, I: InstanceRecord>(instanced: bool) -> VertexLayout {
    let mut layout = VertexLayout::default();
    push_binding(&mut layout, VERTEX_BINDING, std::mem::size_of::<V>(),
        VertexInputRate::Vertex, V::ATTRIBUTES);

    if instanced && has_instance_data::<I>() {
        push_binding(&mut layout, INSTANCE_BINDING, std::mem::size_of::<I>(),
            VertexInputRate::Instance, I::ATTRIBUTES);
    }
    layout
}

fn push_binding(
    layout: &mut VertexLayout,
    binding: u32,
    stride: usize,
    input_rate: VertexInputRate,
    attributes: &[(BufferFormat, u32)],
) {
    let first_location = layout.next_location();
    layout.bindings.push(VertexBinding {
        binding,
        stride: stride as u32,
        input_rate,
    });
    for (index, &(format, offset)) in attributes.iter().enumerate() {
        layout.attributes.push(VertexAttribute {
            location: first_location + index as u32,
            binding,
            format,
            offset,
        });
    }
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
