/// GraphicsDevice trait - the GPU command surface used by buffer geometries
/// and draw strategies.
///
/// GPU context state is thread-affine. The device is shared as
/// `Arc<Mutex<dyn GraphicsDevice>>` and must only be driven from the thread
/// that owns the rendering context.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, VertexLayout, PrimitiveTopology, IndexType,
};

/// Opaque handle to a vertex array object (vertex, index and instance
/// buffer bindings plus the attribute layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// Descriptor for creating a vertex array
#[derive(Clone)]
pub struct VertexArrayDesc {
    /// Per-vertex buffer (binding 0)
    pub vertex_buffer: Arc<dyn Buffer>,
    /// Index buffer (None for non-indexed geometry)
    pub index_buffer: Option<Arc<dyn Buffer>>,
    /// Per-instance buffer (binding 1, None for non-instanced geometry)
    pub instance_buffer: Option<Arc<dyn Buffer>>,
    /// Attribute layout across both bindings
    pub layout: VertexLayout,
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphicsDeviceStats {
    /// Number of draw calls issued since the last reset
    pub draw_calls: u32,
    /// Number of buffers alive
    pub buffers: u32,
}

/// Main graphics device trait
///
/// Implemented by backend-specific devices (e.g. an OpenGL wrapper owned by
/// the viewer shell). Context creation and shader programs are handled by
/// the shell before any of these calls are made.
pub trait GraphicsDevice: Send + Sync {
    /// Whether a rendering context is current on this device
    fn is_context_active(&self) -> bool;

    /// Create a buffer and upload its initial contents
    ///
    /// `data.len()` must not exceed `desc.size`.
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>>;

    /// Create a vertex array from buffers and a layout
    fn create_vertex_array(&mut self, desc: &VertexArrayDesc) -> Result<VertexArrayHandle>;

    /// Release a vertex array
    fn destroy_vertex_array(&mut self, handle: VertexArrayHandle);

    /// Make a vertex array current
    fn bind_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()>;

    /// Clear the current vertex array
    fn unbind_vertex_array(&mut self) -> Result<()>;

    /// Vertex array currently bound on this device, if any
    fn current_vertex_array(&self) -> Option<VertexArrayHandle>;

    /// Draw `count` vertices starting at `first`
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) -> Result<()>;

    /// Instanced variant of `draw_arrays`
    fn draw_arrays_instanced(
        &mut self,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
        instance_count: u32,
    ) -> Result<()>;

    /// Draw `count` indices starting at `byte_offset` into the bound index buffer
    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u64,
    ) -> Result<()>;

    /// Instanced variant of `draw_elements`
    fn draw_elements_instanced(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u64,
        instance_count: u32,
    ) -> Result<()>;

    /// Device statistics
    fn stats(&self) -> GraphicsDeviceStats;
}
