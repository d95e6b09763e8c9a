//! Buffer geometries: GPU vertex, index and instance buffers bound together
//! in a vertex array, ready for a draw strategy.
//!
//! - **ArraysGeometry**: non-indexed vertices, drawn with `draw_arrays`
//! - **ElementsGeometry**: indexed vertices, drawn with `draw_elements`
//!
//! Both are generic over the vertex record `V` and the instance record `I`
//! (`()` for non-instanced geometry). The vertex array is released when the
//! geometry is dropped.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU32, Ordering};
use crate::error::Result;
use crate::{engine_bail, engine_err, engine_warn};
use crate::graphics_device::{
    self, Buffer, BufferDesc, BufferUsage, GraphicsDevice, IndexType,
    VertexArrayDesc, VertexArrayHandle, VertexLayout,
};
use super::vertex::{self, InstanceRecord, VertexRecord};

const LOG_SOURCE: &str = "scene3d::BufferGeometry";

/// Lock the shared device, turning a poisoned lock into an error
pub(crate) fn lock_device(
    device: &Arc<Mutex<dyn GraphicsDevice>>,
) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock()
        .map_err(|_| engine_err!(LOG_SOURCE, "Graphics device lock poisoned"))
}

// ============================================================================
// INDEX DATA
// ============================================================================

/// Index elements for an `ElementsGeometry`
#[derive(Debug, Clone, Copy)]
pub enum IndexData<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexData<'_> {
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexData::U16(_) => IndexType::U16,
            IndexData::U32(_) => IndexType::U32,
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            IndexData::U16(indices) => indices.len(),
            IndexData::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(indices) => bytemuck::cast_slice(indices),
            IndexData::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

// ============================================================================
// SHARED GPU STATE
// ============================================================================

/// Buffers and vertex array shared by both geometry kinds
struct GpuBuffers {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Option<Arc<dyn Buffer>>,
    instance_buffer: Option<Arc<dyn Buffer>>,
    vertex_array: VertexArrayHandle,
    layout: VertexLayout,
    instance_count: AtomicU32,
}

impl GpuBuffers {
    fn create<V: VertexRecord, I: InstanceRecord>(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        indices: Option<IndexData<'_>>,
        instances: Option<&[I]>,
    ) -> Result<Self> {
        let instances = instances.filter(|_| vertex::has_instance_data::<I>());
        let layout = vertex::record_layout::<V, I>(instances.is_some());

        let (vertex_buffer, index_buffer, instance_buffer, vertex_array) = {
            let mut device = lock_device(&graphics_device)?;

            let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
            let vertex_buffer = device.create_buffer(BufferDesc {
                size: vertex_bytes.len() as u64,
                usage: BufferUsage::Vertex,
            }, vertex_bytes)?;

            let index_buffer = match indices {
                Some(indices) => Some(device.create_buffer(BufferDesc {
                    size: indices.as_bytes().len() as u64,
                    usage: BufferUsage::Index,
                }, indices.as_bytes())?),
                None => None,
            };

            let instance_buffer = match instances {
                Some(instances) => {
                    let instance_bytes: &[u8] = bytemuck::cast_slice(instances);
                    Some(device.create_buffer(BufferDesc {
                        size: instance_bytes.len() as u64,
                        usage: BufferUsage::Instance,
                    }, instance_bytes)?)
                }
                None => None,
            };

            let vertex_array = device.create_vertex_array(&VertexArrayDesc {
                vertex_buffer: vertex_buffer.clone(),
                index_buffer: index_buffer.clone(),
                instance_buffer: instance_buffer.clone(),
                layout: layout.clone(),
            })?;

            (vertex_buffer, index_buffer, instance_buffer, vertex_array)
        };

        Ok(Self {
            graphics_device,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            vertex_array,
            layout,
            instance_count: AtomicU32::new(instances.map_or(0, |i| i.len() as u32)),
        })
    }

    fn instance_count(&self) -> u32 {
        self.instance_count.load(Ordering::Acquire)
    }

    /// Overwrite the instance records (must fit the existing buffer)
    fn update_instances<I: InstanceRecord>(&self, instances: &[I]) -> Result<()> {
        let Some(buffer) = &self.instance_buffer else {
            engine_bail!(@InvalidResource, LOG_SOURCE, "Geometry has no instance buffer");
        };
        let bytes: &[u8] = bytemuck::cast_slice(instances);
        if bytes.len() as u64 > buffer.size() {
            engine_bail!(@InvalidResource, LOG_SOURCE,
                "{} instances ({} bytes) exceed the instance buffer ({} bytes)",
                instances.len(), bytes.len(), buffer.size());
        }
        buffer.update(0, bytes)?;
        self.instance_count.store(instances.len() as u32, Ordering::Release);
        Ok(())
    }
}

impl Drop for GpuBuffers {
    fn drop(&mut self) {
        match self.graphics_device.lock() {
            Ok(mut device) => device.destroy_vertex_array(self.vertex_array),
            Err(_) => engine_warn!(LOG_SOURCE,
                "Graphics device lock poisoned, leaking vertex array {}", self.vertex_array.0),
        }
    }
}

// ============================================================================
// ARRAYS GEOMETRY
// ============================================================================

/// Non-indexed geometry
pub struct ArraysGeometry<V: VertexRecord, I: InstanceRecord = ()> {
    buffers: GpuBuffers,
    vertex_count: u32,
    _records: PhantomData<fn() -> (V, I)>,
}

impl<V: VertexRecord> ArraysGeometry<V, ()> {
    /// Upload `vertices` as a non-instanced geometry
    pub fn new(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
    ) -> Result<Self> {
        Self::create(graphics_device, vertices, None)
    }
}

impl<V: VertexRecord, I: InstanceRecord> ArraysGeometry<V, I> {
    /// Upload `vertices` plus one `I` record per instance
    pub fn with_instances(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        instances: &[I],
    ) -> Result<Self> {
        Self::create(graphics_device, vertices, Some(instances))
    }

    fn create(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        instances: Option<&[I]>,
    ) -> Result<Self> {
        let buffers = GpuBuffers::create::<V, I>(graphics_device, vertices, None, instances)?;
        Ok(Self {
            buffers,
            vertex_count: vertices.len() as u32,
            _records: PhantomData,
        })
    }

    // ===== ACCESSORS =====

    pub fn graphics_device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.buffers.graphics_device
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffers.vertex_buffer
    }

    pub fn instance_buffer(&self) -> Option<&Arc<dyn Buffer>> {
        self.buffers.instance_buffer.as_ref()
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.buffers.vertex_array
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.buffers.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Whether draws use the instanced variants
    pub fn is_instanced(&self) -> bool {
        self.buffers.instance_buffer.is_some()
    }

    pub fn instance_count(&self) -> u32 {
        self.buffers.instance_count()
    }

    /// Replace the instance records (count may shrink, not grow)
    pub fn update_instances(&self, instances: &[I]) -> Result<()> {
        self.buffers.update_instances(instances)
    }
}

// ============================================================================
// ELEMENTS GEOMETRY
// ============================================================================

/// Indexed geometry
pub struct ElementsGeometry<V: VertexRecord, I: InstanceRecord = ()> {
    buffers: GpuBuffers,
    vertex_count: u32,
    index_count: u32,
    index_type: IndexType,
    _records: PhantomData<fn() -> (V, I)>,
}

impl<V: VertexRecord> ElementsGeometry<V, ()> {
    /// Upload `vertices` and `indices` as a non-instanced geometry
    pub fn new(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        indices: IndexData<'_>,
    ) -> Result<Self> {
        Self::create(graphics_device, vertices, indices, None)
    }
}

impl<V: VertexRecord, I: InstanceRecord> ElementsGeometry<V, I> {
    /// Upload `vertices`, `indices` and one `I` record per instance
    pub fn with_instances(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        indices: IndexData<'_>,
        instances: &[I],
    ) -> Result<Self> {
        Self::create(graphics_device, vertices, indices, Some(instances))
    }

    fn create(
        graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
        vertices: &[V],
        indices: IndexData<'_>,
        instances: Option<&[I]>,
    ) -> Result<Self> {
        if let IndexData::U16(_) = indices {
            if vertices.len() > u16::MAX as usize + 1 {
                engine_bail!(@InvalidResource, LOG_SOURCE,
                    "{} vertices cannot be addressed with 16-bit indices", vertices.len());
            }
        }
        let buffers = GpuBuffers::create::<V, I>(graphics_device, vertices, Some(indices), instances)?;
        Ok(Self {
            buffers,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
            index_type: indices.index_type(),
            _records: PhantomData,
        })
    }

    // ===== ACCESSORS =====

    pub fn graphics_device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.buffers.graphics_device
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffers.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&Arc<dyn Buffer>> {
        self.buffers.index_buffer.as_ref()
    }

    pub fn instance_buffer(&self) -> Option<&Arc<dyn Buffer>> {
        self.buffers.instance_buffer.as_ref()
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.buffers.vertex_array
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.buffers.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn index_type(&self) -> graphics_device::IndexType {
        self.index_type
    }

    pub fn is_instanced(&self) -> bool {
        self.buffers.instance_buffer.is_some()
    }

    pub fn instance_count(&self) -> u32 {
        self.buffers.instance_count()
    }

    /// Replace the instance records (count may shrink, not grow)
    pub fn update_instances(&self, instances: &[I]) -> Result<()> {
        self.buffers.update_instances(instances)
    }
}

#[cfg(test)]
#[path = "buffer_geometry_tests.rs"]
mod tests;
