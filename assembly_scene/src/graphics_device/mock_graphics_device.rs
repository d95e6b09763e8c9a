/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every GPU-touching call as a string so tests can assert on the
/// exact command stream, and validates the same preconditions a real
/// backend would reject (draw without a bound vertex array, oversize upload).

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(test)]
use rustc_hash::FxHashMap;

#[cfg(test)]
use crate::graphics_device::{
    GraphicsDevice, GraphicsDeviceStats, Buffer, BufferDesc, BufferUsage,
    VertexArrayDesc, VertexArrayHandle, PrimitiveTopology, IndexType,
};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::engine_bail;

// ============================================================================
// Mock Buffer
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub usage: BufferUsage,
    pub name: String,
    /// Total bytes written through update()
    pub bytes_written: AtomicU64,
}

#[cfg(test)]
impl MockBuffer {
    pub fn new(size: u64, usage: BufferUsage, name: String) -> Self {
        Self { size, usage, name, bytes_written: AtomicU64::new(0) }
    }
}

#[cfg(test)]
impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            engine_bail!("scene3d::mock",
                "update of {} bytes at offset {} overflows buffer '{}' ({} bytes)",
                data.len(), offset, self.name, self.size);
        }
        self.bytes_written.fetch_add(data.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[cfg(test)]
pub struct MockGraphicsDevice {
    /// Recorded command stream (shared so tests can keep a handle)
    pub commands: Arc<Mutex<Vec<String>>>,
    /// Whether a rendering context is current
    pub context_active: bool,
    /// Layouts of live vertex arrays
    pub vertex_arrays: FxHashMap<VertexArrayHandle, VertexArrayDesc>,
    /// Currently bound vertex array
    pub bound_vertex_array: Option<VertexArrayHandle>,
    next_handle: u32,
    buffer_count: u32,
    draw_calls: u32,
}

#[cfg(test)]
impl MockGraphicsDevice {
    /// Create a new mock device with an active context
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            context_active: true,
            vertex_arrays: FxHashMap::default(),
            bound_vertex_array: None,
            next_handle: 1,
            buffer_count: 0,
            draw_calls: 0,
        }
    }

    /// Snapshot of the recorded commands
    pub fn recorded(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Recorded draw commands only
    pub fn draw_commands(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter(|c| c.starts_with("draw"))
            .collect()
    }

    fn record(&self, command: String) {
        self.commands.lock().unwrap().push(command);
    }

    fn require_bound(&self, call: &str) -> Result<()> {
        if self.bound_vertex_array.is_none() {
            engine_bail!("scene3d::mock", "{}: no vertex array bound", call);
        }
        Ok(())
    }
}

#[cfg(test)]
impl GraphicsDevice for MockGraphicsDevice {
    fn is_context_active(&self) -> bool {
        self.context_active
    }

    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>> {
        if data.len() as u64 > desc.size {
            engine_bail!("scene3d::mock",
                "create_buffer: {} bytes of data for a {} byte buffer", data.len(), desc.size);
        }
        self.buffer_count += 1;
        let name = format!("{:?}_buffer_{}", desc.usage, desc.size);
        self.record(format!("create_buffer({:?}, {})", desc.usage, desc.size));
        let buffer = MockBuffer::new(desc.size, desc.usage, name);
        buffer.update(0, data)?;
        Ok(Arc::new(buffer))
    }

    fn create_vertex_array(&mut self, desc: &VertexArrayDesc) -> Result<VertexArrayHandle> {
        let handle = VertexArrayHandle(self.next_handle);
        self.next_handle += 1;
        self.vertex_arrays.insert(handle, desc.clone());
        self.record(format!("create_vertex_array({})", handle.0));
        Ok(handle)
    }

    fn destroy_vertex_array(&mut self, handle: VertexArrayHandle) {
        self.vertex_arrays.remove(&handle);
        if self.bound_vertex_array == Some(handle) {
            self.bound_vertex_array = None;
        }
        self.record(format!("destroy_vertex_array({})", handle.0));
    }

    fn bind_vertex_array(&mut self, handle: VertexArrayHandle) -> Result<()> {
        if !self.vertex_arrays.contains_key(&handle) {
            engine_bail!("scene3d::mock", "bind_vertex_array: unknown handle {}", handle.0);
        }
        self.bound_vertex_array = Some(handle);
        self.record(format!("bind_vertex_array({})", handle.0));
        Ok(())
    }

    fn unbind_vertex_array(&mut self) -> Result<()> {
        self.bound_vertex_array = None;
        self.record("unbind_vertex_array".to_string());
        Ok(())
    }

    fn current_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.bound_vertex_array
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) -> Result<()> {
        self.require_bound("draw_arrays")?;
        self.draw_calls += 1;
        self.record(format!("draw_arrays({:?}, {}, {})", topology, first, count));
        Ok(())
    }

    fn draw_arrays_instanced(
        &mut self,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
        instance_count: u32,
    ) -> Result<()> {
        self.require_bound("draw_arrays_instanced")?;
        self.draw_calls += 1;
        self.record(format!("draw_arrays_instanced({:?}, {}, {}, {})",
            topology, first, count, instance_count));
        Ok(())
    }

    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u64,
    ) -> Result<()> {
        self.require_bound("draw_elements")?;
        self.draw_calls += 1;
        self.record(format!("draw_elements({:?}, {}, {:?}, {})",
            topology, count, index_type, byte_offset));
        Ok(())
    }

    fn draw_elements_instanced(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u64,
        instance_count: u32,
    ) -> Result<()> {
        self.require_bound("draw_elements_instanced")?;
        self.draw_calls += 1;
        self.record(format!("draw_elements_instanced({:?}, {}, {:?}, {}, {})",
            topology, count, index_type, byte_offset, instance_count));
        Ok(())
    }

    fn stats(&self) -> GraphicsDeviceStats {
        GraphicsDeviceStats {
            draw_calls: self.draw_calls,
            buffers: self.buffer_count,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
