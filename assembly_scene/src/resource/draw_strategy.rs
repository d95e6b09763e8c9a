//! Draw strategies: issue the draw calls of a buffer geometry.
//!
//! A strategy binds its geometry's vertex array, then issues whole or
//! ranged draws with the array or element variant (instanced when the
//! geometry carries instances). Draws against an inactive context are
//! skipped with a warning; ranges outside the geometry are rejected before
//! any GPU call.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use crate::error::Result;
use crate::{engine_bail, engine_trace, engine_warn};
use crate::graphics_device::{GraphicsDevice, IndexType, PrimitiveTopology, VertexArrayHandle};
use super::buffer_geometry::{lock_device, ArraysGeometry, ElementsGeometry};
use super::vertex::{InstanceRecord, VertexRecord};

const LOG_SOURCE: &str = "scene3d::DrawStrategy";

// ============================================================================
// DRAW STRATEGY TRAIT
// ============================================================================

/// Draw interface shared by all buffer geometries
pub trait DrawStrategy {
    /// Whether the geometry has anything to draw
    fn can_draw(&self) -> bool;

    /// Whether the device currently has this geometry's vertex array bound
    fn is_bound(&self) -> bool;

    /// Bind the geometry's vertex array
    fn bind(&mut self) -> Result<()>;

    /// Unbind the geometry's vertex array
    fn unbind(&mut self) -> Result<()>;

    /// Draw the whole geometry
    fn execute_draw(&self, topology: PrimitiveTopology) -> Result<()>;

    /// Draw `count` vertices (or indices) starting at `offset`.
    ///
    /// Fails with `Error::OutOfRange` when `offset + count` exceeds the
    /// vertex (or index) count. A zero `count` inside the range issues no
    /// GPU command.
    fn execute_draw_range(&self, topology: PrimitiveTopology, offset: u32, count: u32) -> Result<()>;

    /// Bind, returning a guard that unbinds when dropped
    fn bind_scoped(&mut self) -> Result<BindGuard<'_, Self>>
    where
        Self: Sized,
    {
        self.bind()?;
        Ok(BindGuard { strategy: self })
    }
}

/// Keeps a strategy bound for its lifetime
pub struct BindGuard<'a, S: DrawStrategy> {
    strategy: &'a mut S,
}

impl<S: DrawStrategy> Deref for BindGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.strategy
    }
}

impl<S: DrawStrategy> DerefMut for BindGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.strategy
    }
}

impl<S: DrawStrategy> Drop for BindGuard<'_, S> {
    fn drop(&mut self) {
        if self.strategy.is_bound() {
            if let Err(err) = self.strategy.unbind() {
                engine_warn!(LOG_SOURCE, "Unbind on guard drop failed: {}", err);
            }
        }
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// One draw call, resolved against the geometry
enum DrawCall {
    Arrays { first: u32, count: u32 },
    Elements { count: u32, index_type: IndexType, byte_offset: u64 },
}

/// `offset + count` must stay within `total`
fn check_range(kind: &str, offset: u32, count: u32, total: u32) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= total => Ok(()),
        _ => engine_bail!(@OutOfRange, LOG_SOURCE,
            "Draw range {}..{}+{} exceeds {} count {}", offset, offset, count, kind, total),
    }
}

/// Bind `vertex_array` on the device; a no-op with a warning when no
/// context is active
fn bind_vertex_array(
    graphics_device: &Arc<Mutex<dyn GraphicsDevice>>,
    vertex_array: VertexArrayHandle,
) -> Result<()> {
    let mut device = lock_device(graphics_device)?;
    if !device.is_context_active() {
        engine_warn!(LOG_SOURCE, "No active context, bind of vertex array {} skipped", vertex_array.0);
        return Ok(());
    }
    device.bind_vertex_array(vertex_array)
}

fn is_vertex_array_bound(
    graphics_device: &Arc<Mutex<dyn GraphicsDevice>>,
    vertex_array: VertexArrayHandle,
) -> bool {
    lock_device(graphics_device)
        .map(|device| device.current_vertex_array() == Some(vertex_array))
        .unwrap_or(false)
}

/// Unbind only when `vertex_array` is the one bound on the device
fn unbind_vertex_array(
    graphics_device: &Arc<Mutex<dyn GraphicsDevice>>,
    vertex_array: VertexArrayHandle,
) -> Result<()> {
    let mut device = lock_device(graphics_device)?;
    if device.current_vertex_array() != Some(vertex_array) {
        return Ok(());
    }
    if !device.is_context_active() {
        engine_warn!(LOG_SOURCE, "No active context, unbind skipped");
        return Ok(());
    }
    device.unbind_vertex_array()
}

/// Issue a draw: skipped with a warning when no context is active, an
/// error when `vertex_array` is not the one bound on the device
fn issue(
    graphics_device: &Arc<Mutex<dyn GraphicsDevice>>,
    vertex_array: VertexArrayHandle,
    topology: PrimitiveTopology,
    call: DrawCall,
    instances: Option<u32>,
) -> Result<()> {
    let mut device = lock_device(graphics_device)?;
    if !device.is_context_active() {
        engine_warn!(LOG_SOURCE, "No active context, draw skipped");
        return Ok(());
    }
    if device.current_vertex_array() != Some(vertex_array) {
        engine_bail!(@InvalidResource, LOG_SOURCE,
            "Draw issued on vertex array {} while it is not bound", vertex_array.0);
    }

    match (call, instances) {
        (_, Some(0)) => {
            engine_trace!(LOG_SOURCE, "Instanced draw with no instances skipped");
            Ok(())
        }
        (DrawCall::Arrays { first, count }, None) =>
            device.draw_arrays(topology, first, count),
        (DrawCall::Arrays { first, count }, Some(instance_count)) =>
            device.draw_arrays_instanced(topology, first, count, instance_count),
        (DrawCall::Elements { count, index_type, byte_offset }, None) =>
            device.draw_elements(topology, count, index_type, byte_offset),
        (DrawCall::Elements { count, index_type, byte_offset }, Some(instance_count)) =>
            device.draw_elements_instanced(topology, count, index_type, byte_offset, instance_count),
    }
}

// ============================================================================
// ARRAYS DRAW STRATEGY
// ============================================================================

/// Draws an `ArraysGeometry` with `draw_arrays`
pub struct ArraysDrawStrategy<V: VertexRecord, I: InstanceRecord = ()> {
    geometry: Arc<ArraysGeometry<V, I>>,
}

impl<V: VertexRecord, I: InstanceRecord> ArraysDrawStrategy<V, I> {
    pub fn new(geometry: Arc<ArraysGeometry<V, I>>) -> Self {
        Self { geometry }
    }

    /// Build from a geometry that may be absent
    pub fn try_new(geometry: Option<Arc<ArraysGeometry<V, I>>>) -> Result<Self> {
        match geometry {
            Some(geometry) => Ok(Self::new(geometry)),
            None => engine_bail!(@InvalidResource, LOG_SOURCE,
                "Arrays draw strategy requires a geometry"),
        }
    }

    pub fn geometry(&self) -> &Arc<ArraysGeometry<V, I>> {
        &self.geometry
    }

    fn instances(&self) -> Option<u32> {
        self.geometry.is_instanced().then(|| self.geometry.instance_count())
    }
}

impl<V: VertexRecord, I: InstanceRecord> DrawStrategy for ArraysDrawStrategy<V, I> {
    fn can_draw(&self) -> bool {
        self.geometry.vertex_count() > 0
    }

    fn is_bound(&self) -> bool {
        is_vertex_array_bound(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn bind(&mut self) -> Result<()> {
        bind_vertex_array(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn unbind(&mut self) -> Result<()> {
        unbind_vertex_array(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn execute_draw(&self, topology: PrimitiveTopology) -> Result<()> {
        if !self.can_draw() {
            engine_trace!(LOG_SOURCE, "Empty arrays geometry, draw skipped");
            return Ok(());
        }
        issue(
            self.geometry.graphics_device(),
            self.geometry.vertex_array(),
            topology,
            DrawCall::Arrays { first: 0, count: self.geometry.vertex_count() },
            self.instances(),
        )
    }

    fn execute_draw_range(&self, topology: PrimitiveTopology, offset: u32, count: u32) -> Result<()> {
        check_range("vertex", offset, count, self.geometry.vertex_count())?;
        if count == 0 {
            return Ok(());
        }
        issue(
            self.geometry.graphics_device(),
            self.geometry.vertex_array(),
            topology,
            DrawCall::Arrays { first: offset, count },
            self.instances(),
        )
    }
}

// ============================================================================
// ELEMENTS DRAW STRATEGY
// ============================================================================

/// Draws an `ElementsGeometry` with `draw_elements`
pub struct ElementsDrawStrategy<V: VertexRecord, I: InstanceRecord = ()> {
    geometry: Arc<ElementsGeometry<V, I>>,
}

impl<V: VertexRecord, I: InstanceRecord> ElementsDrawStrategy<V, I> {
    pub fn new(geometry: Arc<ElementsGeometry<V, I>>) -> Self {
        Self { geometry }
    }

    /// Build from a geometry that may be absent
    pub fn try_new(geometry: Option<Arc<ElementsGeometry<V, I>>>) -> Result<Self> {
        match geometry {
            Some(geometry) => Ok(Self::new(geometry)),
            None => engine_bail!(@InvalidResource, LOG_SOURCE,
                "Elements draw strategy requires a geometry"),
        }
    }

    pub fn geometry(&self) -> &Arc<ElementsGeometry<V, I>> {
        &self.geometry
    }

    fn instances(&self) -> Option<u32> {
        self.geometry.is_instanced().then(|| self.geometry.instance_count())
    }

    fn byte_offset(&self, offset: u32) -> u64 {
        offset as u64 * self.geometry.index_type().size_bytes() as u64
    }
}

impl<V: VertexRecord, I: InstanceRecord> DrawStrategy for ElementsDrawStrategy<V, I> {
    fn can_draw(&self) -> bool {
        self.geometry.index_count() > 0
    }

    fn is_bound(&self) -> bool {
        is_vertex_array_bound(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn bind(&mut self) -> Result<()> {
        bind_vertex_array(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn unbind(&mut self) -> Result<()> {
        unbind_vertex_array(self.geometry.graphics_device(), self.geometry.vertex_array())
    }

    fn execute_draw(&self, topology: PrimitiveTopology) -> Result<()> {
        if !self.can_draw() {
            engine_trace!(LOG_SOURCE, "Empty elements geometry, draw skipped");
            return Ok(());
        }
        issue(
            self.geometry.graphics_device(),
            self.geometry.vertex_array(),
            topology,
            DrawCall::Elements {
                count: self.geometry.index_count(),
                index_type: self.geometry.index_type(),
                byte_offset: 0,
            },
            self.instances(),
        )
    }

    fn execute_draw_range(&self, topology: PrimitiveTopology, offset: u32, count: u32) -> Result<()> {
        check_range("index", offset, count, self.geometry.index_count())?;
        if count == 0 {
            return Ok(());
        }
        issue(
            self.geometry.graphics_device(),
            self.geometry.vertex_array(),
            topology,
            DrawCall::Elements {
                count,
                index_type: self.geometry.index_type(),
                byte_offset: self.byte_offset(offset),
            },
            self.instances(),
        )
    }
}

#[cfg(test)]
#[path = "draw_strategy_tests.rs"]
mod tests;
