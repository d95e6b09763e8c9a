//! GPU resource module
//!
//! Provides vertex / instance record types, buffer geometries and the
//! draw strategies that issue their draw calls.

pub mod vertex;
pub mod buffer_geometry;
pub mod draw_strategy;

pub use vertex::{
    VertexRecord, InstanceRecord,
    PositionVertex, PositionNormalVertex,
    VERTEX_BINDING, INSTANCE_BINDING,
};
pub use buffer_geometry::{ArraysGeometry, ElementsGeometry, IndexData};
pub use draw_strategy::{
    DrawStrategy, BindGuard,
    ArraysDrawStrategy, ElementsDrawStrategy,
};
