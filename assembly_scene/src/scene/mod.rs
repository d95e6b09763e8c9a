//! Scene model module
//!
//! Provides the assembly hierarchy, spatial bounds, bottom-up bound
//! aggregation and per-instance GPU records.

mod aabb;
mod primitive;
mod assembly_node;
mod assembly_model;
mod aggregator;
mod geometry_instance;
mod instance_batch;

pub use aabb::AABB;
pub use primitive::{GeometryPrimitive, PrimitiveKind};
pub use assembly_node::{AssemblyNode, ROOT_PARENT_ID};
pub use assembly_model::AssemblyModel;
pub use aggregator::SceneAggregator;
pub use geometry_instance::{GeometryInstance, RenderLayers, SelectionState};
pub use instance_batch::InstanceBatch;
