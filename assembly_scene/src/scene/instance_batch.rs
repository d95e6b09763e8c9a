/// InstanceBatch: GPU instance records for every placed primitive of a
/// model, grouped by primitive kind for upload.

use std::collections::BTreeMap;
use rustc_hash::FxHashMap;
use crate::config::SceneConfig;
use crate::engine_trace;
use super::assembly_model::AssemblyModel;
use super::geometry_instance::{GeometryInstance, SelectionState};
use super::primitive::PrimitiveKind;

/// Instance records grouped by primitive kind
#[derive(Debug, Clone, Default)]
pub struct InstanceBatch {
    groups: BTreeMap<PrimitiveKind, Vec<GeometryInstance>>,
}

impl InstanceBatch {
    /// Build one instance per owned primitive.
    ///
    /// Nodes are visited by ascending id and primitives in ownership order,
    /// so the record order is stable between builds. `selection` maps node
    /// ids to their interaction state; absent nodes are unselected.
    pub fn build(
        model: &AssemblyModel,
        config: &SceneConfig,
        selection: &FxHashMap<i32, SelectionState>,
    ) -> Self {
        let mut groups: BTreeMap<PrimitiveKind, Vec<GeometryInstance>> = BTreeMap::new();

        for node_id in model.node_ids() {
            let Some(node) = model.node(node_id) else { continue };
            let state = selection.get(&node_id).copied().unwrap_or_default();
            let color = match state {
                SelectionState::None => node.color().unwrap_or(config.default_color),
                SelectionState::Hovered => config.hovered_color,
                SelectionState::Selected => config.selected_color,
            };
            let transform = node.transformed_matrix();

            for &geometry_id in node.geometry_ids() {
                let Some(primitive) = model.primitive(geometry_id) else {
                    engine_trace!("scene3d::InstanceBatch",
                        "Node {} references unknown primitive {}", node_id, geometry_id);
                    continue;
                };
                let kind = primitive.kind();
                let mut instance = GeometryInstance::new(geometry_id, node_id, kind, transform)
                    .with_color(color)
                    .with_selection(state)
                    .with_layers(config.default_layers);
                if kind == PrimitiveKind::Mesh {
                    instance = instance.with_mesh(geometry_id);
                }
                groups.entry(kind).or_default().push(instance);
            }
        }

        Self { groups }
    }

    /// Kinds present in the batch, in tag order
    pub fn kinds(&self) -> impl Iterator<Item = PrimitiveKind> + '_ {
        self.groups.keys().copied()
    }

    /// Instances of one kind (empty if none)
    pub fn instances(&self, kind: PrimitiveKind) -> &[GeometryInstance] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instances of one kind as raw bytes for a GPU upload
    pub fn as_bytes(&self, kind: PrimitiveKind) -> &[u8] {
        bytemuck::cast_slice(self.instances(kind))
    }

    /// Total instance count
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the instance of a primitive
    pub fn find(&self, geometry_id: i32) -> Option<&GeometryInstance> {
        self.groups.values()
            .flat_map(|group| group.iter())
            .find(|instance| instance.geometry_id == geometry_id)
    }
}

#[cfg(test)]
#[path = "instance_batch_tests.rs"]
mod tests;
