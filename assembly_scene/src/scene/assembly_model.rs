/// AssemblyModel: the single owner of a model's node and primitive maps.
///
/// Nodes and primitives are stored in id-keyed arenas. Every operation that
/// touches the hierarchy goes through this type so that `sub_bom` lists,
/// parent ids and primitive ownership stay consistent with each other.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{engine_bail, engine_err, engine_debug};
use super::aabb::AABB;
use super::assembly_node::{AssemblyNode, ROOT_PARENT_ID};
use super::primitive::GeometryPrimitive;

const LOG_SOURCE: &str = "scene3d::AssemblyModel";

/// A loaded model: assembly forest plus the primitives it references
#[derive(Debug)]
pub struct AssemblyModel {
    /// Model id (stamped on every inserted node)
    id: i32,
    /// Display name
    name: String,
    /// Node arena keyed by node id
    nodes: FxHashMap<i32, AssemblyNode>,
    /// Primitive arena keyed by primitive id
    primitives: FxHashMap<i32, GeometryPrimitive>,
    /// Primitive id -> owning node id
    owners: FxHashMap<i32, i32>,
    /// Union of all root bounds, as of the last aggregation
    scene_bound: AABB,
}

impl AssemblyModel {
    /// Create an empty model
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nodes: FxHashMap::default(),
            primitives: FxHashMap::default(),
            owners: FxHashMap::default(),
            scene_bound: AABB::EMPTY,
        }
    }

    // ===== ACCESSORS =====

    /// Model id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene bound computed by the last successful aggregation
    pub fn scene_bound(&self) -> AABB {
        self.scene_bound
    }

    pub(crate) fn set_scene_bound(&mut self, bound: AABB) {
        self.scene_bound = bound;
    }

    /// Get a node by id
    pub fn node(&self, id: i32) -> Option<&AssemblyNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by id
    pub fn node_mut(&mut self, id: i32) -> Option<&mut AssemblyNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether a node exists
    pub fn contains_node(&self, id: i32) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes (arbitrary order)
    pub fn nodes(&self) -> impl Iterator<Item = &AssemblyNode> {
        self.nodes.values()
    }

    /// All node ids, sorted
    pub fn node_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Get a primitive by id
    pub fn primitive(&self, id: i32) -> Option<&GeometryPrimitive> {
        self.primitives.get(&id)
    }

    /// Get a mutable primitive by id (e.g. to replace its vertices)
    pub fn primitive_mut(&mut self, id: i32) -> Option<&mut GeometryPrimitive> {
        self.primitives.get_mut(&id)
    }

    /// Number of primitives
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Node currently owning a primitive
    pub fn owner_of(&self, primitive_id: i32) -> Option<i32> {
        self.owners.get(&primitive_id).copied()
    }

    /// Root node ids (parent = `ROOT_PARENT_ID`), sorted
    pub fn roots(&self) -> Vec<i32> {
        let mut roots: Vec<i32> = self.nodes.values()
            .filter(|n| n.is_root())
            .map(|n| n.id())
            .collect();
        roots.sort_unstable();
        roots
    }

    /// Children-by-parent index derived from parent ids.
    ///
    /// Built from the back-references rather than `sub_bom`, so it reflects
    /// exactly what the aggregator sees. Child lists are sorted.
    pub fn children_index(&self) -> FxHashMap<i32, Vec<i32>> {
        let mut index: FxHashMap<i32, Vec<i32>> = FxHashMap::default();
        for node in self.nodes.values() {
            if !node.is_root() {
                index.entry(node.parent_id()).or_default().push(node.id());
            }
        }
        for children in index.values_mut() {
            children.sort_unstable();
        }
        index
    }

    /// Split borrow for the aggregator: mutable nodes, shared primitives
    pub(crate) fn nodes_and_primitives_mut(
        &mut self,
    ) -> (&mut FxHashMap<i32, AssemblyNode>, &FxHashMap<i32, GeometryPrimitive>) {
        (&mut self.nodes, &self.primitives)
    }

    // ===== POPULATION =====

    /// Add a primitive (not yet owned by any node)
    pub fn insert_primitive(&mut self, primitive: GeometryPrimitive) -> Result<()> {
        let id = primitive.id();
        if self.primitives.contains_key(&id) {
            engine_bail!(@InvalidResource, LOG_SOURCE,
                "Primitive id {} already exists in model '{}'", id, self.name);
        }
        self.primitives.insert(id, primitive);
        Ok(())
    }

    /// Add a node.
    ///
    /// The node is linked into its parent's `sub_bom` if the parent is
    /// already present, and adopts any previously inserted nodes naming it
    /// as their parent. A parent that never shows up is reported by the
    /// aggregator as a dangling reference.
    pub fn insert_node(&mut self, node: AssemblyNode) -> Result<()> {
        let id = node.id();
        if id == ROOT_PARENT_ID {
            engine_bail!(@InvalidResource, LOG_SOURCE,
                "Node id {} is reserved for the root parent", id);
        }
        if self.nodes.contains_key(&id) {
            engine_bail!(@InvalidResource, LOG_SOURCE,
                "Node id {} already exists in model '{}'", id, self.name);
        }

        let mut node = node.with_model(self.id);
        let parent_id = node.parent_id();

        let mut orphans: Vec<i32> = self.nodes.values()
            .filter(|n| n.parent_id() == id)
            .map(|n| n.id())
            .collect();
        orphans.sort_unstable();
        for child in orphans {
            node.push_child(child);
        }

        self.nodes.insert(id, node);

        if parent_id != ROOT_PARENT_ID {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.push_child(id);
            }
        }
        Ok(())
    }

    /// Give ownership of a primitive to a node.
    ///
    /// If another node owned it, that node's geometry list is updated too.
    pub fn attach_geometry(&mut self, node_id: i32, primitive_id: i32) -> Result<()> {
        if !self.primitives.contains_key(&primitive_id) {
            engine_bail!(@NotFound, LOG_SOURCE, "Primitive {} not found", primitive_id);
        }
        if !self.nodes.contains_key(&node_id) {
            engine_bail!(@NotFound, LOG_SOURCE, "Assembly node {} not found", node_id);
        }

        if let Some(previous) = self.owners.insert(primitive_id, node_id) {
            if previous != node_id {
                if let Some(old_owner) = self.nodes.get_mut(&previous) {
                    old_owner.remove_geometry(primitive_id);
                }
                engine_debug!(LOG_SOURCE,
                    "Primitive {} moved from node {} to node {}", primitive_id, previous, node_id);
            }
        }

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.push_geometry(primitive_id);
        }
        Ok(())
    }

    /// Remove a primitive from the model and from its owner's geometry list
    pub fn remove_primitive(&mut self, primitive_id: i32) -> Option<GeometryPrimitive> {
        let primitive = self.primitives.remove(&primitive_id)?;
        if let Some(owner) = self.owners.remove(&primitive_id) {
            if let Some(node) = self.nodes.get_mut(&owner) {
                node.remove_geometry(primitive_id);
            }
        }
        Some(primitive)
    }

    /// Move a node under a new parent (`ROOT_PARENT_ID` makes it a root).
    ///
    /// Rejects moves that would close a cycle.
    pub fn set_parent(&mut self, node_id: i32, parent_id: i32) -> Result<()> {
        let old_parent = match self.nodes.get(&node_id) {
            Some(node) => node.parent_id(),
            None => engine_bail!(@NotFound, LOG_SOURCE, "Assembly node {} not found", node_id),
        };

        if parent_id != ROOT_PARENT_ID {
            if !self.nodes.contains_key(&parent_id) {
                engine_bail!(@NotFound, LOG_SOURCE, "Parent node {} not found", parent_id);
            }
            if self.is_ancestor_or_self(node_id, parent_id) {
                return Err(engine_err!(@StructuralIntegrity, LOG_SOURCE,
                    "Moving node {} under {} would create a parent cycle", node_id, parent_id));
            }
        }

        if old_parent != ROOT_PARENT_ID {
            if let Some(parent) = self.nodes.get_mut(&old_parent) {
                parent.remove_child(node_id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.set_parent_id(parent_id);
        }
        if parent_id != ROOT_PARENT_ID {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.push_child(node_id);
            }
        }
        Ok(())
    }

    /// Remove a node.
    ///
    /// The node is detached from its parent's `sub_bom`, its children are
    /// promoted to its parent, and the primitives it owned are removed from
    /// the model.
    pub fn remove_node(&mut self, node_id: i32) -> Result<AssemblyNode> {
        let mut node = match self.nodes.remove(&node_id) {
            Some(node) => node,
            None => engine_bail!(@NotFound, LOG_SOURCE, "Assembly node {} not found", node_id),
        };
        let parent_id = node.parent_id();

        if parent_id != ROOT_PARENT_ID {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.remove_child(node_id);
            }
        }

        // Promote children from the back-references, not only sub_bom
        let mut children: Vec<i32> = self.nodes.values()
            .filter(|n| n.parent_id() == node_id)
            .map(|n| n.id())
            .collect();
        children.sort_unstable();
        node.take_children();
        for child in &children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.set_parent_id(parent_id);
            }
        }
        if parent_id != ROOT_PARENT_ID {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                for child in &children {
                    parent.push_child(*child);
                }
            }
        }

        for primitive_id in node.take_geometry_ids() {
            self.owners.remove(&primitive_id);
            self.primitives.remove(&primitive_id);
        }

        Ok(node)
    }

    /// Grow a node's bound while the model is still being populated.
    ///
    /// Takes `&self`, so several loader threads may call it at once; the
    /// node's own lock serializes the union. The next aggregation
    /// recomputes every bound from scratch.
    pub fn contribute_bound(&self, node_id: i32, bound: &AABB) -> Result<()> {
        match self.nodes.get(&node_id) {
            Some(node) => {
                node.contain_bound(bound);
                Ok(())
            }
            None => Err(engine_err!(@NotFound, LOG_SOURCE,
                "Assembly node {} not found", node_id)),
        }
    }

    /// Whether `ancestor` is `node` or lies on `node`'s parent chain
    /// (walk capped at the node count)
    fn is_ancestor_or_self(&self, ancestor: i32, node: i32) -> bool {
        let mut current = node;
        for _ in 0..=self.nodes.len() {
            if current == ancestor {
                return true;
            }
            match self.nodes.get(&current) {
                Some(n) if !n.is_root() => current = n.parent_id(),
                _ => return false,
            }
        }
        // Cap reached: the existing chain is already cyclic
        true
    }
}

#[cfg(test)]
#[path = "assembly_model_tests.rs"]
mod tests;
