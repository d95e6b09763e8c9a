/// Scene aggregation: bottom-up bound computation over an assembly model
/// and classification of assemblies with no geometry below them.
///
/// Aggregation runs in four strictly ordered phases:
///
/// 1. every node bound is reset to empty
/// 2. each node takes the union of its directly owned primitive bounds
/// 3. nodes are visited deepest first and take the union of their
///    children's bounds, read from a children-by-parent index built once
///    per pass
/// 4. the scene bound is the union of all root bounds
///
/// Bounds only grow through `AABB::contain`, which is commutative and
/// associative, so the result does not depend on hash-map iteration order.

use rdst::RadixSort;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::config::SceneConfig;
use crate::error::{Error, Result};
use crate::{engine_debug, engine_trace, engine_warn};
use super::aabb::AABB;
use super::assembly_model::AssemblyModel;
use super::assembly_node::ROOT_PARENT_ID;

const LOG_SOURCE: &str = "scene3d::Aggregator";

/// Computes aggregated bounds and empty-assembly sets for a model
#[derive(Debug, Clone, Default)]
pub struct SceneAggregator {
    log_empty_assemblies: bool,
}

impl SceneAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from scene settings
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            log_empty_assemblies: config.log_empty_assemblies,
        }
    }

    // ===== DEPTH =====

    /// Depth of every node: 0 for roots, parent depth + 1 otherwise.
    ///
    /// Depths already computed are reused, and each upward walk is capped
    /// at the node count. A walk that exceeds the cap (parent cycle) or
    /// reaches an id that is neither a node nor `ROOT_PARENT_ID` fails with
    /// `Error::StructuralIntegrity`.
    pub fn compute_depths(&self, model: &AssemblyModel) -> Result<FxHashMap<i32, u32>> {
        let node_count = model.node_count();
        let mut depths: FxHashMap<i32, u32> = FxHashMap::default();
        depths.reserve(node_count);
        let mut chain: Vec<i32> = Vec::new();

        // Sorted start order keeps the reported error stable
        for start in model.node_ids() {
            if depths.contains_key(&start) {
                continue;
            }

            chain.clear();
            let mut current = start;
            let anchor = loop {
                if chain.len() >= node_count {
                    return Err(structural_error(format!(
                        "parent chain of node {} does not reach a root within {} steps",
                        start, node_count
                    )));
                }
                chain.push(current);

                let parent_id = match model.node(current) {
                    Some(node) => node.parent_id(),
                    None => return Err(structural_error(format!(
                        "node {} is not part of the model", current
                    ))),
                };
                if parent_id == ROOT_PARENT_ID {
                    break 0;
                }
                if let Some(&parent_depth) = depths.get(&parent_id) {
                    break parent_depth + 1;
                }
                if !model.contains_node(parent_id) {
                    return Err(structural_error(format!(
                        "node {} references missing parent {}",
                        current, parent_id
                    )));
                }
                current = parent_id;
            };

            // The last chain entry sits at `anchor`, each earlier one a level deeper
            for (offset, id) in chain.iter().rev().enumerate() {
                depths.insert(*id, anchor + offset as u32);
            }
        }

        Ok(depths)
    }

    /// Node ids ordered by descending depth, ties broken by ascending id
    pub fn bottom_up_order(&self, model: &AssemblyModel) -> Result<Vec<i32>> {
        let depths = self.compute_depths(model)?;
        let max_depth = depths.values().copied().max().unwrap_or(0);

        // (inverted depth, id) packed so an ascending sort yields deepest first
        let mut keys: Vec<u64> = depths.iter()
            .map(|(&id, &depth)| ((max_depth - depth) as u64) << 32 | (id as u32 ^ 0x8000_0000) as u64)
            .collect();
        keys.radix_sort_unstable();

        Ok(keys.into_iter()
            .map(|key| ((key & 0xFFFF_FFFF) as u32 ^ 0x8000_0000) as i32)
            .collect())
    }

    // ===== AGGREGATION =====

    /// Recompute every node bound and the model's scene bound.
    ///
    /// On a structural error the hierarchy corruption is logged as a
    /// warning, the error is returned, and the model's scene bound keeps
    /// its previous value.
    pub fn aggregate_bounds(&self, model: &mut AssemblyModel) -> Result<AABB> {
        // Validate the hierarchy before touching any bound
        let order = self.bottom_up_order(model)?;
        let children = model.children_index();

        {
            let (nodes, primitives) = model.nodes_and_primitives_mut();

            // Phase 1 + 2: reset, then own geometry
            for node in nodes.values_mut() {
                let mut bound = AABB::EMPTY;
                for geometry_id in node.geometry_ids() {
                    match primitives.get(geometry_id) {
                        Some(primitive) => bound = bound.contain(&primitive.bound()),
                        None => engine_trace!(LOG_SOURCE,
                            "Node {} references unknown primitive {}", node.id(), geometry_id),
                    }
                }
                *node.bound_mut() = bound;
            }

            // Phase 3: deepest first, each node pulls in its finalized children
            for id in &order {
                let Some(child_ids) = children.get(id) else { continue };
                let folded = child_ids.iter()
                    .filter_map(|child_id| nodes.get(child_id))
                    .fold(AABB::EMPTY, |acc, child| acc.contain(&child.bound()));
                if folded.is_empty() {
                    continue;
                }
                if let Some(node) = nodes.get_mut(id) {
                    let bound = node.bound_mut();
                    *bound = bound.contain(&folded);
                }
            }
        }

        // Phase 4: scene bound
        let scene_bound = model.roots().into_iter()
            .filter_map(|id| model.node(id))
            .fold(AABB::EMPTY, |acc, node| acc.contain(&node.bound()));
        model.set_scene_bound(scene_bound);

        engine_debug!(LOG_SOURCE, "Aggregated {} nodes of model '{}'", order.len(), model.name());
        Ok(scene_bound)
    }

    // ===== CLASSIFICATION =====

    /// Nodes that own geometry, plus all of their ancestors.
    ///
    /// Each upward walk stops early at a node already in the set, and is
    /// capped at the node count.
    pub fn populated_assemblies(&self, model: &AssemblyModel) -> FxHashSet<i32> {
        let node_count = model.node_count();
        let mut populated: FxHashSet<i32> = FxHashSet::default();

        for node in model.nodes().filter(|n| n.has_geometry()) {
            if !populated.insert(node.id()) {
                continue;
            }
            let mut parent_id = node.parent_id();
            let mut steps = 0;
            while parent_id != ROOT_PARENT_ID && steps < node_count {
                let parent = match model.node(parent_id) {
                    Some(parent) => parent,
                    None => break,
                };
                if !populated.insert(parent_id) {
                    break;
                }
                parent_id = parent.parent_id();
                steps += 1;
            }
        }

        populated
    }

    /// Assemblies with no geometry anywhere in their subtree, as
    /// `(id, name)` pairs sorted by id
    pub fn empty_assemblies(&self, model: &AssemblyModel) -> Vec<(i32, String)> {
        let populated = self.populated_assemblies(model);
        let mut empty: Vec<(i32, String)> = model.nodes()
            .filter(|n| !populated.contains(&n.id()))
            .map(|n| (n.id(), n.name().to_string()))
            .collect();
        empty.sort_unstable_by_key(|(id, _)| *id);

        if self.log_empty_assemblies && !empty.is_empty() {
            let names: Vec<&str> = empty.iter().map(|(_, name)| name.as_str()).collect();
            engine_debug!(LOG_SOURCE, "{} empty assemblies in model '{}': {}",
                empty.len(), model.name(), names.join(", "));
        }

        empty
    }
}

fn structural_error(detail: String) -> Error {
    engine_warn!(LOG_SOURCE, "Corrupted model hierarchy: {}", detail);
    Error::StructuralIntegrity(detail)
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
