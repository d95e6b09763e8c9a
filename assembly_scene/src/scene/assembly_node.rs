/// Assembly nodes: the structural hierarchy (bill of materials) of a model.
///
/// Nodes reference their parent by id (`ROOT_PARENT_ID` for roots) and own
/// geometry primitives by id. The aggregated bound sits behind a per-node
/// lock so loader threads can contribute geometry concurrently; the
/// aggregator itself works through `&mut` and never locks.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use glam::{Vec3, Mat4};
use super::aabb::AABB;

/// Parent id of a root node
pub const ROOT_PARENT_ID: i32 = -1;

/// A node in the assembly hierarchy
#[derive(Debug)]
pub struct AssemblyNode {
    id: i32,
    name: String,
    model_id: i32,
    parent_id: i32,
    version: u32,
    bound: Mutex<AABB>,
    translation: Vec3,
    base_matrix: Mat4,
    transformed_matrix: Mat4,
    geometry_ids: Vec<i32>,
    sub_bom: Vec<i32>,
    color: Option<[f32; 4]>,
    attributes: BTreeMap<String, String>,
}

impl AssemblyNode {
    /// Create a root node with no geometry
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            model_id: 0,
            parent_id: ROOT_PARENT_ID,
            version: 0,
            bound: Mutex::new(AABB::EMPTY),
            translation: Vec3::ZERO,
            base_matrix: Mat4::IDENTITY,
            transformed_matrix: Mat4::IDENTITY,
            geometry_ids: Vec::new(),
            sub_bom: Vec::new(),
            color: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder: set the parent id
    pub fn with_parent(mut self, parent_id: i32) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Builder: set the owning model id
    pub fn with_model(mut self, model_id: i32) -> Self {
        self.model_id = model_id;
        self
    }

    /// Builder: set the display color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    // ===== ACCESSORS =====

    /// Node id (unique within a model)
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning model id
    pub fn model_id(&self) -> i32 {
        self.model_id
    }

    /// Parent id (`ROOT_PARENT_ID` for roots)
    pub fn parent_id(&self) -> i32 {
        self.parent_id
    }

    /// Whether this node is a root
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    /// Version counter, bumped on every transform change
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Aggregated bound
    pub fn bound(&self) -> AABB {
        *self.bound.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local translation component
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Base matrix (before translation)
    pub fn base_matrix(&self) -> Mat4 {
        self.base_matrix
    }

    /// Derived matrix: translation applied on top of the base matrix
    pub fn transformed_matrix(&self) -> Mat4 {
        self.transformed_matrix
    }

    /// Directly owned primitive ids, in load order
    pub fn geometry_ids(&self) -> &[i32] {
        &self.geometry_ids
    }

    /// Whether this node owns at least one primitive directly
    pub fn has_geometry(&self) -> bool {
        !self.geometry_ids.is_empty()
    }

    /// Child node ids
    pub fn sub_bom(&self) -> &[i32] {
        &self.sub_bom
    }

    /// Explicit display color (RGBA), if the loader assigned one
    pub fn color(&self) -> Option<[f32; 4]> {
        self.color
    }

    /// Set the display color
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = Some(color);
    }

    /// Free-form attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// All attributes, sorted by key
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Set a free-form attribute, returning the previous value
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    // ===== BOUND =====

    /// Grow the aggregated bound to enclose `other`.
    ///
    /// The read-modify-write happens under this node's lock, so it is safe
    /// to call from several loader threads at once.
    pub fn contain_bound(&self, other: &AABB) {
        let mut bound = self.bound.lock().unwrap_or_else(PoisonError::into_inner);
        *bound = bound.contain(other);
    }

    /// Exclusive access to the bound (no locking)
    pub(crate) fn bound_mut(&mut self) -> &mut AABB {
        self.bound.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== TRANSFORMS =====

    /// Replace the translation component and rebuild the derived matrix
    pub fn apply_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.update_transformed_matrix();
    }

    /// Replace the base matrix and rebuild the derived matrix
    pub fn apply_matrix(&mut self, base_matrix: Mat4) {
        self.base_matrix = base_matrix;
        self.update_transformed_matrix();
    }

    fn update_transformed_matrix(&mut self) {
        self.transformed_matrix = Mat4::from_translation(self.translation) * self.base_matrix;
        self.version = self.version.wrapping_add(1);
    }

    // ===== HIERARCHY (maintained by AssemblyModel) =====

    pub(crate) fn set_parent_id(&mut self, parent_id: i32) {
        self.parent_id = parent_id;
    }

    pub(crate) fn push_geometry(&mut self, geometry_id: i32) {
        if !self.geometry_ids.contains(&geometry_id) {
            self.geometry_ids.push(geometry_id);
        }
    }

    pub(crate) fn remove_geometry(&mut self, geometry_id: i32) -> bool {
        let before = self.geometry_ids.len();
        self.geometry_ids.retain(|&id| id != geometry_id);
        self.geometry_ids.len() != before
    }

    pub(crate) fn take_geometry_ids(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.geometry_ids)
    }

    pub(crate) fn push_child(&mut self, child_id: i32) {
        if !self.sub_bom.contains(&child_id) {
            self.sub_bom.push(child_id);
        }
    }

    pub(crate) fn remove_child(&mut self, child_id: i32) {
        self.sub_bom.retain(|&id| id != child_id);
    }

    pub(crate) fn take_children(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.sub_bom)
    }
}

#[cfg(test)]
#[path = "assembly_node_tests.rs"]
mod tests;
