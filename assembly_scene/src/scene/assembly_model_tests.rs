/// Tests for AssemblyModel: population, ownership transfer, reparenting
/// and removal

use super::*;
use crate::error::Error;
use glam::Vec3;

fn cube(id: i32, origin: Vec3) -> GeometryPrimitive {
    GeometryPrimitive::cuboid(id, origin, origin + Vec3::ONE)
}

/// 1 -> 2 -> 3, plus a second root 4
fn chain_model() -> AssemblyModel {
    let mut model = AssemblyModel::new(9, "Plant");
    model.insert_node(AssemblyNode::new(1, "Site")).unwrap();
    model.insert_node(AssemblyNode::new(2, "Building").with_parent(1)).unwrap();
    model.insert_node(AssemblyNode::new(3, "Floor").with_parent(2)).unwrap();
    model.insert_node(AssemblyNode::new(4, "Yard")).unwrap();
    model
}

// ============================================================================
// Tests: Population
// ============================================================================

#[test]
fn test_insert_node_links_parent_and_stamps_model() {
    let model = chain_model();
    assert_eq!(model.node_count(), 4);
    assert_eq!(model.node(2).unwrap().model_id(), 9);
    assert_eq!(model.node(1).unwrap().sub_bom(), &[2]);
    assert_eq!(model.node(2).unwrap().sub_bom(), &[3]);
    assert_eq!(model.roots(), vec![1, 4]);
}

#[test]
fn test_insert_child_before_parent_is_adopted() {
    let mut model = AssemblyModel::new(1, "Out of order");
    model.insert_node(AssemblyNode::new(5, "Child").with_parent(2)).unwrap();
    model.insert_node(AssemblyNode::new(6, "Other child").with_parent(2)).unwrap();
    model.insert_node(AssemblyNode::new(2, "Parent")).unwrap();

    assert_eq!(model.node(2).unwrap().sub_bom(), &[5, 6]);
}

#[test]
fn test_insert_duplicate_node_fails() {
    let mut model = chain_model();
    let result = model.insert_node(AssemblyNode::new(3, "Again"));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(model.node(3).unwrap().name(), "Floor");
}

#[test]
fn test_insert_reserved_root_id_fails() {
    let mut model = AssemblyModel::new(1, "m");
    let result = model.insert_node(AssemblyNode::new(ROOT_PARENT_ID, "Bad"));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_insert_duplicate_primitive_fails() {
    let mut model = AssemblyModel::new(1, "m");
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    let result = model.insert_primitive(cube(10, Vec3::ONE));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(model.primitive_count(), 1);
}

#[test]
fn test_children_index_matches_parent_ids() {
    let model = chain_model();
    let index = model.children_index();
    assert_eq!(index.get(&1), Some(&vec![2]));
    assert_eq!(index.get(&2), Some(&vec![3]));
    assert!(index.get(&3).is_none());
    assert!(index.get(&4).is_none());
}

// ============================================================================
// Tests: Geometry Ownership
// ============================================================================

#[test]
fn test_attach_geometry() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    model.attach_geometry(3, 10).unwrap();

    assert_eq!(model.owner_of(10), Some(3));
    assert_eq!(model.node(3).unwrap().geometry_ids(), &[10]);
}

#[test]
fn test_attach_geometry_transfers_ownership() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    model.attach_geometry(3, 10).unwrap();
    model.attach_geometry(4, 10).unwrap();

    assert_eq!(model.owner_of(10), Some(4));
    assert!(model.node(3).unwrap().geometry_ids().is_empty());
    assert_eq!(model.node(4).unwrap().geometry_ids(), &[10]);
}

#[test]
fn test_attach_geometry_twice_to_same_node_is_idempotent() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    model.attach_geometry(3, 10).unwrap();
    model.attach_geometry(3, 10).unwrap();
    assert_eq!(model.node(3).unwrap().geometry_ids(), &[10]);
}

#[test]
fn test_attach_geometry_unknown_ids() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    assert!(matches!(model.attach_geometry(3, 99), Err(Error::NotFound(_))));
    assert!(matches!(model.attach_geometry(99, 10), Err(Error::NotFound(_))));
    assert_eq!(model.owner_of(10), None);
}

#[test]
fn test_remove_primitive_detaches_from_owner() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    model.attach_geometry(2, 10).unwrap();

    let removed = model.remove_primitive(10).unwrap();
    assert_eq!(removed.id(), 10);
    assert!(model.node(2).unwrap().geometry_ids().is_empty());
    assert_eq!(model.owner_of(10), None);
    assert!(model.remove_primitive(10).is_none());
}

// ============================================================================
// Tests: Reparenting
// ============================================================================

#[test]
fn test_set_parent_moves_sub_bom_entry() {
    let mut model = chain_model();
    model.set_parent(3, 4).unwrap();

    assert_eq!(model.node(3).unwrap().parent_id(), 4);
    assert!(model.node(2).unwrap().sub_bom().is_empty());
    assert_eq!(model.node(4).unwrap().sub_bom(), &[3]);
}

#[test]
fn test_set_parent_to_root() {
    let mut model = chain_model();
    model.set_parent(2, ROOT_PARENT_ID).unwrap();
    assert!(model.node(2).unwrap().is_root());
    assert!(model.node(1).unwrap().sub_bom().is_empty());
    assert_eq!(model.roots(), vec![1, 2, 4]);
}

#[test]
fn test_set_parent_rejects_cycle() {
    let mut model = chain_model();
    let result = model.set_parent(1, 3);
    assert!(matches!(result, Err(Error::StructuralIntegrity(_))));
    assert!(model.node(1).unwrap().is_root());
    assert_eq!(model.node(3).unwrap().parent_id(), 2);
}

#[test]
fn test_set_parent_rejects_self() {
    let mut model = chain_model();
    let result = model.set_parent(2, 2);
    assert!(matches!(result, Err(Error::StructuralIntegrity(_))));
    assert_eq!(model.node(2).unwrap().parent_id(), 1);
}

#[test]
fn test_set_parent_unknown_ids() {
    let mut model = chain_model();
    assert!(matches!(model.set_parent(42, 1), Err(Error::NotFound(_))));
    assert!(matches!(model.set_parent(2, 42), Err(Error::NotFound(_))));
}

// ============================================================================
// Tests: Removal
// ============================================================================

#[test]
fn test_remove_node_promotes_children() {
    let mut model = chain_model();
    let removed = model.remove_node(2).unwrap();

    assert_eq!(removed.name(), "Building");
    assert!(!model.contains_node(2));
    assert_eq!(model.node(3).unwrap().parent_id(), 1);
    assert_eq!(model.node(1).unwrap().sub_bom(), &[3]);
}

#[test]
fn test_remove_root_promotes_children_to_roots() {
    let mut model = chain_model();
    model.remove_node(1).unwrap();
    assert_eq!(model.roots(), vec![2, 4]);
}

#[test]
fn test_remove_node_drops_owned_primitives() {
    let mut model = chain_model();
    model.insert_primitive(cube(10, Vec3::ZERO)).unwrap();
    model.insert_primitive(cube(11, Vec3::ONE)).unwrap();
    model.attach_geometry(2, 10).unwrap();
    model.attach_geometry(3, 11).unwrap();

    model.remove_node(2).unwrap();

    assert!(model.primitive(10).is_none());
    assert_eq!(model.owner_of(10), None);
    assert!(model.primitive(11).is_some());
    assert_eq!(model.owner_of(11), Some(3));
}

#[test]
fn test_remove_unknown_node() {
    let mut model = chain_model();
    assert!(matches!(model.remove_node(77), Err(Error::NotFound(_))));
    assert_eq!(model.node_count(), 4);
}

// ============================================================================
// Tests: Concurrent Bound Contribution
// ============================================================================

#[test]
fn test_contribute_bound_from_threads() {
    let model = chain_model();

    std::thread::scope(|scope| {
        for t in 0..4 {
            let model = &model;
            scope.spawn(move || {
                for i in 0..25 {
                    let origin = Vec3::new((t * 25 + i) as f32, 0.0, 0.0);
                    model.contribute_bound(3, &AABB::new(origin, origin + Vec3::ONE)).unwrap();
                }
            });
        }
    });

    let bound = model.node(3).unwrap().bound();
    assert_eq!(bound.min, Vec3::ZERO);
    assert_eq!(bound.max, Vec3::new(100.0, 1.0, 1.0));
}

#[test]
fn test_contribute_bound_unknown_node() {
    let model = chain_model();
    let result = model.contribute_bound(50, &AABB::new(Vec3::ZERO, Vec3::ONE));
    assert!(matches!(result, Err(Error::NotFound(_))));
}
