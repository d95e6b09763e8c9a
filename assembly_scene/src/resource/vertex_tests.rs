/// Tests for vertex / instance records and the layouts built from them

use super::*;

/// Every attribute must fit inside its record
fn assert_attributes_fit(attributes: &[(BufferFormat, u32)], size: usize) {
    for &(format, offset) in attributes {
        assert!((offset + format.size_bytes()) as usize <= size,
            "{:?} at {} overflows a {} byte record", format, offset, size);
    }
}

// ============================================================================
// Tests: Records
// ============================================================================

#[test]
fn test_record_sizes() {
    assert_eq!(std::mem::size_of::<PositionVertex>(), 12);
    assert_eq!(std::mem::size_of::<PositionNormalVertex>(), 24);
    assert_eq!(std::mem::size_of::<()>(), 0);
}

#[test]
fn test_attributes_fit_records() {
    assert_attributes_fit(PositionVertex::ATTRIBUTES, 12);
    assert_attributes_fit(PositionNormalVertex::ATTRIBUTES, 24);
    assert_attributes_fit(GeometryInstance::ATTRIBUTES, GeometryInstance::SIZE);
}

#[test]
fn test_instance_attributes_cover_whole_record() {
    let covered: u32 = GeometryInstance::ATTRIBUTES.iter()
        .map(|(format, _)| format.size_bytes())
        .sum();
    assert_eq!(covered as usize, GeometryInstance::SIZE);
}

#[test]
fn test_has_instance_data() {
    assert!(!has_instance_data::<()>());
    assert!(has_instance_data::<GeometryInstance>());
}

// ============================================================================
// Tests: Layout
// ============================================================================

#[test]
fn test_vertex_only_layout() {
    let layout = record_layout::<PositionNormalVertex, ()>(true);

    assert_eq!(layout.bindings.len(), 1);
    assert_eq!(layout.stride(VERTEX_BINDING), Some(24));
    assert_eq!(layout.bindings[0].input_rate, VertexInputRate::Vertex);
    assert_eq!(layout.attributes.len(), 2);
    assert_eq!(layout.attributes[1].location, 1);
    assert_eq!(layout.attributes[1].offset, 12);
}

#[test]
fn test_instanced_layout_continues_locations() {
    let layout = record_layout::<PositionNormalVertex, GeometryInstance>(true);

    assert_eq!(layout.bindings.len(), 2);
    assert_eq!(layout.stride(INSTANCE_BINDING), Some(104));
    assert_eq!(layout.bindings[1].input_rate, VertexInputRate::Instance);

    let instance_attributes: Vec<&VertexAttribute> = layout.attributes.iter()
        .filter(|a| a.binding == INSTANCE_BINDING)
        .collect();
    assert_eq!(instance_attributes.len(), 11);
    assert_eq!(instance_attributes[0].location, 2);
    assert_eq!(instance_attributes[10].location, 12);
    assert_eq!(layout.next_location(), 13);
}

#[test]
fn test_instance_binding_skipped_when_not_instanced() {
    let layout = record_layout::<PositionVertex, GeometryInstance>(false);
    assert_eq!(layout.bindings.len(), 1);
    assert_eq!(layout.stride(INSTANCE_BINDING), None);
}
