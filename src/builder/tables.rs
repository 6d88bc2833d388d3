//! Fixed lookup tables mapping the specification onto xdmf vocabulary

use crate::specification::{FieldLocation, FieldType};

/// (topological dimension, corners per element) to xdmf topology type
const CELL_TYPES: &[((usize, usize), &str)] = &[
    ((1, 0), "Polyvertex"),
    ((1, 1), "Polyvertex"),
    ((1, 2), "Polyline"),
    ((2, 0), "Polyvertex"),
    ((2, 2), "Polyline"),
    ((2, 3), "Triangle"),
    ((2, 4), "Quadrilateral"),
    ((3, 0), "Polyvertex"),
    ((3, 4), "Tetrahedron"),
    ((3, 6), "Wedge"),
    ((3, 8), "Hexahedron"),
];

/// how the `NodesPerElement` attribute of a topology is filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodesPerElement {
    Fixed(usize),
    /// one element spanning every node of the topology
    ElementCount,
}

/// pairs missing here do not write `NodesPerElement`
const NODES_PER_ELEMENT: &[((usize, usize), NodesPerElement)] = &[
    ((1, 0), NodesPerElement::ElementCount),
    ((1, 2), NodesPerElement::Fixed(2)),
    ((2, 0), NodesPerElement::ElementCount),
    ((2, 2), NodesPerElement::Fixed(2)),
    ((3, 0), NodesPerElement::ElementCount),
];

fn lookup<T: Copy>(table: &[((usize, usize), T)], key: (usize, usize)) -> Option<T> {
    table
        .iter()
        .find(|(entry, _)| *entry == key)
        .map(|(_, value)| *value)
}

pub fn cell_type(dimension: usize, corners: usize) -> Option<&'static str> {
    lookup(CELL_TYPES, (dimension, corners))
}

pub fn nodes_per_element(dimension: usize, corners: usize) -> Option<NodesPerElement> {
    lookup(NODES_PER_ELEMENT, (dimension, corners))
}

/// `Type` of an xdmf `Attribute`. [`FieldType::None`] has no label
pub fn field_type_label(field_type: FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::Scalar => Some("Scalar"),
        FieldType::Vector => Some("Vector"),
        FieldType::Tensor => Some("Tensor6"),
        FieldType::Matrix => Some("Matrix"),
        FieldType::None => None,
    }
}

/// `Center` of an xdmf `Attribute`
pub fn field_location_label(location: FieldLocation) -> &'static str {
    match location {
        FieldLocation::Node => "Node",
        FieldLocation::Cell => "Cell",
    }
}
