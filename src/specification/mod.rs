//! # Specification
//!
//! A [`Specification`] is the language agnostic description of everything an xdmf document
//! needs to say about a container: which grids exist, at which times, what their
//! topology and geometry are, and which fields live on them. It holds no array data, only
//! the addressing information (file, path, shape, offsets) needed to point at it.
//!
//! Specifications are built in full by [`Specification::from_single_source`] or
//! [`Specification::from_multiple_sources`] and are only read afterwards by the
//! [builder](`crate::builder`).

mod error;
mod extract;
mod fields;

pub use error::*;
pub use extract::PARTICLE_DOMAIN;
pub use fields::generate_fields;

use std::collections::BTreeMap;

/// where a binary array lives. Never interpreted, only formatted as `file:path`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub path: String,
}

impl Location {
    pub fn new<F: Into<String>, P: Into<String>>(file: F, path: P) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
        }
    }

    /// the `file:path` reference written into data items
    pub fn reference(&self) -> String {
        format!("{}:{}", self.file, self.path)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldType {
    #[default]
    None,
    Scalar,
    Vector,
    Tensor,
    Matrix,
}

impl FieldType {
    /// map the `vector_field_type` attribute written by petsc
    pub fn from_petsc_name(name: &str) -> Self {
        match name {
            "scalar" => Self::Scalar,
            "vector" => Self::Vector,
            "tensor" => Self::Tensor,
            "matrix" => Self::Matrix,
            _ => Self::None,
        }
    }
}

/// the topological entity a field is centered on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldLocation {
    #[default]
    Node,
    Cell,
}

/// Addressing and typing information for one field (or one component of a packed field)
///
/// `shape` is always the shape of the array in the container, even after a packed field
/// has been split into components. Scalars stored without a component axis get a trailing
/// `1` appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescription {
    pub name: String,
    pub location: Location,
    pub shape: Vec<usize>,
    pub time_offset: usize,
    pub component_offset: usize,
    pub component_stride: usize,
    pub component_dimension: usize,
    pub field_location: FieldLocation,
    pub field_type: FieldType,
    pub has_time_dimension: bool,
}

impl FieldDescription {
    /// number of values per node / cell exposed to the output
    pub fn dimension(&self) -> usize {
        self.component_dimension
    }

    /// number of nodes or cells the field is defined over
    pub fn dof(&self) -> usize {
        if self.shape.len() > 2 {
            self.shape[1]
        } else {
            self.shape.first().copied().unwrap_or(0)
        }
    }

    pub fn has_time_dimension(&self) -> bool {
        self.has_time_dimension
    }
}

/// Derive the component dimension of an array shape: the third axis of a time stepped
/// array, otherwise the last axis.
pub(crate) fn component_dimension(shape: &[usize]) -> usize {
    if shape.len() > 2 {
        shape[2]
    } else {
        shape.last().copied().unwrap_or(0)
    }
}

/// Connectivity of a grid. `number_corners == 0` with a non zero `number` is a point cloud
/// without a connectivity array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyDescription {
    pub location: Location,
    pub number: usize,
    pub number_corners: usize,
    pub dimension: usize,
}

/// one mesh or particle snapshot at one time value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridDescription {
    pub time: f64,
    pub geometry: FieldDescription,
    pub topology: TopologyDescription,
    pub hybrid_topology: Option<TopologyDescription>,
    pub fields: Vec<FieldDescription>,
}

impl GridDescription {
    pub(crate) fn at_time(time: f64) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// the hybrid topology if one is present and holds elements
    pub fn active_hybrid_topology(&self) -> Option<&TopologyDescription> {
        self.hybrid_topology.as_ref().filter(|topology| topology.number > 0)
    }
}

/// Every grid of one domain kind (mesh or particles) keyed by time index
///
/// Several grids share one time index when a container holds more than one topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCollectionDescription {
    pub name: String,
    pub grids: BTreeMap<usize, Vec<GridDescription>>,
}

impl GridCollectionDescription {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            grids: BTreeMap::new(),
        }
    }

    /// the grids at `time_index`, creating an empty entry if there is none yet
    pub fn grids_at_mut(&mut self, time_index: usize) -> &mut Vec<GridDescription> {
        self.grids.entry(time_index).or_default()
    }

    pub fn push_grid(&mut self, time_index: usize, grid: GridDescription) {
        self.grids_at_mut(time_index).push(grid);
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// time of the first grid at every time index, in time index order
    pub fn times(&self) -> Vec<f64> {
        self.grids
            .values()
            .filter_map(|grids| grids.first())
            .map(|grid| grid.time)
            .collect()
    }
}

/// root of the extracted description and the sole input of the builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    pub grids_collections: Vec<GridCollectionDescription>,
}
