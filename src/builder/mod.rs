//! # Builder
//!
//! Maps a [`Specification`] onto an xdmf document. The output always has a single
//! `Domain` element (visit only reads the first domain of a file). Every grid collection
//! is attached to it either directly, or inside a temporal collection when its grids carry
//! real (non negative) times:
//!
//! ```ignore
//! <Xdmf>
//!     <Domain Name="domain">
//!         <Grid Name="TimeSeries" GridType="Collection" CollectionType="Temporal">
//!             <Time TimeType="List">
//!                 <DataItem Format="XML" NumberType="Float" Dimensions="2">0.0 1.0</DataItem>
//!             </Time>
//!             <Grid Name="" GridType="Uniform">
//!                 <Topology TopologyType="Tetrahedron" NumberOfElements="5">
//!                     <DataItem ...>sol.hdf5:/topology/cells</DataItem>
//!                 </Topology>
//!                 <Geometry GeometryType="XYZ">
//!                     <DataItem ...>sol.hdf5:/geometry/vertices</DataItem>
//!                 </Geometry>
//!                 <Attribute Name="T" Type="Scalar" Center="Cell">
//!                     ...
//!                 </Attribute>
//!             </Grid>
//!             ...
//!         </Grid>
//!     </Domain>
//! </Xdmf>
//! ```
//!
//! Fields stored with a time axis are addressed through a hyperslab so that a single
//! array on disk serves every time step.

mod tables;

pub use tables::{cell_type, nodes_per_element, NodesPerElement};

use crate::specification::{FieldDescription, GridCollectionDescription, Specification};
use crate::specification::TopologyDescription;
use crate::utils::{join, join_floats, path_to_name};
use crate::xml::{XdmfDocument, XmlElement};

use derive_more::{Constructor, Display, From};

const DATA_ITEM: &str = "DataItem";
const GRID: &str = "Grid";

#[derive(Debug, thiserror::Error, From)]
pub enum BuildError {
    #[error("{0}")]
    UnmappedTopology(UnmappedTopology),
    #[error("{0}")]
    UnlabeledField(UnlabeledField),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "no xdmf topology for dimension {dimension} with {corners} corners per element")]
pub struct UnmappedTopology {
    pub dimension: usize,
    pub corners: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "field `{name}` has no xdmf attribute type")]
pub struct UnlabeledField {
    pub name: String,
}

/// Owns a finished [`Specification`] and turns it into an [`XdmfDocument`]
#[derive(Debug, Clone)]
pub struct XdmfBuilder {
    specification: Specification,
}

impl XdmfBuilder {
    pub fn new(specification: Specification) -> Self {
        Self { specification }
    }

    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    pub fn build(&self) -> Result<XdmfDocument, BuildError> {
        build_xdmf(&self.specification)
    }
}

/// Assemble the xdmf document for `specification`
pub fn build_xdmf(specification: &Specification) -> Result<XdmfDocument, BuildError> {
    let mut root = XmlElement::new("Xdmf");

    let domain = root.child("Domain");
    domain.set_attribute("Name", "domain");

    for collection in &specification.grids_collections {
        write_collection(domain, collection)?;
    }

    Ok(XdmfDocument::new(root))
}

fn write_collection(
    domain: &mut XmlElement,
    collection: &GridCollectionDescription,
) -> Result<(), BuildError> {
    // grids are keyed in time index order
    let use_time = collection
        .grids
        .values()
        .next()
        .and_then(|grids| grids.first())
        .map_or(false, |grid| grid.time >= 0.0);

    let base = if use_time {
        generate_time_grid(domain, &collection.times())
    } else {
        domain
    };

    for grids in collection.grids.values() {
        let shared: &mut XmlElement = if grids.len() > 1 {
            generate_spatial_grid(&mut *base, &collection.name, Some("Spatial"))
        } else {
            &mut *base
        };

        for grid in grids {
            let parent: &mut XmlElement = match grid.active_hybrid_topology() {
                Some(hybrid) => {
                    let wrapper = generate_spatial_grid(&mut *shared, &collection.name, None);
                    generate_space_grid(&mut *wrapper, hybrid, &grid.geometry, &collection.name)?;
                    wrapper
                }
                None => &mut *shared,
            };

            let space_grid = generate_space_grid(parent, &grid.topology, &grid.geometry, &collection.name)?;

            for field in &grid.fields {
                write_field(space_grid, field)?;
            }
        }
    }

    Ok(())
}

fn generate_time_grid<'a>(element: &'a mut XmlElement, times: &[f64]) -> &'a mut XmlElement {
    let grid = element.child(GRID);
    grid.set_attribute("Name", "TimeSeries")
        .set_attribute("GridType", "Collection")
        .set_attribute("CollectionType", "Temporal");

    let time = grid.child("Time");
    time.set_attribute("TimeType", "List");
    time.child(DATA_ITEM)
        .set_attribute("Format", "XML")
        .set_attribute("NumberType", "Float")
        .set_attribute("Dimensions", times.len().to_string())
        .set_value(join_floats(times));

    grid
}

fn generate_spatial_grid<'a>(
    element: &'a mut XmlElement,
    name: &str,
    collection_type: Option<&str>,
) -> &'a mut XmlElement {
    let grid = element.child(GRID);
    grid.set_attribute("Name", name)
        .set_attribute("GridType", "Collection");

    if let Some(collection_type) = collection_type {
        grid.set_attribute("CollectionType", collection_type);
    }

    grid
}

/// a uniform grid with its topology and geometry, ready to receive attributes
fn generate_space_grid<'a>(
    element: &'a mut XmlElement,
    topology: &TopologyDescription,
    geometry: &FieldDescription,
    name: &str,
) -> Result<&'a mut XmlElement, BuildError> {
    let topology_type = cell_type(topology.dimension, topology.number_corners)
        .ok_or_else(|| UnmappedTopology::new(topology.dimension, topology.number_corners))?;

    let grid = element.child(GRID);
    grid.set_attribute("Name", name)
        .set_attribute("GridType", "Uniform");

    let topology_element = grid.child("Topology");
    topology_element.set_attribute("TopologyType", topology_type);

    match nodes_per_element(topology.dimension, topology.number_corners) {
        Some(NodesPerElement::Fixed(nodes)) => {
            topology_element.set_attribute("NodesPerElement", nodes.to_string());
        }
        Some(NodesPerElement::ElementCount) => {
            topology_element.set_attribute("NodesPerElement", topology.number.to_string());
        }
        None => {}
    }

    if topology.number_corners > 0 {
        topology_element.set_attribute("NumberOfElements", topology.number.to_string());
        write_cells(topology_element, topology);
    }

    let geometry_element = grid.child("Geometry");
    let geometry_type = if geometry.dimension() > 2 { "XYZ" } else { "XY" };
    geometry_element.set_attribute("GeometryType", geometry_type);
    write_data(geometry_element, geometry);

    Ok(grid)
}

fn write_cells(element: &mut XmlElement, topology: &TopologyDescription) {
    element
        .child(DATA_ITEM)
        .set_attribute("Name", path_to_name(&topology.location.path))
        .set_attribute("ItemType", "Uniform")
        .set_attribute("Format", "HDF")
        .set_attribute("Precision", "8")
        .set_attribute("NumberType", "Float")
        .set_attribute("Dimensions", join(&[topology.number, topology.number_corners]))
        .set_value(topology.location.reference());
}

fn write_field(element: &mut XmlElement, field: &FieldDescription) -> Result<(), BuildError> {
    let field_type = tables::field_type_label(field.field_type)
        .ok_or_else(|| UnlabeledField::new(field.name.clone()))?;

    let attribute = element.child("Attribute");
    attribute
        .set_attribute("Name", field.name.as_str())
        .set_attribute("Type", field_type)
        .set_attribute("Center", tables::field_location_label(field.field_location));

    write_data(attribute, field);
    Ok(())
}

/// Reference the array behind `field`
///
/// Arrays without a time axis are referenced whole. Time stepped arrays are referenced
/// through a hyperslab selecting row `time_offset` and every `component_stride`th
/// component starting at `component_offset`.
fn write_data(element: &mut XmlElement, field: &FieldDescription) {
    if !field.has_time_dimension() {
        element
            .child(DATA_ITEM)
            .set_attribute("Name", path_to_name(&field.location.path))
            .set_attribute("DataType", "Float")
            .set_attribute("Dimensions", join(&field.shape))
            .set_attribute("Format", "HDF")
            .set_attribute("Precision", "8")
            .set_value(field.location.reference());
        return;
    }

    let count = [1, field.dof(), field.dimension()];

    let slab = element.child(DATA_ITEM);
    slab.set_attribute("ItemType", "HyperSlab")
        .set_attribute("Dimensions", join(&count))
        .set_attribute("Type", "HyperSlab");

    let start = [field.time_offset, 0, field.component_offset];
    let stride = [1, 1, field.component_stride];
    slab.child(DATA_ITEM)
        .set_attribute("Dimensions", "3 3")
        .set_attribute("Format", "XML")
        .set_value(format!("{} {} {}", join(&start), join(&stride), join(&count)));

    slab.child(DATA_ITEM)
        .set_attribute("DataType", "Float")
        .set_attribute("Dimensions", join(&field.shape))
        .set_attribute("Format", "HDF")
        .set_attribute("Precision", "8")
        .set_value(field.location.reference());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{FieldLocation, FieldType, GridDescription, Location};

    fn point_geometry(shape: Vec<usize>) -> FieldDescription {
        FieldDescription {
            name: "vertices".into(),
            location: Location::new("sol.hdf5", "/geometry/vertices"),
            component_dimension: *shape.last().unwrap(),
            shape,
            component_stride: 1,
            field_type: FieldType::Vector,
            ..Default::default()
        }
    }

    fn triangles(number: usize) -> TopologyDescription {
        TopologyDescription {
            location: Location::new("sol.hdf5", "/topology/cells"),
            number,
            number_corners: 3,
            dimension: 2,
        }
    }

    fn single_grid(grid: GridDescription) -> Specification {
        let mut collection = GridCollectionDescription::new("mesh");
        collection.push_grid(0, grid);
        Specification {
            grids_collections: vec![collection],
        }
    }

    #[test]
    fn plain_data_reference() {
        let mut element = XmlElement::new("Geometry");
        write_data(&mut element, &point_geometry(vec![10, 2]));

        let item = element.find(DATA_ITEM).unwrap();
        assert_eq!(item.attribute("Name"), Some("_geometry_vertices"));
        assert_eq!(item.attribute("Dimensions"), Some("10 2"));
        assert_eq!(item.attribute("Format"), Some("HDF"));
        assert_eq!(item.value(), Some("sol.hdf5:/geometry/vertices"));
        assert!(item.children().is_empty());
    }

    #[test]
    fn hyperslab_data_reference() {
        let field = FieldDescription {
            name: "yi1".into(),
            location: Location::new("sol.hdf5", "/cell_fields/yi"),
            shape: vec![4, 6, 3],
            time_offset: 2,
            component_offset: 1,
            component_stride: 3,
            component_dimension: 1,
            field_location: FieldLocation::Cell,
            field_type: FieldType::Scalar,
            has_time_dimension: true,
        };

        let mut element = XmlElement::new("Attribute");
        write_data(&mut element, &field);

        let slab = element.find(DATA_ITEM).unwrap();
        assert_eq!(slab.attribute("ItemType"), Some("HyperSlab"));
        assert_eq!(slab.attribute("Dimensions"), Some("1 6 1"));

        let parts = slab.children();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].attribute("Dimensions"), Some("3 3"));
        assert_eq!(parts[0].value(), Some("2 0 1 1 1 3 1 6 1"));
        assert_eq!(parts[1].attribute("Dimensions"), Some("4 6 3"));
        assert_eq!(parts[1].attribute("Name"), None);
        assert_eq!(parts[1].value(), Some("sol.hdf5:/cell_fields/yi"));
    }

    #[test]
    fn negative_time_attaches_to_domain() {
        let grid = GridDescription {
            time: -1.0,
            geometry: point_geometry(vec![6, 2]),
            topology: triangles(4),
            ..Default::default()
        };

        let document = build_xdmf(&single_grid(grid)).unwrap();
        let domain = document.domain().unwrap();

        let grids: Vec<_> = domain.find_all(GRID).collect();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].attribute("GridType"), Some("Uniform"));
        assert_eq!(grids[0].attribute("Name"), Some("mesh"));

        let topology = grids[0].find("Topology").unwrap();
        assert_eq!(topology.attribute("TopologyType"), Some("Triangle"));
        assert_eq!(topology.attribute("NumberOfElements"), Some("4"));
        assert_eq!(topology.attribute("NodesPerElement"), None);
        assert_eq!(topology.find(DATA_ITEM).unwrap().attribute("Dimensions"), Some("4 3"));
        assert_eq!(
            grids[0].find("Geometry").unwrap().attribute("GeometryType"),
            Some("XY")
        );
    }

    #[test]
    fn hybrid_topology_gets_its_own_collection() {
        let grid = GridDescription {
            time: 0.5,
            geometry: point_geometry(vec![6, 2]),
            topology: triangles(4),
            hybrid_topology: Some(TopologyDescription {
                location: Location::new("sol.hdf5", "/hybrid_topology/hcells"),
                number: 2,
                number_corners: 2,
                dimension: 2,
            }),
            fields: vec![FieldDescription {
                name: "p".into(),
                location: Location::new("sol.hdf5", "/vertex_fields/p"),
                shape: vec![6, 1],
                component_dimension: 1,
                field_type: FieldType::Scalar,
                ..Default::default()
            }],
        };

        let document = build_xdmf(&single_grid(grid)).unwrap();
        let time_series = document.domain().unwrap().find(GRID).unwrap();
        assert_eq!(time_series.attribute("CollectionType"), Some("Temporal"));

        let wrapper = time_series.find(GRID).unwrap();
        assert_eq!(wrapper.attribute("GridType"), Some("Collection"));
        assert_eq!(wrapper.attribute("CollectionType"), None);

        let uniform: Vec<_> = wrapper.find_all(GRID).collect();
        assert_eq!(uniform.len(), 2);

        let hybrid = uniform[0].find("Topology").unwrap();
        assert_eq!(hybrid.attribute("TopologyType"), Some("Polyline"));
        assert_eq!(hybrid.attribute("NodesPerElement"), Some("2"));
        assert!(uniform[0].find("Attribute").is_none());

        assert_eq!(
            uniform[1].find("Topology").unwrap().attribute("TopologyType"),
            Some("Triangle")
        );
        assert_eq!(uniform[1].find_all("Attribute").count(), 1);
    }

    #[test]
    fn point_cloud_topology_has_no_connectivity() {
        let grid = GridDescription {
            time: -1.0,
            geometry: point_geometry(vec![12, 3]),
            topology: TopologyDescription {
                location: Location::new("swarm.hdf5", ""),
                number: 12,
                number_corners: 0,
                dimension: 3,
            },
            ..Default::default()
        };

        let document = build_xdmf(&single_grid(grid)).unwrap();
        let uniform = document.domain().unwrap().find(GRID).unwrap();
        let topology = uniform.find("Topology").unwrap();

        assert_eq!(topology.attribute("TopologyType"), Some("Polyvertex"));
        assert_eq!(topology.attribute("NodesPerElement"), Some("12"));
        assert_eq!(topology.attribute("NumberOfElements"), None);
        assert!(topology.children().is_empty());
        assert_eq!(
            uniform.find("Geometry").unwrap().attribute("GeometryType"),
            Some("XYZ")
        );
    }

    #[test]
    fn unmapped_topology_fails() {
        let grid = GridDescription {
            time: -1.0,
            geometry: point_geometry(vec![6, 3]),
            topology: TopologyDescription {
                number: 3,
                number_corners: 5,
                dimension: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        let error = build_xdmf(&single_grid(grid)).unwrap_err();
        assert!(matches!(error, BuildError::UnmappedTopology(_)));
    }

    #[test]
    fn unlabeled_field_fails() {
        let grid = GridDescription {
            time: -1.0,
            geometry: point_geometry(vec![6, 2]),
            topology: triangles(4),
            fields: vec![FieldDescription {
                name: "opaque".into(),
                shape: vec![6, 1],
                ..Default::default()
            }],
            ..Default::default()
        };

        let error = build_xdmf(&single_grid(grid)).unwrap_err();
        assert!(error.to_string().contains("opaque"));
    }
}
