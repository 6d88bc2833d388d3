use super::fields::generate_fields;
use super::{component_dimension, ContainerError, ExtractError, UndeterminedParticleGeometry};
use super::{FieldDescription, FieldLocation, FieldType, GridCollectionDescription};
use super::{GridDescription, Location, Specification, TopologyDescription};
use crate::HdfObject;

/// name of the collection holding particle grids
pub const PARTICLE_DOMAIN: &str = "particle_domain";

/// petsc swarm field holding particle coordinates when no explicit geometry is written
const SWARM_COORDINATES: &str = "DMSwarmPIC_coor";

/// placeholder time of a container without a `time` array
const NO_TIME: f64 = -1.0;

/// where one grid lands in a collection and which slice of time stepped arrays it reads
#[derive(Debug, Clone, Copy)]
struct TimeStep {
    index: usize,
    time: f64,
    offset: usize,
}

impl Specification {
    /// Describe a single container holding every time step of a simulation
    ///
    /// A mesh collection is produced when the container has a `geometry` group (directly
    /// or under `viz`), and a particle collection when it has `particles` or
    /// `particle_fields`. Every entry of the root `time` array becomes one time index.
    pub fn from_single_source<R: HdfObject>(root: &R) -> Result<Self, ExtractError> {
        let steps: Vec<TimeStep> = read_times(root)?
            .into_iter()
            .enumerate()
            .map(|(index, time)| TimeStep {
                index,
                time,
                offset: index,
            })
            .collect();

        let mut specification = Specification::default();

        let mut mesh = GridCollectionDescription::default();
        if extract_mesh(root, &steps, &mut mesh)? {
            specification.grids_collections.push(mesh);
        }

        let mut particles = GridCollectionDescription::new(PARTICLE_DOMAIN);
        if extract_particles(root, &steps, &mut particles)? {
            specification.grids_collections.push(particles);
        }

        Ok(specification)
    }

    /// Describe a series of containers, one per time step
    ///
    /// Each root yielded by `sources` is one time index. Mesh grids only use the first
    /// entry of a root's own `time` array; particle grids are produced for every entry,
    /// all under the root's time index. Arrays are addressed at time offset zero since
    /// each file only holds its own step.
    pub fn from_multiple_sources<R, I>(sources: I) -> Result<Self, ExtractError>
    where
        R: HdfObject,
        I: IntoIterator<Item = R>,
    {
        let mut mesh: Option<GridCollectionDescription> = None;
        let mut particles: Option<GridCollectionDescription> = None;

        for (index, root) in sources.into_iter().enumerate() {
            log::debug!("reading time index {index} from {}", root.name());
            let times = read_times(&root)?;

            let first = TimeStep {
                index,
                time: times.first().copied().unwrap_or(NO_TIME),
                offset: 0,
            };
            let mut collection = mesh.take().unwrap_or_default();
            let found = extract_mesh(&root, &[first], &mut collection)?;
            if found || !collection.is_empty() {
                mesh = Some(collection);
            }

            let steps: Vec<TimeStep> = times
                .iter()
                .map(|&time| TimeStep {
                    index,
                    time,
                    offset: 0,
                })
                .collect();
            let mut collection = particles
                .take()
                .unwrap_or_else(|| GridCollectionDescription::new(PARTICLE_DOMAIN));
            let found = extract_particles(&root, &steps, &mut collection)?;
            if found || !collection.is_empty() {
                particles = Some(collection);
            }
        }

        let grids_collections = mesh.into_iter().chain(particles).collect();
        Ok(Specification { grids_collections })
    }
}

/// Resolve a child of `root`, preferring the copy nested in a `viz` group
pub(crate) fn find_child<R: HdfObject>(root: &R, name: &str) -> Result<Option<R>, ContainerError> {
    if root.contains("viz") {
        let viz = root.get("viz")?;
        if viz.contains(name) {
            return viz.get(name).map(Some);
        }
    }

    if root.contains(name) {
        root.get(name).map(Some)
    } else {
        Ok(None)
    }
}

/// `topology`, `topology_1`, `topology_2`, ...
pub(crate) fn topology_postfix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        format!("_{index}")
    }
}

fn read_times<R: HdfObject>(root: &R) -> Result<Vec<f64>, ContainerError> {
    if root.contains("time") {
        root.get("time")?.raw_data()
    } else {
        Ok(vec![NO_TIME])
    }
}

/// explicit coordinate arrays are always node centered vectors
fn vertex_geometry<R: HdfObject>(vertices: &R, file: &str) -> FieldDescription {
    let shape = vertices.shape();

    FieldDescription {
        name: vertices.name(),
        location: Location::new(file, vertices.path()),
        component_dimension: component_dimension(&shape),
        shape,
        component_stride: 1,
        field_location: FieldLocation::Node,
        field_type: FieldType::Vector,
        ..Default::default()
    }
}

/// read a connectivity array: one row per element, one column per corner
fn read_cells<R: HdfObject>(cells: &R, file: &str) -> TopologyDescription {
    let shape = cells.shape();

    TopologyDescription {
        location: Location::new(file, cells.path()),
        number: shape.first().copied().unwrap_or(0),
        number_corners: shape.get(1).copied().unwrap_or(0),
        dimension: 0,
    }
}

fn read_topology<R: HdfObject>(group: &R, file: &str) -> Result<TopologyDescription, ContainerError> {
    let cells = group.get("cells")?;

    Ok(TopologyDescription {
        dimension: cells.attribute::<usize>("cell_dim")?,
        ..read_cells(&cells, file)
    })
}

fn read_hybrid_topology<R: HdfObject>(
    group: &R,
    file: &str,
    primary_dimension: usize,
) -> Result<TopologyDescription, ContainerError> {
    let cells = group.get("hcells")?;

    let dimension = if cells.has_attribute("cell_dim") {
        cells.attribute::<usize>("cell_dim")?
    } else {
        primary_dimension
    };

    Ok(TopologyDescription {
        dimension,
        ..read_cells(&cells, file)
    })
}

/// Add one grid per topology and time step of the mesh domain. Returns false when the
/// container has no mesh.
fn extract_mesh<R: HdfObject>(
    root: &R,
    steps: &[TimeStep],
    collection: &mut GridCollectionDescription,
) -> Result<bool, ExtractError> {
    let geometry_group = match find_child(root, "geometry")? {
        Some(group) => group,
        None => return Ok(false),
    };

    // no time steps means no grids, so nothing below the geometry group is read
    if steps.is_empty() {
        return Ok(true);
    }

    let file = root.name();
    let hybrid_group = find_child(root, "hybrid_topology")?;

    let mut topology_index = 0;
    while let Some(topology_group) =
        find_child(root, &format!("topology{}", topology_postfix(topology_index)))?
    {
        let geometry = vertex_geometry(&geometry_group.get("vertices")?, &file);
        let topology = read_topology(&topology_group, &file)?;
        let hybrid_topology = match &hybrid_group {
            Some(group) => Some(read_hybrid_topology(group, &file, topology.dimension)?),
            None => None,
        };

        log::debug!(
            "mesh topology {topology_index} in {file}: {} elements with {} corners",
            topology.number,
            topology.number_corners
        );

        let postfix = topology_postfix(topology_index);
        for step in steps {
            let mut grid = GridDescription {
                time: step.time,
                geometry: geometry.clone(),
                topology: topology.clone(),
                hybrid_topology: hybrid_topology.clone(),
                fields: Vec::new(),
            };

            let vertex_fields = format!("vertex_fields{postfix}");
            if root.contains(&vertex_fields) {
                let items = root.get(&vertex_fields)?.items();
                generate_fields(&mut grid.fields, &items, FieldLocation::Node, &file, step.offset)?;
            }

            let cell_fields = format!("cell_fields{postfix}");
            if root.contains(&cell_fields) {
                let items = root.get(&cell_fields)?.items();
                generate_fields(&mut grid.fields, &items, FieldLocation::Cell, &file, step.offset)?;
            }

            collection.push_grid(step.index, grid);
        }

        topology_index += 1;
    }

    Ok(true)
}

/// Add one point cloud grid per time step of the particle domain. Returns false when the
/// container holds no particles.
fn extract_particles<R: HdfObject>(
    root: &R,
    steps: &[TimeStep],
    collection: &mut GridCollectionDescription,
) -> Result<bool, ExtractError> {
    if !(root.contains("particles") || root.contains("particle_fields")) {
        return Ok(false);
    }

    let file = root.name();
    log::debug!("particle domain in {file}");

    for step in steps {
        let mut grid = GridDescription::at_time(step.time);

        if root.contains("particle_fields") {
            let items = root.get("particle_fields")?.items();
            generate_fields(&mut grid.fields, &items, FieldLocation::Node, &file, step.offset)?;
        }

        grid.geometry = particle_geometry(root, &file, &mut grid.fields)?;

        // particles have no connectivity, only one vertex per particle
        grid.topology = TopologyDescription {
            location: Location::new(file.as_str(), ""),
            number: grid.geometry.dof(),
            number_corners: 0,
            dimension: grid.geometry.dimension(),
        };

        collection.push_grid(step.index, grid);
    }

    Ok(true)
}

/// explicit `particles/coordinates`, otherwise the swarm coordinate field taken out of
/// `fields`
fn particle_geometry<R: HdfObject>(
    root: &R,
    file: &str,
    fields: &mut Vec<FieldDescription>,
) -> Result<FieldDescription, ExtractError> {
    if root.contains("particles") {
        let particles = root.get("particles")?;
        if particles.contains("coordinates") {
            return Ok(vertex_geometry(&particles.get("coordinates")?, file));
        }
    }

    match fields.iter().position(|field| field.name == SWARM_COORDINATES) {
        Some(position) => Ok(fields.remove(position)),
        None => Err(UndeterminedParticleGeometry.into()),
    }
}
