use super::{component_dimension, ExtractError, FieldDescription, FieldLocation, FieldType};
use super::{Location, UndeterminedFieldType};
use crate::HdfObject;

/// Infer a [`FieldDescription`] for every field object in a petsc fields group and append
/// them to `fields`
///
/// The type of a field comes from its `vector_field_type` attribute (mesh fields) or its
/// `Nc` component count (particle fields). Fields whose type resolves to
/// [`FieldType::None`] are dropped. Packed fields, either a scalar stored with a component
/// axis or an `Nc` larger than three, are split into one scalar description per
/// component that all address the same array.
pub fn generate_fields<R: HdfObject>(
    fields: &mut Vec<FieldDescription>,
    hdf_fields: &[R],
    location: FieldLocation,
    file_name: &str,
    time_offset: usize,
) -> Result<(), ExtractError> {
    for hdf_field in hdf_fields {
        let has_time_dimension = hdf_field.has_attribute("timestepping")
            && hdf_field.attribute::<i64>("timestepping")? > 0;

        let mut description = FieldDescription {
            name: hdf_field.name(),
            location: Location::new(file_name, hdf_field.path()),
            shape: hdf_field.shape(),
            time_offset,
            component_offset: 0,
            component_stride: 1,
            component_dimension: 0,
            field_location: location,
            field_type: FieldType::None,
            has_time_dimension,
        };

        let mut separate_into_components = false;

        if hdf_field.has_attribute("vector_field_type") {
            let vector_field_type = hdf_field.attribute_string("vector_field_type")?;
            description.field_type = FieldType::from_petsc_name(&vector_field_type);

            if is_reduced_dimension_vector(&description) {
                description.field_type = FieldType::Scalar;
            }
        } else if hdf_field.has_attribute("Nc") {
            let nc = hdf_field.attribute::<i64>("Nc")?;
            description.field_type = match nc {
                1 => FieldType::Scalar,
                2 | 3 => FieldType::Vector,
                0 => FieldType::None,
                _ => {
                    separate_into_components = true;
                    FieldType::Vector
                }
            };
        } else {
            return Err(UndeterminedFieldType::new(description.name).into());
        }

        if description.field_type == FieldType::Scalar {
            if description.shape.len() < 3 {
                // scalars are written without the component axis
                description.shape.push(1);
            } else {
                separate_into_components = true;
            }
        }

        description.component_dimension = component_dimension(&description.shape);

        if description.field_type == FieldType::None {
            log::warn!(
                "dropping field `{}` at {}: field type resolved to none",
                description.name,
                description.location.path
            );
            continue;
        }

        if separate_into_components {
            for component in 0..description.dimension() {
                let name = component_name(hdf_field, &description.name, component)?;
                log::trace!("emitting component field `{name}`");

                fields.push(FieldDescription {
                    name,
                    component_offset: component,
                    component_stride: description.dimension(),
                    component_dimension: 1,
                    field_type: FieldType::Scalar,
                    ..description.clone()
                });
            }
        } else {
            log::trace!("emitting field `{}`", description.name);
            fields.push(description);
        }
    }

    Ok(())
}

/// a cell vector whose shape is missing the component axis comes from a mesh that had
/// its dimension reduced, so it only carries one value per cell
fn is_reduced_dimension_vector(description: &FieldDescription) -> bool {
    if description.field_type != FieldType::Vector || description.field_location != FieldLocation::Cell {
        return false;
    }

    let rank = description.shape.len();
    if description.has_time_dimension {
        rank < 3
    } else {
        rank < 2
    }
}

/// `componentName{c}` attributes override the default `{name}{c}` naming
fn component_name<R: HdfObject>(
    hdf_field: &R,
    base: &str,
    component: usize,
) -> Result<String, ExtractError> {
    let attribute_name = format!("componentName{component}");

    if hdf_field.has_attribute(&attribute_name) {
        let named = hdf_field.attribute_string(&attribute_name)?;
        Ok(format!("{base}_{named}"))
    } else {
        Ok(format!("{base}{component}"))
    }
}
