use std::fmt::Display;

/// space separated list, as xdmf expects for dimensions and inline data
pub(crate) fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// space separated floats in their shortest round trip form
pub(crate) fn join_floats(values: &[f64]) -> String {
    let mut buffer = ryu::Buffer::new();
    values
        .iter()
        .map(|value| buffer.format(*value).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `/cell_fields/T` becomes `_cell_fields_T`
pub(crate) fn path_to_name(path: &str) -> String {
    path.replace('/', "_")
}
