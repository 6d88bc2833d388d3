use derive_more::{Constructor, Display, From};

/// Failures while walking the source container and inferring its description
#[derive(Debug, thiserror::Error, From)]
pub enum ExtractError {
    #[error("{0}")]
    FieldType(UndeterminedFieldType),
    #[error("{0}")]
    ParticleGeometry(UndeterminedParticleGeometry),
    #[error("container access failed: {0}")]
    Container(ContainerError),
}

/// Failures reported by an [`HdfObject`](`crate::HdfObject`) implementation
#[derive(Debug, thiserror::Error, From)]
pub enum ContainerError {
    #[error("{0}")]
    MissingChild(MissingChild),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    AttributeType(AttributeType),
    #[error("{0}")]
    NotADataset(NotADataset),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cannot determine field type for `{field_name}`")]
pub struct UndeterminedFieldType {
    pub field_name: String,
}

#[derive(Display, Debug, Default)]
#[display(fmt = "cannot determine geometry for particles")]
pub struct UndeterminedParticleGeometry;

#[derive(Display, Debug, Constructor)]
#[display(fmt = "object `{parent}` has no child named `{child}`")]
pub struct MissingChild {
    pub parent: String,
    pub child: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "object `{object}` has no attribute named `{attribute}`")]
pub struct MissingAttribute {
    pub object: String,
    pub attribute: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "attribute `{attribute}` on `{object}` cannot be read as {expected}")]
pub struct AttributeType {
    pub object: String,
    pub attribute: String,
    pub expected: &'static str,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "object `{object}` holds no array data")]
pub struct NotADataset {
    pub object: String,
}
