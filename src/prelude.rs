//! Common traits and types that are useful for working with `xdmf`
#![allow(unused_imports)]

pub use crate::builder::{build_xdmf, XdmfBuilder};
pub use crate::memory::{MemoryNode, MemoryObject};
pub use crate::specification::{
    FieldDescription, FieldLocation, FieldType, GridCollectionDescription, GridDescription,
    Location, Specification, TopologyDescription,
};
pub use crate::traits::HdfObject;
pub use crate::xml::{XdmfDocument, XmlElement};
pub use crate::{write_xdmf, write_xdmf_file, Error};
