#![doc = include_str!("../README.md")]

pub mod builder;
pub mod memory;
pub mod prelude;
pub mod specification;
mod traits;
mod utils;
pub mod xml;

pub use traits::HdfObject;

pub use memory::{AttributeValue, MemoryNode, MemoryObject};

pub use specification::{ContainerError, ExtractError};
pub use specification::{FieldDescription, FieldLocation, FieldType, Location};
pub use specification::{GridCollectionDescription, GridDescription, Specification, TopologyDescription};

pub use builder::{build_xdmf, BuildError, XdmfBuilder};
pub use xml::{XdmfDocument, XmlElement};

pub use quick_xml::writer::Writer;

use std::io::Write;
use std::path::Path;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while extracting the xdmf specification: {0}")]
    Extract(#[from] ExtractError),
    #[error("Error while building the xdmf document: {0}")]
    Build(#[from] BuildError),
    #[error("Could not convert document to utf8 encoding: `{0}`")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Could not write XML data: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}

/// Build the xdmf document for `specification` and write it to a `Writer`
pub fn write_xdmf<W: Write>(writer: W, specification: Specification) -> Result<(), Error> {
    let document = XdmfBuilder::new(specification).build()?;
    document.write(writer)
}

/// Build the xdmf document for `specification` and write it to `path`, replacing any
/// existing file
pub fn write_xdmf_file<P: AsRef<Path>>(path: P, specification: Specification) -> Result<(), Error> {
    let document = XdmfBuilder::new(specification).build()?;

    let file = std::fs::File::create(path.as_ref())?;
    let mut writer = std::io::BufWriter::new(file);
    document.write(&mut writer)?;
    writer.flush()?;

    Ok(())
}
