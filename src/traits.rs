//! # Traits
//!
//! The converter never reads an hdf5 file on its own. Everything it needs to know about
//! the source hierarchy is asked through [`HdfObject`], so any reader (the `hdf5` bindings,
//! a pure rust reader, or the in-memory [`MemoryObject`](`crate::MemoryObject`)) can be
//! plugged in by implementing this one trait.

use crate::specification::ContainerError;
use num_traits::NumCast;

/// A handle to a group or dataset inside a hierarchical container
///
/// Handles are returned by value and are expected to be cheap to produce. For the root
/// object `name` is the name of the file the container lives in; that string ends up
/// in every `file:path` reference of the generated document.
pub trait HdfObject: Sized {
    /// name of this object (the last path segment, or the file name for the root)
    fn name(&self) -> String;

    /// absolute path of this object within the container
    fn path(&self) -> String;

    fn contains(&self, name: &str) -> bool;

    /// Fetch a direct child. Callers guard this with [`HdfObject::contains`] unless the
    /// child is required.
    fn get(&self, name: &str) -> Result<Self, ContainerError>;

    /// dimensions of the dataset, empty for groups
    fn shape(&self) -> Vec<usize>;

    fn has_attribute(&self, name: &str) -> bool;

    /// read a numeric attribute converted into `T`
    fn attribute<T: NumCast>(&self, name: &str) -> Result<T, ContainerError>;

    fn attribute_string(&self, name: &str) -> Result<String, ContainerError>;

    /// every child in container order
    fn items(&self) -> Vec<Self>;

    /// read the dataset as a flat list of doubles
    fn raw_data(&self) -> Result<Vec<f64>, ContainerError>;
}
