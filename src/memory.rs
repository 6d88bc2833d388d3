//! In-memory container
//!
//! [`MemoryNode`] is an owned tree of groups and datasets that can be put together in a few
//! lines, and [`MemoryObject`] is the [`HdfObject`] handle used to walk it. This is what the
//! tests and benchmarks feed the extractor, and it is a convenient way to describe a
//! container layout without linking an hdf5 library:
//!
//! ```
//! use xdmf::{HdfObject, MemoryNode, MemoryObject};
//!
//! let root = MemoryObject::root(
//!     MemoryNode::file("flow.hdf5").child(
//!         MemoryNode::group("geometry").child(MemoryNode::dataset("vertices", &[10, 3])),
//!     ),
//! );
//!
//! let vertices = root.get("geometry").unwrap().get("vertices").unwrap();
//! assert_eq!(vertices.path(), "/geometry/vertices");
//! assert_eq!(vertices.shape(), vec![10, 3]);
//! ```

use crate::specification::{AttributeType, ContainerError, MissingAttribute, MissingChild, NotADataset};
use crate::HdfObject;

use ndarray::{ArrayD, IxDyn};
use num_traits::NumCast;

use std::rc::Rc;

/// value of an attribute attached to a [`MemoryNode`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i32> for AttributeValue {
    fn from(x: i32) -> Self {
        Self::Integer(x.into())
    }
}

impl From<i64> for AttributeValue {
    fn from(x: i64) -> Self {
        Self::Integer(x)
    }
}

impl From<usize> for AttributeValue {
    fn from(x: usize) -> Self {
        Self::Integer(x as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for AttributeValue {
    fn from(x: &str) -> Self {
        Self::Text(x.into())
    }
}

impl From<String> for AttributeValue {
    fn from(x: String) -> Self {
        Self::Text(x)
    }
}

/// A group or dataset in an in-memory container
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    name: String,
    attributes: Vec<(String, AttributeValue)>,
    data: Option<ArrayD<f64>>,
    children: Vec<Rc<MemoryNode>>,
}

impl MemoryNode {
    fn empty(name: &str) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            data: None,
            children: Vec::new(),
        }
    }

    /// the root of a container, named after the file it represents
    pub fn file(file_name: &str) -> Self {
        Self::empty(file_name)
    }

    pub fn group(name: &str) -> Self {
        Self::empty(name)
    }

    /// a zero filled dataset of the given shape
    pub fn dataset(name: &str, shape: &[usize]) -> Self {
        Self::with_data(name, ArrayD::zeros(IxDyn(shape)))
    }

    pub fn with_data(name: &str, data: ArrayD<f64>) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(name)
        }
    }

    /// append a child node
    pub fn child(mut self, child: MemoryNode) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    /// set an attribute, replacing any previous value with the same name
    pub fn attribute<V: Into<AttributeValue>>(mut self, name: &str, value: V) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.into(), value)),
        }
        self
    }

    fn find_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Handle to a node inside a [`MemoryNode`] tree, carrying its absolute path
#[derive(Debug, Clone)]
pub struct MemoryObject {
    node: Rc<MemoryNode>,
    path: String,
}

impl MemoryObject {
    /// open the tree rooted at `node`. The root has the path `/`
    pub fn root(node: MemoryNode) -> Self {
        Self {
            node: Rc::new(node),
            path: "/".into(),
        }
    }

    fn child_path(&self, name: &str) -> String {
        if self.path.ends_with('/') {
            format!("{}{name}", self.path)
        } else {
            format!("{}/{name}", self.path)
        }
    }

    fn missing_attribute(&self, name: &str) -> ContainerError {
        MissingAttribute::new(self.path.clone(), name.into()).into()
    }
}

impl HdfObject for MemoryObject {
    fn name(&self) -> String {
        self.node.name.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn contains(&self, name: &str) -> bool {
        self.node.children.iter().any(|child| child.name == name)
    }

    fn get(&self, name: &str) -> Result<Self, ContainerError> {
        let node = self
            .node
            .children
            .iter()
            .find(|child| child.name == name)
            .ok_or_else(|| MissingChild::new(self.path.clone(), name.into()))?;

        Ok(Self {
            node: Rc::clone(node),
            path: self.child_path(name),
        })
    }

    fn shape(&self) -> Vec<usize> {
        self.node
            .data
            .as_ref()
            .map(|data| data.shape().to_vec())
            .unwrap_or_default()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.node.find_attribute(name).is_some()
    }

    fn attribute<T: NumCast>(&self, name: &str) -> Result<T, ContainerError> {
        let value = self
            .node
            .find_attribute(name)
            .ok_or_else(|| self.missing_attribute(name))?;

        let converted = match value {
            AttributeValue::Integer(x) => <T as NumCast>::from(*x),
            AttributeValue::Float(x) => <T as NumCast>::from(*x),
            AttributeValue::Text(_) => None,
        };

        converted.ok_or_else(|| AttributeType::new(self.path.clone(), name.into(), "a number").into())
    }

    fn attribute_string(&self, name: &str) -> Result<String, ContainerError> {
        match self.node.find_attribute(name) {
            Some(AttributeValue::Text(text)) => Ok(text.clone()),
            Some(_) => Err(AttributeType::new(self.path.clone(), name.into(), "a string").into()),
            None => Err(self.missing_attribute(name)),
        }
    }

    fn items(&self) -> Vec<Self> {
        self.node
            .children
            .iter()
            .map(|child| Self {
                node: Rc::clone(child),
                path: self.child_path(&child.name),
            })
            .collect()
    }

    fn raw_data(&self) -> Result<Vec<f64>, ContainerError> {
        self.node
            .data
            .as_ref()
            .map(|data| data.iter().copied().collect())
            .ok_or_else(|| NotADataset::new(self.path.clone()).into())
    }
}
