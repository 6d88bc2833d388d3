//! A small owned xml tree and its serialization with `quick_xml`
//!
//! The builder assembles the whole document as [`XmlElement`]s first and writes it in one
//! pass afterwards, which keeps the decision logic free of any writer state.

use crate::Error;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use std::io::Write;

/// preamble written before the root element of every xdmf document
pub const XDMF_PREAMBLE: &str = "<?xml version=\"1.0\" ?>\n<!DOCTYPE Xdmf SYSTEM \"Xdmf.dtd\" []>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// append a new child element and return it
    pub fn child<T: Into<String>>(&mut self, name: T) -> &mut XmlElement {
        self.children.push(XmlElement::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// set an attribute, replacing the value if the key is already present
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    /// set the text content of the element
    pub fn set_value<T: Into<String>>(&mut self, value: T) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// first direct child with the given name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// every direct child with the given name
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// write this element and all of its children
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.value.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;

        if let Some(value) = &self.value {
            writer.write_event(Event::Text(BytesText::new(value)))?;
        }

        for child in &self.children {
            child.write(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;

        Ok(())
    }
}

/// A complete xdmf document: the fixed preamble followed by the `Xdmf` root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdmfDocument {
    pub root: XmlElement,
}

impl XdmfDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// the single `Domain` element under the root
    pub fn domain(&self) -> Option<&XmlElement> {
        self.root.find("Domain")
    }

    /// serialize the document, indenting nested elements by four spaces
    pub fn write<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut writer = Writer::new_with_indent(writer, b' ', 4);

        let inner = writer.inner();
        inner.write_all(XDMF_PREAMBLE.as_bytes())?;
        inner.write_all(b"\n")?;

        self.root.write(&mut writer)?;

        writer.inner().write_all(b"\n")?;
        Ok(())
    }

    /// serialize the document into a string
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut output = Vec::new();
        self.write(&mut output)?;
        Ok(String::from_utf8(output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_always_appends() {
        let mut root = XmlElement::new("Grid");
        root.child("Attribute").set_attribute("Name", "u");
        root.child("Attribute").set_attribute("Name", "v");

        let names: Vec<_> = root
            .find_all("Attribute")
            .filter_map(|attribute| attribute.attribute("Name"))
            .collect();
        assert_eq!(names, vec!["u", "v"]);
    }

    #[test]
    fn attributes_are_replaced_in_place() {
        let mut element = XmlElement::new("Grid");
        element.set_attribute("Name", "a").set_attribute("GridType", "Uniform");
        element.set_attribute("Name", "b");

        assert_eq!(element.attributes().len(), 2);
        assert_eq!(element.attributes()[0].0, "Name");
        assert_eq!(element.attribute("Name"), Some("b"));
    }

    #[test]
    fn writes_nested_elements() {
        let mut root = XmlElement::new("Xdmf");
        let domain = root.child("Domain");
        domain.set_attribute("Name", "domain");
        domain.child("DataItem").set_value("a.hdf5:/x&y");
        domain.child("Time");

        let text = XdmfDocument::new(root).to_xml_string().unwrap();

        assert!(text.starts_with(XDMF_PREAMBLE));
        assert!(text.contains("<Domain Name=\"domain\">"));
        assert!(text.contains("<DataItem>a.hdf5:/x&amp;y</DataItem>"));
        assert!(text.contains("<Time/>"));
        assert!(text.trim_end().ends_with("</Xdmf>"));
    }
}
