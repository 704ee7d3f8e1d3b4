//! A minimal element tree on top of the quick-xml pull reader.
//!
//! BPMN files mix namespaced (`bpmn:task`) and bare (`task`) spellings and carry lots
//! of diagram interchange noise, so we keep every element generically (name, attributes,
//! children) and let the classifier decide what matters.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// The namespace prefix BPMN modelers put in front of every element name
pub const BPMN_PREFIX: &str = "bpmn";

/// A raw XML element: its qualified name, its attributes in document order, and its child elements.
/// Text content is dropped since nothing in a BPMN process definition we care about lives there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an element without attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper for adding an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style helper for adding a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes, children: Vec::new() })
    }

    /// Look up an attribute by its exact name
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like `attribute`, but a missing attribute reads as an empty string
    pub fn attribute_or_empty(&self, key: &str) -> String {
        self.attribute(key).unwrap_or_default().to_string()
    }

    /// The element name with the `bpmn:` prefix removed.
    /// Returns `None` for names carrying any other prefix.
    pub fn bpmn_name(&self) -> Option<&str> {
        match self.name.split_once(':') {
            Some((BPMN_PREFIX, local)) => Some(local),
            Some(_) => None,
            None => Some(&self.name),
        }
    }

    /// Iterate over this element and all of its descendants in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Find the first element (this one included) with exactly the given qualified name
    pub fn find_first(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|element| element.name == name)
    }

    /// Find the first element named `bpmn:<local>`, falling back to the first bare `<local>`
    pub fn find_bpmn(&self, local: &str) -> Option<&XmlElement> {
        self.find_first(&format!("{BPMN_PREFIX}:{local}"))
            .or_else(|| self.find_first(local))
    }

    /// All elements named `bpmn:<local>`, or all bare `<local>` elements if there are no namespaced ones
    pub fn find_all_bpmn(&self, local: &str) -> Vec<&XmlElement> {
        let namespaced = format!("{BPMN_PREFIX}:{local}");
        let found: Vec<_> = self.descendants().filter(|e| e.name == namespaced).collect();
        if !found.is_empty() {
            return found;
        }
        self.descendants().filter(|e| e.name == local).collect()
    }
}

/// Pre-order walk over an element tree
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        // Push in reverse so the first child is visited next
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Read a complete XML document and return its root element
pub fn read_document<R: BufRead>(input: R) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    /// Hand a finished element to its parent, or make it the root
    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => {
                return Err(Error::Malformed(format!(
                    "unexpected second root element <{}>",
                    element.name
                )))
            }
            None => *root = Some(element),
        }
        Ok(())
    }

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(XmlElement::from_start(&start)?),
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::Malformed(format!(
                        "unmatched closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {} // Text, comments, declarations and processing instructions are irrelevant
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::Malformed(format!("element <{}> is never closed", open.name)));
    }
    root.ok_or_else(|| Error::Malformed("document has no root element".to_string()))
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::result::Result;

    use super::*;

    #[test]
    fn test_read_nested_document() -> Result<(), Box<dyn Error>> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL">
              <!-- a comment -->
              <bpmn:process id="P1">
                <bpmn:task id="T1" name="Fish &amp; Chips">
                  <bpmn:incoming>F0</bpmn:incoming>
                </bpmn:task>
                <bpmn:sequenceFlow id="F1" sourceRef="T1" targetRef="T2"/>
              </bpmn:process>
            </bpmn:definitions>"#;
        let root = read_document(xml.as_bytes())?;
        assert_eq!(root.name, "bpmn:definitions");
        assert_eq!(root.attribute("xmlns:bpmn"), Some("http://www.omg.org/spec/BPMN/20100524/MODEL"));

        let process = root.find_bpmn("process").ok_or("process missing")?;
        assert_eq!(process.attribute("id"), Some("P1"));
        assert_eq!(process.children.len(), 2);
        assert_eq!(process.children[0].attribute("name"), Some("Fish & Chips"));
        assert_eq!(process.children[0].children[0].name, "bpmn:incoming");
        assert_eq!(process.children[1].attribute("targetRef"), Some("T2"));
        Ok(())
    }

    #[test]
    fn test_descendants_are_in_document_order() -> Result<(), Box<dyn Error>> {
        let root = read_document("<a><b><c/></b><d/></a>".as_bytes())?;
        let names: Vec<_> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn test_bpmn_name() {
        assert_eq!(XmlElement::new("bpmn:userTask").bpmn_name(), Some("userTask"));
        assert_eq!(XmlElement::new("userTask").bpmn_name(), Some("userTask"));
        assert_eq!(XmlElement::new("bpmndi:BPMNShape").bpmn_name(), None);
    }

    #[test]
    fn test_namespaced_spelling_wins() {
        let root = XmlElement::new("definitions")
            .with_child(XmlElement::new("process").with_attribute("id", "bare"))
            .with_child(XmlElement::new("bpmn:process").with_attribute("id", "namespaced"));
        let process = root.find_bpmn("process").map(|p| p.attribute_or_empty("id"));
        assert_eq!(process.as_deref(), Some("namespaced"));
        assert_eq!(root.find_all_bpmn("process").len(), 1);
    }

    #[test]
    fn test_unclosed_element_is_rejected() {
        // Depending on the reader this surfaces either from quick-xml itself or from our own check
        let result = read_document("<a><b></b>".as_bytes());
        assert!(matches!(result, Err(crate::Error::Malformed(_) | crate::Error::Xml(_))));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let result = read_document("<?xml version=\"1.0\"?>".as_bytes());
        assert!(matches!(result, Err(crate::Error::Malformed(_))));
    }
}
