//! XML parsing for EC2 responses.
//!
//! Responses are read with a quick-xml pull parser into a small element
//! tree, then mapped to result types by the functions in [`handlers`].
//! Namespaces are ignored; elements are matched by local name.

pub mod handlers;

use crate::error::{Ec2Error, ResponseError, ServiceFault};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An element with its text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local name.
    pub name: String,
    /// Concatenated text content, trimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlNode, Ec2Error> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(start_node(&e)),
                Ok(Event::Empty(e)) => {
                    let node = start_node(&e);
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(xml_error)?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(e)),
                _ => {}
            }
        }

        root.ok_or_else(|| {
            Ec2Error::Response(ResponseError::MissingField {
                field: "root element".to_string(),
            })
        })
    }

    /// First direct child with this name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with this name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth-first, self excluded) with this name.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Text of a direct child, `None` if absent or empty.
    pub fn text_of(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Text of a direct child parsed with `FromStr`.
    pub fn parse_of<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.text_of(name).and_then(|t| t.parse().ok())
    }

    /// The `<item>` children of a set element such as `imagesSet`.
    pub fn items<'a>(&'a self, set_name: &str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.child(set_name)
            .into_iter()
            .flat_map(|set| set.children_named("item"))
    }
}

fn start_node(e: &BytesStart<'_>) -> XmlNode {
    XmlNode {
        name: String::from_utf8_lossy(e.local_name().as_ref()).to_string(),
        ..Default::default()
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn xml_error(e: quick_xml::Error) -> Ec2Error {
    Ec2Error::Response(ResponseError::XmlParseError {
        message: e.to_string(),
    })
}

/// Parse an EC2 fault document.
///
/// Returns `None` when the body is not a recognisable fault, so callers can
/// fall back to the HTTP status.
pub fn parse_error_response(status: u16, xml: &str) -> Option<ServiceFault> {
    let root = XmlNode::parse(xml).ok()?;
    let error = if root.name == "Error" {
        &root
    } else {
        root.find("Error")?
    };
    let code = error.text_of("Code")?;

    let request_id = root
        .text_of("RequestID")
        .or_else(|| root.text_of("RequestId"))
        .or_else(|| root.find("RequestID").and_then(|n| non_empty(&n.text)));

    Some(ServiceFault {
        status,
        code,
        message: error.text_of("Message").unwrap_or_default(),
        request_id,
    })
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
