// Parsing and lookup helpers over a roxmltree document
use roxmltree::Edge;
pub use roxmltree::{Document, Node};

use crate::error::ExtractionError;

// (namespace URI, local name), the form roxmltree matches tag names against
pub type Name = (&'static str, &'static str);

// Deeper element nesting is rejected as malformed
pub const MAX_DEPTH: usize = 1024;

// Parse raw bytes into a document, rejecting non UTF-8 input and runaway nesting
pub fn parse(raw: &[u8]) -> Result<Document<'_>, ExtractionError> {
    let text = std::str::from_utf8(raw).map_err(malformed)?;
    let document = Document::parse(text).map_err(malformed)?;
    check_depth(&document)?;
    Ok(document)
}

fn malformed(err: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::MalformedXml(err.to_string())
}

fn check_depth(document: &Document<'_>) -> Result<(), ExtractionError> {
    let mut depth = 0usize;
    for edge in document.root().traverse() {
        match edge {
            Edge::Open(node) if node.is_element() => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(malformed(format!(
                        "elements nested deeper than {} levels",
                        MAX_DEPTH
                    )));
                }
            }
            Edge::Close(node) if node.is_element() => depth -= 1,
            _ => (),
        }
    }
    Ok(())
}

pub fn contains(document: &Document<'_>, name: Name) -> bool {
    document.descendants().any(|node| node.has_tag_name(name))
}

pub fn child<'a, 'input>(node: Node<'a, 'input>, name: Name) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

// First match among the node itself and everything below it, in document order
pub fn find<'a, 'input>(node: Node<'a, 'input>, name: Name) -> Option<Node<'a, 'input>> {
    node.descendants().find(|descendant| descendant.has_tag_name(name))
}

pub fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: Name,
) -> Result<Node<'a, 'input>, ExtractionError> {
    child(node, name).ok_or_else(|| {
        ExtractionError::missing(format!("{}/{}", node.tag_name().name(), name.1))
    })
}

pub fn required_find<'a, 'input>(
    node: Node<'a, 'input>,
    name: Name,
) -> Result<Node<'a, 'input>, ExtractionError> {
    find(node, name).ok_or_else(|| {
        ExtractionError::missing(format!("{}//{}", node.tag_name().name(), name.1))
    })
}

pub fn required_attr<'a>(node: Node<'a, '_>, key: &str) -> Result<&'a str, ExtractionError> {
    node.attribute(key).ok_or_else(|| {
        ExtractionError::missing(format!("{}@{}", node.tag_name().name(), key))
    })
}

// Leading character data of the element, untouched
pub fn required_text<'a>(node: Node<'a, '_>) -> Result<&'a str, ExtractionError> {
    node.text().ok_or_else(|| {
        ExtractionError::missing(format!("{}/text()", node.tag_name().name()))
    })
}
