//! The HTML output tree.

use crate::error::{Error, Result};

/// Element attributes, rendered in insertion order
pub type Attributes = Vec<(String, String)>;

/// A node of the rendered HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single element wrapping a value, or raw text when `tag` is `None`.
    Leaf {
        tag: Option<String>,
        value: String,
        attributes: Attributes,
    },
    /// An element wrapping child nodes.
    Parent {
        tag: String,
        children: Vec<Node>,
        attributes: Attributes,
    },
}

impl Node {
    /// Raw text, rendered without any wrapping element.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: None,
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Leaf {
            tag: Some(tag.into()),
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Parent {
            tag: tag.into(),
            children,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute. Raw text leaves ignore attributes when rendered.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Node::Leaf { attributes, .. } | Node::Parent { attributes, .. } => {
                attributes.push((name.into(), value.into()));
            }
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Leaf { tag, .. } => tag.as_deref(),
            Node::Parent { tag, .. } => Some(tag),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Parent { children, .. } => children,
        }
    }

    /// Render this node and its descendants to an HTML string.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> Result<()> {
        match self {
            Node::Leaf {
                tag: None, value, ..
            } => out.push_str(value),
            Node::Leaf {
                tag: Some(tag),
                value,
                attributes,
            } => {
                open_tag(tag, attributes, out);
                out.push_str(value);
                close_tag(tag, out);
            }
            Node::Parent {
                tag,
                children,
                attributes,
            } => {
                if tag.is_empty() {
                    return Err(Error::InvalidTree {
                        reason: "parent node has no tag".into(),
                    });
                }
                if children.is_empty() {
                    return Err(Error::InvalidTree {
                        reason: format!("<{tag}> parent node has no children"),
                    });
                }
                open_tag(tag, attributes, out);
                for child in children {
                    child.render_into(out)?;
                }
                close_tag(tag, out);
            }
        }
        Ok(())
    }
}

fn open_tag(tag: &str, attributes: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    // Values are emitted verbatim, quotes included.
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
