//! The expression tree.
//!
//! Nodes follow the MathML element vocabulary.
//! Besides MathML attributes, which are serialized, a node carries a TeX class
//!     and a map of properties that only matter while parsing
//!     (for example whether an operator takes its scripts as limits).
//!
//! Script composites ([Kind::Msubsup] and [Kind::Munderover]) always have three
//!     data slots: the base and the two scripts.
//! Empty slots hold a [Kind::None] placeholder and are dropped when serializing,
//!     so an `msubsup` with only a subscript is written as `msub`.

use std::collections::BTreeMap;
use std::fmt;

/// Data slots of script composites.
pub mod slot {
    pub const BASE: usize = 0;
    pub const SUB: usize = 1;
    pub const SUP: usize = 2;
    pub const UNDER: usize = 1;
    pub const OVER: usize = 2;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Math,
    Mrow,
    TeXAtom,
    Mi,
    Mn,
    Mo,
    Mtext,
    Mspace,
    Mpadded,
    Mfrac,
    Mstyle,
    Msubsup,
    Munderover,
    Mtable,
    Mtr,
    Mlabeledtr,
    Mtd,
    Text,
    None,
}

impl Kind {
    /// MathML element name.
    pub fn element_name(&self) -> &'static str {
        match self {
            Kind::Math => "math",
            Kind::Mrow | Kind::TeXAtom => "mrow",
            Kind::Mi => "mi",
            Kind::Mn => "mn",
            Kind::Mo => "mo",
            Kind::Mtext => "mtext",
            Kind::Mspace => "mspace",
            Kind::Mpadded => "mpadded",
            Kind::Mfrac => "mfrac",
            Kind::Mstyle => "mstyle",
            Kind::Msubsup => "msubsup",
            Kind::Munderover => "munderover",
            Kind::Mtable => "mtable",
            Kind::Mtr => "mtr",
            Kind::Mlabeledtr => "mlabeledtr",
            Kind::Mtd => "mtd",
            Kind::Text => "#text",
            Kind::None => "none",
        }
    }

    /// Whether the node holds text rather than other elements.
    pub fn is_token(&self) -> bool {
        matches!(self, Kind::Mi | Kind::Mn | Kind::Mo | Kind::Mtext)
    }
}

/// Spacing class of a node, as in TeX.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TexClass {
    Ord,
    Op,
    Bin,
    Rel,
    Open,
    Close,
    Punct,
    Inner,
}

impl TexClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TexClass::Ord => "ORD",
            TexClass::Op => "OP",
            TexClass::Bin => "BIN",
            TexClass::Rel => "REL",
            TexClass::Open => "OPEN",
            TexClass::Close => "CLOSE",
            TexClass::Punct => "PUNCT",
            TexClass::Inner => "INNER",
        }
    }
}

/// Value of a parse-time property.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Property {
    Bool(bool),
    Str(String),
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::Str(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::Str(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    kind: Kind,
    tex_class: Option<TexClass>,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Property>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    pub fn new(kind: Kind, children: Vec<Node>) -> Node {
        Node {
            kind,
            tex_class: None,
            attributes: Default::default(),
            properties: Default::default(),
            children,
            text: String::new(),
        }
    }

    pub fn create(kind: Kind, children: Vec<Node>, attributes: &[(&str, &str)]) -> Node {
        let mut node = Node::new(kind, children);
        for (name, value) in attributes {
            node.set_attribute(*name, *value);
        }
        node
    }

    pub fn text<T: Into<String>>(text: T) -> Node {
        let mut node = Node::new(Kind::Text, vec![]);
        node.text = text.into();
        node
    }

    /// A token element (`mi`, `mn`, `mo` or `mtext`) containing the text.
    pub fn token<T: Into<String>>(kind: Kind, text: T) -> Node {
        Node::new(kind, vec![Node::text(text)])
    }

    pub fn placeholder() -> Node {
        Node::new(Kind::None, vec![])
    }

    /// An empty script composite on the base.
    pub fn scripted(kind: Kind, base: Node) -> Node {
        Node::new(kind, vec![base, Node::placeholder(), Node::placeholder()])
    }

    /// The node for a sequence of nodes: the node itself if there is exactly one,
    ///     otherwise an inferred `mrow`.
    pub fn row(mut nodes: Vec<Node>) -> Node {
        if nodes.len() == 1 {
            if let Some(node) = nodes.pop() {
                return node;
            }
        }
        Node::new(Kind::Mrow, nodes)
    }

    /// A `TeXAtom` of the given class around the content.
    ///
    /// An inferred `mrow` is replaced by its children.
    pub fn atom(tex_class: TexClass, content: Node) -> Node {
        let children = if content.is_inferred_row() {
            content.into_children()
        } else {
            vec![content]
        };
        Node::new(Kind::TeXAtom, children).with_tex_class(tex_class)
    }

    /// Whether this is an `mrow` that only groups a sequence of nodes.
    pub fn is_inferred_row(&self) -> bool {
        self.kind == Kind::Mrow && self.tex_class.is_none() && self.attributes.is_empty()
    }

    /// Wraps a node in fixed-size delimiters.
    ///
    /// An empty delimiter string means no delimiter on that side.
    pub fn fixed_fence(open: &str, node: Node, close: &str) -> Node {
        let mut children = vec![];
        if !open.is_empty() {
            children.push(fence(open, TexClass::Open));
        }
        children.push(node);
        if !close.is_empty() {
            children.push(fence(close, TexClass::Close));
        }
        Node::new(Kind::Mrow, children).with_tex_class(TexClass::Inner)
    }

    pub fn with_tex_class(mut self, tex_class: TexClass) -> Node {
        self.tex_class = Some(tex_class);
        self
    }

    pub fn with_attribute<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Node {
        self.set_attribute(name, value);
        self
    }

    pub fn with_property<S: Into<String>, T: Into<Property>>(mut self, name: S, value: T) -> Node {
        self.set_property(name, value);
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn tex_class(&self) -> Option<TexClass> {
        self.tex_class
    }

    pub fn set_tex_class(&mut self, tex_class: TexClass) {
        self.tex_class = Some(tex_class);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute<S: Into<String>, T: Into<String>>(&mut self, name: S, value: T) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn set_property<S: Into<String>, T: Into<Property>>(&mut self, name: S, value: T) {
        self.properties.insert(name.into(), value.into());
    }

    /// Whether the boolean property is set to true.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.properties.get(name), Some(Property::Bool(true)))
    }

    /// Sets the child in a data slot, padding with placeholders as needed.
    pub fn set_data(&mut self, slot: usize, child: Node) {
        while self.children.len() <= slot {
            self.children.push(Node::placeholder());
        }
        self.children[slot] = child;
    }

    /// The child in a data slot, or [None] if the slot is empty.
    pub fn data(&self, slot: usize) -> Option<&Node> {
        self.children.get(slot).filter(|n| n.kind != Kind::None)
    }

    /// Whether this node accepts TeX limit controls.
    pub fn is_operator(&self) -> bool {
        self.tex_class == Some(TexClass::Op) || self.properties.contains_key("movesupsub")
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self) -> String {
        let mut s = self.text.clone();
        for child in &self.children {
            s.push_str(&child.text_content());
        }
        s
    }

    fn fmt_element(&self, f: &mut fmt::Formatter<'_>, name: &str, children: &[&Node]) -> fmt::Result {
        write!(f, "<{name}")?;
        if self.kind == Kind::TeXAtom {
            if let Some(tex_class) = self.tex_class {
                write!(f, " data-mjx-texclass=\"{}\"", tex_class.as_str())?;
            }
        }
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{}\"", Escaped(value))?;
        }
        if children.is_empty() && !self.kind.is_token() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for child in children {
            write!(f, "{child}")?;
        }
        write!(f, "</{name}>")
    }

    fn fmt_scripts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let empty = Node::new(Kind::Mrow, vec![]);
        let base = self.data(slot::BASE).unwrap_or(&empty);
        let lower = self.data(slot::SUB);
        let upper = self.data(slot::SUP);
        let under = self.kind == Kind::Munderover;
        let name = match (lower.is_some(), upper.is_some()) {
            (false, false) => return write!(f, "{base}"),
            (true, false) => if under { "munder" } else { "msub" },
            (false, true) => if under { "mover" } else { "msup" },
            (true, true) => self.kind.element_name(),
        };
        let children: Vec<&Node> = std::iter::once(base).chain(lower).chain(upper).collect();
        self.fmt_element(f, name, &children)
    }
}

fn fence(delimiter: &str, tex_class: TexClass) -> Node {
    Node::token(Kind::Mo, delimiter)
        .with_tex_class(tex_class)
        .with_attribute("fence", "true")
        .with_attribute("stretchy", "true")
}

impl fmt::Display for Node {
    /// Serializes the tree as MathML.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Text => write!(f, "{}", Escaped(&self.text)),
            Kind::Msubsup | Kind::Munderover => self.fmt_scripts(f),
            _ => {
                let children: Vec<&Node> = self.children.iter().collect();
                self.fmt_element(f, self.kind.element_name(), &children)
            }
        }
    }
}

struct Escaped<'a>(&'a str);

impl<'a> fmt::Display for Escaped<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => write!(f, "&amp;")?,
                '<' => write!(f, "&lt;")?,
                '>' => write!(f, "&gt;")?,
                '"' => write!(f, "&quot;")?,
                _ => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}
