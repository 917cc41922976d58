//! The environment stack.
//!
//! Every open group, style switch and environment is a [Frame] on the stack.
//! The bottom of the stack is a boundary frame that is never popped.
//! Frames accumulate the nodes produced while they are on top of the stack;
//!     tables additionally accumulate finished cells and rows.
//!
//! The behavior of each kind of frame when a cell, a row or the frame itself ends
//!     is defined by the `match` arms of [Frame::end_cell], [Frame::end_row] and
//!     [Frame::finish].

use crate::config::Side;
use crate::error::{Error, Kind as ErrorKind};
use crate::node::{self, Node, TexClass};
use crate::prelude as mxl;
use crate::tags::Registry;

/// Font variant set by commands like `\rm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Normal,
    Bold,
}

impl Font {
    pub fn mathvariant(&self) -> &'static str {
        match self {
            Font::Normal => "normal",
            Font::Bold => "bold",
        }
    }
}

/// Alignment override of a `multline` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shove {
    Left,
    Right,
}

impl Shove {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shove::Left => "left",
            Shove::Right => "right",
        }
    }
}

/// Converts a column specification like `rl` into MathML `columnalign` tokens.
///
/// Characters other than `c`, `l` and `r` are dropped.
pub fn normalize_alignment(spec: &str) -> String {
    let tokens: Vec<&str> = spec
        .chars()
        .filter_map(|c| match c {
            'c' => Some("center"),
            'l' => Some("left"),
            'r' => Some("right"),
            _ => None,
        })
        .collect();
    tokens.join(" ")
}

/// Configuration of a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayDef {
    pub column_align: Option<String>,
    pub column_spacing: Option<String>,
    pub row_spacing: Option<String>,
    pub column_width: Option<String>,
    pub width: Option<String>,
    pub display_style: Option<bool>,
    pub side: Option<Side>,
    pub min_label_spacing: Option<String>,
    /// Vertical alignment of the table relative to the surrounding baseline.
    pub align: Option<String>,
}

impl ArrayDef {
    fn apply(&self, table: &mut Node) {
        let attributes = [
            ("columnalign", self.column_align.clone()),
            ("columnspacing", self.column_spacing.clone()),
            ("rowspacing", self.row_spacing.clone()),
            ("columnwidth", self.column_width.clone()),
            ("width", self.width.clone()),
            ("displaystyle", self.display_style.map(|b| b.to_string())),
            ("side", self.side.map(|s| s.as_str().to_string())),
            ("minlabelspacing", self.min_label_spacing.clone()),
            ("align", self.align.clone()),
        ];
        for (name, value) in attributes {
            if let Some(value) = value {
                table.set_attribute(name, value);
            }
        }
    }

    /// Sets the vertical alignment from a `[t]`, `[b]` or `[c]` argument.
    pub fn set_vertical_align(&mut self, align: &str) {
        self.align = match align.trim() {
            "" => return,
            "t" => Some("baseline 1".into()),
            "b" => Some("baseline -1".into()),
            "c" => Some("center".into()),
            other => Some(other.into()),
        };
    }
}

/// Partially built table.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub def: ArrayDef,
    /// Delimiters placed around the finished table.
    pub open: String,
    pub close: String,
    numbered: bool,
    taggable: bool,
    rows: Vec<Node>,
    row: Vec<Node>,
    shove: Option<Shove>,
}

impl Table {
    pub fn new(def: ArrayDef) -> Table {
        Table {
            def,
            ..Default::default()
        }
    }

    pub fn with_tagging(mut self, numbered: bool, taggable: bool) -> Table {
        self.numbered = numbered;
        self.taggable = taggable;
        self
    }

    pub fn with_fences<S: Into<String>, T: Into<String>>(mut self, open: S, close: T) -> Table {
        self.open = open.into();
        self.close = close.into();
        self
    }

    pub fn numbered(&self) -> bool {
        self.numbered
    }

    pub fn taggable(&self) -> bool {
        self.taggable
    }

    /// Finished rows.
    pub fn rows(&self) -> &[Node] {
        &self.rows
    }

    /// Finished cells of the current row.
    pub fn cells(&self) -> &[Node] {
        &self.row
    }

    fn push_cell(&mut self, nodes: Vec<Node>) {
        let mut cell = Node::new(node::Kind::Mtd, nodes);
        if let Some(shove) = self.shove.take() {
            cell.set_attribute("columnalign", shove.as_str());
        }
        self.row.push(cell);
    }

    fn push_row(&mut self, tag: Option<Node>) {
        let mut cells = std::mem::take(&mut self.row);
        let row = match tag {
            None => Node::new(node::Kind::Mtr, cells),
            Some(tag) => {
                cells.insert(0, tag);
                Node::new(node::Kind::Mlabeledtr, cells)
            }
        };
        self.rows.push(row);
    }

    fn has_pending(&self, nodes: &[Node]) -> bool {
        !nodes.is_empty() || !self.row.is_empty()
    }

    fn into_mtable(self) -> Node {
        let mut table = Node::new(node::Kind::Mtable, self.rows);
        self.def.apply(&mut table);
        table
    }
}

#[derive(Clone, Debug)]
pub enum Kind {
    Boundary,
    Group,
    Style { display: bool, level: u8 },
    Array(Table),
    AmsArray(Table),
    Multline(Table),
    Equation { numbered: bool },
}

#[derive(Clone, Debug)]
pub struct Frame {
    kind: Kind,
    environment: Option<String>,
    pub nodes: Vec<Node>,
    font: Option<Font>,
}

impl Frame {
    fn new(kind: Kind, environment: Option<&str>) -> Frame {
        Frame {
            kind,
            environment: environment.map(str::to_string),
            nodes: vec![],
            font: None,
        }
    }

    pub fn boundary(font: Option<Font>) -> Frame {
        let mut frame = Frame::new(Kind::Boundary, None);
        frame.font = font;
        frame
    }

    pub fn group() -> Frame {
        Frame::new(Kind::Group, None)
    }

    pub fn style(display: bool, level: u8) -> Frame {
        Frame::new(Kind::Style { display, level }, None)
    }

    pub fn array(environment: &str, table: Table) -> Frame {
        Frame::new(Kind::Array(table), Some(environment))
    }

    pub fn ams_array(environment: &str, table: Table) -> Frame {
        Frame::new(Kind::AmsArray(table), Some(environment))
    }

    pub fn multline(environment: &str, table: Table) -> Frame {
        Frame::new(Kind::Multline(table), Some(environment))
    }

    pub fn equation(environment: &str, numbered: bool) -> Frame {
        Frame::new(Kind::Equation { numbered }, Some(environment))
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Name of the environment this frame was opened by, if any.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn font(&self) -> Option<Font> {
        self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = Some(font);
    }

    /// Whether this frame is a numbering environment; at most one may be open.
    pub fn is_equation_family(&self) -> bool {
        match &self.kind {
            Kind::Equation { .. } | Kind::Multline(_) => true,
            Kind::AmsArray(table) => table.taggable,
            _ => false,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(
            self.kind,
            Kind::Array(_) | Kind::AmsArray(_) | Kind::Multline(_)
        )
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.kind {
            Kind::Array(table) | Kind::AmsArray(table) | Kind::Multline(table) => Some(table),
            _ => None,
        }
    }

    /// Ends the current cell on an alignment tab.
    pub fn end_cell(&mut self) -> mxl::Result<()> {
        match &mut self.kind {
            Kind::Array(table) | Kind::AmsArray(table) => {
                table.push_cell(std::mem::take(&mut self.nodes));
                Ok(())
            }
            Kind::Multline(_) => Err(Error::new(
                ErrorKind::MultlineRowsOneColumn,
                format!(
                    "rows of the {} environment must have exactly one column",
                    self.environment.as_deref().unwrap_or("multline")
                ),
            )
            .into()),
            _ => Err(Error::new(
                ErrorKind::MisplacedAlignmentTab,
                "misplaced alignment tab character &",
            )
            .into()),
        }
    }

    /// Ends the current row; returns false if this frame is not a table.
    pub fn end_row(&mut self, tags: &mut Registry) -> bool {
        match &mut self.kind {
            Kind::Array(table) | Kind::Multline(table) => {
                table.push_cell(std::mem::take(&mut self.nodes));
                table.push_row(None);
                true
            }
            Kind::AmsArray(table) => {
                table.push_cell(std::mem::take(&mut self.nodes));
                let tag = tags.get_tag(false);
                tags.clear_tag();
                table.push_row(tag);
                true
            }
            _ => false,
        }
    }

    /// Sets the alignment of the current `multline` row.
    pub fn shove(&mut self, command: &str, shove: Shove) -> mxl::Result<()> {
        let has_content = !self.nodes.is_empty();
        let table = match &mut self.kind {
            Kind::Multline(table) => table,
            _ => {
                return Err(Error::new(
                    ErrorKind::ShoveOutsideMultiline,
                    format!("{command} only allowed in multline"),
                )
                .into())
            }
        };
        if has_content {
            return Err(Error::new(
                ErrorKind::ShoveNotAtLineStart,
                format!("{command} must come at the beginning of the line"),
            )
            .into());
        }
        table.shove = Some(shove);
        Ok(())
    }

    /// Closes the frame, producing the node that replaces it in the enclosing frame.
    pub fn finish(self, tags: &mut Registry) -> Node {
        let nodes = self.nodes;
        match self.kind {
            Kind::Boundary => Node::row(nodes),
            Kind::Group => Node::new(node::Kind::TeXAtom, nodes).with_tex_class(TexClass::Ord),
            Kind::Style { display, level } => Node::create(
                node::Kind::Mstyle,
                nodes,
                &[
                    ("displaystyle", if display { "true" } else { "false" }),
                    ("scriptlevel", level.to_string().as_str()),
                ],
            ),
            Kind::Array(mut table) => {
                if table.has_pending(&nodes) {
                    table.push_cell(nodes);
                    table.push_row(None);
                }
                let (open, close) = (table.open.clone(), table.close.clone());
                let mtable = table.into_mtable();
                if open.is_empty() && close.is_empty() {
                    mtable
                } else {
                    Node::fixed_fence(&open, mtable, &close)
                }
            }
            Kind::AmsArray(mut table) => {
                if table.has_pending(&nodes) {
                    table.push_cell(nodes);
                    let tag = tags.get_tag(false);
                    tags.clear_tag();
                    table.push_row(tag);
                }
                tags.end();
                table.into_mtable()
            }
            Kind::Multline(mut table) => {
                if table.has_pending(&nodes) {
                    table.push_cell(nodes);
                    table.push_row(None);
                }
                finish_multline_rows(&mut table, tags);
                tags.end();
                table.into_mtable()
            }
            Kind::Equation { .. } => {
                let content = Node::row(nodes);
                let tag = tags.get_tag(false);
                tags.end();
                match tag {
                    None => content,
                    Some(tag) => tags.en_tag(content, tag),
                }
            }
        }
    }
}

fn finish_multline_rows(table: &mut Table, tags: &mut Registry) {
    let n = table.rows.len();
    if n > 1 {
        for (index, align) in [(0, "left"), (n - 1, "right")] {
            if let Some(cell) = table.rows[index].children_mut().first_mut() {
                if cell.attribute("columnalign").is_none() {
                    cell.set_attribute("columnalign", align);
                }
            }
        }
    }
    let tag = match tags.get_tag(false) {
        None => return,
        Some(tag) => tag,
    };
    if n == 0 {
        return;
    }
    let index = match table.def.side {
        Some(Side::Left) => 0,
        _ => n - 1,
    };
    let row = std::mem::replace(&mut table.rows[index], Node::placeholder());
    let attributes = row.attributes().clone();
    let mut cells = row.into_children();
    cells.insert(0, tag);
    let mut labeled = Node::new(node::Kind::Mlabeledtr, cells);
    for (name, value) in attributes {
        labeled.set_attribute(name, value);
    }
    table.rows[index] = labeled;
}

/// The stack of open frames.
#[derive(Clone, Debug)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    /// Creates a stack holding only a boundary frame with the given font.
    pub fn new(font: Option<Font>) -> Stack {
        Stack {
            frames: vec![Frame::boundary(font)],
        }
    }

    /// Pushes a frame and returns the new depth.
    pub fn push(&mut self, frame: Frame) -> usize {
        self.frames.push(frame);
        self.frames.len()
    }

    /// Pops the top frame; the boundary frame is never popped.
    pub fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() <= 1 {
            return None;
        }
        self.frames.pop()
    }

    pub fn top(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Frame {
        let n = self.frames.len();
        &mut self.frames[n - 1]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The font of the innermost frame that sets one.
    pub fn font(&self) -> Option<Font> {
        self.frames.iter().rev().find_map(Frame::font)
    }

    /// Consumes the stack, returning the boundary frame.
    pub fn into_boundary(self) -> Frame {
        let mut frames = self.frames;
        frames.truncate(1);
        frames.pop().unwrap_or_else(|| Frame::boundary(None))
    }
}
