//! Equation numbering, labels and cross-references.
//!
//! The [Registry] is owned by the [Document](crate::document::Document) and shared by
//!     every parser working on it.
//! It tracks a tree of *units*: the root unit of each equation plus one unit per
//!     open numbering environment.
//! Each unit may receive one tag, either explicitly through `\tag` or automatically
//!     from the equation counter, and one label.
//! Rows of AMS arrays reuse their environment's unit: the unit is cleared after each row.
//!
//! Labels defined in the equation being parsed live in a separate map that is merged
//!     into the document-wide map when the equation finishes successfully.
//! References to labels that are not (yet) defined resolve to a placeholder and are
//!     recorded so that the document can run a second, reference pass.

use std::collections::{BTreeSet, HashMap};

use crate::config::{Config, Numbering, Side};
use crate::error::{Error, Kind};
use crate::node::{self, Node};
use crate::prelude as mxl;

/// A resolved label: the tag text and the anchor id of the tagged unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub tag: String,
    pub id: String,
}

impl Default for Label {
    /// The placeholder used for labels that are not defined yet.
    fn default() -> Self {
        Label {
            tag: "???".into(),
            id: String::new(),
        }
    }
}

impl Label {
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// Formatting of numbers, tags, anchor ids and links.
pub trait TagFormat {
    fn format_number(&self, n: u32) -> String {
        n.to_string()
    }

    fn format_tag(&self, tag: &str) -> String {
        format!("({tag})")
    }

    fn format_id(&self, id: &str) -> String {
        let id: String = id
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("mjx-eqn-{id}")
    }

    fn format_url(&self, id: &str, base_url: &str) -> String {
        format!("{base_url}#{}", urlencoding::encode(id))
    }
}

/// The default formatting: arabic numbers, parenthesized tags.
#[derive(Debug, Default)]
pub struct DefaultTagFormat;

impl TagFormat for DefaultTagFormat {}

/// Tagging state of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagState<'a> {
    Untagged,
    Tagged(&'a str),
    AutoNumbered(&'a str),
    Suppressed,
}

/// A unit that may be tagged: an equation, an environment, or a row of an environment.
#[derive(Clone, Debug, Default)]
pub struct Unit {
    env: String,
    taggable: bool,
    numbered: bool,
    tag: Option<String>,
    star: bool,
    auto: bool,
    suppressed: bool,
    label: Option<String>,
    anchor: String,
}

impl Unit {
    fn new(env: &str, taggable: bool, numbered: bool) -> Unit {
        Unit {
            env: env.to_string(),
            taggable,
            numbered,
            ..Default::default()
        }
    }

    /// Name of the environment; empty for the root unit of an equation.
    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn taggable(&self) -> bool {
        self.taggable
    }

    pub fn numbered(&self) -> bool {
        self.numbered
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Anchor id of the last tag made for this unit.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn state(&self) -> TagState<'_> {
        if self.suppressed {
            return TagState::Suppressed;
        }
        match &self.tag {
            None => TagState::Untagged,
            Some(tag) if self.auto => TagState::AutoNumbered(tag),
            Some(tag) => TagState::Tagged(tag),
        }
    }
}

pub struct Registry {
    numbering: Numbering,
    side: Side,
    indent: String,
    use_label_ids: bool,
    base_url: String,
    reference_pass: bool,
    offset: u32,
    format: Box<dyn TagFormat>,

    counter: u32,
    all_counter: u32,
    current: Unit,
    stack: Vec<Unit>,
    history: Vec<Unit>,
    labels: HashMap<String, Label>,
    all_labels: HashMap<String, Label>,
    unresolved: BTreeSet<String>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("counter", &self.counter)
            .field("current", &self.current)
            .field("stack", &self.stack)
            .field("labels", &self.labels)
            .field("all_labels", &self.all_labels)
            .field("reference_pass", &self.reference_pass)
            .finish()
    }
}

impl Registry {
    pub fn new(config: &Config) -> Registry {
        Registry {
            numbering: config.numbering,
            side: config.tag_side,
            indent: config.tag_indent.clone(),
            use_label_ids: config.use_label_ids,
            base_url: config.base_url.clone(),
            reference_pass: config.reference_pass,
            offset: config.counter_offset,
            format: Box::new(DefaultTagFormat),
            counter: config.counter_offset,
            all_counter: config.counter_offset,
            current: Unit::default(),
            stack: vec![],
            history: vec![],
            labels: HashMap::new(),
            all_labels: HashMap::new(),
            unresolved: BTreeSet::new(),
        }
    }

    pub fn set_format(&mut self, format: Box<dyn TagFormat>) {
        self.format = format;
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn current(&self) -> &Unit {
        &self.current
    }

    /// Number of units enclosing the current unit.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_reference_pass(&self) -> bool {
        self.reference_pass
    }

    /// Labels defined in the equation being parsed.
    pub fn labels(&self) -> &HashMap<String, Label> {
        &self.labels
    }

    /// Labels defined in earlier equations of the document.
    pub fn all_labels(&self) -> &HashMap<String, Label> {
        &self.all_labels
    }

    /// Names of labels that were referenced before being defined.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }

    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }

    pub fn format_tag(&self, tag: &str) -> String {
        self.format.format_tag(tag)
    }

    pub fn format_url(&self, id: &str) -> String {
        self.format.format_url(id, &self.base_url)
    }

    /// Prepares for a new equation.
    pub fn start_equation(&mut self) {
        self.history.clear();
        self.stack.clear();
        self.current = Unit::default();
        self.labels.clear();
        self.counter = self.all_counter;
    }

    /// Commits the counter and the labels of the equation that was just parsed.
    pub fn finish_equation(&mut self) {
        self.all_counter = self.counter;
        for (name, label) in self.labels.drain() {
            self.all_labels.insert(name, label);
        }
        self.stack.clear();
        self.current = Unit::default();
    }

    /// Discards the counter and the labels of an equation that failed to parse.
    pub fn abandon_equation(&mut self) {
        self.counter = self.all_counter;
        self.labels.clear();
        self.stack.clear();
        self.current = Unit::default();
    }

    /// Forgets everything: used at the start of a document.
    pub fn reset(&mut self) {
        self.counter = self.offset;
        self.all_counter = self.offset;
        self.current = Unit::default();
        self.stack.clear();
        self.history.clear();
        self.labels.clear();
        self.all_labels.clear();
        self.unresolved.clear();
        self.reference_pass = false;
    }

    /// Starts the reference pass over a document.
    ///
    /// Numbering restarts, while the labels of the first pass are kept so that forward
    ///     references resolve. Labels are not registered again during this pass.
    pub fn begin_reference_pass(&mut self) {
        tracing::debug!(
            labels = self.all_labels.len(),
            unresolved = self.unresolved.len(),
            "starting reference pass"
        );
        self.counter = self.offset;
        self.all_counter = self.offset;
        self.current = Unit::default();
        self.stack.clear();
        self.history.clear();
        self.labels.clear();
        self.unresolved.clear();
        self.reference_pass = true;
    }

    /// Opens a unit for an environment.
    pub fn start(&mut self, env: &str, taggable: bool, numbered: bool) {
        let unit = Unit::new(env, taggable, numbered);
        self.stack.push(std::mem::replace(&mut self.current, unit));
    }

    /// Closes the current unit and returns to the enclosing one.
    pub fn end(&mut self) {
        let parent = self.stack.pop().unwrap_or_default();
        self.history.push(std::mem::replace(&mut self.current, parent));
    }

    pub fn tag(&mut self, command: &str, tag: &str, star: bool) -> mxl::Result<()> {
        if !self.current.taggable && !self.current.env.is_empty() {
            return Err(Error::new(
                Kind::TagNotAllowedHere,
                format!("{command} not allowed in {} environment", self.current.env),
            )
            .into());
        }
        if self.current.tag.is_some() {
            return Err(Error::new(Kind::MultipleTag, format!("multiple {command}")).into());
        }
        self.current.tag = Some(tag.to_string());
        self.current.star = star;
        self.current.auto = false;
        Ok(())
    }

    pub fn notag(&mut self) {
        self.current.suppressed = true;
    }

    pub fn label(&mut self, command: &str, name: &str) -> mxl::Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        if self.current.label.is_some() {
            return Err(Error::new(Kind::MultipleLabel, format!("multiple {command}")).into());
        }
        if !self.reference_pass {
            if self.labels.contains_key(name) || self.all_labels.contains_key(name) {
                return Err(Error::new(
                    Kind::DuplicateLabel,
                    format!("label '{name}' multiply defined"),
                )
                .into());
            }
            tracing::debug!(label = name, "label defined");
            self.labels.insert(name.to_string(), Label::default());
        }
        self.current.label = Some(name.to_string());
        Ok(())
    }

    /// Resolves a label, falling back to the placeholder.
    pub fn reference(&mut self, name: &str) -> Label {
        let label = self
            .labels
            .get(name)
            .or_else(|| self.all_labels.get(name))
            .cloned()
            .unwrap_or_default();
        if label.is_placeholder() {
            tracing::debug!(label = name, "reference to a label that is not defined yet");
            self.unresolved.insert(name.to_string());
        }
        label
    }

    fn auto_tag(&mut self) {
        if self.numbering == Numbering::None || self.current.tag.is_some() {
            return;
        }
        self.counter += 1;
        self.current.tag = Some(self.format.format_number(self.counter));
        self.current.star = false;
        self.current.auto = true;
    }

    /// The tag cell of the current unit, numbering it automatically when appropriate.
    ///
    /// With `force` the unit is numbered even if it is not a numbered unit.
    pub fn get_tag(&mut self, force: bool) -> Option<Node> {
        if force {
            self.auto_tag();
            return self.make_tag();
        }
        if !self.current.taggable || self.current.suppressed {
            return None;
        }
        if self.current.numbered {
            self.auto_tag();
        }
        self.make_tag()
    }

    fn make_tag(&mut self) -> Option<Node> {
        let tag = self.current.tag.clone()?;
        let id = match (&self.current.label, self.use_label_ids) {
            (Some(label), true) => label.clone(),
            _ => tag.clone(),
        };
        self.current.anchor = self.format.format_id(&id);
        if let Some(label) = &self.current.label {
            if !self.reference_pass {
                self.labels.insert(
                    label.clone(),
                    Label {
                        tag: tag.clone(),
                        id: self.current.anchor.clone(),
                    },
                );
            }
        }
        let text = if self.current.star {
            tag
        } else {
            self.format.format_tag(&tag)
        };
        Some(Node::create(
            node::Kind::Mtd,
            vec![Node::token(node::Kind::Mtext, text)],
            &[("id", self.current.anchor.as_str())],
        ))
    }

    /// Resets the tagging state of the current unit, keeping its configuration.
    pub fn clear_tag(&mut self) {
        let unit = &mut self.current;
        unit.tag = None;
        unit.star = false;
        unit.auto = false;
        unit.suppressed = false;
        unit.label = None;
        unit.anchor.clear();
    }

    /// Places a node and its tag in a one-row labeled table.
    pub fn en_tag(&self, node: Node, tag: Node) -> Node {
        let cell = Node::new(node::Kind::Mtd, vec![node]);
        let row = Node::new(node::Kind::Mlabeledtr, vec![tag, cell]);
        Node::create(
            node::Kind::Mtable,
            vec![row],
            &[
                ("side", self.side.as_str()),
                ("minlabelspacing", self.indent.as_str()),
                ("displaystyle", "true"),
            ],
        )
    }

    /// Applies equation-level tagging to the parsed content of an equation.
    pub fn finalize(&mut self, node: Node, display: bool) -> Node {
        if !display || self.current.suppressed {
            return node;
        }
        let tag = match self.numbering {
            Numbering::All => {
                if self.history.iter().any(|unit| unit.taggable) {
                    return node;
                }
                self.get_tag(true)
            }
            Numbering::None | Numbering::Ams => {
                if !self.current.env.is_empty() {
                    return node;
                }
                self.make_tag()
            }
        };
        match tag {
            None => node,
            Some(tag) => self.en_tag(node, tag),
        }
    }
}
