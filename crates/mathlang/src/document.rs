//! Documents: the context shared by all equations of one page.
//!
//! A [Document] owns the command map, the tagging registry, the configuration
//!     and the per-equation substitution counter.
//! Each call to [Document::parse] parses one equation; equation numbers and labels
//!     carry over from one call to the next.

use crate::command;
use crate::config::Config;
use crate::node::{self, Node};
use crate::parser::Parser;
use crate::prelude as mxl;
use crate::tags::{Registry, TagFormat};

/// How an equation is displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Display,
    Inline,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Display => "block",
            Mode::Inline => "inline",
        }
    }
}

pub struct Document {
    pub(crate) commands: command::Map,
    pub(crate) tags: Registry,
    pub(crate) config: Config,
    pub(crate) macro_count: usize,
    pub(crate) nesting: usize,
}

impl Document {
    pub fn new(commands: command::Map, config: Config) -> Document {
        Document {
            commands,
            tags: Registry::new(&config),
            config,
            macro_count: 0,
            nesting: 0,
        }
    }

    pub fn commands(&self) -> &command::Map {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut command::Map {
        &mut self.commands
    }

    pub fn tags(&self) -> &Registry {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut Registry {
        &mut self.tags
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_format(&mut self, format: Box<dyn TagFormat>) {
        self.tags.set_format(format);
    }

    /// Parses one equation and returns its `math` element.
    ///
    /// If parsing fails, the labels and equation numbers of the equation are discarded.
    pub fn parse(&mut self, source: &str, mode: Mode) -> mxl::Result<Node> {
        self.macro_count = 0;
        self.nesting = 0;
        self.tags.start_equation();
        tracing::debug!(mode = mode.as_str(), counter = self.tags.counter(), "starting equation");
        match Parser::new(source, self).parse() {
            Ok(node) => {
                let node = self.tags.finalize(node, mode == Mode::Display);
                self.tags.finish_equation();
                tracing::debug!(counter = self.tags.counter(), "finished equation");
                Ok(math(node, mode))
            }
            Err(err) => {
                self.tags.abandon_equation();
                tracing::debug!(kind = ?err.kind(), "abandoned equation");
                Err(err)
            }
        }
    }

    /// Forgets all equation numbers and labels.
    pub fn reset(&mut self) {
        self.tags.reset();
    }

    /// Restarts numbering for a second pass over the same equations.
    ///
    /// Labels found so far are kept so that forward references resolve.
    pub fn begin_reference_pass(&mut self) {
        self.tags.begin_reference_pass();
    }

    /// Parses a whole document.
    ///
    /// If some equation referenced a label that was defined later, the document is
    ///     parsed a second time and the results of the second pass are returned.
    pub fn typeset(&mut self, sources: &[(&str, Mode)]) -> Vec<mxl::Result<Node>> {
        self.reset();
        let results = self.parse_all(sources);
        if !self.tags.has_unresolved() {
            return results;
        }
        self.begin_reference_pass();
        self.parse_all(sources)
    }

    fn parse_all(&mut self, sources: &[(&str, Mode)]) -> Vec<mxl::Result<Node>> {
        sources
            .iter()
            .map(|(source, mode)| self.parse(source, *mode))
            .collect()
    }
}

fn math(node: Node, mode: Mode) -> Node {
    let children = if node.is_inferred_row() {
        node.into_children()
    } else {
        vec![node]
    };
    Node::create(node::Kind::Math, children, &[("display", mode.as_str())])
}
