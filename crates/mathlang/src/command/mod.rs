//! Mathlang commands API
//!
//! Commands are the vocabulary of the parser.
//! Every control sequence in the input is looked up by name in a [Map] and the
//!     command found there is run.
//!
//! There are two kinds of commands:
//!
//! - *Primitives* are Rust closures.
//!     They read their arguments from the parser's scanner and then push nodes,
//!     open or close frames, or update the tagging registry.
//!     A closure may carry bound parameters, so one function like `genfrac`
//!     can back several commands (`\dfrac`, `\binom`, ...).
//!
//! - *Macros* are replacement texts.
//!     Running a macro replaces it in the input with the
//!     replacement text, which is then scanned.
//!     Macros are created at parse time, for example by `\DeclareMathOperator`.
//!
//! Environments (the `name` in `\begin{name}`) live in a separate map of [Environment]s.

use crate::parser::Parser;
use crate::prelude as mxl;
use crate::texmacro;
use std::rc;

pub(crate) mod map;

pub use map::Map;

/// The Rust type of primitive functions.
///
/// The second argument is the name of the command including its backslash, e.g. `\tag`.
pub type PrimitiveFn = dyn Fn(&mut Parser<'_>, &str) -> mxl::Result<()>;

/// The Rust type of environment functions.
///
/// The second argument is the name of the environment, e.g. `align*`.
pub type EnvironmentFn = dyn Fn(&mut Parser<'_>, &str) -> mxl::Result<()>;

/// A math command.
#[derive(Clone)]
pub enum Command {
    /// A primitive implemented in Rust.
    ///
    /// Examples: `\frac`, `\tag`.
    Primitive(rc::Rc<PrimitiveFn>),

    /// A macro whose replacement text is scanned in place of the command.
    ///
    /// Examples: operators created with `\DeclareMathOperator`.
    Macro(rc::Rc<texmacro::Macro>),
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Primitive(_) => write![f, "a primitive"],
            Command::Macro(_) => write![f, "a user-defined macro"],
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Primitive(_) => write![f, "Primitive"],
            Command::Macro(m) => write![f, "Macro({m:?})"],
        }
    }
}

/// A built-in command.
///
/// This struct is simply a combination of a [Command] and a documentation string for the command.
#[derive(Clone)]
pub struct BuiltIn {
    cmd: Command,
    doc: Option<&'static str>,
}

impl BuiltIn {
    /// Create a new primitive built-in command.
    pub fn new<F>(f: F) -> BuiltIn
    where
        F: Fn(&mut Parser<'_>, &str) -> mxl::Result<()> + 'static,
    {
        Command::Primitive(rc::Rc::new(f)).into()
    }

    /// Create a new macro built-in command.
    pub fn new_macro(m: texmacro::Macro) -> BuiltIn {
        Command::Macro(rc::Rc::new(m)).into()
    }

    /// Set the doc for this built-in command.
    pub fn with_doc(mut self, doc: &'static str) -> BuiltIn {
        self.doc = Some(doc);
        self
    }

    pub fn cmd(&self) -> &Command {
        &self.cmd
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }
}

impl From<Command> for BuiltIn {
    fn from(cmd: Command) -> Self {
        BuiltIn { cmd, doc: None }
    }
}

/// A built-in environment.
#[derive(Clone)]
pub struct Environment {
    f: rc::Rc<EnvironmentFn>,
    doc: Option<&'static str>,
}

impl Environment {
    pub fn new<F>(f: F) -> Environment
    where
        F: Fn(&mut Parser<'_>, &str) -> mxl::Result<()> + 'static,
    {
        Environment {
            f: rc::Rc::new(f),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: &'static str) -> Environment {
        self.doc = Some(doc);
        self
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    /// Opens the environment.
    pub fn begin(&self, parser: &mut Parser<'_>, name: &str) -> mxl::Result<()> {
        (self.f)(parser, name)
    }
}
