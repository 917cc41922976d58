//! The parser core.
//!
//! A [Parser] reads one buffer of math source and builds the node for it.
//! Characters are handled directly; control sequences are looked up in the
//!     document's [command map](crate::command::Map) and the command found is run.
//!
//! Commands that need to parse a piece of source on its own (an argument, say) create
//!     a nested parser with [Parser::parse_source].
//! The nested parser has its own scanner and stack and a copy of the flags,
//!     but shares the [Document] and thus the handler table and tagging registry.

use crate::command::Command;
use crate::config::Config;
use crate::document::Document;
use crate::error::{Error, Kind};
use crate::node::{self, slot, Node, TexClass};
use crate::prelude as mxl;
use crate::scanner::Scanner;
use crate::stack::{self, Font, Frame, Stack};
use crate::tags::Registry;

/// Flags copied into nested parsers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// An equation numbering environment is open.
    pub in_equation: bool,
}

pub struct Parser<'d> {
    scanner: Scanner,
    stack: Stack,
    flags: Flags,
    document: &'d mut Document,
}

impl<'d> Parser<'d> {
    pub fn new<T: Into<String>>(source: T, document: &'d mut Document) -> Parser<'d> {
        Parser {
            scanner: Scanner::new(source),
            stack: Stack::new(None),
            flags: Default::default(),
            document,
        }
    }

    /// Parses the whole buffer and returns its node.
    ///
    /// A single top-level node is returned as is; several nodes are returned in an inferred `mrow`.
    pub fn parse(mut self) -> mxl::Result<Node> {
        self.run()?;
        let position = self.scanner.source().len();
        if let Err(mut err) = self.check_closed() {
            err.locate(None, self.scanner.source(), position);
            return Err(err);
        }
        Ok(self.stack.into_boundary().finish(&mut self.document.tags))
    }

    fn run(&mut self) -> mxl::Result<()> {
        while let Some(c) = self.scanner.next_char() {
            let position = self.scanner.position() - c.len_utf8();
            if let Err(mut err) = self.process(c) {
                err.locate(None, self.scanner.source(), position);
                return Err(err);
            }
        }
        Ok(())
    }

    fn process(&mut self, c: char) -> mxl::Result<()> {
        match c {
            '\\' => {
                let name = self.scanner.control_sequence_name();
                self.dispatch(&name)
            }
            '{' => {
                self.stack.push(Frame::group());
                Ok(())
            }
            '}' => self.close_group(),
            '&' => {
                self.close_styles();
                self.stack.top_mut().end_cell()
            }
            '^' => {
                let script = self.parse_argument("^")?;
                self.attach_script("^", slot::SUP, script)
            }
            '_' => {
                let script = self.parse_argument("_")?;
                self.attach_script("_", slot::SUB, script)
            }
            '\'' => self.attach_script("'", slot::SUP, Node::token(node::Kind::Mo, "\u{2032}")),
            '%' => {
                while let Some(c) = self.scanner.next_char() {
                    if c == '\n' {
                        break;
                    }
                }
                Ok(())
            }
            '#' => Err(Error::new(
                Kind::CantUseHash,
                "you can't use 'macro parameter character #' in math mode",
            )
            .into()),
            '~' => self.push_node(Node::token(node::Kind::Mtext, "\u{A0}")),
            c if c.is_whitespace() => Ok(()),
            c if c.is_ascii_alphabetic() => {
                let mut mi = Node::token(node::Kind::Mi, c);
                if let Some(font) = self.stack.font() {
                    mi.set_attribute("mathvariant", font.mathvariant());
                }
                self.push_node(mi)
            }
            c if c.is_ascii_digit() => {
                let number = self.read_number(c);
                self.push_node(Node::token(node::Kind::Mn, number))
            }
            '.' if self.scanner.peek_char().map_or(false, |d| d.is_ascii_digit()) => {
                let number = self.read_number(c);
                self.push_node(Node::token(node::Kind::Mn, number))
            }
            c => {
                let (text, tex_class) = operator(c);
                self.push_node(Node::token(node::Kind::Mo, text).with_tex_class(tex_class))
            }
        }
    }

    fn read_number(&mut self, first: char) -> String {
        let mut number = String::from(first);
        let mut seen_point = first == '.';
        while let Some(c) = self.scanner.peek_char() {
            if c.is_ascii_digit() || (c == '.' && !seen_point) {
                seen_point |= c == '.';
                number.push(c);
                self.scanner.next_char();
            } else {
                break;
            }
        }
        number
    }

    /// Runs the command with the given name (without its backslash).
    pub fn dispatch(&mut self, name: &str) -> mxl::Result<()> {
        let cs = format!("\\{name}");
        let command = match self.document.commands.get_command(name) {
            Some(command) => command.clone(),
            None => return Err(self.undefined_command(&cs, name)),
        };
        tracing::trace!(command = cs.as_str(), "dispatching command");
        let result = match &command {
            Command::Primitive(f) => f(self, &cs),
            Command::Macro(m) => m.call(self),
        };
        result.map_err(|mut err| {
            err.set_command_if_unset(&cs);
            err
        })
    }

    fn undefined_command(&self, cs: &str, name: &str) -> Box<Error> {
        let mut err = Error::new(
            Kind::UndefinedControlSequence,
            format!("undefined control sequence {cs}"),
        )
        .with_command(cs);
        let close = self.document.commands.close_command_names(name);
        if !close.is_empty() {
            let close: Vec<String> = close.iter().map(|n| format!("\\{n}")).collect();
            err = err.with_note(format!("did you mean {}?", close.join(", ")));
        }
        err.into()
    }

    pub fn scanner(&mut self) -> &mut Scanner {
        &mut self.scanner
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    pub fn tags(&self) -> &Registry {
        &self.document.tags
    }

    pub fn tags_mut(&mut self) -> &mut Registry {
        &mut self.document.tags
    }

    pub fn config(&self) -> &Config {
        &self.document.config
    }

    /// Appends a node to the top frame.
    pub fn push_node(&mut self, node: Node) -> mxl::Result<()> {
        self.stack.top_mut().nodes.push(node);
        Ok(())
    }

    /// Removes the last node of the top frame.
    pub fn pop_node(&mut self) -> Option<Node> {
        self.stack.top_mut().nodes.pop()
    }

    pub fn push_frame(&mut self, frame: Frame) -> usize {
        if let Some(env) = frame.environment() {
            tracing::debug!(environment = env, depth = self.stack.depth() + 1, "opening environment");
        }
        self.stack.push(frame)
    }

    /// Parses a required argument in a nested parser.
    pub fn parse_argument(&mut self, command: &str) -> mxl::Result<Node> {
        let argument = self.scanner.required_argument(command)?;
        self.parse_source(&argument)
    }

    /// Parses a required argument in a nested parser that starts with the given font.
    pub fn parse_argument_with_font(&mut self, command: &str, font: Font) -> mxl::Result<Node> {
        let argument = self.scanner.required_argument(command)?;
        self.parse_source_with_font(&argument, Some(font))
    }

    /// Parses a piece of source in a nested parser sharing this parser's document.
    pub fn parse_source(&mut self, source: &str) -> mxl::Result<Node> {
        let font = self.stack.font();
        self.parse_source_with_font(source, font)
    }

    fn parse_source_with_font(&mut self, source: &str, font: Option<Font>) -> mxl::Result<Node> {
        if self.document.nesting >= self.document.config.max_nesting {
            return Err(Error::new(
                Kind::MaxMacroSubstitutions,
                "maximum nesting depth exceeded; is there a recursive macro call?",
            )
            .with_note(format!(
                "arguments may be nested at most {} deep",
                self.document.config.max_nesting
            ))
            .into());
        }
        self.document.nesting += 1;
        let parser = Parser {
            scanner: Scanner::new(source),
            stack: Stack::new(font),
            flags: self.flags,
            document: &mut *self.document,
        };
        let result = parser.parse();
        self.document.nesting -= 1;
        result
    }

    /// Replaces the consumed input with the text, which is scanned next.
    pub fn push_expansion(&mut self, text: &str) -> mxl::Result<()> {
        self.document.macro_count += 1;
        if self.document.macro_count > self.document.config.max_macros {
            return Err(Error::new(
                Kind::MaxMacroSubstitutions,
                "maximum number of macro substitutions exceeded; is there a recursive macro call?",
            )
            .into());
        }
        tracing::trace!(expansion = text, "substituting");
        self.scanner.replace_consumed(text);
        if self.scanner.source().len() > self.document.config.max_buffer {
            return Err(Error::new(
                Kind::MaxBufferSize,
                "buffer size exceeded; is there a recursive macro call?",
            )
            .into());
        }
        Ok(())
    }

    /// Marks the start of an equation numbering environment.
    ///
    /// Fails if one is already open.
    pub fn open_equation_unit(&mut self) -> mxl::Result<()> {
        if self.flags.in_equation {
            return Err(Error::new(
                Kind::ErroneousNesting,
                "erroneous nesting of equation structures",
            )
            .into());
        }
        self.flags.in_equation = true;
        Ok(())
    }

    /// Closes the style switches on top of the stack.
    pub fn close_styles(&mut self) {
        while matches!(self.stack.top().kind(), stack::Kind::Style { .. }) {
            match self.stack.pop() {
                None => return,
                Some(frame) => {
                    let node = frame.finish(&mut self.document.tags);
                    self.stack.top_mut().nodes.push(node);
                }
            }
        }
    }

    fn close_group(&mut self) -> mxl::Result<()> {
        self.close_styles();
        match self.stack.top().kind() {
            stack::Kind::Group => {}
            stack::Kind::Boundary => {
                return Err(Error::new(
                    Kind::ExtraCloseBrace,
                    "extra close brace or missing open brace",
                )
                .into())
            }
            _ => return Err(self.missing_end()),
        }
        match self.stack.pop() {
            None => Ok(()),
            Some(frame) => {
                let node = frame.finish(&mut self.document.tags);
                self.push_node(node)
            }
        }
    }

    /// Closes the environment on top of the stack, which must have the given name.
    pub fn close_environment(&mut self, name: &str) -> mxl::Result<()> {
        self.close_styles();
        let top = self.stack.top();
        match (top.kind(), top.environment()) {
            (stack::Kind::Boundary, _) => {
                return Err(Error::new(Kind::MissingBegin, format!("missing \\begin{{{name}}}")).into())
            }
            (stack::Kind::Group, _) => {
                return Err(Error::new(
                    Kind::MissingCloseBrace,
                    format!("missing close brace before \\end{{{name}}}"),
                )
                .into())
            }
            (_, Some(open)) if open != name => {
                return Err(Error::new(
                    Kind::MismatchedEnvironment,
                    format!("\\begin{{{open}}} ended with \\end{{{name}}}"),
                )
                .into())
            }
            _ => {}
        }
        let frame = match self.stack.pop() {
            None => return Ok(()),
            Some(frame) => frame,
        };
        if frame.is_equation_family() {
            self.flags.in_equation = false;
        }
        tracing::debug!(environment = name, depth = self.stack.depth(), "closing environment");
        let node = frame.finish(&mut self.document.tags);
        self.push_node(node)
    }

    /// Ends the current table row.
    ///
    /// Returns false if the top frame is not a table.
    pub fn end_row(&mut self) -> bool {
        self.close_styles();
        self.stack.top_mut().end_row(&mut self.document.tags)
    }

    fn attach_script(&mut self, command: &str, slot: usize, script: Node) -> mxl::Result<()> {
        let mut composite = match self.stack.top_mut().nodes.pop() {
            None => Node::scripted(node::Kind::Msubsup, Node::placeholder()),
            Some(base) => match base.kind() {
                node::Kind::Msubsup | node::Kind::Munderover => base,
                _ if base.flag("movesupsub") => Node::scripted(node::Kind::Munderover, base),
                _ => Node::scripted(node::Kind::Msubsup, base),
            },
        };
        if composite.data(slot).is_some() {
            self.stack.top_mut().nodes.push(composite);
            let title = if slot == slot::SUP {
                "double exponent: use braces to clarify"
            } else {
                "double subscripts: use braces to clarify"
            };
            return Err(Error::new(Kind::DoubleScript, title).with_command(command).into());
        }
        composite.set_data(slot, script);
        self.push_node(composite)
    }

    fn check_closed(&mut self) -> mxl::Result<()> {
        self.close_styles();
        match self.stack.top().kind() {
            stack::Kind::Boundary => Ok(()),
            stack::Kind::Group => Err(Error::new(Kind::MissingCloseBrace, "missing close brace").into()),
            _ => Err(self.missing_end()),
        }
    }

    fn missing_end(&self) -> Box<Error> {
        let name = self.stack.top().environment().unwrap_or_default();
        Error::new(Kind::MissingEnd, format!("missing \\end{{{name}}}")).into()
    }
}

/// Text and class of an operator character.
fn operator(c: char) -> (String, TexClass) {
    let tex_class = match c {
        '+' | '-' | '*' => TexClass::Bin,
        '=' | '<' | '>' | ':' => TexClass::Rel,
        ',' | ';' => TexClass::Punct,
        '(' | '[' => TexClass::Open,
        ')' | ']' | '!' | '?' => TexClass::Close,
        _ => TexClass::Ord,
    };
    let text = match c {
        '-' => '\u{2212}',
        '*' => '\u{2217}',
        c => c,
    };
    (text.to_string(), tex_class)
}
