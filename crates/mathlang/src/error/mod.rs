//! Error handling
//!
//! Every failure in Mathlang is an [Error] value carrying a stable [Kind].
//! Code that needs to react to a specific failure should match on the kind;
//!     the title and notes are for humans and may change.
//!
//! Errors are created without location information by whatever code detects the problem.
//! The parser then fills in the command being run and the position in the source
//!     the first time the error passes through it.
//! Outer parsers never overwrite this information, so an error raised inside an
//!     argument points into the argument.

use std::fmt;

pub mod display;
pub mod spellcheck;

/// Stable identifier of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    UndefinedControlSequence,
    UndefinedEnvironment,
    MissingArgument,
    MalformedArgument,
    MissingDelimiter,
    MissingCloseBracket,
    ExtraCloseBrace,
    MissingCloseBrace,
    CantUseHash,
    DoubleScript,
    MaxMacroSubstitutions,
    MaxBufferSize,

    ErroneousNesting,
    MismatchedEnvironment,
    MissingBegin,
    MissingEnd,
    ShoveNotAtLineStart,
    ShoveOutsideMultiline,
    MisplacedAlignmentTab,
    MultlineRowsOneColumn,
    MisplacedLimits,

    MultipleTag,
    TagNotAllowedHere,
    DuplicateLabel,
    MultipleLabel,
    BadMathStyle,
    IllegalAlign,
}

/// Broad classification of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// The input could not be read: bad arguments, unknown commands, resource limits.
    Syntax,
    /// Environments and groups are not nested correctly.
    Structural,
    /// The input is well formed but violates a numbering or formatting rule.
    Semantic,
}

impl Kind {
    pub fn category(&self) -> Category {
        use Kind::*;
        match self {
            UndefinedControlSequence | UndefinedEnvironment | MissingArgument
            | MalformedArgument | MissingDelimiter | MissingCloseBracket | ExtraCloseBrace
            | MissingCloseBrace | CantUseHash | DoubleScript | MaxMacroSubstitutions
            | MaxBufferSize => Category::Syntax,
            ErroneousNesting | MismatchedEnvironment | MissingBegin | MissingEnd
            | ShoveNotAtLineStart | ShoveOutsideMultiline | MisplacedAlignmentTab
            | MultlineRowsOneColumn | MisplacedLimits => Category::Structural,
            MultipleTag | TagNotAllowedHere | DuplicateLabel | MultipleLabel | BadMathStyle
            | IllegalAlign => Category::Semantic,
        }
    }
}

/// The line of source code an error points at.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceTrace {
    pub line_content: String,
    /// 1-indexed.
    pub line_number: usize,
    /// Number of characters before the error on its line.
    pub column: usize,
}

impl SourceTrace {
    /// Builds the trace for the byte `position` in `source`.
    ///
    /// Positions past the end of the source or inside a multi-byte character
    ///     are moved back to the nearest character boundary.
    pub fn new(source: &str, position: usize) -> SourceTrace {
        let mut position = position.min(source.len());
        while !source.is_char_boundary(position) {
            position -= 1;
        }
        let line_start = source[..position].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[position..]
            .find('\n')
            .map_or(source.len(), |i| position + i);
        SourceTrace {
            line_content: source[line_start..line_end].to_string(),
            line_number: source[..position].matches('\n').count() + 1,
            column: source[line_start..position].chars().count(),
        }
    }
}

/// A Mathlang error.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    kind: Kind,
    title: String,
    command: Option<String>,
    position: Option<usize>,
    trace: Option<SourceTrace>,
    notes: Vec<String>,
}

impl Error {
    pub fn new<T: Into<String>>(kind: Kind, title: T) -> Error {
        Error {
            kind,
            title: title.into(),
            command: None,
            position: None,
            trace: None,
            notes: vec![],
        }
    }

    /// Sets the command that raised the error, e.g. `\tag`.
    pub fn with_command<T: Into<String>>(mut self, command: T) -> Error {
        self.command = Some(command.into());
        self
    }

    /// Sets the byte offset of the error in the buffer being parsed.
    pub fn with_position(mut self, position: usize) -> Error {
        self.position = Some(position);
        self
    }

    pub fn with_note<T: Into<String>>(mut self, note: T) -> Error {
        self.notes.push(note.into());
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn trace(&self) -> Option<&SourceTrace> {
        self.trace.as_ref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub(crate) fn set_command_if_unset(&mut self, command: &str) {
        if self.command.is_none() {
            self.command = Some(command.to_string());
        }
    }

    /// Fills in location information that is not already set.
    pub(crate) fn locate(&mut self, command: Option<&str>, source: &str, position: usize) {
        if self.command.is_none() {
            self.command = command.map(str::to_string);
        }
        let position = *self.position.get_or_insert(position);
        if self.trace.is_none() {
            self.trace = Some(SourceTrace::new(source, position));
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::format_error(f, self)
    }
}

impl std::error::Error for Error {}
