//! Reading characters, control sequence names and arguments from math source.
//!
//! The scanner owns the buffer being parsed and a byte offset into it.
//! Handlers may move the offset backwards (to peek at upcoming input) and may
//!     replace the part of the buffer that has already been consumed with new text
//!     that is then scanned next.

use crate::error::{Error, Kind};
use crate::prelude as mxl;

/// Delimiters accepted by [Scanner::delimiter_argument], and the character each stands for.
///
/// The null delimiter `.` maps to the empty string.
const DELIMITERS: &[(&str, &str)] = &[
    ("(", "("),
    (")", ")"),
    ("[", "["),
    ("]", "]"),
    ("<", "\u{27E8}"),
    (">", "\u{27E9}"),
    ("/", "/"),
    ("|", "|"),
    (".", ""),
    ("\\{", "{"),
    ("\\}", "}"),
    ("\\lbrace", "{"),
    ("\\rbrace", "}"),
    ("\\lbrack", "["),
    ("\\rbrack", "]"),
    ("\\langle", "\u{27E8}"),
    ("\\rangle", "\u{27E9}"),
    ("\\lfloor", "\u{230A}"),
    ("\\rfloor", "\u{230B}"),
    ("\\lceil", "\u{2308}"),
    ("\\rceil", "\u{2309}"),
    ("\\vert", "|"),
    ("\\|", "\u{2016}"),
    ("\\Vert", "\u{2016}"),
    ("\\backslash", "\\"),
];

/// Returns the character a delimiter stands for, or [None] if it is not a delimiter.
pub fn delimiter(name: &str) -> Option<&'static str> {
    DELIMITERS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    source: String,
    position: usize,
}

impl Scanner {
    pub fn new<T: Into<String>>(source: T) -> Scanner {
        Scanner {
            source: source.into(),
            position: 0,
        }
    }

    /// The whole buffer, including the consumed prefix.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte offset of the next character to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor.
    ///
    /// The position must have been obtained from [Scanner::position] on the current buffer.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.source.len());
    }

    pub fn remaining(&self) -> &str {
        &self.source[self.position..]
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position += c.len_utf8();
        Some(c)
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                return;
            }
            self.position += c.len_utf8();
        }
    }

    /// Skips whitespace and returns the next character without consuming it.
    pub fn peek_non_space(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek_char()
    }

    /// Reads the name of a control sequence whose escape character has already been consumed.
    ///
    /// A name is either a run of ASCII letters, in which case one following space is
    ///     also consumed, or a single other character.
    /// At the end of input the empty name is returned.
    pub fn control_sequence_name(&mut self) -> String {
        let rest = self.remaining();
        let letters = rest
            .chars()
            .take_while(char::is_ascii_alphabetic)
            .count();
        if letters > 0 {
            let name = rest[..letters].to_string();
            self.position += letters;
            if self.peek_char() == Some(' ') {
                self.position += 1;
            }
            return name;
        }
        match self.next_char() {
            None => String::new(),
            Some(c) => c.to_string(),
        }
    }

    /// Consumes a `*` if it is the next non-space character.
    pub fn star(&mut self) -> bool {
        if self.peek_non_space() == Some('*') {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Reads a required argument.
    ///
    /// The argument is a brace-delimited group (returned without the outer braces),
    ///     a control sequence (returned with its backslash) or a single character.
    pub fn required_argument(&mut self, command: &str) -> mxl::Result<String> {
        match self.peek_non_space() {
            None => Err(Error::new(
                Kind::MissingArgument,
                format!("missing argument for {command}"),
            )
            .with_position(self.position)
            .into()),
            Some('{') => {
                let start = self.position;
                self.position += 1;
                let mut depth = 1_usize;
                while let Some(c) = self.next_char() {
                    match c {
                        '\\' => {
                            self.next_char();
                        }
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(self.source[start + 1..self.position - 1].to_string());
                            }
                        }
                        _ => {}
                    }
                }
                Err(Error::new(
                    Kind::MissingCloseBrace,
                    format!("missing close brace in the argument to {command}"),
                )
                .with_position(start)
                .into())
            }
            Some('}') => Err(Error::new(
                Kind::ExtraCloseBrace,
                format!("extra close brace or missing open brace in the argument to {command}"),
            )
            .with_position(self.position)
            .into()),
            Some('\\') => {
                self.position += 1;
                Ok(format!("\\{}", self.control_sequence_name()))
            }
            Some(c) => {
                self.position += c.len_utf8();
                Ok(c.to_string())
            }
        }
    }

    /// Reads an optional bracket-delimited argument, or returns the default if there is none.
    ///
    /// Brackets nested inside braces do not end the argument.
    pub fn optional_argument(&mut self, command: &str, default: &str) -> mxl::Result<String> {
        if self.peek_non_space() != Some('[') {
            return Ok(default.to_string());
        }
        let start = self.position;
        self.position += 1;
        let mut depth = 0_usize;
        while let Some(c) = self.next_char() {
            match c {
                '\\' => {
                    self.next_char();
                }
                '{' => depth += 1,
                '}' => {
                    if depth == 0 {
                        return Err(Error::new(
                            Kind::ExtraCloseBrace,
                            format!("extra close brace while looking for ']' in the argument to {command}"),
                        )
                        .with_position(self.position - 1)
                        .into());
                    }
                    depth -= 1;
                }
                ']' if depth == 0 => {
                    return Ok(self.source[start + 1..self.position - 1].to_string());
                }
                _ => {}
            }
        }
        Err(Error::new(
            Kind::MissingCloseBracket,
            format!("could not find the closing ']' for the argument to {command}"),
        )
        .with_position(start)
        .into())
    }

    /// Reads a required argument that must be a delimiter.
    ///
    /// Returns the character the delimiter stands for; the empty argument and the
    ///     null delimiter `.` both give the empty string.
    pub fn delimiter_argument(&mut self, command: &str) -> mxl::Result<String> {
        let start = self.position;
        let argument = self.required_argument(command)?;
        let argument = argument.trim();
        if argument.is_empty() {
            return Ok(String::new());
        }
        match delimiter(argument) {
            Some(d) => Ok(d.to_string()),
            None => Err(Error::new(
                Kind::MissingDelimiter,
                format!("missing or unrecognized delimiter '{argument}' for {command}"),
            )
            .with_position(start)
            .into()),
        }
    }

    /// Replaces the consumed prefix of the buffer with `text`.
    ///
    /// Afterwards the cursor is at the start of `text`.
    pub fn replace_consumed(&mut self, text: &str) {
        let mut source = String::with_capacity(text.len() + self.remaining().len());
        source.push_str(text);
        source.push_str(self.remaining());
        self.source = source;
        self.position = 0;
    }
}
