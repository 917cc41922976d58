//! Macros: commands defined by a replacement text.

use crate::parser::Parser;
use crate::prelude as mxl;

/// A macro: a command that is replaced by its text in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    replacement: String,
}

impl Macro {
    pub fn new<T: Into<String>>(replacement: T) -> Macro {
        Macro {
            replacement: replacement.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Substitutes the replacement text into the input.
    ///
    /// A space is appended when the text ends with a control word and a letter follows,
    ///     so the two are not read as one name.
    pub fn call(&self, parser: &mut Parser<'_>) -> mxl::Result<()> {
        let mut expansion = self.replacement.clone();
        if ends_with_control_word(&expansion)
            && parser
                .scanner()
                .peek_char()
                .map_or(false, |c| c.is_ascii_alphabetic())
        {
            expansion.push(' ');
        }
        parser.push_expansion(&expansion)
    }
}

fn ends_with_control_word(s: &str) -> bool {
    let letters = s
        .chars()
        .rev()
        .take_while(char::is_ascii_alphabetic)
        .count();
    letters > 0 && s[..s.len() - letters].ends_with('\\')
}
