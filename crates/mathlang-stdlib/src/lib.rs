//! # The Mathlang standard library
//!
//! This crate contains the commands and environments of Mathlang:
//!     the base vocabulary of TeX math mode and the AMS math extensions
//!     (numbered environments, tags and references, fractions, arrows and operator names).
//!
//! ```
//! use mathlang::config::Config;
//! use mathlang::document::Mode;
//!
//! let mut document = mathlang_stdlib::new_document(Config::default());
//! let math = document.parse(r"\binom{n}{k}", Mode::Inline).unwrap();
//! assert_eq!(math.text_content(), "(nk)");
//! ```

use std::collections::HashMap;

use mathlang::command::{self, BuiltIn, Environment};
use mathlang::config::Config;
use mathlang::document::Document;
use mathlang::stack::{Font, Shove};

pub mod arrows;
pub mod base;
pub mod environments;
pub mod fractions;
pub mod operators;
pub mod symbols;
pub mod tagging;

/// All built-in commands, keyed by name without the backslash.
pub fn built_in_commands() -> HashMap<&'static str, BuiltIn> {
    let mut commands = HashMap::from([
        ("begin", base::get_begin()),
        ("end", base::get_end()),
        ("\\", base::get_newline()),
        //
        ("rm", base::get_font_switch(Font::Normal)),
        ("bf", base::get_font_switch(Font::Bold)),
        ("mathrm", base::get_font_command(Font::Normal)),
        ("mathbf", base::get_font_command(Font::Bold)),
        ("text", base::get_text()),
        ("frac", base::get_frac()),
        ("strut", base::get_strut()),
        ("displaystyle", base::get_style(true, 0)),
        ("textstyle", base::get_style(false, 0)),
        ("scriptstyle", base::get_style(false, 1)),
        ("scriptscriptstyle", base::get_style(false, 2)),
        //
        ("mathop", operators::get_mathop()),
        ("limits", operators::get_limits(true)),
        ("nolimits", operators::get_limits(false)),
        ("DeclareMathOperator", operators::get_declare_math_operator()),
        ("operatorname", operators::get_operatorname()),
        ("SkipLimits", operators::get_skip_limits()),
        //
        ("genfrac", fractions::get_genfrac(None, None, None, None)),
        ("dfrac", fractions::get_genfrac(Some(""), Some(""), Some(""), Some("0"))),
        ("tfrac", fractions::get_genfrac(Some(""), Some(""), Some(""), Some("1"))),
        ("binom", fractions::get_genfrac(Some("("), Some(")"), Some("0"), Some(""))),
        ("dbinom", fractions::get_genfrac(Some("("), Some(")"), Some("0"), Some("0"))),
        ("tbinom", fractions::get_genfrac(Some("("), Some(")"), Some("0"), Some("1"))),
        ("cfrac", fractions::get_cfrac()),
        //
        ("xrightarrow", arrows::get_x_arrow("\u{2192}", 5, 10)),
        ("xleftarrow", arrows::get_x_arrow("\u{2190}", 10, 5)),
        //
        ("tag", tagging::get_tag()),
        ("notag", tagging::get_notag()),
        ("nonumber", tagging::get_notag()),
        ("label", tagging::get_label()),
        ("ref", tagging::get_ref(false)),
        ("eqref", tagging::get_ref(true)),
        //
        ("shoveleft", environments::get_shove(Shove::Left)),
        ("shoveright", environments::get_shove(Shove::Right)),
    ]);
    for &(name, width) in base::SPACES {
        commands.insert(name, base::get_space(width));
    }
    for &(name, integral, compensation) in operators::MULTI_INTEGRALS {
        commands.insert(name, operators::get_multi_integral(integral, compensation));
    }
    for &(name, text, shape) in symbols::SYMBOLS {
        commands.insert(name, symbols::get_symbol(text, shape));
    }
    commands
}

/// All built-in environments.
pub fn built_in_environments() -> HashMap<&'static str, Environment> {
    use environments::*;
    HashMap::from([
        ("equation", get_equation(true)),
        ("equation*", get_equation(false)),
        ("multline", get_multline(true)),
        ("multline*", get_multline(false)),
        ("align", get_ams_array(true, true, ALIGN_COLUMNS, ALIGN_SPACING)),
        ("align*", get_ams_array(false, true, ALIGN_COLUMNS, ALIGN_SPACING)),
        ("gather", get_ams_array(true, true, "c", "")),
        ("gather*", get_ams_array(false, true, "c", "")),
        ("alignat", get_alignat(true, true)),
        ("alignat*", get_alignat(false, true)),
        ("split", get_ams_array(false, false, "rl", "0em")),
        ("aligned", get_aligned_ams_array(ALIGN_COLUMNS, ALIGN_SPACING)),
        ("gathered", get_aligned_ams_array("c", "")),
        ("alignedat", get_alignat(false, false)),
        //
        ("array", get_array()),
        ("matrix", get_matrix("", "")),
        ("pmatrix", get_matrix("(", ")")),
        ("bmatrix", get_matrix("[", "]")),
        ("Bmatrix", get_matrix("{", "}")),
        ("vmatrix", get_matrix("|", "|")),
        ("Vmatrix", get_matrix("\u{2016}", "\u{2016}")),
    ])
}

/// The command map with all built-in commands and environments.
pub fn command_map() -> command::Map {
    command::Map::new(built_in_commands(), built_in_environments())
}

/// A new document with all built-in commands and environments.
pub fn new_document(config: Config) -> Document {
    Document::new(command_map(), config)
}
