//! Named operators, limit controls and multiple integrals
//!
//! Operator names are built by textual substitution:
//! `\operatorname{sin}` becomes `\mathop{\rm sin}\nolimits\SkipLimits`,
//!     and `\DeclareMathOperator` defines a macro with the same expansion.

use mathlang::command::BuiltIn;
use mathlang::error::{Error, Kind};
use mathlang::node::{self, Node, TexClass};
use mathlang::parser::Parser;
use mathlang::prelude as mxl;
use mathlang::texmacro::Macro;

pub const DECLARE_MATH_OPERATOR_DOC: &str = "Define a command that produces an upright operator name";
pub const OPERATORNAME_DOC: &str = "Produce an upright operator name";

/// Limit controls appended to an operator name; the starred forms take limits.
fn limit_controls(star: bool) -> &'static str {
    if star {
        ""
    } else {
        "\\nolimits\\SkipLimits"
    }
}

/// `*` and `-` are meant literally in operator names.
fn escape_operator_text(text: &str) -> String {
    text.replace('*', "\\text{*}").replace('-', "\\text{-}")
}

/// Get the `\DeclareMathOperator` command.
pub fn get_declare_math_operator() -> BuiltIn {
    BuiltIn::new(declare_math_operator_primitive_fn).with_doc(DECLARE_MATH_OPERATOR_DOC)
}

fn declare_math_operator_primitive_fn(parser: &mut Parser<'_>, cs: &str) -> mxl::Result<()> {
    let limits = limit_controls(parser.scanner().star());
    let name = parser.scanner().required_argument(cs)?;
    let name = name.trim();
    let name = name.strip_prefix('\\').unwrap_or(name);
    let text = escape_operator_text(&parser.scanner().required_argument(cs)?);
    tracing::debug!(name, text = text.as_str(), "declaring operator");
    let replacement = format!("\\mathop{{\\rm {text}}}{limits}");
    parser
        .document_mut()
        .commands_mut()
        .insert_macro(name, Macro::new(replacement));
    Ok(())
}

/// Get the `\operatorname` command.
pub fn get_operatorname() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let limits = limit_controls(parser.scanner().star());
        let text = parser.scanner().required_argument(cs)?;
        let text = escape_operator_text(text.trim());
        parser.push_expansion(&format!("\\mathop{{\\rm {text}}}{limits} "))
    })
    .with_doc(OPERATORNAME_DOC)
}

/// Get the `\SkipLimits` command, which swallows a directly following `\limits`.
pub fn get_skip_limits() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, _: &str| {
        let scanner = parser.scanner();
        if scanner.peek_non_space() != Some('\\') {
            return Ok(());
        }
        let position = scanner.position();
        scanner.next_char();
        if scanner.control_sequence_name() != "limits" {
            scanner.set_position(position);
        }
        Ok(())
    })
}

/// Get the `\mathop` command.
pub fn get_mathop() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let argument = parser.scanner().required_argument(cs)?;
        let node = match upright_name(&argument) {
            Some(name) => Node::token(node::Kind::Mi, name)
                .with_attribute("mathvariant", "normal")
                .with_tex_class(TexClass::Op),
            None => Node::atom(TexClass::Op, parser.parse_source(&argument)?),
        };
        parser.push_node(
            node.with_property("movesupsub", true)
                .with_property("movablelimits", true),
        )
    })
}

/// The name in an argument of the form `\rm name`, where the name is letters, digits and spaces.
fn upright_name(argument: &str) -> Option<&str> {
    let rest = argument.trim_start().strip_prefix("\\rm")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ');
    valid.then_some(name)
}

/// Get `\limits` (`limits = true`) or `\nolimits` (`limits = false`).
pub fn get_limits(limits: bool) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let mut operator = match parser.pop_node() {
            Some(node) if node.is_operator() => node,
            other => {
                if let Some(node) = other {
                    parser.push_node(node)?;
                }
                return Err(Error::new(
                    Kind::MisplacedLimits,
                    format!("{cs} is allowed only on operators"),
                )
                .into());
            }
        };
        operator.set_property("movesupsub", limits);
        operator.set_property("movablelimits", false);
        parser.push_node(operator)
    })
}

/// Integral signs and the number of thin spaces that compensate for `\mathop` when limits are requested.
pub const MULTI_INTEGRALS: &[(&str, &str, usize)] = &[
    ("iint", "\\int\\!\\!\\!\\int", 3),
    ("iiint", "\\int\\!\\!\\!\\int\\!\\!\\!\\int", 3),
    ("iiiint", "\\int\\!\\!\\!\\int\\!\\!\\!\\int\\!\\!\\!\\int", 3),
    ("idotsint", "\\int\\cdots\\int", 2),
];

/// Get a multiple integral like `\iint`.
///
/// If the integral is followed by `\limits` it is wrapped in `\mathop` so that the limits
///     apply to the whole sign.
pub fn get_multi_integral(integral: &'static str, compensation: usize) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let mut expansion = integral.to_string();
        if parser.scanner().peek_non_space() == Some('\\') {
            let position = parser.scanner().position();
            let next = parser.scanner().required_argument(cs)?;
            parser.scanner().set_position(position);
            if next == "\\limits" {
                expansion = format!(
                    "{}\\mathop{{{}{integral}}}",
                    "\\!".repeat(compensation),
                    "\\,".repeat(compensation),
                );
            }
        }
        expansion.push(' ');
        parser.push_expansion(&expansion)
    })
}
