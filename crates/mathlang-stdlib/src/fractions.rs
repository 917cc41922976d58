//! Generalized and continued fractions

use mathlang::command::BuiltIn;
use mathlang::error::{Error, Kind};
use mathlang::node::{self, Node};
use mathlang::parser::Parser;
use mathlang::prelude as mxl;

pub const GENFRAC_DOC: &str = "Generalized fraction: \\genfrac{left}{right}{thickness}{style}{numerator}{denominator}";
pub const CFRAC_DOC: &str = "Continued fraction, with optional [l] or [r] alignment of the parts";

/// Get `\genfrac` or one of its bound forms.
///
/// Parameters that are [None] are read from the input, in the order left delimiter,
///     right delimiter, line thickness, style.
/// An empty thickness keeps the default rule; an empty style keeps the current style.
pub fn get_genfrac(
    left: Option<&'static str>,
    right: Option<&'static str>,
    thickness: Option<&'static str>,
    style: Option<&'static str>,
) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let left = match left {
            Some(left) => left.to_string(),
            None => parser.scanner().delimiter_argument(cs)?,
        };
        let right = match right {
            Some(right) => right.to_string(),
            None => parser.scanner().delimiter_argument(cs)?,
        };
        let thickness = match thickness {
            Some(thickness) => thickness.to_string(),
            None => parser.scanner().required_argument(cs)?,
        };
        let style = match style {
            Some(style) => style.to_string(),
            None => parser.scanner().required_argument(cs)?.trim().to_string(),
        };
        let level = math_style(cs, &style)?;
        let numerator = parser.parse_argument(cs)?;
        let denominator = parser.parse_argument(cs)?;

        let mut frac = Node::new(node::Kind::Mfrac, vec![numerator, denominator]);
        if !thickness.is_empty() {
            frac.set_attribute("linethickness", thickness);
        }
        if !left.is_empty() || !right.is_empty() {
            frac.set_property("withDelims", true);
            frac = Node::fixed_fence(&left, frac, &right);
        }
        if let Some(level) = level {
            let (display, scriptlevel) = match level {
                0 => ("true", 0),
                n => ("false", n - 1),
            };
            frac = Node::create(
                node::Kind::Mstyle,
                vec![frac],
                &[
                    ("displaystyle", display),
                    ("scriptlevel", scriptlevel.to_string().as_str()),
                ],
            );
        }
        parser.push_node(frac)
    })
    .with_doc(GENFRAC_DOC)
}

/// Parses a `\genfrac` style: 0 display, 1 text, 2 script, 3 scriptscript.
fn math_style(cs: &str, style: &str) -> mxl::Result<Option<u8>> {
    if style.is_empty() {
        return Ok(None);
    }
    match style.parse::<u8>() {
        Ok(level) if level <= 3 => Ok(Some(level)),
        _ => Err(Error::new(Kind::BadMathStyle, format!("bad math style for {cs}"))
            .with_note(format!("the style must be 0, 1, 2 or 3, got '{style}'"))
            .into()),
    }
}

/// Get the `\cfrac` command.
pub fn get_cfrac() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let align = parser.scanner().optional_argument(cs, "")?;
        let align = match align.trim() {
            "" => None,
            "l" => Some("left"),
            "r" => Some("right"),
            _ => {
                return Err(Error::new(
                    Kind::IllegalAlign,
                    format!("illegal alignment specified in {cs}"),
                )
                .into())
            }
        };
        let numerator = parser.scanner().required_argument(cs)?;
        let denominator = parser.scanner().required_argument(cs)?;
        let numerator = parser.parse_source(&format!("\\strut\\textstyle{{{numerator}}}"))?;
        let denominator = parser.parse_source(&format!("\\strut\\textstyle{{{denominator}}}"))?;
        let mut frac = Node::new(node::Kind::Mfrac, vec![numerator, denominator]);
        if let Some(align) = align {
            frac.set_attribute("numalign", align);
            frac.set_attribute("denomalign", align);
        }
        parser.push_node(frac)
    })
    .with_doc(CFRAC_DOC)
}
