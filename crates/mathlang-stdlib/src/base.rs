//! The base vocabulary: environments, rows, fonts, text, fractions, styles and spacing.
//!
//! These are the commands the AMS handlers expand into.

use mathlang::command::BuiltIn;
use mathlang::error::{Error, Kind};
use mathlang::node::{self, Node, TexClass};
use mathlang::parser::Parser;
use mathlang::prelude as mxl;
use mathlang::stack::{Font, Frame};

pub const BEGIN_DOC: &str = "Begin an environment";
pub const END_DOC: &str = "End an environment";
pub const NEWLINE_DOC: &str = "End the current row of a table";

/// Get the `\begin` command.
pub fn get_begin() -> BuiltIn {
    BuiltIn::new(begin_primitive_fn).with_doc(BEGIN_DOC)
}

fn begin_primitive_fn(parser: &mut Parser<'_>, cs: &str) -> mxl::Result<()> {
    let name = parser.scanner().required_argument(cs)?;
    let name = name.trim();
    let environment = match parser.document().commands().get_environment(name) {
        Some(environment) => environment.clone(),
        None => {
            let mut err = Error::new(
                Kind::UndefinedEnvironment,
                format!("unknown environment '{name}'"),
            );
            let close = parser.document().commands().close_environment_names(name);
            if !close.is_empty() {
                err = err.with_note(format!("did you mean {}?", close.join(", ")));
            }
            return Err(err.into());
        }
    };
    environment.begin(parser, name)
}

/// Get the `\end` command.
pub fn get_end() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let name = parser.scanner().required_argument(cs)?;
        parser.close_environment(name.trim())
    })
    .with_doc(END_DOC)
}

/// Get the `\\` command.
///
/// Inside a table this ends the row; elsewhere it is a line break.
/// The optional row spacing argument is read and ignored.
pub fn get_newline() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        parser.scanner().optional_argument(cs, "")?;
        if !parser.end_row() {
            parser.push_node(Node::create(
                node::Kind::Mspace,
                vec![],
                &[("linebreak", "newline")],
            ))?;
        }
        Ok(())
    })
    .with_doc(NEWLINE_DOC)
}

/// Get a font switch like `\rm`, which applies until the end of the enclosing group.
pub fn get_font_switch(font: Font) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, _: &str| {
        parser.stack_mut().top_mut().set_font(font);
        Ok(())
    })
}

/// Get a font command like `\mathrm`, which applies to its argument.
pub fn get_font_command(font: Font) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let content = parser.parse_argument_with_font(cs, font)?;
        parser.push_node(Node::atom(TexClass::Ord, content))
    })
}

/// Get the `\text` command.
pub fn get_text() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let text = parser.scanner().required_argument(cs)?;
        parser.push_node(Node::token(node::Kind::Mtext, text))
    })
}

/// Get the `\frac` command.
pub fn get_frac() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let numerator = parser.parse_argument(cs)?;
        let denominator = parser.parse_argument(cs)?;
        parser.push_node(Node::new(node::Kind::Mfrac, vec![numerator, denominator]))
    })
}

/// Get the `\strut` command: an invisible box of the height and depth of a parenthesis.
pub fn get_strut() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, _: &str| {
        parser.push_node(Node::create(
            node::Kind::Mpadded,
            vec![Node::new(node::Kind::Mrow, vec![])],
            &[("depth", "3pt"), ("height", "8.6pt"), ("width", "0")],
        ))
    })
}

/// Get a style switch like `\displaystyle`.
///
/// The style applies until the end of the enclosing group, cell, row or environment.
pub fn get_style(display: bool, level: u8) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, _: &str| {
        parser.push_frame(Frame::style(display, level));
        Ok(())
    })
}

/// Get a spacing command like `\quad`.
pub fn get_space(width: &'static str) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, _: &str| {
        parser.push_node(Node::create(node::Kind::Mspace, vec![], &[("width", width)]))
    })
}

pub const SPACES: &[(&str, &str)] = &[
    (",", "0.167em"),
    (":", "0.222em"),
    (";", "0.278em"),
    ("!", "-0.167em"),
    ("quad", "1em"),
    ("qquad", "2em"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environments;
    use mathlang::command;
    use mathlang_testing::*;
    use std::collections::HashMap;

    fn built_ins() -> command::Map {
        let mut commands = HashMap::from([
            ("begin", get_begin()),
            ("end", get_end()),
            ("\\", get_newline()),
            ("rm", get_font_switch(Font::Normal)),
            ("bf", get_font_switch(Font::Bold)),
            ("mathrm", get_font_command(Font::Normal)),
            ("mathbf", get_font_command(Font::Bold)),
            ("text", get_text()),
            ("frac", get_frac()),
            ("strut", get_strut()),
            ("displaystyle", get_style(true, 0)),
            ("scriptstyle", get_style(false, 1)),
        ]);
        for &(name, width) in SPACES {
            commands.insert(name, get_space(width));
        }
        let environments = HashMap::from([
            ("equation", environments::get_equation(true)),
            ("matrix", environments::get_matrix("", "")),
        ]);
        command::Map::new(commands, environments)
    }

    test_suite![
        mathml_tests(
            (
                font_switch_in_group,
                r"{\bf x}y",
                r#"<mrow data-mjx-texclass="ORD"><mi mathvariant="bold">x</mi></mrow><mi>y</mi>"#
            ),
            (
                font_command,
                r"\mathrm{d}x",
                r#"<mrow data-mjx-texclass="ORD"><mi mathvariant="normal">d</mi></mrow><mi>x</mi>"#
            ),
            (text, r"\text{if }x", "<mtext>if </mtext><mi>x</mi>"),
            (
                frac,
                r"\frac{1}{x+1}",
                "<mfrac><mn>1</mn><mrow><mi>x</mi><mo>+</mo><mn>1</mn></mrow></mfrac>"
            ),
            (
                strut,
                r"\strut",
                r#"<mpadded depth="3pt" height="8.6pt" width="0"><mrow/></mpadded>"#
            ),
            (
                style_switch_closes_with_group,
                r"{\displaystyle x}y",
                r#"<mrow data-mjx-texclass="ORD"><mstyle displaystyle="true" scriptlevel="0"><mi>x</mi></mstyle></mrow><mi>y</mi>"#
            ),
            (
                style_switch_closes_at_end,
                r"x\scriptstyle y",
                r#"<mi>x</mi><mstyle displaystyle="false" scriptlevel="1"><mi>y</mi></mstyle>"#
            ),
            (
                spacing,
                r"a\,b\quad c\!d",
                concat!(
                    r#"<mi>a</mi><mspace width="0.167em"/><mi>b</mi><mspace width="1em"/>"#,
                    r#"<mi>c</mi><mspace width="-0.167em"/><mi>d</mi>"#,
                ),
            ),
            (
                newline_outside_table,
                r"a\\b",
                r#"<mi>a</mi><mspace linebreak="newline"/><mi>b</mi>"#
            ),
            (
                newline_with_spacing_argument,
                r"\begin{matrix}a\\[2pt]b\end{matrix}",
                r#"<mtable columnalign="center" columnspacing="1em" rowspacing="4pt"><mtr><mtd><mi>a</mi></mtd></mtr><mtr><mtd><mi>b</mi></mtd></mtr></mtable>"#
            ),
            (
                begin_trims_name,
                r"\begin{ equation }x\end{equation }",
                r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr></mtable>"#
            ),
        ),
        failure_tests(
            (undefined_environment, r"\begin{equaton}x\end{equaton}", UndefinedEnvironment),
            (begin_without_argument, r"\begin", MissingArgument),
            (end_without_begin, r"x\end{equation}", MissingBegin),
            (mismatched_end, r"\begin{equation}x\end{matrix}", MismatchedEnvironment),
            (unclosed_environment, r"\begin{matrix}x", MissingEnd),
            (text_without_argument, r"\text", MissingArgument),
        ),
    ];

    #[test]
    fn undefined_environment_suggestion() {
        let mut document = mathlang::document::Document::new(built_ins(), Default::default());
        let err = document
            .parse(r"\begin{equaton}x\end{equaton}", mathlang::document::Mode::Display)
            .unwrap_err();
        assert_eq!(err.command(), Some("\\begin"));
        assert_eq!(err.notes(), &["did you mean equation?".to_string()]);
    }
}
