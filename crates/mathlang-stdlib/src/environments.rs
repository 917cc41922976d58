//! Tabular and equation environments
//!
//! The AMS environments come in three shapes:
//!
//! - `equation`: a single numbered unit.
//! - `multline`: one column, one tag for the whole environment.
//! - AMS arrays (`align`, `gather`, `alignat`, `split`, `aligned`, ...): every row is
//!     a numbering unit, unless the environment is not taggable.
//!
//! Only one numbering environment may be open at a time.
//! The plain `array` and the matrix family are tables without numbering.

use mathlang::command::{BuiltIn, Environment};
use mathlang::error::{Error, Kind};
use mathlang::parser::Parser;
use mathlang::prelude as mxl;
use mathlang::stack::{normalize_alignment, ArrayDef, Frame, Shove, Table};

/// Column specification of `align`: six `rl` pairs.
pub const ALIGN_COLUMNS: &str = "rlrlrlrlrlrl";
/// Column spacing of `align`: no space inside a pair, `2em` between pairs.
pub const ALIGN_SPACING: &str = "0em 2em 0em 2em 0em 2em 0em 2em 0em 2em 0em";

/// Get the `equation` or `equation*` environment.
pub fn get_equation(numbered: bool) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        parser.open_equation_unit()?;
        parser.tags_mut().start(name, true, numbered);
        parser.push_frame(Frame::equation(name, numbered));
        Ok(())
    })
}

/// Get the `multline` or `multline*` environment.
pub fn get_multline(numbered: bool) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        parser.open_equation_unit()?;
        let config = parser.config();
        let def = ArrayDef {
            display_style: Some(true),
            row_spacing: Some(".5em".into()),
            column_width: Some("100%".into()),
            width: Some(config.multline_width.clone()),
            side: Some(config.tag_side),
            min_label_spacing: Some(config.tag_indent.clone()),
            ..Default::default()
        };
        parser.tags_mut().start(name, true, numbered);
        parser.push_frame(Frame::multline(
            name,
            Table::new(def).with_tagging(numbered, true),
        ));
        Ok(())
    })
}

/// Get an AMS array environment with a fixed column specification.
///
/// An empty spacing gives the default column spacing of `1em`.
pub fn get_ams_array(
    numbered: bool,
    taggable: bool,
    align: &'static str,
    spacing: &'static str,
) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        let def = ams_array_def(parser, align, spacing);
        begin_ams_array(parser, name, def, numbered, taggable)
    })
}

/// Get an untaggable AMS array that accepts a `[t|c|b]` vertical alignment, like `aligned`.
pub fn get_aligned_ams_array(align: &'static str, spacing: &'static str) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        let valign = parser
            .scanner()
            .optional_argument(&format!("\\begin{{{name}}}"), "")?;
        let mut def = ams_array_def(parser, align, spacing);
        def.set_vertical_align(&valign);
        begin_ams_array(parser, name, def, false, false)
    })
}

/// Get the `alignat`, `alignat*` or `alignedat` environment.
///
/// The number of `rl` column pairs is given as an argument.
/// The untaggable form also accepts a vertical alignment before the count.
pub fn get_alignat(numbered: bool, taggable: bool) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        let cs = format!("\\begin{{{name}}}");
        let valign = if taggable {
            String::new()
        } else {
            parser.scanner().optional_argument(&cs, "")?
        };
        let count = parser.scanner().required_argument(&cs)?;
        let count = parse_column_count(&cs, &count)?;
        let (align, spacing) = alignat_columns(count);
        let mut def = ams_array_def(parser, &align, &spacing);
        def.set_vertical_align(&valign);
        begin_ams_array(parser, name, def, numbered, taggable)
    })
}

fn parse_column_count(cs: &str, count: &str) -> mxl::Result<usize> {
    let count = count.trim();
    let malformed = || -> Box<Error> {
        Error::new(
            Kind::MalformedArgument,
            format!("argument to {cs} must be a positive integer"),
        )
        .with_note(format!("got '{count}'"))
        .into()
    };
    if count.is_empty() || !count.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    match count.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(malformed()),
    }
}

/// Column specification and spacing of an `alignat` environment with `n` column pairs.
pub fn alignat_columns(n: usize) -> (String, String) {
    let align = "rl".repeat(n);
    let spacing = vec!["0em 0em"; n].join(" ");
    (align, spacing)
}

fn ams_array_def(parser: &Parser<'_>, align: &str, spacing: &str) -> ArrayDef {
    let config = parser.config();
    ArrayDef {
        column_align: Some(normalize_alignment(align)),
        column_spacing: Some(if spacing.is_empty() {
            "1em".into()
        } else {
            spacing.into()
        }),
        row_spacing: Some("3pt".into()),
        display_style: Some(true),
        side: Some(config.tag_side),
        min_label_spacing: Some(config.tag_indent.clone()),
        ..Default::default()
    }
}

fn begin_ams_array(
    parser: &mut Parser<'_>,
    name: &str,
    def: ArrayDef,
    numbered: bool,
    taggable: bool,
) -> mxl::Result<()> {
    if taggable {
        parser.open_equation_unit()?;
    }
    parser.tags_mut().start(name, taggable, numbered);
    parser.push_frame(Frame::ams_array(
        name,
        Table::new(def).with_tagging(numbered, taggable),
    ));
    Ok(())
}

fn plain_array_def(align: &str) -> ArrayDef {
    ArrayDef {
        column_align: Some(normalize_alignment(align)),
        column_spacing: Some("1em".into()),
        row_spacing: Some("4pt".into()),
        ..Default::default()
    }
}

/// Get the `array` environment: `\begin{array}[valign]{columns}`.
pub fn get_array() -> Environment {
    Environment::new(|parser: &mut Parser<'_>, name: &str| {
        let cs = format!("\\begin{{{name}}}");
        let valign = parser.scanner().optional_argument(&cs, "")?;
        let align = parser.scanner().required_argument(&cs)?;
        let mut def = plain_array_def(&align);
        def.set_vertical_align(&valign);
        parser.push_frame(Frame::array(name, Table::new(def)));
        Ok(())
    })
}

/// Get a matrix environment with the given delimiters; empty strings mean no delimiter.
pub fn get_matrix(open: &'static str, close: &'static str) -> Environment {
    Environment::new(move |parser: &mut Parser<'_>, name: &str| {
        let table = Table::new(plain_array_def("c")).with_fences(open, close);
        parser.push_frame(Frame::array(name, table));
        Ok(())
    })
}

/// Get `\shoveleft` or `\shoveright`, which align the current row of a `multline`.
pub fn get_shove(shove: Shove) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        parser.close_styles();
        parser.stack_mut().top_mut().shove(cs, shove)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base;
    use crate::tagging;
    use mathlang::command;
    use mathlang::config::{Config, Side};
    use mathlang_testing::*;
    use std::collections::HashMap;

    fn built_ins() -> command::Map {
        let commands = HashMap::from([
            ("begin", base::get_begin()),
            ("end", base::get_end()),
            ("\\", base::get_newline()),
            ("displaystyle", base::get_style(true, 0)),
            ("tag", tagging::get_tag()),
            ("notag", tagging::get_notag()),
            ("shoveleft", get_shove(Shove::Left)),
            ("shoveright", get_shove(Shove::Right)),
        ]);
        let environments = HashMap::from([
            ("equation", get_equation(true)),
            ("equation*", get_equation(false)),
            ("multline", get_multline(true)),
            ("multline*", get_multline(false)),
            ("align", get_ams_array(true, true, ALIGN_COLUMNS, ALIGN_SPACING)),
            ("align*", get_ams_array(false, true, ALIGN_COLUMNS, ALIGN_SPACING)),
            ("gather", get_ams_array(true, true, "c", "")),
            ("split", get_ams_array(false, false, "rl", "0em")),
            ("alignat", get_alignat(true, true)),
            ("alignedat", get_alignat(false, false)),
            ("aligned", get_aligned_ams_array(ALIGN_COLUMNS, ALIGN_SPACING)),
            ("gathered", get_aligned_ams_array("c", "")),
            ("array", get_array()),
            ("pmatrix", get_matrix("(", ")")),
        ]);
        command::Map::new(commands, environments)
    }

    fn left_tags() -> Config {
        Config {
            tag_side: Side::Left,
            ..Default::default()
        }
    }

    fn left_tags_options() -> Vec<TestOption> {
        vec![TestOption::BuiltIns(built_ins), TestOption::Config(left_tags)]
    }

    const ALIGN_TABLE: &str = concat!(
        r#"<mtable columnalign="right left right left right left right left right left right left" "#,
        r#"columnspacing="0em 2em 0em 2em 0em 2em 0em 2em 0em 2em 0em" displaystyle="true" "#,
        r#"minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
    );

    const MULTLINE_TABLE: &str = concat!(
        r#"<mtable columnwidth="100%" displaystyle="true" minlabelspacing="0.8em" "#,
        r#"rowspacing=".5em" side="right" width="85%">"#,
    );

    test_suite![
        mathml_tests(
            (
                equation_numbered,
                r"\begin{equation}x\end{equation}",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
            ),
            (equation_star, r"\begin{equation*}x\end{equation*}", "<mi>x</mi>"),
            (
                equation_star_with_tag,
                r"\begin{equation*}x\tag{A}\end{equation*}",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-A"><mtext>(A)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
            ),
            (equation_notag, r"\begin{equation}x\notag\end{equation}", "<mi>x</mi>"),
            (
                align_numbers_every_row,
                r"\begin{align}a&=b\\c&=d\end{align}",
                format!(
                    "{ALIGN_TABLE}{}{}</mtable>",
                    r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>a</mi></mtd><mtd><mo>=</mo><mi>b</mi></mtd></mlabeledtr>"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-2"><mtext>(2)</mtext></mtd><mtd><mi>c</mi></mtd><mtd><mo>=</mo><mi>d</mi></mtd></mlabeledtr>"#,
                )
                .as_str(),
            ),
            (
                align_notag_row,
                r"\begin{align}a\notag\\b\end{align}",
                format!(
                    "{ALIGN_TABLE}{}{}</mtable>",
                    r#"<mtr><mtd><mi>a</mi></mtd></mtr>"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>b</mi></mtd></mlabeledtr>"#,
                )
                .as_str(),
            ),
            (
                align_star_explicit_tag,
                r"\begin{align*}a\\b\tag{*}\end{align*}",
                format!(
                    "{}{}{}</mtable>",
                    ALIGN_TABLE,
                    r#"<mtr><mtd><mi>a</mi></mtd></mtr>"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-*"><mtext>(*)</mtext></mtd><mtd><mi>b</mi></mtd></mlabeledtr>"#,
                )
                .as_str(),
            ),
            (
                align_trailing_newline,
                r"\begin{align*}a\\\end{align*}",
                format!("{ALIGN_TABLE}<mtr><mtd><mi>a</mi></mtd></mtr></mtable>").as_str(),
            ),
            (
                style_closes_at_cell_end,
                r"\begin{align*}\displaystyle a&b\end{align*}",
                format!(
                    "{ALIGN_TABLE}{}</mtable>",
                    r#"<mtr><mtd><mstyle displaystyle="true" scriptlevel="0"><mi>a</mi></mstyle></mtd><mtd><mi>b</mi></mtd></mtr>"#,
                )
                .as_str(),
            ),
            (
                gather,
                r"\begin{gather}x\end{gather}",
                concat!(
                    r#"<mtable columnalign="center" columnspacing="1em" displaystyle="true" "#,
                    r#"minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd></mlabeledtr></mtable>"#,
                ),
            ),
            (
                split_inside_equation,
                r"\begin{equation}\begin{split}a&=b\end{split}\end{equation}",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd>"#,
                    r#"<mtable columnalign="right left" columnspacing="0em" displaystyle="true" "#,
                    r#"minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
                    r#"<mtr><mtd><mi>a</mi></mtd><mtd><mo>=</mo><mi>b</mi></mtd></mtr></mtable>"#,
                    r#"</mtd></mlabeledtr></mtable>"#,
                ),
            ),
            (
                multline_numbered,
                r"\begin{multline}a\\b\\c\end{multline}",
                format!(
                    "{MULTLINE_TABLE}{}{}{}</mtable>",
                    r#"<mtr><mtd columnalign="left"><mi>a</mi></mtd></mtr>"#,
                    r#"<mtr><mtd><mi>b</mi></mtd></mtr>"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd columnalign="right"><mi>c</mi></mtd></mlabeledtr>"#,
                )
                .as_str(),
            ),
            (
                multline_shove,
                r"\begin{multline*}a\\\shoveright b\\\shoveleft c\end{multline*}",
                format!(
                    "{MULTLINE_TABLE}{}{}{}</mtable>",
                    r#"<mtr><mtd columnalign="left"><mi>a</mi></mtd></mtr>"#,
                    r#"<mtr><mtd columnalign="right"><mi>b</mi></mtd></mtr>"#,
                    r#"<mtr><mtd columnalign="left"><mi>c</mi></mtd></mtr>"#,
                )
                .as_str(),
            ),
            (
                multline_single_row,
                r"\begin{multline*}a\end{multline*}",
                format!("{MULTLINE_TABLE}<mtr><mtd><mi>a</mi></mtd></mtr></mtable>").as_str(),
            ),
            (
                alignat,
                r"\begin{alignat}{2}a&b&c&d\end{alignat}",
                concat!(
                    r#"<mtable columnalign="right left right left" columnspacing="0em 0em 0em 0em" "#,
                    r#"displaystyle="true" minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
                    r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>a</mi></mtd>"#,
                    r#"<mtd><mi>b</mi></mtd><mtd><mi>c</mi></mtd><mtd><mi>d</mi></mtd></mlabeledtr></mtable>"#,
                ),
            ),
            (
                alignedat_with_valign,
                r"\begin{alignedat}[b]{1}a&b\end{alignedat}",
                concat!(
                    r#"<mtable align="baseline -1" columnalign="right left" columnspacing="0em 0em" "#,
                    r#"displaystyle="true" minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
                    r#"<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr></mtable>"#,
                ),
            ),
            (
                aligned_with_valign,
                r"\begin{aligned}[t]a\end{aligned}",
                format!(
                    "{}{}",
                    ALIGN_TABLE.replace("<mtable ", r#"<mtable align="baseline 1" "#),
                    "<mtr><mtd><mi>a</mi></mtd></mtr></mtable>",
                )
                .as_str(),
            ),
            (
                gathered,
                r"\begin{gathered}a\\b\end{gathered}",
                concat!(
                    r#"<mtable columnalign="center" columnspacing="1em" displaystyle="true" "#,
                    r#"minlabelspacing="0.8em" rowspacing="3pt" side="right">"#,
                    r#"<mtr><mtd><mi>a</mi></mtd></mtr><mtr><mtd><mi>b</mi></mtd></mtr></mtable>"#,
                ),
            ),
            (
                array,
                r"\begin{array}{lc}a&b\end{array}",
                concat!(
                    r#"<mtable columnalign="left center" columnspacing="1em" rowspacing="4pt">"#,
                    r#"<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr></mtable>"#,
                ),
            ),
            (
                pmatrix,
                r"\begin{pmatrix}a&b\end{pmatrix}",
                concat!(
                    r#"<mrow><mo fence="true" stretchy="true">(</mo>"#,
                    r#"<mtable columnalign="center" columnspacing="1em" rowspacing="4pt">"#,
                    r#"<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr></mtable>"#,
                    r#"<mo fence="true" stretchy="true">)</mo></mrow>"#,
                ),
            ),
            (
                matrix_inside_align,
                r"\begin{align*}\begin{pmatrix}a\end{pmatrix}\end{align*}",
                format!(
                    "{ALIGN_TABLE}<mtr><mtd>{}{}{}</mtd></mtr></mtable>",
                    r#"<mrow><mo fence="true" stretchy="true">(</mo>"#,
                    r#"<mtable columnalign="center" columnspacing="1em" rowspacing="4pt"><mtr><mtd><mi>a</mi></mtd></mtr></mtable>"#,
                    r#"<mo fence="true" stretchy="true">)</mo></mrow>"#,
                )
                .as_str(),
            ),
        ),
        failure_tests(
            (nested_equations, r"\begin{equation}\begin{align}x\end{align}\end{equation}", ErroneousNesting),
            (nested_equation_in_multline, r"\begin{multline}\begin{equation}x\end{equation}\end{multline}", ErroneousNesting),
            (tag_in_split, r"\begin{equation}\begin{split}x\tag{1}\end{split}\end{equation}", TagNotAllowedHere),
            (two_tags_on_one_row, r"\begin{align}x\tag{1}\tag{2}\end{align}", MultipleTag),
            (alignat_zero, r"\begin{alignat}{0}x\end{alignat}", MalformedArgument),
            (alignat_letters, r"\begin{alignat}{x}x\end{alignat}", MalformedArgument),
            (alignat_empty, r"\begin{alignat}{}x\end{alignat}", MalformedArgument),
            (alignat_missing_count, r"\begin{alignat}", MissingArgument),
            (multline_two_columns, r"\begin{multline}a&b\end{multline}", MultlineRowsOneColumn),
            (shove_outside_multline, r"\begin{align}\shoveleft x\end{align}", ShoveOutsideMultiline),
            (shove_not_at_line_start, r"\begin{multline}a\shoveleft b\end{multline}", ShoveNotAtLineStart),
            (unclosed_align, r"\begin{align}x", MissingEnd),
            (tab_in_equation, r"\begin{equation}a&b\end{equation}", MisplacedAlignmentTab),
            (array_without_columns, r"\begin{array}", MissingArgument),
        ),
    ];

    #[test]
    fn multline_tag_on_the_left() {
        run_mathml_test(
            r"\begin{multline}a\\b\end{multline}",
            &format!(
                "{}{}{}</mtable>",
                MULTLINE_TABLE.replace(r#"side="right""#, r#"side="left""#),
                r#"<mlabeledtr><mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd columnalign="left"><mi>a</mi></mtd></mlabeledtr>"#,
                r#"<mtr><mtd columnalign="right"><mi>b</mi></mtd></mtr>"#,
            ),
            &left_tags_options(),
        );
    }

    #[test]
    fn environments_can_follow_each_other() {
        run_mathml_test(
            r"\begin{equation}a\end{equation}\begin{equation*}b\end{equation*}",
            concat!(
                r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                r#"<mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>a</mi></mtd>"#,
                r#"</mlabeledtr></mtable><mi>b</mi>"#,
            ),
            &[TestOption::BuiltIns(built_ins)],
        );
    }

    #[test]
    fn alignat_column_generator() {
        assert_eq!(
            alignat_columns(3),
            (
                "rlrlrl".to_string(),
                "0em 0em 0em 0em 0em 0em".to_string()
            )
        );
        assert_eq!(
            normalize_alignment(&alignat_columns(2).0),
            "right left right left"
        );
        assert_eq!(alignat_columns(0), (String::new(), String::new()));
    }

    #[test]
    fn column_count_parsing() {
        assert_eq!(parse_column_count("\\begin{alignat}", " 12 ").unwrap(), 12);
        assert_eq!(
            parse_column_count("\\begin{alignat}", "-1").unwrap_err().kind(),
            Kind::MalformedArgument
        );
    }

    #[test]
    fn stack_depth_restored_after_environment() {
        let mut document = mathlang::document::Document::new(built_ins(), Default::default());
        let mut parser = Parser::new("{align}{align}", &mut document);
        let depth = parser.stack().depth();
        parser.dispatch("begin").unwrap();
        assert_eq!(parser.stack().depth(), depth + 1);
        parser.dispatch("end").unwrap();
        assert_eq!(parser.stack().depth(), depth);
    }
}
