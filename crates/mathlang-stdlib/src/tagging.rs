//! Equation tags, labels and references

use mathlang::command::BuiltIn;
use mathlang::node::{self, Node};
use mathlang::parser::Parser;

pub const TAG_DOC: &str = "Tag the current equation or row; the starred form is not put in parentheses";
pub const NOTAG_DOC: &str = "Suppress the tag of the current equation or row";
pub const LABEL_DOC: &str = "Label the current equation or row for use with \\ref and \\eqref";

/// Get the `\tag` command.
pub fn get_tag() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let star = parser.scanner().star();
        let tag = parser.scanner().required_argument(cs)?;
        parser.tags_mut().tag(cs, tag.trim(), star)
    })
    .with_doc(TAG_DOC)
}

/// Get the `\notag` command, which is also `\nonumber`.
pub fn get_notag() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, _: &str| {
        parser.tags_mut().notag();
        Ok(())
    })
    .with_doc(NOTAG_DOC)
}

/// Get the `\label` command.
pub fn get_label() -> BuiltIn {
    BuiltIn::new(|parser: &mut Parser<'_>, cs: &str| {
        let name = parser.scanner().required_argument(cs)?;
        parser.tags_mut().label(cs, name.trim())
    })
    .with_doc(LABEL_DOC)
}

/// Get the `\ref` command (`eqref = false`) or the `\eqref` command (`eqref = true`).
///
/// References to labels that are not defined yet show `???`.
pub fn get_ref(eqref: bool) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let name = parser.scanner().required_argument(cs)?;
        let label = parser.tags_mut().reference(name.trim());
        let text = if eqref {
            parser.tags().format_tag(&label.tag)
        } else {
            label.tag
        };
        let href = parser.tags().format_url(&label.id);
        parser.push_node(Node::create(
            node::Kind::Mrow,
            vec![Node::token(node::Kind::Mtext, text)],
            &[("href", href.as_str()), ("class", "MathJax_ref")],
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base;
    use crate::environments;
    use mathlang::command;
    use mathlang::config::{Config, Numbering};
    use mathlang::document::{Document, Mode};
    use mathlang::error::Kind;
    use mathlang::tags::TagFormat;
    use mathlang_testing::*;
    use std::collections::HashMap;

    fn built_ins() -> command::Map {
        let commands = HashMap::from([
            ("begin", base::get_begin()),
            ("end", base::get_end()),
            ("\\", base::get_newline()),
            ("tag", get_tag()),
            ("notag", get_notag()),
            ("nonumber", get_notag()),
            ("label", get_label()),
            ("ref", get_ref(false)),
            ("eqref", get_ref(true)),
        ]);
        let environments = HashMap::from([
            ("equation", environments::get_equation(true)),
            (
                "align",
                environments::get_ams_array(
                    true,
                    true,
                    environments::ALIGN_COLUMNS,
                    environments::ALIGN_SPACING,
                ),
            ),
        ]);
        command::Map::new(commands, environments)
    }

    fn numbering_all() -> Config {
        Config {
            numbering: Numbering::All,
            ..Default::default()
        }
    }

    fn numbering_none() -> Config {
        Config {
            numbering: Numbering::None,
            ..Default::default()
        }
    }

    fn base_url() -> Config {
        Config {
            base_url: "page.html".into(),
            ..Default::default()
        }
    }

    const EQUATION_1_LABEL_A: &str = concat!(
        r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
        r#"<mtd id="mjx-eqn-a"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
        r#"</mlabeledtr></mtable>"#,
    );

    test_suite![
        mathml_tests(
            (
                root_tag,
                r"x\tag{1.a}",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-1.a"><mtext>(1.a)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
            ),
            (
                starred_tag,
                r"x\tag*{A}",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-A"><mtext>A</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
            ),
            (
                tag_id_whitespace,
                r"x\tag{ a b }",
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-a_b"><mtext>(a b)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
            ),
            (
                label_gives_anchor,
                r"\begin{equation}x\label{a}\end{equation}",
                EQUATION_1_LABEL_A
            ),
            (
                ref_in_same_equation,
                r"\begin{equation}x\label{a}\end{equation}\ref{a}",
                format!(
                    "{EQUATION_1_LABEL_A}{}",
                    r##"<mrow class="MathJax_ref" href="#mjx-eqn-a"><mtext>1</mtext></mrow>"##,
                )
                .as_str(),
            ),
            (
                eqref_in_same_equation,
                r"\begin{equation}x\label{a}\end{equation}\eqref{a}",
                format!(
                    "{EQUATION_1_LABEL_A}{}",
                    r##"<mrow class="MathJax_ref" href="#mjx-eqn-a"><mtext>(1)</mtext></mrow>"##,
                )
                .as_str(),
            ),
            (
                undefined_reference,
                r"\ref{nowhere}",
                r##"<mrow class="MathJax_ref" href="#"><mtext>???</mtext></mrow>"##
            ),
            (empty_label_is_ignored, r"x\label{}\label{}", "<mi>x</mi>"),
            (
                nonumber_in_align,
                r"\begin{align}a\nonumber\end{align}",
                concat!(
                    r#"<mtable columnalign="right left right left right left right left right left right left" "#,
                    r#"columnspacing="0em 2em 0em 2em 0em 2em 0em 2em 0em 2em 0em" displaystyle="true" "#,
                    r#"minlabelspacing="0.8em" rowspacing="3pt" side="right"><mtr><mtd><mi>a</mi></mtd></mtr></mtable>"#,
                ),
            ),
            (notag_after_tag, r"\begin{equation}x\tag{A}\notag\end{equation}", "<mi>x</mi>"),
            (tag_after_notag, r"\begin{equation}x\notag\tag{A}\end{equation}", "<mi>x</mi>"),
        ),
        failure_tests(
            (multiple_tags, r"x\tag{1}\tag{2}", MultipleTag),
            (multiple_labels, r"x\label{a}\label{b}", MultipleLabel),
            (duplicate_label_in_equation, r"\begin{align}a\label{x}\\b\label{x}\end{align}", DuplicateLabel),
            (tag_without_argument, r"x\tag", MissingArgument),
        ),
        document_tests(
            (
                numbers_continue_across_equations,
                [r"\begin{equation}a\end{equation}", r"\begin{equation}b\end{equation}"],
                [
                    concat!(
                        r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                        r#"<mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>a</mi></mtd></mlabeledtr></mtable>"#,
                    ),
                    concat!(
                        r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                        r#"<mtd id="mjx-eqn-2"><mtext>(2)</mtext></mtd><mtd><mi>b</mi></mtd></mlabeledtr></mtable>"#,
                    ),
                ]
            ),
            (
                forward_reference,
                [r"\eqref{later}", r"\begin{equation}x\label{later}\end{equation}"],
                [
                    r##"<mrow class="MathJax_ref" href="#mjx-eqn-later"><mtext>(1)</mtext></mrow>"##,
                    concat!(
                        r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                        r#"<mtd id="mjx-eqn-later"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                        r#"</mlabeledtr></mtable>"#,
                    ),
                ]
            ),
            (
                backward_reference,
                [r"\begin{equation}x\label{a}\end{equation}", r"\ref{a}"],
                [
                    EQUATION_1_LABEL_A,
                    r##"<mrow class="MathJax_ref" href="#mjx-eqn-a"><mtext>1</mtext></mrow>"##,
                ]
            ),
        ),
    ];

    #[test]
    fn numbering_all_numbers_plain_display_equations() {
        let options = [TestOption::BuiltIns(built_ins), TestOption::Config(numbering_all)];
        run_mathml_test(
            "x",
            concat!(
                r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                r#"<mtd id="mjx-eqn-1"><mtext>(1)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                r#"</mlabeledtr></mtable>"#,
            ),
            &options,
        );
        run_mathml_test(r"x\notag", "<mi>x</mi>", &options);
    }

    #[test]
    fn numbering_all_skips_inline_equations() {
        run_mathml_test(
            "x",
            "<mi>x</mi>",
            &[
                TestOption::BuiltIns(built_ins),
                TestOption::Config(numbering_all),
                TestOption::Mode(Mode::Inline),
            ],
        );
    }

    #[test]
    fn numbering_none_keeps_explicit_tags() {
        let options = [TestOption::BuiltIns(built_ins), TestOption::Config(numbering_none)];
        run_mathml_test(r"\begin{equation}x\end{equation}", "<mi>x</mi>", &options);
        run_mathml_test(
            r"\begin{equation}x\tag{A}\end{equation}",
            concat!(
                r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                r#"<mtd id="mjx-eqn-A"><mtext>(A)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                r#"</mlabeledtr></mtable>"#,
            ),
            &options,
        );
    }

    #[test]
    fn reference_urls_use_the_base_url() {
        run_document_test(
            &[r"x\tag{A}\label{my eq}", r"\ref{my eq}"],
            &[
                concat!(
                    r#"<mtable displaystyle="true" minlabelspacing="0.8em" side="right"><mlabeledtr>"#,
                    r#"<mtd id="mjx-eqn-my_eq"><mtext>(A)</mtext></mtd><mtd><mi>x</mi></mtd>"#,
                    r#"</mlabeledtr></mtable>"#,
                ),
                r#"<mrow class="MathJax_ref" href="page.html#mjx-eqn-my_eq"><mtext>A</mtext></mrow>"#,
            ],
            &[TestOption::BuiltIns(built_ins), TestOption::Config(base_url)],
        );
    }

    #[test]
    fn duplicate_label_across_equations() {
        let mut document = Document::new(built_ins(), Default::default());
        document
            .parse(r"\begin{equation}x\label{a}\end{equation}", Mode::Display)
            .unwrap();
        let err = document
            .parse(r"\begin{equation}y\label{a}\end{equation}", Mode::Display)
            .unwrap_err();
        assert_eq!(err.kind(), Kind::DuplicateLabel);
        assert_eq!(err.command(), Some("\\label"));
    }

    #[test]
    fn reference_pass_allows_labels_again() {
        let mut document = Document::new(built_ins(), Default::default());
        let sources = [
            (r"\ref{b}", Mode::Inline),
            (r"\begin{equation}x\label{b}\end{equation}", Mode::Display),
        ];
        let results = document.typeset(&sources);
        assert!(results.iter().all(Result::is_ok));
        assert!(document.tags().is_reference_pass());
        assert_eq!(document.tags().counter(), 1);
    }

    #[test]
    fn failed_equation_does_not_consume_numbers() {
        let mut document = Document::new(built_ins(), Default::default());
        let err = document
            .parse(r"\begin{equation}x\label{a}\end{equation}\tag{1}\tag{2}", Mode::Display)
            .unwrap_err();
        assert_eq!(err.kind(), Kind::MultipleTag);
        let math = document
            .parse(r"\begin{equation}x\label{a}\end{equation}", Mode::Display)
            .unwrap();
        assert_eq!(
            math.to_string(),
            format!(r#"<math display="block">{EQUATION_1_LABEL_A}</math>"#)
        );
    }

    struct RomanFormat;

    impl TagFormat for RomanFormat {
        fn format_number(&self, n: u32) -> String {
            ["0", "i", "ii", "iii"].get(n as usize).copied().unwrap_or("?").to_string()
        }

        fn format_tag(&self, tag: &str) -> String {
            format!("[{tag}]")
        }
    }

    #[test]
    fn custom_tag_format() {
        let mut document = Document::new(built_ins(), Default::default());
        document.set_format(Box::new(RomanFormat));
        let results = document.typeset(&[
            (r"\begin{equation}x\end{equation}", Mode::Display),
            (r"\begin{equation}y\label{b}\end{equation}", Mode::Display),
            (r"\eqref{b}", Mode::Inline),
        ]);
        let texts: Vec<String> = results
            .iter()
            .map(|result| result.as_ref().map(|math| math.text_content()).unwrap_or_default())
            .collect();
        assert_eq!(texts, vec!["[i]x", "[ii]y", "[ii]"]);
    }
}
