//! A small table of symbols: Greek letters, relations, binary operators and large operators.

use mathlang::command::BuiltIn;
use mathlang::node::{self, Node, TexClass};
use mathlang::parser::Parser;

/// How a symbol is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// An italic identifier.
    Identifier,
    /// An upright identifier, like the capital Greek letters.
    Upright,
    /// An operator with the given class.
    Operator(TexClass),
    /// A large operator whose scripts become limits in display style.
    Limits,
}

pub const SYMBOLS: &[(&str, &str, Shape)] = &[
    ("alpha", "\u{3B1}", Shape::Identifier),
    ("beta", "\u{3B2}", Shape::Identifier),
    ("gamma", "\u{3B3}", Shape::Identifier),
    ("delta", "\u{3B4}", Shape::Identifier),
    ("epsilon", "\u{3F5}", Shape::Identifier),
    ("theta", "\u{3B8}", Shape::Identifier),
    ("lambda", "\u{3BB}", Shape::Identifier),
    ("mu", "\u{3BC}", Shape::Identifier),
    ("pi", "\u{3C0}", Shape::Identifier),
    ("sigma", "\u{3C3}", Shape::Identifier),
    ("phi", "\u{3D5}", Shape::Identifier),
    ("omega", "\u{3C9}", Shape::Identifier),
    ("infty", "\u{221E}", Shape::Identifier),
    ("Gamma", "\u{393}", Shape::Upright),
    ("Delta", "\u{394}", Shape::Upright),
    ("Theta", "\u{398}", Shape::Upright),
    ("Lambda", "\u{39B}", Shape::Upright),
    ("Pi", "\u{3A0}", Shape::Upright),
    ("Sigma", "\u{3A3}", Shape::Upright),
    ("Phi", "\u{3A6}", Shape::Upright),
    ("Omega", "\u{3A9}", Shape::Upright),
    ("int", "\u{222B}", Shape::Operator(TexClass::Op)),
    ("sum", "\u{2211}", Shape::Limits),
    ("prod", "\u{220F}", Shape::Limits),
    ("times", "\u{D7}", Shape::Operator(TexClass::Bin)),
    ("cdot", "\u{22C5}", Shape::Operator(TexClass::Bin)),
    ("pm", "\u{B1}", Shape::Operator(TexClass::Bin)),
    ("le", "\u{2264}", Shape::Operator(TexClass::Rel)),
    ("ge", "\u{2265}", Shape::Operator(TexClass::Rel)),
    ("ne", "\u{2260}", Shape::Operator(TexClass::Rel)),
    ("to", "\u{2192}", Shape::Operator(TexClass::Rel)),
    ("rightarrow", "\u{2192}", Shape::Operator(TexClass::Rel)),
    ("leftarrow", "\u{2190}", Shape::Operator(TexClass::Rel)),
    ("cdots", "\u{22EF}", Shape::Operator(TexClass::Inner)),
    ("ldots", "\u{2026}", Shape::Operator(TexClass::Inner)),
    ("{", "{", Shape::Operator(TexClass::Open)),
    ("}", "}", Shape::Operator(TexClass::Close)),
];

/// Get a command that produces a single symbol.
pub fn get_symbol(text: &'static str, shape: Shape) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, _: &str| parser.push_node(symbol(text, shape)))
}

fn symbol(text: &str, shape: Shape) -> Node {
    match shape {
        Shape::Identifier => Node::token(node::Kind::Mi, text),
        Shape::Upright => Node::token(node::Kind::Mi, text).with_attribute("mathvariant", "normal"),
        Shape::Operator(tex_class) => Node::token(node::Kind::Mo, text).with_tex_class(tex_class),
        Shape::Limits => Node::token(node::Kind::Mo, text)
            .with_tex_class(TexClass::Op)
            .with_property("movesupsub", true)
            .with_property("movablelimits", true),
    }
}
