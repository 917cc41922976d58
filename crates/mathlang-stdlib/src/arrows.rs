//! Extensible arrows like `\xrightarrow[below]{above}`

use mathlang::command::BuiltIn;
use mathlang::node::{self, slot, Node, TexClass};
use mathlang::parser::Parser;

/// Get an extensible arrow.
///
/// `left` and `right` are the extra space, in mu, on either side of the text.
pub fn get_x_arrow(arrow: &'static str, left: u32, right: u32) -> BuiltIn {
    BuiltIn::new(move |parser: &mut Parser<'_>, cs: &str| {
        let width = format!("+{}mu", left + right);
        let lspace = format!("{left}mu");
        let padded = |content: Node, voffset: &str| {
            Node::create(
                node::Kind::Mpadded,
                vec![content],
                &[
                    ("width", width.as_str()),
                    ("lspace", lspace.as_str()),
                    ("voffset", voffset),
                ],
            )
        };
        let bottom = parser.scanner().optional_argument(cs, "")?;
        let top = parser.parse_argument(cs)?;
        let operator = Node::token(node::Kind::Mo, arrow)
            .with_attribute("stretchy", "true")
            .with_tex_class(TexClass::Rel);
        let mut composite = Node::scripted(node::Kind::Munderover, operator);
        composite.set_data(slot::OVER, padded(top, ".15em"));
        if !bottom.is_empty() {
            let bottom = parser.parse_source(&bottom)?;
            composite.set_data(slot::UNDER, padded(bottom, "-.24em"));
        }
        composite.set_property("subsupOK", true);
        parser.push_node(composite)
    })
}
