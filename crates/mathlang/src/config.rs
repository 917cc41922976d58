//! Document configuration.

/// Which equations are numbered automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Numbering {
    /// Only explicit `\tag`s are shown.
    None,
    /// Numbered environments (`equation`, `align`, ...) are numbered automatically.
    #[default]
    Ams,
    /// Additionally, every display equation outside a numbered environment is numbered.
    All,
}

/// Side of the equation on which tags are placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub numbering: Numbering,
    pub tag_side: Side,
    /// Minimum space between the tag and the equation.
    pub tag_indent: String,
    /// Width of the `multline` environment.
    pub multline_width: String,
    /// Build anchor ids from labels instead of tag text when a label is present.
    pub use_label_ids: bool,
    /// Prefix of the links produced by `\ref` and `\eqref`.
    pub base_url: String,
    /// Start in the reference pass: `\label` does not register labels.
    pub reference_pass: bool,
    /// Value of the equation counter at the start of the document.
    pub counter_offset: u32,
    /// Maximum number of textual substitutions while parsing one equation.
    pub max_macros: usize,
    /// Maximum size in bytes of a buffer after a textual substitution.
    pub max_buffer: usize,
    /// Maximum depth of nested parsers, as opened for arguments.
    pub max_nesting: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            numbering: Numbering::Ams,
            tag_side: Side::Right,
            tag_indent: "0.8em".into(),
            multline_width: "85%".into(),
            use_label_ids: true,
            base_url: String::new(),
            reference_pass: false,
            counter_offset: 0,
            max_macros: 10000,
            max_buffer: 5 * 1024,
            max_nesting: 100,
        }
    }
}
