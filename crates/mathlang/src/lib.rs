//! # Mathlang: a TeX math-mode parser.
//!
//! This crate implements the structural engine of a TeX math-mode parser.
//! It converts math markup into an expression tree ([node::Node]) while keeping
//!     track of document-wide equation numbering and cross-references.
//!
//! The engine knows nothing about individual commands.
//! Commands and environments are provided as a [command::Map] of built-ins;
//!     the `mathlang-stdlib` crate contains the standard set.
//!
//! The main entry point is the [document::Document] type:
//!
//! ```
//! use mathlang::command;
//! use mathlang::config::Config;
//! use mathlang::document::{Document, Mode};
//! use std::collections::HashMap;
//!
//! let mut document = Document::new(command::Map::new(HashMap::new(), HashMap::new()), Config::default());
//! let math = document.parse("x+1", Mode::Display).unwrap();
//! assert_eq!(
//!     math.to_string(),
//!     r#"<math display="block"><mi>x</mi><mo>+</mo><mn>1</mn></math>"#,
//! );
//! ```

pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod node;
pub mod parser;
pub mod prelude;
pub mod scanner;
pub mod stack;
pub mod tags;
pub mod texmacro;
