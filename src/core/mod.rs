//! Format-neutral data model shared by the parser, converter and renderer.

pub mod ast;
pub mod document;
pub mod style;
pub mod units;
