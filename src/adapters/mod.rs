//! Source-format adapters producing the block AST.

pub mod markdown;
