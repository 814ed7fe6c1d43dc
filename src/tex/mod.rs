//! Conversion of the TeX subset used by formula tokens into display text.

mod lexer;
mod plain;

pub use plain::to_plain;
