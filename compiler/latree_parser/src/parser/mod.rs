// Tree builder for latree formulas: marker scanning with nom, an index arena
// for the tree under construction, and the single-pass builder on top.

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod scan;
pub mod test_utils;
pub mod tree;

pub use builder::{build, build_with, TreeBuilder};
pub use config::{BuilderConfig, EqualPrecedence};
pub use diagnostics::{render_snippet, Diagnostic, Severity};
pub use error::{ErrorKind, ParseError};

#[cfg(test)]
mod tests;
