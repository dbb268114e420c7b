//! Operator vocabulary for latree
//!
//! This crate holds the static configuration the tree builder consults: the
//! operator registry (symbol to precedence, commutativity and unary alternate)
//! and the bracket families that form groups.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod delimiter;
pub mod operator;
pub mod registry;

// Re-export the main types for convenience
pub use delimiter::{Delimiter, DelimiterKind, DelimiterStyle};
pub use operator::{Associativity, Operator, Symbol, Unary};
pub use registry::{Registry, RegistryBuilder, RegistryError};
