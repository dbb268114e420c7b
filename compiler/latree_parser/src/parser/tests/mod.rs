//! Tests for the parser module



// Builder configuration and custom registries
mod configuration;
