// File: src/core/mod.rs

pub mod engine;
pub mod loader;
pub mod location;
pub mod parser;
pub mod phonemizer;
pub mod post;
pub mod registry;
pub mod result;
pub(crate) mod rules;
pub mod symbols;
pub mod word;
