//! Greedy fixed-point rewriting over a module.

pub mod engine;

pub use engine::apply_patterns_greedily;
