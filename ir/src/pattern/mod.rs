//! Pattern matching infrastructure for lowering rules.
//!
//! Rules are closures that inspect one operation through the rewriter and
//! either decline (`NoMatch`) or replace it (`Rewritten`). The matcher indexes
//! rules by `OpKey` for O(1) dispatch.

pub mod matcher;

pub use matcher::{PatternClosure, PatternMatcher};

/// Result of applying a lowering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteResult {
    /// Rule didn't match or declined to rewrite. Not an error: the operation
    /// is left for another stage.
    NoMatch,
    /// Rule matched and replaced the operation.
    Rewritten,
}
