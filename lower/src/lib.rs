//! Lowering of buffer-semantics operations to runtime ABI calls.
//!
//! This crate rewrites the high-level input operations (custom calls, feed
//! I/O, identity queries, all-reduce) into plain call instructions bound to
//! the fixed `xla.cpu.*` runtime call targets, declaring each callee exactly
//! once per module.
//!
//! # Module Organization
//!
//! - [`declarations`] - Callee declaration registry (get-or-create)
//! - [`layout`] - Canonical-layout normalization of buffer operands
//! - [`holes`] - Placeholder buffers for unmapped custom-call slots
//! - [`runtime`] - The lowering rules and the pass entry point

pub mod declarations;
pub mod error;
pub mod holes;
pub mod layout;
pub mod runtime;


// Re-export the rewrite infrastructure for pass users.
pub use sable_ir::pattern;
pub use sable_ir::rewrite;

pub use declarations::get_or_create_declaration;
pub use error::{Error, Result};
pub use holes::HoleCache;
pub use runtime::{LowerContext, lower_to_runtime_calls, runtime_call_patterns};
