//! Buffer-semantics intermediate representation for the Sable lowering
//! pipeline.
//!
//! This crate defines the IR data structures and the rewrite infrastructure
//! used by the lowering passes.
//!
//! # Module Organization
//!
//! - [`types`] - Element kinds, strided layouts, buffer types, attributes
//! - [`op`] - Operation kinds and operation nodes
//! - [`func`] - Functions (value arena + instruction schedule)
//! - [`module`] - Compilation unit and symbol table
//! - [`rewriter`] - Mutation surface with a scoped insertion cursor
//! - [`pattern`] - Rule matcher with per-kind dispatch
//! - [`rewrite`] - Greedy fixed-point driver
//! - [`error`] - Error types and result handling

pub mod error;
pub mod func;
pub mod module;
pub mod op;
pub mod pattern;
pub mod rewrite;
pub mod rewriter;
pub mod types;


pub use error::{Error, Result};
pub use func::{Func, OpId, ValueId};
pub use module::{DeclId, FuncDecl, FuncId, Module, SymbolTable};
pub use op::{OpKey, OpKind, Operation, TargetArgMapping};
pub use pattern::{PatternClosure, PatternMatcher, RewriteResult};
pub use rewrite::apply_patterns_greedily;
pub use rewriter::{InsertPoint, InsertionGuard, Rewriter};
pub use types::{Attr, AttrMap, BufferType, ElemType, Layout, Shape, Type, row_major_strides};
