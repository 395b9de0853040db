//! Rewriter: the mutation surface lowering rules use.
//!
//! A `Rewriter` borrows one function and the module symbol table and keeps an
//! insertion point into the function schedule. The insertion point is an
//! anchor (insert before a given op, or at the end), so instructions created
//! elsewhere in the function never shift it.
//!
//! `InsertionGuard` saves the insertion point and restores it when dropped,
//! on all paths. This is how a lowering can prepend an allocation at function
//! entry from deep inside a rewrite without disturbing its own cursor.

use std::ops::{Deref, DerefMut};

use crate::func::{Func, OpId, ValueId};
use crate::module::{FuncId, SymbolTable};
use crate::op::OpKind;
use crate::types::{AttrMap, Type};

/// Where newly created operations land in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// Immediately before the given live operation.
    Before(OpId),
    /// At the end of the schedule.
    End,
}

pub struct Rewriter<'m> {
    symbols: &'m mut SymbolTable,
    func: &'m mut Func,
    func_id: FuncId,
    insert: InsertPoint,
}

impl<'m> Rewriter<'m> {
    pub fn new(symbols: &'m mut SymbolTable, func: &'m mut Func, func_id: FuncId) -> Self {
        Self { symbols, func, func_id, insert: InsertPoint::End }
    }

    pub fn func(&self) -> &Func {
        self.func
    }

    pub fn func_mut(&mut self) -> &mut Func {
        self.func
    }

    pub fn func_id(&self) -> FuncId {
        self.func_id
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        self.symbols
    }

    pub fn insertion_point(&self) -> InsertPoint {
        self.insert
    }

    pub fn set_insertion_point(&mut self, point: InsertPoint) {
        self.insert = point;
    }

    /// Insert subsequent operations immediately before `op`.
    pub fn set_insertion_before(&mut self, op: OpId) {
        self.insert = InsertPoint::Before(op);
    }

    /// Insert subsequent operations at the start of the entry block.
    pub fn to_entry_start(&mut self) {
        self.insert = match self.func.schedule().first() {
            Some(&first) => InsertPoint::Before(first),
            None => InsertPoint::End,
        };
    }

    /// Save the insertion point; it is restored when the guard drops.
    pub fn guarded(&mut self) -> InsertionGuard<'_, 'm> {
        let saved = self.insert;
        InsertionGuard { rw: self, saved }
    }

    /// Create an operation at the insertion point, with one fresh result value
    /// per entry of `result_types`.
    pub fn create(&mut self, kind: OpKind, operands: &[ValueId], result_types: &[Type], attrs: AttrMap) -> OpId {
        let at = match self.insert {
            InsertPoint::Before(anchor) => self.func.position(anchor).unwrap_or(self.func.schedule().len()),
            InsertPoint::End => self.func.schedule().len(),
        };
        self.func.insert_op(at, kind, operands, result_types, attrs)
    }

    /// Remove `op` from the schedule. If it anchors the insertion point, the
    /// anchor moves to the operation after it.
    pub fn erase(&mut self, op: OpId) {
        if let InsertPoint::Before(anchor) = self.insert
            && anchor == op
        {
            let next = self.func.position(op).and_then(|at| self.func.schedule().get(at + 1).copied());
            self.insert = match next {
                Some(id) => InsertPoint::Before(id),
                None => InsertPoint::End,
            };
        }
        self.func.erase(op);
    }

    /// Atomically replace `op`: create the replacement right before it,
    /// redirect all uses of its results to the replacement's results, and
    /// erase it.
    pub fn replace_with(
        &mut self,
        op: OpId,
        kind: OpKind,
        operands: &[ValueId],
        result_types: &[Type],
        attrs: AttrMap,
    ) -> OpId {
        self.set_insertion_before(op);
        let replacement = self.create(kind, operands, result_types, attrs);
        let old_results = self.func.op(op).results.clone();
        let new_results = self.func.op(replacement).results.clone();
        debug_assert!(old_results.len() == new_results.len(), "replacement result arity mismatch");
        for (&old, &new) in old_results.iter().zip(new_results.iter()) {
            self.func.replace_all_uses(old, new);
        }
        self.erase(op);
        replacement
    }
}

/// RAII guard restoring the rewriter's insertion point on drop.
pub struct InsertionGuard<'a, 'm> {
    rw: &'a mut Rewriter<'m>,
    saved: InsertPoint,
}

impl<'m> Deref for InsertionGuard<'_, 'm> {
    type Target = Rewriter<'m>;

    fn deref(&self) -> &Self::Target {
        self.rw
    }
}

impl DerefMut for InsertionGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.rw
    }
}

impl Drop for InsertionGuard<'_, '_> {
    fn drop(&mut self) {
        self.rw.insert = self.saved;
    }
}
