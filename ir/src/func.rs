//! Functions: a value arena plus an ordered instruction schedule.
//!
//! A function owns every value and operation inside it. Operations live in an
//! append-only arena; the `schedule` vector gives the order of the live
//! instructions in the single entry block. Erasing an operation removes it
//! from the schedule only, so `OpId`s stay stable.

use smallvec::SmallVec;

use crate::op::{OpKey, OpKind, Operation};
use crate::types::{AttrMap, Type};

/// Identity of a value within its enclosing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub u32);

/// Identity of an operation within its enclosing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpId(pub u32);

/// A function with a single entry block.
#[derive(Debug, Clone, Default)]
pub struct Func {
    name: String,
    args: SmallVec<[ValueId; 4]>,
    values: Vec<Type>,
    ops: Vec<Operation>,
    schedule: Vec<OpId>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a function argument value.
    pub fn add_arg(&mut self, ty: Type) -> ValueId {
        let value = self.new_value(ty);
        self.args.push(value);
        value
    }

    pub fn args(&self) -> &[ValueId] {
        &self.args
    }

    /// Create a fresh value of the given type.
    pub fn new_value(&mut self, ty: Type) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ty);
        id
    }

    pub fn value_type(&self, value: ValueId) -> &Type {
        &self.values[value.0 as usize]
    }

    /// Append an operation at the end of the schedule, creating one result
    /// value per entry of `result_types`.
    pub fn push_op(&mut self, kind: OpKind, operands: &[ValueId], result_types: &[Type], attrs: AttrMap) -> OpId {
        self.insert_op(self.schedule.len(), kind, operands, result_types, attrs)
    }

    /// Insert an operation at schedule position `at`.
    pub fn insert_op(
        &mut self,
        at: usize,
        kind: OpKind,
        operands: &[ValueId],
        result_types: &[Type],
        attrs: AttrMap,
    ) -> OpId {
        let results = result_types.iter().map(|ty| self.new_value(ty.clone())).collect();
        let id = OpId(self.ops.len() as u32);
        self.ops.push(Operation { kind, operands: SmallVec::from_slice(operands), results, attrs });
        self.schedule.insert(at, id);
        id
    }

    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id.0 as usize]
    }

    /// Live instructions in execution order.
    pub fn schedule(&self) -> &[OpId] {
        &self.schedule
    }

    /// Schedule position of a live operation.
    pub fn position(&self, op: OpId) -> Option<usize> {
        self.schedule.iter().position(|&id| id == op)
    }

    pub fn is_live(&self, op: OpId) -> bool {
        self.schedule.contains(&op)
    }

    /// Remove an operation from the schedule. Its id stays valid but it is no
    /// longer part of the function body.
    pub fn erase(&mut self, op: OpId) {
        self.schedule.retain(|&id| id != op);
    }

    /// Redirect every operand use of `old` to `new` across the live schedule.
    pub fn replace_all_uses(&mut self, old: ValueId, new: ValueId) {
        for &id in &self.schedule {
            for operand in &mut self.ops[id.0 as usize].operands {
                if *operand == old {
                    *operand = new;
                }
            }
        }
    }

    /// Live operations of one kind, in schedule order.
    pub fn ops_with_key(&self, key: OpKey) -> impl Iterator<Item = OpId> + '_ {
        self.schedule.iter().copied().filter(move |&id| self.op(id).kind.key() == key)
    }
}
