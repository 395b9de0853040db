//! Placeholder buffers for unmapped custom-call target slots.
//!
//! When a custom call carries a sparse target-argument mapping, target slots
//! not covered by the mapping are filled with a "hole": a zero-length `i8`
//! buffer stack-allocated once per enclosing function, at function entry so it
//! dominates every use.

use std::collections::HashMap;

use smallvec::{SmallVec, smallvec};

use sable_ir::{AttrMap, BufferType, ElemType, FuncId, OpKind, Rewriter, TargetArgMapping, Type, ValueId};

/// The hole type: a zero-length byte buffer.
pub fn hole_type() -> Type {
    Type::Buffer(BufferType::new(&[0], ElemType::I8))
}

/// Per-function cache of the hole placeholder value.
#[derive(Debug, Default)]
pub struct HoleCache {
    per_func: HashMap<FuncId, ValueId>,
}

impl HoleCache {
    /// The hole value for the rewriter's function, allocating it at entry on
    /// first use.
    pub fn hole(&mut self, rw: &mut Rewriter<'_>) -> ValueId {
        if let Some(&hole) = self.per_func.get(&rw.func_id()) {
            return hole;
        }
        let hole = {
            let mut entry = rw.guarded();
            entry.to_entry_start();
            let alloca = entry.create(OpKind::Alloca, &[], &[hole_type()], AttrMap::new());
            entry.func().op(alloca).results[0]
        };
        self.per_func.insert(rw.func_id(), hole);
        hole
    }
}

/// Build the runtime call's operand list from a sparse target mapping.
///
/// The list has `num_args + num_results` entries, every slot initialized to
/// the hole, then overwritten with the mapped source arguments and outputs.
/// Slots covered by neither mapping stay holes.
pub fn expand_with_mapping(
    mapping: &TargetArgMapping,
    args: &[ValueId],
    outputs: &[ValueId],
    hole: ValueId,
) -> SmallVec<[ValueId; 8]> {
    let mut operands: SmallVec<[ValueId; 8]> = smallvec![hole; mapping.num_args + mapping.num_results];
    for (arg, &slot) in args.iter().zip(mapping.args_to_target.iter()) {
        operands[slot] = *arg;
    }
    for (output, &slot) in outputs.iter().zip(mapping.results_to_target.iter()) {
        operands[mapping.num_args + slot] = *output;
    }
    operands
}
