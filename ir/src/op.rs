//! Operation kinds and operation nodes.
//!
//! `OpKind` is a closed variant: the source kinds are the fixed set of
//! buffer-semantics operations this IR accepts, and the emitted kinds are the
//! low-level instructions lowering produces (runtime calls, allocations,
//! copies). Keeping the set closed gives exhaustive-match checking in every
//! consumer.

use smallvec::SmallVec;

use crate::func::ValueId;
use crate::module::DeclId;
use crate::types::AttrMap;

/// Sparse argument/result slot mapping optionally attached to a custom call.
///
/// Both mappings are order-preserving partial functions into the declared
/// target slot counts. Target slots not covered by either mapping are holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetArgMapping {
    /// Total number of target argument slots.
    pub num_args: usize,
    /// Total number of target result slots.
    pub num_results: usize,
    /// Source argument position -> target argument slot.
    pub args_to_target: SmallVec<[usize; 4]>,
    /// Source result position -> target result slot.
    pub results_to_target: SmallVec<[usize; 4]>,
}

/// Kind tag of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpKind {
    /// Opaque external function invocation. Operands are the source arguments
    /// followed by the output buffers; `num_args` records the partition.
    CustomCall {
        num_args: usize,
        target_arg_mapping: Option<TargetArgMapping>,
    },
    /// Data arriving from outside into its buffer operands.
    Infeed,
    /// Data departing to outside from its buffer operands.
    Outfeed,
    /// Query of the executing partition id (one i32 result).
    PartitionId,
    /// Query of the executing replica id (one i32 result).
    ReplicaId,
    /// Cross-device reduction over its buffer operands.
    AllReduce,

    /// Direct call to a declared function.
    Call { callee: DeclId },
    /// Heap allocation of a buffer with the result's declared type.
    Alloc,
    /// Stack allocation at function entry.
    Alloca,
    /// Copy from operand 0 into operand 1.
    Copy,
}

impl OpKind {
    /// Dispatch key for the pattern matcher.
    pub fn key(&self) -> OpKey {
        match self {
            OpKind::CustomCall { .. } => OpKey::CustomCall,
            OpKind::Infeed => OpKey::Infeed,
            OpKind::Outfeed => OpKey::Outfeed,
            OpKind::PartitionId => OpKey::PartitionId,
            OpKind::ReplicaId => OpKey::ReplicaId,
            OpKind::AllReduce => OpKey::AllReduce,
            OpKind::Call { .. } => OpKey::Call,
            OpKind::Alloc => OpKey::Alloc,
            OpKind::Alloca => OpKey::Alloca,
            OpKind::Copy => OpKey::Copy,
        }
    }
}

/// Payload-free discriminant of `OpKind`, used to index patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKey {
    CustomCall,
    Infeed,
    Outfeed,
    PartitionId,
    ReplicaId,
    AllReduce,
    Call,
    Alloc,
    Alloca,
    Copy,
}

/// A single IR operation: kind tag, ordered operands, ordered results, and an
/// attribute map.
///
/// Operations are never mutated in place by rewrites; a lowering replaces the
/// whole node atomically through the rewriter.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub operands: SmallVec<[ValueId; 4]>,
    pub results: SmallVec<[ValueId; 2]>,
    pub attrs: AttrMap,
}
