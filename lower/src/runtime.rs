//! Lowering rules: one per input operation kind, plus the pass entry point.
//!
//! Each rule assembles operands according to its operation's calling
//! convention, declares the callee through the registry, and replaces the
//! matched operation with a single call instruction:
//!
//! | Kind        | Callee                  | Operands                 |
//! |-------------|-------------------------|--------------------------|
//! | CustomCall  | `xla.cpu.custom_call`   | hole-expanded            |
//! | Infeed      | `xla.cpu.infeed`        | passthrough              |
//! | Outfeed     | `xla.cpu.outfeed`       | passthrough              |
//! | PartitionId | `xla.cpu.partition_id`  | none, one i32 result     |
//! | ReplicaId   | `xla.cpu.replica_id`    | none, one i32 result     |
//! | AllReduce   | `xla.cpu.all_reduce`    | layout-normalized        |
//!
//! All emitted calls except the two id queries have no results: outputs are
//! communicated through buffer operands.

use smallvec::SmallVec;

use sable_ir::{
    Attr, AttrMap, ElemType, Module, OpId, OpKey, OpKind, PatternMatcher, RewriteResult, Rewriter, Type, ValueId,
    apply_patterns_greedily,
};
use snafu::ResultExt;

use crate::declarations::get_or_create_declaration;
use crate::error::{LoweringSnafu, Result};
use crate::holes::{HoleCache, expand_with_mapping};
use crate::layout::normalized_operand;

pub const CUSTOM_CALL_TARGET: &str = "xla.cpu.custom_call";
pub const INFEED_TARGET: &str = "xla.cpu.infeed";
pub const OUTFEED_TARGET: &str = "xla.cpu.outfeed";
pub const PARTITION_ID_TARGET: &str = "xla.cpu.partition_id";
pub const REPLICA_ID_TARGET: &str = "xla.cpu.replica_id";
pub const ALL_REDUCE_TARGET: &str = "xla.cpu.all_reduce";

/// Shared state of one lowering run.
#[derive(Debug, Default)]
pub struct LowerContext {
    pub holes: HoleCache,
}

/// Types of a value list, in order.
fn value_types(rw: &Rewriter<'_>, values: &[ValueId]) -> Vec<Type> {
    values.iter().map(|&value| rw.func().value_type(value).clone()).collect()
}

fn lower_custom_call(rw: &mut Rewriter<'_>, op: OpId, ctx: &mut LowerContext) -> RewriteResult {
    let (num_args, mapping, source_operands, api_version, call_target_name) = {
        let operation = rw.func().op(op);
        let OpKind::CustomCall { num_args, target_arg_mapping } = &operation.kind else {
            return RewriteResult::NoMatch;
        };
        (
            *num_args,
            target_arg_mapping.clone(),
            operation.operands.clone(),
            operation.attrs.get("api_version").cloned(),
            operation.attrs.get("call_target_name").cloned(),
        )
    };

    // By default all operands are passed to the call handler, and the number
    // of results is read from the operand partition.
    let (operands, num_results): (SmallVec<[ValueId; 8]>, usize) = match &mapping {
        None => (SmallVec::from_slice(&source_operands), source_operands.len() - num_args),
        Some(mapping) => {
            let hole = ctx.holes.hole(rw);
            let (args, outputs) = source_operands.split_at(num_args);
            (expand_with_mapping(mapping, args, outputs, hole), mapping.num_results)
        }
    };

    let params = value_types(rw, &operands);
    let callee = get_or_create_declaration(rw.symbols_mut(), CUSTOM_CALL_TARGET, params, vec![]);

    let mut attrs = AttrMap::new();
    attrs.insert("num_results".to_owned(), Attr::I32(num_results as i32));
    if let Some(api_version) = api_version {
        attrs.insert("api_version".to_owned(), api_version);
    }
    if let Some(call_target_name) = call_target_name {
        attrs.insert("call_target_name".to_owned(), call_target_name);
    }

    rw.replace_with(op, OpKind::Call { callee }, &operands, &[], attrs);
    tracing::debug!(callee = CUSTOM_CALL_TARGET, "lowered custom call");
    RewriteResult::Rewritten
}

/// Shared lowering for the feed ops: all operands pass straight through.
fn lower_xfeed(rw: &mut Rewriter<'_>, op: OpId, _ctx: &mut LowerContext) -> RewriteResult {
    let (target, operands) = {
        let operation = rw.func().op(op);
        let target = match operation.kind {
            OpKind::Infeed => INFEED_TARGET,
            OpKind::Outfeed => OUTFEED_TARGET,
            _ => return RewriteResult::NoMatch,
        };
        (target, operation.operands.clone())
    };

    let params = value_types(rw, &operands);
    let callee = get_or_create_declaration(rw.symbols_mut(), target, params, vec![]);
    rw.replace_with(op, OpKind::Call { callee }, &operands, &[], AttrMap::new());
    tracing::debug!(callee = target, "lowered feed op");
    RewriteResult::Rewritten
}

/// Shared lowering for the identity queries: no operands, one i32 result.
fn lower_id_op(rw: &mut Rewriter<'_>, op: OpId, target: &str) -> RewriteResult {
    let result_type = Type::Scalar(ElemType::I32);
    let callee = get_or_create_declaration(rw.symbols_mut(), target, vec![], vec![result_type.clone()]);
    rw.replace_with(op, OpKind::Call { callee }, &[], std::slice::from_ref(&result_type), AttrMap::new());
    tracing::debug!(callee = target, "lowered id query");
    RewriteResult::Rewritten
}

fn lower_all_reduce(rw: &mut Rewriter<'_>, op: OpId, _ctx: &mut LowerContext) -> RewriteResult {
    let (source_operands, source_attrs) = {
        let operation = rw.func().op(op);
        if !matches!(operation.kind, OpKind::AllReduce) {
            return RewriteResult::NoMatch;
        }
        // Guard, not an error: operations whose first operand is not a buffer
        // belong to a different lowering path.
        match operation.operands.first() {
            Some(&first) if rw.func().value_type(first).is_buffer() => {}
            _ => return RewriteResult::NoMatch,
        }
        (operation.operands.clone(), operation.attrs.clone())
    };

    // The runtime can't deal with strided views; copy anything that doesn't
    // have the canonical layout.
    let mut operands: SmallVec<[ValueId; 4]> = SmallVec::with_capacity(source_operands.len());
    let mut params = Vec::with_capacity(source_operands.len());
    for operand in source_operands {
        let (operand, ty) = normalized_operand(rw, operand);
        operands.push(operand);
        params.push(ty);
    }

    let callee = get_or_create_declaration(rw.symbols_mut(), ALL_REDUCE_TARGET, params, vec![]);

    // Defaults first; attributes copied verbatim from the source operation
    // overwrite them.
    let mut attrs = AttrMap::new();
    attrs.insert("use_global_device_ids".to_owned(), Attr::I32(0));
    attrs.insert("op_id".to_owned(), Attr::I64(0));
    for (name, value) in source_attrs {
        attrs.insert(name, value);
    }

    rw.replace_with(op, OpKind::Call { callee }, &operands, &[], attrs);
    tracing::debug!(callee = ALL_REDUCE_TARGET, "lowered all-reduce");
    RewriteResult::Rewritten
}

/// The full rule set of the runtime-call lowering.
pub fn runtime_call_patterns() -> PatternMatcher<LowerContext> {
    let mut matcher = PatternMatcher::new();
    matcher.add(&[OpKey::CustomCall], lower_custom_call);
    matcher.add(&[OpKey::Infeed, OpKey::Outfeed], lower_xfeed);
    matcher.add(&[OpKey::PartitionId], |rw: &mut Rewriter<'_>, op: OpId, _: &mut LowerContext| {
        lower_id_op(rw, op, PARTITION_ID_TARGET)
    });
    matcher.add(&[OpKey::ReplicaId], |rw: &mut Rewriter<'_>, op: OpId, _: &mut LowerContext| {
        lower_id_op(rw, op, REPLICA_ID_TARGET)
    });
    matcher.add(&[OpKey::AllReduce], lower_all_reduce);
    matcher
}

/// Lower every recognized operation in the module to a runtime ABI call.
///
/// One-shot and all-or-nothing: on a convergence failure the module must be
/// discarded.
pub fn lower_to_runtime_calls(module: &mut Module) -> Result<()> {
    let matcher = runtime_call_patterns();
    let mut ctx = LowerContext::default();
    apply_patterns_greedily(module, &matcher, &mut ctx).context(LoweringSnafu)
}
