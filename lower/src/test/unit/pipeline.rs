//! End-to-end pass tests over mixed-kind modules.

use sable_ir::{AttrMap, ElemType, Func, OpKey, OpKind, Type};

use crate::runtime::{
    ALL_REDUCE_TARGET, CUSTOM_CALL_TARGET, INFEED_TARGET, OUTFEED_TARGET, PARTITION_ID_TARGET, REPLICA_ID_TARGET,
    lower_to_runtime_calls,
};
use crate::test::helpers::{call_ops, f32_buf, push_custom_call, single_func_module};

fn mixed_module() -> (sable_ir::Module, sable_ir::FuncId) {
    let mut func = Func::new("main");
    let a = func.add_arg(f32_buf(&[4, 4]));
    let b = func.add_arg(f32_buf(&[8]));

    push_custom_call(&mut func, &[a], &[b], None, AttrMap::new());
    func.push_op(OpKind::Infeed, &[a], &[], AttrMap::new());
    func.push_op(OpKind::Outfeed, &[b], &[], AttrMap::new());
    func.push_op(OpKind::PartitionId, &[], &[Type::Scalar(ElemType::I32)], AttrMap::new());
    func.push_op(OpKind::ReplicaId, &[], &[Type::Scalar(ElemType::I32)], AttrMap::new());
    func.push_op(OpKind::AllReduce, &[a], &[], AttrMap::new());

    single_func_module(func)
}

#[test]
fn all_recognized_kinds_reach_a_fixed_point() {
    let (mut module, func_id) = mixed_module();
    lower_to_runtime_calls(&mut module).unwrap();

    let func = module.func(func_id);
    for key in [
        OpKey::CustomCall,
        OpKey::Infeed,
        OpKey::Outfeed,
        OpKey::PartitionId,
        OpKey::ReplicaId,
        OpKey::AllReduce,
    ] {
        assert_eq!(func.ops_with_key(key).count(), 0, "{key:?} survived lowering");
    }
    assert_eq!(call_ops(func).len(), 6);

    for target in [
        CUSTOM_CALL_TARGET,
        INFEED_TARGET,
        OUTFEED_TARGET,
        PARTITION_ID_TARGET,
        REPLICA_ID_TARGET,
        ALL_REDUCE_TARGET,
    ] {
        assert!(module.symbols.lookup(target).is_some(), "missing declaration for {target}");
    }
    assert_eq!(module.symbols.len(), 6);
}

/// Lowered output is itself a fixed point: a second run changes nothing.
#[test]
fn lowering_is_idempotent() {
    let (mut module, func_id) = mixed_module();
    lower_to_runtime_calls(&mut module).unwrap();
    let schedule_after_first: Vec<_> = module.func(func_id).schedule().to_vec();
    let decls_after_first = module.symbols.len();

    lower_to_runtime_calls(&mut module).unwrap();

    assert_eq!(module.func(func_id).schedule(), schedule_after_first.as_slice());
    assert_eq!(module.symbols.len(), decls_after_first);
}

#[test]
fn empty_module_is_a_noop() {
    let mut module = sable_ir::Module::new();
    lower_to_runtime_calls(&mut module).unwrap();
    assert!(module.symbols.is_empty());
}
