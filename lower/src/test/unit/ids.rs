//! Identity query lowering tests.

use test_case::test_case;

use sable_ir::{AttrMap, ElemType, Func, Module, OpKind, Type};

use crate::runtime::{PARTITION_ID_TARGET, REPLICA_ID_TARGET, lower_to_runtime_calls};
use crate::test::helpers::{call_ops, callee_name, single_func_module};

#[test_case(OpKind::PartitionId, PARTITION_ID_TARGET; "partition_id")]
#[test_case(OpKind::ReplicaId, REPLICA_ID_TARGET; "replica_id")]
fn id_query_lowers_to_nullary_i32_call(kind: OpKind, target: &str) {
    let i32_ty = Type::Scalar(ElemType::I32);

    let mut func = Func::new("main");
    let id_op = func.push_op(kind.clone(), &[], &[i32_ty.clone()], AttrMap::new());
    let id_value = func.op(id_op).results[0];
    // A consumer of the query result, lowered independently.
    func.push_op(OpKind::Outfeed, &[id_value], &[], AttrMap::new());
    let (mut module, func_id) = single_func_module(func);

    lower_to_runtime_calls(&mut module).unwrap();

    let func = module.func(func_id);
    assert!(!func.is_live(id_op));
    let calls = call_ops(func);
    assert_eq!(calls.len(), 2);
    assert_eq!(callee_name(&module, func_id, calls[0]), target);

    let func = module.func(func_id);
    let id_call = func.op(calls[0]);
    assert!(id_call.operands.is_empty());
    assert_eq!(id_call.results.len(), 1);
    assert_eq!(func.value_type(id_call.results[0]), &i32_ty);

    // The consumer now reads the call's result.
    let feed_call = func.op(calls[1]);
    assert_eq!(feed_call.operands.as_slice(), &[id_call.results[0]]);

    let decl = module.symbols.decl(module.symbols.lookup(target).unwrap());
    assert!(decl.params.is_empty());
    assert_eq!(decl.results, vec![i32_ty]);
}

/// One declaration serves every function in the module.
#[test]
fn declaration_is_shared_across_functions() {
    let i32_ty = Type::Scalar(ElemType::I32);

    let mut module = Module::new();
    for name in ["first", "second"] {
        let mut func = Func::new(name);
        func.push_op(OpKind::ReplicaId, &[], &[i32_ty.clone()], AttrMap::new());
        module.add_func(func);
    }

    lower_to_runtime_calls(&mut module).unwrap();

    assert_eq!(module.symbols.len(), 1);
    assert!(module.symbols.lookup(REPLICA_ID_TARGET).is_some());
}
