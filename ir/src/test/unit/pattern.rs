//! Pattern matcher dispatch tests.

use crate::func::Func;
use crate::module::{FuncId, Module};
use crate::op::{OpKey, OpKind};
use crate::pattern::{PatternMatcher, RewriteResult};
use crate::rewriter::Rewriter;
use crate::types::AttrMap;

fn module_with(func: Func) -> Module {
    let mut module = Module::new();
    module.add_func(func);
    module
}

#[test]
fn test_empty_matcher() {
    let matcher = PatternMatcher::<()>::new();
    assert!(matcher.is_empty());
    assert_eq!(matcher.len(), 0);
}

#[test]
fn test_indexed_rule_only_sees_its_key() {
    let mut matcher = PatternMatcher::<()>::new();
    matcher.add(&[OpKey::Infeed], |rw, op, _| {
        rw.erase(op);
        RewriteResult::Rewritten
    });

    let mut func = Func::new("main");
    let infeed = func.push_op(OpKind::Infeed, &[], &[], AttrMap::new());
    let outfeed = func.push_op(OpKind::Outfeed, &[], &[], AttrMap::new());
    let mut module = module_with(func);

    let Module { symbols, funcs } = &mut module;
    let mut rw = Rewriter::new(symbols, &mut funcs[0], FuncId(0));
    assert_eq!(matcher.rewrite(&mut rw, outfeed, &mut ()), RewriteResult::NoMatch);
    assert_eq!(matcher.rewrite(&mut rw, infeed, &mut ()), RewriteResult::Rewritten);
    assert_eq!(rw.func().schedule(), &[outfeed]);
}

#[test]
fn test_one_rule_registered_under_multiple_keys() {
    let mut matcher = PatternMatcher::<()>::new();
    matcher.add(&[OpKey::Infeed, OpKey::Outfeed], |rw, op, _| {
        rw.erase(op);
        RewriteResult::Rewritten
    });
    assert_eq!(matcher.len(), 2);

    let mut func = Func::new("main");
    let infeed = func.push_op(OpKind::Infeed, &[], &[], AttrMap::new());
    let outfeed = func.push_op(OpKind::Outfeed, &[], &[], AttrMap::new());
    let mut module = module_with(func);

    let Module { symbols, funcs } = &mut module;
    let mut rw = Rewriter::new(symbols, &mut funcs[0], FuncId(0));
    assert_eq!(matcher.rewrite(&mut rw, infeed, &mut ()), RewriteResult::Rewritten);
    assert_eq!(matcher.rewrite(&mut rw, outfeed, &mut ()), RewriteResult::Rewritten);
}

#[test]
fn test_wildcard_tried_after_indexed() {
    let mut matcher = PatternMatcher::<()>::new();
    matcher.add(&[OpKey::Infeed], |_, _, _| RewriteResult::NoMatch);
    matcher.add_wildcard(|rw, op, _| {
        rw.erase(op);
        RewriteResult::Rewritten
    });

    let mut func = Func::new("main");
    let infeed = func.push_op(OpKind::Infeed, &[], &[], AttrMap::new());
    let mut module = module_with(func);

    let Module { symbols, funcs } = &mut module;
    let mut rw = Rewriter::new(symbols, &mut funcs[0], FuncId(0));
    assert_eq!(matcher.rewrite(&mut rw, infeed, &mut ()), RewriteResult::Rewritten);
}

#[test]
fn test_combine_matchers() {
    let mut lhs = PatternMatcher::<()>::new();
    lhs.add(&[OpKey::Infeed], |_, _, _| RewriteResult::NoMatch);

    let mut rhs = PatternMatcher::<()>::new();
    rhs.add(&[OpKey::Outfeed], |_, _, _| RewriteResult::NoMatch);
    rhs.add_wildcard(|_, _, _| RewriteResult::NoMatch);

    let combined = lhs + rhs;
    assert_eq!(combined.len(), 3);
}

#[test]
fn test_context_threading() {
    let mut matcher = PatternMatcher::<usize>::new();
    matcher.add(&[OpKey::Infeed], |rw, op, seen: &mut usize| {
        *seen += 1;
        rw.erase(op);
        RewriteResult::Rewritten
    });

    let mut func = Func::new("main");
    let infeed = func.push_op(OpKind::Infeed, &[], &[], AttrMap::new());
    let mut module = module_with(func);

    let Module { symbols, funcs } = &mut module;
    let mut rw = Rewriter::new(symbols, &mut funcs[0], FuncId(0));
    let mut seen = 0usize;
    matcher.rewrite(&mut rw, infeed, &mut seen);
    assert_eq!(seen, 1);
}
