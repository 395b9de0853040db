//! Pattern matcher with `OpKey`-based O(1) dispatch.
//!
//! Rules are stored in a `HashMap<OpKey, Vec<Closure>>`; only rules registered
//! for the matched operation's key are tried, with wildcard rules as a
//! fallback for ops without a specific rule.

use std::collections::HashMap;
use std::sync::Arc;

use crate::func::OpId;
use crate::op::OpKey;
use crate::rewriter::Rewriter;

use super::RewriteResult;

/// Closure type for a lowering rule.
///
/// Takes the rewriter positioned before the matched operation, the operation
/// id, and mutable pass context.
pub type PatternClosure<C> = Box<dyn Fn(&mut Rewriter<'_>, OpId, &mut C) -> RewriteResult + Send + Sync>;

/// Rule collection indexed by operation kind.
///
/// # Type Parameter
///
/// - `C`: Context type passed to all rule closures. Use `()` for stateless
///   matching.
pub struct PatternMatcher<C = ()> {
    /// Rules indexed by OpKey - tried first.
    indexed: HashMap<OpKey, Vec<PatternClosure<C>>>,
    /// Wildcard rules - tried after indexed rules.
    wildcards: Vec<PatternClosure<C>>,
}

impl<C> PatternMatcher<C> {
    pub fn new() -> Self {
        Self { indexed: HashMap::new(), wildcards: Vec::new() }
    }

    /// Add a rule for specific OpKey(s).
    ///
    /// If `keys` is empty the rule is treated as a wildcard and tried for
    /// every operation after all indexed rules.
    pub fn add<F>(&mut self, keys: &[OpKey], closure: F)
    where
        F: Fn(&mut Rewriter<'_>, OpId, &mut C) -> RewriteResult + Send + Sync + 'static,
    {
        match keys {
            [] => self.wildcards.push(Box::new(closure)),
            [key] => self.indexed.entry(*key).or_default().push(Box::new(closure)),
            keys => {
                // Multiple keys share the closure via Arc.
                let shared = Arc::new(closure);
                for &key in keys {
                    let shared = Arc::clone(&shared);
                    self.indexed
                        .entry(key)
                        .or_default()
                        .push(Box::new(move |rw: &mut Rewriter<'_>, op: OpId, ctx: &mut C| shared(rw, op, ctx)));
                }
            }
        }
    }

    /// Add a wildcard rule (tried for any operation).
    pub fn add_wildcard<F>(&mut self, closure: F)
    where
        F: Fn(&mut Rewriter<'_>, OpId, &mut C) -> RewriteResult + Send + Sync + 'static,
    {
        self.wildcards.push(Box::new(closure));
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.indexed.values().map(|rules| rules.len()).sum::<usize>() + self.wildcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty() && self.wildcards.is_empty()
    }

    /// Attempt to rewrite one operation using the registered rules.
    pub fn rewrite(&self, rw: &mut Rewriter<'_>, op: OpId, ctx: &mut C) -> RewriteResult {
        let key = rw.func().op(op).kind.key();

        if let Some(rules) = self.indexed.get(&key) {
            tracing::trace!(op_key = ?key, rule_count = rules.len(), "trying indexed rules");
            for (idx, closure) in rules.iter().enumerate() {
                if closure(rw, op, ctx) == RewriteResult::Rewritten {
                    tracing::debug!(op_key = ?key, rule_idx = idx, "rule matched");
                    return RewriteResult::Rewritten;
                }
            }
        }

        for (idx, closure) in self.wildcards.iter().enumerate() {
            if closure(rw, op, ctx) == RewriteResult::Rewritten {
                tracing::debug!(wildcard_idx = idx, "wildcard rule matched");
                return RewriteResult::Rewritten;
            }
        }

        RewriteResult::NoMatch
    }
}

impl<C> Default for PatternMatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

// Implement Add<Self> for composition (matcher1 + matcher2)
impl<C> std::ops::Add for PatternMatcher<C> {
    type Output = Self;

    /// Combine two matchers. Rules from `rhs` are appended.
    fn add(mut self, rhs: Self) -> Self::Output {
        for (key, rules) in rhs.indexed {
            self.indexed.entry(key).or_default().extend(rules);
        }
        self.wildcards.extend(rhs.wildcards);
        self
    }
}
