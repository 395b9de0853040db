//! Greedy fixed-point rewrite driver.
//!
//! # Algorithm
//!
//! Per function, the driver scans the live schedule and offers every
//! operation to the matcher. A scan that performs at least one rewrite is
//! followed by another full scan, so rules get to see operations created by
//! earlier rewrites. The fixed point is reached when a full scan changes
//! nothing.
//!
//! Rules must be self-contained and order-independent: the scan order of
//! independent operations is an implementation detail.
//!
//! A round cap converts non-convergence (a rule that keeps re-introducing
//! matchable work) into [`crate::Error::FixedPointDivergence`]; the module
//! must be considered invalid after that.

use crate::error::{FixedPointDivergenceSnafu, Result};
use crate::func::OpId;
use crate::module::{FuncId, Module};
use crate::pattern::{PatternMatcher, RewriteResult};
use crate::rewriter::Rewriter;

/// Cap on the number of changed scans per function.
const MAX_ROUNDS: usize = 1_000;

/// Apply the matcher's rules to every function until a fixed point.
///
/// Returns [`crate::Error::FixedPointDivergence`] if any function still
/// changes after `MAX_ROUNDS` scans.
pub fn apply_patterns_greedily<C>(module: &mut Module, matcher: &PatternMatcher<C>, ctx: &mut C) -> Result<()> {
    let Module { symbols, funcs } = module;

    for (idx, func) in funcs.iter_mut().enumerate() {
        let func_id = FuncId(idx as u32);
        let mut rounds = 0usize;

        loop {
            let mut changed = false;

            // Snapshot: rewrites mutate the schedule while we walk it.
            let worklist: Vec<OpId> = func.schedule().to_vec();
            for op in worklist {
                if !func.is_live(op) {
                    continue;
                }
                let mut rw = Rewriter::new(symbols, func, func_id);
                rw.set_insertion_before(op);
                if matcher.rewrite(&mut rw, op, ctx) == RewriteResult::Rewritten {
                    changed = true;
                }
            }

            if !changed {
                break;
            }

            rounds += 1;
            tracing::trace!(func = func.name(), rounds, "rewrite scan changed the function");
            snafu::ensure!(
                rounds < MAX_ROUNDS,
                FixedPointDivergenceSnafu { func: func.name().to_owned(), rounds }
            );
        }

        tracing::debug!(func = func.name(), rounds, "reached rewrite fixed point");
    }

    Ok(())
}
