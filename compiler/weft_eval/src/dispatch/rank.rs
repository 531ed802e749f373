//! Specificity ranking among matching candidates.
//!
//! Candidate `a` beats `b` when, position by position, every pattern of `a`
//! is at least as specific as `b`'s and at least one is strictly more. The
//! winner is the unique maximal candidate; among several maximal ones the
//! calling module's own method wins if there is exactly one.

use std::cmp::Ordering;
use std::iter;

use smallvec::SmallVec;
use weft_ir::{MethodId, ModuleId, TypeTag};

use super::PlannedConversion;
use crate::registry::MethodDecl;

/// A method that accepts the call, possibly after conversions.
pub(super) struct Candidate<'r> {
    pub(super) id: MethodId,
    pub(super) decl: &'r MethodDecl,
    pub(super) conversions: SmallVec<[PlannedConversion; 2]>,
}

/// Receiver pattern, then the patterns of the `arity` supplied arguments.
fn patterns(decl: &MethodDecl, arity: usize) -> impl Iterator<Item = &TypeTag> {
    iter::once(&decl.receiver).chain(decl.params.iter().take(arity).map(|p| &p.pattern))
}

/// Pointwise comparison; `None` when neither candidate dominates.
fn compare(a: &MethodDecl, b: &MethodDecl, arity: usize) -> Option<Ordering> {
    let mut overall = Ordering::Equal;
    for (pa, pb) in patterns(a, arity).zip(patterns(b, arity)) {
        match pa.compare_specificity(pb)? {
            Ordering::Equal => {}
            ord if overall == Ordering::Equal => overall = ord,
            ord if ord != overall => return None,
            _ => {}
        }
    }
    Some(overall)
}

/// Index of the winning candidate, or the indices of the tied ones.
pub(super) fn select(
    candidates: &[Candidate<'_>],
    arity: usize,
    calling: ModuleId,
) -> Result<usize, SmallVec<[usize; 4]>> {
    let beaten = |i: usize| {
        candidates.iter().enumerate().any(|(j, other)| {
            j != i && compare(other.decl, candidates[i].decl, arity) == Some(Ordering::Greater)
        })
    };
    let maximal: SmallVec<[usize; 4]> = (0..candidates.len()).filter(|&i| !beaten(i)).collect();
    if let [winner] = maximal.as_slice() {
        return Ok(*winner);
    }
    let local: SmallVec<[usize; 4]> = maximal
        .iter()
        .copied()
        .filter(|&i| candidates[i].decl.module == calling)
        .collect();
    match local.as_slice() {
        [winner] => Ok(*winner),
        _ => Err(maximal),
    }
}
