//! The closed type lattice used for dispatch, conversion and field typing.
//!
//! ```text
//!            Any / Dynamic
//!                  |
//!          InterfaceSet({I})
//!                  |
//!        InterfaceSet({I, J})
//!                  |
//!             AtomTag(a)     (when `a` satisfies I and J)
//! ```
//!
//! Subtyping between an atom and an interface set needs the registries (an
//! atom satisfies an interface through the method table), so `accepts_with`
//! takes that check as a callback. Everything else is structural.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::{AtomId, InterfaceId};

/// A sorted, deduplicated set of interfaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceSet(SmallVec<[InterfaceId; 4]>);

impl InterfaceSet {
    /// Build a set from any collection of interfaces.
    pub fn new(interfaces: impl IntoIterator<Item = InterfaceId>) -> Self {
        let mut items: SmallVec<[InterfaceId; 4]> = interfaces.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        InterfaceSet(items)
    }

    /// A set with a single interface.
    pub fn single(interface: InterfaceId) -> Self {
        InterfaceSet(smallvec::smallvec![interface])
    }

    /// Whether the set contains `interface`.
    pub fn contains(&self, interface: InterfaceId) -> bool {
        self.0.binary_search(&interface).is_ok()
    }

    /// Whether every interface of `other` is also in `self`.
    pub fn is_superset_of(&self, other: &InterfaceSet) -> bool {
        other.iter().all(|i| self.contains(i))
    }

    /// Iterate in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = InterfaceId> + '_ {
        self.0.iter().copied()
    }

    /// Number of interfaces in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty (accepts every type).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<InterfaceId> for InterfaceSet {
    fn from_iter<T: IntoIterator<Item = InterfaceId>>(iter: T) -> Self {
        InterfaceSet::new(iter)
    }
}

/// Runtime/declared type of a value, parameter or field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Exactly this atom.
    Atom(AtomId),
    /// Any type satisfying every interface in the set.
    Interfaces(InterfaceSet),
    /// Unchecked: accepts anything, ranks with `Any`.
    Dynamic,
    /// Top of the lattice.
    Any,
}

/// Coarse rank of a pattern, from least to most specific.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// `Any` or `Dynamic`.
    Top,
    /// An interface set.
    Structural,
    /// A concrete atom.
    Exact,
}

impl TypeTag {
    /// Pattern accepting exactly one atom.
    #[inline]
    pub const fn atom(atom: AtomId) -> Self {
        TypeTag::Atom(atom)
    }

    /// Pattern accepting types that satisfy all of `interfaces`.
    pub fn interfaces(interfaces: impl IntoIterator<Item = InterfaceId>) -> Self {
        TypeTag::Interfaces(InterfaceSet::new(interfaces))
    }

    /// Whether this is `Any` or `Dynamic`.
    #[inline]
    pub fn is_top(&self) -> bool {
        matches!(self, TypeTag::Any | TypeTag::Dynamic)
    }

    /// The atom this tag names, if any.
    #[inline]
    pub fn as_atom(&self) -> Option<AtomId> {
        match self {
            TypeTag::Atom(atom) => Some(*atom),
            _ => None,
        }
    }

    /// Coarse rank of this tag.
    pub fn specificity(&self) -> Specificity {
        match self {
            TypeTag::Atom(_) => Specificity::Exact,
            TypeTag::Interfaces(set) if !set.is_empty() => Specificity::Structural,
            TypeTag::Interfaces(_) | TypeTag::Dynamic | TypeTag::Any => Specificity::Top,
        }
    }

    /// Compare two patterns that both accepted the same actual type.
    ///
    /// `Greater` means `self` is strictly more specific. `None` means the two
    /// patterns are incomparable (e.g. unrelated interface sets).
    pub fn compare_specificity(&self, other: &TypeTag) -> Option<Ordering> {
        match (self, other) {
            (TypeTag::Atom(a), TypeTag::Atom(b)) => (a == b).then_some(Ordering::Equal),
            (TypeTag::Interfaces(a), TypeTag::Interfaces(b)) => {
                match (a.is_superset_of(b), b.is_superset_of(a)) {
                    (true, true) => Some(Ordering::Equal),
                    (true, false) => Some(Ordering::Greater),
                    (false, true) => Some(Ordering::Less),
                    (false, false) => None,
                }
            }
            _ => Some(self.specificity().cmp(&other.specificity())),
        }
    }

    /// Whether `actual <: pattern`, where `pattern` is `self`.
    ///
    /// `satisfies(atom, interface)` answers the one non-structural question.
    pub fn accepts_with(
        &self,
        actual: &TypeTag,
        mut satisfies: impl FnMut(AtomId, InterfaceId) -> bool,
    ) -> bool {
        match (self, actual) {
            (TypeTag::Any | TypeTag::Dynamic, _) => true,
            (TypeTag::Atom(expected), TypeTag::Atom(found)) => expected == found,
            (TypeTag::Interfaces(required), TypeTag::Atom(found)) => {
                required.iter().all(|i| satisfies(*found, i))
            }
            (TypeTag::Interfaces(required), TypeTag::Interfaces(known)) => {
                known.is_superset_of(required)
            }
            (TypeTag::Atom(_) | TypeTag::Interfaces(_), TypeTag::Any | TypeTag::Dynamic)
            | (TypeTag::Atom(_), TypeTag::Interfaces(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests;
