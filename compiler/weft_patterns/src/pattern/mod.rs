//! Pattern matching over atom values.
//!
//! Three strategies test the same representation and must agree on whether a
//! value belongs to a constructor:
//!
//! - **Constructor** (`Vector.V3 -> ...`): tag test only, binds nothing, but
//!   refines the scrutinee so later field access is known to succeed.
//! - **Position** (`Vector.V3 x y z -> ...`): tag test, then binds every
//!   field in declaration order.
//! - **Name** (`Vector.V3 {x, y} -> ...`, `{x} -> ...`): binds fields by name.
//!   Without a tag the pattern is open and matches any atom that has the
//!   named fields; this partial match is what lens reads rely on.
//!
//! Field names are resolved through `FieldLayout`, implemented by the atom
//! registry, so patterns stay independent of registry storage.

use smallvec::SmallVec;
use weft_ir::{AtomId, Name};

use crate::Value;

/// Resolves field names of declared atoms.
pub trait FieldLayout {
    /// Position of `field` in `atom`'s declaration, if it has one.
    fn field_index(&self, atom: AtomId, field: Name) -> Option<usize>;
}

/// A name-based field binding: `{field}` or `{field = binder}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NamedField {
    pub field: Name,
    pub binder: Name,
}

impl NamedField {
    /// Bind `field` under its own name.
    pub const fn punned(field: Name) -> Self {
        NamedField {
            field,
            binder: field,
        }
    }
}

/// A single match-arm pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// `_`: matches anything, binds nothing.
    CatchAll,
    /// Tag test only.
    Constructor(AtomId),
    /// Tag test plus positional destructuring; `None` skips a field.
    Positional {
        atom: AtomId,
        binders: Vec<Option<Name>>,
    },
    /// Name-based destructuring; `atom: None` is the open structural form.
    Named {
        atom: Option<AtomId>,
        fields: Vec<NamedField>,
    },
}

/// Successful match: what the scrutinee is now known to be, and bindings.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MatchOutcome {
    /// The constructor the scrutinee was refined to, if the pattern names one.
    pub refined: Option<AtomId>,
    pub bindings: SmallVec<[(Name, Value); 4]>,
}

impl Pattern {
    /// Test `value` against this pattern.
    pub fn matches(&self, value: &Value, layout: &impl FieldLayout) -> Option<MatchOutcome> {
        let outcome = match self {
            Pattern::CatchAll => Some(MatchOutcome::default()),
            Pattern::Constructor(atom) => (value.atom_id() == *atom).then(|| MatchOutcome {
                refined: Some(*atom),
                bindings: SmallVec::new(),
            }),
            Pattern::Positional { atom, binders } => match_positional(*atom, binders, value),
            Pattern::Named { atom, fields } => match_named(*atom, fields, value, layout),
        };
        tracing::trace!(pattern = ?self, matched = outcome.is_some(), "pattern test");
        outcome
    }

    /// The constructor this pattern tests for, if any.
    pub fn constructor(&self) -> Option<AtomId> {
        match self {
            Pattern::Constructor(atom) | Pattern::Positional { atom, .. } => Some(*atom),
            Pattern::Named { atom, .. } => *atom,
            Pattern::CatchAll => None,
        }
    }
}

fn match_positional(atom: AtomId, binders: &[Option<Name>], value: &Value) -> Option<MatchOutcome> {
    if value.atom_id() != atom {
        return None;
    }
    // Primitives are fieldless builtin atoms.
    let fields = value.as_atom().map_or(&[][..], |a| a.fields());
    if fields.len() != binders.len() {
        return None;
    }
    let bindings = binders
        .iter()
        .zip(fields)
        .filter_map(|(binder, field)| binder.map(|name| (name, field.clone())))
        .collect();
    Some(MatchOutcome {
        refined: Some(atom),
        bindings,
    })
}

fn match_named(
    atom: Option<AtomId>,
    fields: &[NamedField],
    value: &Value,
    layout: &impl FieldLayout,
) -> Option<MatchOutcome> {
    let found = value.atom_id();
    if atom.is_some_and(|expected| expected != found) {
        return None;
    }
    let mut bindings = SmallVec::new();
    for named in fields {
        let index = layout.field_index(found, named.field)?;
        let field = value.as_atom()?.field(index)?;
        bindings.push((named.binder, field.clone()));
    }
    Some(MatchOutcome {
        refined: atom,
        bindings,
    })
}

#[cfg(test)]
mod tests;
