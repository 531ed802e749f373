//! Lenses: compiled, reusable access paths.
//!
//! A lens reads or rebuilds a nested field of an atom value. Reads never
//! fail: a step the current variant does not have yields `None`. Updates come
//! in two flavours:
//!
//! - `set_strict` refuses to update through a missing step, and refuses to
//!   write a field whose enclosing atom is one of several variants unless the
//!   path pins the variant with a guard right before the field
//!   (`.engine.(Combustion).power`). A path that compiled against one variant
//!   must not silently stop doing anything when the data is another.
//!   Guards after the last field (`.engine.(Combustion)`) must hold for the
//!   field's current value and for the replacement.
//! - `set_safe` walks the same way and returns the input unchanged instead of
//!   failing.
//!
//! Updates are persistent: only the atoms on the path are rebuilt, each with
//! a fresh identity token, and every untouched sibling is shared.

#![expect(
    clippy::disallowed_types,
    reason = "Arc shares compiled selectors between lens clones"
)]

mod path;

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::trace;
use weft_ir::{Selector, StringInterner, StringLookup};
use weft_patterns::{AtomValue, NamedField, Pattern, Value};

use crate::errors::LensError;
use crate::registry::Registry;

/// A compiled access path. Cloning shares the selectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lens {
    selectors: Arc<[Selector]>,
}

impl Lens {
    /// Wrap selectors produced elsewhere (e.g. by the loader).
    pub fn from_selectors(selectors: Vec<Selector>) -> Self {
        Lens {
            selectors: Arc::from(selectors),
        }
    }

    /// Compile `.field`, `.0`, `."Field"` and `.(Tag)` steps.
    pub fn compile(path: &str, interner: &StringInterner) -> Result<Self, LensError> {
        let selectors = path::parse(path, interner)?;
        trace!(path, steps = selectors.len(), "compiled lens");
        Ok(Lens::from_selectors(selectors))
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Render back to path syntax.
    pub fn render(&self, lookup: &impl StringLookup) -> String {
        let mut out = String::new();
        for selector in self.selectors.iter() {
            // Writing to a String cannot fail.
            let _ = match *selector {
                Selector::FieldByPosition(i) => write!(out, ".{i}"),
                Selector::FieldByName(name) => {
                    let text = lookup.lookup(name);
                    let plain = text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
                        && text.chars().all(|c| c.is_alphanumeric() || c == '_');
                    if plain {
                        write!(out, ".{text}")
                    } else {
                        write!(out, ".\"{text}\"")
                    }
                }
                Selector::VariantGuard(tag) => write!(out, ".({})", lookup.lookup(tag)),
            };
        }
        out
    }

    /// Read the focused value, or `None` if any step does not apply.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn get(&self, registry: &Registry, value: &Value) -> Option<Value> {
        let mut current = value.clone();
        for &selector in self.selectors.iter() {
            current = read(registry, &current, selector)?;
            trace!(?selector, "lens step");
        }
        Some(current)
    }

    /// Replace the focused value, failing instead of skipping.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn set_strict(
        &self,
        registry: &Registry,
        value: &Value,
        new: Value,
    ) -> Result<Value, LensError> {
        self.update(registry, &self.selectors, None, value, new)
    }

    /// Replace the focused value, or return `value` unchanged.
    pub fn set_safe(&self, registry: &Registry, value: &Value, new: Value) -> Value {
        self.set_strict(registry, value, new).unwrap_or_else(|err| {
            trace!(%err, "safe update left value unchanged");
            value.clone()
        })
    }

    fn update(
        &self,
        registry: &Registry,
        selectors: &[Selector],
        previous: Option<Selector>,
        value: &Value,
        new: Value,
    ) -> Result<Value, LensError> {
        let Some((&selector, rest)) = selectors.split_first() else {
            return Ok(new);
        };
        if let Selector::VariantGuard(tag) = selector {
            if registry.tag_of(value) != tag {
                return Err(self.mismatch(registry, value, "variant guard does not match"));
            }
            if rest.is_empty() {
                let reason = "replacement fails variant guard";
                self.check_guards(registry, &[selector], &new, reason)?;
            }
            return self.update(registry, rest, Some(selector), value, new);
        }

        let Some(atom) = value.as_atom() else {
            return Err(self.mismatch(registry, value, "value has no fields"));
        };
        let Some(index) = field_position(registry, atom, selector) else {
            return Err(self.mismatch(registry, value, "field is missing"));
        };
        let replacement = if rest.iter().all(|s| !s.is_field()) {
            self.check_closed(registry, value, atom, previous)?;
            let Some(current) = atom.field(index) else {
                return Err(self.mismatch(registry, value, "field is missing"));
            };
            self.check_guards(registry, rest, current, "variant guard does not match")?;
            self.check_guards(registry, rest, &new, "replacement fails variant guard")?;
            check_field_type(registry, atom, index, &new)?;
            new
        } else {
            let Some(child) = atom.field(index) else {
                return Err(self.mismatch(registry, value, "field is missing"));
            };
            self.update(registry, rest, Some(selector), child, new)?
        };
        match atom.with_field(index, replacement, registry.mint_identity()) {
            Some(rebuilt) => Ok(Value::Atom(rebuilt)),
            None => Err(self.mismatch(registry, value, "field is missing")),
        }
    }

    /// The atom owning the written field must be its family's only variant,
    /// or pinned by a guard right before the field.
    fn check_closed(
        &self,
        registry: &Registry,
        value: &Value,
        atom: &AtomValue,
        previous: Option<Selector>,
    ) -> Result<(), LensError> {
        let variants = registry.family_arity(atom.atom());
        let pinned = previous == Some(Selector::VariantGuard(atom.tag()));
        if variants > 1 && !pinned {
            return Err(self.mismatch(
                registry,
                value,
                &format!("field belongs to one of {variants} variants"),
            ));
        }
        Ok(())
    }

    /// Trailing guards must hold for the field being replaced and for its
    /// replacement.
    fn check_guards(
        &self,
        registry: &Registry,
        guards: &[Selector],
        at: &Value,
        reason: &str,
    ) -> Result<(), LensError> {
        for guard in guards {
            if let Selector::VariantGuard(tag) = *guard {
                if registry.tag_of(at) != tag {
                    return Err(self.mismatch(registry, at, reason));
                }
            }
        }
        Ok(())
    }

    fn mismatch(&self, registry: &Registry, at: &Value, reason: &str) -> LensError {
        LensError::LensVariantMismatch {
            path: self.render(registry.interner()),
            found: registry.display_name(registry.tag_of(at)),
            reason: reason.to_owned(),
        }
    }
}

/// One read step with `get` semantics.
fn read(registry: &Registry, value: &Value, selector: Selector) -> Option<Value> {
    match selector {
        Selector::FieldByPosition(i) => value.as_atom()?.field(i).cloned(),
        Selector::FieldByName(name) => {
            // Open name pattern `{name}`: any variant that has the field.
            let pattern = Pattern::Named {
                atom: None,
                fields: vec![NamedField::punned(name)],
            };
            let outcome = pattern.matches(value, registry)?;
            outcome.bindings.into_iter().next().map(|(_, v)| v)
        }
        Selector::VariantGuard(tag) => (registry.tag_of(value) == tag).then(|| value.clone()),
    }
}

/// The replacement must fit the declared type of the field it lands in.
fn check_field_type(
    registry: &Registry,
    atom: &AtomValue,
    index: usize,
    new: &Value,
) -> Result<(), LensError> {
    let Some(spec) = registry.shape(atom.atom()).and_then(|fields| fields.get(index)) else {
        return Ok(());
    };
    let found = new.type_tag();
    if registry.is_subtype(&found, &spec.ty) {
        return Ok(());
    }
    Err(LensError::FieldTypeMismatch {
        field: registry.display_name(spec.name),
        expected: registry.display_type(&spec.ty),
        found: registry.display_type(&found),
    })
}

/// Position a field selector refers to within `atom`.
fn field_position(registry: &Registry, atom: &AtomValue, selector: Selector) -> Option<usize> {
    let index = match selector {
        Selector::FieldByPosition(i) => i,
        Selector::FieldByName(name) => registry.field_index(atom.atom(), name)?,
        Selector::VariantGuard(_) => return None,
    };
    (index < atom.fields().len()).then_some(index)
}
