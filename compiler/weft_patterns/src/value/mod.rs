//! Runtime values seen by the resolution engine.
//!
//! Primitives are modelled as instances of the builtin atoms (`Int`, `Float`,
//! `Bool`, `Text`, `Nothing`) so they dispatch exactly like user atoms: a
//! method declared on `self: Int` is keyed by `AtomId::INT`.
//!
//! ```text
//! let n = Value::Int(7);            // AtomTag(Int)
//! let s = Value::text("pink");      // AtomTag(Text), shared payload
//! let a = Value::Atom(atom_value);  // AtomTag(declared atom)
//! ```

mod atom;
mod heap;

use std::fmt;

use weft_ir::{AtomId, StringLookup, TypeTag};

pub use atom::{AtomKind, AtomValue, IdentityCounter, IdentityToken};
pub use heap::Heap;

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Text (shared payload).
    Text(Heap<str>),
    /// The unit value.
    Nothing,
    /// Instance of a declared atom.
    Atom(AtomValue),
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        let owned: String = s.into();
        Value::Text(Heap::from_boxed_str(owned.into_boxed_str()))
    }

    /// The atom this value is an instance of.
    pub fn atom_id(&self) -> AtomId {
        match self {
            Value::Int(_) => AtomId::INT,
            Value::Float(_) => AtomId::FLOAT,
            Value::Bool(_) => AtomId::BOOL,
            Value::Text(_) => AtomId::TEXT,
            Value::Nothing => AtomId::NOTHING,
            Value::Atom(atom) => atom.atom(),
        }
    }

    /// Runtime type of this value: always the exact atom.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::Atom(self.atom_id())
    }

    /// View as an atom instance.
    #[inline]
    pub fn as_atom(&self) -> Option<&AtomValue> {
        match self {
            Value::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// View as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// View as text.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render with tags resolved through `lookup`.
    pub fn display<'a, L: StringLookup>(&'a self, lookup: &'a L) -> ValueDisplay<'a, L> {
        ValueDisplay {
            value: self,
            lookup,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Nothing, Value::Nothing) => true,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

/// Helper for displaying a `Value` with resolved tags.
///
/// Atoms render in constructor-application form: `V3 1 9 3`, with nested
/// atoms parenthesised.
pub struct ValueDisplay<'a, L> {
    value: &'a Value,
    lookup: &'a L,
}

impl<L: StringLookup> ValueDisplay<'_, L> {
    fn write(&self, value: &Value, nested: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "'{}'", &**s),
            Value::Nothing => write!(f, "Nothing"),
            Value::Atom(atom) => {
                let tag = self.lookup.lookup(atom.tag());
                if atom.fields().is_empty() {
                    return write!(f, "{tag}");
                }
                if nested {
                    write!(f, "(")?;
                }
                write!(f, "{tag}")?;
                for field in atom.fields() {
                    write!(f, " ")?;
                    self.write(field, true, f)?;
                }
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl<L: StringLookup> fmt::Display for ValueDisplay<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(self.value, false, f)
    }
}

#[cfg(test)]
mod tests;
