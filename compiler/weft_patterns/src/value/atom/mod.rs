//! Atom instances and their identity.
//!
//! Every construction mints a fresh `IdentityToken`, including constructions
//! with identical field values. Whether the token takes part in equality
//! depends on the declaration: anonymous atoms compare by token, named atoms
//! compare by tag and field values.

use std::sync::atomic::{AtomicU64, Ordering};

use weft_ir::{AtomId, Name};

use super::{Heap, Value};

/// How instances of an atom compare for equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AtomKind {
    /// Compared by tag and field values.
    #[default]
    Named,
    /// Compared by construction identity.
    Anonymous,
}

/// Construction-site identity of one atom instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityToken(u64);

impl IdentityToken {
    /// Get the raw token.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Process-wide source of identity tokens.
///
/// Shared by every evaluation thread constructing atoms; a relaxed atomic
/// increment is enough since tokens only need to be distinct, not ordered.
#[derive(Debug, Default)]
pub struct IdentityCounter(AtomicU64);

impl IdentityCounter {
    /// Create a counter starting at zero.
    pub const fn new() -> Self {
        IdentityCounter(AtomicU64::new(0))
    }

    /// Mint the next token.
    #[inline]
    pub fn next(&self) -> IdentityToken {
        IdentityToken(self.0.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of tokens minted so far.
    pub fn minted(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// An instance of a declared atom.
#[derive(Clone, Debug)]
pub struct AtomValue {
    atom: AtomId,
    tag: Name,
    kind: AtomKind,
    identity: IdentityToken,
    fields: Heap<Vec<Value>>,
}

impl AtomValue {
    /// Assemble an instance. Field arity and types are the registry's job;
    /// this only packages already-validated fields.
    pub fn new(
        atom: AtomId,
        tag: Name,
        kind: AtomKind,
        identity: IdentityToken,
        fields: Vec<Value>,
    ) -> Self {
        AtomValue {
            atom,
            tag,
            kind,
            identity,
            fields: Heap::new(fields),
        }
    }

    /// The declaration this instance was built from.
    #[inline]
    pub fn atom(&self) -> AtomId {
        self.atom
    }

    /// The constructor tag.
    #[inline]
    pub fn tag(&self) -> Name {
        self.tag
    }

    #[inline]
    pub fn kind(&self) -> AtomKind {
        self.kind
    }

    #[inline]
    pub fn identity(&self) -> IdentityToken {
        self.identity
    }

    /// Field values in declaration order.
    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Field by position.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Whether two instances share their field storage.
    pub fn shares_fields_with(&self, other: &AtomValue) -> bool {
        self.fields.ptr_eq(&other.fields)
    }

    /// Copy of this instance with one field replaced.
    ///
    /// Sibling fields are shared, not deep-copied. The copy is a new
    /// construction and carries `identity`. Returns `None` if `index` is out
    /// of range.
    pub fn with_field(&self, index: usize, value: Value, identity: IdentityToken) -> Option<Self> {
        if index >= self.fields.len() {
            return None;
        }
        let mut fields = Vec::clone(&self.fields);
        fields[index] = value;
        Some(AtomValue {
            atom: self.atom,
            tag: self.tag,
            kind: self.kind,
            identity,
            fields: Heap::new(fields),
        })
    }
}

impl PartialEq for AtomValue {
    fn eq(&self, other: &Self) -> bool {
        if self.atom != other.atom {
            return false;
        }
        match self.kind {
            AtomKind::Anonymous => self.identity == other.identity,
            AtomKind::Named => self.fields == other.fields,
        }
    }
}
