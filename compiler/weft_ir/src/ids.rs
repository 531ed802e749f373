//! Typed handles into the registries.
//!
//! Every handle is a dense `u32` index assigned in declaration order by the
//! registry that owns the entry. Handles from different registries never mix
//! because each kind is its own newtype.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw index.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the index as `usize` for table access.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Create the handle for the next slot of a table of length `len`.
            ///
            /// Returns `None` if the table already holds `u32::MAX` entries.
            #[inline]
            pub fn next_for(len: usize) -> Option<Self> {
                u32::try_from(len).ok().map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A loaded module (the unit of method ownership and imports).
    ModuleId,
    "module"
);
define_id!(
    /// A declared atom shape.
    AtomId,
    "atom"
);
define_id!(
    /// A sum type grouping sibling atoms.
    FamilyId,
    "family"
);
define_id!(
    /// A declared structural interface.
    InterfaceId,
    "interface"
);
define_id!(
    /// An entry of the method table.
    MethodId,
    "method"
);
define_id!(
    /// An entry of the conversion registry.
    ConversionId,
    "conversion"
);
define_id!(
    /// Opaque reference to a method body owned by the host evaluator.
    BodyId,
    "body"
);

impl ModuleId {
    /// The reserved module owning the builtin atoms.
    pub const BUILTINS: ModuleId = ModuleId(0);
}

impl AtomId {
    /// Builtin integer atom.
    pub const INT: AtomId = AtomId(0);
    /// Builtin floating-point atom.
    pub const FLOAT: AtomId = AtomId(1);
    /// Builtin boolean atom.
    pub const BOOL: AtomId = AtomId(2);
    /// Builtin text atom.
    pub const TEXT: AtomId = AtomId(3);
    /// Builtin unit atom.
    pub const NOTHING: AtomId = AtomId(4);

    /// Builtin atoms in declaration order, paired with their tag.
    pub const BUILTINS: [(AtomId, &'static str); 5] = [
        (Self::INT, "Int"),
        (Self::FLOAT, "Float"),
        (Self::BOOL, "Bool"),
        (Self::TEXT, "Text"),
        (Self::NOTHING, "Nothing"),
    ];

    /// Whether this atom is one of the pre-declared primitives.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 <= Self::NOTHING.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_atoms_are_dense_prefix() {
        for (i, (id, _)) in AtomId::BUILTINS.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert!(id.is_builtin());
        }
        assert!(!AtomId::from_raw(5).is_builtin());
    }

    #[test]
    fn test_next_for() {
        assert_eq!(MethodId::next_for(3), Some(MethodId::from_raw(3)));
        assert_eq!(MethodId::next_for(usize::MAX), None);
    }

    #[test]
    fn test_debug_prefix() {
        assert_eq!(format!("{:?}", InterfaceId::from_raw(2)), "interface#2");
    }
}
