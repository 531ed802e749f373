//! Lens selectors: the compiled form of an access path.

use crate::Name;

/// One step of a lens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Field by declaration order (`.0`).
    FieldByPosition(usize),
    /// Field by name (`.power`, `."ID"`).
    FieldByName(Name),
    /// Continue only if the current atom has this tag (`.(Combustion)`).
    VariantGuard(Name),
}

impl Selector {
    /// Whether this step reads a field (as opposed to testing a tag).
    #[inline]
    pub fn is_field(self) -> bool {
        !matches!(self, Selector::VariantGuard(_))
    }
}
