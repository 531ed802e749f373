//! Dispatch policy.

/// How far call resolution looks for candidates.
///
/// Enum with policy methods, passed to `Dispatcher::with_mode`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Two-key dispatch on (module, receiver): explicit module arguments are
    /// honoured, and implicit calls see the calling module and its imports.
    #[default]
    TwoKey,
    /// One statically known module per call: explicit module arguments are
    /// rejected, and implicit calls only see the first module in scope order
    /// that defines the method name.
    StaticModule,
}

impl DispatchMode {
    /// Whether `inc A 5` style explicit module arguments are accepted.
    #[inline]
    pub fn allows_explicit_module(self) -> bool {
        matches!(self, Self::TwoKey)
    }

    /// Whether implicit resolution stops at the first module defining the name.
    #[inline]
    pub fn restricts_implicit_scope(self) -> bool {
        matches!(self, Self::StaticModule)
    }
}
