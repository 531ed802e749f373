//! The method table.
//!
//! Methods are keyed by owning module, name, receiver pattern and parameter
//! patterns. The same name may be declared in many modules and for many
//! receivers; dispatch picks among them at call time.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use weft_ir::{BodyId, InterfaceId, MethodId, ModuleId, Name, TypeTag};

/// A declared parameter (receiver excluded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub pattern: TypeTag,
    /// Whether callers may omit this argument.
    pub has_default: bool,
}

impl Param {
    pub fn new(name: Name, pattern: TypeTag) -> Self {
        Param {
            name,
            pattern,
            has_default: false,
        }
    }

    pub fn defaulted(name: Name, pattern: TypeTag) -> Self {
        Param {
            name,
            pattern,
            has_default: true,
        }
    }
}

/// Where a method came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MethodOrigin {
    /// Written by the user.
    Declared,
    /// Default body of this interface, materialised for a confirming atom.
    InterfaceDefault(InterfaceId),
}

/// An entry of the method table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub module: ModuleId,
    pub name: Name,
    pub receiver: TypeTag,
    pub params: Vec<Param>,
    pub body: BodyId,
    pub origin: MethodOrigin,
}

impl MethodDecl {
    /// Number of leading parameters without a default.
    pub fn required_arity(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| !p.has_default)
            .map_or(0, |last| last + 1)
    }

    /// Whether a call with `count` explicit arguments fits. Only trailing
    /// defaulted parameters may be omitted.
    #[inline]
    pub fn accepts_arity(&self, count: usize) -> bool {
        self.required_arity() <= count && count <= self.params.len()
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            module: self.module,
            name: self.name,
            receiver: self.receiver.clone(),
            params: self.params.iter().map(|p| p.pattern.clone()).collect(),
        }
    }
}

/// Uniqueness key of the method table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub module: ModuleId,
    pub name: Name,
    pub receiver: TypeTag,
    pub params: SmallVec<[TypeTag; 4]>,
}

#[derive(Clone, Debug, Default)]
pub(super) struct MethodTable {
    methods: Vec<MethodDecl>,
    by_key: FxHashMap<MethodKey, MethodId>,
    by_name: FxHashMap<Name, Vec<MethodId>>,
}

impl MethodTable {
    /// Append a method, or return the id already holding its key.
    pub(super) fn insert(&mut self, decl: MethodDecl) -> Result<MethodId, MethodId> {
        let key = decl.key();
        if let Some(&existing) = self.by_key.get(&key) {
            return Err(existing);
        }
        let id = MethodId::next_for(self.methods.len())
            .unwrap_or_else(|| panic!("method table overflow"));
        self.by_name.entry(decl.name).or_default().push(id);
        self.by_key.insert(key, id);
        self.methods.push(decl);
        Ok(id)
    }

    pub(super) fn get(&self, id: MethodId) -> Option<&MethodDecl> {
        self.methods.get(id.index())
    }

    /// Every method called `name`, in declaration order.
    pub(super) fn named(&self, name: Name) -> &[MethodId] {
        self.by_name.get(&name).map_or(&[][..], Vec::as_slice)
    }

    pub(super) fn len(&self) -> usize {
        self.methods.len()
    }
}
