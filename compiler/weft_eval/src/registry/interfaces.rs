//! Structural interfaces and explicit conformance.
//!
//! An interface is a set of required signatures, optionally with default
//! bodies, plus the interfaces it extends. Satisfaction is structural and is
//! computed once at freeze; defaults only apply to atoms that confirmed the
//! interface explicitly (`self: HasName` in the source).

use rustc_hash::{FxHashMap, FxHashSet};
use weft_ir::{AtomId, BodyId, InterfaceId, ModuleId, Name};

use super::Param;

/// A required method signature. `params` excludes the receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub name: Name,
    pub params: Vec<Param>,
    pub default: Option<BodyId>,
}

impl Requirement {
    /// A requirement with no default body.
    pub fn required(name: Name, params: Vec<Param>) -> Self {
        Requirement {
            name,
            params,
            default: None,
        }
    }

    /// A requirement confirmed atoms get for free.
    pub fn with_default(name: Name, params: Vec<Param>, body: BodyId) -> Self {
        Requirement {
            name,
            params,
            default: Some(body),
        }
    }
}

/// A declared interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub module: ModuleId,
    pub name: Name,
    /// Interfaces every implementor must also satisfy.
    pub supers: Vec<InterfaceId>,
    pub requirements: Vec<Requirement>,
}

#[derive(Clone, Debug, Default)]
pub(super) struct InterfaceTable {
    decls: Vec<InterfaceDecl>,
    by_name: FxHashMap<(ModuleId, Name), InterfaceId>,
    confirmed: Vec<(AtomId, InterfaceId)>,
    confirmed_set: FxHashSet<(AtomId, InterfaceId)>,
}

impl InterfaceTable {
    /// Append an interface; `None` if the name is taken in `decl.module`.
    pub(super) fn declare(&mut self, decl: InterfaceDecl) -> Option<InterfaceId> {
        let key = (decl.module, decl.name);
        if self.by_name.contains_key(&key) {
            return None;
        }
        let id = InterfaceId::next_for(self.decls.len())
            .unwrap_or_else(|| panic!("interface table overflow"));
        self.decls.push(decl);
        self.by_name.insert(key, id);
        Some(id)
    }

    pub(super) fn get(&self, id: InterfaceId) -> Option<&InterfaceDecl> {
        self.decls.get(id.index())
    }

    pub(super) fn lookup(&self, module: ModuleId, name: Name) -> Option<InterfaceId> {
        self.by_name.get(&(module, name)).copied()
    }

    /// Record that `atom` claims `interface`, and with it every super.
    pub(super) fn confirm(&mut self, atom: AtomId, interface: InterfaceId) {
        for id in self.with_supers(interface) {
            if self.confirmed_set.insert((atom, id)) {
                self.confirmed.push((atom, id));
            }
        }
    }

    /// Confirmations in the order they were made.
    pub(super) fn confirmed(&self) -> &[(AtomId, InterfaceId)] {
        &self.confirmed
    }

    /// `interface` followed by its transitive supers, without repeats.
    ///
    /// Supers are declared before the interfaces extending them, so the
    /// graph is acyclic.
    pub(super) fn with_supers(&self, interface: InterfaceId) -> Vec<InterfaceId> {
        let mut out = vec![interface];
        let mut next = 0;
        while let Some(&current) = out.get(next) {
            next += 1;
            if let Some(decl) = self.get(current) {
                for &sup in &decl.supers {
                    if !out.contains(&sup) {
                        out.push(sup);
                    }
                }
            }
        }
        out
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (InterfaceId, &InterfaceDecl)> {
        (0u32..).map(InterfaceId::from_raw).zip(self.decls.iter())
    }

    pub(super) fn len(&self) -> usize {
        self.decls.len()
    }
}
