//! Module declarations and import edges.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use weft_ir::{ModuleId, Name};

/// A loaded module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDecl {
    pub name: Name,
    /// Modules whose methods are in scope here, in import order.
    pub imports: Vec<ModuleId>,
}

#[derive(Clone, Debug, Default)]
pub(super) struct ModuleTable {
    decls: Vec<ModuleDecl>,
    by_name: FxHashMap<Name, ModuleId>,
}

impl ModuleTable {
    /// Declare a module; `None` if the name is taken.
    pub(super) fn declare(&mut self, name: Name) -> Option<ModuleId> {
        if self.by_name.contains_key(&name) {
            return None;
        }
        let id = ModuleId::next_for(self.decls.len())
            .unwrap_or_else(|| panic!("module table overflow"));
        self.decls.push(ModuleDecl {
            name,
            imports: Vec::new(),
        });
        self.by_name.insert(name, id);
        Some(id)
    }

    pub(super) fn get(&self, id: ModuleId) -> Option<&ModuleDecl> {
        self.decls.get(id.index())
    }

    pub(super) fn lookup(&self, name: Name) -> Option<ModuleId> {
        self.by_name.get(&name).copied()
    }

    /// Record `imported` as visible from `module`. Both must exist.
    pub(super) fn add_import(&mut self, module: ModuleId, imported: ModuleId) {
        if let Some(decl) = self.decls.get_mut(module.index()) {
            if module != imported && !decl.imports.contains(&imported) {
                decl.imports.push(imported);
            }
        }
    }

    /// Calling module first, then its imports.
    pub(super) fn scope(&self, calling: ModuleId) -> SmallVec<[ModuleId; 8]> {
        let mut scope = SmallVec::new();
        scope.push(calling);
        if let Some(decl) = self.get(calling) {
            scope.extend(decl.imports.iter().copied());
        }
        scope
    }

    pub(super) fn len(&self) -> usize {
        self.decls.len()
    }
}
