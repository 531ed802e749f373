//! Rendering of registry entities for error messages.

use weft_ir::{AtomId, InterfaceId, ModuleId, Name, StringInterner, TypeTag};

use super::atoms::AtomTable;
use super::interfaces::InterfaceTable;
use super::modules::ModuleTable;
use super::MethodDecl;

/// Borrowed view over the tables needed to turn ids into text.
pub(super) struct Names<'a> {
    pub(super) interner: &'a StringInterner,
    pub(super) modules: &'a ModuleTable,
    pub(super) atoms: &'a AtomTable,
    pub(super) interfaces: &'a InterfaceTable,
}

impl Names<'_> {
    pub(super) fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_owned()
    }

    pub(super) fn module(&self, id: ModuleId) -> String {
        self.modules
            .get(id)
            .map_or_else(|| format!("{id:?}"), |m| self.name(m.name))
    }

    pub(super) fn atom(&self, id: AtomId) -> String {
        self.atoms
            .atom(id)
            .map_or_else(|| format!("{id:?}"), |a| self.name(a.tag))
    }

    pub(super) fn interface(&self, id: InterfaceId) -> String {
        self.interfaces
            .get(id)
            .map_or_else(|| format!("{id:?}"), |i| self.name(i.name))
    }

    /// `Int`, `HasName & HasPhone`, `Any`, `Dynamic`.
    pub(super) fn ty(&self, ty: &TypeTag) -> String {
        match ty {
            TypeTag::Atom(atom) => self.atom(*atom),
            TypeTag::Interfaces(set) if set.is_empty() => "Any".to_owned(),
            TypeTag::Interfaces(set) => set
                .iter()
                .map(|i| self.interface(i))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeTag::Dynamic => "Dynamic".to_owned(),
            TypeTag::Any => "Any".to_owned(),
        }
    }

    /// `Module.name(self: Receiver, p: Pattern, q: Pattern = _)`.
    pub(super) fn method(&self, decl: &MethodDecl) -> String {
        let mut out = format!(
            "{}.{}(self: {}",
            self.module(decl.module),
            self.name(decl.name),
            self.ty(&decl.receiver)
        );
        for param in &decl.params {
            out.push_str(", ");
            out.push_str(self.interner.lookup(param.name));
            out.push_str(": ");
            out.push_str(&self.ty(&param.pattern));
            if param.has_default {
                out.push_str(" = _");
            }
        }
        out.push(')');
        out
    }
}
