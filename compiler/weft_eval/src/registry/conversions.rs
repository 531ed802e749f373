//! Registered conversions, keyed by (source atom, target atom).

use rustc_hash::FxHashMap;
use weft_ir::{AtomId, BodyId, ConversionId, ModuleId};

use super::Param;

/// A conversion from one atom to another.
///
/// `params` are the converter's parameters after the converted value; all of
/// them have defaults, since automatic conversion passes no arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionDecl {
    pub module: ModuleId,
    pub source: AtomId,
    pub target: AtomId,
    pub params: Vec<Param>,
    pub body: BodyId,
}

#[derive(Clone, Debug, Default)]
pub(super) struct ConversionTable {
    decls: Vec<ConversionDecl>,
    by_key: FxHashMap<(AtomId, AtomId), ConversionId>,
    by_source: FxHashMap<AtomId, Vec<ConversionId>>,
}

impl ConversionTable {
    /// Append a conversion; `None` if its key is taken.
    pub(super) fn insert(&mut self, decl: ConversionDecl) -> Option<ConversionId> {
        let key = (decl.source, decl.target);
        if self.by_key.contains_key(&key) {
            return None;
        }
        let id = ConversionId::next_for(self.decls.len())
            .unwrap_or_else(|| panic!("conversion table overflow"));
        self.by_source.entry(decl.source).or_default().push(id);
        self.by_key.insert(key, id);
        self.decls.push(decl);
        Some(id)
    }

    pub(super) fn get(&self, id: ConversionId) -> Option<&ConversionDecl> {
        self.decls.get(id.index())
    }

    pub(super) fn exact(&self, source: AtomId, target: AtomId) -> Option<ConversionId> {
        self.by_key.get(&(source, target)).copied()
    }

    /// Every conversion out of `source`, in registration order.
    pub(super) fn out_of(&self, source: AtomId) -> &[ConversionId] {
        self.by_source.get(&source).map_or(&[][..], Vec::as_slice)
    }

    pub(super) fn len(&self) -> usize {
        self.decls.len()
    }
}
