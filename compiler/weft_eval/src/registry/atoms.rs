//! Atom shapes and the families (sum types) grouping them.

use rustc_hash::FxHashMap;
use weft_ir::{AtomId, FamilyId, ModuleId, Name, TypeTag};
use weft_patterns::AtomKind;

/// A declared field: name plus the type every value stored there must have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: Name,
    pub ty: TypeTag,
}

impl FieldSpec {
    pub fn new(name: Name, ty: TypeTag) -> Self {
        FieldSpec { name, ty }
    }
}

/// One constructor of a family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSpec {
    pub tag: Name,
    pub kind: AtomKind,
    pub fields: Vec<FieldSpec>,
}

impl VariantSpec {
    /// A named (structurally compared) variant.
    pub fn new(tag: Name, fields: Vec<FieldSpec>) -> Self {
        VariantSpec {
            tag,
            kind: AtomKind::Named,
            fields,
        }
    }
}

/// A declared atom shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomDecl {
    pub module: ModuleId,
    pub tag: Name,
    pub kind: AtomKind,
    pub family: FamilyId,
    pub fields: Vec<FieldSpec>,
}

impl AtomDecl {
    /// Position of the field called `name`.
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A sum type: the closed set of sibling atoms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyDecl {
    pub module: ModuleId,
    pub name: Name,
    pub variants: Vec<AtomId>,
}

#[derive(Clone, Debug, Default)]
pub(super) struct AtomTable {
    atoms: Vec<AtomDecl>,
    families: Vec<FamilyDecl>,
    by_tag: FxHashMap<(ModuleId, Name), AtomId>,
    family_by_name: FxHashMap<(ModuleId, Name), FamilyId>,
}

impl AtomTable {
    /// Whether `tag` is free for an atom in `module`.
    pub(super) fn tag_free(&self, module: ModuleId, tag: Name) -> bool {
        !self.by_tag.contains_key(&(module, tag))
    }

    pub(super) fn family_free(&self, module: ModuleId, name: Name) -> bool {
        !self.family_by_name.contains_key(&(module, name))
    }

    /// Append a family and its variants. Names must already be checked free.
    pub(super) fn push_family(
        &mut self,
        module: ModuleId,
        name: Name,
        variants: Vec<VariantSpec>,
    ) -> (FamilyId, Vec<AtomId>) {
        let family = FamilyId::next_for(self.families.len())
            .unwrap_or_else(|| panic!("family table overflow"));
        let mut ids = Vec::with_capacity(variants.len());
        for variant in variants {
            let id =
                AtomId::next_for(self.atoms.len()).unwrap_or_else(|| panic!("atom table overflow"));
            self.by_tag.insert((module, variant.tag), id);
            self.atoms.push(AtomDecl {
                module,
                tag: variant.tag,
                kind: variant.kind,
                family,
                fields: variant.fields,
            });
            ids.push(id);
        }
        self.families.push(FamilyDecl {
            module,
            name,
            variants: ids.clone(),
        });
        self.family_by_name.insert((module, name), family);
        (family, ids)
    }

    pub(super) fn atom(&self, id: AtomId) -> Option<&AtomDecl> {
        self.atoms.get(id.index())
    }

    pub(super) fn family(&self, id: FamilyId) -> Option<&FamilyDecl> {
        self.families.get(id.index())
    }

    pub(super) fn lookup(&self, module: ModuleId, tag: Name) -> Option<AtomId> {
        self.by_tag.get(&(module, tag)).copied()
    }

    pub(super) fn lookup_family(&self, module: ModuleId, name: Name) -> Option<FamilyId> {
        self.family_by_name.get(&(module, name)).copied()
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (AtomId, &AtomDecl)> {
        (0u32..).map(AtomId::from_raw).zip(self.atoms.iter())
    }

    pub(super) fn len(&self) -> usize {
        self.atoms.len()
    }
}
