//! The frozen registry: modules, atoms, interfaces, methods, conversions.
//!
//! Built once by `RegistryBuilder`, then shared read-only through
//! `SharedRegistry<Registry>`. Every query here is a pure read; the only
//! interior state is the atomic counter minting identity tokens.
//!
//! ```text
//! RegistryBuilder::new(interner)
//!     .declare_module / declare_atom / declare_family
//!     .declare_interface / confirm
//!     .declare_method / declare_conversion
//!     .freeze()  ->  SharedRegistry<Registry>
//! ```

mod atoms;
mod builder;
mod conversions;
mod display;
mod interfaces;
mod methods;
mod modules;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use weft_ir::{
    AtomId, ConversionId, FamilyId, InterfaceId, MethodId, ModuleId, Name, SharedInterner,
    TypeTag,
};
use weft_patterns::{AtomValue, FieldLayout, IdentityCounter, IdentityToken, Value};

pub use atoms::{AtomDecl, FamilyDecl, FieldSpec, VariantSpec};
pub use builder::RegistryBuilder;
pub use conversions::ConversionDecl;
pub use interfaces::{InterfaceDecl, Requirement};
pub use methods::{MethodDecl, MethodKey, MethodOrigin, Param};
pub use modules::ModuleDecl;

use atoms::AtomTable;
use conversions::ConversionTable;
use display::Names;
use interfaces::InterfaceTable;
use methods::MethodTable;
use modules::ModuleTable;

use crate::errors::{ConversionError, RegistryError};

/// Immutable registry consulted by dispatch, conversion and lenses.
#[derive(Debug)]
pub struct Registry {
    interner: SharedInterner,
    modules: ModuleTable,
    atoms: AtomTable,
    interfaces: InterfaceTable,
    methods: MethodTable,
    conversions: ConversionTable,
    satisfied: FxHashSet<(AtomId, InterfaceId)>,
    identities: IdentityCounter,
}

impl Registry {
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    fn names(&self) -> Names<'_> {
        Names {
            interner: &self.interner,
            modules: &self.modules,
            atoms: &self.atoms,
            interfaces: &self.interfaces,
        }
    }

    // Modules

    pub fn module(&self, id: ModuleId) -> Option<&ModuleDecl> {
        self.modules.get(id)
    }

    pub fn module_named(&self, name: Name) -> Option<ModuleId> {
        self.modules.lookup(name)
    }

    /// Modules whose methods a call from `calling` sees, calling module first.
    pub fn scope(&self, calling: ModuleId) -> SmallVec<[ModuleId; 8]> {
        self.modules.scope(calling)
    }

    // Atoms

    pub fn atom(&self, id: AtomId) -> Option<&AtomDecl> {
        self.atoms.atom(id)
    }

    pub fn atom_named(&self, module: ModuleId, tag: Name) -> Option<AtomId> {
        self.atoms.lookup(module, tag)
    }

    pub fn family(&self, id: FamilyId) -> Option<&FamilyDecl> {
        self.atoms.family(id)
    }

    pub fn family_named(&self, module: ModuleId, name: Name) -> Option<FamilyId> {
        self.atoms.lookup_family(module, name)
    }

    /// Declared fields of `atom`, in order.
    pub fn shape(&self, atom: AtomId) -> Option<&[FieldSpec]> {
        self.atoms.atom(atom).map(|a| a.fields.as_slice())
    }

    /// Position of `field` in `atom`'s declaration.
    pub fn field_index(&self, atom: AtomId, field: Name) -> Option<usize> {
        self.atoms.atom(atom)?.field_index(field)
    }

    /// Number of sibling variants of `atom`, itself included.
    pub fn family_arity(&self, atom: AtomId) -> usize {
        self.atoms
            .atom(atom)
            .and_then(|a| self.atoms.family(a.family))
            .map_or(0, |f| f.variants.len())
    }

    /// Constructor tag of the atom `value` is an instance of.
    pub fn tag_of(&self, value: &Value) -> Name {
        match value {
            Value::Atom(atom) => atom.tag(),
            other => self
                .atoms
                .atom(other.atom_id())
                .map_or(Name::EMPTY, |a| a.tag),
        }
    }

    /// Build an instance of `atom`, checking arity and each field's type.
    ///
    /// Every construction mints a fresh identity token. Builtin atoms carry
    /// their payload outside of fields; only `Nothing` is constructible here.
    #[tracing::instrument(level = "trace", skip_all, fields(atom = ?atom))]
    pub fn construct(&self, atom: AtomId, fields: Vec<Value>) -> Result<Value, RegistryError> {
        let names = self.names();
        let decl = self.atoms.atom(atom).ok_or_else(|| RegistryError::UnknownAtom {
            atom: names.atom(atom),
        })?;
        if atom.is_builtin() {
            let expected = usize::from(atom != AtomId::NOTHING);
            if expected == 0 && fields.is_empty() {
                return Ok(Value::Nothing);
            }
            return Err(RegistryError::FieldCountMismatch {
                atom: names.name(decl.tag),
                expected,
                found: fields.len(),
            });
        }
        if fields.len() != decl.fields.len() {
            return Err(RegistryError::FieldCountMismatch {
                atom: names.name(decl.tag),
                expected: decl.fields.len(),
                found: fields.len(),
            });
        }
        for (spec, value) in decl.fields.iter().zip(&fields) {
            let found = value.type_tag();
            if !self.is_subtype(&found, &spec.ty) {
                return Err(RegistryError::FieldTypeMismatch {
                    atom: names.name(decl.tag),
                    field: names.name(spec.name),
                    expected: names.ty(&spec.ty),
                    found: names.ty(&found),
                });
            }
        }
        let identity = self.mint_identity();
        tracing::trace!(identity = identity.raw(), "constructed atom");
        Ok(Value::Atom(AtomValue::new(
            atom, decl.tag, decl.kind, identity, fields,
        )))
    }

    /// Fresh identity token for a new or rebuilt atom.
    pub(crate) fn mint_identity(&self) -> IdentityToken {
        self.identities.next()
    }

    /// Number of atoms constructed or rebuilt so far.
    pub fn constructions(&self) -> u64 {
        self.identities.minted()
    }

    // Interfaces

    pub fn interface(&self, id: InterfaceId) -> Option<&InterfaceDecl> {
        self.interfaces.get(id)
    }

    pub fn interface_named(&self, module: ModuleId, name: Name) -> Option<InterfaceId> {
        self.interfaces.lookup(module, name)
    }

    /// Whether `atom` satisfies `interface`.
    #[inline]
    pub fn satisfies(&self, atom: AtomId, interface: InterfaceId) -> bool {
        self.satisfied.contains(&(atom, interface))
    }

    /// Whether `actual <: pattern`.
    pub fn is_subtype(&self, actual: &TypeTag, pattern: &TypeTag) -> bool {
        pattern.accepts_with(actual, |atom, interface| self.satisfies(atom, interface))
    }

    // Methods

    pub fn method(&self, id: MethodId) -> Option<&MethodDecl> {
        self.methods.get(id)
    }

    /// Every method called `name`, across all modules, in declaration order.
    pub fn methods_named(&self, name: Name) -> impl Iterator<Item = (MethodId, &MethodDecl)> {
        self.methods
            .named(name)
            .iter()
            .filter_map(move |&id| self.methods.get(id).map(|m| (id, m)))
    }

    // Conversions

    pub fn conversion(&self, id: ConversionId) -> Option<&ConversionDecl> {
        self.conversions.get(id)
    }

    /// Pick the conversion turning a `source` value into something `target`
    /// accepts.
    ///
    /// An exact (source, target) registration wins; otherwise every
    /// conversion out of `source` whose target atom `target` accepts is a
    /// candidate, and there must be exactly one.
    pub fn find_conversion(
        &self,
        source: AtomId,
        target: &TypeTag,
    ) -> Result<ConversionId, ConversionError> {
        if let Some(exact) = target
            .as_atom()
            .and_then(|t| self.conversions.exact(source, t))
        {
            return Ok(exact);
        }
        let candidates: SmallVec<[ConversionId; 2]> = self
            .conversions
            .out_of(source)
            .iter()
            .copied()
            .filter(|&id| {
                self.conversions
                    .get(id)
                    .is_some_and(|c| self.is_subtype(&TypeTag::Atom(c.target), target))
            })
            .collect();
        let names = self.names();
        match candidates.as_slice() {
            [] => Err(ConversionError::NoConversion {
                from: names.atom(source),
                to: names.ty(target),
            }),
            [only] => Ok(*only),
            many => Err(ConversionError::AmbiguousConversion {
                from: names.atom(source),
                to: names.ty(target),
                candidates: many
                    .iter()
                    .filter_map(|&id| self.conversions.get(id))
                    .map(|c| names.atom(c.target))
                    .collect(),
            }),
        }
    }

    // Rendering

    /// Render a type for diagnostics (`Int`, `HasName & HasPhone`, `Any`).
    pub fn display_type(&self, ty: &TypeTag) -> String {
        self.names().ty(ty)
    }

    /// Render a method signature for diagnostics.
    pub fn display_method(&self, id: MethodId) -> String {
        self.methods
            .get(id)
            .map_or_else(|| format!("{id:?}"), |m| self.names().method(m))
    }

    pub fn display_module(&self, id: ModuleId) -> String {
        self.names().module(id)
    }

    pub fn display_name(&self, name: Name) -> String {
        self.names().name(name)
    }
}

impl FieldLayout for Registry {
    fn field_index(&self, atom: AtomId, field: Name) -> Option<usize> {
        Registry::field_index(self, atom, field)
    }
}
