//! Load-phase registry construction.
//!
//! The loader declares modules, atoms, interfaces, methods and conversions in
//! any order its sources dictate, then calls `freeze`. Freezing validates
//! explicit conformance, materialises interface default bodies as methods,
//! and precomputes which atoms satisfy which interfaces. After that the
//! registry is immutable.

use rustc_hash::FxHashSet;
use tracing::debug;
use weft_ir::{
    AtomId, BodyId, ConversionId, FamilyId, InterfaceId, MethodId, ModuleId, Name, SharedInterner,
    TypeTag,
};
use weft_patterns::{AtomKind, IdentityCounter};

use super::atoms::AtomTable;
use super::conversions::ConversionTable;
use super::display::Names;
use super::interfaces::InterfaceTable;
use super::methods::MethodTable;
use super::modules::ModuleTable;
use super::{
    ConversionDecl, FieldSpec, InterfaceDecl, MethodDecl, MethodOrigin, Param, Registry,
    Requirement, VariantSpec,
};
use crate::errors::RegistryError;
use crate::SharedRegistry;

/// Mutable registry used during the load phase.
#[derive(Debug)]
pub struct RegistryBuilder {
    interner: SharedInterner,
    modules: ModuleTable,
    atoms: AtomTable,
    interfaces: InterfaceTable,
    methods: MethodTable,
    conversions: ConversionTable,
}

impl RegistryBuilder {
    /// Start a registry holding the `Builtins` module and its primitive atoms.
    pub fn new(interner: SharedInterner) -> Self {
        let mut builder = RegistryBuilder {
            interner,
            modules: ModuleTable::default(),
            atoms: AtomTable::default(),
            interfaces: InterfaceTable::default(),
            methods: MethodTable::default(),
            conversions: ConversionTable::default(),
        };
        let builtins = builder
            .modules
            .declare(builder.interner.intern("Builtins"));
        debug_assert_eq!(builtins, Some(ModuleId::BUILTINS));
        for (id, tag) in AtomId::BUILTINS {
            let tag = builder.interner.intern(tag);
            let variant = VariantSpec::new(tag, vec![]);
            let (_, atoms) = builder
                .atoms
                .push_family(ModuleId::BUILTINS, tag, vec![variant]);
            debug_assert_eq!(atoms, [id]);
        }
        builder
    }

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

    fn check_module(&self, module: ModuleId) -> Result<(), RegistryError> {
        if self.modules.get(module).is_some() {
            Ok(())
        } else {
            Err(RegistryError::UnknownModule {
                module: format!("{module:?}"),
            })
        }
    }

    fn check_interface(&self, interface: InterfaceId) -> Result<(), RegistryError> {
        if self.interfaces.get(interface).is_some() {
            Ok(())
        } else {
            Err(RegistryError::UnknownInterface {
                interface: format!("{interface:?}"),
            })
        }
    }

    fn check_atom(&self, atom: AtomId) -> Result<(), RegistryError> {
        if self.atoms.atom(atom).is_some() {
            Ok(())
        } else {
            Err(RegistryError::UnknownAtom {
                atom: format!("{atom:?}"),
            })
        }
    }

    /// Every interface a pattern mentions must be declared.
    fn check_type(&self, ty: &TypeTag) -> Result<(), RegistryError> {
        if let TypeTag::Interfaces(set) = ty {
            for interface in set.iter() {
                self.check_interface(interface)?;
            }
        }
        Ok(())
    }

    fn check_params(&self, params: &[Param]) -> Result<(), RegistryError> {
        params.iter().try_for_each(|p| self.check_type(&p.pattern))
    }

    pub fn declare_module(&mut self, name: Name) -> Result<ModuleId, RegistryError> {
        let id = self
            .modules
            .declare(name)
            .ok_or_else(|| RegistryError::DuplicateModule {
                module: self.names().name(name),
            })?;
        debug!(module = self.interner.lookup(name), "declared module");
        Ok(id)
    }

    /// Make `imported`'s methods visible to calls made from `module`.
    pub fn import(&mut self, module: ModuleId, imported: ModuleId) -> Result<(), RegistryError> {
        self.check_module(module)?;
        self.check_module(imported)?;
        self.modules.add_import(module, imported);
        Ok(())
    }

    /// Declare a standalone atom compared by field values.
    pub fn declare_atom(
        &mut self,
        module: ModuleId,
        tag: Name,
        fields: Vec<FieldSpec>,
    ) -> Result<AtomId, RegistryError> {
        self.declare_atom_of_kind(module, tag, AtomKind::Named, fields)
    }

    /// Declare a standalone atom compared by construction identity.
    pub fn declare_anonymous_atom(
        &mut self,
        module: ModuleId,
        tag: Name,
        fields: Vec<FieldSpec>,
    ) -> Result<AtomId, RegistryError> {
        self.declare_atom_of_kind(module, tag, AtomKind::Anonymous, fields)
    }

    fn declare_atom_of_kind(
        &mut self,
        module: ModuleId,
        tag: Name,
        kind: AtomKind,
        fields: Vec<FieldSpec>,
    ) -> Result<AtomId, RegistryError> {
        let variant = VariantSpec { tag, kind, fields };
        let (_, atoms) = self.declare_family(module, tag, vec![variant])?;
        Ok(atoms[0])
    }

    /// Declare a sum type and all of its variants.
    ///
    /// Returns the family and the variant atoms in declaration order.
    pub fn declare_family(
        &mut self,
        module: ModuleId,
        name: Name,
        variants: Vec<VariantSpec>,
    ) -> Result<(FamilyId, Vec<AtomId>), RegistryError> {
        self.check_module(module)?;
        let duplicate = |tag: Name| RegistryError::DuplicateAtomTag {
            module: self.names().module(module),
            tag: self.names().name(tag),
        };
        if !self.atoms.family_free(module, name) {
            return Err(duplicate(name));
        }
        for (i, variant) in variants.iter().enumerate() {
            let repeated = variants[..i].iter().any(|v| v.tag == variant.tag);
            if repeated || !self.atoms.tag_free(module, variant.tag) {
                return Err(duplicate(variant.tag));
            }
            for field in &variant.fields {
                self.check_type(&field.ty)?;
            }
        }
        let (family, atoms) = self.atoms.push_family(module, name, variants);
        debug!(
            family = self.interner.lookup(name),
            variants = atoms.len(),
            "declared atom family"
        );
        Ok((family, atoms))
    }

    pub fn declare_interface(
        &mut self,
        module: ModuleId,
        name: Name,
        supers: Vec<InterfaceId>,
        requirements: Vec<Requirement>,
    ) -> Result<InterfaceId, RegistryError> {
        self.check_module(module)?;
        for &sup in &supers {
            self.check_interface(sup)?;
        }
        for requirement in &requirements {
            self.check_params(&requirement.params)?;
        }
        let decl = InterfaceDecl {
            module,
            name,
            supers,
            requirements,
        };
        let id = self
            .interfaces
            .declare(decl)
            .ok_or_else(|| RegistryError::DuplicateInterface {
                module: self.names().module(module),
                interface: self.names().name(name),
            })?;
        debug!(interface = self.interner.lookup(name), "declared interface");
        Ok(id)
    }

    /// Declare that `atom` implements `interface` (and its supers).
    ///
    /// Checked at freeze: every requirement without a default must be met.
    pub fn confirm(&mut self, atom: AtomId, interface: InterfaceId) -> Result<(), RegistryError> {
        self.check_atom(atom)?;
        self.check_interface(interface)?;
        self.interfaces.confirm(atom, interface);
        Ok(())
    }

    pub fn declare_method(
        &mut self,
        module: ModuleId,
        name: Name,
        receiver: TypeTag,
        params: Vec<Param>,
        body: BodyId,
    ) -> Result<MethodId, RegistryError> {
        self.check_module(module)?;
        self.check_type(&receiver)?;
        self.check_params(&params)?;
        let decl = MethodDecl {
            module,
            name,
            receiver,
            params,
            body,
            origin: MethodOrigin::Declared,
        };
        self.insert_method(decl)
    }

    fn insert_method(&mut self, decl: MethodDecl) -> Result<MethodId, RegistryError> {
        let rendered = self.names().method(&decl);
        let module = decl.module;
        match self.methods.insert(decl) {
            Ok(id) => {
                debug!(method = %rendered, "declared method");
                Ok(id)
            }
            Err(_) => Err(RegistryError::DuplicateMethod {
                module: self.names().module(module),
                method: rendered,
            }),
        }
    }

    /// Register the conversion `source -> target`.
    ///
    /// Automatic conversion passes no explicit arguments, so every parameter
    /// after the converted value must have a default.
    pub fn declare_conversion(
        &mut self,
        module: ModuleId,
        source: AtomId,
        target: AtomId,
        params: Vec<Param>,
        body: BodyId,
    ) -> Result<ConversionId, RegistryError> {
        self.check_module(module)?;
        self.check_params(&params)?;
        let names = self.names();
        if let Some(param) = params.iter().find(|p| !p.has_default) {
            return Err(RegistryError::ConversionRequiresArguments {
                from: names.atom(source),
                to: names.atom(target),
                param: names.name(param.name),
            });
        }
        let (from, to) = (names.atom(source), names.atom(target));
        let decl = ConversionDecl {
            module,
            source,
            target,
            params,
            body,
        };
        match self.conversions.insert(decl) {
            Some(id) => {
                debug!(%from, %to, "declared conversion");
                Ok(id)
            }
            None => Err(RegistryError::DuplicateConversion { from, to }),
        }
    }

    /// Whether `atom` defines `requirement` itself: a method whose receiver
    /// is exactly the atom, or a field for zero-argument requirements.
    fn defines(&self, atom: AtomId, requirement: &Requirement) -> bool {
        let receiver = TypeTag::Atom(atom);
        let by_method = self.methods.named(requirement.name).iter().any(|&id| {
            self.methods
                .get(id)
                .is_some_and(|m| m.receiver == receiver && m.params.len() == requirement.params.len())
        });
        by_method
            || (requirement.params.is_empty()
                && self
                    .atoms
                    .atom(atom)
                    .is_some_and(|a| a.field_index(requirement.name).is_some()))
    }

    /// Turn default bodies into methods for every confirmed atom.
    fn materialise_defaults(&mut self) -> Result<(), RegistryError> {
        let confirmed = self.interfaces.confirmed().to_vec();
        for (atom, interface) in confirmed {
            let Some(decl) = self.interfaces.get(interface) else {
                continue;
            };
            let mut synthesised = Vec::new();
            for requirement in &decl.requirements {
                if self.defines(atom, requirement) {
                    continue;
                }
                let Some(body) = requirement.default else {
                    let names = self.names();
                    return Err(RegistryError::IncompleteConformance {
                        atom: names.atom(atom),
                        interface: names.interface(interface),
                        missing: names.name(requirement.name),
                    });
                };
                // The body lives with the interface that wrote it.
                synthesised.push(MethodDecl {
                    module: decl.module,
                    name: requirement.name,
                    receiver: TypeTag::Atom(atom),
                    params: requirement.params.clone(),
                    body,
                    origin: MethodOrigin::InterfaceDefault(interface),
                });
            }
            for method in synthesised {
                // Two confirmed interfaces may share a defaulted requirement;
                // the first one materialised wins.
                if let Err(existing) = self.methods.insert(method) {
                    debug!(?existing, "default body already materialised");
                }
            }
        }
        Ok(())
    }

    /// Every (atom, interface) pair where the atom satisfies the interface.
    ///
    /// Interfaces are visited in declaration order, so supers are decided
    /// before the interfaces that extend them.
    fn satisfaction(&self) -> FxHashSet<(AtomId, InterfaceId)> {
        let mut satisfied = FxHashSet::default();
        for (interface, decl) in self.interfaces.iter() {
            for (atom, _) in self.atoms.iter() {
                let supers_ok = decl
                    .supers
                    .iter()
                    .all(|&sup| satisfied.contains(&(atom, sup)));
                if supers_ok && decl.requirements.iter().all(|r| self.defines(atom, r)) {
                    satisfied.insert((atom, interface));
                }
            }
        }
        satisfied
    }

    /// Validate, materialise defaults and share the registry.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn freeze(mut self) -> Result<SharedRegistry<Registry>, RegistryError> {
        self.materialise_defaults()?;
        let satisfied = self.satisfaction();
        debug!(
            modules = self.modules.len(),
            atoms = self.atoms.len(),
            interfaces = self.interfaces.len(),
            methods = self.methods.len(),
            conversions = self.conversions.len(),
            satisfied = satisfied.len(),
            "registry frozen"
        );
        Ok(SharedRegistry::new(Registry {
            interner: self.interner,
            modules: self.modules,
            atoms: self.atoms,
            interfaces: self.interfaces,
            methods: self.methods,
            conversions: self.conversions,
            satisfied,
            identities: IdentityCounter::new(),
        }))
    }
}
