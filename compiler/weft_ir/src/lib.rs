//! Weft IR - shared vocabulary for the Weft resolution engine.
//!
//! This crate provides:
//! - Interned identifiers (`Name`, `StringInterner`, `SharedInterner`)
//! - Typed registry handles (`ModuleId`, `AtomId`, `InterfaceId`, ...)
//! - The closed `TypeTag` lattice used by dispatch and field typing
//! - Lens `Selector`s handed over by the loader as compiled access paths
//!
//! Everything here is plain data: no registry state, no evaluation.

mod ids;
mod interner;
mod name;
mod selector;
mod type_tag;

pub use ids::{AtomId, BodyId, ConversionId, FamilyId, InterfaceId, MethodId, ModuleId};
pub use interner::{SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use selector::Selector;
pub use type_tag::{InterfaceSet, Specificity, TypeTag};
