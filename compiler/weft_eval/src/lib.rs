//! Weft Eval - the resolution engine.
//!
//! This crate provides:
//! - The registries (`RegistryBuilder` for the load phase, `Registry` once frozen)
//! - Method dispatch (`Dispatcher`, `CallSite`, `Resolution`)
//! - Automatic and explicit conversion (`convert`, `MethodInvoker`)
//! - Lenses: compiled access paths with `get`, `set_strict` and `set_safe`
//! - The error taxonomy (`RegistryError`, `DispatchError`, `ConversionError`,
//!   `LensError`) and its `ErrorCode`s
//!
//! # Lifecycle
//!
//! Declarations are appended during a single-threaded load phase, then
//! `RegistryBuilder::freeze` validates them and hands back a
//! `SharedRegistry<Registry>`. Dispatch and lenses only read it, so any
//! number of threads may resolve calls concurrently.
//!
//! # Method bodies
//!
//! The engine never evaluates code. It decides *which* body runs and which
//! conversions must run first; the host evaluator executes bodies through the
//! `MethodInvoker` trait.

mod conversion;
mod dispatch;
pub mod errors;
mod lens;
mod registry;
mod shared;

use std::sync::Once;

pub use conversion::{convert, MethodInvoker};
pub use dispatch::{
    CallSite, DispatchMode, Dispatcher, PlannedConversion, Position, PreparedCall, Resolution,
};
pub use errors::{ConversionError, DispatchError, ErrorCode, LensError, RegistryError};
pub use lens::Lens;
pub use registry::{
    AtomDecl, ConversionDecl, FamilyDecl, FieldSpec, InterfaceDecl, MethodDecl, MethodKey,
    MethodOrigin, ModuleDecl, Param, Registry, RegistryBuilder, Requirement, VariantSpec,
};
pub use shared::SharedRegistry;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing if `RUST_LOG` is unset, and only ever runs once per process,
/// so every test and host entry point may call it.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have installed its own subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
