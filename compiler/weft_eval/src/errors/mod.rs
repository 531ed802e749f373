//! Error taxonomy for the resolution engine.
//!
//! Every error is a value carrying rendered context (module, names, candidate
//! list, tag actually found), so a host can build a diagnostic without
//! holding on to the registry. Codes follow the phase layout:
//!
//! - E4xxx: registry and construction errors (load time)
//! - E5xxx: dispatch errors
//! - E6xxx: conversion errors
//! - E7xxx: lens errors

use std::fmt;

use thiserror::Error;

/// Stable identifier of an engine error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Registry Errors (E4xxx)
    /// Atom tag declared twice in one module
    E4001,
    /// Wrong number of constructor arguments
    E4002,
    /// Constructor argument rejected by the declared field type
    E4003,
    /// Module declared twice
    E4004,
    /// Module handle or name not declared
    E4005,
    /// Interface declared twice in one module
    E4006,
    /// Interface handle not declared
    E4007,
    /// Method with the same key declared twice
    E4008,
    /// Conversion registered twice for one (source, target)
    E4009,
    /// Conversion needs explicit arguments
    E4010,
    /// Confirmed interface missing a required method
    E4011,
    /// Atom handle not declared
    E4012,

    // Dispatch Errors (E5xxx)
    /// Several equally specific candidates
    E5001,
    /// No candidate accepts the call
    E5002,
    /// Call names an undeclared module
    E5003,
    /// Explicit module argument in static-module mode
    E5004,
    /// Conversion failed while dispatching
    E5005,
    /// Resolution applied to arguments it was not resolved for
    E5006,

    // Conversion Errors (E6xxx)
    /// No conversion registered
    E6001,
    /// Several conversions apply
    E6002,
    /// The converter body failed
    E6003,

    // Lens Errors (E7xxx)
    /// Strict update across a variant or through a missing step
    E7001,
    /// Replacement value rejected by the declared field type
    E7002,
    /// Malformed access path
    E7003,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [ErrorCode; 24] = [
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E4004,
        ErrorCode::E4005,
        ErrorCode::E4006,
        ErrorCode::E4007,
        ErrorCode::E4008,
        ErrorCode::E4009,
        ErrorCode::E4010,
        ErrorCode::E4011,
        ErrorCode::E4012,
        ErrorCode::E5001,
        ErrorCode::E5002,
        ErrorCode::E5003,
        ErrorCode::E5004,
        ErrorCode::E5005,
        ErrorCode::E5006,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E7001,
        ErrorCode::E7002,
        ErrorCode::E7003,
    ];

    /// Get the code as a string (e.g., "E5001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
            ErrorCode::E4008 => "E4008",
            ErrorCode::E4009 => "E4009",
            ErrorCode::E4010 => "E4010",
            ErrorCode::E4011 => "E4011",
            ErrorCode::E4012 => "E4012",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E5005 => "E5005",
            ErrorCode::E5006 => "E5006",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E7001 => "E7001",
            ErrorCode::E7002 => "E7002",
            ErrorCode::E7003 => "E7003",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while declaring into the registry or constructing atoms.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("atom `{tag}` is already declared in module `{module}`")]
    DuplicateAtomTag { module: String, tag: String },

    #[error("`{atom}` takes {expected} field(s), found {found}")]
    FieldCountMismatch {
        atom: String,
        expected: usize,
        found: usize,
    },

    #[error("field `{field}` of `{atom}` expects `{expected}`, found `{found}`")]
    FieldTypeMismatch {
        atom: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("module `{module}` is already declared")]
    DuplicateModule { module: String },

    #[error("unknown module `{module}`")]
    UnknownModule { module: String },

    #[error("interface `{interface}` is already declared in module `{module}`")]
    DuplicateInterface { module: String, interface: String },

    #[error("unknown interface `{interface}`")]
    UnknownInterface { interface: String },

    #[error("method `{method}` is already declared in module `{module}`")]
    DuplicateMethod { module: String, method: String },

    #[error("a conversion from `{from}` to `{to}` is already registered")]
    DuplicateConversion { from: String, to: String },

    #[error(
        "conversion from `{from}` to `{to}` needs argument `{param}`; \
         extra conversion parameters must have defaults"
    )]
    ConversionRequiresArguments {
        from: String,
        to: String,
        param: String,
    },

    #[error("`{atom}` is declared to implement `{interface}` but does not define `{missing}`")]
    IncompleteConformance {
        atom: String,
        interface: String,
        missing: String,
    },

    #[error("unknown atom `{atom}`")]
    UnknownAtom { atom: String },
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::DuplicateAtomTag { .. } => ErrorCode::E4001,
            RegistryError::FieldCountMismatch { .. } => ErrorCode::E4002,
            RegistryError::FieldTypeMismatch { .. } => ErrorCode::E4003,
            RegistryError::DuplicateModule { .. } => ErrorCode::E4004,
            RegistryError::UnknownModule { .. } => ErrorCode::E4005,
            RegistryError::DuplicateInterface { .. } => ErrorCode::E4006,
            RegistryError::UnknownInterface { .. } => ErrorCode::E4007,
            RegistryError::DuplicateMethod { .. } => ErrorCode::E4008,
            RegistryError::DuplicateConversion { .. } => ErrorCode::E4009,
            RegistryError::ConversionRequiresArguments { .. } => ErrorCode::E4010,
            RegistryError::IncompleteConformance { .. } => ErrorCode::E4011,
            RegistryError::UnknownAtom { .. } => ErrorCode::E4012,
        }
    }
}

/// Errors raised by automatic or explicit conversion.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("no conversion from `{from}` to `{to}`")]
    NoConversion { from: String, to: String },

    #[error(
        "ambiguous conversion from `{from}` to `{to}`: candidates are {}",
        .candidates.join(", ")
    )]
    AmbiguousConversion {
        from: String,
        to: String,
        candidates: Vec<String>,
    },

    #[error("conversion from `{from}` to `{to}` failed: {message}")]
    ConverterFailed {
        from: String,
        to: String,
        message: String,
    },
}

impl ConversionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConversionError::NoConversion { .. } => ErrorCode::E6001,
            ConversionError::AmbiguousConversion { .. } => ErrorCode::E6002,
            ConversionError::ConverterFailed { .. } => ErrorCode::E6003,
        }
    }
}

/// Errors raised while resolving a call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(
        "ambiguous call to `{method}`: candidates are {}",
        .candidates.join(", ")
    )]
    AmbiguousMethod {
        method: String,
        candidates: Vec<String>,
    },

    #[error(
        "no method `{method}` accepts receiver `{receiver}` with argument(s) ({})",
        .args.join(", ")
    )]
    NoMatchingMethod {
        method: String,
        receiver: String,
        args: Vec<String>,
    },

    #[error("unknown module `{module}`")]
    UnknownModule { module: String },

    #[error("explicit module `{module}` is not allowed in static-module dispatch")]
    ExplicitModuleDisabled { module: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(
        "call to `{method}` plans a conversion for argument {position}, \
         but only {args} argument(s) were given"
    )]
    ArgumentsMismatch {
        method: String,
        position: usize,
        args: usize,
    },
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::AmbiguousMethod { .. } => ErrorCode::E5001,
            DispatchError::NoMatchingMethod { .. } => ErrorCode::E5002,
            DispatchError::UnknownModule { .. } => ErrorCode::E5003,
            DispatchError::ExplicitModuleDisabled { .. } => ErrorCode::E5004,
            DispatchError::Conversion(_) => ErrorCode::E5005,
            DispatchError::ArgumentsMismatch { .. } => ErrorCode::E5006,
        }
    }
}

/// Errors raised by strict lens updates and path compilation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LensError {
    #[error("cannot update `{path}` strictly: {reason} at `{found}`")]
    LensVariantMismatch {
        path: String,
        found: String,
        reason: String,
    },

    #[error("field `{field}` expects `{expected}`, found `{found}`")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl LensError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LensError::LensVariantMismatch { .. } => ErrorCode::E7001,
            LensError::FieldTypeMismatch { .. } => ErrorCode::E7002,
            LensError::InvalidPath { .. } => ErrorCode::E7003,
        }
    }
}
