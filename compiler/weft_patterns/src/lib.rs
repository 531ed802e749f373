//! Weft Patterns - runtime values and pattern matching.
//!
//! This crate provides:
//! - Runtime values (`Value`, `AtomValue`, `Heap`)
//! - Identity tokens for atom instances (`IdentityToken`, `IdentityCounter`)
//! - The three matching strategies (constructor, position, name) over the same
//!   value representation, consumed by dispatch and the lens engine
//!
//! # Value Sharing
//!
//! Values are immutable. Every heap allocation goes through `Value::` or
//! `AtomValue::` factories, which wrap it in `Heap<T>` (an `Arc` newtype), so
//! updating one field of a nested atom shares every untouched sibling.

mod pattern;
mod value;

pub use pattern::{FieldLayout, MatchOutcome, NamedField, Pattern};
pub use value::{
    AtomKind, AtomValue, Heap, IdentityCounter, IdentityToken, Value, ValueDisplay,
};
