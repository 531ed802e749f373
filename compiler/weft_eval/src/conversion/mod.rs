//! Running conversions.
//!
//! Picking a conversion is a registry query (`Registry::find_conversion`).
//! Running it needs the host evaluator, reached through `MethodInvoker`.

use weft_ir::{BodyId, ConversionId, TypeTag};
use weft_patterns::Value;

use crate::errors::ConversionError;
use crate::registry::Registry;

/// Seam through which the engine asks the host to run a method body.
///
/// Arguments are the explicit ones only; the host fills in defaults for any
/// trailing parameters left out.
pub trait MethodInvoker {
    fn invoke(&self, body: BodyId, receiver: Value, args: &[Value]) -> Result<Value, String>;
}

impl<F> MethodInvoker for F
where
    F: Fn(BodyId, Value, &[Value]) -> Result<Value, String>,
{
    fn invoke(&self, body: BodyId, receiver: Value, args: &[Value]) -> Result<Value, String> {
        self(body, receiver, args)
    }
}

/// Convert `value` so that `target` accepts it.
///
/// A value `target` already accepts is returned unchanged.
#[tracing::instrument(level = "trace", skip_all)]
pub fn convert(
    registry: &Registry,
    invoker: &impl MethodInvoker,
    value: Value,
    target: &TypeTag,
) -> Result<Value, ConversionError> {
    if registry.is_subtype(&value.type_tag(), target) {
        return Ok(value);
    }
    let id = registry.find_conversion(value.atom_id(), target)?;
    run(registry, invoker, id, value)
}

/// Run one registered conversion on `value`, with no explicit arguments.
pub(crate) fn run(
    registry: &Registry,
    invoker: &impl MethodInvoker,
    id: ConversionId,
    value: Value,
) -> Result<Value, ConversionError> {
    let Some(decl) = registry.conversion(id) else {
        return Err(ConversionError::NoConversion {
            from: registry.display_type(&value.type_tag()),
            to: format!("{id:?}"),
        });
    };
    let source = TypeTag::Atom(decl.source);
    let target = TypeTag::Atom(decl.target);
    let failed = |message: String| ConversionError::ConverterFailed {
        from: registry.display_type(&source),
        to: registry.display_type(&target),
        message,
    };
    tracing::trace!(conversion = ?id, "running conversion");
    let converted = invoker.invoke(decl.body, value, &[]).map_err(failed)?;
    let produced = converted.type_tag();
    if !registry.is_subtype(&produced, &target) {
        return Err(failed(format!(
            "converter returned `{}`",
            registry.display_type(&produced)
        )));
    }
    Ok(converted)
}
