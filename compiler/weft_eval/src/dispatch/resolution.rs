//! The outcome of resolving a call, and applying it.

use smallvec::SmallVec;
use weft_ir::{BodyId, ConversionId, MethodId, ModuleId};
use weft_patterns::Value;

use crate::conversion::{self, MethodInvoker};
use crate::errors::DispatchError;
use crate::registry::Registry;

/// An argument slot of a call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Receiver,
    /// Explicit argument, zero-based.
    Arg(usize),
}

/// A conversion that must run on one position before the body is invoked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlannedConversion {
    pub position: Position,
    pub conversion: ConversionId,
}

/// The method a call resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub method: MethodId,
    pub module: ModuleId,
    pub body: BodyId,
    /// At most one per position, in position order.
    pub conversions: SmallVec<[PlannedConversion; 2]>,
}

/// A call ready for the host to run.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedCall {
    pub body: BodyId,
    pub receiver: Value,
    pub args: Vec<Value>,
}

impl Resolution {
    /// Whether the call matched without any conversion.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.conversions.is_empty()
    }

    /// Run the planned conversions and hand back the converted call.
    ///
    /// `args` must be the arguments the call was resolved with; a planned
    /// conversion for a missing argument is an error.
    pub fn apply(
        &self,
        registry: &Registry,
        invoker: &impl MethodInvoker,
        mut receiver: Value,
        mut args: Vec<Value>,
    ) -> Result<PreparedCall, DispatchError> {
        for planned in &self.conversions {
            let given = args.len();
            let slot = match planned.position {
                Position::Receiver => &mut receiver,
                Position::Arg(i) => args.get_mut(i).ok_or_else(|| {
                    DispatchError::ArgumentsMismatch {
                        method: registry.display_method(self.method),
                        position: i,
                        args: given,
                    }
                })?,
            };
            let value = std::mem::replace(slot, Value::Nothing);
            *slot = conversion::run(registry, invoker, planned.conversion, value)?;
        }
        Ok(PreparedCall {
            body: self.body,
            receiver,
            args,
        })
    }
}
