//! Call resolution.
//!
//! `resolve(callingModule, explicitModule, receiver, name, args)`:
//!
//! 1. Take the runtime `TypeTag` of the receiver and each argument.
//! 2. Build the module scope: the explicit module alone, or the calling
//!    module followed by its imports.
//! 3. Keep methods in scope with a matching name and an arity that fits the
//!    supplied arguments (trailing defaulted parameters may be omitted).
//! 4. Keep those whose patterns accept the actual types and rank them by
//!    specificity (`rank`).
//! 5. If none accepted directly, retry with at most one conversion per
//!    rejected position, receiver included.
//!
//! The dispatcher only reads the frozen registry, so it is `Send + Sync` and
//! cheap to clone.

mod mode;
mod rank;
mod resolution;

use smallvec::{smallvec, SmallVec};
use tracing::trace;
use weft_ir::{MethodId, ModuleId, Name, TypeTag};
use weft_patterns::Value;

pub use mode::DispatchMode;
pub use resolution::{PlannedConversion, Position, PreparedCall, Resolution};

use rank::Candidate;

use crate::conversion::{self, MethodInvoker};
use crate::errors::{ConversionError, DispatchError};
use crate::registry::{MethodDecl, Registry};
use crate::SharedRegistry;

/// A call to resolve.
#[derive(Copy, Clone, Debug)]
pub struct CallSite<'a> {
    /// Module the call is written in.
    pub calling: ModuleId,
    /// Module named by the caller (`inc A 5`), if any.
    pub explicit_module: Option<ModuleId>,
    pub receiver: &'a Value,
    pub method: Name,
    pub args: &'a [Value],
}

impl<'a> CallSite<'a> {
    pub fn new(calling: ModuleId, receiver: &'a Value, method: Name, args: &'a [Value]) -> Self {
        CallSite {
            calling,
            explicit_module: None,
            receiver,
            method,
            args,
        }
    }

    /// Restrict resolution to methods owned by `module`.
    #[must_use]
    pub fn in_module(mut self, module: ModuleId) -> Self {
        self.explicit_module = Some(module);
        self
    }
}

/// Resolves calls against a frozen registry.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: SharedRegistry<Registry>,
    mode: DispatchMode,
}

/// Runtime types at a call site.
struct Actuals {
    receiver: TypeTag,
    args: SmallVec<[TypeTag; 4]>,
}

impl Dispatcher {
    pub fn new(registry: SharedRegistry<Registry>) -> Self {
        Self::with_mode(registry, DispatchMode::default())
    }

    pub fn with_mode(registry: SharedRegistry<Registry>, mode: DispatchMode) -> Self {
        Dispatcher { registry, mode }
    }

    pub fn registry(&self) -> &SharedRegistry<Registry> {
        &self.registry
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Resolve `site` to a single method and the conversions it needs.
    #[tracing::instrument(level = "trace", skip_all, fields(method = ?site.method))]
    pub fn resolve(&self, site: &CallSite<'_>) -> Result<Resolution, DispatchError> {
        let registry = &*self.registry;
        let actuals = Actuals {
            receiver: site.receiver.type_tag(),
            args: site.args.iter().map(Value::type_tag).collect(),
        };
        let scope = self.scope(site)?;
        let in_scope: SmallVec<[(MethodId, &MethodDecl); 8]> = registry
            .methods_named(site.method)
            .filter(|(_, m)| scope.contains(&m.module) && m.accepts_arity(site.args.len()))
            .collect();
        trace!(candidates = in_scope.len(), ?scope, "collected candidates");

        let direct: Vec<Candidate<'_>> = in_scope
            .iter()
            .filter(|(_, m)| self.accepts(m, &actuals))
            .map(|&(id, decl)| Candidate {
                id,
                decl,
                conversions: SmallVec::new(),
            })
            .collect();
        if !direct.is_empty() {
            return self.pick(site, &direct);
        }

        let mut ambiguity = None;
        let mut converted = Vec::new();
        for &(id, decl) in &in_scope {
            match self.plan_conversions(decl, &actuals) {
                Ok(conversions) => converted.push(Candidate {
                    id,
                    decl,
                    conversions,
                }),
                Err(err @ ConversionError::AmbiguousConversion { .. }) => {
                    ambiguity.get_or_insert(err);
                }
                Err(err) => trace!(%err, "candidate rejected"),
            }
        }
        if !converted.is_empty() {
            return self.pick(site, &converted);
        }
        if let Some(err) = ambiguity {
            return Err(err.into());
        }
        Err(DispatchError::NoMatchingMethod {
            method: registry.display_name(site.method),
            receiver: registry.display_type(&actuals.receiver),
            args: actuals
                .args
                .iter()
                .map(|t| registry.display_type(t))
                .collect(),
        })
    }

    /// Resolve `site`, then run the conversions it needs.
    pub fn prepare(
        &self,
        site: &CallSite<'_>,
        invoker: &impl MethodInvoker,
    ) -> Result<PreparedCall, DispatchError> {
        let resolution = self.resolve(site)?;
        resolution.apply(
            &self.registry,
            invoker,
            site.receiver.clone(),
            site.args.to_vec(),
        )
    }

    /// Convert `value` so that `target` accepts it.
    pub fn convert(
        &self,
        invoker: &impl MethodInvoker,
        value: Value,
        target: &TypeTag,
    ) -> Result<Value, ConversionError> {
        conversion::convert(&self.registry, invoker, value, target)
    }

    /// Modules whose methods the call may resolve to, in priority order.
    fn scope(&self, site: &CallSite<'_>) -> Result<SmallVec<[ModuleId; 8]>, DispatchError> {
        let registry = &*self.registry;
        if let Some(explicit) = site.explicit_module {
            if !self.mode.allows_explicit_module() {
                return Err(DispatchError::ExplicitModuleDisabled {
                    module: registry.display_module(explicit),
                });
            }
            if registry.module(explicit).is_none() {
                return Err(DispatchError::UnknownModule {
                    module: registry.display_module(explicit),
                });
            }
            return Ok(smallvec![explicit]);
        }
        if registry.module(site.calling).is_none() {
            return Err(DispatchError::UnknownModule {
                module: registry.display_module(site.calling),
            });
        }
        let scope = registry.scope(site.calling);
        if self.mode.restricts_implicit_scope() {
            let defines = |module: ModuleId| {
                registry
                    .methods_named(site.method)
                    .any(|(_, m)| m.module == module)
            };
            if let Some(&first) = scope.iter().find(|&&m| defines(m)) {
                return Ok(smallvec![first]);
            }
        }
        Ok(scope)
    }

    fn accepts(&self, decl: &MethodDecl, actuals: &Actuals) -> bool {
        self.registry.is_subtype(&actuals.receiver, &decl.receiver)
            && actuals
                .args
                .iter()
                .zip(&decl.params)
                .all(|(actual, param)| self.registry.is_subtype(actual, &param.pattern))
    }

    /// One conversion for every position `decl` rejects.
    fn plan_conversions(
        &self,
        decl: &MethodDecl,
        actuals: &Actuals,
    ) -> Result<SmallVec<[PlannedConversion; 2]>, ConversionError> {
        let positions = std::iter::once((Position::Receiver, &actuals.receiver, &decl.receiver))
            .chain(
                actuals
                    .args
                    .iter()
                    .zip(&decl.params)
                    .enumerate()
                    .map(|(i, (actual, param))| (Position::Arg(i), actual, &param.pattern)),
            );
        let mut plan = SmallVec::new();
        for (position, actual, pattern) in positions {
            if self.registry.is_subtype(actual, pattern) {
                continue;
            }
            let Some(source) = actual.as_atom() else {
                return Err(ConversionError::NoConversion {
                    from: self.registry.display_type(actual),
                    to: self.registry.display_type(pattern),
                });
            };
            let conversion = self.registry.find_conversion(source, pattern)?;
            plan.push(PlannedConversion {
                position,
                conversion,
            });
        }
        Ok(plan)
    }

    fn pick(
        &self,
        site: &CallSite<'_>,
        candidates: &[Candidate<'_>],
    ) -> Result<Resolution, DispatchError> {
        match rank::select(candidates, site.args.len(), site.calling) {
            Ok(index) => {
                let winner = &candidates[index];
                trace!(
                    method = %self.registry.display_method(winner.id),
                    conversions = winner.conversions.len(),
                    "resolved"
                );
                Ok(Resolution {
                    method: winner.id,
                    module: winner.decl.module,
                    body: winner.decl.body,
                    conversions: winner.conversions.clone(),
                })
            }
            Err(tied) => Err(DispatchError::AmbiguousMethod {
                method: self.registry.display_name(site.method),
                candidates: tied
                    .iter()
                    .map(|&i| self.registry.display_method(candidates[i].id))
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
