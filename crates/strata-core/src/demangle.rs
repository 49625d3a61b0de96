//! Symbol demangling through the embedded runtime.
//!
//! The embedded side owns the knowledge of its own mangling scheme; the
//! bridge only marshals the name across and the answer back. From the
//! caller's point of view this is a pure function: nothing is retained
//! between calls, and whenever no better name is available the input comes
//! back unchanged.

use tracing::{trace, warn};

use crate::error::BridgeResult;
use crate::marshal::{self, EmbeddedValue};
use crate::registry::Callback;
use crate::runtime::{BridgeContext, DetachedHost, EmbeddedRuntime};

/// Demangle `mangled`.
///
/// Returns a copy of `mangled` when the runtime exports no demangler, when
/// the demangler raises, or when it reports that it has no demangled form.
///
/// ## Errors
///
/// `ContractViolation` if the demangler returns anything other than
/// absent or present(string).
pub fn demangle(runtime: &dyn EmbeddedRuntime, context: &BridgeContext, mangled: &str) -> BridgeResult<String>
{
    let handle = context.registry().resolve(Callback::Demangle, runtime);
    let Some(entry) = handle.entry() else {
        return Ok(mangled.to_owned());
    };

    let args = [EmbeddedValue::string(mangled)];
    let mut host = DetachedHost::new(context.settings());
    match runtime.invoke(entry, &args, &mut host) {
        Ok(result) => {
            let demangled = marshal::decode_optional_string("demangle", &result)?;
            trace!(mangled, demangled = demangled.as_deref(), "demangle");
            Ok(demangled.unwrap_or_else(|| mangled.to_owned()))
        }
        Err(raised) => {
            if context.settings().diagnostics() {
                warn!(mangled, error = %raised, "embedded demangler raised; keeping mangled name");
            }
            Ok(mangled.to_owned())
        }
    }
}
