//! An embedded runtime whose exports are Rust closures.
//!
//! `InProcessRuntime` implements the full [`EmbeddedRuntime`] contract
//! without a managed heap behind it: exports are registered by name before
//! boot, looked up by name, and invoked with the same positional arguments
//! and host services a real runtime would receive. A panic inside an export
//! is treated as an embedded exception.
//!
//! Booting installs a process-wide panic hook that stays silent while an
//! export is running and forwards to the previously installed hook
//! otherwise. A panicking export therefore never writes to the host's
//! stderr; its message is logged through `tracing` instead.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::debug;

use super::{EmbeddedRuntime, EntryPoint, HostServices, Raised};
use crate::error::{BridgeError, BridgeResult};
use crate::marshal::EmbeddedValue;

thread_local! {
    static IN_EXPORT: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a hook in front of the current one that drops panics raised by exports.
fn install_quiet_hook()
{
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_EXPORT.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Marks the current thread as running an export until dropped.
///
/// Restores the previous flag so nested invocations (fields printed from
/// inside an export) unwind correctly.
struct ExportGuard
{
    was_in_export: bool,
}

impl ExportGuard
{
    fn enter() -> Self
    {
        Self {
            was_in_export: IN_EXPORT.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for ExportGuard
{
    fn drop(&mut self)
    {
        IN_EXPORT.with(|flag| flag.set(self.was_in_export));
    }
}

/// Signature of an in-process export.
pub type ExportFn = Box<dyn Fn(&[EmbeddedValue], &mut dyn HostServices) -> Result<EmbeddedValue, Raised>>;

/// Closure-backed embedded runtime.
#[derive(Default)]
pub struct InProcessRuntime
{
    exports: Vec<ExportFn>,
    names: HashMap<String, EntryPoint>,
    boot_argv: Option<Vec<String>>,
    lookups: Cell<usize>,
    invocations: Cell<usize>,
}

impl InProcessRuntime
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Export `function` under `name`, replacing any previous export of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> EntryPoint
    where
        F: Fn(&[EmbeddedValue], &mut dyn HostServices) -> Result<EmbeddedValue, Raised> + 'static,
    {
        let name = name.into();
        let index = u32::try_from(self.exports.len()).unwrap_or(u32::MAX);
        let entry = EntryPoint::from_raw(index);
        self.exports.push(Box::new(function));
        self.names.insert(name, entry);
        entry
    }

    /// Builder-style [`InProcessRuntime::register`].
    #[must_use]
    pub fn with_export<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[EmbeddedValue], &mut dyn HostServices) -> Result<EmbeddedValue, Raised> + 'static,
    {
        self.register(name, function);
        self
    }

    /// Whether [`EmbeddedRuntime::boot`] has run.
    pub fn is_booted(&self) -> bool
    {
        self.boot_argv.is_some()
    }

    /// Arguments the runtime was booted with.
    pub fn boot_argv(&self) -> Option<&[String]>
    {
        self.boot_argv.as_deref()
    }

    /// Number of export-table lookups performed so far.
    pub fn lookup_count(&self) -> usize
    {
        self.lookups.get()
    }

    /// Number of entry-point invocations performed so far.
    pub fn invocation_count(&self) -> usize
    {
        self.invocations.get()
    }
}

impl fmt::Debug for InProcessRuntime
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("InProcessRuntime")
            .field("exports", &names)
            .field("booted", &self.is_booted())
            .field("lookups", &self.lookups.get())
            .finish_non_exhaustive()
    }
}

impl EmbeddedRuntime for InProcessRuntime
{
    fn boot(&mut self, argv: &[&str]) -> BridgeResult<()>
    {
        if argv.is_empty() {
            return Err(BridgeError::BootFailed("empty argument vector".to_string()));
        }
        debug!(?argv, exports = self.exports.len(), "booting in-process runtime");
        install_quiet_hook();
        self.boot_argv = Some(argv.iter().map(|arg| (*arg).to_string()).collect());
        Ok(())
    }

    fn lookup(&self, name: &str) -> Option<EntryPoint>
    {
        self.lookups.set(self.lookups.get() + 1);
        self.names.get(name).copied()
    }

    fn invoke(&self, entry: EntryPoint, args: &[EmbeddedValue], host: &mut dyn HostServices)
        -> Result<EmbeddedValue, Raised>
    {
        if !self.is_booted() {
            return Err(Raised::new("runtime has not been booted"));
        }
        let function = usize::try_from(entry.raw())
            .ok()
            .and_then(|index| self.exports.get(index))
            .ok_or_else(|| Raised::new(format!("no export at entry point {}", entry.raw())))?;

        self.invocations.set(self.invocations.get() + 1);
        let outcome = {
            let _guard = ExportGuard::enter();
            panic::catch_unwind(AssertUnwindSafe(|| function(args, host)))
        };
        outcome.unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "export panicked".to_string());
            debug!(entry = entry.raw(), %message, "export panicked");
            Err(Raised::new(message))
        })
    }
}
