//! # Runtime Lifecycle
//!
//! Starting the embedded runtime and owning everything the bridge keeps
//! between calls.
//!
//! ## Lifecycle
//!
//! 1. Build a runtime and register its exports
//! 2. Start it: `Bridge::start(runtime, config)`
//! 3. Print and demangle: `bridge.print(...)`, `bridge.demangle(...)`
//! 4. Drop the bridge when the host shuts down (no explicit teardown)
//!
//! ## Example
//!
//! ```rust
//! use strata_core::config::BridgeConfig;
//! use strata_core::runtime::{reference_runtime, Bridge};
//! use strata_core::types::{Address, PrintOptions, TypeDescriptor, TypedValueRef};
//!
//! let bridge = Bridge::start(reference_runtime(), BridgeConfig::default())?;
//!
//! let ty = TypeDescriptor::scalar("int", 8);
//! let bytes = 42i64.to_ne_bytes();
//! let value = TypedValueRef::at_start(&bytes, &ty, Address::new(0x1000));
//! assert_eq!(bridge.print_to_string(value, PrintOptions::default())?, "42");
//! # Ok::<(), strata_core::error::BridgeError>(())
//! ```

use std::fmt;

use tracing::info;

use super::EmbeddedRuntime;
use crate::config::{BridgeConfig, Settings};
use crate::demangle;
use crate::error::BridgeResult;
use crate::printer::{self, PrintOutcome};
use crate::registry::{Callback, CallbackHandle, CallbackRegistry};
use crate::types::{PrintOptions, TypedValueRef};

/// Fixed argument vector the embedded runtime is booted with.
pub const BOOT_ARGV: &[&str] = &["--"];

/// State the bridge keeps between calls: resolved callbacks and live settings.
///
/// ## Thread Safety
///
/// Not thread-safe (`!Sync`). All access comes from the host debugger's
/// control thread; a multi-threaded host would need to lock around callback
/// resolution and search-path replacement.
#[derive(Debug, Default)]
pub struct BridgeContext
{
    registry: CallbackRegistry,
    settings: Settings,
}

impl BridgeContext
{
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self
    {
        Self {
            registry: CallbackRegistry::new(),
            settings: Settings::from_config(config),
        }
    }

    pub fn registry(&self) -> &CallbackRegistry
    {
        &self.registry
    }

    pub fn settings(&self) -> &Settings
    {
        &self.settings
    }
}

/// A started embedded runtime together with its bridge context.
pub struct Bridge<R>
{
    runtime: R,
    context: BridgeContext,
}

impl<R: EmbeddedRuntime> Bridge<R>
{
    /// Boot `runtime` and wrap it in a ready bridge.
    ///
    /// Precondition: `runtime` has not been booted before. This is not
    /// checked here; booting twice is up to the runtime to tolerate or reject.
    ///
    /// ## Errors
    ///
    /// `BootFailed` if the runtime refuses to start.
    pub fn start(mut runtime: R, config: BridgeConfig) -> BridgeResult<Self>
    {
        info!(max_depth = config.max_depth, search_path = config.search_path.as_deref(), "starting embedded runtime");
        runtime.boot(BOOT_ARGV)?;
        Ok(Self {
            runtime,
            context: BridgeContext::new(config),
        })
    }

    /// Print `value` into `out`. See [`printer::print`].
    ///
    /// ## Errors
    ///
    /// Contract violations, unreadable top-level values, and output failures.
    pub fn print(&self, value: TypedValueRef<'_>, options: PrintOptions, out: &mut dyn fmt::Write) -> BridgeResult<PrintOutcome>
    {
        printer::print(&self.runtime, &self.context, value, options, out)
    }

    /// Print `value` and return the text.
    ///
    /// ## Errors
    ///
    /// Same as [`Bridge::print`].
    pub fn print_to_string(&self, value: TypedValueRef<'_>, options: PrintOptions) -> BridgeResult<String>
    {
        let mut out = String::new();
        self.print(value, options, &mut out)?;
        Ok(out)
    }

    /// Demangle a symbol name. See [`demangle::demangle`].
    ///
    /// ## Errors
    ///
    /// Contract violations only.
    pub fn demangle(&self, mangled: &str) -> BridgeResult<String>
    {
        demangle::demangle(&self.runtime, &self.context, mangled)
    }

    /// Resolve a callback (at most one lookup per callback).
    pub fn resolve(&self, callback: Callback) -> CallbackHandle
    {
        self.context.registry().resolve(callback, &self.runtime)
    }

    pub fn set_max_depth(&self, max_depth: u32)
    {
        self.context.settings().set_max_depth(max_depth);
    }

    pub fn max_depth(&self) -> u32
    {
        self.context.settings().max_depth()
    }

    /// Replace the search path handed to the embedded side.
    pub fn set_search_path(&self, search_path: &str)
    {
        self.context.settings().set_search_path(search_path);
    }

    pub fn search_path(&self) -> Option<String>
    {
        self.context.settings().search_path()
    }

    pub fn context(&self) -> &BridgeContext
    {
        &self.context
    }

    pub fn runtime(&self) -> &R
    {
        &self.runtime
    }
}
