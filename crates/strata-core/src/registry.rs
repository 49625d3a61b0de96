//! # Callback Registry
//!
//! Lazily resolved table of the embedded runtime's exported callbacks.
//!
//! The set of callbacks is closed and known up front, so the table is a fixed
//! array of slots indexed by [`Callback`] rather than a map keyed by string.
//! Each slot is resolved on first use and never again: exports are assumed
//! static once the runtime has booted.
//!
//! ## Thread Safety
//!
//! The registry is not thread-safe (`unsync::OnceCell`). It lives inside a
//! [`BridgeContext`](crate::runtime::BridgeContext) that is driven from the
//! host debugger's single control thread.

use std::fmt;

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::runtime::{EmbeddedRuntime, EntryPoint};

/// Callbacks the bridge knows how to call.
///
/// The wire names are part of the contract with the embedded side: renaming
/// one is a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback
{
    /// `(target, stream, type_name, summary) -> unit`
    ValuePrint,
    /// `(mangled) -> absent | present(demangled)`
    Demangle,
}

impl Callback
{
    pub const ALL: [Callback; 2] = [Callback::ValuePrint, Callback::Demangle];

    /// Exported name looked up in the embedded runtime.
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self {
            Callback::ValuePrint => "strata_value_print",
            Callback::Demangle => "strata_demangle",
        }
    }

    /// Map an exported name back to its callback.
    pub fn from_name(name: &str) -> Option<Self>
    {
        Self::ALL.into_iter().find(|callback| callback.name() == name)
    }

    const fn slot(self) -> usize
    {
        match self {
            Callback::ValuePrint => 0,
            Callback::Demangle => 1,
        }
    }
}

impl fmt::Display for Callback
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.name())
    }
}

/// Resolution state of a callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution
{
    /// Not looked up yet.
    Unresolved,
    /// Found in the runtime's export table.
    Resolved(EntryPoint),
    /// Looked up and not exported.
    Missing,
}

/// Snapshot of one registry slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackHandle
{
    callback: Callback,
    resolution: Resolution,
}

impl CallbackHandle
{
    pub fn callback(&self) -> Callback
    {
        self.callback
    }

    pub fn name(&self) -> &'static str
    {
        self.callback.name()
    }

    pub fn resolution(&self) -> Resolution
    {
        self.resolution
    }

    /// Entry point to invoke, if the callback is exported.
    pub fn entry(&self) -> Option<EntryPoint>
    {
        match self.resolution {
            Resolution::Resolved(entry) => Some(entry),
            Resolution::Unresolved | Resolution::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool
    {
        self.resolution == Resolution::Missing
    }
}

/// Fixed table of callback slots, one per [`Callback`].
#[derive(Debug, Default)]
pub struct CallbackRegistry
{
    slots: [OnceCell<Option<EntryPoint>>; Callback::ALL.len()],
}

impl CallbackRegistry
{
    /// Create a registry with every slot unresolved.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Resolve `callback`, querying `runtime` only if this is the first use.
    pub fn resolve(&self, callback: Callback, runtime: &dyn EmbeddedRuntime) -> CallbackHandle
    {
        let entry = *self.slots[callback.slot()].get_or_init(|| {
            let entry = runtime.lookup(callback.name());
            debug!(callback = callback.name(), found = entry.is_some(), "resolved embedded callback");
            entry
        });
        CallbackHandle {
            callback,
            resolution: entry.map_or(Resolution::Missing, Resolution::Resolved),
        }
    }

    /// Resolve a callback by its exported name.
    ///
    /// Returns `None` for names the bridge doesn't know, without querying the
    /// runtime.
    pub fn resolve_name(&self, name: &str, runtime: &dyn EmbeddedRuntime) -> Option<CallbackHandle>
    {
        Callback::from_name(name).map(|callback| self.resolve(callback, runtime))
    }

    /// Current state of a slot, without resolving it.
    pub fn peek(&self, callback: Callback) -> CallbackHandle
    {
        let resolution = match self.slots[callback.slot()].get() {
            None => Resolution::Unresolved,
            Some(Some(entry)) => Resolution::Resolved(*entry),
            Some(None) => Resolution::Missing,
        };
        CallbackHandle { callback, resolution }
    }
}
