//! # Embedded Runtime Boundary
//!
//! The contract between the bridge and the managed runtime it hosts.
//!
//! The bridge depends on three things from the runtime:
//!
//! - **Boot**: a one-time start with a fixed argument vector
//! - **Lookup**: resolving an exported name to an entry point
//! - **Invoke**: calling an entry point with positional arguments
//!
//! While an entry point runs, embedded code reaches back into the host
//! through [`HostServices`]. That is how a record printer asks the bridge
//! to render each of its fields: the call re-enters the value printer with
//! the depth incremented.
//!
//! ## Implementations
//!
//! - [`InProcessRuntime`]: exports backed by Rust closures, used by the CLI
//!   and by tests
//! - [`reference_runtime`]: an `InProcessRuntime` preloaded with a basic value
//!   printer and a Rust symbol demangler

pub mod in_process;
pub mod lifecycle;
pub mod reference;

pub use in_process::{ExportFn, InProcessRuntime};
pub use lifecycle::{Bridge, BridgeContext, BOOT_ARGV};
pub use reference::reference_runtime;
use thiserror::Error;

use crate::config::Settings;
use crate::error::BridgeResult;
use crate::marshal::{EmbeddedValue, StreamRef};

/// Opaque reference to an exported function of the embedded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint(u32);

impl EntryPoint
{
    #[must_use]
    pub const fn from_raw(value: u32) -> Self
    {
        Self(value)
    }

    #[must_use]
    pub const fn raw(self) -> u32
    {
        self.0
    }
}

/// An exception raised by embedded code.
///
/// The bridge never lets one of these escape to the host: a raised value is
/// rendered as nothing, a raised demangle returns the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Raised
{
    message: String,
}

impl Raised
{
    pub fn new(message: impl Into<String>) -> Self
    {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str
    {
        &self.message
    }
}

/// The embedded managed runtime, as seen from the native side.
pub trait EmbeddedRuntime
{
    /// Start the runtime's scheduler and heap.
    ///
    /// Precondition: called once per runtime instance, before any lookup.
    /// [`Bridge::start`] is the only caller.
    ///
    /// ## Errors
    ///
    /// `BootFailed` if the runtime cannot start.
    fn boot(&mut self, argv: &[&str]) -> BridgeResult<()>;

    /// Look up an exported name. Exports are assumed static after boot.
    fn lookup(&self, name: &str) -> Option<EntryPoint>;

    /// Call `entry` with positional `args`.
    ///
    /// `host` is only valid for the duration of the call. Implementations may
    /// re-enter the bridge through it any number of times.
    ///
    /// ## Errors
    ///
    /// `Raised` if embedded code raised (or, for in-process exports,
    /// panicked).
    fn invoke(&self, entry: EntryPoint, args: &[EmbeddedValue], host: &mut dyn HostServices)
        -> Result<EmbeddedValue, Raised>;
}

/// Services the host offers to embedded code during a call.
pub trait HostServices
{
    /// Append `text` to `stream`.
    ///
    /// ## Errors
    ///
    /// Raises if `stream` is not the stream of the value being printed.
    fn write(&mut self, stream: StreamRef, text: &str) -> Result<(), Raised>;

    /// Render field `index` of the value being printed into `stream`.
    ///
    /// A field that fails to render produces no text and is not an error for
    /// the caller; rendering continues with the next field.
    ///
    /// ## Errors
    ///
    /// Raises if there is no current value, if the field doesn't exist, or if
    /// the bridge had to abort the whole print.
    fn print_field(&mut self, stream: StreamRef, index: usize) -> Result<(), Raised>;

    /// Names of the fields of the value being printed, in declaration order.
    fn field_names(&self) -> Vec<String>;

    /// Recursion depth of the current value (0 at top level).
    fn depth(&self) -> u32;

    /// Depth at which the bridge stops descending.
    fn max_depth(&self) -> u32;

    /// Host-configured search path, copied.
    fn search_path(&self) -> Option<String>;
}

/// Host services for calls that have no value or stream attached (demangling).
pub(crate) struct DetachedHost<'a>
{
    settings: &'a Settings,
}

impl<'a> DetachedHost<'a>
{
    pub(crate) fn new(settings: &'a Settings) -> Self
    {
        Self { settings }
    }
}

impl HostServices for DetachedHost<'_>
{
    fn write(&mut self, _stream: StreamRef, _text: &str) -> Result<(), Raised>
    {
        Err(Raised::new("no output stream is attached to this call"))
    }

    fn print_field(&mut self, _stream: StreamRef, _index: usize) -> Result<(), Raised>
    {
        Err(Raised::new("no value is attached to this call"))
    }

    fn field_names(&self) -> Vec<String>
    {
        Vec::new()
    }

    fn depth(&self) -> u32
    {
        0
    }

    fn max_depth(&self) -> u32
    {
        self.settings.max_depth()
    }

    fn search_path(&self) -> Option<String>
    {
        self.settings.search_path()
    }
}
