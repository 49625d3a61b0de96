//! # strata-core
//!
//! Cross-runtime value printing and symbol demangling for native debuggers.
//!
//! A native debugger that hosts an embedded managed runtime uses this crate to
//! ask that runtime to render debuggee values and to demangle symbol names.
//! The crate provides:
//! - A lazily resolved table of the runtime's exported callbacks
//! - Marshalling of debuggee values into the runtime's representation and back
//! - Depth-bounded recursive printing, with nested fields re-entering the bridge
//! - Demangling as a pure call across the boundary
//!
//! ## Failure model
//!
//! Nothing the embedded side does to a single value may take the debugger
//! session down. A missing callback prints nothing (or returns the mangled
//! name unchanged); a value whose printer raises is omitted while its
//! neighbours still render. Only a result of the wrong shape, which means the
//! two sides disagree about the ABI, surfaces as an error.

pub mod config;
pub mod demangle;
pub mod error;
pub mod marshal;
pub mod prelude;
pub mod printer;
pub mod registry;
pub mod runtime;
pub mod types;

// Re-export commonly used types
pub use error::{BridgeError, BridgeResult};
pub use printer::{PrintOutcome, TRUNCATION_MARKER};
pub use runtime::{Bridge, EmbeddedRuntime};
pub use types::{Address, PrintOptions, TypeDescriptor, TypedValueRef};
