//! Common module for library exports

pub use crate::config::BridgeConfig;
pub use crate::error::{BridgeError, BridgeResult};
pub use crate::marshal::{EmbeddedValue, StreamRef};
pub use crate::printer::{PrintOutcome, TRUNCATION_MARKER};
pub use crate::registry::{Callback, CallbackHandle, Resolution};
pub use crate::runtime::{Bridge, EmbeddedRuntime, HostServices, InProcessRuntime, Raised};
pub use crate::types::{Address, FieldDescriptor, PrintOptions, TypeDescriptor, TypedValueRef};
