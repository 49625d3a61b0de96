//! # Types
//!
//! Host-side types the bridge borrows from the debugger: addresses, type
//! descriptors, and typed views into captured debuggee memory.

pub mod address;
pub mod value;

// Re-export all public types
pub use address::Address;
pub use value::{FieldDescriptor, PrintOptions, TypeDescriptor, TypedValueRef};
