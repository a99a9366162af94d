//! Brisk Runtime Library
//!
//! Runtime support for programs compiled to native code by the brisk
//! compiler. Two pieces everything else sits on:
//!
//! - **Boxed values**: every runtime value is a [`BoxedValue`], a refcounted
//!   handle to an immutable object with a [`TypeTag`] and a payload.
//!   Constructors in [`factory`] enforce range preconditions and every
//!   operation starts with a [`sanity`] check.
//! - **Routine registry**: built-in operations are resolved by name and
//!   signature descriptor through a [`NativeRegistry`], populated once at
//!   startup by walking the module initializer chain ([`Runtime::boot`]).
//!
//! # Faults
//!
//! Contract violations (malformed handle, unsupported type, value out of
//! range) are fatal. See [`fault`] for how they unwind and how boundaries
//! turn them into an exit status.
//!
//! # Usage
//!
//! ```rust,ignore
//! use brisk_runtime::{factory, Runtime};
//!
//! let runtime = Runtime::boot();
//! let byte = runtime
//!     .call("toUnsignedByte", "[^d,v,i]", &[factory::box_int(42)])
//!     .unwrap();
//! assert_eq!(byte, factory::box_byte(42));
//! ```

pub mod abi;
pub mod convert;
pub mod factory;
pub mod fault;
pub mod modules;
pub mod registry;
pub mod sanity;
pub mod text;
pub mod value;

// Used by `submit_module!`.
#[doc(hidden)]
pub use inventory;

pub use brisk_plugin::{Initializer, Signature};
pub use fault::{Fault, FaultKind};
pub use modules::Runtime;
pub use registry::{NativeFn, NativeRegistry, RegistryError};
pub use value::{BoxedValue, TypeTag, Value};
