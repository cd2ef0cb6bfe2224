//! High-level environment wrappers for JVMTI and the JavaVM.
//!
//! These wrappers hide the vtable plumbing and return `Result`s carrying the
//! raw status code on failure:
//!
//! - [`Jvmti`]: obtained from the VM at a given JVMTI version; exposes
//!   `SetJNIFunctionTable`, `GetVersionNumber` and `DisposeEnvironment`.
//! - [`JavaVm`]: the invocation interface; `GetEnv` and attaching or
//!   detaching the calling thread.
//!
//! ```rust,ignore
//! use setjniftab002::env::{JavaVm, Jvmti};
//! use setjniftab002::sys::jvmti;
//!
//! let vm = unsafe { JavaVm::from_raw(raw_vm) }.expect("null JavaVM");
//! let env = Jvmti::from_vm(&vm, jvmti::JVMTI_VERSION_1_1)?;
//! assert_eq!(
//!     env.set_jni_function_table(std::ptr::null()),
//!     Err(jvmti::jvmtiError::NULL_POINTER),
//! );
//! ```

// Re-export the JVMTI wrapper
mod jvmti_impl {
    pub use crate::jvmti_wrapper::{version_parts, Jvmti};
}

// Re-export the invocation interface wrapper
mod jni_impl {
    pub use crate::jni_wrapper::JavaVm;
}

pub use jvmti_impl::{version_parts, Jvmti};
pub use jni_impl::JavaVm;
