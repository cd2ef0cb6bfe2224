//! Raw FFI bindings.
//!
//! Layouts follow `jni.h` and `jvmti.h`; nothing in here is safe to call
//! without a live VM behind the pointers.

pub mod jni;
pub mod jvmti;
