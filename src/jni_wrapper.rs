//! Wrapper around the `JavaVM` invocation interface.
//!
//! The agent needs three things from the VM handle: a JVMTI environment at
//! load time, and the ability to detach and re-attach the calling thread
//! during the check.

use crate::sys::jni;
use crate::jvm_call;
use std::ffi::c_void;
use std::ptr;

/// A `JavaVM*` as handed to `Agent_OnLoad`.
///
/// # Thread Safety
///
/// The invocation interface is process-wide and may be used from any
/// thread; only the attach state it reports is per-thread.
pub struct JavaVm {
    vm: *mut jni::JavaVM,
}

// SAFETY: the JavaVM invocation table is valid for the lifetime of the VM
// and JNI permits calling it from any native thread.
unsafe impl Send for JavaVm {}
unsafe impl Sync for JavaVm {}

impl JavaVm {
    /// Wraps a raw VM pointer.
    ///
    /// # Safety
    ///
    /// `vm` must be null or point at a live `JavaVM` for as long as the
    /// wrapper is used.
    pub unsafe fn from_raw(vm: *mut jni::JavaVM) -> Option<Self> {
        if vm.is_null() {
            return None;
        }
        Some(JavaVm { vm })
    }

    /// Returns the raw VM pointer.
    pub fn raw(&self) -> *mut jni::JavaVM {
        self.vm
    }

    /// Fetches an interface environment (JNI or JVMTI) at `version`.
    ///
    /// The pointer may still be null on `Ok`; callers decide what that means.
    pub fn get_env(&self, version: jni::jint) -> Result<*mut c_void, jni::jint> {
        let mut env_ptr: *mut c_void = ptr::null_mut();
        let res = unsafe { jvm_call!(self.vm, GetEnv, &mut env_ptr, version) };
        if res != jni::JNI_OK {
            return Err(res);
        }
        Ok(env_ptr)
    }

    /// Attaches the calling thread, returning its fresh JNI environment.
    pub fn attach_current_thread(&self) -> Result<*mut jni::JNIEnv, jni::jint> {
        let mut env_ptr: *mut c_void = ptr::null_mut();
        let res = unsafe { jvm_call!(self.vm, AttachCurrentThread, &mut env_ptr, ptr::null_mut()) };
        if res != jni::JNI_OK {
            return Err(res);
        }
        Ok(env_ptr as *mut jni::JNIEnv)
    }

    /// Detaches the calling thread from the VM.
    ///
    /// Some VMs refuse to detach a thread that still has Java frames on its
    /// stack; the status is returned as-is.
    pub fn detach_current_thread(&self) -> Result<(), jni::jint> {
        let res = unsafe { jvm_call!(self.vm, DetachCurrentThread) };
        if res != jni::JNI_OK {
            return Err(res);
        }
        Ok(())
    }
}
