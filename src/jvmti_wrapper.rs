// setjniftab002/src/jvmti_wrapper.rs
use crate::error::AgentError;
use crate::jni_wrapper::JavaVm;
use crate::sys::jni;
use crate::sys::jvmti;

/// A safe wrapper around the raw JVMTI Environment pointer.
pub struct Jvmti {
    // Never null once constructed through `from_vm`.
    env: *mut jvmti::jvmtiEnv,
}

// SAFETY: a jvmtiEnv may be used from any thread; JVMTI functions that
// care about the calling thread check it themselves (which is exactly what
// the detached-thread check relies on).
unsafe impl Send for Jvmti {}
unsafe impl Sync for Jvmti {}

impl Jvmti {
    /// Retrieves a JVMTI environment at `version` from the VM.
    pub fn from_vm(vm: &JavaVm, version: jni::jint) -> Result<Self, AgentError> {
        let env_ptr = vm
            .get_env(version)
            .map_err(|code| AgentError::GetEnv { code })?;

        if env_ptr.is_null() {
            return Err(AgentError::NullEnvironment);
        }

        Ok(Jvmti {
            env: env_ptr as *mut jvmti::jvmtiEnv,
        })
    }

    /// Get the raw jvmtiEnv pointer
    pub fn raw(&self) -> *mut jvmti::jvmtiEnv {
        self.env
    }

    fn functions(&self) -> &jvmti::jvmtiInterface_1_ {
        unsafe { &*(*self.env).functions }
    }

    pub fn get_version_number(&self) -> Result<jni::jint, jvmti::jvmtiError> {
        let get_fn = self
            .functions()
            .GetVersionNumber
            .ok_or(jvmti::jvmtiError::NOT_AVAILABLE)?;
        let mut version: jni::jint = 0;
        let err = unsafe { get_fn(self.env, &mut version) };
        if err != jvmti::jvmtiError::NONE {
            return Err(err);
        }
        Ok(version)
    }

    /// Replaces the JNI function table of every thread, current and future.
    ///
    /// A null `function_table` is a contract violation the VM must reject
    /// with `JVMTI_ERROR_NULL_POINTER`.
    pub fn set_jni_function_table(
        &self,
        function_table: *const jni::JNINativeInterface_,
    ) -> Result<(), jvmti::jvmtiError> {
        let set_fn = self
            .functions()
            .SetJNIFunctionTable
            .ok_or(jvmti::jvmtiError::NOT_AVAILABLE)?;
        let err = unsafe { set_fn(self.env, function_table) };
        if err != jvmti::jvmtiError::NONE {
            return Err(err);
        }
        Ok(())
    }

    pub fn dispose_environment(&self) -> Result<(), jvmti::jvmtiError> {
        let dispose_fn = self
            .functions()
            .DisposeEnvironment
            .ok_or(jvmti::jvmtiError::NOT_AVAILABLE)?;
        let err = unsafe { dispose_fn(self.env) };
        if err != jvmti::jvmtiError::NONE {
            return Err(err);
        }
        Ok(())
    }
}

/// Splits a JVMTI version number into `(major, minor)`.
pub fn version_parts(version: jni::jint) -> (jni::jint, jni::jint) {
    let major = (version & jvmti::JVMTI_VERSION_MASK_MAJOR) >> jvmti::JVMTI_VERSION_SHIFT_MAJOR;
    let minor = (version & jvmti::JVMTI_VERSION_MASK_MINOR) >> jvmti::JVMTI_VERSION_SHIFT_MINOR;
    (major, minor)
}
