//! An in-process stand-in for the VM: real `JavaVM` and `jvmtiEnv` vtables
//! whose functions consult per-thread state instead of a JVM.
//!
//! The state is thread-local because every test runs on its own thread and
//! the agent calls back on the thread that drives it.

#![allow(dead_code)]

use std::cell::Cell;
use std::ffi::c_void;
use std::ptr::{self, NonNull};

use setjniftab002::sys::jni::{self, jint, JNIInvokeInterface_, JNINativeInterface_, JavaVM};
use setjniftab002::sys::jvmti::{self, jvmtiEnv, jvmtiError, jvmtiInterface_1_};

thread_local! {
    static ATTACHED: Cell<bool> = Cell::new(true);
    static GET_ENV_STATUS: Cell<jint> = Cell::new(jni::JNI_OK);
    static NULL_ENV: Cell<bool> = Cell::new(false);
    static JVMTI_ENV: Cell<*mut c_void> = Cell::new(ptr::null_mut());
    static REQUESTED_VERSION: Cell<jint> = Cell::new(0);
    static DETACH_STATUS: Cell<jint> = Cell::new(jni::JNI_OK);
    static ATTACH_STATUS: Cell<jint> = Cell::new(jni::JNI_OK);
    static ATTACHED_RESULT: Cell<Option<jvmtiError>> = Cell::new(None);
    static SET_TABLE_CALLS: Cell<u32> = Cell::new(0);
    static NON_NULL_TABLES: Cell<u32> = Cell::new(0);
    static DISPOSED: Cell<u32> = Cell::new(0);
}

unsafe extern "system" fn destroy_java_vm(_vm: *mut JavaVM) -> jint {
    jni::JNI_ERR
}

unsafe extern "system" fn attach_current_thread(
    _vm: *mut JavaVM,
    penv: *mut *mut c_void,
    _args: *mut c_void,
) -> jint {
    let status = ATTACH_STATUS.with(Cell::get);
    if status == jni::JNI_OK {
        ATTACHED.with(|a| a.set(true));
        *penv = NonNull::<c_void>::dangling().as_ptr();
    }
    status
}

unsafe extern "system" fn detach_current_thread(_vm: *mut JavaVM) -> jint {
    let status = DETACH_STATUS.with(Cell::get);
    if status == jni::JNI_OK {
        ATTACHED.with(|a| a.set(false));
    }
    status
}

unsafe extern "system" fn get_env(_vm: *mut JavaVM, penv: *mut *mut c_void, version: jint) -> jint {
    REQUESTED_VERSION.with(|v| v.set(version));
    let status = GET_ENV_STATUS.with(Cell::get);
    if status != jni::JNI_OK {
        return status;
    }
    *penv = if NULL_ENV.with(Cell::get) {
        ptr::null_mut()
    } else {
        JVMTI_ENV.with(Cell::get)
    };
    jni::JNI_OK
}

unsafe extern "system" fn get_version_number(_env: *mut jvmtiEnv, version_ptr: *mut jint) -> jvmtiError {
    *version_ptr = jvmti::JVMTI_VERSION_21;
    jvmtiError::NONE
}

// Mirrors the VM's ordering: the attach check runs before argument checks.
unsafe extern "system" fn set_jni_function_table(
    _env: *mut jvmtiEnv,
    table: *const JNINativeInterface_,
) -> jvmtiError {
    SET_TABLE_CALLS.with(|c| c.set(c.get() + 1));
    if !table.is_null() {
        NON_NULL_TABLES.with(|c| c.set(c.get() + 1));
    }
    if !ATTACHED.with(Cell::get) {
        return jvmtiError::UNATTACHED_THREAD;
    }
    if let Some(forced) = ATTACHED_RESULT.with(Cell::get) {
        return forced;
    }
    if table.is_null() {
        return jvmtiError::NULL_POINTER;
    }
    jvmtiError::NONE
}

unsafe extern "system" fn dispose_environment(_env: *mut jvmtiEnv) -> jvmtiError {
    DISPOSED.with(|c| c.set(c.get() + 1));
    jvmtiError::NONE
}

pub struct FakeVm {
    // Boxed so the pointers handed to the agent stay put when FakeVm moves.
    _invoke: Box<JNIInvokeInterface_>,
    vm: Box<JavaVM>,
    _functions: Box<jvmtiInterface_1_>,
    _env: Box<jvmtiEnv>,
}

impl FakeVm {
    /// Builds the vtables and resets this thread's VM state.
    pub fn new() -> Self {
        ATTACHED.with(|c| c.set(true));
        GET_ENV_STATUS.with(|c| c.set(jni::JNI_OK));
        NULL_ENV.with(|c| c.set(false));
        REQUESTED_VERSION.with(|c| c.set(0));
        DETACH_STATUS.with(|c| c.set(jni::JNI_OK));
        ATTACH_STATUS.with(|c| c.set(jni::JNI_OK));
        ATTACHED_RESULT.with(|c| c.set(None));
        SET_TABLE_CALLS.with(|c| c.set(0));
        NON_NULL_TABLES.with(|c| c.set(0));
        DISPOSED.with(|c| c.set(0));

        let invoke = Box::new(JNIInvokeInterface_ {
            reserved0: ptr::null_mut(),
            reserved1: ptr::null_mut(),
            reserved2: ptr::null_mut(),
            DestroyJavaVM: destroy_java_vm,
            AttachCurrentThread: attach_current_thread,
            DetachCurrentThread: detach_current_thread,
            GetEnv: get_env,
            AttachCurrentThreadAsDaemon: attach_current_thread,
        });
        let vm: Box<JavaVM> = Box::new(&*invoke as *const JNIInvokeInterface_);

        let functions = Box::new(jvmtiInterface_1_ {
            GetVersionNumber: Some(get_version_number),
            SetJNIFunctionTable: Some(set_jni_function_table),
            DisposeEnvironment: Some(dispose_environment),
            ..Default::default()
        });
        let mut env = Box::new(jvmtiEnv {
            functions: &*functions,
        });
        let env_ptr = &mut *env as *mut jvmtiEnv as *mut c_void;
        JVMTI_ENV.with(|c| c.set(env_ptr));

        FakeVm {
            _invoke: invoke,
            vm,
            _functions: functions,
            _env: env,
        }
    }

    pub fn raw(&mut self) -> *mut JavaVM {
        &mut *self.vm
    }

    pub fn fail_get_env(&self, status: jint) {
        GET_ENV_STATUS.with(|c| c.set(status));
    }

    pub fn return_null_env(&self) {
        NULL_ENV.with(|c| c.set(true));
    }

    pub fn refuse_detach(&self, status: jint) {
        DETACH_STATUS.with(|c| c.set(status));
    }

    pub fn refuse_attach(&self, status: jint) {
        ATTACH_STATUS.with(|c| c.set(status));
    }

    /// What `SetJNIFunctionTable` returns on an attached thread.
    pub fn answer_attached_with(&self, err: jvmtiError) {
        ATTACHED_RESULT.with(|c| c.set(Some(err)));
    }

    pub fn is_attached(&self) -> bool {
        ATTACHED.with(Cell::get)
    }

    pub fn requested_version(&self) -> jint {
        REQUESTED_VERSION.with(Cell::get)
    }

    pub fn set_table_calls(&self) -> u32 {
        SET_TABLE_CALLS.with(Cell::get)
    }

    pub fn non_null_tables(&self) -> u32 {
        NON_NULL_TABLES.with(Cell::get)
    }

    pub fn disposed(&self) -> u32 {
        DISPOSED.with(Cell::get)
    }
}
