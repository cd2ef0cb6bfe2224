//! # setjniftab002
//!
//! A JVMTI test agent checking that `SetJNIFunctionTable` rejects bad calls
//! with the error codes the JVMTI specification requires:
//!
//! - a null function table yields `JVMTI_ERROR_NULL_POINTER`;
//! - a call from a thread detached from the VM yields
//!   `JVMTI_ERROR_UNATTACHED_THREAD`.
//!
//! Neither call is expected to succeed, so a passing run leaves the JNI
//! function table untouched.
//!
//! ## Running
//!
//! The library is built as a `cdylib` and loaded by the Java side of the
//! test, which calls the native `check()` method and fails unless it
//! returns [`check::PASSED`]:
//!
//! ```bash
//! cargo build --release
//! java -agentpath:./target/release/libsetjniftab002.so=-verbose \
//!      nsk.jvmti.SetJNIFunctionTable.setjniftab002
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Exported entry points (export_agent!)         │
//! │   Agent_OnLoad, Agent_OnAttach, Agent_OnUnload,          │
//! │   JNI_OnLoad, Java_..._setjniftab002_check               │
//! ├─────────────────────────────────────────────────────────┤
//! │        agent::SetJniFunctionTableAgent + AgentContext    │
//! ├─────────────────────────────────────────────────────────┤
//! │   check::run_checks  ──  report::Reporter (stdout)       │
//! │   FunctionTable / ThreadAttachment seams                 │
//! ├─────────────────────────────────────────────────────────┤
//! │              env::Jvmti, env::JavaVm wrappers            │
//! ├─────────────────────────────────────────────────────────┤
//! │              Raw FFI Bindings (sys module)               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sys::jni`] | JNI types and the `JavaVM` invocation table |
//! | [`sys::jvmti`] | JVMTI error codes, versions and function table |
//! | [`env`] | Safe wrappers over the two environments |
//! | [`check`] | The two checks and their records |
//! | [`report`] | Console diagnostics |
//! | [`options`] | Agent options string |
//! | [`agent`] | The exported agent |
//! | [`prelude`] | Common imports |

pub mod sys;
pub mod env;
pub mod error;
pub mod options;
pub mod report;
pub mod check;
pub mod agent;
pub mod prelude;

// Implementation modules (use `env` module for the public API)
#[doc(hidden)]
pub mod jvmti_wrapper;
#[doc(hidden)]
pub mod jni_wrapper;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::OnceLock;

pub use crate::sys::jni as jni;

/// JNI version reported from `JNI_OnLoad`.
pub const SUPPORTED_JNI_VERSION: jni::jint = jni::JNI_VERSION_1_8;

/// A native test agent: loaded by the VM, then driven by the harness
/// through one native method.
///
/// # Thread Safety
///
/// The agent lives in a process-wide slot and must be `Sync + Send`.
pub trait Agent: Sync + Send {
    /// Called when the agent is loaded at VM startup.
    ///
    /// Return `JNI_OK` (0) on success, or `JNI_ERR` (-1) on failure.
    fn on_load(&self, vm: *mut jni::JavaVM, options: &str) -> jni::jint;

    /// Called when the agent is attached to a running VM.
    ///
    /// Defaults to the same initialization as [`Agent::on_load`].
    fn on_attach(&self, vm: *mut jni::JavaVM, options: &str) -> jni::jint {
        self.on_load(vm, options)
    }

    /// Called when the agent is unloaded (JVM shutdown).
    fn on_unload(&self) {}

    /// The body of the native `check` method the harness calls.
    ///
    /// Returns the test status handed back to Java.
    fn check(&self, jni: *mut jni::JNIEnv, obj: jni::jobject) -> jni::jint;
}

// THE GLOBAL SINGLETON
// Holds the agent instance so the exported C functions can find it.
pub static GLOBAL_AGENT: OnceLock<Box<dyn Agent>> = OnceLock::new();

/// Helper to initialize the global agent (called by the macro)
pub fn set_global_agent(agent: Box<dyn Agent>) -> Result<(), error::AgentError> {
    GLOBAL_AGENT
        .set(agent)
        .map_err(|_| error::AgentError::AlreadyLoaded)
}

/// Shared body of `Agent_OnLoad` and `Agent_OnAttach`.
///
/// # Safety
///
/// `options` must be null or a NUL-terminated string, and `vm` must be the
/// pointer the VM passed in.
pub unsafe fn load_agent(
    vm: *mut jni::JavaVM,
    options: *const c_char,
    attach: bool,
    make_agent: impl FnOnce() -> Box<dyn Agent>,
) -> jni::jint {
    if let Err(err) = set_global_agent(make_agent()) {
        log::error!("{}", err);
        return jni::JNI_ERR;
    }

    let options_str = if options.is_null() {
        ""
    } else {
        CStr::from_ptr(options).to_str().unwrap_or("")
    };

    match GLOBAL_AGENT.get() {
        Some(agent) if attach => agent.on_attach(vm, options_str),
        Some(agent) => agent.on_load(vm, options_str),
        None => jni::JNI_ERR,
    }
}

/// Shared body of the exported native `check` method.
pub fn run_agent_check(jni: *mut jni::JNIEnv, obj: jni::jobject) -> jni::jint {
    match GLOBAL_AGENT.get() {
        Some(agent) => agent.check(jni, obj),
        None => {
            report::Reporter::stdout(false).not_loaded();
            check::RunSummary::not_loaded().status()
        }
    }
}

/// Shared body of `Agent_OnUnload`.
pub fn unload_agent() {
    if let Some(agent) = GLOBAL_AGENT.get() {
        agent.on_unload();
    }
}

/// Exports an agent type as a loadable JVMTI test agent library.
///
/// The first argument is the agent type (it must implement [`Agent`] and
/// [`Default`]); the second is the JNI symbol of the Java `check()` method,
/// `Java_<package>_<class>_check`.
///
/// # Generated Functions
///
/// - **`Agent_OnLoad`** / **`Agent_OnAttach`**: create the agent, register
///   it globally and call [`Agent::on_load`] / [`Agent::on_attach`]. A second
///   load in the same process returns `JNI_ERR`.
/// - **`Agent_OnUnload`**: calls [`Agent::on_unload`].
/// - **`JNI_OnLoad`**: reports [`SUPPORTED_JNI_VERSION`].
/// - the native method: calls [`Agent::check`], or fails with
///   [`check::STATUS_FAILED`] if no agent was loaded.
///
/// # Example
///
/// ```rust,ignore
/// export_agent!(SetJniFunctionTableAgent, Java_nsk_jvmti_SetJNIFunctionTable_setjniftab002_check);
/// ```
#[macro_export]
macro_rules! export_agent {
    ($agent_type:ty, $check_symbol:ident) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "system" fn Agent_OnLoad(
            vm: *mut $crate::sys::jni::JavaVM,
            options: *mut std::ffi::c_char,
            _reserved: *mut std::ffi::c_void,
        ) -> $crate::sys::jni::jint {
            $crate::load_agent(vm, options, false, || Box::new(<$agent_type>::default()) as Box<dyn $crate::Agent>)
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "system" fn Agent_OnAttach(
            vm: *mut $crate::sys::jni::JavaVM,
            options: *mut std::ffi::c_char,
            _reserved: *mut std::ffi::c_void,
        ) -> $crate::sys::jni::jint {
            $crate::load_agent(vm, options, true, || Box::new(<$agent_type>::default()) as Box<dyn $crate::Agent>)
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub unsafe extern "system" fn Agent_OnUnload(_vm: *mut $crate::sys::jni::JavaVM) {
            $crate::unload_agent();
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn JNI_OnLoad(
            _vm: *mut $crate::sys::jni::JavaVM,
            _reserved: *mut std::ffi::c_void,
        ) -> $crate::sys::jni::jint {
            $crate::SUPPORTED_JNI_VERSION
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn $check_symbol(
            jni: *mut $crate::sys::jni::JNIEnv,
            obj: $crate::sys::jni::jobject,
        ) -> $crate::sys::jni::jint {
            $crate::run_agent_check(jni, obj)
        }
    };
}
