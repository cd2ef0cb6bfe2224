//! The `setjniftab002` agent.
//!
//! Loading builds an [`AgentContext`]; the harness later calls the native
//! `check` method, which runs [`crate::check::run_checks`] against it.

use std::io::Write;
use std::sync::OnceLock;

use crate::check::{self, RunSummary};
use crate::error::AgentError;
use crate::jni_wrapper::JavaVm;
use crate::jvmti_wrapper::{self, Jvmti};
use crate::options::AgentOptions;
use crate::report::Reporter;
use crate::sys::{jni, jvmti};
use crate::Agent;

/// JVMTI version requested at load time.
pub const REQUIRED_JVMTI_VERSION: jni::jint = jvmti::JVMTI_VERSION_1_1;

/// Everything the checks need, captured once at load.
pub struct AgentContext {
    jvmti: Jvmti,
    vm: JavaVm,
    options: AgentOptions,
}

impl AgentContext {
    /// Parses `options` and obtains the JVMTI environment from `vm`.
    ///
    /// # Safety
    ///
    /// `vm` must be null or the live `JavaVM*` passed to the agent.
    pub unsafe fn initialize<W: Write>(
        vm: *mut jni::JavaVM,
        options: AgentOptions,
        reporter: &mut Reporter<W>,
    ) -> Result<Self, AgentError> {
        reporter.verbose_mode_on();

        let vm = JavaVm::from_raw(vm).ok_or_else(|| {
            reporter.init_failed(&AgentError::NullVm);
            AgentError::NullVm
        })?;
        let jvmti = Jvmti::from_vm(&vm, REQUIRED_JVMTI_VERSION).map_err(|err| {
            reporter.get_env_failed(&err);
            err
        })?;

        match jvmti.get_version_number() {
            Ok(version) => {
                let (major, minor) = jvmti_wrapper::version_parts(version);
                log::debug!("JVMTI environment {:p} (version {}.{})", jvmti.raw(), major, minor);
            }
            Err(err) => log::debug!("GetVersionNumber failed: {}", err),
        }

        Ok(AgentContext { jvmti, vm, options })
    }

    pub fn options(&self) -> AgentOptions {
        self.options
    }

    pub fn run_checks_with<W: Write>(&self, reporter: &mut Reporter<W>) -> RunSummary {
        check::run_checks(&self.jvmti, &self.vm, reporter)
    }

    pub fn run_checks(&self) -> RunSummary {
        self.run_checks_with(&mut Reporter::stdout(self.options.verbose))
    }
}

#[derive(Default)]
pub struct SetJniFunctionTableAgent {
    context: OnceLock<AgentContext>,
}

impl SetJniFunctionTableAgent {
    pub fn context(&self) -> Option<&AgentContext> {
        self.context.get()
    }

    fn initialize(&self, vm: *mut jni::JavaVM, options: &str) -> Result<(), AgentError> {
        let options = AgentOptions::parse(options);
        let mut reporter = Reporter::stdout(options.verbose);
        let context = unsafe { AgentContext::initialize(vm, options, &mut reporter)? };
        self.context
            .set(context)
            .map_err(|_| AgentError::AlreadyLoaded)
    }
}

impl Agent for SetJniFunctionTableAgent {
    fn on_load(&self, vm: *mut jni::JavaVM, options: &str) -> jni::jint {
        match self.initialize(vm, options) {
            Ok(()) => jni::JNI_OK,
            Err(err) => {
                log::error!("agent initialization failed: {}", err);
                jni::JNI_ERR
            }
        }
    }

    fn on_unload(&self) {
        if let Some(context) = self.context.get() {
            if let Err(err) = context.jvmti.dispose_environment() {
                log::warn!("DisposeEnvironment failed: {}", err);
            }
        }
    }

    fn check(&self, _jni: *mut jni::JNIEnv, _obj: jni::jobject) -> jni::jint {
        match self.context.get() {
            Some(context) => context.run_checks().status(),
            None => {
                Reporter::stdout(false).not_loaded();
                RunSummary::not_loaded().status()
            }
        }
    }
}

crate::export_agent!(
    SetJniFunctionTableAgent,
    Java_nsk_jvmti_SetJNIFunctionTable_setjniftab002_check
);

/// Entry points for an agent linked statically into the launcher.
#[cfg(feature = "static-build")]
pub mod static_build {
    use super::SetJniFunctionTableAgent;
    use crate::sys::jni;

    #[no_mangle]
    #[allow(non_snake_case)]
    pub unsafe extern "system" fn Agent_OnLoad_setjniftab002(
        vm: *mut jni::JavaVM,
        options: *mut std::ffi::c_char,
        _reserved: *mut std::ffi::c_void,
    ) -> jni::jint {
        crate::load_agent(vm, options, false, || Box::new(SetJniFunctionTableAgent::default()) as Box<dyn crate::Agent>)
    }

    #[no_mangle]
    #[allow(non_snake_case)]
    pub unsafe extern "system" fn Agent_OnAttach_setjniftab002(
        vm: *mut jni::JavaVM,
        options: *mut std::ffi::c_char,
        _reserved: *mut std::ffi::c_void,
    ) -> jni::jint {
        crate::load_agent(vm, options, true, || Box::new(SetJniFunctionTableAgent::default()) as Box<dyn crate::Agent>)
    }

    #[no_mangle]
    #[allow(non_snake_case)]
    pub extern "system" fn JNI_OnLoad_setjniftab002(
        _vm: *mut jni::JavaVM,
        _reserved: *mut std::ffi::c_void,
    ) -> jni::jint {
        crate::SUPPORTED_JNI_VERSION
    }
}
