//! Setup errors raised while bringing the agent up.

use thiserror::Error;

use crate::sys::jni;

/// Reasons the agent could not be initialized.
///
/// These never reach the harness as test failures: at load time they turn
/// into `JNI_ERR`, at check time into a "not properly loaded" failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("GetEnv returned {code}")]
    GetEnv { code: jni::jint },

    #[error("GetEnv returned a null JVMTI environment")]
    NullEnvironment,

    #[error("JavaVM pointer is null")]
    NullVm,

    #[error("agent is already loaded in this process")]
    AlreadyLoaded,
}
