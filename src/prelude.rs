//! Common imports for writing and testing the agent.
//!
//! Kept small: the wrappers, the check seams and the raw binding modules.

pub use crate::check::{
    run_checks, CheckId, CheckRecord, Fatal, FunctionTable, Outcome, RunSummary, ThreadAttachment,
    PASSED, STATUS_FAILED,
};
pub use crate::env::{JavaVm, Jvmti};
pub use crate::export_agent;
pub use crate::options::AgentOptions;
pub use crate::report::Reporter;
pub use crate::sys::{jni, jvmti};
pub use crate::Agent;
