//! The `SetJNIFunctionTable` conformance checks.
//!
//! Two checks run in order:
//!
//! 1. [`CheckId::NullTable`]: `SetJNIFunctionTable(NULL)` on an attached
//!    thread must return `JVMTI_ERROR_NULL_POINTER`.
//! 2. [`CheckId::DetachedThread`]: the same call after
//!    `DetachCurrentThread()` must return `JVMTI_ERROR_UNATTACHED_THREAD`.
//!    The thread is attached again afterwards.
//!
//! A mismatch is recorded and the run continues. A VM that refuses to
//! detach the thread skips check 2. Failing to re-attach ends the run at
//! once, since the harness cannot continue on a detached thread.
//!
//! The VM is reached only through [`FunctionTable`] and
//! [`ThreadAttachment`], so the runner works the same against a live VM
//! and against a stand-in.

use std::io::Write;
use std::ptr;

use crate::jni_wrapper::JavaVm;
use crate::jvmti_wrapper::Jvmti;
use crate::report::Reporter;
use crate::sys::jni;
use crate::sys::jvmti::jvmtiError;

/// Status returned to the harness when every check passed or was skipped.
pub const PASSED: jni::jint = 0;
/// Status returned to the harness on any failure.
pub const STATUS_FAILED: jni::jint = 2;

/// The JVMTI operation under test.
pub trait FunctionTable {
    /// Calls `SetJNIFunctionTable` and returns whatever code the VM gives
    /// back, `JVMTI_ERROR_NONE` included.
    fn set_function_table(&self, table: *const jni::JNINativeInterface_) -> jvmtiError;
}

/// Attach state of the calling thread.
pub trait ThreadAttachment {
    fn detach(&self) -> Result<(), jni::jint>;
    fn reattach(&self) -> Result<(), jni::jint>;
}

impl FunctionTable for Jvmti {
    fn set_function_table(&self, table: *const jni::JNINativeInterface_) -> jvmtiError {
        match self.set_jni_function_table(table) {
            Ok(()) => jvmtiError::NONE,
            Err(err) => err,
        }
    }
}

impl ThreadAttachment for JavaVm {
    fn detach(&self) -> Result<(), jni::jint> {
        self.detach_current_thread()
    }

    fn reattach(&self) -> Result<(), jni::jint> {
        self.attach_current_thread().map(|env| {
            log::debug!("re-attached with JNIEnv {:p}", env);
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    NullTable,
    DetachedThread,
}

impl CheckId {
    /// The error code the VM is required to return for this check.
    pub fn expected(self) -> jvmtiError {
        match self {
            CheckId::NullTable => jvmtiError::NULL_POINTER,
            CheckId::DetachedThread => jvmtiError::UNATTACHED_THREAD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// `DetachCurrentThread` returned `detach_status`; nothing was asserted.
    Skipped { detach_status: jni::jint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckRecord {
    pub id: CheckId,
    pub expected: jvmtiError,
    /// `None` when the check was skipped before the call was made.
    pub actual: Option<jvmtiError>,
    pub outcome: Outcome,
}

impl CheckRecord {
    fn observed(id: CheckId, actual: jvmtiError) -> Self {
        let expected = id.expected();
        let outcome = if actual == expected {
            Outcome::Passed
        } else {
            Outcome::Failed
        };
        CheckRecord {
            id,
            expected,
            actual: Some(actual),
            outcome,
        }
    }

    fn skipped(id: CheckId, detach_status: jni::jint) -> Self {
        CheckRecord {
            id,
            expected: id.expected(),
            actual: None,
            outcome: Outcome::Skipped { detach_status },
        }
    }
}

/// A condition that ends the run with [`STATUS_FAILED`] regardless of the
/// check records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    NotLoaded,
    Reattach { status: jni::jint },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: Vec<CheckRecord>,
    pub fatal: Option<Fatal>,
}

impl RunSummary {
    pub fn not_loaded() -> Self {
        RunSummary {
            records: Vec::new(),
            fatal: Some(Fatal::NotLoaded),
        }
    }

    pub fn record(&self, id: CheckId) -> Option<&CheckRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(|r| r.outcome == Outcome::Failed)
    }

    pub fn passed(&self) -> bool {
        self.fatal.is_none() && self.failures().next().is_none()
    }

    /// The status handed back to the harness.
    pub fn status(&self) -> jni::jint {
        if self.passed() {
            PASSED
        } else {
            STATUS_FAILED
        }
    }
}

fn redirect<T, W>(table: &T, id: CheckId, reporter: &mut Reporter<W>) -> CheckRecord
where
    T: FunctionTable + ?Sized,
    W: Write,
{
    reporter.attempt(id.expected());

    let actual = table.set_function_table(ptr::null());
    let record = CheckRecord::observed(id, actual);

    if record.outcome == Outcome::Passed {
        reporter.check_passed(actual);
    } else {
        log::error!("{:?}: SetJNIFunctionTable returned {:?}, expected {:?}", id, actual, record.expected);
        reporter.check_failed(record.expected, actual);
    }
    record
}

/// Runs both checks in order and collects their records.
pub fn run_checks<T, A, W>(table: &T, threads: &A, reporter: &mut Reporter<W>) -> RunSummary
where
    T: FunctionTable + ?Sized,
    A: ThreadAttachment + ?Sized,
    W: Write,
{
    let mut summary = RunSummary::default();

    reporter.announce(CheckId::NullTable);
    summary.records.push(redirect(table, CheckId::NullTable, reporter));

    reporter.announce(CheckId::DetachedThread);
    match threads.detach() {
        Err(status) => {
            log::warn!("DetachCurrentThread returned {}, skipping the detached-thread check", status);
            reporter.detach_refused(status);
            summary
                .records
                .push(CheckRecord::skipped(CheckId::DetachedThread, status));
        }
        Ok(()) => {
            summary
                .records
                .push(redirect(table, CheckId::DetachedThread, reporter));

            reporter.reattaching();
            if let Err(status) = threads.reattach() {
                log::error!("AttachCurrentThread returned {}", status);
                reporter.reattach_failed(status);
                summary.fatal = Some(Fatal::Reattach { status });
                return summary;
            }
        }
    }

    log::debug!("checks finished, status {}", summary.status());
    summary
}
