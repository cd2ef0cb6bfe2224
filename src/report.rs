//! Console diagnostics for the harness.
//!
//! The harness reads the agent's standard output, so everything here is
//! plain text. Failures are always printed; progress and pass lines only
//! in verbose mode.

use std::io::{self, Write};

use crate::check::CheckId;
use crate::error::AgentError;
use crate::sys::jni;
use crate::sys::jvmti::jvmtiError;

pub struct Reporter<W: Write> {
    out: W,
    verbose: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Reporter::new(io::stdout(), verbose)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Reporter { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console output is best effort: a closed stdout must not change the
    // test verdict.
    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(text);
        let _ = self.out.write_all(b"\n");
        let _ = self.out.flush();
    }

    fn verbose_line(&mut self, text: std::fmt::Arguments<'_>) {
        if self.verbose {
            self.line(text);
        }
    }

    pub fn verbose_mode_on(&mut self) {
        self.verbose_line(format_args!("verbose mode on"));
    }

    pub fn get_env_failed(&mut self, err: &AgentError) {
        self.line(format_args!("Failed to call GetEnv: {}", err));
    }

    pub fn init_failed(&mut self, err: &AgentError) {
        self.line(format_args!("Failed to initialize the agent: {}", err));
    }

    pub fn not_loaded(&mut self) {
        self.line(format_args!("TEST FAILURE: JVMTI client was not properly loaded"));
    }

    pub fn announce(&mut self, id: CheckId) {
        match id {
            CheckId::NullTable => self.verbose_line(format_args!(
                "\na) Checking the function with the parameter {} ...",
                id.expected()
            )),
            CheckId::DetachedThread => self.verbose_line(format_args!(
                "\nb) Checking the function with the detached thread ...\n\ndetaching the main thread ..."
            )),
        }
    }

    pub fn attempt(&mut self, expected: jvmtiError) {
        self.verbose_line(format_args!(
            "\ntrying to overwrite the JNI function table expecting the error {} to be returned ...",
            expected
        ));
    }

    pub fn check_passed(&mut self, actual: jvmtiError) {
        self.verbose_line(format_args!(
            "CHECK PASSED: SetJNIFunctionTable() returns {} as expected",
            actual
        ));
    }

    pub fn check_failed(&mut self, expected: jvmtiError, actual: jvmtiError) {
        self.line(format_args!(
            "TEST FAILED: SetJNIFunctionTable() returns {} instead of {} as expected",
            actual, expected
        ));
    }

    pub fn detach_refused(&mut self, status: jni::jint) {
        self.verbose_line(format_args!(
            "Warning: DetachCurrentThread() returns: {}\n\tcheck with the detached main thread skipped",
            status
        ));
    }

    pub fn reattaching(&mut self) {
        self.verbose_line(format_args!("\nattaching the main thread back ..."));
    }

    pub fn reattach_failed(&mut self, status: jni::jint) {
        self.line(format_args!(
            "TEST FAILURE: AttachCurrentThread() returns: {}",
            status
        ));
    }
}
