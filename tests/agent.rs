mod common;

use std::ptr;

use common::FakeVm;
use setjniftab002::agent::{AgentContext, SetJniFunctionTableAgent, REQUIRED_JVMTI_VERSION};
use setjniftab002::error::AgentError;
use setjniftab002::prelude::*;
use setjniftab002::sys::jvmti::jvmtiError;

fn quiet() -> Reporter<Vec<u8>> {
    Reporter::new(Vec::new(), false)
}

fn text(reporter: Reporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[test]
fn initialize_requests_jvmti_1_1() {
    let mut vm = FakeVm::new();
    let mut reporter = quiet();

    let context = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut reporter) };

    assert!(context.is_ok());
    assert_eq!(vm.requested_version(), REQUIRED_JVMTI_VERSION);
    assert_eq!(REQUIRED_JVMTI_VERSION, jvmti::JVMTI_VERSION_1_1);
    assert_eq!(text(reporter), "");
}

#[test]
fn verbose_initialize_announces_itself() {
    let mut vm = FakeVm::new();
    let mut reporter = Reporter::new(Vec::new(), true);
    let options = AgentOptions::parse("-verbose");

    let context = unsafe { AgentContext::initialize(vm.raw(), options, &mut reporter) }.unwrap();

    assert!(context.options().verbose);
    assert_eq!(text(reporter), "verbose mode on\n");
}

#[test]
fn get_env_failure_is_reported() {
    let mut vm = FakeVm::new();
    vm.fail_get_env(jni::JNI_EVERSION);
    let mut reporter = quiet();

    let err = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut reporter) }
        .err()
        .unwrap();

    assert_eq!(err, AgentError::GetEnv { code: jni::JNI_EVERSION });
    assert!(text(reporter).contains("Failed to call GetEnv"));
}

#[test]
fn null_environment_is_rejected() {
    let mut vm = FakeVm::new();
    vm.return_null_env();
    let mut reporter = quiet();

    let err = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut reporter) }
        .err()
        .unwrap();

    assert_eq!(err, AgentError::NullEnvironment);
    assert!(text(reporter).contains("Failed to call GetEnv"));
}

#[test]
fn null_vm_is_rejected() {
    let mut reporter = quiet();
    let err = unsafe { AgentContext::initialize(ptr::null_mut(), AgentOptions::default(), &mut reporter) }
        .err()
        .unwrap();
    assert_eq!(err, AgentError::NullVm);
    assert_eq!(text(reporter), "Failed to initialize the agent: JavaVM pointer is null\n");
}

#[test]
fn checks_pass_through_the_real_wrappers() {
    let mut vm = FakeVm::new();
    let context = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut quiet()) }.unwrap();

    let mut reporter = quiet();
    let summary = context.run_checks_with(&mut reporter);

    assert_eq!(summary.status(), PASSED);
    assert_eq!(vm.set_table_calls(), 2);
    assert_eq!(vm.non_null_tables(), 0);
    assert!(vm.is_attached());
    assert_eq!(text(reporter), "");
}

#[test]
fn jvmti_wrapper_surfaces_the_raw_code() {
    let mut vm = FakeVm::new();
    let java_vm = unsafe { JavaVm::from_raw(vm.raw()) }.unwrap();
    let env = Jvmti::from_vm(&java_vm, jvmti::JVMTI_VERSION_1_1).unwrap();

    assert_eq!(
        env.set_jni_function_table(ptr::null()),
        Err(jvmtiError::NULL_POINTER)
    );
    assert_eq!(env.set_function_table(ptr::null()), jvmtiError::NULL_POINTER);
    assert_eq!(env.get_version_number(), Ok(jvmti::JVMTI_VERSION_21));
    assert_eq!(setjniftab002::env::version_parts(jvmti::JVMTI_VERSION_21), (21, 0));
}

#[test]
fn vm_answering_success_fails_the_run() {
    let mut vm = FakeVm::new();
    vm.answer_attached_with(jvmtiError::NONE);
    let context = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut quiet()) }.unwrap();

    let mut reporter = quiet();
    let summary = context.run_checks_with(&mut reporter);

    assert_eq!(summary.status(), STATUS_FAILED);
    assert!(text(reporter).contains("returns JVMTI_ERROR_NONE instead of JVMTI_ERROR_NULL_POINTER"));
}

#[test]
fn refused_detach_is_skipped() {
    let mut vm = FakeVm::new();
    vm.refuse_detach(jni::JNI_ERR);
    let context = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut quiet()) }.unwrap();

    let summary = context.run_checks_with(&mut quiet());

    assert_eq!(summary.status(), PASSED);
    assert_eq!(vm.set_table_calls(), 1);
    assert_eq!(
        summary.record(CheckId::DetachedThread).unwrap().outcome,
        Outcome::Skipped { detach_status: jni::JNI_ERR }
    );
}

#[test]
fn refused_reattach_fails_the_run() {
    let mut vm = FakeVm::new();
    vm.refuse_attach(jni::JNI_ERR);
    let context = unsafe { AgentContext::initialize(vm.raw(), AgentOptions::default(), &mut quiet()) }.unwrap();

    let summary = context.run_checks_with(&mut quiet());

    assert_eq!(summary.fatal, Some(Fatal::Reattach { status: jni::JNI_ERR }));
    assert_eq!(summary.status(), STATUS_FAILED);
    assert!(!vm.is_attached());
}

#[test]
fn agent_lifecycle() {
    let mut vm = FakeVm::new();
    let agent = SetJniFunctionTableAgent::default();

    assert_eq!(agent.on_load(vm.raw(), "-verbose"), jni::JNI_OK);
    assert!(agent.context().unwrap().options().verbose);
    assert_eq!(agent.check(ptr::null_mut(), ptr::null_mut()), PASSED);
    assert_eq!(agent.check(ptr::null_mut(), ptr::null_mut()), PASSED);

    // A second initialization in the same process is refused.
    assert_eq!(agent.on_attach(vm.raw(), ""), jni::JNI_ERR);
    assert!(agent.context().unwrap().options().verbose);

    agent.on_unload();
    assert_eq!(vm.disposed(), 1);
}

#[test]
fn agent_attached_to_a_running_vm() {
    let mut vm = FakeVm::new();
    let agent = SetJniFunctionTableAgent::default();

    assert_eq!(agent.on_attach(vm.raw(), ""), jni::JNI_OK);
    assert_eq!(vm.requested_version(), REQUIRED_JVMTI_VERSION);
    assert!(!agent.context().unwrap().options().verbose);
    assert_eq!(agent.check(ptr::null_mut(), ptr::null_mut()), PASSED);
    assert_eq!(vm.set_table_calls(), 2);

    assert_eq!(agent.on_load(vm.raw(), "-verbose"), jni::JNI_ERR);
    assert!(!agent.context().unwrap().options().verbose);
}

#[test]
fn agent_that_failed_to_load_fails_the_check() {
    let mut vm = FakeVm::new();
    vm.fail_get_env(jni::JNI_EVERSION);
    let agent = SetJniFunctionTableAgent::default();

    assert_eq!(agent.on_load(vm.raw(), ""), jni::JNI_ERR);
    assert!(agent.context().is_none());
    assert_eq!(agent.check(ptr::null_mut(), ptr::null_mut()), STATUS_FAILED);

    agent.on_unload();
    assert_eq!(vm.disposed(), 0);
}
