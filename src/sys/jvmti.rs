// setjniftab002/src/sys/jvmti.rs
//
// JVMTI (JVM Tool Interface) bindings used by the agent.
//
// The function table is laid out slot-for-slot against jvmti.h. Slots the
// agent never calls are kept as reserved padding so the ones it does call
// sit at the right offsets. Slots past 127 are never read through this
// layout and are left off the end.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::fmt;
use std::os::raw::c_void;

use crate::sys::jni::{jint, JNINativeInterface_};

// --- Versions ---
pub const JVMTI_VERSION_1_1: jint = 0x30010100;
pub const JVMTI_VERSION_21: jint = 0x30150000;

pub const JVMTI_VERSION_MASK_MAJOR: jint = 0x0FFF0000;
pub const JVMTI_VERSION_MASK_MINOR: jint = 0x0000FF00;
pub const JVMTI_VERSION_SHIFT_MAJOR: u32 = 16;
pub const JVMTI_VERSION_SHIFT_MINOR: u32 = 8;

// --- Error Codes ---

/// A `jvmtiError` as returned across the FFI boundary.
///
/// This is a transparent wrapper rather than a Rust enum: a misbehaving VM
/// may hand back any value, and the agent has to be able to print it.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct jvmtiError(pub u32);

impl jvmtiError {
    pub const NONE: Self = Self(0);
    pub const INVALID_THREAD: Self = Self(10);
    pub const INVALID_THREAD_GROUP: Self = Self(11);
    pub const INVALID_PRIORITY: Self = Self(12);
    pub const THREAD_NOT_SUSPENDED: Self = Self(13);
    pub const THREAD_SUSPENDED: Self = Self(14);
    pub const THREAD_NOT_ALIVE: Self = Self(15);
    pub const INVALID_OBJECT: Self = Self(20);
    pub const INVALID_CLASS: Self = Self(21);
    pub const CLASS_NOT_PREPARED: Self = Self(22);
    pub const INVALID_METHODID: Self = Self(23);
    pub const INVALID_LOCATION: Self = Self(24);
    pub const INVALID_FIELDID: Self = Self(25);
    pub const INVALID_MODULE: Self = Self(26);
    pub const NO_MORE_FRAMES: Self = Self(31);
    pub const OPAQUE_FRAME: Self = Self(32);
    pub const TYPE_MISMATCH: Self = Self(34);
    pub const INVALID_SLOT: Self = Self(35);
    pub const DUPLICATE: Self = Self(40);
    pub const NOT_FOUND: Self = Self(41);
    pub const INVALID_MONITOR: Self = Self(50);
    pub const NOT_MONITOR_OWNER: Self = Self(51);
    pub const INTERRUPT: Self = Self(52);
    pub const INVALID_CLASS_FORMAT: Self = Self(60);
    pub const CIRCULAR_CLASS_DEFINITION: Self = Self(61);
    pub const FAILS_VERIFICATION: Self = Self(62);
    pub const UNSUPPORTED_REDEFINITION_METHOD_ADDED: Self = Self(63);
    pub const UNSUPPORTED_REDEFINITION_SCHEMA_CHANGED: Self = Self(64);
    pub const INVALID_TYPESTATE: Self = Self(65);
    pub const UNSUPPORTED_REDEFINITION_HIERARCHY_CHANGED: Self = Self(66);
    pub const UNSUPPORTED_REDEFINITION_METHOD_DELETED: Self = Self(67);
    pub const UNSUPPORTED_VERSION: Self = Self(68);
    pub const NAMES_DONT_MATCH: Self = Self(69);
    pub const UNSUPPORTED_REDEFINITION_CLASS_MODIFIERS_CHANGED: Self = Self(70);
    pub const UNSUPPORTED_REDEFINITION_METHOD_MODIFIERS_CHANGED: Self = Self(71);
    pub const UNSUPPORTED_REDEFINITION_CLASS_ATTRIBUTE_CHANGED: Self = Self(72);
    pub const UNSUPPORTED_OPERATION: Self = Self(73);
    pub const UNMODIFIABLE_CLASS: Self = Self(79);
    pub const UNMODIFIABLE_MODULE: Self = Self(80);
    pub const NOT_AVAILABLE: Self = Self(98);
    pub const MUST_POSSESS_CAPABILITY: Self = Self(99);
    pub const NULL_POINTER: Self = Self(100);
    pub const ABSENT_INFORMATION: Self = Self(101);
    pub const INVALID_EVENT_TYPE: Self = Self(102);
    pub const ILLEGAL_ARGUMENT: Self = Self(103);
    pub const NATIVE_METHOD: Self = Self(104);
    pub const CLASS_LOADER_UNSUPPORTED: Self = Self(106);
    pub const OUT_OF_MEMORY: Self = Self(110);
    pub const ACCESS_DENIED: Self = Self(111);
    pub const WRONG_PHASE: Self = Self(112);
    pub const INTERNAL: Self = Self(113);
    pub const UNATTACHED_THREAD: Self = Self(115);
    pub const INVALID_ENVIRONMENT: Self = Self(116);

    /// The symbolic `JVMTI_ERROR_*` name, or `None` for a code jvmti.h
    /// does not define.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "JVMTI_ERROR_NONE",
            10 => "JVMTI_ERROR_INVALID_THREAD",
            11 => "JVMTI_ERROR_INVALID_THREAD_GROUP",
            12 => "JVMTI_ERROR_INVALID_PRIORITY",
            13 => "JVMTI_ERROR_THREAD_NOT_SUSPENDED",
            14 => "JVMTI_ERROR_THREAD_SUSPENDED",
            15 => "JVMTI_ERROR_THREAD_NOT_ALIVE",
            20 => "JVMTI_ERROR_INVALID_OBJECT",
            21 => "JVMTI_ERROR_INVALID_CLASS",
            22 => "JVMTI_ERROR_CLASS_NOT_PREPARED",
            23 => "JVMTI_ERROR_INVALID_METHODID",
            24 => "JVMTI_ERROR_INVALID_LOCATION",
            25 => "JVMTI_ERROR_INVALID_FIELDID",
            26 => "JVMTI_ERROR_INVALID_MODULE",
            31 => "JVMTI_ERROR_NO_MORE_FRAMES",
            32 => "JVMTI_ERROR_OPAQUE_FRAME",
            34 => "JVMTI_ERROR_TYPE_MISMATCH",
            35 => "JVMTI_ERROR_INVALID_SLOT",
            40 => "JVMTI_ERROR_DUPLICATE",
            41 => "JVMTI_ERROR_NOT_FOUND",
            50 => "JVMTI_ERROR_INVALID_MONITOR",
            51 => "JVMTI_ERROR_NOT_MONITOR_OWNER",
            52 => "JVMTI_ERROR_INTERRUPT",
            60 => "JVMTI_ERROR_INVALID_CLASS_FORMAT",
            61 => "JVMTI_ERROR_CIRCULAR_CLASS_DEFINITION",
            62 => "JVMTI_ERROR_FAILS_VERIFICATION",
            63 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_METHOD_ADDED",
            64 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_SCHEMA_CHANGED",
            65 => "JVMTI_ERROR_INVALID_TYPESTATE",
            66 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_HIERARCHY_CHANGED",
            67 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_METHOD_DELETED",
            68 => "JVMTI_ERROR_UNSUPPORTED_VERSION",
            69 => "JVMTI_ERROR_NAMES_DONT_MATCH",
            70 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_CLASS_MODIFIERS_CHANGED",
            71 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_METHOD_MODIFIERS_CHANGED",
            72 => "JVMTI_ERROR_UNSUPPORTED_REDEFINITION_CLASS_ATTRIBUTE_CHANGED",
            73 => "JVMTI_ERROR_UNSUPPORTED_OPERATION",
            79 => "JVMTI_ERROR_UNMODIFIABLE_CLASS",
            80 => "JVMTI_ERROR_UNMODIFIABLE_MODULE",
            98 => "JVMTI_ERROR_NOT_AVAILABLE",
            99 => "JVMTI_ERROR_MUST_POSSESS_CAPABILITY",
            100 => "JVMTI_ERROR_NULL_POINTER",
            101 => "JVMTI_ERROR_ABSENT_INFORMATION",
            102 => "JVMTI_ERROR_INVALID_EVENT_TYPE",
            103 => "JVMTI_ERROR_ILLEGAL_ARGUMENT",
            104 => "JVMTI_ERROR_NATIVE_METHOD",
            106 => "JVMTI_ERROR_CLASS_LOADER_UNSUPPORTED",
            110 => "JVMTI_ERROR_OUT_OF_MEMORY",
            111 => "JVMTI_ERROR_ACCESS_DENIED",
            112 => "JVMTI_ERROR_WRONG_PHASE",
            113 => "JVMTI_ERROR_INTERNAL",
            115 => "JVMTI_ERROR_UNATTACHED_THREAD",
            116 => "JVMTI_ERROR_INVALID_ENVIRONMENT",
            _ => return None,
        })
    }
}

impl fmt::Display for jvmtiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("<unknown error>"))
    }
}

impl fmt::Debug for jvmtiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "jvmtiError({})", self.0),
        }
    }
}

// --- Function Types ---
pub type JvmtiGetVersionNumberFn = unsafe extern "system" fn(env: *mut jvmtiEnv, version_ptr: *mut jint) -> jvmtiError;
pub type JvmtiSetJNIFunctionTableFn = unsafe extern "system" fn(env: *mut jvmtiEnv, function_table: *const JNINativeInterface_) -> jvmtiError;
pub type JvmtiDisposeEnvironmentFn = unsafe extern "system" fn(env: *mut jvmtiEnv) -> jvmtiError;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct jvmtiInterface_1_ {
    /*   1-87: not used by the agent */
    pub slots_1_87: [*mut c_void; 87],
    /*   88: Get Version Number */
    pub GetVersionNumber: Option<JvmtiGetVersionNumberFn>,
    /*   89-119: not used by the agent */
    pub slots_89_119: [*mut c_void; 31],
    /*   120: Set JNI Function Table */
    pub SetJNIFunctionTable: Option<JvmtiSetJNIFunctionTableFn>,
    /*   121-126: not used by the agent */
    pub slots_121_126: [*mut c_void; 6],
    /*   127: Dispose Environment */
    pub DisposeEnvironment: Option<JvmtiDisposeEnvironmentFn>,
}

impl Default for jvmtiInterface_1_ {
    fn default() -> Self {
        let null = std::ptr::null_mut();
        jvmtiInterface_1_ {
            slots_1_87: [null; 87],
            GetVersionNumber: None,
            slots_89_119: [null; 31],
            SetJNIFunctionTable: None,
            slots_121_126: [null; 6],
            DisposeEnvironment: None,
        }
    }
}

#[repr(C)]
pub struct jvmtiEnv {
    pub functions: *const jvmtiInterface_1_,
}
