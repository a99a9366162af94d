//! C ABI for compiled programs
//!
//! Handles are `*const Object` pointers obtained from the `brisk_box_*`
//! functions or returned by routines; each one owns a reference and must be
//! given back with [`brisk_release`].
//!
//! Every entry point checks its handles first. A fault inside any entry
//! point terminates the process with the fault's exit status; unwinding
//! never crosses the ABI.

use std::ffi::CStr;
use std::sync::Arc;

use brisk_plugin::Initializer;
use libc::c_char;
use log::debug;
use parking_lot::RwLock;

use crate::factory;
use crate::fault::{self, FaultKind};
use crate::modules::Runtime;
use crate::registry::NativeRegistry;
use crate::sanity;
use crate::value::{BoxedValue, Object};

/// Runtime handed to compiled code by `brisk_runtime_init`.
static INSTALLED: RwLock<Option<Arc<Runtime>>> = parking_lot::const_rwlock(None);

/// Install an already booted runtime for the C ABI.
pub fn install(runtime: Arc<Runtime>) {
    *INSTALLED.write() = Some(runtime);
}

/// The installed runtime, if `brisk_runtime_init` has run.
pub fn installed() -> Option<Arc<Runtime>> {
    INSTALLED.read().clone()
}

/// Boot the runtime and register every module. Call once, before any other
/// entry point. Later calls keep the existing runtime.
#[no_mangle]
pub extern "C" fn brisk_runtime_init() {
    boot_installed(&[]);
}

fn boot_installed(extra: &[Initializer<NativeRegistry>]) {
    let mut slot = INSTALLED.write();
    if slot.is_some() {
        debug!("brisk_runtime_init: runtime already installed");
        return;
    }
    let runtime = fault::or_terminate(|| Runtime::boot_with(extra));
    *slot = Some(Arc::new(runtime));
}

/// Drop the installed runtime.
#[no_mangle]
pub extern "C" fn brisk_runtime_shutdown() {
    INSTALLED.write().take();
}

#[no_mangle]
pub extern "C" fn brisk_box_int(value: i64) -> *const Object {
    factory::box_int(value).into_raw()
}

#[no_mangle]
pub extern "C" fn brisk_box_byte(value: i64) -> *const Object {
    fault::or_terminate(|| factory::box_byte(value)).into_raw()
}

#[no_mangle]
pub extern "C" fn brisk_box_char(value: i64) -> *const Object {
    fault::or_terminate(|| factory::box_char(value)).into_raw()
}

#[no_mangle]
pub extern "C" fn brisk_box_bool(value: bool) -> *const Object {
    factory::box_bool(value).into_raw()
}

#[no_mangle]
pub extern "C" fn brisk_box_null() -> *const Object {
    factory::box_null().into_raw()
}

/// Raw type tag of a handle.
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn brisk_tag_of(handle: *const Object) -> u32 {
    fault::or_terminate(|| sanity::check_raw(handle, "brisk_tag_of").tag() as u32)
}

/// Scalar payload of a handle; non-scalar tags are a fault.
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn brisk_unbox_scalar(handle: *const Object) -> i64 {
    fault::or_terminate(|| {
        let object = sanity::check_raw(handle, "brisk_unbox_scalar");
        match object.value().as_scalar() {
            Some(raw) => raw,
            None => fault::unsupported_type("brisk_unbox_scalar", object.tag()),
        }
    })
}

/// Give a handle back to the runtime.
///
/// # Safety
/// `handle` must be a live handle; it is invalid afterwards.
#[no_mangle]
pub unsafe extern "C" fn brisk_release(handle: *const Object) {
    fault::or_terminate(|| {
        sanity::check_raw(handle, "brisk_release");
        drop(BoxedValue::from_raw(handle));
    })
}

/// Invoke a one-argument routine by name and signature descriptor.
///
/// The argument handle stays owned by the caller; the result is a new handle.
///
/// # Safety
/// `name` and `signature` must be valid NUL-terminated strings and `arg`
/// must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn brisk_call1(
    name: *const c_char,
    signature: *const c_char,
    arg: *const Object,
) -> *const Object {
    fault::or_terminate(|| {
        let name = c_str(name, "brisk_call1");
        let signature = c_str(signature, "brisk_call1");
        sanity::check_raw(arg, name);

        let runtime = match installed() {
            Some(runtime) => runtime,
            None => fault::internal(name, "runtime used before brisk_runtime_init"),
        };
        let arg = BoxedValue::clone_from_raw(arg);

        match runtime.call(name, signature, &[arg]) {
            Ok(result) => result.into_raw(),
            Err(err) => fault::raise(FaultKind::InternalConsistency, name, err.to_string()),
        }
    })
}

unsafe fn c_str<'a>(ptr: *const c_char, label: &str) -> &'a str {
    if ptr.is_null() {
        fault::internal(label, "null string");
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => s,
        Err(_) => fault::internal(label, "string is not valid UTF-8"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;
    use std::process::{Command, Output};

    const CHILD_ENV: &str = "BRISK_ABI_CHILD";

    /// Re-run a single test of this binary in a child process with
    /// `CHILD_ENV` set, so it can end the process.
    fn run_child(test: &str) -> Output {
        let exe = std::env::current_exe().expect("test executable");
        Command::new(exe)
            .args([test, "--exact", "--test-threads=1", "--nocapture"])
            .env(CHILD_ENV, "1")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run child test")
    }

    fn assert_fault_exit(output: &Output, kind: FaultKind) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(kind.describe()), "{}", stderr);
        if cfg!(feature = "abort-on-fault") {
            assert!(!output.status.success());
            assert_ne!(output.status.code(), Some(kind.exit_status()));
        } else {
            assert_eq!(output.status.code(), Some(kind.exit_status()), "{}", stderr);
        }
    }

    fn register_faulting(_: &mut NativeRegistry) {
        fault::internal("faulting", "register callback failed")
    }

    #[test]
    fn test_box_tag_unbox_release() {
        unsafe {
            let handle = brisk_box_byte(200);
            assert_eq!(brisk_tag_of(handle), TypeTag::Byte as u32);
            assert_eq!(brisk_unbox_scalar(handle), 200);
            brisk_release(handle);

            let handle = brisk_box_char('z' as i64);
            assert_eq!(brisk_unbox_scalar(handle), 'z' as i64);
            brisk_release(handle);
        }
    }

    #[test]
    fn test_call1_through_installed_runtime() {
        brisk_runtime_init();
        // Second init is a no-op.
        brisk_runtime_init();

        unsafe {
            let arg = brisk_box_int(42);
            let result = brisk_call1(
                b"toUnsignedByte\0".as_ptr() as *const c_char,
                b"[^d,v,i]\0".as_ptr() as *const c_char,
                arg,
            );
            assert_eq!(brisk_tag_of(result), TypeTag::Byte as u32);
            assert_eq!(brisk_unbox_scalar(result), 42);

            // The argument is still owned by the caller.
            assert_eq!(brisk_unbox_scalar(arg), 42);
            brisk_release(result);
            brisk_release(arg);
        }
    }

    #[test]
    fn test_install_shares_runtime() {
        let runtime = Arc::new(Runtime::boot());
        install(runtime.clone());
        let current = installed().expect("installed");
        assert!(current.lookup("toChar", "[^c,v,i]").is_some());
    }

    #[test]
    fn test_call1_unknown_routine_ends_process() {
        if std::env::var_os(CHILD_ENV).is_some() {
            brisk_runtime_init();
            unsafe {
                let arg = brisk_box_int(1);
                brisk_call1(
                    b"noSuchRoutine\0".as_ptr() as *const c_char,
                    b"[^i,v,i]\0".as_ptr() as *const c_char,
                    arg,
                );
            }
            unreachable!("brisk_call1 returned for an unknown routine");
        }

        let output = run_child("abi::tests::test_call1_unknown_routine_ends_process");
        assert_fault_exit(&output, FaultKind::InternalConsistency);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("noSuchRoutine"), "{}", stderr);
    }

    #[test]
    fn test_init_fault_ends_process() {
        if std::env::var_os(CHILD_ENV).is_some() {
            boot_installed(&[Initializer::register_only("faulting", register_faulting)]);
            unreachable!("boot returned after a faulting module");
        }

        let output = run_child("abi::tests::test_init_fault_ends_process");
        assert_fault_exit(&output, FaultKind::InternalConsistency);
    }
}
