//! Fatal runtime faults
//!
//! A fault means the compiled program broke the runtime's contract: a
//! malformed handle, an operation applied to a type it does not accept, or a
//! value outside the destination representation. None of these are
//! recoverable inside the runtime.
//!
//! [`raise`] logs the fault and unwinds with the [`Fault`] as payload.
//! Boundaries decide what happens next:
//! - [`catch`] turns the unwind back into `Err(Fault)` (REPL, tests, CLI)
//! - [`or_terminate`] reports the fault and exits the process with the
//!   fault's status (C ABI entry points)

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use thiserror::Error;

use crate::value::TypeTag;

/// Global counter for raised faults
static FAULT_COUNT: AtomicU64 = AtomicU64::new(0);

/// Fault taxonomy, visible to process supervisors through the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Null or malformed handle: a bug in the code generator or the runtime
    InternalConsistency,
    /// Operation invoked on a tag outside its accepted set
    UnsupportedType,
    /// Value outside the destination representation's domain
    RangeViolation,
}

impl FaultKind {
    pub const fn exit_status(self) -> i32 {
        match self {
            FaultKind::InternalConsistency => 254,
            FaultKind::UnsupportedType => 253,
            FaultKind::RangeViolation => 252,
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            FaultKind::InternalConsistency => "internal consistency violation",
            FaultKind::UnsupportedType => "unsupported type for this operation",
            FaultKind::RangeViolation => "precondition not satisfied",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in {routine}: {detail}")]
pub struct Fault {
    pub kind: FaultKind,
    pub routine: String,
    pub detail: String,
}

impl Fault {
    pub fn new(kind: FaultKind, routine: impl Into<String>, detail: impl Into<String>) -> Self {
        Fault {
            kind,
            routine: routine.into(),
            detail: detail.into(),
        }
    }
}

/// Raise a fatal fault. Never returns.
pub fn raise(kind: FaultKind, routine: &str, detail: impl Into<String>) -> ! {
    let fault = Fault::new(kind, routine, detail);
    let count = FAULT_COUNT.fetch_add(1, Ordering::SeqCst);
    debug!("[fault #{:04}] {}", count + 1, fault);

    // resume_unwind skips the panic hook; the boundary prints the diagnostic.
    panic::resume_unwind(Box::new(fault))
}

pub fn unsupported_type(routine: &str, tag: TypeTag) -> ! {
    raise(
        FaultKind::UnsupportedType,
        routine,
        format!("no implementation for type {} ({})", tag, tag as u32),
    )
}

pub fn range_violation(routine: &str, detail: impl Into<String>) -> ! {
    raise(FaultKind::RangeViolation, routine, detail)
}

pub fn internal(routine: &str, detail: impl Into<String>) -> ! {
    raise(FaultKind::InternalConsistency, routine, detail)
}

/// Run `f`, converting a raised fault into `Err`.
///
/// Panics that do not carry a [`Fault`] keep unwinding.
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, Fault> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<Fault>() {
            Ok(fault) => Err(*fault),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Report `fault` on stderr and end the process with its status.
pub fn terminate(fault: &Fault) -> ! {
    eprintln!("{}", fault.kind);
    eprintln!("  in {}: {}", fault.routine, fault.detail);

    if cfg!(feature = "abort-on-fault") {
        std::process::abort();
    }
    std::process::exit(fault.kind.exit_status())
}

/// Run `f`; a raised fault terminates the process.
pub fn or_terminate<T>(f: impl FnOnce() -> T) -> T {
    match catch(f) {
        Ok(value) => value,
        Err(fault) => terminate(&fault),
    }
}

/// Total number of faults raised in this process
pub fn fault_count() -> u64 {
    FAULT_COUNT.load(Ordering::SeqCst)
}
