//! Entry guards for runtime operations
//!
//! Every operation that receives a boxed value calls one of these first.
//! They detect bugs in generated code, not bad user input, so every failure
//! is a fatal [`FaultKind::InternalConsistency`](crate::fault::FaultKind).

use crate::fault;
use crate::value::{BoxedValue, Object, RawHeader, TypeTag, OBJECT_MAGIC};

/// Validate a handle owned by Rust code.
pub fn check(value: &BoxedValue, label: &str) {
    check_object(value.object(), label);
}

fn check_object(object: &Object, label: &str) {
    if object.magic() != OBJECT_MAGIC {
        fault::internal(label, format!("bad object magic {:#010x}", object.magic()));
    }
    if object.tag() != object.value().tag() {
        fault::internal(
            label,
            format!(
                "header tag {} does not match {} payload",
                object.tag(),
                object.value().tag()
            ),
        );
    }
}

/// Validate a handle received from compiled code and borrow it.
///
/// Rejects null and misaligned pointers, foreign magic numbers and raw tags
/// outside the closed tag set before the payload is touched.
///
/// # Safety
/// A non-null, aligned `ptr` must be readable for the size of an [`Object`]
/// for the lifetime `'a`.
pub unsafe fn check_raw<'a>(ptr: *const Object, label: &str) -> &'a Object {
    if ptr.is_null() {
        fault::internal(label, "null handle");
    }
    if ptr as usize % std::mem::align_of::<Object>() != 0 {
        fault::internal(label, format!("handle {:?} is misaligned", ptr));
    }

    let header = *(ptr as *const RawHeader);
    if header.magic != OBJECT_MAGIC {
        fault::internal(label, format!("bad object magic {:#010x}", header.magic));
    }
    if TypeTag::from_raw(header.tag).is_none() {
        fault::internal(label, format!("unknown type tag {}", header.tag));
    }

    let object = &*ptr;
    check_object(object, label);
    object
}

/// Validate the argument count of a native routine call.
pub fn check_arity(args: &[BoxedValue], expected: usize, label: &str) {
    if args.len() != expected {
        fault::internal(
            label,
            format!("expected {} argument(s), received {}", expected, args.len()),
        );
    }
    for arg in args {
        check(arg, label);
    }
}
